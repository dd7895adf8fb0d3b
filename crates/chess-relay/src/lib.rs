//! Top-level facade crate for chess-relay.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use chess_core::*;
}

pub mod gateway {
    pub use chess_gateway::*;
}
