//! The real-time session layer: per-connection [`Client`] handles, the
//! process-wide [`Manager`] (client table, room registry, handler table,
//! store handle), the protocol handlers it dispatches to, and the transport
//! tasks (`session`) that wire a WebSocket to both.

pub mod client;
pub mod handlers;
pub mod manager;
pub mod session;

pub use client::Client;
pub use manager::Manager;
