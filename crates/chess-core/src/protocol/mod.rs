//! Wire protocol: the [`Event`] envelope, its typed payloads, and the
//! durable room record shape.

pub mod event;
pub mod payloads;
pub mod room;

pub use event::Event;
pub use room::RoomRecord;
