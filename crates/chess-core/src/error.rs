//! Shared error type across chess-relay crates.

use thiserror::Error;

/// Client-facing error codes (stable API, used in HTTP error bodies).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed message.
    BadRequest,
    /// Auth failed.
    AuthFailed,
    /// Requested room/resource does not exist.
    NotFound,
    /// Backing store failed.
    Store,
    /// Transport (socket) failure.
    Transport,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Store => "STORE_ERROR",
            ClientCode::Transport => "TRANSPORT",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ChessError>;

/// Unified error type used by core and gateway.
///
/// Event handlers return this directly; `route_event` converts it into an
/// `error_<trace_id>` event delivered to the originating client (never fatal
/// to the connection). Transport errors are the only variant that tears a
/// connection down.
#[derive(Debug, Error)]
pub enum ChessError {
    #[error("{0}")]
    BadRequest(String),
    #[error("auth failed")]
    AuthFailed,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Store(String),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Internal(String),
}

impl ChessError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            ChessError::BadRequest(_) => ClientCode::BadRequest,
            ChessError::AuthFailed => ClientCode::AuthFailed,
            ChessError::NotFound(_) => ClientCode::NotFound,
            ChessError::Store(_) => ClientCode::Store,
            ChessError::Transport(_) => ClientCode::Transport,
            ChessError::Internal(_) => ClientCode::Internal,
        }
    }
}
