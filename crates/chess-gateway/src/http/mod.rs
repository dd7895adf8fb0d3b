//! HTTP surface: token minting, room creation, the WS upgrade entry point,
//! and liveness/metrics endpoints.

pub mod ops;
pub mod rooms;
pub mod tokens;
pub mod ws;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use chess_core::error::{ChessError, ClientCode};

/// Wraps `ChessError` so HTTP surfaces can convert it to a response without
/// pulling `axum` into chess-core.
pub struct HttpError(pub ChessError);

impl From<ChessError> for HttpError {
    fn from(err: ChessError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match self.0.client_code() {
            ClientCode::BadRequest => StatusCode::BAD_REQUEST,
            ClientCode::AuthFailed => StatusCode::UNAUTHORIZED,
            ClientCode::NotFound => StatusCode::NOT_FOUND,
            ClientCode::Store | ClientCode::Transport | ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.0.client_code().as_str(), "message": self.0.to_string() }));
        (status, body).into_response()
    }
}
