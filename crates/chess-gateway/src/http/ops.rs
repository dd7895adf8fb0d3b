//! Liveness and metrics endpoints.

use axum::extract::State;
use axum::http::StatusCode;

use crate::app_state::AppState;

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

pub async fn metrics(State(state): State<AppState>) -> String {
    state.metrics().render()
}
