//! Axum router wiring: HTTP routes plus the WS upgrade, all sharing one
//! [`AppState`](crate::app_state::AppState).

use axum::routing::{get, post};
use axum::Router;

use crate::app_state::AppState;
use crate::http;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/tokens", post(http::tokens::mint_token))
        .route("/rooms", post(http::rooms::create_room))
        .route("/ws", get(http::ws::ws_upgrade))
        .route("/healthz", get(http::ops::healthz))
        .route("/metrics", get(http::ops::metrics))
        .with_state(state)
}
