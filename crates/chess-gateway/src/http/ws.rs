//! `GET /ws?token=<jwt>` — the session entry point. 401 on a missing or
//! invalid token; on success, upgrades and hands the socket to the realtime
//! session driver.

use std::collections::HashMap;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::app_state::AppState;
use crate::realtime::session;

pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let token = match params.get("token").filter(|t| !t.is_empty()) {
        Some(token) => token.clone(),
        None => return unauthorized(),
    };

    let claims = match crate::auth::verify(&token, state.config().jwt_secret.as_bytes()) {
        Ok(claims) => claims,
        Err(_) => return unauthorized(),
    };

    let manager = state.manager().clone();
    ws.on_upgrade(move |socket| session::run_session(manager, socket, claims.id, claims.username))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "AUTH_FAILED", "message": "missing or invalid token" }))).into_response()
}
