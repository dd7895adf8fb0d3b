//! Bearer-token extractor for HTTP surfaces that require an authenticated
//! caller (`POST /rooms`). The WS upgrade path (`GET /ws?token=`) verifies a
//! query-string token directly instead — see `http::ws`.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::Claims;
use crate::app_state::AppState;

pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(unauthorized)?;

        let claims = super::verify(token, state.config().jwt_secret.as_bytes()).map_err(|_| unauthorized())?;
        Ok(AuthUser(claims))
    }
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "status": "error", "message": "unauthorized" }))).into_response()
}
