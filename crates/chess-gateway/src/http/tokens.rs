//! `POST /tokens` — mints a token for a freshly generated identity. Out of
//! the session layer's own budget, but the WS endpoint is unreachable
//! without some way to hand a caller a bearer token first.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;

use super::HttpError;

#[derive(Debug, Deserialize)]
pub struct MintTokenRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct MintTokenResponse {
    pub user_id: String,
    pub token: String,
}

pub async fn mint_token(
    State(state): State<AppState>,
    Json(req): Json<MintTokenRequest>,
) -> Result<Json<MintTokenResponse>, HttpError> {
    let user_id = format!("user:{}", Uuid::new_v4());
    let token = crate::auth::mint(&user_id, &req.username, state.config().jwt_secret.as_bytes())?;
    Ok(Json(MintTokenResponse { user_id, token }))
}
