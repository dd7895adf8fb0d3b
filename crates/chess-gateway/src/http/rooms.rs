//! `POST /rooms` — bearer-authenticated room creation. Seats the caller as
//! `player1` with the default starting position and a 12h durable-record TTL.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthUser;

use super::HttpError;

#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub room_id: String,
}

pub async fn create_room(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<CreateRoomResponse>, HttpError> {
    let room_id = Uuid::new_v4().to_string();
    state.manager().store().create(&room_id, &claims.id, &claims.username).await?;
    Ok(Json(CreateRoomResponse { room_id }))
}
