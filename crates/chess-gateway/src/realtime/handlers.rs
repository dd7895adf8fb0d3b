//! The protocol state machine: one `async fn(manager, client, event)` per
//! event type, bound in `Manager`'s handler table. Each handler owns its
//! full per-step ordering; nothing here is generic over event type.

use chess_core::error::{ChessError, Result};
use chess_core::protocol::event::Event;
use chess_core::protocol::payloads::{
    event_type, AcceptJoinRequestPayload, CloseRoomPayload, ClosingRoomPayload, JoinRoomPayload,
    PieceMovePayload, RequestJoinPayload,
};

use super::client::Client;
use super::manager::Manager;

pub async fn join_room(manager: &Manager, client: &Client, event: Event) -> Result<()> {
    let JoinRoomPayload { room_id } = event.decode_payload()?;

    let record = match manager.store().get(&room_id).await? {
        Some(record) => record,
        None => {
            client.push(Event::new_null(event_type::ROOM_NOT_FOUND));
            return Ok(());
        }
    };

    let user_id = &client.user_id;

    if record.is_seated(user_id) {
        for (other_client_id, other_user_id) in manager.members_of(&room_id) {
            if other_user_id == *user_id && other_client_id != client.id {
                let displaced = Event::new(event_type::CONN_ELSEWHERE, room_id.as_str())?;
                manager.push_to_client(&other_client_id, displaced);
            }
        }

        client.join(&room_id);
        client.push(Event::new(event_type::JOINED_ROOM, &record)?);
        manager.emit_to_room(&room_id, Event::new(event_type::USER_CONNECT, chess_core::protocol::payloads::UserConnPayload {
            user_id: user_id.clone(),
        })?);

        if record.is_active() {
            if let Some(opponent) = record.opponent_of(user_id) {
                if !opponent.is_empty() && manager.room_is_empty_or_absent(opponent) {
                    manager.emit_user_disconnect(opponent, &room_id);
                }
            }
        }

        return Ok(());
    }

    if !record.player2.is_empty() {
        client.push(Event::new_null(event_type::ROOM_FULL));
        return Ok(());
    }

    manager.emit_to_room(
        &room_id,
        Event::new(
            event_type::REQUEST_JOIN,
            RequestJoinPayload { id: user_id.clone(), client_id: client.id.clone(), username: client.username.clone() },
        )?,
    );
    Ok(())
}

pub async fn accept_join_request(manager: &Manager, _client: &Client, event: Event) -> Result<()> {
    let AcceptJoinRequestPayload { room_id, client_id, player_id } = event.decode_payload()?;

    let mut record = match manager.store().get(&room_id).await? {
        Some(record) if !record.player1.is_empty() => record,
        _ => return Err(ChessError::NotFound("room not found".into())),
    };

    if !manager.client_exists(&client_id) {
        return Err(ChessError::NotFound("the second player is not online".into()));
    }
    let username = manager.username_of(&client_id).unwrap_or_default();

    manager.join_room_for(&client_id, &room_id);

    manager.store().set_field(&room_id, chess_core::protocol::room::field::PLAYER2, &player_id).await?;
    manager.store().set_field(&room_id, chess_core::protocol::room::field::PLAYER2_USERNAME, &username).await?;
    manager.store().set_field(&room_id, chess_core::protocol::room::field::ACTIVE, "yes").await?;

    record.player2 = player_id;
    record.player2_username = username;
    record.active = "yes".to_string();

    manager.emit_to_room(&room_id, Event::new(event_type::START_GAME, &record)?);
    Ok(())
}

pub async fn piece_move(manager: &Manager, _client: &Client, event: Event) -> Result<()> {
    let PieceMovePayload { room_id, fen, .. } = event.decode_payload()?;

    manager.emit_to_room(&room_id, event.clone());
    manager.store().set_field(&room_id, chess_core::protocol::room::field::GAME_STATE, &fen).await?;
    Ok(())
}

pub async fn close_room(manager: &Manager, _client: &Client, event: Event) -> Result<()> {
    let CloseRoomPayload { room_id } = event.decode_payload()?;

    manager.emit_to_room(&room_id, Event::new(event_type::CLOSING_ROOM, ClosingRoomPayload { room_id: room_id.clone() })?);
    manager.store().delete(&room_id).await?;
    manager.leave_room_registry(&room_id);
    Ok(())
}
