//! Wires one accepted WebSocket to the Manager: a reader task decoding
//! frames into events, a writer task draining the outbound queue and
//! emitting pings, and a supervisor that waits for the first error from
//! either and runs the teardown sequence.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, timeout, Duration};
use tracing::Instrument;
use uuid::Uuid;

use chess_core::error::ChessError;
use chess_core::protocol::event::Event;

use super::client::Client;
use super::manager::Manager;

/// Read deadline, refreshed on every frame received (a pong included).
const PONG_WAIT: Duration = Duration::from_secs(10);
/// 0.9 x `PONG_WAIT`, so at least one ping lands inside every read window.
const PING_INTERVAL: Duration = Duration::from_secs(9);
/// Outbound events awaiting a socket write before a client is judged a slow
/// consumer.
const OUTBOUND_QUEUE_CAPACITY: usize = 64;
/// Room for a couple of near-simultaneous failures from reader and writer;
/// only the first is ever acted on.
const ERROR_SINK_CAPACITY: usize = 4;

/// Drives one accepted socket end to end: registration, identity-room join,
/// the reader/writer tasks, and teardown once either reports a fatal error.
pub async fn run_session(manager: Arc<Manager>, socket: WebSocket, user_id: String, username: String) {
    let client_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("ws_session", session_id = %client_id, user_id = %user_id);
    drive_session(manager, socket, client_id, user_id, username).instrument(span).await
}

async fn drive_session(manager: Arc<Manager>, socket: WebSocket, client_id: String, user_id: String, username: String) {
    let (sink, stream) = socket.split();
    let (out_tx, out_rx) = mpsc::channel::<Event>(OUTBOUND_QUEUE_CAPACITY);
    let (err_tx, mut err_rx) = mpsc::channel::<ChessError>(ERROR_SINK_CAPACITY);
    let (cancel_tx, cancel_rx) = watch::channel(false);

    manager.add_client(&client_id, &user_id, &username, out_tx.clone(), err_tx.clone());
    let client = Client::new(client_id.clone(), user_id.clone(), username.clone(), manager.clone());
    client.join(&user_id);

    let reader = tokio::spawn(run_reader(client.clone(), manager.clone(), stream, err_tx.clone()));
    let writer = tokio::spawn(run_writer(sink, out_rx, err_tx, cancel_rx));

    // Block for the first failure from either task; that failure is the
    // trigger for the whole teardown sequence below.
    let _ = err_rx.recv().await;

    let _ = cancel_tx.send(true);
    reader.abort();
    let _ = writer.await;

    // Must be read before `leave_all` empties the identity room, or the
    // check would trivially see an empty room and always say "last".
    let was_last_client_of_user = manager.is_last_client_of_user(&user_id, &client_id);
    let left_rooms = client.leave_all();
    if was_last_client_of_user {
        for room_id in &left_rooms {
            manager.emit_user_disconnect(&user_id, room_id);
        }
    }
    manager.remove_client(&client_id);
}

async fn run_reader(
    client: Client,
    manager: Arc<Manager>,
    mut stream: SplitStream<WebSocket>,
    err_tx: mpsc::Sender<ChessError>,
) {
    loop {
        let frame = match timeout(PONG_WAIT, stream.next()).await {
            Ok(Some(Ok(frame))) => frame,
            Ok(Some(Err(e))) => {
                let _ = err_tx.try_send(ChessError::Transport(e.to_string()));
                return;
            }
            Ok(None) => {
                let _ = err_tx.try_send(ChessError::Transport("socket closed by peer".into()));
                return;
            }
            Err(_elapsed) => {
                let _ = err_tx.try_send(ChessError::Transport("read deadline exceeded".into()));
                return;
            }
        };

        match frame {
            Message::Text(text) => match serde_json::from_str::<Event>(&text) {
                Ok(event) => {
                    let trace_id = event.trace_id.clone();
                    if let Err(e) = manager.route_event(&client, event).await {
                        client.push(Event::new_error(&trace_id, e.to_string()));
                    }
                }
                Err(e) => {
                    client.push(Event::new_error("", format!("malformed event: {e}")));
                }
            },
            Message::Binary(_) => {
                client.push(Event::new_error("", "binary frames are not supported"));
            }
            // axum answers protocol-level pings with a pong automatically;
            // surfacing pong frames here only resets the read deadline,
            // which the fresh `timeout` on the next loop iteration already does.
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) => {
                let _ = err_tx.try_send(ChessError::Transport("socket closed by peer".into()));
                return;
            }
        }
    }
}

async fn run_writer(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Event>,
    err_tx: mpsc::Sender<ChessError>,
    mut cancel_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval(PING_INTERVAL);
    ticker.tick().await; // first tick fires immediately; consume it before looping

    loop {
        tokio::select! {
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(event) => {
                        let text = match serde_json::to_string(&event) {
                            Ok(text) => text,
                            Err(e) => {
                                let _ = err_tx.try_send(ChessError::Internal(e.to_string()));
                                continue;
                            }
                        };
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            let _ = err_tx.try_send(ChessError::Transport(e.to_string()));
                            return;
                        }
                    }
                    None => {
                        let _ = err_tx.try_send(ChessError::Transport("outbound queue closed unexpectedly".into()));
                        return;
                    }
                }
            }
            _ = ticker.tick() => {
                if let Err(e) = sink.send(Message::Ping(Vec::new())).await {
                    let _ = err_tx.try_send(ChessError::Transport(e.to_string()));
                    return;
                }
            }
            _ = cancel_rx.changed() => {
                if *cancel_rx.borrow() {
                    let _ = sink.send(Message::Close(None)).await;
                    return;
                }
            }
        }
    }
}
