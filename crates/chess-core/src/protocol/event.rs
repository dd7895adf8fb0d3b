//! The wire envelope shared by inbound and outbound messages.
//!
//! Serialized as JSON text frames with lower-snake-case keys:
//! `{"type": "...", "trace_id": "...", "payload": <json>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChessError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub trace_id: String,
    #[serde(default)]
    pub payload: Value,
}

impl Event {
    /// Builds an outgoing event. `trace_id` is empty — servers only echo a
    /// trace id back in `error_<trace_id>` replies.
    pub fn new(event_type: impl Into<String>, payload: impl Serialize) -> Result<Self> {
        let payload = serde_json::to_value(payload)
            .map_err(|e| ChessError::Internal(format!("encode payload failed: {e}")))?;
        Ok(Self { event_type: event_type.into(), trace_id: String::new(), payload })
    }

    /// Builds an outgoing event with a `null` payload.
    pub fn new_null(event_type: impl Into<String>) -> Self {
        Self { event_type: event_type.into(), trace_id: String::new(), payload: Value::Null }
    }

    /// `error_<trace_id>` reply. `type` is a literal concatenation so the
    /// client can correlate errors to the request that produced them without
    /// inspecting the payload.
    pub fn new_error(trace_id: &str, message: impl Into<String>) -> Self {
        Self {
            event_type: format!("error_{trace_id}"),
            trace_id: trace_id.to_string(),
            payload: serde_json::json!({ "message": message.into() }),
        }
    }

    /// Deserialize `payload` into a typed request. Malformed/missing payload
    /// is a `BadRequest`, handled by callers as a non-fatal protocol error.
    pub fn decode_payload<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.payload.clone())
            .map_err(|e| ChessError::BadRequest(format!("invalid payload: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Ping {
        n: u32,
    }

    #[test]
    fn round_trip_preserves_type_trace_and_payload() {
        let evt = Event::new("ping", Ping { n: 7 }).expect("encode");
        let json = serde_json::to_string(&evt).expect("serialize");
        let back: Event = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(back.event_type, "ping");
        assert_eq!(back.trace_id, "");
        assert_eq!(back.decode_payload::<Ping>().expect("decode"), Ping { n: 7 });
    }

    #[test]
    fn error_event_type_embeds_trace_id() {
        let evt = Event::new_error("abc123", "bad stuff");
        assert_eq!(evt.event_type, "error_abc123");
        assert_eq!(evt.trace_id, "abc123");
        assert_eq!(evt.payload["message"], "bad stuff");
    }
}
