/*
[INPUT]:  Raw WebSocket text frames `{"event": ..., "data": ...}`
[OUTPUT]: Typed client/server events
[POS]:    WebSocket layer - event framing and parsing
[UPDATE]: When adding new event types or changing payload shape
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BroadcastTarget, Role};

/// Sent once after connecting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    pub user_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    pub sender_id: String,
    pub receiver_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastMessage {
    pub sender_id: String,
    pub target: BroadcastTarget,
    pub text: String,
    pub subject: String,
    pub timestamp: DateTime<Utc>,
}

/// Events emitted by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Join(JoinPayload),
    SendMessage(DirectMessage),
    BroadcastMessage(BroadcastMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    #[serde(default, alias = "message")]
    pub body: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedMessage {
    pub sender_id: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Events delivered by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    NewNotification(Notification),
    ReceiveMessage(ReceivedMessage),
    Other { event: String },
    /// Raised locally when the connection drops; never parsed from a frame
    Disconnected,
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl ServerEvent {
    /// Parse a text frame. Unknown event names become `Other`.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_str(text)?;
        match envelope.event.as_str() {
            "new_notification" => Ok(ServerEvent::NewNotification(serde_json::from_value(
                envelope.data,
            )?)),
            "receive_message" => Ok(ServerEvent::ReceiveMessage(serde_json::from_value(
                envelope.data,
            )?)),
            _ => Ok(ServerEvent::Other {
                event: envelope.event,
            }),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ServerEvent::NewNotification(_) => "new_notification",
            ServerEvent::ReceiveMessage(_) => "receive_message",
            ServerEvent::Other { event } => event,
            ServerEvent::Disconnected => "disconnected",
        }
    }

    /// Title and body for a toast, if the event is displayable
    pub fn display(&self) -> Option<(String, String)> {
        match self {
            ServerEvent::NewNotification(n) => Some((n.title.clone(), n.body.clone())),
            ServerEvent::ReceiveMessage(m) => {
                let title = m
                    .subject
                    .clone()
                    .or_else(|| m.sender_name.as_ref().map(|name| format!("Message from {name}")))
                    .unwrap_or_else(|| format!("Message from {}", m.sender_id));
                Some((title, m.text.clone()))
            }
            ServerEvent::Disconnected => Some((
                "Connection lost".to_string(),
                "Live updates stopped; sign in again to reconnect".to_string(),
            )),
            ServerEvent::Other { .. } => None,
        }
    }
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Join(_) => "join",
            ClientEvent::SendMessage(_) => "send_message",
            ClientEvent::BroadcastMessage(_) => "broadcast_message",
        }
    }
}
