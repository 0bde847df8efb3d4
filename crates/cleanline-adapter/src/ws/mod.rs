/*
[INPUT]:  Realtime URL, authenticated identity, outgoing chat payloads
[OUTPUT]: Notifications and chat messages fanned out to listeners
[POS]:    WebSocket layer - realtime notification channel
[UPDATE]: When adding new events or changing connection logic
*/

pub mod client;
pub mod message;

pub use client::RealtimeClient;
pub use message::{
    BroadcastMessage, ClientEvent, DirectMessage, JoinPayload, Notification, ReceivedMessage,
    ServerEvent,
};
