/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public cleanline adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod session;
pub mod types;
pub mod ws;

// Re-export commonly used types from auth
pub use auth::{AuthManager, SessionToken, TokenStore};

// Re-export commonly used types from http
pub use http::{AdapterError, ClientConfig, CleanlineClient, Result};

pub use session::Session;

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{
    BroadcastMessage, ClientEvent, DirectMessage, JoinPayload, Notification, RealtimeClient,
    ReceivedMessage, ServerEvent,
};
