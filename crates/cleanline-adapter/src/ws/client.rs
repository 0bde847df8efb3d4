/*
[INPUT]:  Realtime URL, join identity, outgoing events
[OUTPUT]: Server events fanned out to every subscribed listener
[POS]:    WebSocket layer - realtime connection handling
[UPDATE]: When adding new events or changing connection logic
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};

use crate::http::{AdapterError, Result};
use crate::types::Role;

use super::message::{ClientEvent, JoinPayload, ServerEvent};

const EVENT_BUFFER: usize = 100;
const MESSAGE_SAMPLE_LIMIT: usize = 3;
const PARSE_FAIL_LOG_LIMIT: usize = 3;
const RAW_LOG_MAX_BYTES: usize = 1024;

static MESSAGE_SAMPLE_COUNT: AtomicUsize = AtomicUsize::new(0);
static PARSE_FAIL_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Realtime channel client.
///
/// One connection per signed-in user. Any number of listeners may call
/// [`RealtimeClient::subscribe`]; none of them own the connection.
#[derive(Debug)]
pub struct RealtimeClient {
    events_tx: broadcast::Sender<ServerEvent>,
    outbound_tx: Arc<Mutex<Option<mpsc::Sender<WsMessage>>>>,
    /// Bumped on every connect; a read loop only tears down its own connection
    generation: Arc<AtomicU64>,
}

impl RealtimeClient {
    /// Create a disconnected client
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            events_tx,
            outbound_tx: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Register a listener for server events
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.events_tx.subscribe()
    }

    pub async fn is_connected(&self) -> bool {
        self.outbound_tx.lock().await.is_some()
    }

    /// Open the connection and start the read/write loop
    pub async fn connect(&self, url: &str) -> Result<()> {
        let mut guard = self.outbound_tx.lock().await;
        if guard.is_some() {
            return Err(AdapterError::WebSocket(
                "realtime channel already connected".to_string(),
            ));
        }

        let (ws_stream, _response) = connect_async(url)
            .await
            .map_err(|err| AdapterError::WebSocket(err.to_string()))?;
        let (mut write, mut read) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::channel::<WsMessage>(EVENT_BUFFER);
        *guard = Some(outbound_tx);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        drop(guard);
        info!(url, "realtime channel connected");

        let events_tx = self.events_tx.clone();
        let outbound_state = self.outbound_tx.clone();
        let current_generation = self.generation.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    outbound = outbound_rx.recv() => {
                        match outbound {
                            Some(message) => {
                                if write.send(message).await.is_err() {
                                    break;
                                }
                            }
                            None => {
                                let _ = write.send(WsMessage::Close(None)).await;
                                break;
                            }
                        }
                    }
                    incoming = read.next() => {
                        match incoming {
                            Some(Ok(WsMessage::Close(_))) => {
                                let _ = write.send(WsMessage::Close(None)).await;
                                break;
                            }
                            Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {}
                            Some(Ok(message)) => {
                                if let Some(event) = parse_frame(message) {
                                    // No listeners is fine; events are dropped.
                                    let _ = events_tx.send(event);
                                }
                            }
                            Some(Err(err)) => {
                                warn!(error = %err, "realtime channel read failed");
                                break;
                            }
                            None => break,
                        }
                    }
                }
            }

            let mut guard = outbound_state.lock().await;
            if current_generation.load(Ordering::SeqCst) != generation {
                debug!(generation, "superseded realtime channel closed");
                return;
            }
            *guard = None;
            drop(guard);
            info!(generation, "realtime channel closed");
            let _ = events_tx.send(ServerEvent::Disconnected);
        });

        Ok(())
    }

    /// Announce the signed-in identity; must follow `connect`
    pub async fn join(&self, user_id: &str, role: Role) -> Result<()> {
        self.emit(&ClientEvent::Join(JoinPayload {
            user_id: user_id.to_string(),
            role,
        }))
        .await
    }

    /// Serialize and queue an event for sending
    pub async fn emit(&self, event: &ClientEvent) -> Result<()> {
        let sender = {
            let guard = self.outbound_tx.lock().await;
            guard.clone().ok_or(AdapterError::NotConnected)?
        };

        let text = serde_json::to_string(event)?;
        sender
            .send(WsMessage::Text(text.into()))
            .await
            .map_err(|_| AdapterError::NotConnected)?;

        debug!(event = event.name(), "realtime event sent");
        Ok(())
    }

    /// Close the connection; listeners receive [`ServerEvent::Disconnected`] once it is down
    pub async fn disconnect(&self) {
        let mut guard = self.outbound_tx.lock().await;
        if guard.take().is_some() {
            info!("realtime channel disconnect requested");
        }
    }
}

impl Default for RealtimeClient {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_frame(message: WsMessage) -> Option<ServerEvent> {
    let text: String = match message {
        WsMessage::Text(text) => text.to_string(),
        WsMessage::Binary(bytes) => String::from_utf8(bytes.to_vec()).ok()?,
        _ => return None,
    };

    match ServerEvent::parse(&text) {
        Ok(event) => {
            log_message_sample_once(&event);
            Some(event)
        }
        Err(err) => {
            log_parse_fail_once(&err, &text);
            None
        }
    }
}

fn log_message_sample_once(event: &ServerEvent) {
    let count = MESSAGE_SAMPLE_COUNT.fetch_add(1, Ordering::Relaxed);
    if count >= MESSAGE_SAMPLE_LIMIT {
        return;
    }
    info!(
        sample_index = count + 1,
        sample_limit = MESSAGE_SAMPLE_LIMIT,
        event = event.name(),
        "realtime event sample"
    );
}

fn log_parse_fail_once(err: &serde_json::Error, raw: &str) {
    let count = PARSE_FAIL_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < PARSE_FAIL_LOG_LIMIT {
        info!(
            sample_index = count + 1,
            sample_limit = PARSE_FAIL_LOG_LIMIT,
            error = %err,
            bytes = raw.len(),
            "realtime frame parse failed"
        );
        let preview = truncate_for_log(raw, RAW_LOG_MAX_BYTES);
        debug!(
            sample_index = count + 1,
            sample_limit = PARSE_FAIL_LOG_LIMIT,
            error = %err,
            message = %preview,
            "realtime frame parse failed"
        );
    }
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}
