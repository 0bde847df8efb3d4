/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for cleanline-adapter tests

#![allow(dead_code)]

use std::time::Duration;

use cleanline_adapter::{AuthManager, ClientConfig, CleanlineClient};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn client_for(server: &MockServer) -> CleanlineClient {
    let config = ClientConfig {
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
    };
    CleanlineClient::with_config_and_base_url(config, &server.uri()).unwrap()
}

pub fn auth_for(server: &MockServer) -> AuthManager {
    AuthManager::new(client_for(server))
}

/// Mock session token for testing
pub fn mock_token() -> String {
    "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test.signature".to_string()
}

pub fn login_body(user_id: &str, role: &str) -> Value {
    json!({
        "user": { "id": user_id, "role": role, "name": "Jane" },
        "token": mock_token(),
    })
}

/// Mount a successful login for any credentials
pub async fn mount_login(server: &MockServer, user_id: &str, role: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body(user_id, role)))
        .mount(server)
        .await;
}

/// Single-connection realtime server running in-process
pub struct RealtimeTestServer {
    pub url: String,
    /// Text frames received from the client
    pub received: mpsc::UnboundedReceiver<String>,
    /// Text frames to push to the client
    pub push: mpsc::UnboundedSender<String>,
}

impl RealtimeTestServer {
    pub async fn start() -> Self {
        Self::spawn(false).await
    }

    /// Completes the handshake and immediately closes the socket
    pub async fn start_closing() -> Self {
        Self::spawn(true).await
    }

    async fn spawn(hang_up: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (received_tx, received) = mpsc::unbounded_channel();
        let (push, mut push_rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            if hang_up {
                let _ = ws.close(None).await;
                return;
            }
            let (mut write, mut read) = ws.split();
            loop {
                tokio::select! {
                    outgoing = push_rx.recv() => match outgoing {
                        Some(text) => {
                            if write.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                    incoming = read.next() => match incoming {
                        Some(Ok(Message::Text(text))) => {
                            let _ = received_tx.send(text.to_string());
                        }
                        Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                        Some(Ok(_)) => {}
                    },
                }
            }
        });

        Self {
            url: format!("ws://{addr}"),
            received,
            push,
        }
    }

    /// Next frame from the client, decoded as JSON
    pub async fn next_frame(&mut self) -> Value {
        let text = tokio::time::timeout(Duration::from_secs(5), self.received.recv())
            .await
            .expect("timed out waiting for client frame")
            .expect("client closed");
        serde_json::from_str(&text).unwrap()
    }

    /// Wait until the server side of the connection has finished
    pub async fn wait_closed(&mut self) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.received.recv().await.is_some() {}
        })
        .await
        .expect("timed out waiting for server to close");
    }

    pub fn send(&self, frame: Value) {
        self.push.send(frame.to_string()).unwrap();
    }
}
