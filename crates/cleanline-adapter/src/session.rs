/*
[INPUT]:  AuthManager, credentials and realtime URL
[OUTPUT]: Signed-in session with a joined realtime channel
[POS]:    Session layer - identity shared by every screen
[UPDATE]: When session lifecycle or realtime joins change
*/

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::auth::{AuthManager, SessionToken, TokenStore};
use crate::http::{AdapterError, Result};
use crate::types::{BroadcastTarget, Role, UserInfo};
use crate::ws::{BroadcastMessage, ClientEvent, DirectMessage, RealtimeClient, ServerEvent};

/// Authenticated identity plus the realtime connection opened for it.
///
/// Established after login and torn down on logout. Listeners subscribe
/// through [`Session::subscribe`]; they never own the connection.
#[derive(Debug)]
pub struct Session {
    identity: SessionToken,
    tokens: TokenStore,
    realtime: RealtimeClient,
}

impl Session {
    /// Sign in, connect to the realtime channel and join as the signed-in user
    pub async fn establish(
        auth: &AuthManager,
        email: &str,
        password: &str,
        realtime_url: &str,
    ) -> Result<Self> {
        let identity = auth.login(email, password).await?;
        let realtime = RealtimeClient::new();
        if let Err(err) = realtime.connect(realtime_url).await {
            auth.logout();
            return Err(err);
        }
        join_or_sign_out(auth, &realtime, &identity).await?;

        info!(user_id = %identity.user.id, "session established");
        Ok(Self {
            identity,
            tokens: auth.tokens().clone(),
            realtime,
        })
    }

    pub fn identity(&self) -> &UserInfo {
        &self.identity.user
    }

    pub fn user_id(&self) -> &str {
        &self.identity.user.id
    }

    pub fn role(&self) -> Role {
        self.identity.user.role
    }

    pub fn token(&self) -> &str {
        &self.identity.token
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.realtime.subscribe()
    }

    pub fn realtime(&self) -> &RealtimeClient {
        &self.realtime
    }

    pub async fn send_message(&self, receiver_id: &str, text: &str) -> Result<DirectMessage> {
        if text.trim().is_empty() {
            return Err(AdapterError::InvalidInput("Message text is required".to_string()));
        }
        let message = DirectMessage {
            sender_id: self.user_id().to_string(),
            receiver_id: receiver_id.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
        };
        self.realtime
            .emit(&ClientEvent::SendMessage(message.clone()))
            .await?;
        Ok(message)
    }

    /// Admin-only announcement to a role group
    pub async fn broadcast(
        &self,
        target: BroadcastTarget,
        subject: &str,
        text: &str,
    ) -> Result<BroadcastMessage> {
        if !self.role().can_broadcast() {
            return Err(AdapterError::Forbidden(format!(
                "role {} cannot send broadcasts",
                self.role()
            )));
        }
        if subject.trim().is_empty() || text.trim().is_empty() {
            return Err(AdapterError::InvalidInput(
                "Broadcast subject and text are required".to_string(),
            ));
        }

        let message = BroadcastMessage {
            sender_id: self.user_id().to_string(),
            target,
            text: text.to_string(),
            subject: subject.to_string(),
            timestamp: Utc::now(),
        };
        self.realtime
            .emit(&ClientEvent::BroadcastMessage(message.clone()))
            .await?;
        Ok(message)
    }

    /// Disconnect and forget the identity
    pub async fn close(self) {
        self.realtime.disconnect().await;
        self.tokens.clear();
        info!(user_id = %self.identity.user.id, "session closed");
    }
}

/// A failed join leaves neither a socket nor a signed-in identity behind
async fn join_or_sign_out(
    auth: &AuthManager,
    realtime: &RealtimeClient,
    identity: &SessionToken,
) -> Result<()> {
    if let Err(err) = realtime.join(&identity.user.id, identity.user.role).await {
        warn!(user_id = %identity.user.id, error = %err, "realtime join failed");
        realtime.disconnect().await;
        auth.logout();
        return Err(err);
    }
    Ok(())
}
