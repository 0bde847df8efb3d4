/*
[INPUT]:  Email/password credentials and HTTP client
[OUTPUT]: Authenticated session token
[POS]:    Auth layer - orchestrates login and logout
[UPDATE]: When auth endpoints or flow steps change
*/

use tracing::info;

use crate::http::{AdapterError, CleanlineClient, Result};
use crate::types::LoginRequest;

use super::{SessionToken, TokenStore};

pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Manages sign-in state for one user of the app
#[derive(Debug, Clone)]
pub struct AuthManager {
    client: CleanlineClient,
    tokens: TokenStore,
    token_ttl_seconds: u64,
}

impl AuthManager {
    pub fn new(client: CleanlineClient) -> Self {
        Self::with_token_ttl(client, DEFAULT_TOKEN_TTL_SECONDS)
    }

    pub fn with_token_ttl(client: CleanlineClient, token_ttl_seconds: u64) -> Self {
        Self {
            client,
            tokens: TokenStore::new(),
            token_ttl_seconds,
        }
    }

    pub fn client(&self) -> &CleanlineClient {
        &self.client
    }

    /// Get the token store
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Sign in and store the resulting token
    ///
    /// 1. Reject blank credentials locally
    /// 2. POST /api/auth/login
    /// 3. Store token and identity
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionToken> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AdapterError::Authentication {
                message: "Email and password are required".to_string(),
            });
        }

        let response = self
            .client
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        info!(user_id = %response.user.id, role = %response.user.role, "signed in");
        Ok(self
            .tokens
            .set_token(response.token, response.user, self.token_ttl_seconds))
    }

    /// Current session, failing if absent or expired
    pub fn current(&self) -> Result<SessionToken> {
        let session = self
            .tokens
            .session()
            .ok_or_else(|| AdapterError::Authentication {
                message: "Not signed in".to_string(),
            })?;
        if self.tokens.is_expired() {
            return Err(AdapterError::TokenExpired);
        }
        Ok(session)
    }

    pub fn logout(&self) {
        if let Some(user) = self.tokens.user() {
            info!(user_id = %user.id, "signed out");
        }
        self.tokens.clear();
    }
}
