/*
[INPUT]:  Session tokens and expiration timestamps
[OUTPUT]: Token retrieval and expiration status
[POS]:    Auth layer - token lifecycle management
[UPDATE]: When adding token refresh or changing storage strategy
*/

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::types::UserInfo;

/// Stored token data with identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub token: String,
    pub user: UserInfo,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Thread-safe session token store
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    data: Arc<RwLock<Option<SessionToken>>>,
}

impl TokenStore {
    /// Create a new empty token store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new token with expiration
    pub fn set_token(&self, token: String, user: UserInfo, expires_seconds: u64) -> SessionToken {
        let expires_at = Utc::now() + Duration::seconds(expires_seconds as i64);
        let session = SessionToken {
            token,
            user,
            expires_at,
        };

        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(session.clone());
        session
    }

    /// Get the current token if available
    pub fn get_token(&self) -> Option<String> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().map(|data| data.token.clone())
    }

    /// Authenticated user, if any
    pub fn user(&self) -> Option<UserInfo> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().map(|data| data.user.clone())
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(data) => data.is_expired_at(Utc::now()),
            None => true,
        }
    }

    /// Get token data if available
    pub fn session(&self) -> Option<SessionToken> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// Clear the stored token
    pub fn clear(&self) {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn user() -> UserInfo {
        UserInfo {
            id: "u-1".to_string(),
            role: Role::Customer,
            name: None,
            email: None,
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = TokenStore::new();
        assert!(store.get_token().is_none());
        assert!(store.user().is_none());
        assert!(store.is_expired());
    }

    #[test]
    fn test_set_and_get_token() {
        let store = TokenStore::new();
        store.set_token("test_token".to_string(), user(), 3600);

        assert_eq!(store.get_token(), Some("test_token".to_string()));
        assert_eq!(store.user().map(|u| u.role), Some(Role::Customer));
        assert!(!store.is_expired());
    }

    #[test]
    fn test_clones_share_state() {
        let store = TokenStore::new();
        let view = store.clone();
        store.set_token("test_token".to_string(), user(), 3600);
        assert!(view.get_token().is_some());

        view.clear();
        assert!(store.get_token().is_none());
        assert!(store.is_expired());
    }

    #[test]
    fn test_expiry_boundary() {
        let store = TokenStore::new();
        let session = store.set_token("t".to_string(), user(), 60);
        assert!(!session.is_expired_at(session.expires_at));
        assert!(session.is_expired_at(session.expires_at + Duration::seconds(1)));
    }
}
