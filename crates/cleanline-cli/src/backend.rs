/*
[INPUT]:  CleanlineClient and password-reset wizard calls
[OUTPUT]: PasswordResetBackend backed by the HTTP API
[POS]:    Glue layer - adapter errors to wizard commit errors
[UPDATE]: When reset endpoints or error mapping change
*/

use std::time::Duration;

use async_trait::async_trait;
use cleanline_adapter::{AdapterError, CleanlineClient};
use cleanline_wizard::CommitError;
use cleanline_wizard::flows::PasswordResetBackend;
use tracing::warn;

/// Reset backend calling `/api/auth/*`
#[derive(Debug, Clone)]
pub struct HttpResetBackend {
    client: CleanlineClient,
}

impl HttpResetBackend {
    pub fn new(client: CleanlineClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PasswordResetBackend for HttpResetBackend {
    async fn request_code(&self, email: &str) -> Result<(), CommitError> {
        self.client
            .forgot_password(email)
            .await
            .map(|_| ())
            .map_err(to_commit_error)
    }

    async fn verify_code(&self, email: &str, code: &str) -> Result<(), CommitError> {
        self.client
            .verify_reset_code(email, code)
            .await
            .map(|_| ())
            .map_err(to_commit_error)
    }

    async fn set_password(
        &self,
        email: &str,
        code: &str,
        password: &str,
    ) -> Result<(), CommitError> {
        self.client
            .reset_password(email, code, password)
            .await
            .map(|_| ())
            .map_err(to_commit_error)
    }
}

/// Server refusals become `Rejected`; transport trouble becomes `Collaborator`
pub fn to_commit_error(err: AdapterError) -> CommitError {
    match err {
        AdapterError::Timeout { duration } => CommitError::Timeout {
            after: Duration::from_secs(duration),
        },
        AdapterError::Api { code, message } if code >= 500 => {
            warn!(code, error = %message, "password reset backend failed");
            CommitError::Collaborator(message)
        }
        AdapterError::Api { .. }
        | AdapterError::Authentication { .. }
        | AdapterError::Forbidden(_)
        | AdapterError::InvalidInput(_) => CommitError::Rejected(err.user_message()),
        AdapterError::RateLimit { retry_after } => CommitError::Collaborator(format!(
            "Too many attempts, try again in {retry_after}s"
        )),
        other => {
            warn!(error = %other, "password reset backend unavailable");
            CommitError::Collaborator(other.user_message())
        }
    }
}
