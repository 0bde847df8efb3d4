/*
[INPUT]:  Email, verification code, new password; a PasswordResetBackend
[OUTPUT]: Four-step reset wizard (email -> code -> new password -> success)
[POS]:    Flow layer - forgot-password screen
[UPDATE]: When reset steps, password policy or backend calls change
*/

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::commit::CommitAction;
use crate::error::{CommitError, WizardError};
use crate::fields::Fields;
use crate::machine::GuardedWizard;
use crate::step::WizardStep;
use crate::validate::{all, email, exact_digits, matching, min_len, required};

pub const CODE_LENGTH: usize = 6;
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const EMAIL: &str = "email";
pub const CODE: &str = "code";
pub const PASSWORD: &str = "password";
pub const CONFIRM_PASSWORD: &str = "confirm_password";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    Email,
    Code,
    NewPassword,
    Success,
}

impl fmt::Display for ResetStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResetStep::Email => "email",
            ResetStep::Code => "code",
            ResetStep::NewPassword => "new_password",
            ResetStep::Success => "success",
        };
        f.write_str(name)
    }
}

/// Server side of the reset flow. Code verification lives here, not in the wizard.
#[async_trait]
pub trait PasswordResetBackend: Send + Sync {
    async fn request_code(&self, email: &str) -> Result<(), CommitError>;

    async fn verify_code(&self, email: &str, code: &str) -> Result<(), CommitError>;

    async fn set_password(&self, email: &str, code: &str, password: &str)
    -> Result<(), CommitError>;
}

struct RequestCode(Arc<dyn PasswordResetBackend>);
struct VerifyCode(Arc<dyn PasswordResetBackend>);
struct SetPassword(Arc<dyn PasswordResetBackend>);

#[async_trait]
impl CommitAction for RequestCode {
    async fn commit(&self, fields: &Fields) -> Result<(), CommitError> {
        self.0.request_code(fields.value(EMAIL).trim()).await
    }
}

#[async_trait]
impl CommitAction for VerifyCode {
    async fn commit(&self, fields: &Fields) -> Result<(), CommitError> {
        self.0
            .verify_code(fields.value(EMAIL).trim(), fields.value(CODE))
            .await
    }
}

#[async_trait]
impl CommitAction for SetPassword {
    async fn commit(&self, fields: &Fields) -> Result<(), CommitError> {
        self.0
            .set_password(
                fields.value(EMAIL).trim(),
                fields.value(CODE),
                fields.value(PASSWORD),
            )
            .await
    }
}

/// Build the reset wizard. On the code step, `resend_commit()` asks the
/// backend for a fresh code.
pub fn password_reset_wizard(
    backend: Arc<dyn PasswordResetBackend>,
) -> Result<GuardedWizard<ResetStep>, WizardError> {
    let steps = vec![
        WizardStep::new(ResetStep::Email, "Forgot password")
            .hint("Enter the email address on your account")
            .validate(all(vec![
                required(EMAIL, "Email"),
                email(EMAIL, "Email"),
            ]))
            .commit(Arc::new(RequestCode(backend.clone()))),
        WizardStep::new(ResetStep::Code, "Enter verification code")
            .hint("We sent a 6-digit code to your email")
            .validate(all(vec![
                required(CODE, "Verification code"),
                exact_digits(CODE, "Verification code", CODE_LENGTH),
            ]))
            .commit(Arc::new(VerifyCode(backend.clone())))
            .resend(Arc::new(RequestCode(backend.clone()))),
        WizardStep::new(ResetStep::NewPassword, "Choose a new password")
            .hint("At least 8 characters")
            .validate(all(vec![
                required(PASSWORD, "Password"),
                required(CONFIRM_PASSWORD, "Password confirmation"),
                matching(PASSWORD, CONFIRM_PASSWORD, "Passwords do not match"),
                min_len(PASSWORD, "Password", MIN_PASSWORD_LENGTH),
            ]))
            .commit(Arc::new(SetPassword(backend))),
        WizardStep::new(ResetStep::Success, "Password updated")
            .hint("You can now sign in with your new password"),
    ];

    GuardedWizard::new(steps, Fields::new())
}

/// Fixed-latency backend accepting exactly one known code
#[derive(Debug, Clone)]
pub struct SimulatedResetBackend {
    delay: Duration,
    accepted_code: String,
}

impl SimulatedResetBackend {
    pub fn new(delay: Duration, accepted_code: impl Into<String>) -> Self {
        Self {
            delay,
            accepted_code: accepted_code.into(),
        }
    }
}

#[async_trait]
impl PasswordResetBackend for SimulatedResetBackend {
    async fn request_code(&self, _email: &str) -> Result<(), CommitError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn verify_code(&self, _email: &str, code: &str) -> Result<(), CommitError> {
        tokio::time::sleep(self.delay).await;
        if code == self.accepted_code {
            Ok(())
        } else {
            Err(CommitError::Rejected("Invalid verification code".to_string()))
        }
    }

    async fn set_password(
        &self,
        _email: &str,
        code: &str,
        _password: &str,
    ) -> Result<(), CommitError> {
        tokio::time::sleep(self.delay).await;
        if code == self.accepted_code {
            Ok(())
        } else {
            Err(CommitError::Rejected("Verification code expired".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{Position, Transition};

    fn wizard() -> GuardedWizard<ResetStep> {
        let backend = Arc::new(SimulatedResetBackend::new(Duration::ZERO, "123456"));
        password_reset_wizard(backend).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_email_stays() {
        let wizard = wizard();
        wizard.update_field(EMAIL, "not-an-email").await;
        assert!(wizard.request_advance().await.is_err());
        assert_eq!(wizard.position().await, Position::Step(ResetStep::Email));
        assert_eq!(wizard.error().await.as_deref(), Some("Email is not valid"));
    }

    #[tokio::test]
    async fn test_well_formed_but_wrong_code_is_rejected_by_backend() {
        let wizard = wizard();
        wizard.update_field(EMAIL, "jane@example.com").await;
        wizard.request_advance().await.unwrap();

        wizard.update_field(CODE, "654321").await;
        let err = wizard.request_advance().await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid verification code");
        assert_eq!(wizard.position().await, Position::Step(ResetStep::Code));
        assert!(!wizard.is_in_flight().await);

        wizard.update_field(CODE, "123456").await;
        assert_eq!(
            wizard.request_advance().await.unwrap(),
            Transition::Advanced {
                from: ResetStep::Code,
                to: ResetStep::NewPassword
            }
        );
    }

    #[tokio::test]
    async fn test_short_password() {
        let wizard = wizard();
        wizard.update_field(EMAIL, "jane@example.com").await;
        wizard.request_advance().await.unwrap();
        wizard.update_field(CODE, "123456").await;
        wizard.request_advance().await.unwrap();

        wizard.update_field(PASSWORD, "short").await;
        wizard.update_field(CONFIRM_PASSWORD, "short").await;
        assert!(wizard.request_advance().await.is_err());
        assert_eq!(
            wizard.error().await.as_deref(),
            Some("Password must be at least 8 characters")
        );
    }

    #[tokio::test]
    async fn test_resend_code_keeps_step() {
        let wizard = wizard();
        wizard.update_field(EMAIL, "jane@example.com").await;
        wizard.request_advance().await.unwrap();

        assert_eq!(
            wizard.resend_commit().await.unwrap(),
            Transition::Resent {
                step: ResetStep::Code
            }
        );
        assert_eq!(wizard.position().await, Position::Step(ResetStep::Code));
    }
}
