/*
[INPUT]:  Snapshot of field values at the moment a step is submitted
[OUTPUT]: Success or a recoverable CommitError
[POS]:    Commit layer - asynchronous actions fired on gated transitions
[UPDATE]: When adding commit adapters or changing the commit contract
*/

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::CommitError;
use crate::fields::Fields;

/// Asynchronous action run when a step's validator accepts.
///
/// Implementations are fire-once per attempt: either the whole request took
/// effect or nothing did.
#[async_trait]
pub trait CommitAction: Send + Sync {
    async fn commit(&self, fields: &Fields) -> Result<(), CommitError>;
}

/// Fixed-delay stand-in for a network round trip
#[derive(Debug, Clone)]
pub struct SimulatedCommit {
    delay: Duration,
    outcome: Result<(), CommitError>,
}

impl SimulatedCommit {
    /// Resolve successfully after `delay`
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            outcome: Ok(()),
        }
    }

    /// Resolve with a rejection after `delay`
    pub fn failing(delay: Duration, message: impl Into<String>) -> Self {
        Self {
            delay,
            outcome: Err(CommitError::Rejected(message.into())),
        }
    }
}

#[async_trait]
impl CommitAction for SimulatedCommit {
    async fn commit(&self, _fields: &Fields) -> Result<(), CommitError> {
        debug!(delay_ms = self.delay.as_millis() as u64, "simulated commit");
        tokio::time::sleep(self.delay).await;
        self.outcome.clone()
    }
}

struct FnCommit<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> CommitAction for FnCommit<F>
where
    F: Fn(Fields) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), CommitError>> + Send + 'static,
{
    async fn commit(&self, fields: &Fields) -> Result<(), CommitError> {
        (self.f)(fields.clone()).await
    }
}

/// Adapt an async closure into a shareable [`CommitAction`]
pub fn commit_fn<F, Fut>(f: F) -> Arc<dyn CommitAction>
where
    F: Fn(Fields) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), CommitError>> + Send + 'static,
{
    Arc::new(FnCommit { f })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_simulated_commit_waits_then_resolves() {
        let commit = SimulatedCommit::new(Duration::from_millis(1500));
        let started = tokio::time::Instant::now();
        assert!(commit.commit(&Fields::new()).await.is_ok());
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_commit_failing() {
        let commit = SimulatedCommit::failing(Duration::from_millis(10), "nope");
        assert_eq!(
            commit.commit(&Fields::new()).await,
            Err(CommitError::Rejected("nope".to_string()))
        );
    }

    #[tokio::test]
    async fn test_commit_fn_sees_field_snapshot() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let commit = commit_fn(move |fields: Fields| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if fields.value("email").is_empty() {
                    return Err(CommitError::Rejected("missing email".to_string()));
                }
                Ok(())
            }
        });

        assert!(commit.commit(&Fields::new().with("email", "a@b.co")).await.is_ok());
        assert!(commit.commit(&Fields::new()).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
