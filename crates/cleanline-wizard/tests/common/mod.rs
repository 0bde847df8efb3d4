/*
[INPUT]:  Test scenarios needing controllable commit latency
[OUTPUT]: Shared step ids, gated commit action and polling helpers
[POS]:    Test infrastructure - shared across wizard integration tests
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for cleanline-wizard tests

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use cleanline_wizard::{CommitAction, CommitError, Fields, GuardedWizard, StepId};
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    One,
    Two,
    Three,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Commit that blocks until released, counting invocations
#[derive(Default)]
pub struct GatedCommit {
    gate: Notify,
    calls: AtomicUsize,
}

impl GatedCommit {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommitAction for GatedCommit {
    async fn commit(&self, _fields: &Fields) -> Result<(), CommitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(())
    }
}

/// Yield until the wizard reports a pending commit
pub async fn wait_in_flight<S: StepId>(wizard: &GuardedWizard<S>) {
    while !wizard.is_in_flight().await {
        tokio::task::yield_now().await;
    }
}
