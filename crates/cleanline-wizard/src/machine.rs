/*
[INPUT]:  Declarative step table, initial field values, user actions
[OUTPUT]: Guarded step transitions, in-flight commit tracking, inline errors
[POS]:    Wizard domain logic - finite-state stepper shared by every multi-step flow
[UPDATE]: When transition rules, commit policy or terminal handling change
*/

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::checklist::{TaskChecklist, TaskId};
use crate::commit::CommitAction;
use crate::error::{CommitError, WizardError};
use crate::fields::Fields;
use crate::step::{StepId, WizardStep};

/// Upper bound on a single commit attempt unless configured otherwise
pub const DEFAULT_COMMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the wizard currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position<S> {
    Step(S),
    Completed,
    Cancelled,
}

impl<S: Copy> Position<S> {
    pub fn step(&self) -> Option<S> {
        match self {
            Position::Step(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Position::Step(_))
    }
}

/// Effect of a user action on the wizard position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<S> {
    Advanced { from: S, to: S },
    Completed { from: S },
    Retreated { from: S, to: S },
    /// The step's commit ran again without moving
    Resent { step: S },
    Unchanged,
}

/// Snapshot of a wizard for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState<S> {
    pub position: Position<S>,
    pub fields: Fields,
    pub in_flight: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    At(usize),
    Completed,
    Cancelled,
}

struct Inner {
    cursor: Cursor,
    fields: Fields,
    in_flight: bool,
    error: Option<String>,
    // Bumped on every reset/cancel so stale commits cannot land.
    epoch: u64,
    cancel: CancellationToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitKind {
    Advance,
    Resend,
}

struct Pending<S> {
    action: Arc<dyn CommitAction>,
    snapshot: Fields,
    epoch: u64,
    token: CancellationToken,
    index: usize,
    from: S,
    next: Option<S>,
    kind: CommitKind,
}

impl Inner {
    fn fresh(initial: &Fields) -> Self {
        Self {
            cursor: Cursor::At(0),
            fields: initial.clone(),
            in_flight: false,
            error: None,
            epoch: 0,
            cancel: CancellationToken::new(),
        }
    }

    fn restart(&mut self, cursor: Cursor, initial: &Fields) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.epoch = self.epoch.wrapping_add(1);
        self.cursor = cursor;
        self.fields = initial.clone();
        self.in_flight = false;
        self.error = None;
    }

    fn begin_commit<S: StepId>(
        &mut self,
        action: Arc<dyn CommitAction>,
        steps: &[WizardStep<S>],
        index: usize,
        kind: CommitKind,
    ) -> Pending<S> {
        self.in_flight = true;
        Pending {
            action,
            snapshot: self.fields.clone(),
            epoch: self.epoch,
            token: self.cancel.clone(),
            index,
            from: steps[index].id(),
            next: steps.get(index + 1).map(WizardStep::id),
            kind,
        }
    }

    fn step_forward<S: StepId>(
        &mut self,
        index: usize,
        from: S,
        next: Option<S>,
    ) -> Transition<S> {
        match next {
            Some(to) => {
                self.cursor = Cursor::At(index + 1);
                info!(from = %from, to = %to, "wizard advanced");
                Transition::Advanced { from, to }
            }
            None => {
                self.cursor = Cursor::Completed;
                info!(from = %from, "wizard completed");
                Transition::Completed { from }
            }
        }
    }
}

/// Finite-state stepper with per-step validation gates and async commits.
///
/// All methods take `&self`; share an instance behind an `Arc` when a view
/// and background tasks need it at the same time. While a commit is pending,
/// `request_advance`, `request_back` and `resend_commit` are no-ops.
///
/// Commits run on their own task: dropping the future returned by
/// `request_advance` or `resend_commit` does not abandon the in-flight flag.
pub struct GuardedWizard<S: StepId> {
    steps: Vec<WizardStep<S>>,
    initial: Fields,
    commit_timeout: Duration,
    on_dismiss: Option<Arc<dyn Fn() + Send + Sync>>,
    inner: Arc<Mutex<Inner>>,
}

impl<S: StepId> GuardedWizard<S> {
    /// Initialize at the first declared step with `initial` field values
    pub fn new(steps: Vec<WizardStep<S>>, initial: Fields) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::EmptySequence);
        }
        for (i, step) in steps.iter().enumerate() {
            if steps[..i].iter().any(|prior| prior.id() == step.id()) {
                return Err(WizardError::DuplicateStep {
                    step: step.id().to_string(),
                });
            }
        }

        let inner = Inner::fresh(&initial);
        Ok(Self {
            steps,
            initial,
            commit_timeout: DEFAULT_COMMIT_TIMEOUT,
            on_dismiss: None,
            inner: Arc::new(Mutex::new(inner)),
        })
    }

    pub fn with_commit_timeout(mut self, timeout: Duration) -> Self {
        self.commit_timeout = timeout;
        self
    }

    /// Callback fired after `cancel()` so the owning view can close its container
    pub fn on_dismiss<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_dismiss = Some(Arc::new(f));
        self
    }

    pub fn steps(&self) -> &[WizardStep<S>] {
        &self.steps
    }

    pub fn step(&self, id: S) -> Option<&WizardStep<S>> {
        self.steps.iter().find(|step| step.id() == id)
    }

    pub fn commit_timeout(&self) -> Duration {
        self.commit_timeout
    }

    pub async fn state(&self) -> WizardState<S> {
        let inner = self.inner.lock().await;
        WizardState {
            position: self.position_of(inner.cursor),
            fields: inner.fields.clone(),
            in_flight: inner.in_flight,
            error: inner.error.clone(),
        }
    }

    pub async fn position(&self) -> Position<S> {
        let inner = self.inner.lock().await;
        self.position_of(inner.cursor)
    }

    pub async fn is_in_flight(&self) -> bool {
        self.inner.lock().await.in_flight
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.lock().await.error.clone()
    }

    /// Merge a field value; validation is deferred to the next advance
    pub async fn update_field(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.lock().await.fields.set(key, value);
    }

    pub async fn with_fields<R>(&self, f: impl FnOnce(&mut Fields) -> R) -> R {
        f(&mut self.inner.lock().await.fields)
    }

    pub async fn with_checklist<R>(&self, f: impl FnOnce(&mut TaskChecklist) -> R) -> R {
        f(self.inner.lock().await.fields.checklist_mut())
    }

    pub async fn toggle_task(&self, id: TaskId) -> Result<bool, WizardError> {
        Ok(self.with_checklist(|checklist| checklist.toggle(id)).await?)
    }

    /// Validate the active step and move forward, committing first if the step defines a commit
    pub async fn request_advance(&self) -> Result<Transition<S>, WizardError> {
        let pending = {
            let mut inner = self.inner.lock().await;
            if inner.in_flight {
                debug!("advance ignored while a commit is in flight");
                return Ok(Transition::Unchanged);
            }
            let Cursor::At(index) = inner.cursor else {
                return Ok(Transition::Unchanged);
            };

            let step = &self.steps[index];
            if let Err(err) = step.check(&inner.fields) {
                info!(step = %step.id(), error = %err, "step validation rejected");
                inner.error = Some(err.to_string());
                return Err(err.into());
            }
            inner.error = None;

            match step.commit_action() {
                Some(action) => {
                    inner.begin_commit(action, &self.steps, index, CommitKind::Advance)
                }
                None => {
                    let next = self.steps.get(index + 1).map(WizardStep::id);
                    return Ok(inner.step_forward(index, step.id(), next));
                }
            }
        };

        self.settle(pending).await
    }

    /// Move to the previous step without validation
    pub async fn request_back(&self) -> Transition<S> {
        let mut inner = self.inner.lock().await;
        if inner.in_flight {
            return Transition::Unchanged;
        }
        match inner.cursor {
            Cursor::At(index) if index > 0 => {
                inner.cursor = Cursor::At(index - 1);
                inner.error = None;
                let from = self.steps[index].id();
                let to = self.steps[index - 1].id();
                debug!(from = %from, to = %to, "wizard moved back");
                Transition::Retreated { from, to }
            }
            _ => Transition::Unchanged,
        }
    }

    /// Re-run the active step's resend (or commit) action without re-validating or moving
    pub async fn resend_commit(&self) -> Result<Transition<S>, WizardError> {
        let pending = {
            let mut inner = self.inner.lock().await;
            if inner.in_flight {
                return Ok(Transition::Unchanged);
            }
            let Cursor::At(index) = inner.cursor else {
                return Ok(Transition::Unchanged);
            };
            let step = &self.steps[index];
            let Some(action) = step.resend_action() else {
                return Err(WizardError::NothingToResend {
                    step: step.id().to_string(),
                });
            };
            inner.error = None;
            inner.begin_commit(action, &self.steps, index, CommitKind::Resend)
        };

        self.settle(pending).await
    }

    /// Return to the state produced by construction, aborting any pending commit
    pub async fn reset(&self) {
        self.inner
            .lock()
            .await
            .restart(Cursor::At(0), &self.initial);
        debug!("wizard reset");
    }

    /// Reset into the cancelled terminal and ask the owning view to dismiss
    pub async fn cancel(&self) {
        self.inner
            .lock()
            .await
            .restart(Cursor::Cancelled, &self.initial);
        info!("wizard cancelled");
        if let Some(dismiss) = &self.on_dismiss {
            dismiss();
        }
    }

    /// Run the commit on its own task and apply the outcome there, so the
    /// in-flight flag clears even if the caller stops waiting.
    async fn settle(&self, pending: Pending<S>) -> Result<Transition<S>, WizardError> {
        let inner = self.inner.clone();
        let timeout = self.commit_timeout;
        let epoch = pending.epoch;
        let step = pending.from;

        let handle = tokio::spawn(async move {
            let Pending {
                action,
                snapshot,
                epoch,
                token,
                index,
                from,
                next,
                kind,
            } = pending;

            let outcome = tokio::select! {
                _ = token.cancelled() => Err(CommitError::Cancelled),
                result = tokio::time::timeout(timeout, action.commit(&snapshot)) => {
                    result.unwrap_or(Err(CommitError::Timeout { after: timeout }))
                }
            };

            let mut inner = inner.lock().await;
            if inner.epoch != epoch {
                debug!("commit result discarded after reset");
                return Err(CommitError::Cancelled.into());
            }
            inner.in_flight = false;
            match (outcome, kind) {
                (Ok(()), CommitKind::Advance) => Ok(inner.step_forward(index, from, next)),
                (Ok(()), CommitKind::Resend) => {
                    info!(step = %from, "step commit resent");
                    Ok(Transition::Resent { step: from })
                }
                (Err(err), _) => {
                    warn!(step = %from, error = %err, "step commit failed");
                    inner.error = Some(err.to_string());
                    Err(err.into())
                }
            }
        });

        match handle.await {
            Ok(result) => result,
            Err(join_err) => {
                warn!(step = %step, error = %join_err, "step commit task failed");
                let err = CommitError::Collaborator("commit task failed".to_string());
                let mut inner = self.inner.lock().await;
                if inner.epoch == epoch {
                    inner.in_flight = false;
                    inner.error = Some(err.to_string());
                }
                Err(err.into())
            }
        }
    }

    fn position_of(&self, cursor: Cursor) -> Position<S> {
        match cursor {
            Cursor::At(index) => Position::Step(self.steps[index].id()),
            Cursor::Completed => Position::Completed,
            Cursor::Cancelled => Position::Cancelled,
        }
    }
}
