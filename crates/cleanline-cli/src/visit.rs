/*
[INPUT]:  Job configuration, wizard commit hooks, wall clock
[OUTPUT]: Recorded arrival/completion times and the completion summary
[POS]:    Job layer - bridges the job wizard to JobVisit bookkeeping
[UPDATE]: When job reporting gains a real backend call
*/

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use cleanline_wizard::{CommitAction, JobSummary, JobVisit, TaskChecklist, commit_fn};
use tracing::info;

/// Shared visit record updated by the job wizard's commits
#[derive(Debug, Clone)]
pub struct VisitTracker {
    visit: Arc<Mutex<JobVisit>>,
    delay: Duration,
}

impl VisitTracker {
    /// `delay` stands in for the report round trip
    pub fn new(visit: JobVisit, delay: Duration) -> Self {
        Self {
            visit: Arc::new(Mutex::new(visit)),
            delay,
        }
    }

    pub fn snapshot(&self) -> JobVisit {
        self.visit
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, f: impl FnOnce(&mut JobVisit)) {
        let mut guard = self.visit.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    pub fn arrival_commit(&self) -> Arc<dyn CommitAction> {
        let tracker = self.clone();
        commit_fn(move |_fields| {
            let tracker = tracker.clone();
            async move {
                tokio::time::sleep(tracker.delay).await;
                let now = Utc::now();
                tracker.record(|visit| visit.mark_arrived(now));
                info!(job_id = %tracker.snapshot().job_id, arrived_at = %now, "arrival recorded");
                Ok(())
            }
        })
    }

    pub fn completion_commit(&self) -> Arc<dyn CommitAction> {
        let tracker = self.clone();
        commit_fn(move |fields| {
            let tracker = tracker.clone();
            async move {
                tokio::time::sleep(tracker.delay).await;
                let now = Utc::now();
                tracker.record(|visit| visit.mark_completed(now));
                info!(
                    job_id = %tracker.snapshot().job_id,
                    tasks = fields.checklist().total(),
                    "completion recorded"
                );
                Ok(())
            }
        })
    }

    pub fn summary(&self, checklist: &TaskChecklist, now: DateTime<Utc>) -> JobSummary {
        self.snapshot().summary(checklist, now)
    }
}
