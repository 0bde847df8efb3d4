/*
[INPUT]:  Arrival reference, task descriptions, optional reporting commits
[OUTPUT]: Three-step job wizard (arrival -> checklist -> complete)
[POS]:    Flow layer - cleaner's on-site job screen
[UPDATE]: When job steps or reporting hooks change
*/

use std::fmt;
use std::sync::Arc;

use crate::checklist::TaskChecklist;
use crate::commit::CommitAction;
use crate::error::WizardError;
use crate::fields::Fields;
use crate::flows::arrival::{ArrivalReference, arrival_step};
use crate::machine::GuardedWizard;
use crate::step::WizardStep;
use crate::validate::checklist_complete;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStep {
    Arrival,
    Checklist,
    Complete,
}

impl fmt::Display for JobStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStep::Arrival => "arrival",
            JobStep::Checklist => "checklist",
            JobStep::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Builder for the job wizard
pub struct JobCompletionFlow {
    reference: ArrivalReference,
    tasks: Vec<String>,
    report_arrival: Option<Arc<dyn CommitAction>>,
    report_completion: Option<Arc<dyn CommitAction>>,
}

impl JobCompletionFlow {
    pub fn new<I, T>(reference: ArrivalReference, tasks: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            reference,
            tasks: tasks.into_iter().map(Into::into).collect(),
            report_arrival: None,
            report_completion: None,
        }
    }

    /// Commit run once arrival is verified
    pub fn report_arrival(mut self, action: Arc<dyn CommitAction>) -> Self {
        self.report_arrival = Some(action);
        self
    }

    /// Commit run once every task is checked off
    pub fn report_completion(mut self, action: Arc<dyn CommitAction>) -> Self {
        self.report_completion = Some(action);
        self
    }

    pub fn build(self) -> Result<GuardedWizard<JobStep>, WizardError> {
        let mut arrival = arrival_step(JobStep::Arrival, &self.reference);
        if let Some(action) = self.report_arrival {
            arrival = arrival.commit(action);
        }

        let mut checklist = WizardStep::new(JobStep::Checklist, "Complete the checklist")
            .hint("Mark each task done as you finish it")
            .validate(checklist_complete());
        if let Some(action) = self.report_completion {
            checklist = checklist.commit(action);
        }

        let complete = WizardStep::new(JobStep::Complete, "Job complete")
            .hint("Review time on site and earnings");

        let initial = Fields::new().with_checklist(TaskChecklist::from_descriptions(self.tasks));
        GuardedWizard::new(vec![arrival, checklist, complete], initial)
    }
}
