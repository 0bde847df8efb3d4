/*
[INPUT]:  Step identifier, validator and optional commit action
[OUTPUT]: Declarative step table entries for GuardedWizard
[POS]:    Wizard domain - step definition
[UPDATE]: When steps gain new attributes
*/

use std::fmt;
use std::sync::Arc;

use crate::commit::CommitAction;
use crate::error::ValidationError;
use crate::fields::Fields;
use crate::validate::Validator;

/// Identifier of a wizard step, usually a small per-flow enum
pub trait StepId: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> StepId for T where T: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {}

/// One entry of a wizard's step table
#[derive(Clone)]
pub struct WizardStep<S: StepId> {
    id: S,
    title: String,
    hint: Option<String>,
    validator: Option<Validator>,
    commit: Option<Arc<dyn CommitAction>>,
    resend: Option<Arc<dyn CommitAction>>,
}

impl<S: StepId> WizardStep<S> {
    /// A step that always accepts and commits nothing
    pub fn new(id: S, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            hint: None,
            validator: None,
            commit: None,
            resend: None,
        }
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn commit(mut self, action: Arc<dyn CommitAction>) -> Self {
        self.commit = Some(action);
        self
    }

    /// Action for "resend" on this step; defaults to the commit action
    pub fn resend(mut self, action: Arc<dyn CommitAction>) -> Self {
        self.resend = Some(action);
        self
    }

    pub fn id(&self) -> S {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn hint_text(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn has_commit(&self) -> bool {
        self.commit.is_some()
    }

    pub(crate) fn commit_action(&self) -> Option<Arc<dyn CommitAction>> {
        self.commit.clone()
    }

    pub(crate) fn resend_action(&self) -> Option<Arc<dyn CommitAction>> {
        self.resend.clone().or_else(|| self.commit.clone())
    }

    /// Run the validator; steps without one always pass
    pub fn check(&self, fields: &Fields) -> Result<(), ValidationError> {
        match &self.validator {
            Some(validator) => validator(fields),
            None => Ok(()),
        }
    }
}

impl<S: StepId> fmt::Debug for WizardStep<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardStep")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("validated", &self.validator.is_some())
            .field("commits", &self.commit.is_some())
            .finish()
    }
}
