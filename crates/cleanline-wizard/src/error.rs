/*
[INPUT]:  Failure sources (validators, commit actions, checklist edits)
[OUTPUT]: Structured, recoverable error types for the wizard
[POS]:    Error handling layer - unified error types for the wizard crate
[UPDATE]: When adding validators, commit outcomes or new failure modes
*/

use std::time::Duration;

use thiserror::Error;

use crate::checklist::TaskId;

/// A step validator refused the current field values.
///
/// The `Display` output is the message rendered inline next to the form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{label} is required")]
    Required { label: String },

    #[error("{label} is not valid")]
    Invalid { label: String },

    #[error("{label} must be at least {min} characters")]
    TooShort { label: String, min: usize },

    #[error("{label} must be exactly {len} digits")]
    CodeLength { label: String, len: usize },

    /// Two fields that must agree do not.
    #[error("{message}")]
    Mismatch { message: String },

    /// A field does not match its expected reference value.
    #[error("{label} does not match our records")]
    ReferenceMismatch { label: String },

    #[error("There are no tasks to complete")]
    EmptyChecklist,

    #[error("Complete all tasks before finishing ({completed}/{total} done)")]
    ChecklistIncomplete { completed: usize, total: usize },
}

/// An asynchronous commit action did not succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    /// The collaborator answered and refused the request
    #[error("{0}")]
    Rejected(String),

    /// The collaborator could not be reached or failed unexpectedly
    #[error("Service unavailable: {0}")]
    Collaborator(String),

    #[error("Request timed out after {}s", .after.as_secs())]
    Timeout { after: Duration },

    /// The wizard was reset or cancelled while the commit was pending
    #[error("Request cancelled")]
    Cancelled,
}

impl CommitError {
    /// Check if retrying the same commit can reasonably succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CommitError::Collaborator(_) | CommitError::Timeout { .. }
        )
    }
}

/// Checklist edit errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChecklistError {
    #[error("Unknown task id {id}")]
    UnknownTask { id: TaskId },
}

/// Main error type for wizard operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("A wizard needs at least one step")]
    EmptySequence,

    #[error("Duplicate step identifier: {step}")]
    DuplicateStep { step: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Checklist(#[from] ChecklistError),

    #[error("Step {step} has nothing to resend")]
    NothingToResend { step: String },
}

impl WizardError {
    /// Check if the user can fix the error by editing the form
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, WizardError::Validation(_))
    }
}
