/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public cleanline wizard crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod checklist;
pub mod commit;
pub mod error;
pub mod fields;
pub mod flows;
pub mod job;
pub mod machine;
pub mod sanitize;
pub mod step;
pub mod validate;

pub use checklist::{ChecklistTask, TaskChecklist, TaskId};
pub use commit::{CommitAction, SimulatedCommit, commit_fn};
pub use error::{ChecklistError, CommitError, ValidationError, WizardError};
pub use fields::Fields;
pub use job::{JobSummary, JobVisit};
pub use machine::{DEFAULT_COMMIT_TIMEOUT, GuardedWizard, Position, Transition, WizardState};
pub use step::{StepId, WizardStep};
pub use validate::Validator;

/// Result type alias for wizard operations
pub type Result<T> = std::result::Result<T, WizardError>;
