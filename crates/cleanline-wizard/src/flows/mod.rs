/*
[INPUT]:  Flow-specific step tables, validators and backends
[OUTPUT]: Ready-to-drive wizards for each multi-step screen
[POS]:    Flow layer - consumers of GuardedWizard
[UPDATE]: When adding or removing a multi-step screen
*/

pub mod arrival;
pub mod job_completion;
pub mod password_reset;

pub use arrival::{ArrivalReference, arrival_validator};
pub use job_completion::{JobCompletionFlow, JobStep};
pub use password_reset::{
    PasswordResetBackend, ResetStep, SimulatedResetBackend, password_reset_wizard,
};
