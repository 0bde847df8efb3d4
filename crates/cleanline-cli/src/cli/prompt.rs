/*
[INPUT]:  Wizard steps, outcomes and user keystrokes
[OUTPUT]: Styled terminal prompts and inline error banners
[POS]:    CLI layer - shared rendering for every wizard
[UPDATE]: When prompt style or outcome reporting changes
*/

use std::sync::Arc;

use anyhow::{Context, Result};
use cleanline_wizard::{GuardedWizard, StepId, Transition, WizardError, WizardStep};
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub fn text(label: &str) -> Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()
        .with_context(|| format!("read {label}"))
}

pub fn password(label: &str) -> Result<String> {
    Password::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .allow_empty_password(true)
        .interact()
        .with_context(|| format!("read {label}"))
}

pub fn choose<T: ToString>(label: &str, items: &[T]) -> Result<usize> {
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .items(items)
        .default(0)
        .interact()
        .with_context(|| format!("read {label}"))
}

/// Inline error line under the current step
pub fn banner(message: &str) {
    println!("{}", style(message).red());
}

pub fn step_header<S: StepId>(wizard: &GuardedWizard<S>, step: &WizardStep<S>) {
    let index = wizard
        .steps()
        .iter()
        .position(|candidate| candidate.id() == step.id())
        .unwrap_or(0);
    println!(
        "\n{} {}",
        style(format!("[{}/{}]", index + 1, wizard.steps().len())).dim(),
        style(step.title()).bold().cyan()
    );
    if let Some(hint) = step.hint_text() {
        println!("{}", style(hint).dim());
    }
}

/// Print the outcome of a wizard action; errors stay on the current step
pub fn report<S: StepId>(outcome: Result<Transition<S>, WizardError>) {
    match outcome {
        Ok(Transition::Resent { step }) => {
            println!("{}", style("Sent again").green());
            info!(step = %step, "commit resent");
        }
        Ok(_) => {}
        Err(err) => {
            if !err.is_user_correctable() {
                warn!(error = %err, "wizard action failed");
            }
            banner(&err.to_string());
        }
    }
}

/// Cancel the wizard when shutdown is requested
pub fn cancel_on_shutdown<S: StepId>(wizard: Arc<GuardedWizard<S>>, shutdown: CancellationToken) {
    tokio::spawn(async move {
        shutdown.cancelled().await;
        wizard.cancel().await;
    });
}
