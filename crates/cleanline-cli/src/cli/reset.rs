/*
[INPUT]:  Configuration, optional simulated code, shutdown token
[OUTPUT]: Terminal-driven password reset wizard
[POS]:    CLI layer - forgot-password screen
[UPDATE]: When reset steps or prompts change
*/

use std::sync::Arc;

use anyhow::Result;
use cleanline_cli::{CleanlineConfig, HttpResetBackend};
use cleanline_wizard::flows::password_reset::{
    CODE, CODE_LENGTH, CONFIRM_PASSWORD, EMAIL, PASSWORD,
};
use cleanline_wizard::flows::{
    PasswordResetBackend, ResetStep, SimulatedResetBackend, password_reset_wizard,
};
use cleanline_wizard::sanitize::{digits_only, normalize_email};
use cleanline_wizard::{Position, Transition};
use console::style;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{client_from, prompt};

const CODE_ACTIONS: [&str; 3] = ["Enter code", "Resend code", "Back"];

pub async fn run(
    config: &CleanlineConfig,
    simulated_code: Option<String>,
    shutdown: CancellationToken,
) -> Result<()> {
    let backend: Arc<dyn PasswordResetBackend> = match simulated_code {
        Some(code) => {
            println!(
                "{}",
                style(format!("Simulated backend: the code is {code}")).dim()
            );
            Arc::new(SimulatedResetBackend::new(config.simulated_delay(), code))
        }
        None => Arc::new(HttpResetBackend::new(client_from(config)?)),
    };

    let wizard = Arc::new(
        password_reset_wizard(backend)?
            .with_commit_timeout(config.commit_timeout())
            .on_dismiss(|| println!("{}", style("Password reset cancelled").yellow())),
    );
    prompt::cancel_on_shutdown(wizard.clone(), shutdown);

    loop {
        let Position::Step(step) = wizard.position().await else {
            break;
        };
        if let Some(definition) = wizard.step(step) {
            prompt::step_header(&wizard, definition);
        }

        match step {
            ResetStep::Email => {
                let email = prompt::text("Email")?;
                wizard.update_field(EMAIL, normalize_email(&email)).await;
            }
            ResetStep::Code => match prompt::choose("Verification code", &CODE_ACTIONS)? {
                0 => {
                    let code = prompt::text("6-digit code")?;
                    wizard
                        .update_field(CODE, digits_only(&code, CODE_LENGTH))
                        .await;
                }
                1 => {
                    prompt::report(wizard.resend_commit().await);
                    continue;
                }
                _ => {
                    wizard.request_back().await;
                    continue;
                }
            },
            ResetStep::NewPassword => {
                let password = prompt::password("New password")?;
                let confirm = prompt::password("Confirm password")?;
                wizard.update_field(PASSWORD, password).await;
                wizard.update_field(CONFIRM_PASSWORD, confirm).await;
            }
            ResetStep::Success => {
                println!("{}", style("Your password has been updated.").green());
            }
        }

        let outcome = wizard.request_advance().await;
        if let Ok(Transition::Completed { .. }) = outcome {
            info!("password reset finished");
        }
        prompt::report(outcome);
    }

    Ok(())
}
