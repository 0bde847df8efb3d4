/*
[INPUT]:  Job configuration, shutdown token
[OUTPUT]: Arrival check, checklist and time/pay summary in the terminal
[POS]:    CLI layer - cleaner's on-site job screen
[UPDATE]: When job steps or the summary layout change
*/

use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use cleanline_cli::config::JobConfig;
use cleanline_cli::{CleanlineConfig, VisitTracker};
use cleanline_wizard::flows::arrival::{ACCESS_PIN, PROPERTY_CODE};
use cleanline_wizard::flows::{JobCompletionFlow, JobStep};
use cleanline_wizard::job::format_elapsed;
use cleanline_wizard::{JobVisit, Position, TaskChecklist};
use console::style;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::prompt;

pub async fn run(
    config: &CleanlineConfig,
    job: &JobConfig,
    shutdown: CancellationToken,
) -> Result<()> {
    println!("{}", style(&job.title).bold());

    let tracker = VisitTracker::new(
        JobVisit::new(&job.id, job.hourly_rate),
        config.simulated_delay(),
    );
    let wizard = Arc::new(
        JobCompletionFlow::new(job.reference(), job.tasks.clone())
            .report_arrival(tracker.arrival_commit())
            .report_completion(tracker.completion_commit())
            .build()?
            .with_commit_timeout(config.commit_timeout())
            .on_dismiss(|| println!("{}", style("Job closed").yellow())),
    );
    prompt::cancel_on_shutdown(wizard.clone(), shutdown);

    loop {
        let state = wizard.state().await;
        let Position::Step(step) = state.position else {
            break;
        };
        if let Some(definition) = wizard.step(step) {
            prompt::step_header(&wizard, definition);
        }

        match step {
            JobStep::Arrival => {
                let code = prompt::text("Property code")?;
                let pin = prompt::password("Access PIN")?;
                wizard.update_field(PROPERTY_CODE, code.trim()).await;
                wizard.update_field(ACCESS_PIN, pin.trim()).await;
            }
            JobStep::Checklist => {
                let checklist = state.fields.checklist();
                let mut items = checklist_items(checklist);
                let finish = items.len();
                items.push("Finish job".to_string());
                items.push("Back".to_string());

                let choice = prompt::choose("Tasks", &items)?;
                if choice < finish {
                    if let Some(task) = checklist.tasks().get(choice) {
                        if let Err(err) = wizard.toggle_task(task.id).await {
                            prompt::banner(&err.to_string());
                        }
                    }
                    continue;
                }
                if choice > finish {
                    wizard.request_back().await;
                    continue;
                }
            }
            JobStep::Complete => {
                let summary = tracker.summary(state.fields.checklist(), Utc::now());
                println!(
                    "Time on site: {}",
                    style(format_elapsed(Duration::minutes(summary.elapsed_minutes))).cyan()
                );
                println!("Earned: {}", style(format!("${}", summary.earned)).green());
                println!("Tasks: {}% complete", summary.percent_complete);
                info!(
                    job_id = %summary.job_id,
                    elapsed_minutes = summary.elapsed_minutes,
                    earned = %summary.earned,
                    "job summary"
                );
            }
        }

        prompt::report(wizard.request_advance().await);
    }

    Ok(())
}

fn checklist_items(checklist: &TaskChecklist) -> Vec<String> {
    checklist
        .tasks()
        .iter()
        .map(|task| {
            let mark = if task.completed { "x" } else { " " };
            format!("[{mark}] {}", task.description)
        })
        .collect()
}
