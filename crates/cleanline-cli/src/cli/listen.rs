/*
[INPUT]:  Configuration, email, shutdown token
[OUTPUT]: Notifications and messages printed as they arrive
[POS]:    CLI layer - signed-in session listener
[UPDATE]: When realtime events or their rendering change
*/

use anyhow::Result;
use cleanline_adapter::ServerEvent;
use cleanline_cli::CleanlineConfig;
use console::style;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{open_session, prompt};

pub async fn run(config: &CleanlineConfig, email: &str, shutdown: CancellationToken) -> Result<()> {
    let session = open_session(config, email).await?;
    let mut events = session.subscribe();
    println!(
        "Signed in as {} ({}). Press Ctrl-C to sign out.",
        style(session.identity().name.as_deref().unwrap_or(session.user_id())).bold(),
        session.role()
    );

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("shutdown requested");
                break;
            }
            event = events.recv() => match event {
                Ok(event) => {
                    if !render(&event) {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "listener fell behind; events dropped");
                }
                Err(RecvError::Closed) => {
                    warn!("realtime channel closed");
                    break;
                }
            },
        }
    }

    session.close().await;
    Ok(())
}

/// Print one event; false once the connection is gone
fn render(event: &ServerEvent) -> bool {
    if let ServerEvent::Disconnected = event {
        warn!("realtime channel dropped");
        if let Some((title, body)) = event.display() {
            prompt::banner(&format!("{title}. {body}"));
        }
        return false;
    }
    match event.display() {
        Some((title, body)) => {
            println!("{} {}", style(title).bold().cyan(), body);
        }
        None => debug!(event = event.name(), "event ignored"),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnect_stops_listening() {
        assert!(!render(&ServerEvent::Disconnected));
        assert!(render(&ServerEvent::Other {
            event: "typing".to_string()
        }));
    }
}
