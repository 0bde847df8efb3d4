/*
[INPUT]:  Configuration, sender email, recipient or audience, text
[OUTPUT]: One direct message or broadcast sent over the realtime channel
[POS]:    CLI layer - messaging commands
[UPDATE]: When message payloads change
*/

use anyhow::{Context, Result};
use cleanline_adapter::BroadcastTarget;
use cleanline_cli::CleanlineConfig;
use console::style;
use tracing::{info, warn};

use super::{open_session, prompt};

pub async fn send(config: &CleanlineConfig, email: &str, to: &str, text: &str) -> Result<()> {
    let session = open_session(config, email).await?;
    let result = session.send_message(to, text).await;
    session.close().await;

    let message = result
        .inspect_err(|err| {
            warn!(error = %err, "send message failed");
            prompt::banner(&err.user_message());
        })
        .context("send message")?;
    info!(receiver_id = %message.receiver_id, "message sent");
    println!("{}", style(format!("Message sent to {to}")).green());
    Ok(())
}

pub async fn broadcast(
    config: &CleanlineConfig,
    email: &str,
    target: BroadcastTarget,
    subject: &str,
    text: &str,
) -> Result<()> {
    let session = open_session(config, email).await?;
    let result = session.broadcast(target, subject, text).await;
    session.close().await;

    let message = result
        .inspect_err(|err| {
            warn!(error = %err, "send broadcast failed");
            prompt::banner(&err.user_message());
        })
        .context("send broadcast")?;
    info!(audience = ?message.target, subject = %message.subject, "broadcast sent");
    println!("{}", style("Broadcast sent").green());
    Ok(())
}
