/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Interactive wizards and realtime sessions with graceful shutdown
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, startup flow, or shutdown handling
*/

mod cli;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use cleanline_adapter::BroadcastTarget;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use cleanline_cli::CleanlineConfig;

#[derive(Parser, Debug)]
#[command(name = "cleanline", version, about = "Cleanline marketplace client")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", default_value = "cleanline.yaml", global = true)]
    config_path: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    #[arg(long = "dry-run", global = true)]
    dry_run: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter configuration file
    Init {
        #[arg(long, value_name = "PATH", default_value = "cleanline.yaml")]
        output: PathBuf,
    },
    /// Sign in and print notifications and messages until Ctrl-C
    Login {
        #[arg(long)]
        email: String,
    },
    /// Recover an account through the emailed verification code
    ResetPassword {
        /// Use a local simulated backend instead of the API
        #[arg(long)]
        simulate: bool,
        /// Code accepted by the simulated backend
        #[arg(long, default_value = "123456")]
        code: String,
    },
    /// Verify arrival, work the checklist and see time and pay
    CompleteJob {
        #[arg(long = "job", value_name = "ID")]
        job: String,
    },
    /// Send a direct message
    Send {
        #[arg(long)]
        email: String,
        #[arg(long, value_name = "USER_ID")]
        to: String,
        #[arg(long)]
        text: String,
    },
    /// Send an announcement to a role group (admin only)
    Broadcast {
        #[arg(long)]
        email: String,
        #[arg(long)]
        target: BroadcastTarget,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if let Some(Command::Init { output }) = &args.command {
        init_tracing(&args.log_level, None)?;
        return cli::init::run_init(output);
    }

    let config = load_config(&args.config_path)?;
    let _log_guard = init_tracing(&args.log_level, config.log_file.as_deref())?;

    info!(
        config_path = %args.config_path.display(),
        dry_run = args.dry_run,
        "starting cleanline"
    );
    info!(job_count = config.jobs.len(), "configuration loaded");

    let Some(command) = args.command else {
        info!("no command given; configuration validated");
        return Ok(());
    };
    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    match command {
        Command::Init { .. } => Ok(()),
        Command::Login { email } => cli::listen::run(&config, &email, shutdown).await,
        Command::ResetPassword { simulate, code } => {
            cli::reset::run(&config, simulate.then_some(code), shutdown).await
        }
        Command::CompleteJob { job } => {
            let job = config
                .job(&job)
                .with_context(|| format!("unknown job {job}"))?;
            cli::job::run(&config, job, shutdown).await
        }
        Command::Send { email, to, text } => {
            cli::message::send(&config, &email, &to, &text).await
        }
        Command::Broadcast {
            email,
            target,
            subject,
            text,
        } => cli::message::broadcast(&config, &email, target, &subject, &text).await,
    }
}

fn init_tracing(log_level: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|err| anyhow!(err))
            .context("initialize tracing subscriber")?;
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .context("log_file must name a file")?;
    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(Some(guard))
}

fn load_config(path: &Path) -> Result<CleanlineConfig> {
    let config = CleanlineConfig::from_file(path).context("load config")?;
    config.validate().context("validate config")?;
    Ok(config)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
