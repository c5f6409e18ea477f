//! hubhook console host
//!
//! Drives the dispatcher from stdin so scripts and admin commands can be
//! exercised without a hub. A tokio interval raises `OnTimer`.

mod console;
mod scripts;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Interval;
use tracing_subscriber::{EnvFilter, fmt};

use hubhook_core::config::AppConfig;
use hubhook_core::config::logging::LoggingConfig;
use hubhook_core::AppResult;
use hubhook_dispatch::{Notifier, NotifyError, ScriptManager};

use crate::console::ConsoleLine;

/// Console host for the hubhook dispatcher.
#[derive(Debug, Parser)]
#[command(name = "hubhook", version, about)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(long, default_value = "config/default.toml")]
    config: String,

    /// Word that makes the built-in word filter block chat and PMs.
    #[arg(long = "block-word")]
    block_words: Vec<String>,
}

/// Prints private notices to stdout.
struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, recipient: &str, text: &str) -> Result<(), NotifyError> {
        println!("[pm -> {recipient}] {text}");
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(config, cli).await {
        tracing::error!("Console host error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

async fn run(config: AppConfig, cli: Cli) -> AppResult<()> {
    tracing::info!("Starting hubhook v{}", env!("CARGO_PKG_VERSION"));

    let manager = Arc::new(ScriptManager::with_config(
        &config.dispatcher,
        Arc::new(StdoutNotifier),
    ));
    scripts::register_builtin(&manager, &cli.block_words);

    let interval_ms = config.console.timer_interval_ms;
    let mut ticker = (interval_ms > 0)
        .then(|| tokio::time::interval(Duration::from_millis(interval_ms)));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match console::parse(&line) {
                    Ok(ConsoleLine::Quit) => break,
                    Ok(action) => handle(&manager, action)?,
                    Err(e) => eprintln!("{}", e.message),
                }
            }
            _ = tick(&mut ticker) => {
                manager.on_timer(interval_ms);
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    let removed = manager.shutdown();
    tracing::info!(removed, "hubhook console host stopped");
    Ok(())
}

fn handle(manager: &ScriptManager, line: ConsoleLine) -> AppResult<()> {
    let verdict = match line {
        ConsoleLine::Empty | ConsoleLine::Quit => return Ok(()),
        ConsoleLine::Stats => {
            println!("{}", serde_json::to_string_pretty(&manager.stats())?);
            return Ok(());
        }
        ConsoleLine::Chat { nick, text } => manager.on_parsed_msg_chat(&nick, &text),
        ConsoleLine::Pm { nick, to, text } => manager.on_parsed_msg_pm(&nick, &text, &to),
        ConsoleLine::Login { nick } => manager.on_user_login(&nick),
        ConsoleLine::Logout { nick } => manager.on_user_logout(&nick),
        ConsoleLine::Command {
            nick,
            class,
            command,
        } => manager.on_hub_command(&nick, &command, class, true, "!"),
    };

    println!("{verdict}");
    Ok(())
}

async fn tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
