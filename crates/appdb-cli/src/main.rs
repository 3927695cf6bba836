use anyhow::Result;
use appdb_client::HttpUpdateService;
use appdb_config::{AppConfig, IgnoredApps};
use appdb_updates::{CheckSettings, UpdateCheckCoordinator, UpdateEvent, UpdatesError};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;

mod logger;
mod output;

#[derive(Debug, Parser)]
#[command(name = "appdb", about = "Check apps installed from appdb for updates")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check for updates (default)
    Check,
    /// Check for updates, then hide the update with this id
    Ignore { track_id: String },
    /// Show updates for an ignored app again
    Unignore { track_id: String },
    /// List ignored apps
    Ignored,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(cli.command.unwrap_or(Command::Check)).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<ExitCode> {
    let config = AppConfig::load();
    let store = Arc::new(IgnoredApps::load()?);
    log::debug!("Using ignored apps file {:?}", store.path());

    let service = Arc::new(HttpUpdateService::new(
        config.endpoint.clone(),
        config.link_token.clone(),
        config.language.clone(),
    ));
    let settings = CheckSettings {
        timeout_limit: config.timeout_limit,
        retry_delay: config.retry_delay(),
    };
    let (_badge_tx, badge_rx) = watch::channel(config.show_badge_for_updates);
    let coordinator =
        UpdateCheckCoordinator::spawn(service, store, Arc::new(config), settings, badge_rx);

    match command {
        Command::Check => {
            let _progress = spawn_progress_reporter(&coordinator);
            match coordinator.check_updates().await {
                Ok(partition) => {
                    print!(
                        "{}",
                        output::render_partition(&partition, coordinator.displayed_badge())
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report(&e)),
            }
        }
        Command::Ignore { track_id } => {
            if let Err(e) = coordinator.check_updates().await {
                return Ok(report(&e));
            }
            match coordinator.ignore(&track_id) {
                Ok(partition) => {
                    println!("Ignored {}", track_id);
                    print!(
                        "{}",
                        output::render_partition(&partition, coordinator.displayed_badge())
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report(&e)),
            }
        }
        Command::Unignore { track_id } => {
            let known = coordinator
                .ignored()
                .iter()
                .any(|entry| entry.track_id == track_id);
            if !known {
                eprintln!("{} is not ignored", track_id);
                return Ok(ExitCode::FAILURE);
            }
            match coordinator.unignore(&track_id) {
                Ok(_) => {
                    println!("No longer ignoring {}", track_id);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report(&e)),
            }
        }
        Command::Ignored => {
            print!("{}", output::render_ignored(&coordinator.ignored()));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(error: &UpdatesError) -> ExitCode {
    eprintln!("{}: {}", error.title(), error.detail());
    ExitCode::FAILURE
}

/// Tell the user a check is running; aborted when the returned guard drops
fn spawn_progress_reporter(coordinator: &UpdateCheckCoordinator) -> AbortOnDrop {
    let mut events = coordinator.subscribe();
    AbortOnDrop(tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                UpdateEvent::Loading => eprintln!("Checking for updates..."),
                event if event.is_terminal() => break,
                _ => {}
            }
        }
    }))
}

struct AbortOnDrop(tokio::task::JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
