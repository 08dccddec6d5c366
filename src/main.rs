//! quickbench - simulated CPU, RAM and Disk benchmarks
//!
//! A small terminal app that:
//! - Shows a menu of three timed tests, each with a description of the host resource
//! - Runs a cancellable countdown and produces a simulated score
//! - Keeps every finished run in a local SQLite history

mod benchmark;
mod config;
mod dialogs;
mod export;
mod hardware;
mod logging;
mod storage;
mod tui;

use std::future::Future;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::{error, info};

use crate::benchmark::runner::{RunScheduler, RunnerEvent};
use crate::benchmark::score::SIMULATED_NOTE;
use crate::benchmark::view::{CompletedRun, Phase, TestView};
use crate::benchmark::TestKind;
use crate::config::Config;
use crate::hardware::EnvironmentInfo;
use crate::storage::{ResultStore, StoreError};

/// quickbench - simulated system benchmarks
#[derive(Parser)]
#[command(name = "quickbench")]
#[command(version)]
#[command(about = "Run simulated CPU, RAM and Disk tests and keep a local result history")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the fullscreen terminal UI (default)
    Tui,

    /// Run one test without the UI and print the result
    Run {
        /// Test kind: cpu, ram or disk
        kind: TestKind,

        /// Override the configured run duration
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        duration_secs: Option<u64>,

        /// Also write a text report. Without PATH it goes to the export
        /// directory; a directory PATH gets the default file name.
        #[arg(long, value_name = "PATH")]
        export: Option<Option<PathBuf>>,
    },

    /// Print all saved results, newest first
    History {
        /// Print records as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print general performance recommendations
    Recommendations,

    /// Print the detected CPU, RAM and Disk descriptions
    Detect,

    /// Show configuration and data paths
    Config {
        /// Write the default config file if it does not exist
        #[arg(long, default_value_t = false)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load()?;

    match cli.command {
        Some(Commands::Tui) | None => run_tui(&cfg)?,
        Some(Commands::Run {
            kind,
            duration_secs,
            export,
        }) => {
            logging::init_stderr(&cfg.logging.level);
            run_headless(&cfg, kind, duration_secs, export)?;
        }
        Some(Commands::History { json }) => {
            logging::init_stderr(&cfg.logging.level);
            print_history(&cfg, json)?;
        }
        Some(Commands::Recommendations) => {
            for (i, line) in dialogs::RECOMMENDATIONS.iter().enumerate() {
                if i == 0 {
                    println!("{}", line.bright_cyan().bold());
                } else {
                    println!("{line}");
                }
            }
        }
        Some(Commands::Detect) => {
            logging::init_stderr(&cfg.logging.level);
            let env = hardware::provider(cfg.environment.detect);
            print_environment(env.as_ref());
        }
        Some(Commands::Config { init }) => show_config_info(&cfg, init)?,
    }

    Ok(())
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

fn open_store(cfg: &Config) -> Result<ResultStore> {
    let path = cfg.database_path()?;
    ResultStore::open(&path)
        .with_context(|| format!("Failed to open result store at {}", path.display()))
}

fn run_tui(cfg: &Config) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!(
            "The terminal UI needs an interactive terminal. Use `quickbench run <kind>` instead."
        );
    }

    let log_path = cfg.log_path()?;
    logging::init_file(&log_path, &cfg.logging.level)?;

    let store = open_store(cfg)?;
    let env = hardware::provider(cfg.environment.detect);
    let export_dir = cfg.export_dir()?;
    let rt = runtime()?;

    let (app, exit) = rt.block_on(async {
        let (scheduler, events) = RunScheduler::new(cfg.run_settings(), cfg.score_model());
        let app = tui::App::new(store, scheduler, env.as_ref(), export_dir);
        tui::run_tui(app, events).await
    })?;
    info!(?exit, db = ?app.store.path(), "Closing result store");
    app.close_store()
}

fn run_headless(
    cfg: &Config,
    kind: TestKind,
    duration_secs: Option<u64>,
    export_to: Option<Option<PathBuf>>,
) -> Result<()> {
    let mut settings = cfg.run_settings();
    if let Some(secs) = duration_secs {
        settings.duration = Duration::from_secs(secs);
    }

    let store = open_store(cfg)?;
    let env = hardware::provider(cfg.environment.detect);
    let rt = runtime()?;

    let mut view = TestView::new(kind, env.as_ref());
    println!("{}", kind.title().bright_cyan().bold());
    println!("  {}", view.description().name);
    println!("  {}", view.description().characteristics);
    println!();

    let outcome = rt.block_on(async {
        let (scheduler, mut events) = RunScheduler::new(settings, cfg.score_model());
        view.start(&scheduler);
        let interrupted = async {
            // A failed handler install just means Ctrl+C kills the process.
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        drive_view(&mut view, &mut events, &store, interrupted).await
    })?;

    let (run, store_error) = match outcome {
        RunOutcome::Cancelled => {
            println!("{}", "Test cancelled. Nothing was saved.".bright_yellow());
            store.close()?;
            return Ok(());
        }
        RunOutcome::Saved(run) => (run, None),
        RunOutcome::Unsaved(run, err) => (run, Some(err)),
    };

    println!(
        "{} {}",
        "Result:".bright_green().bold(),
        run.score.to_string().bright_white().bold()
    );
    println!("{}", SIMULATED_NOTE.bright_black());
    if let Some(id) = run.record_id {
        println!("{} {}", "Saved as".bright_black(), id);
    }

    if let Some(target) = export_to {
        let path = report_path(cfg, target, &run)?;
        export::write_report(&path, &run)?;
        println!("{} {}", "Report:".bright_cyan(), path.display());
    }

    store.close()?;
    match store_error {
        Some(err) => Err(anyhow::Error::new(err).context("The result could not be saved")),
        None => Ok(()),
    }
}

/// Where `run --export` writes: the export directory by default, or the
/// given path (a directory gets the default file name).
fn report_path(
    cfg: &Config,
    target: Option<PathBuf>,
    run: &CompletedRun,
) -> Result<PathBuf> {
    match target {
        None => Ok(export::default_report_path(&cfg.export_dir()?, run)),
        Some(dir) if dir.is_dir() => Ok(export::default_report_path(&dir, run)),
        Some(path) => Ok(path),
    }
}

/// How a headless run ended
#[derive(Debug)]
enum RunOutcome {
    Cancelled,
    Saved(CompletedRun),
    /// Finished, but the store rejected the record
    Unsaved(CompletedRun, StoreError),
}

/// Feed runner events into `view` until it leaves Running. If `interrupted`
/// resolves first the run is cancelled.
async fn drive_view(
    view: &mut TestView,
    events: &mut tokio::sync::mpsc::UnboundedReceiver<RunnerEvent>,
    store: &ResultStore,
    interrupted: impl Future<Output = ()>,
) -> Result<RunOutcome> {
    let total = view.total_secs();
    let mut store_error = None;
    tokio::pin!(interrupted);
    while view.is_running() {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    anyhow::bail!("Test runner stopped unexpectedly");
                };
                if let Err(err) = view.on_event(event, store) {
                    error!(error = %err, "Failed to save result");
                    store_error = Some(err);
                }
                if view.phase() == Phase::Running {
                    println!(
                        "  {} {:>3}s / {}s",
                        "Testing...".bright_black(),
                        view.elapsed(),
                        total
                    );
                }
            }
            _ = &mut interrupted => {
                view.cancel();
                return Ok(RunOutcome::Cancelled);
            }
        }
    }

    let run = view
        .last_run()
        .cloned()
        .context("Test finished without a result")?;
    Ok(match store_error {
        Some(err) => RunOutcome::Unsaved(run, err),
        None => RunOutcome::Saved(run),
    })
}

fn print_history(cfg: &Config, json: bool) -> Result<()> {
    let store = open_store(cfg)?;
    let records = store.list_all()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("{}", "Test History\n".bright_cyan().bold());
        for line in dialogs::history_lines(&records) {
            println!("  {line}");
        }
    }

    store.close()?;
    Ok(())
}

fn print_environment(env: &dyn EnvironmentInfo) {
    println!("{}", "Detected Resources\n".bright_cyan().bold());
    for kind in TestKind::ALL {
        let desc = env.describe(kind);
        println!("{}", kind.title().bright_white().bold());
        println!("  {}", desc.name);
        println!("  {}", desc.characteristics);
    }
}

fn show_config_info(cfg: &Config, init: bool) -> Result<()> {
    println!("{}", "quickbench Configuration\n".bright_cyan().bold());

    let path = Config::config_path()?;
    println!(
        "{} {}",
        "Config file:".bright_yellow(),
        path.display().to_string().bright_white()
    );
    if init && !path.exists() {
        Config::init()?;
        println!("  {} {}", "Status:".bright_cyan(), "Created".bright_green());
    } else if path.exists() {
        println!("  {} {}", "Status:".bright_cyan(), "Exists".bright_green());
    } else {
        println!(
            "  {} {}",
            "Status:".bright_cyan(),
            "Not created yet (using defaults)".bright_yellow()
        );
    }

    println!(
        "{} {}",
        "Database:".bright_yellow(),
        cfg.database_path()?.display()
    );
    println!(
        "{} {}",
        "Reports:".bright_yellow(),
        cfg.export_dir()?.display()
    );
    println!("{} {}", "Log file:".bright_yellow(), cfg.log_path()?.display());

    println!("\n{}", "Effective settings:".bright_white().bold());
    let rendered =
        toml::to_string_pretty(cfg).context("Failed to render configuration as TOML")?;
    for line in rendered.lines() {
        println!("  {line}");
    }
    Ok(())
}
