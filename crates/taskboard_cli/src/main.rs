//! Interactive terminal front-end for Taskboard.
//!
//! # Responsibility
//! - Load config, start logging, and run the input/tick loop.
//! - Keep store mutations and alert scans on one task so they never overlap.

mod alert;
mod view;

use crate::alert::TerminalAlertSink;
use crate::view::{Flow, View};
use clap::Parser;
use log::info;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use taskboard_core::{
    default_log_level, init_logging, DueAlertMonitor, SystemClock, TaskStore, TaskboardConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

const DEFAULT_LOG_DIR_NAME: &str = "taskboard-logs";

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Single-list to-do board with due-soon alerts")]
struct Args {
    /// TOML config file; a missing file means defaults.
    #[arg(long, env = "TASKBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "TASKBOARD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, env = "TASKBOARD_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Alert check interval in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Start without the sample tasks.
    #[arg(long)]
    empty: bool,
}

impl Args {
    fn resolve(&self) -> Result<TaskboardConfig, String> {
        let mut config = match &self.config {
            Some(path) => TaskboardConfig::from_file(path).map_err(|err| err.to_string())?,
            None => TaskboardConfig::default(),
        };
        if let Some(level) = &self.log_level {
            config.logging.level = Some(level.clone());
        }
        if let Some(dir) = &self.log_dir {
            config.logging.dir = Some(dir.clone());
        }
        if let Some(tick_ms) = self.tick_ms {
            config.monitor.tick_interval_ms = tick_ms;
        }
        if self.empty {
            config.store.seed_sample = false;
        }
        config.validate().map_err(|err| err.to_string())?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config = match args.resolve() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("taskboard: {err}");
            return ExitCode::FAILURE;
        }
    };

    let level = config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let log_dir = config
        .logging
        .dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));
    if let Err(err) = init_logging(&level, &log_dir) {
        eprintln!("taskboard: {err}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=session_end module=cli status=error reason={err}");
            eprintln!("taskboard: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: TaskboardConfig) -> std::io::Result<()> {
    let store = if config.store.seed_sample {
        TaskStore::new(SystemClock)
    } else {
        TaskStore::empty(SystemClock)
    };
    let mut view = View::new(store);
    let mut monitor = DueAlertMonitor::with_horizon(config.monitor.horizon());
    let mut sink = TerminalAlertSink::new(std::io::stdout());

    let mut ticker = tokio::time::interval(config.monitor.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    info!(
        "event=session_start module=cli status=ok tick_ms={} horizon_secs={} tasks={}",
        config.monitor.tick_interval_ms,
        config.monitor.horizon_secs,
        view.store().len()
    );
    emit(&view.render(), &view.prompt())?;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let store = view.store();
                monitor.prune(store.tasks());
                if monitor.tick_with(store.clock(), store.tasks(), &mut sink) > 0 {
                    emit(&[], &view.prompt())?;
                }
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let response = view.handle_line(&line);
                if response.flow == Flow::Quit {
                    emit(&response.lines, "")?;
                    break;
                }
                emit(&response.lines, &view.prompt())?;
            }
        }
    }

    info!("event=session_end module=cli status=ok tasks={}", view.store().len());
    Ok(())
}

fn emit(lines: &[String], prompt: &str) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    write!(out, "{prompt}")?;
    out.flush()
}
