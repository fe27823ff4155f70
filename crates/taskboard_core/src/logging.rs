//! Logging bootstrap.
//!
//! # Responsibility
//! - Start rolling file logs once per process.
//! - Keep log lines metadata-only (`event=... module=... status=...`).
//!
//! # Invariants
//! - Repeating init with the same level and directory is a no-op.
//! - Init with a different level or directory is rejected, never applied.
//! - Init never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "taskboard";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    level: &'static str,
    dir: PathBuf,
    _handle: LoggerHandle,
}

/// Errors from logging setup.
#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    InvalidDir(String),
    CreateDir { dir: PathBuf, source: std::io::Error },
    Backend(String),
    /// Logging is already running with different settings.
    Conflict { active: String, requested: String },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDir(message) => write!(f, "{message}"),
            Self::CreateDir { dir, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                dir.display()
            ),
            Self::Backend(message) => write!(f, "failed to start logger: {message}"),
            Self::Conflict { active, requested } => write!(
                f,
                "logging already initialized with {active}; refusing to switch to {requested}"
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Starts file logging at `level` under `log_dir`.
///
/// # Errors
/// - `UnsupportedLevel` for anything but trace|debug|info|warn|error.
/// - `InvalidDir` when `log_dir` is empty or relative.
/// - `CreateDir` / `Backend` when the directory or backend cannot be set up.
/// - `Conflict` when already running with another level or directory.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    let dir = normalize_log_dir(log_dir)?;

    let active = ACTIVE.get_or_try_init(|| start_logger(level, &dir))?;
    check_matches(active, level, &dir)
}

fn start_logger(level: &'static str, dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook_once();
    info!(
        "event=app_start module=core status=ok platform={} version={} level={} log_dir={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        level,
        dir.display()
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

fn check_matches(active: &ActiveLogger, level: &'static str, dir: &Path) -> Result<(), LoggingError> {
    if active.dir != dir {
        return Err(LoggingError::Conflict {
            active: format!("dir `{}`", active.dir.display()),
            requested: format!("dir `{}`", dir.display()),
        });
    }
    if active.level != level {
        return Err(LoggingError::Conflict {
            active: format!("level `{}`", active.level),
            requested: format!("level `{level}`"),
        });
    }
    Ok(())
}

/// Active `(level, dir)`, or `None` before init.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE.get().map(|active| (active.level, active.dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn normalize_log_dir(log_dir: &Path) -> Result<PathBuf, LoggingError> {
    if log_dir.as_os_str().is_empty() {
        return Err(LoggingError::InvalidDir("log_dir cannot be empty".to_string()));
    }
    if !log_dir.is_absolute() {
        return Err(LoggingError::InvalidDir(format!(
            "log_dir must be an absolute path, got `{}`",
            log_dir.display()
        )));
    }
    Ok(log_dir.to_path_buf())
}

fn install_panic_hook_once() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

/// Flattens newlines and caps length; panic text may contain task names.
fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, logging_status, normalize_level, normalize_log_dir, sanitize_message,
        LoggingError,
    };
    use std::path::Path;

    #[test]
    fn normalize_level_accepts_aliases() {
        assert_eq!(normalize_level(" WARNING ").expect("warning alias should normalize"), "warn");
        assert!(matches!(
            normalize_level("loud"),
            Err(LoggingError::UnsupportedLevel(_))
        ));
    }

    #[test]
    fn normalize_log_dir_rejects_relative_and_empty() {
        assert!(normalize_log_dir(Path::new("logs/dev"))
            .expect_err("relative dir should be rejected")
            .to_string()
            .contains("absolute"));
        assert!(normalize_log_dir(Path::new("")).is_err());
    }

    #[test]
    fn sanitize_message_flattens_and_truncates() {
        let sanitized = sanitize_message("line1\nline2\rline3", 8);
        assert_eq!(sanitized, "line1 li...");
    }

    #[test]
    fn init_is_idempotent_and_rejects_conflicts() {
        let first = tempfile::tempdir().expect("first temp dir should be created");
        let second = tempfile::tempdir().expect("second temp dir should be created");

        init_logging("info", first.path()).expect("first init should succeed");
        init_logging("INFO", first.path()).expect("same settings should be a no-op");

        let err = init_logging("debug", first.path()).expect_err("level change should conflict");
        assert!(matches!(err, LoggingError::Conflict { .. }));
        let err = init_logging("info", second.path()).expect_err("dir change should conflict");
        assert!(err.to_string().contains("refusing to switch"));

        let (level, dir) = logging_status().expect("logging should be active");
        assert_eq!(level, "info");
        assert_eq!(dir, first.path());
    }
}
