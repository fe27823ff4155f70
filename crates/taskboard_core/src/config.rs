//! Application configuration.
//!
//! # Responsibility
//! - Load optional TOML settings for logging, monitoring and store seeding.
//!
//! # Invariants
//! - Every field has a default; a missing file yields `TaskboardConfig::default()`.
//! - A loaded config is validated before it is returned.

use crate::monitor::due_alert::DEFAULT_ALERT_HORIZON_SECS;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskboardConfig {
    pub logging: LoggingConfig,
    pub monitor: MonitorConfig,
    pub store: StoreConfig,
}

/// `[logging]` table. `None` means "use the build default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
}

/// `[monitor]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    pub horizon_secs: i64,
    pub tick_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            horizon_secs: DEFAULT_ALERT_HORIZON_SECS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl MonitorConfig {
    /// Alert horizon; out-of-range values fall back to the default.
    pub fn horizon(&self) -> chrono::Duration {
        chrono::Duration::try_seconds(self.horizon_secs)
            .or_else(|| chrono::Duration::try_seconds(DEFAULT_ALERT_HORIZON_SECS))
            .unwrap_or_else(chrono::Duration::zero)
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }
}

/// `[store]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Start with the two sample tasks.
    pub seed_sample: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { seed_sample: true }
    }
}

impl TaskboardConfig {
    /// Loads config from `path`; a missing file yields defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.horizon_secs <= 0 {
            return Err(ConfigError::Invalid(format!(
                "monitor.horizon_secs must be positive, got {}",
                self.monitor.horizon_secs
            )));
        }
        if chrono::Duration::try_seconds(self.monitor.horizon_secs).is_none() {
            return Err(ConfigError::Invalid(format!(
                "monitor.horizon_secs is out of range, got {}",
                self.monitor.horizon_secs
            )));
        }
        if self.monitor.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "monitor.tick_interval_ms must be positive".to_string(),
            ));
        }
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, MonitorConfig, TaskboardConfig};
    use std::io::Write;

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = TaskboardConfig::from_toml_str(
            r#"
            [monitor]
            tick_interval_ms = 250
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(config.monitor.tick_interval_ms, 250);
        assert_eq!(config.monitor.horizon_secs, 3600);
        assert!(config.store.seed_sample);
        assert_eq!(config.logging.level, None);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let config = TaskboardConfig::from_file(dir.path().join("absent.toml"))
            .expect("missing config file should yield defaults");
        assert_eq!(config, TaskboardConfig::default());
    }

    #[test]
    fn file_values_are_loaded() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
        writeln!(file, "[store]\nseed_sample = false\n[logging]\nlevel = \"warn\"")
            .expect("config should be written");
        let config = TaskboardConfig::from_file(file.path()).expect("config file should load");
        assert!(!config.store.seed_sample);
        assert_eq!(config.logging.level.as_deref(), Some("warn"));
    }

    #[test]
    fn zero_horizon_and_relative_log_dir_are_rejected() {
        let err = TaskboardConfig::from_toml_str("[monitor]\nhorizon_secs = 0")
            .expect_err("zero horizon should be rejected");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = TaskboardConfig::from_toml_str("[logging]\ndir = \"logs\"")
            .expect_err("relative log dir should be rejected");
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn huge_horizon_is_rejected() {
        let err = TaskboardConfig::from_toml_str("[monitor]\nhorizon_secs = 9223372036854775807")
            .expect_err("horizon beyond the duration range should be rejected");
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("out of range"));

        let config = TaskboardConfig {
            monitor: MonitorConfig {
                horizon_secs: i64::MAX,
                ..MonitorConfig::default()
            },
            ..TaskboardConfig::default()
        };
        assert_eq!(config.monitor.horizon(), chrono::Duration::hours(1));
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let err = TaskboardConfig::from_toml_str("[monitor]\nhorizon = 10")
            .expect_err("unknown key should be rejected");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
