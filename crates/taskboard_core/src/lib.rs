//! Core domain logic for Taskboard.
//! This crate is the single source of truth for task list invariants.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, LoggingConfig, MonitorConfig, StoreConfig, TaskboardConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::deadline::{Deadline, DeadlineParseError};
pub use model::task::{validate_fields, Task, TaskId, TaskValidationError};
pub use monitor::due_alert::{
    scan_due_tasks, AlertSink, AlertedSet, DueAlert, DueAlertMonitor, LogAlertSink,
    RecordingAlertSink, ScanOutcome, DEFAULT_ALERT_HORIZON_SECS,
};
pub use store::reducer::{reduce, ActionOutcome, TaskAction, TaskList, Transition};
pub use store::sort::SortCriterion;
pub use store::task_store::{sample_tasks, StoreError, StoreResult, TaskCounts, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
