//! Due-soon alert scan.
//!
//! # Responsibility
//! - Find tasks whose deadline falls within the alert horizon of `now`.
//! - Remember which tasks already fired so each alerts at most once.
//!
//! # Invariants
//! - `scan_due_tasks` never mutates the task list.
//! - Only tasks that actually alerted enter the alerted set; past, far-off
//!   and unreadable deadlines leave no trace and can alert later.
//! - The alerted set lives as long as the monitor, not one scan.

use crate::clock::Clock;
use crate::model::deadline::Deadline;
use crate::model::task::{Task, TaskId};
use chrono::{Duration, NaiveDateTime};
use log::{debug, info, warn};
use std::collections::BTreeSet;

/// Default horizon: one hour.
pub const DEFAULT_ALERT_HORIZON_SECS: i64 = 60 * 60;

/// One due-soon notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueAlert {
    pub task_id: TaskId,
    pub task_name: String,
    pub deadline: Deadline,
    /// Time left until the deadline when the alert was raised.
    pub due_in: Duration,
    /// Horizon of the scan that raised the alert.
    pub horizon: Duration,
}

impl DueAlert {
    /// User-facing text, worded after the horizon.
    pub fn message(&self) -> String {
        format!(
            "Task \"{}\" is due within {}!",
            self.task_name,
            describe_span(self.horizon)
        )
    }
}

/// `1 hour`, `15 minutes`, `90 seconds`: the largest whole unit.
fn describe_span(span: Duration) -> String {
    let secs = span.num_seconds();
    let (count, unit) = if secs % 3600 == 0 {
        (secs / 3600, "hour")
    } else if secs % 60 == 0 {
        (secs / 60, "minute")
    } else {
        (secs, "second")
    };
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Receives alerts raised by the monitor.
pub trait AlertSink {
    fn notify(&mut self, alert: &DueAlert);
}

impl<F: FnMut(&DueAlert)> AlertSink for F {
    fn notify(&mut self, alert: &DueAlert) {
        self(alert)
    }
}

/// Writes alerts to the log.
#[derive(Debug, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn notify(&mut self, alert: &DueAlert) {
        warn!(
            "event=due_alert module=monitor status=raised id={} due_in_secs={}",
            alert.task_id,
            alert.due_in.num_seconds()
        );
    }
}

/// Keeps every alert it receives.
#[derive(Debug, Default)]
pub struct RecordingAlertSink {
    pub alerts: Vec<DueAlert>,
}

impl RecordingAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<&str> {
        self.alerts.iter().map(|a| a.task_name.as_str()).collect()
    }
}

impl AlertSink for RecordingAlertSink {
    fn notify(&mut self, alert: &DueAlert) {
        self.alerts.push(alert.clone());
    }
}

/// Ids of tasks that already raised a due-soon alert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertedSet(BTreeSet<TaskId>);

impl AlertedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.0.contains(&id)
    }

    pub fn insert(&mut self, id: TaskId) -> bool {
        self.0.insert(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<TaskId> for AlertedSet {
    fn from_iter<I: IntoIterator<Item = TaskId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Alerts raised by one scan plus the alerted set to carry forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub alerts: Vec<DueAlert>,
    pub alerted: AlertedSet,
}

/// Scans `tasks` against `now`.
///
/// A task alerts when `0 < deadline - now <= horizon` and its id is not in
/// `alerted`. Tasks are visited in list order.
pub fn scan_due_tasks(
    now: NaiveDateTime,
    tasks: &[Task],
    alerted: &AlertedSet,
    horizon: Duration,
) -> ScanOutcome {
    let mut next = alerted.clone();
    let mut alerts = Vec::new();

    for task in tasks {
        let Some(deadline) = task.deadline_value() else {
            debug!(
                "event=due_scan module=monitor status=skipped reason=unreadable_deadline id={}",
                task.id
            );
            continue;
        };
        let due_in = deadline.as_datetime() - now;
        if due_in <= Duration::zero() || due_in > horizon {
            continue;
        }
        if next.insert(task.id) {
            alerts.push(DueAlert {
                task_id: task.id,
                task_name: task.name.clone(),
                deadline,
                due_in,
                horizon,
            });
        }
    }

    ScanOutcome {
        alerts,
        alerted: next,
    }
}

/// Periodic due-soon checker with persistent alert memory.
#[derive(Debug, Clone)]
pub struct DueAlertMonitor {
    alerted: AlertedSet,
    horizon: Duration,
}

impl Default for DueAlertMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl DueAlertMonitor {
    /// Creates a monitor with the one-hour horizon.
    pub fn new() -> Self {
        Self::with_horizon(Duration::seconds(DEFAULT_ALERT_HORIZON_SECS))
    }

    pub fn with_horizon(horizon: Duration) -> Self {
        Self {
            alerted: AlertedSet::new(),
            horizon,
        }
    }

    pub fn horizon(&self) -> Duration {
        self.horizon
    }

    pub fn alerted(&self) -> &AlertedSet {
        &self.alerted
    }

    /// Runs one scan and forwards new alerts to `sink`.
    ///
    /// Returns how many alerts were raised.
    pub fn tick(&mut self, now: NaiveDateTime, tasks: &[Task], sink: &mut dyn AlertSink) -> usize {
        let outcome = scan_due_tasks(now, tasks, &self.alerted, self.horizon);
        self.alerted = outcome.alerted;
        for alert in &outcome.alerts {
            info!(
                "event=due_alert module=monitor status=ok id={} due_in_secs={}",
                alert.task_id,
                alert.due_in.num_seconds()
            );
            sink.notify(alert);
        }
        outcome.alerts.len()
    }

    /// Same as `tick`, reading `now` from `clock`.
    pub fn tick_with<C: Clock + ?Sized>(
        &mut self,
        clock: &C,
        tasks: &[Task],
        sink: &mut dyn AlertSink,
    ) -> usize {
        self.tick(clock.now(), tasks, sink)
    }

    /// Forgets alerted ids whose task is gone from `tasks`.
    pub fn prune(&mut self, tasks: &[Task]) {
        let before = self.alerted.len();
        self.alerted = self
            .alerted
            .iter()
            .filter(|id| tasks.iter().any(|task| task.id == *id))
            .collect();
        let dropped = before - self.alerted.len();
        if dropped > 0 {
            debug!("event=due_prune module=monitor status=ok dropped={dropped}");
        }
    }

    /// Forgets every alert raised so far.
    pub fn reset(&mut self) {
        self.alerted = AlertedSet::new();
    }
}
