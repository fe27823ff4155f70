//! Task domain model.
//!
//! # Responsibility
//! - Define the record rendered by the list view and scanned by the monitor.
//! - Validate user-supplied name/deadline pairs at the boundary.
//!
//! # Invariants
//! - `id` is stable for the task lifetime and never reused within a store.
//! - `deadline` keeps the raw text; `deadline_value()` is the only way
//!   business logic reads it as a date-time.

use crate::model::deadline::{Deadline, DeadlineParseError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Validation failures for add/edit input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Name is blank after trim.
    EmptyName,
    /// Deadline text could not be read.
    MalformedDeadline(DeadlineParseError),
    /// Another task already uses this id.
    DuplicateId(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "task name must not be blank"),
            Self::MalformedDeadline(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "task id already in use: {id}"),
        }
    }
}

impl Error for TaskValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedDeadline(err) => Some(err),
            Self::EmptyName | Self::DuplicateId(_) => None,
        }
    }
}

impl From<DeadlineParseError> for TaskValidationError {
    fn from(value: DeadlineParseError) -> Self {
        Self::MalformedDeadline(value)
    }
}

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// Canonical `"YYYY-MM-DD | HH:MM"` text when written through the store.
    pub deadline: String,
    pub completed: bool,
}

impl Task {
    /// Creates an incomplete task from already validated parts.
    pub fn new(id: TaskId, name: impl Into<String>, deadline: Deadline) -> Self {
        Self {
            id,
            name: name.into(),
            deadline: deadline.to_string(),
            completed: false,
        }
    }

    /// Parsed deadline, or `None` when the stored text is malformed.
    pub fn deadline_value(&self) -> Option<Deadline> {
        Deadline::parse(&self.deadline).ok()
    }
}

/// Normalizes a name/deadline pair coming from user input.
///
/// Returns the trimmed name and the parsed deadline.
pub fn validate_fields(name: &str, deadline: &str) -> Result<(String, Deadline), TaskValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TaskValidationError::EmptyName);
    }
    let deadline = Deadline::from_input(deadline)?;
    Ok((name.to_string(), deadline))
}
