//! Task list store.
//!
//! # Responsibility
//! - Own the ordered task list for the lifetime of the session.
//! - Allocate ids and run every mutation through `reduce`.
//! - Turn rejected input into errors and keep not-found as a plain outcome.
//!
//! # Invariants
//! - Ids are strictly increasing and never reused, even after deletes.
//! - A failed operation leaves the list exactly as it was.
//! - Mutation needs `&mut self`, so readers never see a half-applied change.

use crate::clock::{Clock, SystemClock};
use crate::model::deadline::Deadline;
use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::store::reducer::{reduce, ActionOutcome, TaskAction, TaskList};
use crate::store::sort::SortCriterion;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(TaskValidationError),
    /// Every id up to `u64::MAX` has been handed out.
    IdsExhausted,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::IdsExhausted => write!(f, "no task ids left to allocate"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::IdsExhausted => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Aggregate counters for the header/status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// In-memory task list with clock-derived ids.
pub struct TaskStore<C: Clock = SystemClock> {
    tasks: TaskList,
    clock: C,
    last_issued: u64,
}

impl<C: Clock> TaskStore<C> {
    /// Creates a store seeded with the two sample tasks.
    pub fn new(clock: C) -> Self {
        Self::with_tasks(clock, sample_tasks())
    }

    /// Creates a store with no tasks.
    pub fn empty(clock: C) -> Self {
        Self::with_tasks(clock, Vec::new())
    }

    /// Creates a store from an existing list.
    ///
    /// Later entries that repeat an earlier id are dropped. Deadline text is
    /// kept as-is, so unreadable deadlines can exist in the result.
    pub fn with_tasks(clock: C, tasks: Vec<Task>) -> Self {
        let mut kept: TaskList = Vec::with_capacity(tasks.len());
        for task in tasks {
            if kept.iter().any(|existing| existing.id == task.id) {
                warn!(
                    "event=store_restore module=store status=skipped reason=duplicate_id id={}",
                    task.id
                );
                continue;
            }
            kept.push(task);
        }
        let last_issued = kept.iter().map(|task| task.id.0).max().unwrap_or(0);
        Self {
            tasks: kept,
            clock,
            last_issued,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn counts(&self) -> TaskCounts {
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        TaskCounts {
            total: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
        }
    }

    /// Appends a new incomplete task.
    ///
    /// # Errors
    /// - `TaskValidationError::EmptyName` when `name` is blank.
    /// - `TaskValidationError::MalformedDeadline` when `deadline` is neither
    ///   `YYYY-MM-DD | HH:MM` nor `YYYY-MM-DDTHH:MM`.
    /// - `StoreError::IdsExhausted` once `u64::MAX` has been issued.
    pub fn add_task(&mut self, name: &str, deadline: &str) -> StoreResult<ActionOutcome> {
        let id = self.allocate_id()?;
        self.dispatch(TaskAction::Add {
            id,
            name: name.to_string(),
            deadline: deadline.to_string(),
        })
    }

    /// Flips completion. Unknown ids yield `ActionOutcome::NotFound`.
    pub fn toggle_task(&mut self, id: TaskId) -> StoreResult<ActionOutcome> {
        self.dispatch(TaskAction::Toggle(id))
    }

    /// Removes a task. Unknown ids yield `ActionOutcome::NotFound`.
    pub fn delete_task(&mut self, id: TaskId) -> StoreResult<ActionOutcome> {
        self.dispatch(TaskAction::Delete(id))
    }

    /// Replaces name and deadline of one task.
    ///
    /// Unknown ids yield `ActionOutcome::NotFound` before input is validated.
    pub fn edit_task(&mut self, id: TaskId, name: &str, deadline: &str) -> StoreResult<ActionOutcome> {
        self.dispatch(TaskAction::Edit {
            id,
            name: name.to_string(),
            deadline: deadline.to_string(),
        })
    }

    pub fn sort_tasks(&mut self, criterion: SortCriterion) -> StoreResult<ActionOutcome> {
        self.dispatch(TaskAction::Sort(criterion))
    }

    /// Sorts by picker label; unknown labels leave the list untouched.
    pub fn sort_by_label(&mut self, label: &str) -> StoreResult<ActionOutcome> {
        match SortCriterion::from_label(label) {
            Some(criterion) => self.sort_tasks(criterion),
            None => {
                debug!("event=task_sort module=store status=ignored reason=unknown_label");
                Ok(ActionOutcome::Unchanged)
            }
        }
    }

    /// Applies one action through the reducer.
    pub fn dispatch(&mut self, action: TaskAction) -> StoreResult<ActionOutcome> {
        let event = action.event_name();
        let transition = reduce(std::mem::take(&mut self.tasks), action);
        self.tasks = transition.state;

        match transition.outcome {
            ActionOutcome::Rejected(err) => {
                warn!("event={event} module=store status=rejected reason={err}");
                Err(StoreError::Validation(err))
            }
            ActionOutcome::NotFound(id) => {
                debug!("event={event} module=store status=not_found id={id}");
                Ok(ActionOutcome::NotFound(id))
            }
            outcome => {
                info!(
                    "event={event} module=store status=ok outcome={outcome:?} total={}",
                    self.tasks.len()
                );
                Ok(outcome)
            }
        }
    }

    /// Next id: current epoch millis, bumped past every id handed out so far.
    fn allocate_id(&mut self) -> StoreResult<TaskId> {
        let Some(floor) = self.last_issued.checked_add(1) else {
            warn!("event=task_add module=store status=rejected reason=ids_exhausted");
            return Err(StoreError::IdsExhausted);
        };
        let candidate = u64::try_from(self.clock.now_millis()).unwrap_or(0);
        let id = candidate.max(floor);
        self.last_issued = id;
        Ok(TaskId(id))
    }
}

/// The two tasks every fresh session starts with.
pub fn sample_tasks() -> Vec<Task> {
    let day = NaiveDate::from_ymd_opt(2025, 4, 2);
    let at = |hour: u32| {
        day.and_then(|d| d.and_hms_opt(hour, 0, 0))
            .map(Deadline::from_datetime)
    };
    [(1, "Task 1", at(19)), (2, "Task 2", at(16))]
        .into_iter()
        .filter_map(|(id, name, deadline)| deadline.map(|d| Task::new(TaskId(id), name, d)))
        .collect()
}
