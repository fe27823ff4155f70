//! Pure state transitions for the task list.
//!
//! # Responsibility
//! - Map `(state, action)` to the next state plus an outcome describing what
//!   happened, without touching clocks, ids or logging.
//!
//! # Invariants
//! - `reduce` is total: every action yields a transition.
//! - A rejected or not-found action returns the input state unchanged.
//! - Add never introduces a duplicate id.

use crate::model::task::{validate_fields, Task, TaskId, TaskValidationError};
use crate::store::sort::{sort_tasks, SortCriterion};

/// Ordered task collection owned by the store.
pub type TaskList = Vec<Task>;

/// One requested change to the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Append a task. The id is allocated by the caller.
    Add {
        id: TaskId,
        name: String,
        deadline: String,
    },
    Toggle(TaskId),
    Delete(TaskId),
    /// Replace name and deadline, keeping id and completion.
    Edit {
        id: TaskId,
        name: String,
        deadline: String,
    },
    Sort(SortCriterion),
}

impl TaskAction {
    /// Stable event name used in log lines.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "task_add",
            Self::Toggle(_) => "task_toggle",
            Self::Delete(_) => "task_delete",
            Self::Edit { .. } => "task_edit",
            Self::Sort(_) => "task_sort",
        }
    }
}

/// Result of applying one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Added(TaskId),
    Toggled { id: TaskId, completed: bool },
    Deleted(TaskId),
    Edited(TaskId),
    Sorted(SortCriterion),
    /// The id did not match any task; nothing changed.
    NotFound(TaskId),
    /// The request was understood but asked for nothing (unknown sort label).
    Unchanged,
    /// Input failed validation; nothing changed.
    Rejected(TaskValidationError),
}

impl ActionOutcome {
    /// Whether the list may differ from the input state.
    pub fn changed(&self) -> bool {
        !matches!(self, Self::NotFound(_) | Self::Unchanged | Self::Rejected(_))
    }
}

/// Next state together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: TaskList,
    pub outcome: ActionOutcome,
}

impl Transition {
    fn new(state: TaskList, outcome: ActionOutcome) -> Self {
        Self { state, outcome }
    }
}

/// Applies `action` to `state`.
pub fn reduce(mut state: TaskList, action: TaskAction) -> Transition {
    match action {
        TaskAction::Add { id, name, deadline } => {
            if state.iter().any(|task| task.id == id) {
                return Transition::new(
                    state,
                    ActionOutcome::Rejected(TaskValidationError::DuplicateId(id)),
                );
            }
            match validate_fields(&name, &deadline) {
                Ok((name, deadline)) => {
                    state.push(Task::new(id, name, deadline));
                    Transition::new(state, ActionOutcome::Added(id))
                }
                Err(err) => Transition::new(state, ActionOutcome::Rejected(err)),
            }
        }
        TaskAction::Toggle(id) => {
            let Some(index) = state.iter().position(|task| task.id == id) else {
                return Transition::new(state, ActionOutcome::NotFound(id));
            };
            let completed = !state[index].completed;
            state[index].completed = completed;
            Transition::new(state, ActionOutcome::Toggled { id, completed })
        }
        TaskAction::Delete(id) => {
            let before = state.len();
            state.retain(|task| task.id != id);
            let outcome = if state.len() < before {
                ActionOutcome::Deleted(id)
            } else {
                ActionOutcome::NotFound(id)
            };
            Transition::new(state, outcome)
        }
        TaskAction::Edit { id, name, deadline } => {
            let Some(index) = state.iter().position(|task| task.id == id) else {
                return Transition::new(state, ActionOutcome::NotFound(id));
            };
            match validate_fields(&name, &deadline) {
                Ok((name, deadline)) => {
                    let task = &mut state[index];
                    task.name = name;
                    task.deadline = deadline.to_string();
                    Transition::new(state, ActionOutcome::Edited(id))
                }
                Err(err) => Transition::new(state, ActionOutcome::Rejected(err)),
            }
        }
        TaskAction::Sort(criterion) => {
            sort_tasks(&mut state, criterion);
            Transition::new(state, ActionOutcome::Sorted(criterion))
        }
    }
}
