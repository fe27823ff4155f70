//! Terminal view over the task store.
//!
//! # Responsibility
//! - Turn input lines into store operations through modal dialogs
//!   (create, edit, confirm delete, sort picker).
//! - Render the task list screen.
//!
//! # Invariants
//! - At most one dialog is open; invalid input re-prompts the same step.
//! - The view never mutates tasks except through `TaskStore`.

use taskboard_core::{
    ActionOutcome, Clock, Deadline, SortCriterion, StoreError, TaskId, TaskStore,
};

const EMPTY_QUOTE: &str = "\"The best way to predict the future is to create it.\"";
const EMPTY_QUOTE_AUTHOR: &str = "- Abraham Lincoln";
const UNSORTED_LABEL: &str = "Sort by.";

const HELP: &[&str] = &[
    "Commands:",
    "  new              create a task",
    "  edit <id>        edit name and deadline of an open task",
    "  toggle <id>      mark done / not done (alias: done)",
    "  rm <id>          delete a task (alias: delete)",
    "  sort [label]     sort by Deadline, Name or Completed",
    "  list             show the list",
    "  export           print the list as JSON",
    "  help             show this help",
    "  quit             exit",
    "Inside a dialog, `cancel` closes it, so no task can be named `cancel`.",
];

/// Open modal dialog, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Closed,
    CreateName,
    CreateDeadline { name: String },
    EditName { id: TaskId },
    EditDeadline { id: TaskId, name: String },
    ConfirmDelete { id: TaskId },
    SortPicker,
}

/// Whether the session should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Output produced by one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub flow: Flow,
    pub lines: Vec<String>,
}

impl Response {
    fn lines(lines: Vec<String>) -> Self {
        Self {
            flow: Flow::Continue,
            lines,
        }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }

    fn quit() -> Self {
        Self {
            flow: Flow::Quit,
            lines: vec!["Bye.".to_string()],
        }
    }
}

pub struct View<C: Clock> {
    store: TaskStore<C>,
    dialog: Dialog,
    sort_label: String,
}

impl<C: Clock> View<C> {
    pub fn new(store: TaskStore<C>) -> Self {
        Self {
            store,
            dialog: Dialog::Closed,
            sort_label: UNSORTED_LABEL.to_string(),
        }
    }

    pub fn store(&self) -> &TaskStore<C> {
        &self.store
    }

    #[cfg(test)]
    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// Prompt for the current dialog step.
    pub fn prompt(&self) -> String {
        match &self.dialog {
            Dialog::Closed => "> ".to_string(),
            Dialog::CreateName => "Task name: ".to_string(),
            Dialog::CreateDeadline { .. } => "Deadline (YYYY-MM-DDTHH:MM): ".to_string(),
            Dialog::EditName { id } => match self.store.get(*id) {
                Some(task) => format!("Task name [{}]: ", task.name),
                None => "Task name: ".to_string(),
            },
            Dialog::EditDeadline { id, .. } => match self.store.get(*id) {
                Some(task) => format!("Deadline [{}]: ", current_input(&task.deadline)),
                None => "Deadline: ".to_string(),
            },
            Dialog::ConfirmDelete { .. } => "Are you sure? [y/N]: ".to_string(),
            Dialog::SortPicker => "Sort by (1-3 or label): ".to_string(),
        }
    }

    /// Renders the whole list screen.
    pub fn render(&self) -> Vec<String> {
        let now = self.store.clock().now();
        let counts = self.store.counts();
        let mut lines = vec![
            format!(
                "{} | {}    Task ({} open, {} done)",
                now.format("%H:%M"),
                now.format("%a, %b %-d"),
                counts.pending,
                counts.completed
            ),
            format!("Sort by: {}", self.sort_label),
        ];

        if self.store.is_empty() {
            lines.push(String::new());
            lines.push(EMPTY_QUOTE.to_string());
            lines.push(format!("    {EMPTY_QUOTE_AUTHOR}"));
            return lines;
        }

        let width = self
            .store
            .tasks()
            .iter()
            .map(|task| task.name.chars().count())
            .max()
            .unwrap_or(0);
        for task in self.store.tasks() {
            let mark = if task.completed { "x" } else { " " };
            lines.push(format!(
                "[{mark}] {:<width$}  {}  #{}",
                task.name, task.deadline, task.id
            ));
        }
        lines
    }

    /// Handles one input line.
    pub fn handle_line(&mut self, line: &str) -> Response {
        let input = line.trim();
        if self.dialog != Dialog::Closed && input.eq_ignore_ascii_case("cancel") {
            self.dialog = Dialog::Closed;
            return Response::line("Closed.");
        }

        match std::mem::replace(&mut self.dialog, Dialog::Closed) {
            Dialog::Closed => self.handle_command(input),
            Dialog::CreateName => {
                if input.is_empty() {
                    self.dialog = Dialog::CreateName;
                    return Response::line("Task name is required.");
                }
                self.dialog = Dialog::CreateDeadline {
                    name: input.to_string(),
                };
                Response::lines(Vec::new())
            }
            Dialog::CreateDeadline { name } => match self.store.add_task(&name, input) {
                Ok(_) => self.rendered("Task added."),
                Err(err) => {
                    self.dialog = Dialog::CreateDeadline { name };
                    Response::line(error_line(&err))
                }
            },
            Dialog::EditName { id } => {
                let Some(task) = self.store.get(id) else {
                    return Response::line(format!("Task #{id} no longer exists."));
                };
                let name = if input.is_empty() {
                    task.name.clone()
                } else {
                    input.to_string()
                };
                self.dialog = Dialog::EditDeadline { id, name };
                Response::lines(Vec::new())
            }
            Dialog::EditDeadline { id, name } => {
                let Some(task) = self.store.get(id) else {
                    return Response::line(format!("Task #{id} no longer exists."));
                };
                let deadline = if input.is_empty() {
                    task.deadline.clone()
                } else {
                    input.to_string()
                };
                match self.store.edit_task(id, &name, &deadline) {
                    Ok(ActionOutcome::NotFound(_)) => {
                        Response::line(format!("Task #{id} no longer exists."))
                    }
                    Ok(_) => self.rendered("Task saved."),
                    Err(err) => {
                        self.dialog = Dialog::EditDeadline { id, name };
                        Response::line(error_line(&err))
                    }
                }
            }
            Dialog::ConfirmDelete { id } => {
                if matches!(input.to_ascii_lowercase().as_str(), "y" | "yes") {
                    match self.store.delete_task(id) {
                        Ok(ActionOutcome::Deleted(_)) => self.rendered("Deleted."),
                        Ok(_) => Response::line(format!("Task #{id} was already gone.")),
                        Err(err) => Response::line(error_line(&err)),
                    }
                } else {
                    Response::line("Closed.")
                }
            }
            Dialog::SortPicker => self.apply_sort(input),
        }
    }

    fn handle_command(&mut self, input: &str) -> Response {
        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match command {
            "" => Response::lines(Vec::new()),
            "new" | "add" => {
                self.dialog = Dialog::CreateName;
                Response::line("Create a Task")
            }
            "edit" => match self.lookup(rest) {
                Ok(id) => {
                    if self.store.get(id).is_some_and(|task| task.completed) {
                        return Response::line("Completed tasks cannot be edited.");
                    }
                    self.dialog = Dialog::EditName { id };
                    Response::line("Edit Task. (blank keeps the current value)")
                }
                Err(message) => Response::line(message),
            },
            "toggle" | "done" => match parse_id(rest) {
                Ok(id) => match self.store.toggle_task(id) {
                    Ok(ActionOutcome::NotFound(_)) => Response::line(format!("No task #{id}.")),
                    Ok(_) => self.rendered_lines(Vec::new()),
                    Err(err) => Response::line(error_line(&err)),
                },
                Err(message) => Response::line(message),
            },
            "rm" | "delete" => match self.lookup(rest) {
                Ok(id) => {
                    self.dialog = Dialog::ConfirmDelete { id };
                    Response::lines(Vec::new())
                }
                Err(message) => Response::line(message),
            },
            "sort" if rest.is_empty() => {
                self.dialog = Dialog::SortPicker;
                let mut lines = Vec::new();
                for (index, criterion) in SortCriterion::ALL.iter().enumerate() {
                    lines.push(format!("  {}. {}", index + 1, criterion));
                }
                Response::lines(lines)
            }
            "sort" => self.apply_sort(rest),
            "list" | "ls" => self.rendered_lines(Vec::new()),
            "export" => match serde_json::to_string_pretty(self.store.tasks()) {
                Ok(json) => Response::lines(json.lines().map(str::to_string).collect()),
                Err(err) => Response::line(format!("export failed: {err}")),
            },
            "help" | "?" => Response::lines(HELP.iter().map(|line| line.to_string()).collect()),
            "quit" | "exit" | "q" => Response::quit(),
            other => Response::line(format!("Unknown command `{other}`. Type `help`.")),
        }
    }

    fn apply_sort(&mut self, choice: &str) -> Response {
        let label = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| SortCriterion::ALL.get(index))
            .map(|criterion| criterion.label())
            .unwrap_or(choice);

        match self.store.sort_by_label(label) {
            Ok(ActionOutcome::Sorted(criterion)) => {
                self.sort_label = criterion.label().to_string();
                self.rendered_lines(Vec::new())
            }
            Ok(_) => Response::line(format!("No sort option `{choice}`.")),
            Err(err) => Response::line(error_line(&err)),
        }
    }

    fn lookup(&self, raw: &str) -> Result<TaskId, String> {
        let id = parse_id(raw)?;
        if self.store.get(id).is_none() {
            return Err(format!("No task #{id}."));
        }
        Ok(id)
    }

    fn rendered(&self, message: &str) -> Response {
        self.rendered_lines(vec![message.to_string()])
    }

    fn rendered_lines(&self, mut lines: Vec<String>) -> Response {
        lines.extend(self.render());
        Response::lines(lines)
    }
}

fn parse_id(raw: &str) -> Result<TaskId, String> {
    let raw = raw.trim().trim_start_matches('#');
    if raw.is_empty() {
        return Err("A task id is required.".to_string());
    }
    raw.parse::<u64>()
        .map(TaskId)
        .map_err(|_| format!("`{raw}` is not a task id."))
}

fn current_input(deadline: &str) -> String {
    Deadline::parse(deadline)
        .map(|d| d.to_input())
        .unwrap_or_else(|_| deadline.to_string())
}

fn error_line(err: &StoreError) -> String {
    format!("Rejected: {err}")
}
