//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the task record and the deadline value type shared by the
//!   store, the alert monitor and the view.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deadline text is only interpreted through `Deadline`.

pub mod deadline;
pub mod task;
