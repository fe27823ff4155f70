//! Task list state.
//!
//! # Responsibility
//! - `reducer`: pure `(state, action) -> (state, outcome)` transitions.
//! - `sort`: sort criteria and comparators.
//! - `task_store`: the owned list, id allocation and error mapping.

pub mod reducer;
pub mod sort;
pub mod task_store;
