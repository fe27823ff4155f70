//! Due-soon alerting over the task list.
//!
//! # Responsibility
//! - Scan tasks once per tick and notify an injected sink.
//!
//! # Invariants
//! - Monitoring only reads the task list; the store stays the only writer.

pub mod due_alert;
