//! Sort criteria for the task list.
//!
//! # Invariants
//! - Every criterion is applied with a stable sort.
//! - Tasks with unreadable deadlines order after all readable ones.

use crate::model::task::Task;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Ordering requested from the sort picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortCriterion {
    /// Earliest deadline first.
    Deadline,
    /// Alphabetical by name.
    Name,
    /// Open tasks before completed ones.
    Completed,
}

impl SortCriterion {
    pub const ALL: [SortCriterion; 3] = [Self::Deadline, Self::Name, Self::Completed];

    /// Maps a picker label to a criterion. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Deadline" => Some(Self::Deadline),
            "Name" => Some(Self::Name),
            "Completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Deadline => "Deadline",
            Self::Name => "Name",
            Self::Completed => "Completed",
        }
    }
}

impl Display for SortCriterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reorders `tasks` in place.
pub fn sort_tasks(tasks: &mut [Task], criterion: SortCriterion) {
    match criterion {
        SortCriterion::Deadline => tasks.sort_by_cached_key(|task| {
            let deadline = task.deadline_value();
            (deadline.is_none(), deadline)
        }),
        SortCriterion::Name => tasks.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
        SortCriterion::Completed => tasks.sort_by_key(|task| task.completed),
    }
}

/// Case-insensitive comparison with lowercase-first tie-break.
///
/// `["Bravo", "alpha", "Charlie"]` orders as `alpha, Bravo, Charlie`, and
/// `"apple"` sorts before `"Apple"`.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::{locale_cmp, SortCriterion};
    use std::cmp::Ordering;

    #[test]
    fn locale_cmp_ignores_case_first() {
        assert_eq!(locale_cmp("alpha", "Bravo"), Ordering::Less);
        assert_eq!(locale_cmp("Bravo", "charlie"), Ordering::Less);
        assert_eq!(locale_cmp("apple", "Apple"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn labels_round_trip() {
        for criterion in SortCriterion::ALL {
            assert_eq!(SortCriterion::from_label(criterion.label()), Some(criterion));
        }
        assert_eq!(SortCriterion::from_label("Sort by."), None);
        assert_eq!(SortCriterion::from_label("name"), None);
    }
}
