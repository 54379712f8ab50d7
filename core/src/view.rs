//! Presentation-side view types.
//!
//! These are what the aggregator produces and what the presenter consumes:
//! the scope filter, the due-date bucket key, grouped views for the sidebar
//! and the full render snapshot.

use crate::todo::{DueDate, Todo};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Label of the bucket holding todos without a complete due date
pub const NO_DUE_DATE: &str = "No Due Date";

/// Top-level filter of the todo list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Every todo
    #[default]
    All,
    /// Completed todos only
    Completed,
}

impl Scope {
    /// Header shown when no bucket is selected
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Todos",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

/// Grouping key derived from a todo's due date
///
/// Displays as `"<month>/<yy>"` or as [`NO_DUE_DATE`]. The key keeps the
/// full year, so 3/2024 and 3/2124 are distinct buckets that print alike.
/// Parsing a two-digit year reads it as 20yy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DueBucket {
    /// A calendar month
    Month {
        /// Month as stored on the todo
        month: u8,
        /// Full year
        year: u16,
    },
    /// Missing month or year
    NoDueDate,
}

impl DueBucket {
    /// Bucket for a complete due date
    #[must_use]
    pub const fn for_date(date: DueDate) -> Self {
        Self::Month {
            month: date.month,
            year: date.year,
        }
    }
}

impl fmt::Display for DueBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month { month, year } => write!(f, "{month}/{:02}", year % 100),
            Self::NoDueDate => f.write_str(NO_DUE_DATE),
        }
    }
}

/// Error parsing a bucket key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid due bucket key: {0:?}")]
pub struct ParseBucketError(String);

impl FromStr for DueBucket {
    type Err = ParseBucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(NO_DUE_DATE) {
            return Ok(Self::NoDueDate);
        }

        let invalid = || ParseBucketError(s.to_string());
        let (month, year) = trimmed.split_once('/').ok_or_else(invalid)?;
        let month: u8 = month.trim().parse().map_err(|_| invalid())?;
        let year: u16 = year.trim().parse().map_err(|_| invalid())?;
        let year = if year < 100 { 2000 + year } else { year };
        Ok(Self::for_date(DueDate::new(month, year)))
    }
}

impl From<DueBucket> for String {
    fn from(bucket: DueBucket) -> Self {
        bucket.to_string()
    }
}

impl TryFrom<String> for DueBucket {
    type Error = ParseBucketError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Todos sharing one due bucket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketGroup {
    /// The shared bucket
    pub bucket: DueBucket,
    /// Members, in aggregation order
    pub todos: Vec<Todo>,
}

/// Todos grouped by due bucket
///
/// Buckets keep insertion order, which the aggregator makes chronological.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedView {
    groups: Vec<BucketGroup>,
}

impl GroupedView {
    /// Creates an empty grouping
    #[must_use]
    pub const fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Appends `todo` to its bucket, creating the bucket at the end if new
    pub fn push(&mut self, bucket: DueBucket, todo: Todo) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.bucket == bucket) {
            group.todos.push(todo);
        } else {
            self.groups.push(BucketGroup {
                bucket,
                todos: vec![todo],
            });
        }
    }

    /// Members of `bucket`, if it exists
    #[must_use]
    pub fn get(&self, bucket: &DueBucket) -> Option<&[Todo]> {
        self.groups
            .iter()
            .find(|g| &g.bucket == bucket)
            .map(|g| g.todos.as_slice())
    }

    /// Whether `bucket` has at least one member
    #[must_use]
    pub fn contains(&self, bucket: &DueBucket) -> bool {
        self.get(bucket).is_some()
    }

    /// Buckets in display order
    pub fn buckets(&self) -> impl Iterator<Item = &DueBucket> {
        self.groups.iter().map(|g| &g.bucket)
    }

    /// Groups in display order
    #[must_use]
    pub fn groups(&self) -> &[BucketGroup] {
        &self.groups
    }

    /// Number of buckets
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when there are no buckets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of grouped todos
    #[must_use]
    pub fn todo_count(&self) -> usize {
        self.groups.iter().map(|g| g.todos.len()).sum()
    }
}

/// Which sidebar entry is highlighted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    /// Selected scope
    pub scope: Scope,
    /// Selected bucket under that scope
    pub bucket: Option<DueBucket>,
}

/// Sidebar content: both groupings plus the highlighted entry
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sidebar {
    /// Every todo grouped by bucket
    pub all: GroupedView,
    /// Completed todos grouped by bucket
    pub completed: GroupedView,
}

/// Everything the presentation layer needs to draw one frame
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// Header label above the list
    pub header: String,
    /// Ordered todos in the main list
    pub list: Vec<Todo>,
    /// Number of todos in `list`
    pub count: usize,
    /// Sidebar groupings
    pub sidebar: Sidebar,
    /// Highlighted sidebar entry
    pub highlight: Highlight,
}

impl RenderSnapshot {
    /// True when the main list has nothing to show
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bucket_key_uses_two_digit_year() {
        let bucket = DueBucket::for_date(DueDate::new(3, 2024));
        assert_eq!(bucket.to_string(), "3/24");

        let early = DueBucket::for_date(DueDate::new(11, 2005));
        assert_eq!(early.to_string(), "11/05");
    }

    #[test]
    fn buckets_a_century_apart_stay_distinct() {
        let near = DueBucket::for_date(DueDate::new(3, 2024));
        let far = DueBucket::for_date(DueDate::new(3, 2124));

        assert_ne!(near, far);
        assert_eq!(near.to_string(), far.to_string());
    }

    #[test]
    fn bucket_key_parses_back() {
        assert_eq!(
            "3/24".parse::<DueBucket>(),
            Ok(DueBucket::Month {
                month: 3,
                year: 2024
            })
        );
        assert_eq!("3/2024".parse::<DueBucket>(), "3/24".parse::<DueBucket>());
        assert_eq!("no due date".parse::<DueBucket>(), Ok(DueBucket::NoDueDate));
        assert!("march".parse::<DueBucket>().is_err());
    }

    #[test]
    fn bucket_serializes_as_key() {
        let json = serde_json::to_string(&DueBucket::NoDueDate).unwrap();
        assert_eq!(json, "\"No Due Date\"");
    }

    #[test]
    fn grouped_view_keeps_first_appearance_order() {
        let late = DueBucket::for_date(DueDate::new(5, 2024));
        let early = DueBucket::for_date(DueDate::new(1, 2024));

        let mut view = GroupedView::new();
        view.push(late, Todo::new("1", "first"));
        view.push(early, Todo::new("2", "second"));
        view.push(late, Todo::new("3", "third"));

        let order: Vec<_> = view.buckets().copied().collect();
        assert_eq!(order, vec![late, early]);
        assert_eq!(view.get(&late).map(<[Todo]>::len), Some(2));
        assert_eq!(view.todo_count(), 3);
        assert!(!view.contains(&DueBucket::NoDueDate));
    }

    #[test]
    fn scope_labels() {
        assert_eq!(Scope::All.label(), "All Todos");
        assert_eq!(Scope::Completed.label(), "Completed");
        assert_eq!(Scope::default(), Scope::All);
    }
}
