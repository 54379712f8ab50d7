//! Todo records as served by the remote todo collection.
//!
//! The collection has historically been fed straight from an HTML form, so the
//! wire format is forgiving: ids may be numbers or strings, due month/year may
//! be numbers, numeric strings or blanks. Deserialization normalises all of
//! that into typed optional fields.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Server-assigned todo identifier
///
/// Opaque to the client. Numeric ids from the server are kept in their
/// decimal string form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Creates a `TodoId` from any string-like value
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawScalar::deserialize(deserializer)? {
            RawScalar::Number(n) => Ok(Self::from(n)),
            RawScalar::Text(s) if s.trim().is_empty() => Err(de::Error::custom("empty todo id")),
            RawScalar::Text(s) => Ok(Self(s)),
        }
    }
}

/// Month/year a todo is due in
///
/// Field order makes the derived ordering chronological.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DueDate {
    /// Full year, e.g. 2024
    pub year: u16,
    /// Month, 1-12
    pub month: u8,
}

impl DueDate {
    /// Creates a due date
    #[must_use]
    pub const fn new(month: u8, year: u16) -> Self {
        Self { year, month }
    }
}

/// A single todo record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Server-assigned identifier
    pub id: TodoId,
    /// Title, at least three characters when submitted through the form
    pub title: String,
    /// Free-form description
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    /// Due month (1-12)
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_month: Option<u8>,
    /// Due year
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_year: Option<u16>,
    /// Whether the todo is done
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    /// Creates an open todo with no description and no due date
    #[must_use]
    pub fn new(id: impl Into<TodoId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            due_month: None,
            due_year: None,
            completed: false,
        }
    }

    /// Sets the due month and year
    #[must_use]
    pub const fn with_due(mut self, month: u8, year: u16) -> Self {
        self.due_month = Some(month);
        self.due_year = Some(year);
        self
    }

    /// Sets the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the completion flag
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// The due date, present only when both month and year are set
    #[must_use]
    pub const fn due_date(&self) -> Option<DueDate> {
        match (self.due_month, self.due_year) {
            (Some(month), Some(year)) => Some(DueDate::new(month, year)),
            _ => None,
        }
    }
}

/// Partial set of a todo's mutable attributes
///
/// Used as the body of create and update calls. Keys left as `None` are not
/// serialized, so an update leaves the matching server-side values untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoFields {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New due month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_month: Option<u8>,
    /// New due year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_year: Option<u16>,
    /// New completion flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoFields {
    /// Fields carrying only a title
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Fields carrying only the completion flag
    #[must_use]
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Sets the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due month and year
    #[must_use]
    pub fn with_due(mut self, month: u8, year: u16) -> Self {
        self.due_month = Some(month);
        self.due_year = Some(year);
        self
    }

    /// Returns true when no field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_month.is_none()
            && self.due_year.is_none()
            && self.completed.is_none()
    }

    /// Overwrites the attributes of `todo` that are set in these fields
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            todo.description = Some(description.clone());
        }
        if let Some(month) = self.due_month {
            todo.due_month = Some(month);
        }
        if let Some(year) = self.due_year {
            todo.due_year = Some(year);
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }

    /// Builds a new record from these fields under the given id
    #[must_use]
    pub fn into_todo(self, id: TodoId) -> Todo {
        let mut todo = Todo::new(id, String::new());
        self.apply_to(&mut todo);
        todo
    }
}

/// Accepts numbers, numeric strings, blanks and null.
///
/// Text that does not parse (a leftover form placeholder such as `"Month"`)
/// decodes to `None` rather than failing the whole record.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<u64>,
{
    match Option::<RawScalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawScalar::Number(n)) => T::try_from(n)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("number {n} out of range"))),
        Some(RawScalar::Text(s)) => Ok(s.trim().parse().ok()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.filter(|s| !s.trim().is_empty()))
}
