//! Ready-made todos for tests.

use todo_sync_core::todo::Todo;

/// An open todo without a due date
#[must_use]
pub fn todo(id: &str, title: &str) -> Todo {
    Todo::new(id, title)
}

/// An open todo due in `month`/`year`
#[must_use]
pub fn dated(id: &str, title: &str, month: u8, year: u16) -> Todo {
    Todo::new(id, title).with_due(month, year)
}

/// A completed todo due in `month`/`year`
#[must_use]
pub fn done(id: &str, title: &str, month: u8, year: u16) -> Todo {
    dated(id, title, month, year).with_completed(true)
}

/// Three todos: `A` open due 3/2024, `B` open undated, `C` done due 3/2024
///
/// Flat order under the `all` scope is `[A, B, C]`; grouped they form
/// `3/24: [A, C]` and `No Due Date: [B]`.
#[must_use]
pub fn mixed_todos() -> Vec<Todo> {
    vec![
        dated("1", "A", 3, 2024),
        todo("2", "B"),
        done("3", "C", 3, 2024),
    ]
}

/// A larger collection spread over several months and both completion states
#[must_use]
pub fn household_todos() -> Vec<Todo> {
    vec![
        dated("1", "Pay rent", 2, 2024),
        dated("2", "File taxes", 4, 2024).with_description("state and federal"),
        done("3", "Renew passport", 1, 2024),
        todo("4", "Fix the gate"),
        done("5", "Book flights", 4, 2024),
        dated("6", "Dentist", 12, 2023),
        todo("7", "Clean gutters").with_completed(true),
    ]
}
