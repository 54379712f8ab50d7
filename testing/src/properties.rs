//! Proptest strategies for todo collections.

use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;
use todo_sync_core::todo::Todo;

/// An arbitrary todo with the given id
///
/// Due dates are sometimes missing entirely and sometimes only half set.
pub fn arb_todo_with_id(id: String) -> impl Strategy<Value = Todo> {
    (
        "[A-Za-z][A-Za-z ]{2,20}",
        option::of(1u8..=12),
        option::of(2020u16..=2030),
        any::<bool>(),
    )
        .prop_map(move |(title, due_month, due_year, completed)| {
            let mut todo = Todo::new(id.as_str(), title).with_completed(completed);
            todo.due_month = due_month;
            todo.due_year = due_year;
            todo
        })
}

/// An arbitrary todo with a numeric id
pub fn arb_todo() -> impl Strategy<Value = Todo> {
    (1u64..10_000).prop_flat_map(|id| arb_todo_with_id(id.to_string()))
}

/// Up to `max` todos with distinct ids `1..=n`
pub fn arb_todos(max: usize) -> impl Strategy<Value = Vec<Todo>> {
    (0..=max).prop_flat_map(|len| {
        let todos: Vec<_> = (1..=len).map(|id| arb_todo_with_id(id.to_string())).collect();
        todos
    })
}

/// Convenience wrapper for `arb_todos(30)`
pub fn arb_collection() -> impl Strategy<Value = Vec<Todo>> {
    arb_todos(30)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    proptest! {
        #[test]
        fn ids_are_unique(todos in arb_todos(20)) {
            let ids: HashSet<_> = todos.iter().map(|todo| todo.id.clone()).collect();
            prop_assert_eq!(ids.len(), todos.len());
        }

        #[test]
        fn months_are_in_range(todo in arb_todo()) {
            if let Some(month) = todo.due_month {
                prop_assert!((1..=12).contains(&month));
            }
        }
    }
}
