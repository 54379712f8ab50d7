//! Pure transformations from a todo collection to what the UI shows.
//!
//! Nothing here touches the network or the presenter. The same input always
//! yields the same output, so two renders of an unchanged cache are
//! identical.

use crate::view_state::ViewState;
use todo_sync_core::todo::Todo;
use todo_sync_core::view::{DueBucket, GroupedView, RenderSnapshot, Scope, Sidebar};

/// The bucket a todo is grouped under
///
/// Todos with only one of month/year set count as undated.
#[must_use]
pub fn due_bucket_of(todo: &Todo) -> DueBucket {
    todo.due_date()
        .map_or(DueBucket::NoDueDate, DueBucket::for_date)
}

/// Ascending by (year, month); undated todos last in input order
#[must_use]
pub fn order_by_date(todos: &[Todo]) -> Vec<Todo> {
    let mut ordered = todos.to_vec();
    ordered.sort_by_key(|todo| {
        let due = todo.due_date();
        (due.is_none(), due)
    });
    ordered
}

/// Open todos first, then completed ones, each keeping its relative order
#[must_use]
pub fn order_by_completion(todos: &[Todo]) -> Vec<Todo> {
    let (open, done): (Vec<Todo>, Vec<Todo>) =
        todos.iter().cloned().partition(|todo| !todo.completed);
    open.into_iter().chain(done).collect()
}

/// Group by due bucket, buckets in order of first appearance
#[must_use]
pub fn group_by_due_bucket(todos: &[Todo]) -> GroupedView {
    let mut grouped = GroupedView::new();
    for todo in todos {
        grouped.push(due_bucket_of(todo), todo.clone());
    }
    grouped
}

/// Only the completed todos, in input order
#[must_use]
pub fn filter_completed(todos: &[Todo]) -> Vec<Todo> {
    todos.iter().filter(|todo| todo.completed).cloned().collect()
}

/// Header label for the main list
#[must_use]
pub fn header_for(view: &ViewState) -> String {
    view.active_bucket()
        .map_or_else(|| view.scope().label().to_string(), |bucket| bucket.to_string())
}

/// Build the full render snapshot for `todos` under `view`
///
/// An active bucket that no longer has todos yields an empty list with a
/// count of zero.
#[must_use]
pub fn aggregate(todos: &[Todo], view: &ViewState) -> RenderSnapshot {
    let completed = filter_completed(todos);
    let scoped = match view.scope() {
        Scope::All => todos,
        Scope::Completed => completed.as_slice(),
    };

    let mut list = order_by_completion(&order_by_date(scoped));
    if let Some(bucket) = view.active_bucket() {
        list.retain(|todo| due_bucket_of(todo) == bucket);
    }

    let sidebar = Sidebar {
        all: group_by_due_bucket(&order_by_date(todos)),
        completed: group_by_due_bucket(&order_by_date(&completed)),
    };

    RenderSnapshot {
        header: header_for(view),
        count: list.len(),
        list,
        sidebar,
        highlight: view.highlight(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use todo_sync_core::todo::DueDate;

    fn titles(todos: &[Todo]) -> Vec<&str> {
        todos.iter().map(|todo| todo.title.as_str()).collect()
    }

    fn sample() -> Vec<Todo> {
        vec![
            Todo::new("1", "A").with_due(3, 2024),
            Todo::new("2", "B"),
            Todo::new("3", "C").with_due(3, 2024).with_completed(true),
        ]
    }

    #[test]
    fn bucket_of_dated_and_undated() {
        let dated = Todo::new("1", "Taxes").with_due(3, 2024);
        assert_eq!(due_bucket_of(&dated).to_string(), "3/24");
        assert_eq!(due_bucket_of(&Todo::new("2", "Gate")).to_string(), "No Due Date");

        let mut half = Todo::new("3", "Half");
        half.due_year = Some(2024);
        assert_eq!(due_bucket_of(&half), DueBucket::NoDueDate);
    }

    #[test]
    fn date_order_puts_undated_last() {
        let todos = vec![
            Todo::new("1", "none-1"),
            Todo::new("2", "apr").with_due(4, 2024),
            Todo::new("3", "none-2"),
            Todo::new("4", "dec-23").with_due(12, 2023),
            Todo::new("5", "mar").with_due(3, 2024),
        ];

        let ordered = order_by_date(&todos);
        assert_eq!(titles(&ordered), vec!["dec-23", "mar", "apr", "none-1", "none-2"]);
        assert_eq!(order_by_date(&ordered), ordered);
    }

    #[test]
    fn completion_order_is_a_stable_partition() {
        let todos = vec![
            Todo::new("1", "a").with_completed(true),
            Todo::new("2", "b"),
            Todo::new("3", "c").with_completed(true),
            Todo::new("4", "d"),
        ];

        assert_eq!(titles(&order_by_completion(&todos)), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn all_scope_flat_order_and_grouping() {
        let snapshot = aggregate(&sample(), &ViewState::new());

        assert_eq!(snapshot.header, "All Todos");
        assert_eq!(titles(&snapshot.list), vec!["A", "B", "C"]);
        assert_eq!(snapshot.count, 3);

        let march = DueBucket::for_date(DueDate::new(3, 2024));
        let all = &snapshot.sidebar.all;
        assert_eq!(all.buckets().copied().collect::<Vec<_>>(), vec![march, DueBucket::NoDueDate]);
        assert_eq!(titles(all.get(&march).unwrap()), vec!["A", "C"]);
        assert_eq!(titles(all.get(&DueBucket::NoDueDate).unwrap()), vec!["B"]);

        assert_eq!(snapshot.sidebar.completed.todo_count(), 1);
    }

    #[test]
    fn completed_scope_lists_only_done_todos() {
        let mut view = ViewState::new();
        view.set_scope(Scope::Completed);

        let snapshot = aggregate(&sample(), &view);
        assert_eq!(snapshot.header, "Completed");
        assert_eq!(titles(&snapshot.list), vec!["C"]);
        assert_eq!(snapshot.count, 1);
    }

    #[test]
    fn active_bucket_restricts_list_and_names_header() {
        let mut view = ViewState::new();
        view.set_active_bucket(DueBucket::for_date(DueDate::new(3, 2024)));

        let snapshot = aggregate(&sample(), &view);
        assert_eq!(snapshot.header, "3/24");
        assert_eq!(titles(&snapshot.list), vec!["A", "C"]);
        assert_eq!(snapshot.highlight.bucket, view.active_bucket());
    }

    #[test]
    fn vanished_bucket_renders_empty() {
        let mut view = ViewState::new();
        view.set_active_bucket(DueBucket::for_date(DueDate::new(9, 2030)));

        let snapshot = aggregate(&sample(), &view);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.count, 0);
        assert_eq!(snapshot.header, "9/30");
    }

    #[test]
    fn grouping_stays_chronological_across_centuries() {
        let todos = vec![
            Todo::new("1", "near").with_due(3, 2024),
            Todo::new("2", "between").with_due(6, 2050),
            Todo::new("3", "far").with_due(3, 2124),
        ];

        let grouped = group_by_due_bucket(&order_by_date(&todos));
        let members: Vec<Vec<&str>> = grouped
            .groups()
            .iter()
            .map(|group| titles(&group.todos))
            .collect();
        assert_eq!(members, vec![vec!["near"], vec!["between"], vec!["far"]]);
    }

    #[test]
    fn empty_collection() {
        let snapshot = aggregate(&[], &ViewState::new());
        assert!(snapshot.is_empty());
        assert!(snapshot.sidebar.all.is_empty());
    }
}
