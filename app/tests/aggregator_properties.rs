//! Property tests for the aggregator.

use proptest::prelude::*;
use std::collections::HashMap;
use todo_sync::ViewState;
use todo_sync::aggregator::{
    aggregate, due_bucket_of, filter_completed, group_by_due_bucket, order_by_completion,
    order_by_date,
};
use todo_sync_core::todo::{Todo, TodoId};
use todo_sync_core::view::{DueBucket, Scope};
use todo_sync_testing::properties::arb_collection;

fn ids(todos: &[Todo]) -> Vec<TodoId> {
    todos.iter().map(|todo| todo.id.clone()).collect()
}

fn sorted_ids(todos: &[Todo]) -> Vec<TodoId> {
    let mut ids = ids(todos);
    ids.sort();
    ids
}

proptest! {
    #[test]
    fn completion_order_is_a_stable_partition(todos in arb_collection()) {
        let ordered = order_by_completion(&todos);
        prop_assert_eq!(ordered.len(), todos.len());

        let split = ordered.iter().position(|todo| todo.completed).unwrap_or(ordered.len());
        prop_assert!(ordered[split..].iter().all(|todo| todo.completed));

        let open: Vec<_> = todos.iter().filter(|t| !t.completed).cloned().collect();
        prop_assert_eq!(&ordered[..split], open.as_slice());
        let completed = filter_completed(&todos);
        prop_assert_eq!(&ordered[split..], completed.as_slice());
    }

    #[test]
    fn date_order_is_ascending_and_repeat_stable(todos in arb_collection()) {
        let ordered = order_by_date(&todos);
        prop_assert_eq!(sorted_ids(&ordered), sorted_ids(&todos));
        prop_assert_eq!(order_by_date(&ordered), ordered.clone());

        for pair in ordered.windows(2) {
            match (pair[0].due_date(), pair[1].due_date()) {
                (Some(a), Some(b)) => prop_assert!(a <= b),
                (None, Some(_)) => prop_assert!(false, "undated todo before a dated one"),
                _ => {}
            }
        }
    }

    #[test]
    fn grouping_partitions_input(todos in arb_collection()) {
        let grouped = group_by_due_bucket(&order_by_date(&todos));
        prop_assert_eq!(grouped.todo_count(), todos.len());

        let mut seen: HashMap<TodoId, DueBucket> = HashMap::new();
        for group in grouped.groups() {
            prop_assert!(!group.todos.is_empty());
            for todo in &group.todos {
                prop_assert_eq!(due_bucket_of(todo), group.bucket);
                prop_assert!(seen.insert(todo.id.clone(), group.bucket).is_none());
            }
        }

        let flattened: Vec<Todo> = grouped
            .groups()
            .iter()
            .flat_map(|group| group.todos.clone())
            .collect();
        prop_assert_eq!(sorted_ids(&flattened), sorted_ids(&todos));
    }

    #[test]
    fn snapshot_is_deterministic_and_counts_its_list(
        todos in arb_collection(),
        completed_scope in any::<bool>(),
    ) {
        let mut view = ViewState::new();
        if completed_scope {
            view.set_scope(Scope::Completed);
        }

        let first = aggregate(&todos, &view);
        prop_assert_eq!(&first, &aggregate(&todos, &view));
        prop_assert_eq!(first.count, first.list.len());
        if completed_scope {
            prop_assert!(first.list.iter().all(|todo| todo.completed));
        } else {
            prop_assert_eq!(first.count, todos.len());
        }
    }

    #[test]
    fn bucket_view_is_the_group(todos in arb_collection(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!todos.is_empty());
        let bucket = due_bucket_of(&todos[pick.index(todos.len())]);

        let mut view = ViewState::new();
        view.set_active_bucket(bucket);
        let snapshot = aggregate(&todos, &view);

        let group = snapshot.sidebar.all.get(&bucket).unwrap_or_default();
        prop_assert_eq!(sorted_ids(&snapshot.list), sorted_ids(group));
        prop_assert_eq!(snapshot.header, bucket.to_string());
    }
}
