//! State and actions of the reconciler.

use crate::view_state::ViewState;
use std::collections::HashMap;
use todo_sync_core::store_client::{StoreOperation, TodoStoreError};
use todo_sync_core::todo::{Todo, TodoFields, TodoId};
use todo_sync_core::view::{DueBucket, RenderSnapshot, Scope};

/// The last fetched collection plus an id index
///
/// Replaced wholesale on every successful fetch, never patched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalCache {
    todos: Vec<Todo>,
    by_id: HashMap<TodoId, usize>,
}

impl LocalCache {
    /// Build a cache holding `todos`
    #[must_use]
    pub fn new(todos: Vec<Todo>) -> Self {
        let by_id = todos
            .iter()
            .enumerate()
            .map(|(index, todo)| (todo.id.clone(), index))
            .collect();
        Self { todos, by_id }
    }

    /// Replace the whole collection
    pub fn replace(&mut self, todos: Vec<Todo>) {
        *self = Self::new(todos);
    }

    /// Cached todos in fetch order
    #[must_use]
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Look up a todo by id
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.by_id.get(id).and_then(|&index| self.todos.get(index))
    }

    /// Number of cached todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// True when nothing is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}

/// Everything the reconciler owns
#[derive(Clone, Debug, Default)]
pub struct TodoAppState {
    /// Scope, bucket and edit session
    pub view: ViewState,
    /// Last fetched collection
    pub cache: LocalCache,
    /// Last snapshot handed to the presenter
    pub snapshot: Option<RenderSnapshot>,
    /// Last failure shown to the user
    pub last_notification: Option<String>,
}

impl TodoAppState {
    /// Empty state: all scope, nothing loaded
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Commands from the user and results fed back by effects
#[derive(Clone, Debug)]
pub enum TodoAction {
    // Commands
    /// Fetch the collection and render it
    Load,
    /// Save the open form: create when adding, update when editing
    Submit {
        /// Validated form fields
        fields: TodoFields,
    },
    /// Delete a todo
    Remove {
        /// Todo to delete
        id: TodoId,
    },
    /// Set the completion flag of a todo
    ToggleComplete {
        /// Todo to update
        id: TodoId,
        /// New completion flag
        completed: bool,
    },
    /// Open the form for an existing todo
    StartEdit {
        /// Todo to edit
        id: TodoId,
    },
    /// Open an empty form
    BeginAdd,
    /// Close the form without saving
    DismissModal,
    /// Switch between all and completed todos
    SelectScope {
        /// Scope to show
        scope: Scope,
    },
    /// Restrict the list to one due bucket, or show the whole scope again
    SelectBucket {
        /// Bucket to show, `None` for the whole scope
        bucket: Option<DueBucket>,
    },

    // Results
    /// The collection was fetched
    TodosLoaded {
        /// Fetched todos
        todos: Vec<Todo>,
    },
    /// A create, update or toggle succeeded
    Saved {
        /// Record returned by the store
        todo: Todo,
    },
    /// A delete succeeded
    Removed {
        /// Deleted todo
        id: TodoId,
    },
    /// A todo missing from the cache was fetched for editing
    EditResolved {
        /// Fetched todo
        todo: Todo,
    },
    /// A store call failed
    StoreFailed {
        /// Call that failed
        operation: StoreOperation,
        /// Failure returned by the client
        error: TodoStoreError,
    },
}
