//! Test doubles for the reconciler's environment.
//!
//! - [`InMemoryTodoStore`]: a [`TodoStoreClient`] backed by a `Vec`, with
//!   scripted failures and per-operation latency
//! - [`RecordingPresenter`]: a [`Presenter`] that records every call

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use todo_sync_core::presenter::Presenter;
use todo_sync_core::store_client::{StoreFuture, StoreOperation, TodoStoreClient, TodoStoreError};
use todo_sync_core::todo::{Todo, TodoFields, TodoId};
use todo_sync_core::view::{GroupedView, Highlight};

/// A call received by [`InMemoryTodoStore`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreCall {
    /// `list_todos`
    List,
    /// `get_todo`
    Get(TodoId),
    /// `create_todo`
    Create(TodoFields),
    /// `update_todo`
    Update(TodoId, TodoFields),
    /// `delete_todo`
    Delete(TodoId),
}

impl StoreCall {
    /// The operation this call belongs to
    #[must_use]
    pub const fn operation(&self) -> StoreOperation {
        match self {
            Self::List => StoreOperation::List,
            Self::Get(_) => StoreOperation::Get,
            Self::Create(_) => StoreOperation::Create,
            Self::Update(..) => StoreOperation::Update,
            Self::Delete(_) => StoreOperation::Delete,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    todos: Vec<Todo>,
    next_id: u64,
    failures: HashMap<StoreOperation, VecDeque<TodoStoreError>>,
    latency: HashMap<StoreOperation, Duration>,
    calls: Vec<StoreCall>,
}

/// In-memory todo collection for tests
///
/// Ids are assigned from a counter that starts above the largest numeric id
/// of the seeded todos. Failures queued with [`fail_next`](Self::fail_next)
/// are consumed one per call of the matching operation, in place of
/// touching the collection.
///
/// # Example
///
/// ```
/// use todo_sync_core::store_client::{StoreOperation, TodoStoreClient, TodoStoreError};
/// use todo_sync_testing::InMemoryTodoStore;
///
/// # tokio_test::block_on(async {
/// let store = InMemoryTodoStore::new();
/// store.fail_next(StoreOperation::List, TodoStoreError::Network("refused".into()));
///
/// assert!(store.list_todos().await.is_err());
/// assert!(store.list_todos().await.is_ok());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTodoStore {
    inner: Mutex<Inner>,
}

impl InMemoryTodoStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::with_todos(Vec::new())
    }

    /// Create a store seeded with `todos`
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let next_id = todos
            .iter()
            .filter_map(|todo| todo.id.as_str().parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);

        Self {
            inner: Mutex::new(Inner {
                todos,
                next_id,
                ..Inner::default()
            }),
        }
    }

    /// Make the next call of `operation` fail with `error`
    ///
    /// Calling this several times queues several failures.
    pub fn fail_next(&self, operation: StoreOperation, error: TodoStoreError) {
        self.lock()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Delay the response of every later call of `operation` by `delay`
    ///
    /// Calls are served on arrival, so a delayed response carries the
    /// collection as it was when the call came in.
    pub fn set_latency(&self, operation: StoreOperation, delay: Duration) {
        self.lock().latency.insert(operation, delay);
    }

    /// Current contents of the collection
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    /// Every call received so far, in arrival order
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Number of calls received for `operation`
    #[must_use]
    pub fn call_count(&self, operation: StoreOperation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn serve<'a, T, F>(&'a self, call: StoreCall, apply: F) -> StoreFuture<'a, T>
    where
        T: Send + 'a,
        F: FnOnce(&mut Inner) -> Result<T, TodoStoreError> + Send + 'a,
    {
        Box::pin(async move {
            let operation = call.operation();
            let (result, delay) = {
                let mut inner = self.lock();
                inner.calls.push(call);
                let delay = inner.latency.get(&operation).copied();
                let scripted = inner
                    .failures
                    .get_mut(&operation)
                    .and_then(VecDeque::pop_front);
                let result = match scripted {
                    Some(error) => Err(error),
                    None => apply(&mut inner),
                };
                (result, delay)
            };

            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }
}

impl Inner {
    fn position(&self, id: &TodoId) -> Result<usize, TodoStoreError> {
        self.todos
            .iter()
            .position(|todo| &todo.id == id)
            .ok_or_else(|| TodoStoreError::NotFound(id.clone()))
    }
}

impl TodoStoreClient for InMemoryTodoStore {
    fn list_todos(&self) -> StoreFuture<'_, Vec<Todo>> {
        self.serve(StoreCall::List, |inner| Ok(inner.todos.clone()))
    }

    fn get_todo(&self, id: TodoId) -> StoreFuture<'_, Todo> {
        self.serve(StoreCall::Get(id.clone()), move |inner| {
            let index = inner.position(&id)?;
            Ok(inner.todos[index].clone())
        })
    }

    fn create_todo(&self, fields: TodoFields) -> StoreFuture<'_, Todo> {
        self.serve(StoreCall::Create(fields.clone()), move |inner| {
            let id = TodoId::from(inner.next_id);
            inner.next_id += 1;
            let todo = fields.into_todo(id);
            inner.todos.push(todo.clone());
            Ok(todo)
        })
    }

    fn update_todo(&self, id: TodoId, fields: TodoFields) -> StoreFuture<'_, Todo> {
        self.serve(StoreCall::Update(id.clone(), fields.clone()), move |inner| {
            let index = inner.position(&id)?;
            fields.apply_to(&mut inner.todos[index]);
            Ok(inner.todos[index].clone())
        })
    }

    fn delete_todo(&self, id: TodoId) -> StoreFuture<'_, ()> {
        self.serve(StoreCall::Delete(id.clone()), move |inner| {
            let index = inner.position(&id)?;
            inner.todos.remove(index);
            Ok(())
        })
    }
}

/// A call received by [`RecordingPresenter`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresenterCall {
    /// `render_list`
    RenderList {
        /// Todos drawn, in order
        todos: Vec<Todo>,
        /// Header label
        header: String,
        /// Count shown next to the header
        count: usize,
    },
    /// `render_sidebar`
    RenderSidebar {
        /// All todos grouped by bucket
        all: GroupedView,
        /// Completed todos grouped by bucket
        completed: GroupedView,
        /// Highlighted entry
        highlight: Highlight,
    },
    /// `open_modal`
    OpenModal,
    /// `close_modal`
    CloseModal,
    /// `populate_form`
    PopulateForm(Option<Todo>),
    /// `notify`
    Notify(String),
}

/// The arguments of the most recent `render_list` call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedList {
    /// Todos drawn, in order
    pub todos: Vec<Todo>,
    /// Header label
    pub header: String,
    /// Count shown next to the header
    pub count: usize,
}

/// Presenter that records every call for later assertions
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    calls: Mutex<Vec<PresenterCall>>,
}

impl RecordingPresenter {
    /// Create a presenter with an empty call log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<PresenterCall> {
        self.lock().clone()
    }

    /// Forget all recorded calls
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// The most recently rendered list
    #[must_use]
    pub fn last_list(&self) -> Option<RenderedList> {
        self.lock().iter().rev().find_map(|call| match call {
            PresenterCall::RenderList {
                todos,
                header,
                count,
            } => Some(RenderedList {
                todos: todos.clone(),
                header: header.clone(),
                count: *count,
            }),
            _ => None,
        })
    }

    /// The most recent sidebar highlight
    #[must_use]
    pub fn last_highlight(&self) -> Option<Highlight> {
        self.lock().iter().rev().find_map(|call| match call {
            PresenterCall::RenderSidebar { highlight, .. } => Some(*highlight),
            _ => None,
        })
    }

    /// Whether the modal is open after the recorded calls
    #[must_use]
    pub fn modal_open(&self) -> bool {
        self.lock()
            .iter()
            .rev()
            .find_map(|call| match call {
                PresenterCall::OpenModal => Some(true),
                PresenterCall::CloseModal => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Every notification shown, in order
    #[must_use]
    pub fn notifications(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                PresenterCall::Notify(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of `render_list` calls
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|call| matches!(call, PresenterCall::RenderList { .. }))
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PresenterCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: PresenterCall) {
        self.lock().push(call);
    }
}

impl Presenter for RecordingPresenter {
    fn render_list(&self, todos: &[Todo], header: &str, count: usize) {
        self.record(PresenterCall::RenderList {
            todos: todos.to_vec(),
            header: header.to_string(),
            count,
        });
    }

    fn render_sidebar(&self, all: &GroupedView, completed: &GroupedView, highlight: Highlight) {
        self.record(PresenterCall::RenderSidebar {
            all: all.clone(),
            completed: completed.clone(),
            highlight,
        });
    }

    fn open_modal(&self) {
        self.record(PresenterCall::OpenModal);
    }

    fn close_modal(&self) {
        self.record(PresenterCall::CloseModal);
    }

    fn populate_form(&self, todo: Option<&Todo>) {
        self.record(PresenterCall::PopulateForm(todo.cloned()));
    }

    fn notify(&self, message: &str) {
        self.record(PresenterCall::Notify(message.to_string()));
    }
}
