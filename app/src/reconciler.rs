//! The reconciler: user intents and store results in, render effects out.
//!
//! Store calls run as effects and come back as result actions. Failures of
//! any call are turned into [`TodoAction::StoreFailed`], which leaves the
//! cache and the view state untouched and tells the user.

use crate::aggregator::aggregate;
use crate::presentation::PresentationQueue;
use crate::types::{TodoAction, TodoAppState};
use std::sync::Arc;
use todo_sync_core::effect::Effect;
use todo_sync_core::presenter::Presenter;
use todo_sync_core::reducer::Reducer;
use todo_sync_core::store_client::{StoreOperation, TodoStoreClient, TodoStoreError};
use todo_sync_core::todo::{Todo, TodoFields, TodoId};
use todo_sync_core::{SmallVec, smallvec};
use todo_sync_runtime::metrics::ReconcilerMetrics;

/// Dependencies the reconciler's effects run against
#[derive(Clone)]
pub struct ReconcilerEnvironment {
    /// Remote todo collection
    pub store: Arc<dyn TodoStoreClient>,
    /// Presentation layer, fed in reduce order
    pub presentation: PresentationQueue,
}

impl ReconcilerEnvironment {
    /// Creates a new `ReconcilerEnvironment`
    #[must_use]
    pub fn new(store: Arc<dyn TodoStoreClient>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            store,
            presentation: PresentationQueue::new(presenter),
        }
    }
}

/// Reducer keeping the view in step with the todo store
#[derive(Clone, Debug, Default)]
pub struct Reconciler;

impl Reconciler {
    /// Creates a new `Reconciler`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Aggregate the cache under the current view and draw it
    fn render(state: &mut TodoAppState, env: &ReconcilerEnvironment) -> Effect<TodoAction> {
        let snapshot = aggregate(state.cache.todos(), &state.view);
        tracing::debug!(header = %snapshot.header, count = snapshot.count, "Rendering");
        ReconcilerMetrics::record_render();
        state.snapshot = Some(snapshot.clone());

        Self::present(env, move |presenter| {
            presenter.render_list(&snapshot.list, &snapshot.header, snapshot.count);
            presenter.render_sidebar(
                &snapshot.sidebar.all,
                &snapshot.sidebar.completed,
                snapshot.highlight,
            );
        })
    }

    /// Run presenter calls as one effect
    ///
    /// The slot is taken now, so calls reach the presenter in the order the
    /// actions were reduced, whatever order the effects run in.
    fn present<F>(env: &ReconcilerEnvironment, calls: F) -> Effect<TodoAction>
    where
        F: FnOnce(&dyn Presenter) + Send + 'static,
    {
        let ticket = env.presentation.ticket();
        Effect::future(async move {
            ticket.present(calls);
            None
        })
    }

    fn fetch_all(env: &ReconcilerEnvironment) -> Effect<TodoAction> {
        let store = Arc::clone(&env.store);
        Effect::future(async move {
            settle(StoreOperation::List, store.list_todos().await, |todos| {
                TodoAction::TodosLoaded { todos }
            })
        })
    }

    fn fetch_one(env: &ReconcilerEnvironment, id: TodoId) -> Effect<TodoAction> {
        let store = Arc::clone(&env.store);
        Effect::future(async move {
            settle(StoreOperation::Get, store.get_todo(id).await, |todo| {
                TodoAction::EditResolved { todo }
            })
        })
    }

    fn create(env: &ReconcilerEnvironment, fields: TodoFields) -> Effect<TodoAction> {
        let store = Arc::clone(&env.store);
        Effect::future(async move {
            settle(StoreOperation::Create, store.create_todo(fields).await, |todo| {
                TodoAction::Saved { todo }
            })
        })
    }

    fn update(env: &ReconcilerEnvironment, id: TodoId, fields: TodoFields) -> Effect<TodoAction> {
        let store = Arc::clone(&env.store);
        Effect::future(async move {
            settle(StoreOperation::Update, store.update_todo(id, fields).await, |todo| {
                TodoAction::Saved { todo }
            })
        })
    }

    fn delete(env: &ReconcilerEnvironment, id: TodoId) -> Effect<TodoAction> {
        let store = Arc::clone(&env.store);
        Effect::future(async move {
            settle(StoreOperation::Delete, store.delete_todo(id.clone()).await, |()| {
                TodoAction::Removed { id }
            })
        })
    }

    /// Start editing `todo` and show it in the form
    fn open_editor(
        state: &mut TodoAppState,
        todo: Todo,
        env: &ReconcilerEnvironment,
    ) -> SmallVec<[Effect<TodoAction>; 4]> {
        state.view.begin_edit(todo.id.clone());
        smallvec![Self::present(env, move |presenter| {
            presenter.populate_form(Some(&todo));
            presenter.open_modal();
        })]
    }
}

/// Map a store result onto the success action or `StoreFailed`
fn settle<T>(
    operation: StoreOperation,
    result: Result<T, TodoStoreError>,
    on_success: impl FnOnce(T) -> TodoAction,
) -> Option<TodoAction> {
    Some(match result {
        Ok(value) => on_success(value),
        Err(error) => TodoAction::StoreFailed { operation, error },
    })
}

/// Message shown to the user when `operation` fails
#[must_use]
pub fn failure_message(operation: StoreOperation, error: &TodoStoreError) -> String {
    let attempted = match operation {
        StoreOperation::List => "load todos",
        StoreOperation::Get => "open todo",
        StoreOperation::Create => "add todo",
        StoreOperation::Update => "save todo",
        StoreOperation::Delete => "delete todo",
    };
    format!("Could not {attempted}: {error}")
}

impl Reducer for Reconciler {
    type State = TodoAppState;
    type Action = TodoAction;
    type Environment = ReconcilerEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TodoAction::Load => smallvec![Self::fetch_all(env)],

            TodoAction::Submit { fields } => match state.view.editing_id() {
                Some(id) => smallvec![Self::update(env, id.clone(), fields)],
                None => smallvec![Self::create(env, fields)],
            },

            TodoAction::Remove { id } => smallvec![Self::delete(env, id)],

            TodoAction::ToggleComplete { id, completed } => {
                smallvec![Self::update(env, id, TodoFields::completion(completed))]
            },

            TodoAction::StartEdit { id } => {
                let cached = state.cache.get(&id).cloned();
                match cached {
                    Some(todo) => Self::open_editor(state, todo, env),
                    None => {
                        tracing::debug!(%id, "Todo not cached, fetching it");
                        smallvec![Self::fetch_one(env, id)]
                    },
                }
            },

            TodoAction::BeginAdd => {
                state.view.begin_add();
                smallvec![Self::present(env, |presenter| {
                    presenter.populate_form(None);
                    presenter.open_modal();
                })]
            },

            TodoAction::DismissModal => {
                state.view.end_session();
                smallvec![Self::present(env, |presenter| presenter.close_modal())]
            },

            TodoAction::SelectScope { scope } => {
                state.view.set_scope(scope);
                smallvec![Self::render(state, env)]
            },

            TodoAction::SelectBucket { bucket } => {
                match bucket {
                    Some(bucket) => state.view.set_active_bucket(bucket),
                    None => state.view.clear_active_bucket(),
                }
                smallvec![Self::render(state, env)]
            },

            // ========== Results ==========
            TodoAction::TodosLoaded { todos } => {
                state.cache.replace(todos);
                smallvec![Self::render(state, env)]
            },

            TodoAction::Saved { todo } => {
                tracing::info!(id = %todo.id, "Todo saved");
                state.view.end_session();
                smallvec![
                    Self::present(env, |presenter| presenter.close_modal()),
                    Self::fetch_all(env),
                ]
            },

            TodoAction::Removed { id } => {
                tracing::info!(%id, "Todo deleted");
                let mut effects = SmallVec::new();
                if state.view.editing_id() == Some(&id) {
                    state.view.end_session();
                    effects.push(Self::present(env, |presenter| presenter.close_modal()));
                }
                effects.push(Self::fetch_all(env));
                effects
            },

            TodoAction::EditResolved { todo } => Self::open_editor(state, todo, env),

            TodoAction::StoreFailed { operation, error } => {
                tracing::warn!(
                    operation = operation.as_str(),
                    kind = error.kind(),
                    %error,
                    "Todo store call failed"
                );
                ReconcilerMetrics::record_store_failure(operation.as_str(), error.kind());

                let message = failure_message(operation, &error);
                state.last_notification = Some(message.clone());
                smallvec![Self::present(env, move |presenter| presenter.notify(&message))]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::view_state::EditSession;
    use todo_sync_core::view::{DueBucket, Scope};
    use todo_sync_testing::effects::collect_actions;
    use todo_sync_testing::{
        InMemoryTodoStore, PresenterCall, RecordingPresenter, ReducerTest, StoreCall, assertions,
        fixtures,
    };

    fn env_with(
        store: &Arc<InMemoryTodoStore>,
        presenter: &Arc<RecordingPresenter>,
    ) -> ReconcilerEnvironment {
        ReconcilerEnvironment::new(store.clone(), presenter.clone())
    }

    fn test_env() -> ReconcilerEnvironment {
        env_with(
            &Arc::new(InMemoryTodoStore::new()),
            &Arc::new(RecordingPresenter::new()),
        )
    }

    fn loaded_state() -> TodoAppState {
        let mut state = TodoAppState::new();
        state.cache.replace(fixtures::mixed_todos());
        state
    }

    #[test]
    fn load_issues_one_fetch() {
        ReducerTest::new(Reconciler::new())
            .with_env(test_env())
            .given_state(TodoAppState::new())
            .when_action(TodoAction::Load)
            .then_state(|state| assert!(state.snapshot.is_none()))
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn loaded_todos_replace_cache_and_snapshot() {
        ReducerTest::new(Reconciler::new())
            .with_env(test_env())
            .given_state(TodoAppState::new())
            .when_action(TodoAction::TodosLoaded {
                todos: fixtures::mixed_todos(),
            })
            .then_state(|state| {
                assert_eq!(state.cache.len(), 3);
                let snapshot = state.snapshot.as_ref().unwrap();
                assert_eq!(snapshot.header, "All Todos");
                assert_eq!(snapshot.count, 3);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn scope_change_clears_bucket_and_rerenders_from_cache() {
        let mut state = loaded_state();
        state.view.set_active_bucket(DueBucket::NoDueDate);

        ReducerTest::new(Reconciler::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(TodoAction::SelectScope {
                scope: Scope::Completed,
            })
            .then_state(|state| {
                assert_eq!(state.view.active_bucket(), None);
                let snapshot = state.snapshot.as_ref().unwrap();
                assert_eq!(snapshot.header, "Completed");
                assert_eq!(snapshot.count, 1);
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[tokio::test]
    async fn start_edit_from_cache_opens_form_without_fetch() {
        let store = Arc::new(InMemoryTodoStore::new());
        let presenter = Arc::new(RecordingPresenter::new());

        let outcome = ReducerTest::new(Reconciler::new())
            .with_env(env_with(&store, &presenter))
            .given_state(loaded_state())
            .when_action(TodoAction::StartEdit {
                id: TodoId::new("2"),
            })
            .outcome();

        assert_eq!(outcome.state.view.editing_id(), Some(&TodoId::new("2")));

        let produced = collect_actions(outcome.effects).await;
        assert!(produced.is_empty());
        assert!(store.calls().is_empty());
        assert_eq!(
            presenter.calls(),
            vec![
                PresenterCall::PopulateForm(Some(fixtures::todo("2", "B"))),
                PresenterCall::OpenModal,
            ]
        );
    }

    #[tokio::test]
    async fn submit_updates_when_editing_and_creates_otherwise() {
        let store = Arc::new(InMemoryTodoStore::with_todos(fixtures::mixed_todos()));
        let presenter = Arc::new(RecordingPresenter::new());
        let env = env_with(&store, &presenter);

        let mut editing = loaded_state();
        editing.view.begin_edit(TodoId::new("1"));
        let effects = Reconciler::new().reduce(
            &mut editing,
            TodoAction::Submit {
                fields: TodoFields::titled("A renamed"),
            },
            &env,
        );
        let produced = collect_actions(effects).await;
        assert!(matches!(&produced[..], [TodoAction::Saved { todo }] if todo.title == "A renamed"));

        let mut adding = loaded_state();
        adding.view.begin_add();
        let effects = Reconciler::new().reduce(
            &mut adding,
            TodoAction::Submit {
                fields: TodoFields::titled("New one"),
            },
            &env,
        );
        collect_actions(effects).await;

        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Update(TodoId::new("1"), TodoFields::titled("A renamed")),
                StoreCall::Create(TodoFields::titled("New one")),
            ]
        );
    }

    #[test]
    fn saved_closes_session_and_reloads() {
        let mut state = loaded_state();
        state.view.begin_edit(TodoId::new("1"));

        ReducerTest::new(Reconciler::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(TodoAction::Saved {
                todo: fixtures::dated("1", "A", 3, 2024),
            })
            .then_state(|state| assert_eq!(state.view.session(), &EditSession::Closed))
            .then_effects(|effects| assertions::assert_effects_count(effects, 2))
            .run();
    }

    #[test]
    fn removing_another_todo_keeps_session() {
        let mut state = loaded_state();
        state.view.begin_edit(TodoId::new("1"));

        ReducerTest::new(Reconciler::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(TodoAction::Removed {
                id: TodoId::new("3"),
            })
            .then_state(|state| assert_eq!(state.view.editing_id(), Some(&TodoId::new("1"))))
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn failure_is_recorded_and_notified() {
        let before = loaded_state();
        let cache_before = before.cache.clone();

        ReducerTest::new(Reconciler::new())
            .with_env(test_env())
            .given_state(before)
            .when_action(TodoAction::StoreFailed {
                operation: StoreOperation::Delete,
                error: TodoStoreError::Network("connection refused".into()),
            })
            .then_state(move |state| {
                assert_eq!(state.cache, cache_before);
                assert_eq!(
                    state.last_notification.as_deref(),
                    Some("Could not delete todo: network failure: connection refused")
                );
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn dismiss_ends_session() {
        let mut state = TodoAppState::new();
        state.view.begin_add();

        ReducerTest::new(Reconciler::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(TodoAction::DismissModal)
            .then_state(|state| assert_eq!(state.view.session(), &EditSession::Closed))
            .run();
    }
}
