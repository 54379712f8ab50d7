//! # todo-sync testing
//!
//! Testing utilities and helpers for the todo-sync reconciler.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`effects`]: drivers that run effect descriptions without a Store
//! - [`mocks`]: an in-memory todo store with failure injection and a
//!   presenter that records every call
//! - [`fixtures`]: ready-made todos
//! - [`properties`]: proptest strategies for todo collections
//!
//! ## Example
//!
//! ```ignore
//! use todo_sync_testing::{InMemoryTodoStore, RecordingPresenter, fixtures};
//!
//! #[tokio::test]
//! async fn loads_and_renders() {
//!     let client = Arc::new(InMemoryTodoStore::with_todos(fixtures::mixed_todos()));
//!     let presenter = Arc::new(RecordingPresenter::new());
//!     let store = Store::new(
//!         TodoAppState::default(),
//!         Reconciler::new(),
//!         ReconcilerEnvironment::new(client, presenter.clone()),
//!     );
//!
//!     store.send(TodoAction::Load).await?.wait().await;
//!     assert_eq!(presenter.last_list().map(|l| l.count), Some(3));
//! }
//! ```

pub mod effects;
pub mod fixtures;
pub mod mocks;
pub mod properties;

// Re-export commonly used items
pub use mocks::{InMemoryTodoStore, PresenterCall, RecordingPresenter, RenderedList, StoreCall};
pub use reducer_test::{ReducerTest, assertions};
