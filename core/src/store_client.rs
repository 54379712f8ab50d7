//! The CRUD contract for the remote todo collection.
//!
//! # Implementations
//!
//! - `HttpTodoStore` (in `todo-sync-http`): production client for a
//!   `/api/todos` REST collection
//! - `InMemoryTodoStore` (in `todo-sync-testing`): deterministic double with
//!   failure injection

use crate::todo::{Todo, TodoFields, TodoId};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Future returned by every [`TodoStoreClient`] method
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TodoStoreError>> + Send + 'a>>;

/// Errors surfaced by a todo store client
///
/// Cloneable so failures can travel inside actions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoStoreError {
    /// The request never produced a response (connection refused, reset, DNS)
    #[error("network failure: {0}")]
    Network(String),

    /// The store answered with a non-success status
    #[error("store returned status {status}: {message}")]
    Server {
        /// HTTP-style status code
        status: u16,
        /// Body or reason returned by the store
        message: String,
    },

    /// The targeted todo does not exist (e.g. resolved from a stale cache)
    #[error("todo {0} not found")]
    NotFound(TodoId),

    /// The store answered but the body could not be decoded
    #[error("could not decode store response: {0}")]
    Decode(String),
}

impl TodoStoreError {
    /// Short kind name used as a log field and metric label
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Server { .. } => "server",
            Self::NotFound(_) => "not_found",
            Self::Decode(_) => "decode",
        }
    }
}

/// The store call an error came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `list_todos`
    List,
    /// `get_todo`
    Get,
    /// `create_todo`
    Create,
    /// `update_todo`
    Update,
    /// `delete_todo`
    Delete,
}

impl StoreOperation {
    /// Operation name used as a log field and metric label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CRUD access to the remote todo collection
///
/// # Dyn Compatibility
///
/// Methods return boxed futures instead of using `async fn` so the client can
/// be held as `Arc<dyn TodoStoreClient>` and captured by effects.
///
/// # Timeouts
///
/// The contract has no timeout or cancellation. A call that never resolves
/// leaves the effect that issued it pending.
pub trait TodoStoreClient: Send + Sync {
    /// Fetch the whole collection
    ///
    /// # Errors
    ///
    /// Returns `Network`, `Server` or `Decode` failures.
    fn list_todos(&self) -> StoreFuture<'_, Vec<Todo>>;

    /// Fetch a single todo
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the id is unknown, otherwise as `list_todos`.
    fn get_todo(&self, id: TodoId) -> StoreFuture<'_, Todo>;

    /// Create a todo from `fields`, returning the persisted record
    ///
    /// # Errors
    ///
    /// Returns `Network`, `Server` or `Decode` failures.
    fn create_todo(&self, fields: TodoFields) -> StoreFuture<'_, Todo>;

    /// Update the attributes set in `fields`; unset attributes are left unchanged
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the id is unknown, otherwise as `list_todos`.
    fn update_todo(&self, id: TodoId, fields: TodoFields) -> StoreFuture<'_, Todo>;

    /// Delete a todo
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the id is unknown, otherwise `Network` or `Server`.
    fn delete_todo(&self, id: TodoId) -> StoreFuture<'_, ()>;
}
