//! View-state reconciliation and todo aggregation for a todo-list front end.
//!
//! A [`Reconciler`] reducer owns the view state and a local cache of the
//! remote collection. User intents arrive as [`TodoAction`] commands; store
//! calls run as effects and report back as result actions. Every render is a
//! pure [`aggregate`](aggregator::aggregate) of the cache under the current
//! view.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo_sync::{ConsolePresenter, Reconciler, ReconcilerEnvironment, TodoAction, TodoAppState};
//! use todo_sync_http::HttpTodoStore;
//! use todo_sync_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = ReconcilerEnvironment::new(
//!     Arc::new(HttpTodoStore::new("http://localhost:3000")),
//!     Arc::new(ConsolePresenter::stdout()),
//! );
//! let store = Store::new(TodoAppState::new(), Reconciler::new(), env);
//!
//! // Fetch, aggregate and render; wait for the whole cascade
//! store.send(TodoAction::Load).await?.wait().await;
//!
//! let count = store.state(|s| s.cache.len()).await;
//! println!("{count} todos");
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod command;
pub mod config;
pub mod console;
pub mod form;
pub mod presentation;
pub mod reconciler;
pub mod types;
pub mod view_state;

// Re-export commonly used types
pub use command::{Command, CommandError};
pub use config::{Config, ConfigError};
pub use console::ConsolePresenter;
pub use form::{FormError, parse_form};
pub use presentation::PresentationQueue;
pub use reconciler::{Reconciler, ReconcilerEnvironment};
pub use types::{LocalCache, TodoAction, TodoAppState};
pub use view_state::{EditSession, ViewState};
