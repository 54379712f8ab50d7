//! # todo-sync HTTP client
//!
//! [`HttpTodoStore`] implements [`TodoStoreClient`](todo_sync_core::store_client::TodoStoreClient)
//! against a REST collection:
//!
//! | Operation     | Request                  |
//! |---------------|--------------------------|
//! | `list_todos`  | `GET /api/todos`         |
//! | `get_todo`    | `GET /api/todos/{id}`    |
//! | `create_todo` | `POST /api/todos`        |
//! | `update_todo` | `PUT /api/todos/{id}`    |
//! | `delete_todo` | `DELETE /api/todos/{id}` |
//!
//! Status 404 on an item maps to `NotFound`, any other non-2xx to `Server`,
//! transport failures to `Network` and unreadable bodies to `Decode`.
//!
//! ## Example
//!
//! ```no_run
//! use todo_sync_core::store_client::TodoStoreClient;
//! use todo_sync_http::HttpTodoStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = HttpTodoStore::new("http://localhost:3000");
//! let todos = store.list_todos().await?;
//! println!("{} todos", todos.len());
//! # Ok(())
//! # }
//! ```

mod client;

pub use client::HttpTodoStore;
