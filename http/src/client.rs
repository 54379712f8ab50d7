//! reqwest-backed todo store client

use metrics::{counter, histogram};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Instant;
use todo_sync_core::store_client::{StoreFuture, StoreOperation, TodoStoreClient, TodoStoreError};
use todo_sync_core::todo::{Todo, TodoFields, TodoId};
use tracing::Instrument;

/// HTTP client for the `/api/todos` collection
#[derive(Clone, Debug)]
pub struct HttpTodoStore {
    client: Client,
    base_url: String,
}

impl HttpTodoStore {
    /// Create a client for the collection served under `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/api/todos", self.base_url)
    }

    fn item_url(&self, id: &TodoId) -> String {
        format!("{}/api/todos/{}", self.base_url, id)
    }

    /// Wrap a request future with a span, request metrics and failure logging
    fn observe<'a, T, F>(
        &'a self,
        operation: StoreOperation,
        id: Option<&TodoId>,
        request: F,
    ) -> StoreFuture<'a, T>
    where
        T: Send + 'a,
        F: Future<Output = Result<T, TodoStoreError>> + Send + 'a,
    {
        let span = tracing::debug_span!(
            "todo_store_request",
            operation = operation.as_str(),
            todo_id = id.map(tracing::field::display),
        );

        Box::pin(
            async move {
                let op = operation.as_str();
                let started = Instant::now();
                counter!("todo_client_requests_total", "operation" => op).increment(1);

                let result = request.await;

                histogram!("todo_client_request_duration_seconds", "operation" => op)
                    .record(started.elapsed().as_secs_f64());
                match &result {
                    Ok(_) => tracing::debug!("Request succeeded"),
                    Err(error) => {
                        counter!(
                            "todo_client_errors_total",
                            "operation" => op,
                            "kind" => error.kind()
                        )
                        .increment(1);
                        tracing::warn!(kind = error.kind(), %error, "Request failed");
                    },
                }
                result
            }
            .instrument(span),
        )
    }
}

/// Send `request` and map the status onto the store error kinds
async fn send(request: RequestBuilder, id: Option<&TodoId>) -> Result<Response, TodoStoreError> {
    let response = request
        .send()
        .await
        .map_err(|e| TodoStoreError::Network(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
        return Err(TodoStoreError::NotFound(id.clone()));
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_string()
    } else {
        body
    };
    Err(TodoStoreError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TodoStoreError> {
    response
        .json::<T>()
        .await
        .map_err(|e| TodoStoreError::Decode(e.to_string()))
}

impl TodoStoreClient for HttpTodoStore {
    fn list_todos(&self) -> StoreFuture<'_, Vec<Todo>> {
        let request = self.client.get(self.collection_url());
        self.observe(StoreOperation::List, None, async move {
            decode(send(request, None).await?).await
        })
    }

    fn get_todo(&self, id: TodoId) -> StoreFuture<'_, Todo> {
        let request = self.client.get(self.item_url(&id));
        let span_id = id.clone();
        self.observe(StoreOperation::Get, Some(&span_id), async move {
            decode(send(request, Some(&id)).await?).await
        })
    }

    fn create_todo(&self, fields: TodoFields) -> StoreFuture<'_, Todo> {
        let request = self.client.post(self.collection_url()).json(&fields);
        self.observe(StoreOperation::Create, None, async move {
            decode(send(request, None).await?).await
        })
    }

    fn update_todo(&self, id: TodoId, fields: TodoFields) -> StoreFuture<'_, Todo> {
        let request = self.client.put(self.item_url(&id)).json(&fields);
        let span_id = id.clone();
        self.observe(StoreOperation::Update, Some(&span_id), async move {
            decode(send(request, Some(&id)).await?).await
        })
    }

    fn delete_todo(&self, id: TodoId) -> StoreFuture<'_, ()> {
        let request = self.client.delete(self.item_url(&id));
        let span_id = id.clone();
        self.observe(StoreOperation::Delete, Some(&span_id), async move {
            send(request, Some(&id)).await.map(|_| ())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        let store = HttpTodoStore::new("http://localhost:3000/");
        assert_eq!(store.base_url(), "http://localhost:3000");
        assert_eq!(store.collection_url(), "http://localhost:3000/api/todos");
        assert_eq!(
            store.item_url(&TodoId::new("7")),
            "http://localhost:3000/api/todos/7"
        );
    }
}
