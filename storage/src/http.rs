//! JSON-over-HTTP implementation of the storage contract.

use crate::{RemoteStore, Result, StorageError, StoreFuture};
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Environment variable naming the storage service base URL
pub const STORAGE_URL_VAR: &str = "TODO_SYNC_STORAGE_URL";

/// HTTP client for the session-storage service.
///
/// Payloads live at `{base_url}/applications/{app_id}/data/{dataset}`:
/// `GET` returns the last-saved JSON document (404 when nothing was saved
/// yet), `POST` replaces it.
#[derive(Clone)]
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

impl HttpRemoteStore {
    /// Create a client with the base URL from the environment
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MissingConfig`] if `TODO_SYNC_STORAGE_URL`
    /// is not set.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(STORAGE_URL_VAR)
            .map_err(|_| StorageError::MissingConfig(STORAGE_URL_VAR))?;

        Ok(Self::new(base_url))
    }

    /// Create a client with an explicit base URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, app_id: &str, dataset: &str) -> String {
        format!("{}/applications/{app_id}/data/{dataset}", self.base_url)
    }

    async fn load_inner(&self, app_id: &str, dataset: &str) -> Result<Option<Value>> {
        let url = self.url(app_id, dataset);
        tracing::debug!(%url, "loading dataset");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StorageError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let payload = response
                    .json::<Value>()
                    .await
                    .map_err(|e| StorageError::ResponseParseFailed(e.to_string()))?;
                Ok(Some(payload))
            },
            StatusCode::NOT_FOUND => Ok(None),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StorageError::ServiceError {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }

    async fn save_inner(&self, app_id: &str, dataset: &str, payload: Value) -> Result<()> {
        let url = self.url(app_id, dataset);
        tracing::debug!(%url, "saving dataset");

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| StorageError::RequestFailed(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(StorageError::ServiceError {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}

impl RemoteStore for HttpRemoteStore {
    fn load(&self, app_id: &str, dataset: &str) -> StoreFuture<'_, Option<Value>> {
        let app_id = app_id.to_owned();
        let dataset = dataset.to_owned();
        Box::pin(async move { self.load_inner(&app_id, &dataset).await })
    }

    fn save(&self, app_id: &str, dataset: &str, payload: Value) -> StoreFuture<'_, ()> {
        let app_id = app_id.to_owned();
        let dataset = dataset.to_owned();
        Box::pin(async move { self.save_inner(&app_id, &dataset, payload).await })
    }
}
