//! # Todo Sync Storage
//!
//! Remote key/value session storage for todo-sync.
//!
//! The storage service is addressed by an application identifier and a
//! data-set name, and stores an arbitrary JSON payload per key. This crate
//! provides:
//!
//! - [`RemoteStore`]: the consumed contract (`load`/`save`), dyn-compatible
//!   so environments can hold an `Arc<dyn RemoteStore>`
//! - [`HttpRemoteStore`]: JSON-over-HTTP client implementation
//! - [`MemoryRemoteStore`]: in-process implementation for tests and demos
//!
//! No retry or backoff is layered on top of the contract: callers that want
//! fire-and-forget semantics get exactly one request per call.

use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

mod http;
mod memory;

pub use http::{HttpRemoteStore, STORAGE_URL_VAR};
pub use memory::MemoryRemoteStore;

/// Errors that can occur when talking to the storage service
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// HTTP request failed before a response was received
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Service returned an error status
    #[error("Storage service error (status {status}): {message}")]
    ServiceError {
        /// HTTP status code
        status: u16,
        /// Error message from the service
        message: String,
    },

    /// Missing configuration (e.g. base URL environment variable)
    #[error("Missing {0} environment variable")]
    MissingConfig(&'static str),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Boxed future returned by [`RemoteStore`] methods
///
/// Explicit `Pin<Box<dyn Future>>` returns keep the trait dyn-compatible,
/// which is required because the store is injected as `Arc<dyn RemoteStore>`.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Key/value session storage addressed by application and data-set name.
///
/// The payload is an arbitrary JSON value; callers own its schema. A missing
/// key is not an error: `load` returns `Ok(None)`.
pub trait RemoteStore: Send + Sync {
    /// Load the last-saved payload for `(app_id, dataset)`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the service is unreachable or replies
    /// with an error status other than not-found.
    fn load(&self, app_id: &str, dataset: &str) -> StoreFuture<'_, Option<Value>>;

    /// Save a payload under `(app_id, dataset)`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the service is unreachable or rejects
    /// the payload.
    fn save(&self, app_id: &str, dataset: &str, payload: Value) -> StoreFuture<'_, ()>;
}
