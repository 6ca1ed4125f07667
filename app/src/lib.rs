//! Reactive todo-list feature built on the todo-sync architecture.
//!
//! The canonical list of items and the active display filter live in
//! [`AppState`], owned by a [`Store`]. User interactions become
//! [`AppAction`] commands; the reducer replaces the list copy-on-write and
//! describes one save effect per change. The list is synchronized with a
//! remote key/value session store: loaded once at bootstrap, saved after
//! every subsequent change.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo_app::{AppAction, bootstrap};
//! use todo_sync_storage::MemoryRemoteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = bootstrap(Arc::new(MemoryRemoteStore::new())).await?;
//!
//! store.send(AppAction::AddItem { name: "buy milk".to_string() }).await?;
//!
//! let remaining = store.state(|s| s.remaining().len()).await;
//! println!("{remaining} item(s) left");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;
use todo_sync_core::environment::{MonotonicIdGenerator, SystemClock};
use todo_sync_runtime::{Store, StoreError};
use todo_sync_storage::RemoteStore;

pub mod projections;
pub mod reducer;
pub mod types;

// Re-export commonly used types
pub use reducer::{APP_ID, AppAction, AppEnvironment, AppReducer, DATASET};
pub use types::{AppState, Dataset, Filter, Item, ItemId};

/// The concrete store type for the todo application
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// How long the bootstrap waits for the initial load result
const LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the application store and perform the initial load.
///
/// Issues exactly one load request keyed by [`APP_ID`]/[`DATASET`] and waits
/// for its result; the returned store holds the last-saved list (or an empty
/// one if nothing was stored, the payload was malformed, or the service was
/// unreachable). Every later list change triggers exactly one save.
///
/// # Errors
///
/// Returns [`StoreError::Timeout`] if the load result does not arrive within
/// five seconds; other [`StoreError`] values if the store is shutting down.
pub async fn bootstrap(remote: Arc<dyn RemoteStore>) -> Result<AppStore, StoreError> {
    let env = AppEnvironment::new(
        remote,
        Arc::new(MonotonicIdGenerator::new()),
        Arc::new(SystemClock),
    );

    let store = Store::new(AppState::new(), AppReducer::new(), env);

    // Waiting on the effect handle (rather than the action broadcast)
    // guarantees the ItemsLoaded feedback has been reduced before callers
    // see the store.
    let handle = store.send(AppAction::Load).await?;
    handle.wait_with_timeout(LOAD_TIMEOUT).await?;

    Ok(store)
}
