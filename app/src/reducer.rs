//! Reducer logic for the todo application.
//!
//! Commands come from user interaction (add, delete, toggle, rename,
//! toggle-all, set-filter) plus the one-time bootstrap load request. Events
//! are fed back by effects: the load result and the save acknowledgment.
//!
//! Every command that touches the canonical list replaces it wholesale and,
//! once the initial load has completed, returns exactly one save effect
//! carrying the full current list. Saves are fire-and-forget: not batched,
//! not deduplicated, not retried. A failed save resolves to no action and is
//! only observable in the logs.

use crate::types::{AppState, Dataset, Filter, Item, ItemId};
use std::sync::Arc;
use todo_sync_core::{
    SmallVec,
    effect::Effect,
    environment::{Clock, IdGenerator},
    reducer::Reducer,
    smallvec,
};
use todo_sync_macros::Action;
use todo_sync_storage::RemoteStore;

/// Application identifier under which the list is stored remotely
pub const APP_ID: &str = "todo-app";

/// Data-set name under which the list is stored remotely
pub const DATASET: &str = "todo-list";

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct AppEnvironment {
    /// Remote session storage for the canonical list
    pub store: Arc<dyn RemoteStore>,
    /// Generator of fresh item ids
    pub ids: Arc<dyn IdGenerator>,
    /// Clock for sync timestamps
    pub clock: Arc<dyn Clock>,
}

impl AppEnvironment {
    /// Creates a new `AppEnvironment`
    #[must_use]
    pub fn new(
        store: Arc<dyn RemoteStore>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, ids, clock }
    }
}

/// Actions representing commands and events for the todo list
#[derive(Action, Clone, Debug)]
pub enum AppAction {
    // ========== Commands ==========
    /// Command: load the last-saved list from remote storage (bootstrap)
    #[command]
    Load,

    /// Command: append a new item with a fresh id and `done = false`
    ///
    /// Empty names are accepted; presence checks are the caller's concern.
    #[command]
    AddItem {
        /// Item text
        name: String,
    },

    /// Command: remove the item with the given id (no-op if absent)
    #[command]
    DeleteItem {
        /// Item to delete
        id: ItemId,
    },

    /// Command: flip `done` of the item with the given id (no-op if absent)
    #[command]
    ToggleItem {
        /// Item to toggle
        id: ItemId,
    },

    /// Command: replace the name of the item with the given id,
    /// preserving `done` (no-op if absent)
    #[command]
    SetName {
        /// Item to rename
        id: ItemId,
        /// New text
        name: String,
    },

    /// Command: if every item is done, mark all not-done; otherwise mark
    /// all done
    #[command]
    ToggleAll,

    /// Command: change the display filter (never touches items)
    #[command]
    SetFilter {
        /// New filter mode
        filter: Filter,
    },

    // ========== Events ==========
    /// Event: the initial load completed; this list becomes canonical
    #[event]
    ItemsLoaded {
        /// The loaded list (empty when nothing was stored or the payload
        /// was malformed or the service was unreachable)
        items: Vec<Item>,
    },

    /// Event: a save was acknowledged by the storage service
    #[event]
    ItemsSaved,
}

/// Reducer for the todo list
#[derive(Clone, Debug, Default)]
pub struct AppReducer;

impl AppReducer {
    /// Creates a new `AppReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Describe the one-time load of the canonical list.
    ///
    /// Any failure is swallowed into an empty list so the session starts
    /// cleanly either way.
    fn load_effect(env: &AppEnvironment) -> Effect<AppAction> {
        let store = Arc::clone(&env.store);

        Effect::future(async move {
            let items = match store.load(APP_ID, DATASET).await {
                Ok(Some(payload)) => {
                    serde_json::from_value::<Dataset>(payload)
                        .unwrap_or_else(|error| {
                            tracing::warn!(%error, "stored payload malformed, starting empty");
                            metrics::counter!("storage.failures", "op" => "load").increment(1);
                            Dataset::default()
                        })
                        .items
                },
                Ok(None) => Vec::new(),
                Err(error) => {
                    tracing::warn!(%error, "load failed, starting empty");
                    metrics::counter!("storage.failures", "op" => "load").increment(1);
                    Vec::new()
                },
            };

            Some(AppAction::ItemsLoaded { items })
        })
    }

    /// Describe a save of the full current list, if the initial load is in.
    ///
    /// Exactly one save per list change; racing saves keep only issuance
    /// order. Failures resolve to no action.
    fn save_effect(state: &AppState, env: &AppEnvironment) -> Effect<AppAction> {
        if !state.loaded {
            return Effect::None;
        }

        let store = Arc::clone(&env.store);
        let dataset = Dataset {
            items: state.items.clone(),
        };

        Effect::future(async move {
            let payload = match serde_json::to_value(&dataset) {
                Ok(payload) => payload,
                Err(error) => {
                    tracing::warn!(%error, "could not encode dataset, dropping save");
                    metrics::counter!("storage.failures", "op" => "save").increment(1);
                    return None;
                },
            };

            match store.save(APP_ID, DATASET, payload).await {
                Ok(()) => {
                    tracing::debug!("data saved");
                    Some(AppAction::ItemsSaved)
                },
                Err(error) => {
                    tracing::warn!(%error, "save failed, dropping");
                    metrics::counter!("storage.failures", "op" => "save").increment(1);
                    None
                },
            }
        })
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            AppAction::Load => smallvec![Self::load_effect(env)],

            AppAction::AddItem { name } => {
                let id = ItemId::new(env.ids.next_id());
                let mut items = state.items.clone();
                items.push(Item::new(id, name));
                state.items = items;

                smallvec![Self::save_effect(state, env)]
            },

            AppAction::DeleteItem { id } => {
                state.items = state
                    .items
                    .iter()
                    .filter(|item| item.id != id)
                    .cloned()
                    .collect();

                smallvec![Self::save_effect(state, env)]
            },

            AppAction::ToggleItem { id } => {
                state.items = state
                    .items
                    .iter()
                    .map(|item| {
                        if item.id == id {
                            Item {
                                done: !item.done,
                                ..item.clone()
                            }
                        } else {
                            item.clone()
                        }
                    })
                    .collect();

                smallvec![Self::save_effect(state, env)]
            },

            AppAction::SetName { id, name } => {
                state.items = state
                    .items
                    .iter()
                    .map(|item| {
                        if item.id == id {
                            Item {
                                name: name.clone(),
                                ..item.clone()
                            }
                        } else {
                            item.clone()
                        }
                    })
                    .collect();

                smallvec![Self::save_effect(state, env)]
            },

            AppAction::ToggleAll => {
                let completed = state.completed();
                state.items = state
                    .items
                    .iter()
                    .map(|item| Item {
                        done: !completed,
                        ..item.clone()
                    })
                    .collect();

                smallvec![Self::save_effect(state, env)]
            },

            AppAction::SetFilter { filter } => {
                state.filter = filter;
                SmallVec::new()
            },

            // ========== Events ==========
            AppAction::ItemsLoaded { items } => {
                state.items = items;
                state.loaded = true;
                if let Some(max) = state.max_id() {
                    env.ids.advance_to(max.as_u64());
                }
                SmallVec::new()
            },

            AppAction::ItemsSaved => {
                state.last_synced_at = Some(env.clock.now());
                SmallVec::new()
            },
        }
    }
}
