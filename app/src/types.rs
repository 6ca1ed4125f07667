//! Domain types for the todo application.
//!
//! The canonical list is an ordered `Vec<Item>` owned by [`AppState`];
//! insertion order is display order. All mutation goes through the reducer,
//! and every mutation replaces the list wholesale (copy-on-write), so a
//! snapshot handed to a subscriber never changes under it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a todo item
///
/// Assigned at creation, immutable afterwards. Serialized as a bare integer
/// so lists persisted by earlier sessions (which used numeric ids) still
/// load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Creates an `ItemId` from a raw integer
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier
    pub id: ItemId,
    /// Free-form text, mutable via the rename operation
    pub name: String,
    /// Completion flag, mutable via the toggle operations
    pub done: bool,
}

impl Item {
    /// Creates a new, not-yet-done item
    #[must_use]
    pub const fn new(id: ItemId, name: String) -> Self {
        Self {
            id,
            name,
            done: false,
        }
    }
}

/// Display filter for the item list
///
/// Selects a predicate applied to the canonical list for display purposes
/// only; never mutates items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    /// Show every item
    #[default]
    All,
    /// Show items not yet done
    Active,
    /// Show items marked done
    Completed,
}

impl Filter {
    /// Whether an item passes this filter
    #[must_use]
    pub const fn matches(self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.done,
            Self::Completed => item.done,
        }
    }
}

/// Wire payload stored by the remote session-storage service
///
/// `items` defaults to empty so a malformed or partial payload (missing
/// `items` field) decodes as an empty list instead of failing the load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// The full canonical list
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Canonical application state: the item list and the active filter
///
/// Single source of truth; the reducer is the sole mutation surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    /// The canonical ordered list of items
    pub items: Vec<Item>,
    /// Active display filter
    pub filter: Filter,
    /// Whether the initial load from remote storage has completed
    ///
    /// Saves are gated on this flag: the initial load itself must not
    /// trigger a save.
    pub loaded: bool,
    /// When the last save acknowledgment arrived, if any
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl AppState {
    /// Creates an empty, not-yet-loaded state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff every item is done (vacuously true for an empty list)
    #[must_use]
    pub fn completed(&self) -> bool {
        self.items.iter().all(|item| item.done)
    }

    /// Items not yet done, in canonical order
    #[must_use]
    pub fn remaining(&self) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| !item.done)
            .cloned()
            .collect()
    }

    /// Items passing the active filter, in canonical order
    #[must_use]
    pub fn selected_items(&self) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| self.filter.matches(item))
            .cloned()
            .collect()
    }

    /// Largest id present in the canonical list
    #[must_use]
    pub fn max_id(&self) -> Option<ItemId> {
        self.items.iter().map(|item| item.id).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(id: u64, name: &str, done: bool) -> Item {
        Item {
            id: ItemId::new(id),
            name: name.to_string(),
            done,
        }
    }

    #[test]
    fn empty_list_is_vacuously_completed() {
        let state = AppState::new();
        assert!(state.completed());
        assert!(state.remaining().is_empty());
    }

    #[test]
    fn filter_predicates() {
        let active = item(1, "a", false);
        let done = item(2, "b", true);

        assert!(Filter::All.matches(&active) && Filter::All.matches(&done));
        assert!(Filter::Active.matches(&active) && !Filter::Active.matches(&done));
        assert!(!Filter::Completed.matches(&active) && Filter::Completed.matches(&done));
    }

    #[test]
    fn selected_items_under_completed_filter() {
        let state = AppState {
            items: vec![item(1, "a", false), item(2, "b", true)],
            filter: Filter::Completed,
            ..AppState::default()
        };

        let selected = state.selected_items();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, ItemId::new(2));
    }

    #[test]
    fn max_id_is_the_largest_present_id() {
        assert_eq!(AppState::new().max_id(), None);

        let state = AppState {
            items: vec![item(3, "a", false), item(7, "b", true), item(5, "c", false)],
            ..AppState::default()
        };
        assert_eq!(state.max_id(), Some(ItemId::new(7)));
    }

    #[test]
    fn dataset_tolerates_missing_items_field() {
        let dataset: Dataset = serde_json::from_str("{}").unwrap();
        assert!(dataset.items.is_empty());
    }

    #[test]
    fn item_id_wire_format_is_a_bare_integer() {
        let json = serde_json::to_string(&ItemId::new(1_660_000_000_000)).unwrap();
        assert_eq!(json, "1660000000000");
    }

    fn arb_items() -> impl Strategy<Value = Vec<Item>> {
        prop::collection::vec(
            (0..1000u64, "[a-z ]{0,12}", any::<bool>())
                .prop_map(|(id, name, done)| Item {
                    id: ItemId::new(id),
                    name,
                    done,
                }),
            0..16,
        )
    }

    proptest! {
        #[test]
        fn completed_iff_remaining_empty(items in arb_items()) {
            let state = AppState { items, ..AppState::default() };
            prop_assert_eq!(state.completed(), state.remaining().is_empty());
        }

        #[test]
        fn active_filter_equals_remaining(items in arb_items()) {
            let state = AppState {
                items,
                filter: Filter::Active,
                ..AppState::default()
            };
            prop_assert_eq!(state.selected_items(), state.remaining());
        }

        #[test]
        fn all_filter_selects_everything(items in arb_items()) {
            let state = AppState { items: items.clone(), ..AppState::default() };
            prop_assert_eq!(state.selected_items(), items);
        }
    }
}
