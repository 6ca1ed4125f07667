//! View-relevant projections over the canonical state.
//!
//! Each projection is a pure function of the latest snapshot; the rendering
//! layer maps them over the store's state channel. They are recomputed
//! synchronously after every canonical-list update, before control returns
//! to the caller of the mutation.

use crate::types::{AppState, Item};
use todo_sync_core::projection::Projection;

/// True iff every item is done (vacuously true for an empty list)
#[derive(Clone, Copy, Debug, Default)]
pub struct Completed;

impl Projection for Completed {
    type State = AppState;
    type Output = bool;

    fn project(&self, state: &AppState) -> bool {
        state.completed()
    }
}

/// Items not yet done, in canonical order
#[derive(Clone, Copy, Debug, Default)]
pub struct Remaining;

impl Projection for Remaining {
    type State = AppState;
    type Output = Vec<Item>;

    fn project(&self, state: &AppState) -> Vec<Item> {
        state.remaining()
    }
}

/// Items passing the active filter, in canonical order
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectedItems;

impl Projection for SelectedItems {
    type State = AppState;
    type Output = Vec<Item>;

    fn project(&self, state: &AppState) -> Vec<Item> {
        state.selected_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Filter, ItemId};

    fn item(id: u64, done: bool) -> Item {
        Item {
            id: ItemId::new(id),
            name: format!("item {id}"),
            done,
        }
    }

    #[test]
    fn completed_tracks_remaining() {
        let mut state = AppState {
            items: vec![item(1, true), item(2, false)],
            ..AppState::default()
        };

        assert!(!Completed.project(&state));
        assert_eq!(Remaining.project(&state).len(), 1);

        state.items[1].done = true;
        assert!(Completed.project(&state));
        assert!(Remaining.project(&state).is_empty());
    }

    #[test]
    fn selected_items_follow_the_filter() {
        let state = AppState {
            items: vec![item(1, true), item(2, false)],
            filter: Filter::Completed,
            ..AppState::default()
        };

        let selected = SelectedItems.project(&state);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, ItemId::new(1));
    }

    #[test]
    fn active_selection_equals_remaining() {
        let state = AppState {
            items: vec![item(1, true), item(2, false), item(3, false)],
            filter: Filter::Active,
            ..AppState::default()
        };

        assert_eq!(SelectedItems.project(&state), Remaining.project(&state));
    }
}
