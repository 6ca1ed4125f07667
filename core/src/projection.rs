//! Projections: pure, read-only derivations of view-relevant values.
//!
//! # Overview
//!
//! A projection is the query side of the state container. The store owns the
//! canonical state; a projection computes a value from it without ever
//! mutating it. Because state replacement is copy-on-write, a projection is
//! recomputed from the snapshot it is handed and nothing else, which makes
//! the whole read side referentially transparent.
//!
//! ```text
//! Canonical state ──┬── Completed      (bool)
//!                   ├── Remaining      (ordered sub-sequence)
//!                   └── SelectedItems  (ordered sub-sequence under filter)
//! ```
//!
//! Projections are recomputed synchronously, strictly after the state update
//! that triggered them: the runtime publishes every post-reduction snapshot
//! before `send` returns, and subscribers map projections over snapshots.
//!
//! ## Example
//!
//! ```ignore
//! struct Remaining;
//!
//! impl Projection for Remaining {
//!     type State = AppState;
//!     type Output = Vec<Item>;
//!
//!     fn project(&self, state: &AppState) -> Vec<Item> {
//!         state.items.iter().filter(|i| !i.done).cloned().collect()
//!     }
//! }
//! ```

/// A pure derivation of a value from canonical state.
///
/// Implementations must not observe anything besides the snapshot they are
/// given: the same snapshot must always project to the same output.
pub trait Projection: Send + Sync {
    /// The state type this projection reads from
    type State;

    /// The derived value
    type Output;

    /// Compute the derived value from a state snapshot
    fn project(&self, state: &Self::State) -> Self::Output;
}

/// Project through a closure without defining a named type.
///
/// Handy for one-off derivations in tests and wiring code.
pub struct FnProjection<S, T, F>
where
    F: Fn(&S) -> T + Send + Sync,
{
    f: F,
    _marker: std::marker::PhantomData<fn(&S) -> T>,
}

impl<S, T, F> FnProjection<S, T, F>
where
    F: Fn(&S) -> T + Send + Sync,
{
    /// Wrap a closure as a projection
    pub const fn new(f: F) -> Self {
        Self {
            f,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<S, T, F> Projection for FnProjection<S, T, F>
where
    F: Fn(&S) -> T + Send + Sync,
{
    type State = S;
    type Output = T;

    fn project(&self, state: &S) -> T {
        (self.f)(state)
    }
}
