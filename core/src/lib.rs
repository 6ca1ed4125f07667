//! # Todo Sync Core
//!
//! Core traits and types for the todo-sync reactive state architecture.
//!
//! This crate provides the fundamental abstractions for building a reactive
//! state container: a canonical state owned by a single store, mutated only
//! through actions, with side effects described as values and derived views
//! expressed as pure projections.
//!
//! ## Core Concepts
//!
//! - **State**: the canonical data for a feature (e.g. the todo list)
//! - **Action**: all possible inputs to a reducer (commands and events)
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side effect descriptions (not execution)
//! - **Environment**: injected dependencies via traits
//! - **Projection**: pure derivation of a view-relevant value from state
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use todo_sync_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! impl Reducer for AppReducer {
//!     type State = AppState;
//!     type Action = AppAction;
//!     type Environment = AppEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut AppState,
//!         action: AppAction,
//!         env: &AppEnvironment,
//!     ) -> SmallVec<[Effect<AppAction>; 4]> {
//!         // Business logic goes here
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub mod projection;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all state transitions and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for AppReducer {
    ///     type State = AppState;
    ///     type Action = AppAction;
    ///     type Environment = AppEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut AppState,
    ///         action: AppAction,
    ///         env: &AppEnvironment,
    ///     ) -> SmallVec<[Effect<AppAction>; 4]> {
    ///         match action {
    ///             AppAction::AddItem { name } => {
    ///                 // mutate state, describe effects
    ///                 SmallVec::new()
    ///             }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime. Most actions produce
        /// zero or one effect, hence the inline capacity of four.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timers)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back into
        /// the reducer. Remote storage loads and saves are expressed this
        /// way: a save that succeeds feeds an acknowledgment action back,
        /// a save that fails resolves to `None` and is only observable
        /// through logs.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an async computation as an effect
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter of the reducer.
pub mod environment {
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Generator of unique item identifiers
    ///
    /// Each call returns a token never returned before by this generator.
    /// Injected rather than derived from the wall clock so that rapid
    /// successive calls cannot collide and tests stay deterministic.
    pub trait IdGenerator: Send + Sync {
        /// Produce the next unique id
        fn next_id(&self) -> u64;

        /// Ensure future ids are greater than `floor`
        ///
        /// Called after loading persisted state so fresh ids cannot collide
        /// with ids minted in an earlier session. Default is a no-op for
        /// generators that are collision-free by construction.
        fn advance_to(&self, floor: u64) {
            let _ = floor;
        }
    }

    /// Process-local monotonic id generator
    ///
    /// Ids are unique within the lifetime of the generator, which matches
    /// the session lifetime of the canonical list it feeds.
    #[derive(Debug, Default)]
    pub struct MonotonicIdGenerator {
        counter: AtomicU64,
    }

    impl MonotonicIdGenerator {
        /// Create a generator starting at 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                counter: AtomicU64::new(0),
            }
        }

        /// Create a generator that continues after the given id
        ///
        /// Used when the canonical list was loaded from storage and new ids
        /// must not collide with persisted ones.
        #[must_use]
        pub const fn starting_after(id: u64) -> Self {
            Self {
                counter: AtomicU64::new(id),
            }
        }
    }

    impl IdGenerator for MonotonicIdGenerator {
        fn next_id(&self) -> u64 {
            self.counter.fetch_add(1, Ordering::Relaxed) + 1
        }

        fn advance_to(&self, floor: u64) {
            self.counter.fetch_max(floor, Ordering::Relaxed);
        }
    }
}
