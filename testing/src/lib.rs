//! # Todo Sync Testing
//!
//! Testing utilities and helpers for the todo-sync architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use todo_sync_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(AppReducer::new())
//!     .with_env(test_environment())
//!     .given_state(AppState::new())
//!     .when_action(AppAction::AddItem { name: "buy milk".into() })
//!     .then_state(|state| assert_eq!(state.items.len(), 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use todo_sync_core::environment::{Clock, IdGenerator};

mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations for testing.
pub mod mocks {
    use super::{AtomicU64, Clock, DateTime, IdGenerator, Ordering, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_sync_testing::mocks::FixedClock;
    /// use todo_sync_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Sequential id generator for predictable ids in tests
    ///
    /// Issues 1, 2, 3, ... so assertions can name ids literally.
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        counter: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose first id is 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                counter: AtomicU64::new(0),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> u64 {
            self.counter.fetch_add(1, Ordering::Relaxed) + 1
        }

        fn advance_to(&self, floor: u64) {
            self.counter.fetch_max(floor, Ordering::Relaxed);
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SequentialIdGenerator, test_clock};
