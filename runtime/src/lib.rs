//! # Todo Sync Runtime
//!
//! Runtime implementation for the todo-sync reactive state architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: owns the canonical state, runs the reducer, executes effects
//! - **State channel**: every post-reduction snapshot is published to a
//!   `watch` channel for subscribers (projections, rendering layers)
//! - **Action broadcast**: actions produced by effects are observable, which
//!   is how load results and save acknowledgments become visible
//!
//! ## Example
//!
//! ```ignore
//! use todo_sync_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::AddItem { name: "buy milk".into() }).await?;
//!
//! // Read state
//! let len = store.state(|s| s.items.len()).await;
//!
//! // Observe snapshots
//! let mut rx = store.subscribe();
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use todo_sync_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{RwLock, broadcast, watch};

/// Errors that can occur during Store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store is shutting down and not accepting new actions
    #[error("Store is shutting down")]
    ShutdownInProgress,

    /// Shutdown timed out waiting for effects to complete
    ///
    /// Some effects were still running when the timeout elapsed.
    #[error("Shutdown timed out with {0} effects still running")]
    ShutdownTimeout(usize),

    /// Timeout waiting for a terminal action
    ///
    /// Returned by `send_and_wait_for` when the timeout expires before
    /// a matching action is received.
    #[error("Timeout waiting for action")]
    Timeout,

    /// Action broadcast channel closed
    #[error("Action broadcast channel closed")]
    ChannelClosed,
}

/// Tracks outstanding effects spawned for one `send` call.
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Decrements effect tracking on drop, so the counter stays correct even if
/// an effect task panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Decrements the store-wide pending-effect counter on drop.
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Handle for awaiting the effects started by a single `send` call.
///
/// `send()` returns after *starting* effect execution, not after completion.
/// Tests and request/response callers use this handle to wait.
pub struct EffectHandle {
    counter: Arc<AtomicUsize>,
    receiver: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (notifier, receiver) = watch::channel(());

        (
            Self {
                counter: Arc::clone(&counter),
                receiver,
            },
            EffectTracking { counter, notifier },
        )
    }

    /// Wait until all effects tracked by this handle have completed
    pub async fn wait(mut self) {
        while self.counter.load(Ordering::SeqCst) > 0 {
            if self.receiver.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for effects with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running when the
    /// timeout expires.
    pub async fn wait_with_timeout(self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
/// 5. Snapshot publication (the observable the view layer binds to)
///
/// # Ordering guarantee
///
/// The reducer runs under the state write lock, and the post-reduction
/// snapshot is published to the state channel before the lock is released.
/// Subscribers therefore observe snapshots strictly after the update that
/// produced them and before `send` returns to the caller.
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
    /// Action broadcast channel for observing actions produced by effects.
    action_broadcast: broadcast::Sender<A>,
    /// State snapshot channel; holds the latest post-reduction snapshot.
    state_watch: watch::Sender<S>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + Clone + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + Clone + 'static,
    E: Send + Sync + Clone + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Default action broadcast capacity is 16; use
    /// [`Store::with_broadcast_capacity`] when many slow observers are
    /// expected.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Create a new Store with custom action broadcast capacity
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);
        let (state_watch, _) = watch::channel(initial_state.clone());

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
            action_broadcast,
            state_watch,
        }
    }

    /// Send an action to the store
    ///
    /// This is the primary way to interact with the store:
    /// 1. Acquires write lock on state
    /// 2. Calls reducer with (state, action, environment)
    /// 3. Publishes the new state snapshot to subscribers
    /// 4. Executes returned effects asynchronously
    /// 5. Effects may produce more actions (feedback loop)
    ///
    /// # Returns
    ///
    /// An [`EffectHandle`] that can be used to wait for effect completion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    ///
    /// # Panics
    ///
    /// If the reducer panics, the panic will propagate and halt the store.
    /// Reducers should be pure functions that do not panic.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            return Err(StoreError::ShutdownInProgress);
        }

        tracing::debug!("Processing action");
        metrics::counter!("store.actions.total").increment(1);

        let (handle, tracking) = EffectHandle::new();

        let effects = {
            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let start = std::time::Instant::now();
            let effects = self.reducer.reduce(&mut *state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            tracing::trace!("Reducer completed, returned {} effects", effects.len());

            // Publish the snapshot while still holding the lock: subscribers
            // observe updates in the exact order the reducer produced them.
            let _ = self.state_watch.send(state.clone());

            effects
        };

        for effect in effects {
            self.execute_effect(effect, tracking.clone());
        }
        tracing::debug!("Action processing completed, returning handle");

        Ok(handle)
    }

    /// Send an action and wait for a matching result action
    ///
    /// Designed for request-response patterns: subscribe to the action
    /// broadcast, send the initial action, then wait for an action matching
    /// the predicate. Note the matching action has been broadcast but not
    /// necessarily reduced yet when this returns; callers that need the
    /// reduced state wait on the [`EffectHandle`] instead.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no matching action within `timeout`
    /// - [`StoreError::ChannelClosed`]: broadcast closed (store shutting down)
    /// - [`StoreError::ShutdownInProgress`]: store is shutting down
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        // Subscribe BEFORE sending to avoid race condition
        let mut rx = self.action_broadcast.subscribe();

        self.send(action).await?;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Slow consumer; if the terminal action was dropped
                        // the timeout catches it.
                        tracing::warn!(skipped, "Action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Subscribe to state snapshots
    ///
    /// Returns a `watch` receiver holding the latest post-reduction
    /// snapshot. This is the observable surface a rendering layer binds
    /// projections to; the store has no dependency on how rendering occurs.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.state_watch.subscribe()
    }

    /// Subscribe to all actions produced by effects
    ///
    /// Only actions fed back by effects are broadcast, not the actions
    /// passed to `send` directly. A save acknowledgment arriving here is
    /// the only place a completed save is observable.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure to ensure the lock is released
    /// promptly:
    ///
    /// ```ignore
    /// let count = store.state(|s| s.items.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Initiate graceful shutdown of the store
    ///
    /// Sets the shutdown flag (rejecting new actions), then waits for
    /// pending effects to complete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before
    /// all pending effects complete.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");

        self.shutdown.store(true, Ordering::Release);

        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(100);

        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending_effects = pending, "Shutdown timeout");
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Execute an effect with tracking
    ///
    /// # Error Handling Strategy
    ///
    /// Effect execution is fire-and-forget: a failed or panicking effect is
    /// logged and the rest of the system carries on. The guards keep both
    /// the per-send and the store-wide counters correct on every exit path.
    fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Future(fut) => {
                tracing::trace!("Executing Effect::Future");
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                tracking.increment();

                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = PendingGuard(Arc::clone(&self.pending_effects));

                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking);
                    let _pending_guard = pending_guard;

                    if let Some(action) = fut.await {
                        tracing::trace!("Effect::Future produced an action, feeding back");

                        // Broadcast to observers before feeding back
                        let _ = store.action_broadcast.send(action.clone());
                        let _ = store.send(action).await;
                    } else {
                        tracing::trace!("Effect::Future completed with no action");
                    }
                });
            },
            Effect::Delay { duration, action } => {
                tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                tracking.increment();

                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = PendingGuard(Arc::clone(&self.pending_effects));

                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking);
                    let _pending_guard = pending_guard;

                    tokio::time::sleep(duration).await;

                    let _ = store.action_broadcast.send((*action).clone());
                    let _ = store.send(*action).await;
                });
            },
            Effect::Parallel(effects) => {
                tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);

                for effect in effects {
                    self.execute_effect(effect, tracking.clone());
                }
            },
            Effect::Sequential(effects) => {
                tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);

                tracking.increment();

                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = PendingGuard(Arc::clone(&self.pending_effects));

                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking);
                    let _pending_guard = pending_guard;

                    for effect in effects {
                        // Sub-tracking so each effect completes before the next starts
                        let (sub_handle, sub_tracking) = EffectHandle::new();
                        store.execute_effect(effect, sub_tracking);
                        sub_handle.wait().await;
                    }
                    tracing::trace!("Effect::Sequential completed");
                });
            },
        }
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
            action_broadcast: self.action_broadcast.clone(),
            state_watch: self.state_watch.clone(),
        }
    }
}
