//! # Coursedesk Runtime
//!
//! Runtime implementation for the Coursedesk reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: manages state and executes effects
//! - **Effect executor**: runs effect descriptions and feeds produced
//!   actions back into the reducer
//! - **Retry**: exponential backoff for transient failures ([`retry`])
//!
//! ## Example
//!
//! ```ignore
//! use coursedesk_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action; await its effects if needed
//! let handle = store.send(Action::Refresh).await?;
//! handle.wait().await;
//!
//! // Read state
//! let page = store.state(|s| s.page).await;
//! ```

use coursedesk_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, watch};

/// Retry logic with exponential backoff
pub mod retry;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// Typically because the store is shutting down.
        #[error("action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Tracks completion of the effects spawned by one `send` call.
///
/// Uses a shared counter plus a watch channel: every spawned effect task
/// increments the counter and decrements it on completion (panic included,
/// via [`DecrementGuard`]); waiters are notified when it reaches zero.
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl Clone for EffectTracking {
    fn clone(&self) -> Self {
        Self {
            counter: Arc::clone(&self.counter),
            notifier: self.notifier.clone(),
        }
    }
}

impl EffectTracking {
    fn new() -> (Self, watch::Receiver<()>) {
        let (tx, rx) = watch::channel(());
        (
            Self {
                counter: Arc::new(AtomicUsize::new(0)),
                notifier: tx,
            },
            rx,
        )
    }

    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Ensures the effect counter is decremented even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Decrements an atomic counter on drop (global pending-effect tracking).
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Handle to the effects spawned by a `send` call.
///
/// Awaiting [`EffectHandle::wait`] blocks until every effect spawned by the
/// originating action has completed, including the dispatch of its feedback
/// action. Effects that the feedback action spawns in turn are tracked by
/// their own `send`, not by this handle.
pub struct EffectHandle {
    counter: Arc<AtomicUsize>,
    receiver: watch::Receiver<()>,
}

impl EffectHandle {
    /// A handle whose effects have already completed.
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        drop(tx);
        Self {
            counter: Arc::new(AtomicUsize::new(0)),
            receiver: rx,
        }
    }

    /// Wait for all tracked effects to complete.
    pub async fn wait(&mut self) {
        while self.counter.load(Ordering::SeqCst) > 0 {
            if self.receiver.changed().await.is_err() {
                // Sender dropped - no more notifications coming
                break;
            }
        }
    }

    /// Wait with a timeout. Returns `Err(())` if effects were still pending.
    ///
    /// # Errors
    ///
    /// Returns `Err(())` when the timeout elapses before completion.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), ()> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| ())
    }
}

/// The Store runtime
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (feature logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
///
/// # Example
///
/// ```ignore
/// let store = Store::new(
///     TicketListState::new(scope, page_size),
///     TicketListReducer,
///     production_environment(),
/// );
///
/// store.send(TicketListAction::Refresh).await?;
/// ```
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
    ///
    /// All actions produced by effects (e.g. from `Effect::Future`) are
    /// broadcast to observers. This enables request-response call sites
    /// (`send_and_wait_for`) and UI observers that react to completed
    /// requests.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + Clone + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + Clone + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Default action broadcast capacity is 16; increase with
    /// [`Store::with_broadcast_capacity`] if observers frequently lag.
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

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
            action_broadcast,
        }
    }

    /// Send an action to the store
    ///
    /// Runs the reducer under the state write lock, then executes the
    /// returned effects on background tasks. Actions produced by effects are
    /// broadcast to observers and fed back into the reducer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Err(StoreError::ShutdownInProgress);
        }

        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action, &self.environment)
        };
        metrics::counter!("store.actions.processed").increment(1);

        if effects.is_empty() {
            return Ok(EffectHandle::completed());
        }

        let (tracking, receiver) = EffectTracking::new();
        let counter = Arc::clone(&tracking.counter);
        for effect in effects {
            self.execute_effect_internal(effect, tracking.clone());
        }

        Ok(EffectHandle { counter, receiver })
    }

    /// Send an action and wait for a matching result action
    ///
    /// Designed for request-response call sites: subscribe to the action
    /// broadcast *before* sending (avoids a race), send the initial action,
    /// then wait for an action matching the predicate.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: timeout expired before a matching action
    /// - [`StoreError::ChannelClosed`]: broadcast channel closed
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
        let mut rx = self.action_broadcast.subscribe();

        self.send(action).await?;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Slow consumer; if the terminal action was dropped
                        // the timeout catches it
                        tracing::warn!(skipped, "action observer lagged");
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

    /// Subscribe to all actions produced by effects
    ///
    /// Only actions produced by effects are broadcast, not the initial
    /// actions passed to [`Store::send`].
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Read a projection of the current state
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Gracefully shut down the store
    ///
    /// Stops accepting new actions and waits for in-flight effects to
    /// finish.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] when effects are still
    /// running after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.shutdown.store(true, Ordering::SeqCst);
        tracing::info!("store shutdown initiated");

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let pending = self.pending_effects.load(Ordering::SeqCst);
            if pending == 0 {
                tracing::info!("store shutdown complete");
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                tracing::warn!(pending, "store shutdown timed out");
                return Err(StoreError::ShutdownTimeout(pending));
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Execute an effect with tracking
    ///
    /// Effects are fire-and-forget: failures inside an effect task are the
    /// effect's own concern (it reports them by producing a failure action).
    /// The [`DecrementGuard`] keeps the completion counter correct even when
    /// a task panics.
    fn execute_effect_internal(&self, effect: Effect<A>, tracking: EffectTracking) {
        match effect {
            Effect::None => {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Future(fut) => {
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                tracking.increment();
                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                let store = self.clone();
                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking);
                    let _pending_guard = pending_guard;

                    if let Some(action) = fut.await {
                        // Broadcast to observers, then feed back into the reducer
                        let _ = store.action_broadcast.send(action.clone());
                        let _ = store.send(action).await;
                    }
                });
            },
            Effect::Delay { duration, action } => {
                metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                tracking.increment();
                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

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
                metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                for effect in effects {
                    self.execute_effect_internal(effect, tracking.clone());
                }
            },
            Effect::Sequential(effects) => {
                metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                tracking.increment();
                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                let tracking_clone = tracking.clone();
                let store = self.clone();
                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking_clone);
                    let _pending_guard = pending_guard;

                    for effect in effects {
                        let (sub_tracking, mut sub_rx) = EffectTracking::new();
                        let sub_counter = Arc::clone(&sub_tracking.counter);
                        store.execute_effect_internal(effect, sub_tracking);

                        // Wait for this effect before starting the next
                        while sub_counter.load(Ordering::SeqCst) > 0 {
                            if sub_rx.changed().await.is_err() {
                                break;
                            }
                        }
                    }
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
        }
    }
}
