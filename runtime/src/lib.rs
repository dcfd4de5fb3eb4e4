//! # Folder Access Runtime
//!
//! The [`Store`] owns feature state and runs the action → reducer → effects
//! loop. Effects are spawned on the tokio runtime; when one resolves to an
//! action, that action is sent back through the reducer.
//!
//! Callers that need to observe the outcome of a remote call wait for the
//! store to go idle, then read state:
//!
//! ```ignore
//! use folder_access_runtime::Store;
//!
//! let store = Store::new(RequestsState::new(), RequestsReducer::new(), env);
//! store.send(RequestsAction::Load).await?;
//! store.wait_until_idle(Duration::from_secs(5)).await?;
//!
//! let pending = store.state(|s| s.requests.counts().pending).await;
//! ```

use folder_access_core::{effect::Effect, reducer::Reducer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, PartialEq, Eq)]
    pub enum StoreError {
        /// `send()` was called after shutdown started
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown gave up with effects still running
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// The store did not settle in time
        #[error("Timed out with {0} effects still running")]
        Timeout(usize),
    }
}

pub use error::StoreError;

/// Grace period used by [`Store::shutdown_default`]
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of effects still running, shared by every clone of a store
///
/// Backed by a watch channel so waiters wake on change instead of polling.
#[derive(Clone)]
struct InFlight(Arc<watch::Sender<usize>>);

impl InFlight {
    fn new() -> Self {
        Self(Arc::new(watch::Sender::new(0)))
    }

    fn begin(&self) -> InFlightGuard {
        self.0.send_modify(|count| *count += 1);
        InFlightGuard(self.clone())
    }

    fn count(&self) -> usize {
        *self.0.borrow()
    }

    /// Resolves once the count reaches zero, or hands back the count at timeout
    async fn settled(&self, timeout: Duration) -> Result<(), usize> {
        let mut rx = self.0.subscribe();
        let idle = async move { rx.wait_for(|count| *count == 0).await.map(|_| ()) };

        match tokio::time::timeout(timeout, idle).await {
            // The sender lives as long as `self`, so the channel cannot close
            Ok(_) => Ok(()),
            Err(_) => Err(self.count()),
        }
    }
}

/// Decrements the in-flight count on drop, including when an effect panics
struct InFlightGuard(InFlight);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0 .0.send_modify(|count| *count = count.saturating_sub(1));
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, Duration, Effect, InFlight, Ordering, Reducer, RwLock, StoreError,
        DEFAULT_SHUTDOWN_TIMEOUT,
    };

    /// Runtime coordinator for one reducer
    ///
    /// Reducer calls are serialised behind a write lock. Effects run
    /// concurrently and their feedback actions re-enter through
    /// [`Store::send`], so the reducer remains the only writer of state.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutting_down: Arc<AtomicBool>,
        in_flight: InFlight,
        shutdown_timeout: Duration,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutting_down: Arc::new(AtomicBool::new(false)),
                in_flight: InFlight::new(),
                shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            }
        }

        /// Override the grace period used by [`Store::shutdown_default`]
        #[must_use]
        pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
            self.shutdown_timeout = timeout;
            self
        }

        /// Number of effects currently running, including fed-back chains
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.in_flight.count()
        }

        /// Wait until no effect is running anywhere in the store
        ///
        /// A feedback action is reduced, and its own effects started, before
        /// the effect that produced it is counted as finished. An idle store
        /// has therefore settled every chain started before this call.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Timeout`] if effects are still running when
        /// the timeout elapses.
        pub async fn wait_until_idle(&self, timeout: Duration) -> Result<(), StoreError> {
            self.in_flight.settled(timeout).await.map_err(|pending| {
                tracing::warn!(pending_effects = pending, "Store did not settle before timeout");
                StoreError::Timeout(pending)
            })
        }

        /// Stop accepting actions and wait for running effects to finish
        ///
        /// Feedback actions produced after this point are dropped with a
        /// warning.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects are still
        /// running when the timeout elapses.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);
            self.shutting_down.store(true, Ordering::Release);

            match self.in_flight.settled(timeout).await {
                Ok(()) => {
                    tracing::info!("All effects completed, shutdown successful");
                    Ok(())
                },
                Err(pending) => {
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    Err(StoreError::ShutdownTimeout(pending))
                },
            }
        }

        /// Shut down with the configured grace period
        ///
        /// # Errors
        ///
        /// See [`Store::shutdown`].
        pub async fn shutdown_default(&self) -> Result<(), StoreError> {
            self.shutdown(self.shutdown_timeout).await
        }

        /// Reduce an action and start the effects it returns
        ///
        /// Returns once the reducer has run; effects complete in the
        /// background. Use [`Store::wait_until_idle`] to wait for them.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.shutting_down.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut *state, action, &self.environment)
            };
            tracing::trace!(effects = effects.len(), "Reducer returned");

            for effect in effects {
                self.run(effect);
            }
            Ok(())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let pending = store.state(|s| s.requests.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        fn run(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {},
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.run(effect);
                    }
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let guard = self.in_flight.begin();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        if let Some(action) = fut.await {
                            if let Err(error) = store.send(action).await {
                                tracing::warn!(%error, "Dropped feedback action");
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
                shutting_down: Arc::clone(&self.shutting_down),
                in_flight: self.in_flight.clone(),
                shutdown_timeout: self.shutdown_timeout,
            }
        }
    }
}

pub use store::Store;
