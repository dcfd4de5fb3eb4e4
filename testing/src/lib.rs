//! # Folder Access Testing
//!
//! Testing utilities and helpers for the folder access workspace.
//!
//! This crate provides:
//! - Deterministic clocks
//! - A recording fake of the remote access API
//! - The `ReducerTest` Given-When-Then harness and effect assertions
//! - Helpers to run effect descriptions without a Store
//!
//! ## Example
//!
//! ```ignore
//! use folder_access_testing::{mocks::MockAccessApi, test_clock};
//! use folder_access_runtime::Store;
//!
//! #[tokio::test]
//! async fn approves_request() {
//!     let api = MockAccessApi::new().with_access_requests(folders());
//!     let store = Store::new(RequestsState::default(), RequestsReducer::new(), env(api.clone()));
//!
//!     store.send(RequestsAction::Load).await?;
//!     store.wait_until_idle(Duration::from_secs(1)).await?;
//! }
//! ```

use chrono::{DateTime, Utc};
use folder_access_core::environment::Clock;

mod api_mock;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    pub use crate::api_mock::{ApiCall, MockAccessApi};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use folder_access_testing::mocks::FixedClock;
    /// use folder_access_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
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
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }
}

/// Helpers for exercising effect descriptions without a Store
pub mod helpers {
    use folder_access_core::effect::Effect;
    use std::future::Future;
    use std::pin::Pin;

    /// Run every leaf of an effect and collect the actions it feeds back
    ///
    /// Parallel children run one after another, so the result order is
    /// deterministic.
    pub fn collect_actions<A: Send + 'static>(
        effect: Effect<A>,
    ) -> Pin<Box<dyn Future<Output = Vec<A>> + Send>> {
        Box::pin(async move {
            match effect {
                Effect::None => Vec::new(),
                Effect::Future(fut) => fut.await.into_iter().collect(),
                Effect::Parallel(effects) => {
                    let mut actions = Vec::new();
                    for effect in effects {
                        actions.extend(collect_actions(effect).await);
                    }
                    actions
                },
            }
        })
    }

    /// Collect the feedback actions of every effect in a reducer result
    pub async fn collect_all<A, I>(effects: I) -> Vec<A>
    where
        A: Send + 'static,
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut actions = Vec::new();
        for effect in effects {
            actions.extend(collect_actions(effect).await);
        }
        actions
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock};
pub use reducer_test::{assertions, ReducerTest};
