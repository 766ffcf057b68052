//! Time and identifier sources, injected so tests can pin them.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Source of the current time.
pub trait Clock: Send + Sync + std::fmt::Debug + 'static {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Source of fresh entity identifiers.
pub trait IdGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// Return an identifier that has never been returned before.
    fn next_uuid(&self) -> Uuid;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[cfg(any(test, feature = "test-util"))]
mod manual {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    use chrono::{DateTime, Duration, Utc};
    use uuid::Uuid;

    use super::{Clock, IdGenerator};

    /// A clock that only moves when told to.
    #[derive(Debug)]
    pub struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Create a clock frozen at `now`.
        pub fn new(now: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        /// Jump to an absolute instant.
        pub fn set(&self, now: DateTime<Utc>) {
            *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
        }

        /// Move the clock forward.
        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    /// Yields `00000000-0000-0000-0000-000000000001`, `...02`, and so on.
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        counter: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Start counting from 1.
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_uuid(&self) -> Uuid {
            let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            Uuid::from_u128(u128::from(n))
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use manual::{ManualClock, SequentialIdGenerator};
