use std::fmt;

use chrono::{DateTime, Utc};

/// Source of the current time for token issuing and expiry checks.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;

    fn timestamp(&self) -> i64 {
        self.now().timestamp()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use manual::ManualClock;

#[cfg(any(test, feature = "test-utils"))]
mod manual {
    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::{DateTime, Duration, Utc};

    use super::Clock;

    /// Clock that only moves when told to. Second resolution.
    #[derive(Debug)]
    pub struct ManualClock {
        secs: AtomicI64,
    }

    impl ManualClock {
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                secs: AtomicI64::new(start.timestamp()),
            }
        }

        pub fn at_timestamp(secs: i64) -> Self {
            Self {
                secs: AtomicI64::new(secs),
            }
        }

        pub fn advance(&self, by: Duration) {
            self.secs.fetch_add(by.num_seconds(), Ordering::SeqCst);
        }

        pub fn set(&self, to: DateTime<Utc>) {
            self.secs.store(to.timestamp(), Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::from_timestamp(self.timestamp(), 0).unwrap_or_default()
        }

        fn timestamp(&self) -> i64 {
            self.secs.load(Ordering::SeqCst)
        }
    }
}
