//! Sources of "now".

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::instant::Instant;

/// Supplies the current instant.
///
/// Ranges only consult a clock when the caller does not pass explicit bounds.
pub trait Clock {
    /// The current instant observed from `tz`.
    fn now(&self, tz: Tz) -> Instant;

    fn now_utc(&self) -> Instant {
        self.now(Tz::UTC)
    }

    /// Seconds since the Unix epoch.
    fn current_timestamp(&self) -> i64 {
        self.now_utc().timestamp()
    }
}

/// Wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self, tz: Tz) -> Instant {
        Instant::new(Utc::now().with_timezone(&tz))
    }
}

/// A clock frozen at one moment.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    #[must_use]
    pub const fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }

    #[must_use]
    pub fn at(instant: &Instant) -> Self {
        Self::new(instant.utc())
    }
}

impl Clock for FixedClock {
    fn now(&self, tz: Tz) -> Instant {
        Instant::new(self.at.with_timezone(&tz))
    }
}
