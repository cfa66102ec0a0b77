//! A point in time bound to an IANA timezone.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::constants::DATETIME_FORMAT;
use crate::error::{CoreError, CoreResult};

/// Immutable timestamp paired with the timezone it is observed in.
///
/// Two instants are equal only if they denote the same absolute moment *and*
/// carry the same timezone name. Ordering is by absolute moment first, then by
/// timezone name, so it agrees with equality.
#[derive(Debug, Clone, Copy)]
pub struct Instant {
    at: DateTime<Tz>,
}

impl Instant {
    #[must_use]
    pub const fn new(at: DateTime<Tz>) -> Self {
        Self { at }
    }

    /// ## Summary
    /// Resolves a wall-clock time in `tz` to an instant.
    ///
    /// Ambiguous local times (DST fold) resolve to the earlier instant.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidArgument` if the local time falls into a DST gap.
    pub fn from_local(tz: Tz, local: NaiveDateTime) -> CoreResult<Self> {
        match tz.from_local_datetime(&local) {
            LocalResult::Single(at) | LocalResult::Ambiguous(at, _) => Ok(Self { at }),
            LocalResult::None => Err(CoreError::InvalidArgument(format!(
                "{local} does not exist in timezone {}",
                tz.name()
            ))),
        }
    }

    /// ## Summary
    /// Builds an instant from calendar and clock fields in `tz`.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidArgument` if the fields do not form a valid
    /// date and time, or if that local time does not exist in `tz`.
    pub fn from_ymd_hms(
        tz: Tz,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> CoreResult<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            CoreError::InvalidArgument(format!("invalid date {year:04}-{month:02}-{day:02}"))
        })?;
        let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
            CoreError::InvalidArgument(format!("invalid time {hour:02}:{minute:02}:{second:02}"))
        })?;

        Self::from_local(tz, date.and_time(time))
    }

    #[must_use]
    pub const fn datetime(&self) -> DateTime<Tz> {
        self.at
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.at.timezone()
    }

    #[must_use]
    pub fn timezone_name(&self) -> &'static str {
        self.at.timezone().name()
    }

    /// Calendar date as observed in this instant's own timezone.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.at.date_naive()
    }

    /// Wall-clock date and time in this instant's own timezone.
    #[must_use]
    pub fn naive_local(&self) -> NaiveDateTime {
        self.at.naive_local()
    }

    /// Seconds since the Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.at.timestamp()
    }

    #[must_use]
    pub fn utc(&self) -> DateTime<Utc> {
        self.at.with_timezone(&Utc)
    }

    /// The same absolute moment observed from another timezone.
    #[must_use]
    pub fn with_timezone(&self, tz: Tz) -> Self {
        Self {
            at: self.at.with_timezone(&tz),
        }
    }

    #[must_use]
    pub fn same_timezone(&self, other: &Self) -> bool {
        self.timezone_name() == other.timezone_name()
    }
}

impl From<DateTime<Tz>> for Instant {
    fn from(at: DateTime<Tz>) -> Self {
        Self::new(at)
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.same_timezone(other)
    }
}

impl Eq for Instant {}

impl Hash for Instant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.utc().hash(state);
        self.timezone_name().hash(state);
    }
}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at
            .cmp(&other.at)
            .then_with(|| self.timezone_name().cmp(other.timezone_name()))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.at.format(DATETIME_FORMAT),
            self.timezone_name()
        )
    }
}
