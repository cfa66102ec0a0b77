//! Comparison strategies distinguishing `DateRange` from `DateTimeRange`.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use horae_core::Instant;

/// How a range compares its bounds.
pub trait Granularity: fmt::Debug + Clone + Copy + 'static {
    /// What a bound is reduced to before equality is checked.
    type Key: PartialEq + fmt::Debug;

    const NAME: &'static str;

    /// Whether `intersects` rejects ranges in different timezones.
    const STRICT_TIMEZONES: bool;

    fn key(instant: &Instant) -> Self::Key;
}

/// Calendar-day granularity: time of day is ignored for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Day;

impl Granularity for Day {
    type Key = NaiveDate;

    const NAME: &'static str = "date";
    const STRICT_TIMEZONES: bool = false;

    fn key(instant: &Instant) -> NaiveDate {
        instant.date()
    }
}

/// Full timestamp granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Exact;

impl Granularity for Exact {
    type Key = DateTime<Utc>;

    const NAME: &'static str = "datetime";
    const STRICT_TIMEZONES: bool = true;

    fn key(instant: &Instant) -> DateTime<Utc> {
        instant.utc()
    }
}
