//! Closed intervals of time sharing one timezone.
//!
//! ## Summary
//! `Range<G>` holds a `since` and a `till` instant. The granularity `G`
//! decides how bounds are compared for equality: [`DateRange`] compares
//! calendar dates, [`DateTimeRange`] compares full timestamps. Ranges are
//! immutable; "changing" a bound builds a new range.

use std::fmt;
use std::marker::PhantomData;

use chrono_tz::Tz;
use horae_core::cloner::clone_instant;
use horae_core::{Clock, CoreError, CoreResult, Instant};

use crate::days::{end_of_day, start_of_day};
use crate::granularity::{Day, Exact, Granularity};

/// Range compared at calendar-day granularity.
pub type DateRange = Range<Day>;

/// Range compared at full timestamp precision.
pub type DateTimeRange = Range<Exact>;

#[derive(Debug, Clone, Copy)]
pub struct Range<G> {
    since: Instant,
    till: Instant,
    granularity: PhantomData<G>,
}

impl<G: Granularity> Range<G> {
    /// ## Summary
    /// Creates a range owning second-precision copies of `since` and `till`.
    ///
    /// `since` may be later than `till`.
    ///
    /// ## Errors
    /// Returns `CoreError::LogicError` if the bounds carry different timezones,
    /// or `CoreError::UnexpectedValue` if a bound cannot be copied.
    pub fn new(since: Instant, till: Instant) -> CoreResult<Self> {
        if !since.same_timezone(&till) {
            tracing::debug!(
                granularity = G::NAME,
                since = %since,
                till = %till,
                "Rejected range with mixed timezones"
            );
            return Err(CoreError::LogicError("since/till have different timezones"));
        }

        Ok(Self {
            since: clone_instant(&since)?,
            till: clone_instant(&till)?,
            granularity: PhantomData,
        })
    }

    /// ## Summary
    /// Creates a range from the clock's current instant, observed in `till`'s
    /// timezone, up to `till`.
    ///
    /// ## Errors
    /// Same as [`Range::new`].
    pub fn until(clock: &impl Clock, till: Instant) -> CoreResult<Self> {
        Self::new(clock.now(till.timezone()), till)
    }

    /// ## Summary
    /// Creates a range covering the clock's current calendar day in `tz`,
    /// from its first to its last second.
    ///
    /// ## Errors
    /// Returns `CoreError::UnexpectedValue` if the current day has no valid
    /// local time in `tz`.
    pub fn today(clock: &impl Clock, tz: Tz) -> CoreResult<Self> {
        let date = clock.now(tz).date();
        let since = start_of_day(tz, date)
            .ok_or_else(|| CoreError::UnexpectedValue(format!("no start of day for {date}")))?;
        let till = end_of_day(tz, date)
            .ok_or_else(|| CoreError::UnexpectedValue(format!("no end of day for {date}")))?;

        Self::new(since, till)
    }

    /// ## Summary
    /// Creates a new range with `since` replaced.
    ///
    /// ## Errors
    /// Same as [`Range::new`].
    pub fn with_since(&self, since: Instant) -> CoreResult<Self> {
        Self::new(since, self.till)
    }

    /// ## Summary
    /// Creates a new range with `till` replaced.
    ///
    /// ## Errors
    /// Same as [`Range::new`].
    pub fn with_till(&self, till: Instant) -> CoreResult<Self> {
        Self::new(self.since, till)
    }

    #[must_use]
    pub const fn since(&self) -> Instant {
        self.since
    }

    #[must_use]
    pub const fn till(&self) -> Instant {
        self.till
    }

    /// The timezone shared by both bounds.
    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.since.timezone()
    }

    #[must_use]
    pub fn timezone_name(&self) -> &'static str {
        self.since.timezone_name()
    }

    /// ## Summary
    /// Checks whether both ranges have the same bounds at this granularity and
    /// the same timezone names.
    ///
    /// Ranges in different timezones are simply not equal.
    #[must_use]
    pub fn is_equal(&self, other: &Self) -> bool {
        G::key(&self.since) == G::key(&other.since)
            && G::key(&self.till) == G::key(&other.till)
            && self.since.same_timezone(&other.since)
            && self.till.same_timezone(&other.till)
    }

    /// ## Summary
    /// Checks whether the two ranges overlap, comparing stored instants.
    ///
    /// Ranges that only touch (`self.till == other.since`) do not intersect.
    ///
    /// ## Errors
    /// Returns `CoreError::LogicError` when the granularity is strict about
    /// timezones (`DateTimeRange`) and the ranges are in different timezones.
    /// `DateRange` never fails.
    pub fn intersects(&self, other: &Self) -> CoreResult<bool> {
        if G::STRICT_TIMEZONES && !self.since.same_timezone(&other.since) {
            tracing::debug!(
                granularity = G::NAME,
                this = self.timezone_name(),
                other = other.timezone_name(),
                "Refusing to intersect ranges in different timezones"
            );
            return Err(CoreError::LogicError("timezones of ranges are different"));
        }

        let (since, till) = (self.since.utc(), self.till.utc());
        let (other_since, other_till) = (other.since.utc(), other.till.utc());

        let equal = since == other_since && till == other_till;
        let inside_other = other_since < since && till < other_till;
        let contains_other = since < other_since && other_till < till;
        let starts_inside = other_since <= since && since < other_till;
        let ends_inside = other_since < till && till <= other_till;

        Ok(equal || inside_other || contains_other || starts_inside || ends_inside)
    }

    /// Whether `instant` lies within `[since, till]`.
    #[must_use]
    pub fn contains(&self, instant: &Instant) -> bool {
        let at = instant.utc();
        self.since.utc() <= at && at <= self.till.utc()
    }

    /// ## Summary
    /// Canonical key built from the calendar dates and timezones of both bounds.
    ///
    /// Ranges with equal fingerprints enumerate the same days.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.since.date(),
            self.since.timezone_name(),
            self.till.date(),
            self.till.timezone_name()
        )
    }
}

impl<G: Granularity> PartialEq for Range<G> {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl<G: Granularity> Eq for Range<G> {}

impl<G: Granularity> fmt::Display for Range<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.since, self.till)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use horae_core::FixedClock;

    fn at(tz: Tz, day: u32, hour: u32, minute: u32) -> Instant {
        Instant::from_ymd_hms(tz, 2000, 1, day, hour, minute, 0).expect("valid instant")
    }

    fn datetime_range(since: (u32, u32, u32), till: (u32, u32, u32)) -> DateTimeRange {
        DateTimeRange::new(
            at(Tz::UTC, since.0, since.1, since.2),
            at(Tz::UTC, till.0, till.1, till.2),
        )
        .expect("valid range")
    }

    #[test]
    fn test_new_copies_bounds() {
        let since = at(Tz::Europe__Kyiv, 1, 14, 45);
        let till = at(Tz::Europe__Kyiv, 2, 15, 0);

        let range = DateTimeRange::new(since, till).expect("valid range");
        assert_eq!(range.since(), since);
        assert_eq!(range.till(), till);
        assert_eq!(range.timezone(), Tz::Europe__Kyiv);
        assert_eq!(range.timezone_name(), "Europe/Kyiv");
    }

    #[test]
    fn test_new_rejects_mixed_timezones() {
        let err = DateRange::new(at(Tz::Europe__Kyiv, 1, 0, 0), at(Tz::Europe__Warsaw, 1, 0, 0))
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::LogicError("since/till have different timezones")
        );
    }

    #[test]
    fn test_new_accepts_reversed_bounds() {
        let range = DateTimeRange::new(at(Tz::UTC, 2, 0, 0), at(Tz::UTC, 1, 0, 0));
        assert!(range.is_ok());
    }

    #[test]
    fn test_with_since_and_till_leave_original_untouched() {
        let range = datetime_range((1, 14, 45), (1, 15, 0));

        let moved = range.with_since(at(Tz::UTC, 1, 12, 0)).expect("valid range");
        assert_eq!(moved.since(), at(Tz::UTC, 1, 12, 0));
        assert_eq!(range.since(), at(Tz::UTC, 1, 14, 45));

        let extended = range.with_till(at(Tz::UTC, 1, 20, 0)).expect("valid range");
        assert_eq!(extended.till(), at(Tz::UTC, 1, 20, 0));

        assert!(range.with_till(at(Tz::Europe__Kyiv, 1, 20, 0)).is_err());
    }

    #[test]
    fn test_datetime_range_equality() {
        let range = datetime_range((1, 14, 45), (1, 15, 0));

        assert!(range.is_equal(&datetime_range((1, 14, 45), (1, 15, 0))));
        assert!(!range.is_equal(&datetime_range((1, 12, 0), (1, 15, 0))));
        assert!(!range.is_equal(&datetime_range((1, 14, 45), (1, 20, 0))));
        assert!(!range.is_equal(&datetime_range((1, 12, 0), (1, 21, 0))));

        let kyiv = DateTimeRange::new(
            at(Tz::Europe__Kyiv, 1, 14, 45),
            at(Tz::Europe__Kyiv, 1, 15, 0),
        )
        .expect("valid range");
        assert!(!range.is_equal(&kyiv));
    }

    #[test]
    fn test_datetime_range_equality_same_offset_different_name() {
        let utc = datetime_range((1, 14, 45), (1, 15, 0));
        let london = DateTimeRange::new(
            utc.since().with_timezone(Tz::Europe__London),
            utc.till().with_timezone(Tz::Europe__London),
        )
        .expect("valid range");

        assert!(!utc.is_equal(&london));
    }

    #[test]
    fn test_date_range_equality_ignores_time_of_day() {
        let range =
            DateRange::new(at(Tz::UTC, 1, 9, 0), at(Tz::UTC, 2, 9, 0)).expect("valid range");

        let same_days =
            DateRange::new(at(Tz::UTC, 1, 18, 30), at(Tz::UTC, 2, 0, 0)).expect("valid range");
        let other_since =
            DateRange::new(at(Tz::UTC, 31, 9, 0), at(Tz::UTC, 2, 9, 0)).expect("valid range");
        let other_till =
            DateRange::new(at(Tz::UTC, 1, 9, 0), at(Tz::UTC, 1, 9, 0)).expect("valid range");
        let other_timezone =
            DateRange::new(at(Tz::Europe__Kyiv, 1, 9, 0), at(Tz::Europe__Kyiv, 2, 9, 0))
                .expect("valid range");

        assert!(range.is_equal(&same_days));
        assert_eq!(range, same_days);
        assert!(!range.is_equal(&other_since));
        assert!(!range.is_equal(&other_till));
        assert!(!range.is_equal(&other_timezone));
    }

    #[test]
    fn test_intersects_cases() {
        // (first range, second range, expected)
        let cases = [
            (((1, 14, 45), (1, 15, 15)), ((1, 14, 30), (1, 15, 30)), true),
            (((1, 14, 30), (1, 15, 30)), ((1, 14, 45), (1, 15, 15)), true),
            (((1, 15, 0), (1, 15, 15)), ((1, 14, 45), (1, 15, 5)), true),
            (((1, 14, 45), (1, 15, 5)), ((1, 15, 0), (1, 15, 15)), true),
            (((1, 14, 45), (1, 15, 5)), ((1, 14, 45), (1, 15, 5)), true),
            (((1, 14, 45), (1, 15, 0)), ((1, 15, 0), (1, 15, 15)), false),
            (((1, 14, 45), (1, 15, 0)), ((1, 20, 0), (1, 20, 15)), false),
            (((1, 15, 0), (1, 15, 15)), ((1, 14, 45), (1, 15, 0)), false),
            (((1, 20, 0), (1, 20, 15)), ((1, 14, 45), (1, 15, 0)), false),
            (((2, 14, 45), (2, 15, 15)), ((1, 14, 30), (3, 15, 30)), true),
            (((1, 14, 30), (3, 15, 30)), ((2, 14, 45), (2, 15, 15)), true),
            (((2, 15, 0), (3, 15, 15)), ((1, 14, 45), (2, 15, 5)), true),
            (((1, 14, 45), (2, 15, 5)), ((2, 15, 0), (3, 15, 15)), true),
            (((1, 14, 45), (2, 15, 0)), ((2, 15, 0), (3, 15, 15)), false),
            (((1, 14, 45), (2, 15, 0)), ((3, 20, 0), (4, 20, 15)), false),
        ];

        for (first, second, expected) in cases {
            let first = datetime_range(first.0, first.1);
            let second = datetime_range(second.0, second.1);

            assert_eq!(
                first.intersects(&second),
                Ok(expected),
                "{first} intersects {second}"
            );
        }
    }

    #[test]
    fn test_intersects_point_range_at_start() {
        // A zero-length range at another range's start only satisfies the
        // "starts inside" case from its own side
        let point = datetime_range((1, 10, 0), (1, 10, 0));
        let span = datetime_range((1, 10, 0), (1, 12, 0));

        assert_eq!(point.intersects(&span), Ok(true));
        assert_eq!(span.intersects(&point), Ok(false));
        assert_eq!(point.intersects(&point), Ok(true));
    }

    #[test]
    fn test_datetime_range_intersects_rejects_other_timezone() {
        let utc = datetime_range((1, 14, 45), (1, 15, 15));
        let kyiv = DateTimeRange::new(
            at(Tz::Europe__Kyiv, 1, 14, 45),
            at(Tz::Europe__Kyiv, 1, 15, 15),
        )
        .expect("valid range");

        assert_eq!(
            utc.intersects(&kyiv),
            Err(CoreError::LogicError("timezones of ranges are different"))
        );
    }

    #[test]
    fn test_date_range_intersects_across_timezones() {
        // 14:00-16:00 UTC and 17:00-19:00 Kyiv (15:00-17:00 UTC) overlap
        let utc =
            DateRange::new(at(Tz::UTC, 1, 14, 0), at(Tz::UTC, 1, 16, 0)).expect("valid range");
        let kyiv = DateRange::new(at(Tz::Europe__Kyiv, 1, 17, 0), at(Tz::Europe__Kyiv, 1, 19, 0))
            .expect("valid range");

        assert_eq!(utc.intersects(&kyiv), Ok(true));
        assert_eq!(kyiv.intersects(&utc), Ok(true));
    }

    #[test]
    fn test_contains() {
        let range = datetime_range((1, 10, 0), (1, 12, 0));

        assert!(range.contains(&at(Tz::UTC, 1, 10, 0)));
        assert!(range.contains(&at(Tz::UTC, 1, 11, 0)));
        assert!(range.contains(&at(Tz::UTC, 1, 12, 0)));
        assert!(!range.contains(&at(Tz::UTC, 1, 12, 1)));
    }

    #[test]
    fn test_fingerprint() {
        let range = DateRange::new(at(Tz::Europe__Kyiv, 1, 10, 0), at(Tz::Europe__Kyiv, 3, 8, 0))
            .expect("valid range");

        assert_eq!(
            range.fingerprint(),
            "2000-01-01|Europe/Kyiv|2000-01-03|Europe/Kyiv"
        );
    }

    #[test]
    fn test_until_starts_at_clock_now() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap());
        let till = at(Tz::Europe__Kyiv, 2, 0, 0);

        let range = DateTimeRange::until(&clock, till).expect("valid range");
        assert_eq!(range.since().to_string(), "2000-01-01 14:00:00 Europe/Kyiv");
        assert_eq!(range.till(), till);
    }

    #[test]
    fn test_today_covers_whole_day() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2000, 1, 1, 23, 30, 0).unwrap());

        let range = DateTimeRange::today(&clock, Tz::Europe__Kyiv).expect("valid range");
        assert_eq!(range.since().to_string(), "2000-01-02 00:00:00 Europe/Kyiv");
        assert_eq!(range.till().to_string(), "2000-01-02 23:59:59 Europe/Kyiv");
    }

    #[test]
    fn test_display() {
        let range = datetime_range((1, 14, 45), (1, 15, 0));
        assert_eq!(
            range.to_string(),
            "[2000-01-01 14:45:00 UTC, 2000-01-01 15:00:00 UTC]"
        );
    }
}
