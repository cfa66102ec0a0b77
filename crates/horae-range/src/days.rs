//! Expansion of a range into the calendar days it spans.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use horae_core::constants::DATE_FORMAT;
use horae_core::{CoreError, CoreResult, Instant};

use crate::granularity::Granularity;
use crate::range::Range;

/// Wider than any UTC offset a zone has ever used, on either side.
const GAP_SEARCH_HOURS: i64 = 26;

/// Inclusive, restartable iterator over calendar dates.
///
/// Steps one calendar date at a time, so DST transitions never skip or repeat
/// a day. Empty when the first date lies after the last one.
#[derive(Debug, Clone)]
pub struct Days {
    next: NaiveDate,
    /// Exclusive.
    end: NaiveDate,
}

impl Days {
    /// ## Summary
    /// Dates from `since`'s calendar date through `till`'s calendar date, as
    /// observed in the range's timezone.
    ///
    /// ## Errors
    /// Returns `CoreError::UnexpectedValue` if the day after `till` cannot be
    /// represented.
    pub fn new<G: Granularity>(range: &Range<G>) -> CoreResult<Self> {
        Self::between(range.since().date(), range.till().date())
    }

    /// ## Errors
    /// Returns `CoreError::UnexpectedValue` if the day after `last` cannot be
    /// represented.
    pub fn between(first: NaiveDate, last: NaiveDate) -> CoreResult<Self> {
        let end = last
            .succ_opt()
            .ok_or_else(|| CoreError::UnexpectedValue(format!("no calendar day after {last}")))?;

        Ok(Self { next: first, end })
    }
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.next >= self.end {
            return None;
        }

        let current = self.next;
        self.next = current.succ_opt().unwrap_or(self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from((self.end - self.next).num_days()).unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Days {}

impl std::iter::FusedIterator for Days {}

fn local_at(tz: Tz, timestamp: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(&tz).naive_local())
}

/// First instant whose wall-clock time in `tz` is at or after `local`.
///
/// Only needed when `local` itself falls into a gap; the answer is then the
/// instant the gap ends, found to the second.
fn first_instant_from(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    let window = TimeDelta::hours(GAP_SEARCH_HOURS);
    let mut before = local.checked_sub_signed(window)?.and_utc().timestamp();
    let mut after = local.checked_add_signed(window)?.and_utc().timestamp();

    // before: wall clock still earlier than `local`; after: already reached it
    if local_at(tz, before)? >= local || local_at(tz, after)? < local {
        return None;
    }
    while after - before > 1 {
        let middle = before + (after - before) / 2;
        if local_at(tz, middle)? >= local {
            after = middle;
        } else {
            before = middle;
        }
    }

    DateTime::from_timestamp(after, 0).map(|utc| utc.with_timezone(&tz))
}

/// ## Summary
/// First valid local instant of `date` in `tz`.
///
/// Usually midnight; when midnight is skipped by an offset change, the exact
/// instant the gap ends. `None` if the date does not exist in `tz` at all.
#[must_use]
pub fn start_of_day(tz: Tz, date: NaiveDate) -> Option<Instant> {
    let midnight = date.and_time(NaiveTime::MIN);
    let start = tz
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| first_instant_from(tz, midnight))?;

    (start.date_naive() == date).then_some(Instant::new(start))
}

/// ## Summary
/// Last valid local second of `date` in `tz`, normally 23:59:59.
///
/// When 23:59:59 is skipped, the second before the gap begins. `None` if the
/// date does not exist in `tz` at all.
#[must_use]
pub fn end_of_day(tz: Tz, date: NaiveDate) -> Option<Instant> {
    let last_second = date.and_hms_opt(23, 59, 59)?;
    let end = tz.from_local_datetime(&last_second).latest().or_else(|| {
        let next_midnight = last_second.checked_add_signed(TimeDelta::seconds(1))?;
        first_instant_from(tz, next_midnight)?.checked_sub_signed(TimeDelta::seconds(1))
    })?;

    (end.date_naive() == date).then_some(Instant::new(end))
}

/// ## Summary
/// One instant per calendar day of `range`, each at the start of that day in
/// the range's timezone.
///
/// Dates that do not exist in the timezone are skipped.
///
/// ## Errors
/// Returns `CoreError::UnexpectedValue` if the range's last day cannot be
/// normalized.
#[tracing::instrument(skip_all, fields(fingerprint = %range.fingerprint()))]
pub fn enumerate_days<G: Granularity>(range: &Range<G>) -> CoreResult<Vec<Instant>> {
    let tz = range.timezone();
    let days = Days::new(range)?;

    let mut instants = Vec::with_capacity(days.len());
    for date in days {
        if let Some(start) = start_of_day(tz, date) {
            instants.push(start);
        } else {
            tracing::trace!(%date, timezone = tz.name(), "Skipping date absent from timezone");
        }
    }

    tracing::trace!(count = instants.len(), "Enumerated days");
    Ok(instants)
}

/// ## Summary
/// Like [`enumerate_days`], formatted as `YYYY-MM-DD`.
///
/// ## Errors
/// Same as [`enumerate_days`].
pub fn enumerate_days_as_strings<G: Granularity>(range: &Range<G>) -> CoreResult<Vec<String>> {
    Ok(format_days(&enumerate_days(range)?))
}

fn format_days(days: &[Instant]) -> Vec<String> {
    days.iter()
        .map(|day| day.datetime().format(DATE_FORMAT).to_string())
        .collect()
}

/// Day enumeration memoized per range fingerprint.
///
/// The cache belongs to this value; share it by reference, not globally.
/// Entries are never evicted, so the cache grows with every distinct range
/// until [`DayEnumerator::clear`] is called.
#[derive(Debug, Default)]
pub struct DayEnumerator {
    cache: HashMap<String, Vec<Instant>>,
    hits: usize,
}

impl DayEnumerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Days of `range`, computed once per fingerprint.
    ///
    /// ## Errors
    /// Same as [`enumerate_days`]. Failures are not cached.
    pub fn days<G: Granularity>(&mut self, range: &Range<G>) -> CoreResult<&[Instant]> {
        match self.cache.entry(range.fingerprint()) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                tracing::trace!(fingerprint = %entry.key(), "Day cache hit");
                Ok(entry.into_mut().as_slice())
            }
            Entry::Vacant(entry) => {
                tracing::trace!(fingerprint = %entry.key(), "Day cache miss");
                let days = enumerate_days(range)?;
                Ok(entry.insert(days).as_slice())
            }
        }
    }

    /// ## Summary
    /// Days of `range` as `YYYY-MM-DD` strings.
    ///
    /// ## Errors
    /// Same as [`enumerate_days`].
    pub fn days_as_strings<G: Granularity>(&mut self, range: &Range<G>) -> CoreResult<Vec<String>> {
        self.days(range).map(format_days)
    }

    /// Number of distinct ranges held in the cache.
    #[must_use]
    pub fn cached_ranges(&self) -> usize {
        self.cache.len()
    }

    /// Number of lookups answered from the cache.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
    }
}
