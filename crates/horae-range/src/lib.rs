//! Horae ranges: immutable date and datetime ranges, their equality and
//! intersection, and expansion into calendar days.

pub mod days;
pub mod granularity;
pub mod range;

pub use days::{DayEnumerator, Days, enumerate_days, enumerate_days_as_strings};
pub use granularity::{Day, Exact, Granularity};
pub use range::{DateRange, DateTimeRange, Range};
