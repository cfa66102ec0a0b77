//! Timezone lookup and string parse/format helpers.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

use crate::constants::{DATE_FORMAT, DATETIME_FORMAT};
use crate::error::{CoreError, CoreResult};
use crate::instant::Instant;

/// ## Summary
/// Resolves an IANA timezone name such as `Europe/Kyiv`.
///
/// ## Errors
/// Returns `CoreError::InvalidArgument` if the name is not a known timezone.
pub fn create_timezone(name: &str) -> CoreResult<Tz> {
    Tz::from_str(name)
        .map_err(|e| CoreError::InvalidArgument(format!("unknown timezone '{name}': {e}")))
}

#[must_use]
pub const fn create_timezone_utc() -> Tz {
    Tz::UTC
}

/// ## Summary
/// Parses `value` against a chrono `format` string in `tz` (UTC if `None`).
///
/// A format without time fields yields midnight of the parsed date.
///
/// ## Errors
/// Returns `CoreError::InvalidArgument` if `value` does not match `format`,
/// or if the parsed wall-clock time does not exist in the timezone.
pub fn create_from_format(value: &str, format: &str, tz: Option<Tz>) -> CoreResult<Instant> {
    let tz = tz.unwrap_or_else(create_timezone_utc);

    let local = match NaiveDateTime::parse_from_str(value, format) {
        Ok(local) => local,
        Err(datetime_err) => NaiveDate::parse_from_str(value, format)
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|_date_err| {
                tracing::debug!(value, format, "Value does not match format");
                CoreError::InvalidArgument(format!(
                    "'{value}' does not match format '{format}': {datetime_err}"
                ))
            })?,
    };

    Instant::from_local(tz, local)
}

/// `YYYY-MM-DD` in the instant's own timezone.
#[must_use]
pub fn format_date(instant: &Instant) -> String {
    instant.datetime().format(DATE_FORMAT).to_string()
}

#[must_use]
pub fn format_datetime(instant: &Instant) -> String {
    instant.datetime().format(DATETIME_FORMAT).to_string()
}
