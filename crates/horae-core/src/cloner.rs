//! Copies an instant into an independent value at second precision.

use chrono::Timelike;

use crate::error::{CoreError, CoreResult};
use crate::instant::Instant;

/// ## Summary
/// Reconstructs `original` from its whole-second timestamp and timezone.
///
/// The sub-second part is dropped; wall-clock fields and timezone name are
/// preserved.
///
/// ## Errors
/// Returns `CoreError::UnexpectedValue` if the instant cannot be rebuilt or
/// the rebuilt value does not match the original's wall clock.
pub fn clone_instant(original: &Instant) -> CoreResult<Instant> {
    let whole_seconds = original.utc().with_nanosecond(0).ok_or_else(|| {
        CoreError::UnexpectedValue(format!("could not create instant from {original}"))
    })?;

    let cloned = Instant::new(whole_seconds.with_timezone(&original.timezone()));

    let wall_clock_kept = original
        .naive_local()
        .with_nanosecond(0)
        .is_some_and(|wall| wall == cloned.naive_local());
    if !wall_clock_kept || !cloned.same_timezone(original) {
        return Err(CoreError::UnexpectedValue(format!(
            "clone of {original} does not match the original"
        )));
    }

    Ok(cloned)
}
