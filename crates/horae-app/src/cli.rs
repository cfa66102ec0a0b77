//! Command line surface of the `horae` binary.

use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use horae_core::config::Settings;
use horae_core::constants::{DATE_FORMAT, DATETIME_FORMAT};
use horae_core::format::{create_from_format, create_timezone};
use horae_core::{Clock, CoreResult, Instant, SystemClock};
use horae_range::{DateRange, DateTimeRange, DayEnumerator, enumerate_days_as_strings};

#[derive(Debug, Parser)]
#[command(name = "horae", version, about = "Compare and enumerate ranges of calendar time")]
pub struct Cli {
    /// IANA timezone of every argument; defaults to `timezone.default`
    #[arg(long, global = true)]
    pub tz: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every calendar day from SINCE to TILL, one per line
    Days { since: String, till: String },

    /// Print whether range A intersects range B
    Intersects {
        a_since: String,
        a_till: String,
        b_since: String,
        b_till: String,

        /// Compare as date ranges instead of datetime ranges
        #[arg(long)]
        dates: bool,
    },

    /// Print the current instant
    Now,
}

/// Accepts `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD` (midnight).
fn parse_bound(value: &str, tz: Tz) -> CoreResult<Instant> {
    create_from_format(value, DATETIME_FORMAT, Some(tz))
        .or_else(|_datetime_err| create_from_format(value, DATE_FORMAT, Some(tz)))
}

fn resolve_timezone(cli: &Cli, settings: &Settings) -> CoreResult<Tz> {
    match &cli.tz {
        Some(name) => create_timezone(name),
        None => settings.default_timezone(),
    }
}

/// ## Summary
/// Executes the parsed command and returns the lines to print.
///
/// ## Errors
/// Returns an error if an argument cannot be parsed or a range cannot be
/// built or compared.
pub fn run(cli: &Cli, settings: &Settings) -> anyhow::Result<Vec<String>> {
    let tz = resolve_timezone(cli, settings)?;
    tracing::debug!(timezone = tz.name(), command = ?cli.command, "Running command");

    let lines = match &cli.command {
        Command::Days { since, till } => {
            let range = DateRange::new(parse_bound(since, tz)?, parse_bound(till, tz)?)?;
            if settings.enumeration.cache {
                DayEnumerator::new().days_as_strings(&range)?
            } else {
                enumerate_days_as_strings(&range)?
            }
        }
        Command::Intersects {
            a_since,
            a_till,
            b_since,
            b_till,
            dates,
        } => {
            let (a_since, a_till) = (parse_bound(a_since, tz)?, parse_bound(a_till, tz)?);
            let (b_since, b_till) = (parse_bound(b_since, tz)?, parse_bound(b_till, tz)?);

            let intersects = if *dates {
                DateRange::new(a_since, a_till)?.intersects(&DateRange::new(b_since, b_till)?)?
            } else {
                DateTimeRange::new(a_since, a_till)?
                    .intersects(&DateTimeRange::new(b_since, b_till)?)?
            };
            vec![intersects.to_string()]
        }
        Command::Now => vec![SystemClock.now(tz).to_string()],
    };

    Ok(lines)
}
