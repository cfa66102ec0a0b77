//! Time unit constants and canonical format strings.

pub const SECONDS_IN_MINUTE: i64 = 60;
pub const MINUTES_IN_HOUR: i64 = 60;
pub const HOURS_IN_DAY: i64 = 24;
pub const DAYS_IN_WEEK: i64 = 7;

pub const SECONDS_IN_HOUR: i64 = SECONDS_IN_MINUTE * MINUTES_IN_HOUR;
pub const SECONDS_IN_DAY: i64 = SECONDS_IN_HOUR * HOURS_IN_DAY;
pub const SECONDS_IN_WEEK: i64 = SECONDS_IN_DAY * DAYS_IN_WEEK;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Weekday names, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Canonical calendar date, `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATETIME_FORMAT: &str = const_str::concat!(DATE_FORMAT, " ", TIME_FORMAT);
