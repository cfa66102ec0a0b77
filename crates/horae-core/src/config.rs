use anyhow::Result;
use chrono_tz::Tz;
use config::Config;
use serde::Deserialize;

use crate::error::CoreResult;
use crate::format::create_timezone;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub timezone: TimezoneConfig,
    pub logging: LoggingConfig,
    pub enumeration: EnumerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimezoneConfig {
    /// IANA name used when a caller does not name a timezone.
    pub default: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumerationConfig {
    /// Whether day enumeration memoizes results per range.
    pub cache: bool,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `horae.toml`.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Self::builder()?
            .add_source(
                config::Environment::with_prefix("HORAE")
                    .convert_case(config::Case::Snake)
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("timezone.default", "UTC")?
            .set_default("logging.level", "info")?
            .set_default("enumeration.cache", true)?
            // TOML file
            .add_source(config::File::with_name("horae.toml").required(false)))
    }

    /// ## Summary
    /// Resolves the configured default timezone.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidArgument` if the configured name is unknown.
    pub fn default_timezone(&self) -> CoreResult<Tz> {
        create_timezone(&self.timezone.default)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
