use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Prefix for environment overrides, e.g. `TIMEWICS_LOGGING__LEVEL=trace`.
pub const ENV_PREFIX: &str = "TIMEWICS";

/// Optional configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "timewics.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub calendar: CalendarConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Zone used when a calendar carries no `X-WR-TIMEZONE`.
    pub default_timezone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub directory: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, environment variables and an optional
    /// `timewics.toml` into a `Settings`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails,
    /// or if the resulting settings are invalid.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("calendar.default_timezone", "UTC")?
            .set_default("output.directory", ".")?
            // TOML file
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            // Env
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks that the loaded values are usable.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` for empty values.
    pub fn validate(&self) -> CoreResult<()> {
        if self.calendar.default_timezone.trim().is_empty() {
            return Err(CoreError::InvalidConfiguration(
                "calendar.default_timezone must not be empty".to_string(),
            ));
        }
        if self.output.directory.trim().is_empty() {
            return Err(CoreError::InvalidConfiguration(
                "output.directory must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            calendar: CalendarConfig {
                default_timezone: "UTC".to_string(),
            },
            output: OutputConfig {
                directory: ".".to_string(),
            },
        }
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    tracing::debug!("Loading configuration");
    Settings::load()
}
