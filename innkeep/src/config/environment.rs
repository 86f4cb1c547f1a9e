//! Environment variable handling for configuration overrides.
//!
//! `INNKEEP_*` variables override values from the configuration file.

use std::env;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Overrides `maximum_lock_wait_seconds`.
pub const LOCK_WAIT_ENV: &str = "INNKEEP_MAXIMUM_LOCK_WAIT_SECONDS";
/// Overrides `utc_offset`.
pub const UTC_OFFSET_ENV: &str = "INNKEEP_UTC_OFFSET";
/// Overrides `default_checkin_time`.
pub const CHECKIN_TIME_ENV: &str = "INNKEEP_DEFAULT_CHECKIN_TIME";
/// Overrides `default_checkout_time`.
pub const CHECKOUT_TIME_ENV: &str = "INNKEEP_DEFAULT_CHECKOUT_TIME";
/// Overrides `currency`.
pub const CURRENCY_ENV: &str = "INNKEEP_CURRENCY";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use innkeep::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Applies every set `INNKEEP_*` variable to `config`.
    ///
    /// Empty values are ignored. Values are checked later by the validator,
    /// except the lock wait which must parse as an integer here.
    ///
    /// # Errors
    ///
    /// Returns an error if `INNKEEP_MAXIMUM_LOCK_WAIT_SECONDS` is not a
    /// non-negative integer.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(seconds) = Self::var(LOCK_WAIT_ENV) {
            config.maximum_lock_wait_seconds =
                Some(seconds.parse().map_err(|_| Error::Validation {
                    field: LOCK_WAIT_ENV.into(),
                    message: "Must be a positive integer".into(),
                })?);
        }

        if let Some(offset) = Self::var(UTC_OFFSET_ENV) {
            config.utc_offset = Some(offset);
        }

        if let Some(time) = Self::var(CHECKIN_TIME_ENV) {
            config.default_checkin_time = Some(time);
        }

        if let Some(time) = Self::var(CHECKOUT_TIME_ENV) {
            config.default_checkout_time = Some(time);
        }

        if let Some(currency) = Self::var(CURRENCY_ENV) {
            config.currency = Some(currency);
        }

        Ok(())
    }

    fn var(name: &str) -> Option<String> {
        env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
