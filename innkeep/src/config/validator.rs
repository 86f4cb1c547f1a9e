//! Configuration validation.

use crate::booking::parse_time;
use crate::config::schema::{parse_utc_offset, Config};
use crate::error::{Error, Result};

/// Validates a merged configuration.
///
/// # Examples
///
/// ```
/// use innkeep::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let bad = Config { currency: Some("dollars".into()), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates every field that is set.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first invalid field.
    pub fn validate(config: &Config) -> Result<()> {
        if config.maximum_lock_wait_seconds == Some(0) {
            return Err(Error::validation(
                "maximum_lock_wait_seconds",
                "Timeout must be greater than 0",
            ));
        }

        if let Some(ref offset) = config.utc_offset {
            if parse_utc_offset(offset).is_none() {
                return Err(Error::validation(
                    "utc_offset",
                    format!("Invalid offset '{offset}' (expected +HH:MM or -HH:MM)"),
                ));
            }
        }

        Self::validate_time("default_checkin_time", config.default_checkin_time.as_deref())?;
        Self::validate_time(
            "default_checkout_time",
            config.default_checkout_time.as_deref(),
        )?;

        if let Some(ref currency) = config.currency {
            Self::validate_currency(currency)?;
        }

        Ok(())
    }

    fn validate_time(field: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(time) if parse_time(time).is_none() => Err(Error::validation(
                field,
                format!("Invalid time '{time}' (expected HH:MM:SS)"),
            )),
            _ => Ok(()),
        }
    }

    /// Currency codes are three uppercase ASCII letters.
    fn validate_currency(currency: &str) -> Result<()> {
        if currency.len() == 3 && currency.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(())
        } else {
            Err(Error::validation(
                "currency",
                format!("Invalid currency code '{currency}' (expected e.g. USD)"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(config: &Config) -> String {
        match ConfigValidator::validate(config) {
            Err(Error::Validation { field, .. }) => field,
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_is_valid() {
        ConfigValidator::validate(&Config::default()).unwrap();
    }

    #[test]
    fn test_full_config_is_valid() {
        let config = Config {
            maximum_lock_wait_seconds: Some(30),
            utc_offset: Some("-03:00".into()),
            default_checkin_time: Some("15:00:00".into()),
            default_checkout_time: Some("10:00".into()),
            currency: Some("EUR".into()),
        };
        ConfigValidator::validate(&config).unwrap();
    }

    #[test]
    fn test_zero_lock_wait() {
        let config = Config {
            maximum_lock_wait_seconds: Some(0),
            ..Default::default()
        };
        assert_eq!(field_of(&config), "maximum_lock_wait_seconds");
    }

    #[test]
    fn test_bad_offset() {
        let config = Config {
            utc_offset: Some("UTC+6".into()),
            ..Default::default()
        };
        assert_eq!(field_of(&config), "utc_offset");
    }

    #[test]
    fn test_bad_times() {
        let config = Config {
            default_checkout_time: Some("noon".into()),
            ..Default::default()
        };
        assert_eq!(field_of(&config), "default_checkout_time");

        let config = Config {
            default_checkin_time: Some("25:00:00".into()),
            ..Default::default()
        };
        assert_eq!(field_of(&config), "default_checkin_time");
    }

    #[test]
    fn test_bad_currency() {
        for currency in ["usd", "EURO", "", "U$D"] {
            let config = Config {
                currency: Some(currency.into()),
                ..Default::default()
            };
            assert_eq!(field_of(&config), "currency");
        }
    }
}
