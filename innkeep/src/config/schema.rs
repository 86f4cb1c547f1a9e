//! Configuration schema definitions.
//!
//! Every field is optional so partial files and environment overrides can be
//! layered; the accessor methods fill in the built-in defaults.

use std::time::Duration;

use chrono::{FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::booking::parse_time;

/// Default seconds to wait for the write lock.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Default check-in time applied to requests that carry none.
pub const DEFAULT_CHECKIN_TIME: &str = "14:00:00";

/// Default check-out time applied to requests that carry none.
pub const DEFAULT_CHECKOUT_TIME: &str = "11:00:00";

/// Default currency code.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use innkeep::config::Config;
///
/// let config = Config {
///     utc_offset: Some("+06:00".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 6 * 3600);
/// assert_eq!(config.lock_wait().as_secs(), 5);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Maximum time to wait for the database write lock (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Local offset of the hotels, `+HH:MM` or `-HH:MM`.
    pub utc_offset: Option<String>,

    /// Check-in time used when a booking request has none (`HH:MM:SS`).
    pub default_checkin_time: Option<String>,

    /// Check-out time used when a booking request has none (`HH:MM:SS`).
    pub default_checkout_time: Option<String>,

    /// Currency code reported next to amounts.
    pub currency: Option<String>,
}

impl Config {
    /// The write-lock wait, defaulting to five seconds.
    #[must_use]
    pub fn lock_wait(&self) -> Duration {
        Duration::from_secs(
            self.maximum_lock_wait_seconds
                .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS),
        )
    }

    /// The configured offset, UTC when unset.
    ///
    /// Returns `None` if the configured value does not parse; validated
    /// configurations always parse.
    #[must_use]
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        match self.utc_offset.as_deref() {
            Some(value) => parse_utc_offset(value),
            None => FixedOffset::east_opt(0),
        }
    }

    /// The default check-in time.
    #[must_use]
    pub fn checkin_time(&self) -> Option<NaiveTime> {
        parse_time(
            self.default_checkin_time
                .as_deref()
                .unwrap_or(DEFAULT_CHECKIN_TIME),
        )
    }

    /// The default check-out time.
    #[must_use]
    pub fn checkout_time(&self) -> Option<NaiveTime> {
        parse_time(
            self.default_checkout_time
                .as_deref()
                .unwrap_or(DEFAULT_CHECKOUT_TIME),
        )
    }

    /// The currency code.
    #[must_use]
    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }
}

/// Parses a `+HH:MM` / `-HH:MM` offset.
///
/// # Examples
///
/// ```
/// use innkeep::config::schema::parse_utc_offset;
///
/// assert_eq!(parse_utc_offset("-05:30").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
/// assert!(parse_utc_offset("0600").is_none());
/// ```
#[must_use]
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    let (sign, rest) = match value.chars().next()? {
        '+' => (1, &value[1..]),
        '-' => (-1, &value[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
