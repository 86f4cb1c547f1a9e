//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration layers according to precedence.
///
/// # Examples
///
/// ```
/// use innkeep::config::{Config, ConfigMerger};
///
/// let low = Config { currency: Some("USD".to_string()), ..Default::default() };
/// let high = Config { currency: Some("EUR".to_string()), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.currency, Some("EUR".to_string()));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merges sources, given from lowest to highest precedence.
    #[must_use]
    pub fn merge(mut sources: Vec<ConfigSource>) -> Config {
        sources.sort_by_key(|s| s.precedence);
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merges `source` into `target`; every field set in `source` wins.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }
        if source.utc_offset.is_some() {
            target.utc_offset.clone_from(&source.utc_offset);
        }
        if source.default_checkin_time.is_some() {
            target
                .default_checkin_time
                .clone_from(&source.default_checkin_time);
        }
        if source.default_checkout_time.is_some() {
            target
                .default_checkout_time
                .clone_from(&source.default_checkout_time);
        }
        if source.currency.is_some() {
            target.currency.clone_from(&source.currency);
        }
    }
}
