//! Property-based tests for configuration merging and offsets.

use proptest::prelude::*;

use crate::config::schema::parse_utc_offset;
use crate::config::{Config, ConfigMerger};

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(1u64..600),
        prop::option::of("[+-](0[0-9]|1[0-4]):[0-5][0-9]"),
        prop::option::of("[A-Z]{3}"),
    )
        .prop_map(|(wait, offset, currency)| Config {
            maximum_lock_wait_seconds: wait,
            utc_offset: offset,
            currency,
            ..Default::default()
        })
}

proptest! {
    // Merging a layer over itself changes nothing
    #[test]
    fn merge_is_idempotent(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &config);
        prop_assert_eq!(merged, config);
    }

    // Every field set in the higher layer wins; unset fields fall through
    #[test]
    fn higher_layer_wins(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);
        prop_assert_eq!(
            merged.maximum_lock_wait_seconds,
            high.maximum_lock_wait_seconds.or(low.maximum_lock_wait_seconds)
        );
        prop_assert_eq!(merged.utc_offset, high.utc_offset.or(low.utc_offset));
        prop_assert_eq!(merged.currency, high.currency.or(low.currency));
    }

    // Well-formed offsets parse to the seconds they spell out
    #[test]
    fn offsets_parse(negative in any::<bool>(), hours in 0i32..=14, minutes in 0i32..60) {
        let text = format!("{}{hours:02}:{minutes:02}", if negative { '-' } else { '+' });
        let offset = parse_utc_offset(&text).unwrap();
        let seconds = hours * 3600 + minutes * 60;
        prop_assert_eq!(offset.local_minus_utc(), if negative { -seconds } else { seconds });
    }
}
