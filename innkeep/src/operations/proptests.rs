//! Property-based tests for the conflict rule.
//!
//! Two active bookings on one room must never overlap, except for the
//! same-day turnover the rule allows when the earlier stay checks out by
//! the cutoff.

use chrono::{Days, NaiveDate, NaiveTime};
use proptest::prelude::*;

use crate::booking::{StayInterval, LATE_CHECKOUT_CUTOFF};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

// Stays starting within a 60 day window, 1 to 14 nights long
fn stay_strategy() -> impl Strategy<Value = StayInterval> {
    (0u64..60, 1u64..15, prop::option::of(0u32..24)).prop_map(|(start, nights, hour)| {
        let checkin = base() + Days::new(start);
        let checkout = checkin + Days::new(nights);
        StayInterval::new(checkin, checkout)
            .unwrap()
            .with_checkout_time(hour.and_then(|h| NaiveTime::from_hms_opt(h, 0, 0)))
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Overlapping date ranges always conflict, whatever the checkout time
    #[test]
    fn overlap_always_conflicts(existing in stay_strategy(), requested in stay_strategy()) {
        if existing.overlaps(&requested) {
            prop_assert!(existing.conflicts_with(&requested));
        }
    }

    // Overlap is symmetric
    #[test]
    fn overlap_is_symmetric(a in stay_strategy(), b in stay_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    // Any conflict that is not a date overlap is the late same-day case
    #[test]
    fn non_overlap_conflict_requires_late_checkout(
        existing in stay_strategy(),
        requested in stay_strategy()
    ) {
        if existing.conflicts_with(&requested) && !existing.overlaps(&requested) {
            prop_assert!(existing.is_late_checkout());
            prop_assert!(
                requested.checkin_date() == existing.checkout_date()
                    || requested.checkout_date() == existing.checkout_date()
            );
        }
    }

    // Back-to-back turnover by the cutoff is allowed
    #[test]
    fn on_time_turnover_is_free(existing in stay_strategy(), nights in 1u64..10) {
        let existing = existing.with_checkout_time(Some(LATE_CHECKOUT_CUTOFF));
        let checkin = existing.checkout_date();
        let requested = StayInterval::new(checkin, checkin + Days::new(nights)).unwrap();
        prop_assert!(!existing.conflicts_with(&requested));
    }

    // Checking is deterministic
    #[test]
    fn conflict_check_is_idempotent(a in stay_strategy(), b in stay_strategy()) {
        prop_assert_eq!(a.conflicts_with(&b), a.conflicts_with(&b));
    }
}
