//! Property tests for the pricing calculator and the overlap predicate.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use hostel_api::booking::availability::overlaps;
use hostel_api::booking::pricing::{price_booking, DEFAULT_MAINTENANCE_FEE, TAX_RATE};
use hostel_api::types::GuestCount;
use proptest::prelude::*;

fn guests() -> impl Strategy<Value = GuestCount> {
    (1..=4i32, 0..=3i32, 0..=3i32).prop_map(|(adults, children, infants_under_2)| GuestCount {
        adults,
        children,
        infants_under_2,
    })
}

fn date(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 1)
        .map(|base| base + chrono::Duration::days(offset))
        .unwrap_or_default()
}

proptest! {
    #[test]
    fn total_is_cost_plus_tax_plus_charge(
        rate in 0.0..10_000.0f64,
        nights in 1..365i32,
        guests in guests(),
        charge in proptest::option::of(0.0..1_000.0f64),
    ) {
        let price = price_booking(rate, nights, &guests, charge).unwrap();
        let expected = price.room_cost + price.tax + price.maintenance_charge;
        prop_assert!((price.total_price - expected).abs() <= 1e-6 * expected.max(1.0));
    }

    #[test]
    fn tax_is_always_18_percent(
        rate in 0.0..10_000.0f64,
        nights in 1..365i32,
        guests in guests(),
    ) {
        let price = price_booking(rate, nights, &guests, None).unwrap();
        let expected = price.room_cost * TAX_RATE;
        prop_assert!((price.tax - expected).abs() <= 1e-6 * expected.max(1.0));
    }

    #[test]
    fn room_cost_scales_with_party_and_nights(
        rate in 0.01..10_000.0f64,
        nights in 1..365i32,
        guests in guests(),
    ) {
        let price = price_booking(rate, nights, &guests, Some(0.0)).unwrap();
        let expected = rate * f64::from(nights) * f64::from(guests.total());
        prop_assert!((price.room_cost - expected).abs() <= 1e-6 * expected.max(1.0));
    }

    #[test]
    fn absent_charge_means_flat_fee(
        rate in 0.0..10_000.0f64,
        nights in 1..30i32,
        guests in guests(),
    ) {
        let price = price_booking(rate, nights, &guests, None).unwrap();
        prop_assert!((price.maintenance_charge - DEFAULT_MAINTENANCE_FEE).abs() < f64::EPSILON);
    }

    #[test]
    fn overlap_is_symmetric(
        a_start in 0..400i64,
        a_len in 1..30i64,
        b_start in 0..400i64,
        b_len in 1..30i64,
    ) {
        let (a_in, a_out) = (date(a_start), date(a_start + a_len));
        let (b_in, b_out) = (date(b_start), date(b_start + b_len));
        prop_assert_eq!(
            overlaps(a_in, a_out, b_in, b_out),
            overlaps(b_in, b_out, a_in, a_out)
        );
    }

    #[test]
    fn adjacent_stays_never_overlap(
        start in 0..400i64,
        first_len in 1..30i64,
        second_len in 1..30i64,
    ) {
        let first_in = date(start);
        let first_out = date(start + first_len);
        let second_out = date(start + first_len + second_len);
        prop_assert!(!overlaps(first_in, first_out, first_out, second_out));
    }

    #[test]
    fn containment_always_overlaps(
        start in 0..400i64,
        len in 3..30i64,
    ) {
        let outer_in = date(start);
        let outer_out = date(start + len);
        let inner_in = date(start + 1);
        let inner_out = date(start + len - 1);
        prop_assert!(overlaps(outer_in, outer_out, inner_in, inner_out));
    }
}
