//! Pricing calculator.
//!
//! A pure function of the nightly rate, night count, guest counts and the
//! maintenance surcharge. The surcharge comes from the resident's most recent
//! maintenance ticket; when no charge is on file a flat fee applies instead.
//! A charge that is present but zero suppresses the flat fee.

use crate::error::{Error, Result};
use crate::types::{GuestCount, PriceBreakdown, ResidentId};
use async_trait::async_trait;

/// Tax rate applied to the room cost (18% GST).
pub const TAX_RATE: f64 = 0.18;

/// Flat fee applied when no maintenance charge is on file for the resident.
pub const DEFAULT_MAINTENANCE_FEE: f64 = 50.0;

/// Source of the per-resident maintenance surcharge folded into booking
/// prices.
///
/// Pricing only depends on this capability, not on the maintenance subsystem
/// itself, so the coupling can be revisited without touching the calculator.
#[async_trait]
pub trait SurchargeSource: Send + Sync {
    /// The charge on file for the resident, or `None` when there is none.
    async fn surcharge_for(&self, resident_id: ResidentId) -> Result<Option<f64>>;
}

/// Fixed surcharge source for tests and development.
#[derive(Clone, Copy, Debug)]
pub struct FixedSurcharge(pub Option<f64>);

#[async_trait]
impl SurchargeSource for FixedSurcharge {
    async fn surcharge_for(&self, _resident_id: ResidentId) -> Result<Option<f64>> {
        Ok(self.0)
    }
}

/// Compute the price breakdown for a stay.
///
/// `room_cost = nightly_rate * total_nights * (adults + children + infants)`,
/// `tax = 0.18 * room_cost`, and the total adds the effective surcharge:
/// the charge on file if present (zero included), else [`DEFAULT_MAINTENANCE_FEE`].
///
/// # Errors
///
/// Returns [`Error::InvalidPrice`] if any computed field is not finite.
pub fn price_booking(
    nightly_rate: f64,
    total_nights: i32,
    guests: &GuestCount,
    maintenance_charge: Option<f64>,
) -> Result<PriceBreakdown> {
    let surcharge = maintenance_charge.unwrap_or(DEFAULT_MAINTENANCE_FEE);
    let room_cost = nightly_rate * f64::from(total_nights) * f64::from(guests.total());
    let tax = room_cost * TAX_RATE;
    let total_price = room_cost + tax + surcharge;

    let breakdown = PriceBreakdown {
        base_price: nightly_rate,
        total_nights,
        room_cost,
        tax,
        maintenance_charge: surcharge,
        total_price,
    };
    ensure_finite(&breakdown)?;
    Ok(breakdown)
}

fn ensure_finite(breakdown: &PriceBreakdown) -> Result<()> {
    let fields = [
        ("base_price", breakdown.base_price),
        ("room_cost", breakdown.room_cost),
        ("tax", breakdown.tax),
        ("maintenance_charge", breakdown.maintenance_charge),
        ("total_price", breakdown.total_price),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(Error::InvalidPrice(format!("{name} is not finite")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const GUESTS: GuestCount = GuestCount {
        adults: 2,
        children: 0,
        infants_under_2: 0,
    };

    #[test]
    fn three_nights_two_adults_at_1000_with_zero_charge() {
        // 3 nights * 2 guests * 1000 = 6000; 18% tax = 1080; charge present
        // and zero, so no flat fee: total 7080.
        let price = price_booking(1000.0, 3, &GUESTS, Some(0.0)).unwrap();
        assert_eq!(price.total_nights, 3);
        assert!((price.room_cost - 6000.0).abs() < 1e-9);
        assert!((price.tax - 1080.0).abs() < 1e-9);
        assert!((price.maintenance_charge).abs() < 1e-9);
        assert!((price.total_price - 7080.0).abs() < 1e-9);
    }

    #[test]
    fn flat_fee_applies_when_no_charge_on_file() {
        let price = price_booking(1000.0, 3, &GUESTS, None).unwrap();
        assert!((price.maintenance_charge - DEFAULT_MAINTENANCE_FEE).abs() < f64::EPSILON);
        assert!((price.total_price - 7130.0).abs() < 1e-9);
    }

    #[test]
    fn charge_on_file_replaces_flat_fee() {
        let price = price_booking(1000.0, 3, &GUESTS, Some(150.0)).unwrap();
        assert!((price.maintenance_charge - 150.0).abs() < f64::EPSILON);
        assert!((price.total_price - 7230.0).abs() < 1e-9);
    }

    #[test]
    fn infants_count_toward_the_room_cost() {
        let guests = GuestCount {
            adults: 1,
            children: 1,
            infants_under_2: 1,
        };
        let price = price_booking(100.0, 2, &guests, Some(0.0)).unwrap();
        assert!((price.room_cost - 600.0).abs() < 1e-9);
    }

    #[test]
    fn tax_is_18_percent_of_room_cost() {
        let price = price_booking(333.33, 7, &GUESTS, None).unwrap();
        assert!((price.tax - price.room_cost * TAX_RATE).abs() < 1e-9);
    }

    #[test]
    fn total_is_cost_plus_tax_plus_charge() {
        let price = price_booking(420.0, 5, &GUESTS, Some(75.0)).unwrap();
        assert!(
            (price.total_price - (price.room_cost + price.tax + price.maintenance_charge)).abs()
                < 1e-9
        );
    }

    #[test]
    fn non_finite_rate_is_rejected() {
        let err = price_booking(f64::INFINITY, 3, &GUESTS, None).unwrap_err();
        assert!(matches!(err, Error::InvalidPrice(_)));
        let err = price_booking(f64::NAN, 3, &GUESTS, None).unwrap_err();
        assert!(matches!(err, Error::InvalidPrice(_)));
    }

    #[tokio::test]
    async fn fixed_surcharge_source_returns_its_value() {
        let source = FixedSurcharge(Some(25.0));
        let charge = source.surcharge_for(ResidentId::new()).await.unwrap();
        assert_eq!(charge, Some(25.0));
    }
}
