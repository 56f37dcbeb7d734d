//! Booking reference generation.
//!
//! References look like `BOOK-1767225600000-0421`: the creation timestamp in
//! milliseconds plus a random four-digit suffix. The suffix alone makes
//! collisions merely improbable, so uniqueness is enforced by the unique index
//! on `bookings.reference` and the insert path regenerates on violation.

use chrono::Utc;
use rand::Rng;

/// Bound on regenerate-and-retry attempts when inserting a booking.
pub const MAX_REFERENCE_ATTEMPTS: u32 = 5;

/// Build a reference from its parts. Split out for testability.
#[must_use]
pub fn format_reference(timestamp_millis: i64, suffix: u16) -> String {
    format!("BOOK-{timestamp_millis}-{suffix:04}")
}

/// Generate a fresh candidate reference.
#[must_use]
pub fn new_reference() -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format_reference(Utc::now().timestamp_millis(), suffix)
}

/// Whether a database error is a unique-constraint violation (the signal to
/// regenerate the reference and retry the insert).
#[must_use]
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reference_has_the_expected_shape() {
        let reference = format_reference(1_767_225_600_000, 421);
        assert_eq!(reference, "BOOK-1767225600000-0421");
    }

    #[test]
    fn suffix_is_zero_padded() {
        let reference = format_reference(1, 7);
        assert_eq!(reference, "BOOK-1-0007");
    }

    #[test]
    fn generated_references_parse_back() {
        let reference = new_reference();
        let mut parts = reference.split('-');
        assert_eq!(parts.next(), Some("BOOK"));
        let millis: i64 = parts.next().unwrap().parse().unwrap();
        assert!(millis > 0);
        let suffix: u16 = parts.next().unwrap().parse().unwrap();
        assert!(suffix < 10_000);
        assert_eq!(parts.next(), None);
    }
}
