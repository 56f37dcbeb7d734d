//! Availability checking for rooms and residents.
//!
//! Overlap uses strict half-open `[check_in, check_out)` intervals: a booking
//! whose checkout equals another's check-in does not overlap, so back-to-back
//! turnover on the same day is allowed.

use crate::error::{Error, Result};
use crate::types::{ResidentId, RoomId};
use chrono::NaiveDate;
use sqlx::PgExecutor;

/// Two half-open date intervals overlap iff each starts before the other ends.
#[must_use]
pub fn overlaps(
    a_check_in: NaiveDate,
    a_check_out: NaiveDate,
    b_check_in: NaiveDate,
    b_check_out: NaiveDate,
) -> bool {
    a_check_in < b_check_out && a_check_out > b_check_in
}

/// Validate a requested stay and return the number of nights.
///
/// Check-in must be strictly before check-out and not earlier than `today`
/// (day granularity).
///
/// # Errors
///
/// Returns [`Error::Validation`] when the range is invalid.
pub fn validate_stay(check_in: NaiveDate, check_out: NaiveDate, today: NaiveDate) -> Result<i32> {
    if check_in >= check_out {
        return Err(Error::Validation("Invalid booking dates".to_string()));
    }
    if check_in < today {
        return Err(Error::Validation(
            "Check-in date cannot be in the past".to_string(),
        ));
    }
    let nights = (check_out - check_in).num_days();
    i32::try_from(nights).map_err(|_| Error::Validation("Invalid booking dates".to_string()))
}

/// The slice of room state the admission decision looks at.
#[derive(Clone, Copy, Debug)]
pub struct RoomSnapshot {
    /// Total beds
    pub capacity: i32,
    /// Beds not reserved by any active booking
    pub bed_remaining: i32,
    /// Whether the room accepts new bookings
    pub is_available: bool,
    /// Number of entries in the occupant list
    pub occupant_count: i64,
}

/// Decide whether a room can accept one more booking.
///
/// The room accepts iff the count of overlapping non-cancelled bookings is
/// strictly below the remaining bed count, the occupant list has not reached
/// capacity, and enough beds remain for the whole party.
///
/// # Errors
///
/// Returns [`Error::Conflict`] naming the violated constraint.
pub fn admit(room: &RoomSnapshot, overlapping_bookings: i64, party: i32) -> Result<()> {
    if !room.is_available || room.bed_remaining <= 0 {
        return Err(Error::Conflict(
            "Room is not available or fully booked".to_string(),
        ));
    }
    if room.occupant_count >= i64::from(room.capacity) {
        return Err(Error::Conflict("Room is already fully booked".to_string()));
    }
    if overlapping_bookings >= i64::from(room.bed_remaining) {
        return Err(Error::Conflict(
            "Room is already booked for the selected period".to_string(),
        ));
    }
    if party > room.bed_remaining {
        return Err(Error::Conflict(
            "Not enough beds remaining for the party size".to_string(),
        ));
    }
    Ok(())
}

/// Count non-cancelled bookings for a room overlapping the requested interval.
///
/// # Errors
///
/// Returns [`Error::Database`] if the query fails.
pub async fn count_overlapping_for_room<'e>(
    executor: impl PgExecutor<'e>,
    room_id: RoomId,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM bookings
         WHERE room_id = $1
           AND status <> 'cancelled'
           AND check_in < $3
           AND check_out > $2",
    )
    .bind(room_id.as_uuid())
    .bind(check_in)
    .bind(check_out)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

/// Whether the resident already holds a non-cancelled booking overlapping the
/// requested interval, in any room.
///
/// # Errors
///
/// Returns [`Error::Database`] if the query fails.
pub async fn resident_overlap_exists<'e>(
    executor: impl PgExecutor<'e>,
    resident_id: ResidentId,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> Result<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(
             SELECT 1 FROM bookings
             WHERE resident_id = $1
               AND status <> 'cancelled'
               AND check_in < $3
               AND check_out > $2
         )",
    )
    .bind(resident_id.as_uuid())
    .bind(check_in)
    .bind(check_out)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn overlapping_intervals_are_detected() {
        assert!(overlaps(
            date("2030-01-10"),
            date("2030-01-13"),
            date("2030-01-12"),
            date("2030-01-15"),
        ));
        assert!(overlaps(
            date("2030-01-10"),
            date("2030-01-20"),
            date("2030-01-12"),
            date("2030-01-13"),
        ));
    }

    #[test]
    fn back_to_back_turnover_does_not_overlap() {
        // checkout == next check-in: same-day turnover is allowed
        assert!(!overlaps(
            date("2030-01-10"),
            date("2030-01-13"),
            date("2030-01-13"),
            date("2030-01-15"),
        ));
        assert!(!overlaps(
            date("2030-01-13"),
            date("2030-01-15"),
            date("2030-01-10"),
            date("2030-01-13"),
        ));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!overlaps(
            date("2030-01-01"),
            date("2030-01-05"),
            date("2030-02-01"),
            date("2030-02-05"),
        ));
    }

    #[test]
    fn stay_must_start_before_it_ends() {
        let today = date("2030-01-01");
        assert!(validate_stay(date("2030-01-13"), date("2030-01-10"), today).is_err());
        assert!(validate_stay(date("2030-01-10"), date("2030-01-10"), today).is_err());
    }

    #[test]
    fn stay_cannot_start_in_the_past() {
        let today = date("2030-01-11");
        let err = validate_stay(date("2030-01-10"), date("2030-01-13"), today).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        // today itself is allowed
        assert_eq!(
            validate_stay(date("2030-01-11"), date("2030-01-13"), today).unwrap(),
            2
        );
    }

    #[test]
    fn night_count_is_the_day_difference() {
        let today = date("2030-01-01");
        assert_eq!(
            validate_stay(date("2030-01-10"), date("2030-01-13"), today).unwrap(),
            3
        );
    }

    #[test]
    fn admission_rejects_unavailable_room() {
        let room = RoomSnapshot {
            capacity: 2,
            bed_remaining: 0,
            is_available: false,
            occupant_count: 2,
        };
        assert!(admit(&room, 0, 1).is_err());
    }

    #[test]
    fn admission_rejects_room_at_capacity() {
        let room = RoomSnapshot {
            capacity: 2,
            bed_remaining: 1,
            is_available: true,
            occupant_count: 2,
        };
        let err = admit(&room, 0, 1).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn admission_rejects_when_overlaps_reach_remaining_beds() {
        let room = RoomSnapshot {
            capacity: 4,
            bed_remaining: 2,
            is_available: true,
            occupant_count: 1,
        };
        assert!(admit(&room, 2, 1).is_err());
        assert!(admit(&room, 1, 1).is_ok());
    }

    #[test]
    fn admission_rejects_party_larger_than_remaining_beds() {
        let room = RoomSnapshot {
            capacity: 4,
            bed_remaining: 2,
            is_available: true,
            occupant_count: 1,
        };
        assert!(admit(&room, 0, 3).is_err());
        assert!(admit(&room, 0, 2).is_ok());
    }
}
