//! Booking lifecycle manager.
//!
//! Orchestrates creation, cancellation and payment-confirmation transitions,
//! mutating the booking ledger, the room inventory and the resident record
//! together. Every multi-entity mutation runs inside one transaction; the
//! "check capacity, then reserve" sequence additionally locks the room row
//! and expresses the counter update as a conditional decrement, so two
//! concurrent creates for the same room cannot both pass the capacity check.

use crate::booking::availability::{self, RoomSnapshot};
use crate::booking::pricing::{self, SurchargeSource};
use crate::booking::reference::{is_unique_violation, new_reference, MAX_REFERENCE_ATTEMPTS};
use crate::error::{Error, Result};
use crate::gateway::notifier::{send_best_effort, EmailMessage, Notifier};
use crate::store::bookings::lock_booking;
use crate::store::rooms::lock_room;
use crate::types::{
    Booking, BookingId, BookingStatus, GuestCount, PaymentRecord, PaymentStatus, PriceBreakdown,
    ResidentId, RoomId,
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Acquire, PgPool, Postgres, Transaction};
use std::sync::Arc;

/// Input for creating a booking.
#[derive(Clone, Copy, Debug)]
pub struct CreateBooking {
    /// Room to book
    pub room_id: RoomId,
    /// Stay start (inclusive)
    pub check_in: NaiveDate,
    /// Stay end (exclusive)
    pub check_out: NaiveDate,
    /// Party composition
    pub guests: GuestCount,
}

/// Reject any transition out of the terminal `cancelled` state.
///
/// # Errors
///
/// Returns [`Error::Conflict`] when the booking is already cancelled.
pub fn ensure_not_cancelled(status: BookingStatus) -> Result<()> {
    if status == BookingStatus::Cancelled {
        return Err(Error::Conflict("Booking is already cancelled".to_string()));
    }
    Ok(())
}

/// Refunds are only allowed once the payment was captured.
///
/// # Errors
///
/// Returns [`Error::Conflict`] for any payment status other than `Paid`.
pub fn ensure_refundable(payment_status: PaymentStatus) -> Result<()> {
    if payment_status != PaymentStatus::Paid {
        return Err(Error::Conflict("Cannot refund this booking".to_string()));
    }
    Ok(())
}

/// The lifecycle manager. The only code that mutates room inventory.
pub struct BookingLifecycle {
    pool: PgPool,
    surcharge: Arc<dyn SurchargeSource>,
    notifier: Arc<dyn Notifier>,
}

impl BookingLifecycle {
    /// Create a lifecycle manager.
    #[must_use]
    pub fn new(
        pool: PgPool,
        surcharge: Arc<dyn SurchargeSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            pool,
            surcharge,
            notifier,
        }
    }

    /// Create a booking.
    ///
    /// Validates dates and guest counts, runs the resident-overlap and
    /// room-capacity checks, computes the price, and atomically writes the
    /// booking, the occupant entry and the bed counter. A confirmation email
    /// is dispatched best-effort after commit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for bad input, [`Error::NotFound`] for a
    /// missing resident or room, and [`Error::Conflict`] when an overlap or
    /// capacity constraint rejects the booking.
    #[tracing::instrument(skip(self), fields(resident = %resident_id, room = %command.room_id))]
    pub async fn create(&self, resident_id: ResidentId, command: CreateBooking) -> Result<Booking> {
        let today = Utc::now().date_naive();
        let total_nights = availability::validate_stay(command.check_in, command.check_out, today)?;
        command.guests.validate()?;
        let party = command.guests.total();

        // The surcharge lookup runs on its own connection, before the
        // transaction starts, so the room lock is held as briefly as possible.
        let maintenance_charge = self.surcharge.surcharge_for(resident_id).await?;

        let mut tx = self.pool.begin().await?;

        let resident: Option<(String,)> =
            sqlx::query_as("SELECT email FROM residents WHERE id = $1")
                .bind(resident_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        let (resident_email,) =
            resident.ok_or_else(|| Error::not_found("Resident", resident_id))?;

        if availability::resident_overlap_exists(
            &mut *tx,
            resident_id,
            command.check_in,
            command.check_out,
        )
        .await?
        {
            return Err(Error::Conflict(
                "You already have an active booking for this period".to_string(),
            ));
        }

        // Lock the room row: concurrent creates serialize here and the loser
        // re-evaluates against the committed counter.
        let room = lock_room(&mut *tx, command.room_id)
            .await?
            .ok_or_else(|| Error::not_found("Room", command.room_id))?;

        let (occupant_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM room_occupants WHERE room_id = $1")
                .bind(command.room_id.as_uuid())
                .fetch_one(&mut *tx)
                .await?;

        let overlapping = availability::count_overlapping_for_room(
            &mut *tx,
            command.room_id,
            command.check_in,
            command.check_out,
        )
        .await?;

        availability::admit(
            &RoomSnapshot {
                capacity: room.capacity,
                bed_remaining: room.bed_remaining,
                is_available: room.is_available,
                occupant_count,
            },
            overlapping,
            party,
        )?;

        let price =
            pricing::price_booking(room.price, total_nights, &command.guests, maintenance_charge)?;

        let booking_id = BookingId::new();
        let created_at = Utc::now();
        let reference =
            insert_booking(&mut tx, booking_id, resident_id, &command, &price, created_at).await?;

        sqlx::query(
            "INSERT INTO room_occupants (room_id, resident_id, beds)
             VALUES ($1, $2, $3)
             ON CONFLICT (room_id, resident_id)
             DO UPDATE SET beds = room_occupants.beds + EXCLUDED.beds",
        )
        .bind(command.room_id.as_uuid())
        .bind(resident_id.as_uuid())
        .bind(party)
        .execute(&mut *tx)
        .await?;

        // Conditional decrement: the real capacity guard under concurrency.
        let reserved = sqlx::query(
            "UPDATE rooms SET
                 bed_remaining = bed_remaining - $2,
                 is_available = (bed_remaining - $2) > 0,
                 room_status = CASE WHEN (bed_remaining - $2) > 0
                                    THEN 'available' ELSE 'occupied' END,
                 updated_at = NOW()
             WHERE id = $1 AND bed_remaining >= $2",
        )
        .bind(command.room_id.as_uuid())
        .bind(party)
        .execute(&mut *tx)
        .await?;
        if reserved.rows_affected() == 0 {
            return Err(Error::Conflict(
                "Not enough beds remaining for the party size".to_string(),
            ));
        }

        sqlx::query(
            "UPDATE residents SET check_in_date = $2, check_out_date = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(resident_id.as_uuid())
        .bind(command.check_in)
        .bind(command.check_out)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let booking = Booking {
            id: booking_id,
            reference,
            resident_id,
            room_id: command.room_id,
            check_in: command.check_in,
            check_out: command.check_out,
            guests: command.guests,
            price,
            status: BookingStatus::Pending,
            payment: PaymentRecord {
                status: PaymentStatus::Pending,
                capture_id: None,
                amount: None,
                paid_at: None,
            },
            created_at,
        };

        tracing::info!(reference = %booking.reference, total = booking.price.total_price, "booking created");

        send_best_effort(
            self.notifier.clone(),
            EmailMessage {
                to: resident_email,
                subject: format!("Booking Confirmation - {}", booking.reference),
                html: format!(
                    "<h1>Booking Confirmation</h1>\
                     <p>Booking Reference: {}</p>\
                     <p>Total Price: ${:.2}</p>",
                    booking.reference, booking.price.total_price
                ),
                text: format!(
                    "Booking Confirmation\nBooking Reference: {}\nTotal Price: ${:.2}",
                    booking.reference, booking.price.total_price
                ),
                attachment: None,
            },
        );

        Ok(booking)
    }

    /// Confirm a booking after the payment provider reported a successful
    /// capture.
    ///
    /// Flips the payment to paid and the booking to confirmed, points the
    /// resident at the room and re-derives the room flags. Inventory was
    /// already reserved at creation time, so nothing is decremented again;
    /// the occupant entry is re-created only if it went missing.
    ///
    /// Fails closed: the external payment has already succeeded, so a missing
    /// booking, resident or room here is a reconciliation failure, never a
    /// silent drop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reconciliation`] when local records cannot be updated
    /// to match the captured payment.
    #[tracing::instrument(skip(self, capture_id))]
    pub async fn confirm_payment(
        &self,
        booking_id: BookingId,
        capture_id: Option<String>,
        amount: f64,
    ) -> Result<Booking> {
        let mut tx = self.pool.begin().await?;

        let row = lock_booking(&mut *tx, booking_id).await?.ok_or_else(|| {
            Error::Reconciliation(format!(
                "payment captured for unknown booking {booking_id}"
            ))
        })?;
        let mut booking = row.into_domain()?;

        if booking.status == BookingStatus::Cancelled {
            return Err(Error::Reconciliation(format!(
                "payment captured for cancelled booking {}",
                booking.reference
            )));
        }
        if booking.status == BookingStatus::Confirmed {
            // Provider retries land here; the first capture already won.
            return Ok(booking);
        }

        let paid_at = Utc::now();
        sqlx::query(
            "UPDATE bookings SET
                 status = 'confirmed',
                 payment_status = 'paid',
                 payment_capture_id = $2,
                 payment_amount = $3,
                 paid_at = $4,
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(booking_id.as_uuid())
        .bind(&capture_id)
        .bind(amount)
        .bind(paid_at)
        .execute(&mut *tx)
        .await?;

        let resident = sqlx::query(
            "UPDATE residents SET
                 status = 'active',
                 room_id = $2,
                 check_in_date = $3,
                 check_out_date = $4,
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(booking.resident_id.as_uuid())
        .bind(booking.room_id.as_uuid())
        .bind(booking.check_in)
        .bind(booking.check_out)
        .execute(&mut *tx)
        .await?;
        if resident.rows_affected() == 0 {
            return Err(Error::Reconciliation(format!(
                "payment captured for booking {} but resident {} is missing",
                booking.reference, booking.resident_id
            )));
        }

        let room = lock_room(&mut *tx, booking.room_id).await?.ok_or_else(|| {
            Error::Reconciliation(format!(
                "payment captured for booking {} but room {} is missing",
                booking.reference, booking.room_id
            ))
        })?;

        let party = booking.guests.total();
        let occupant = sqlx::query(
            "INSERT INTO room_occupants (room_id, resident_id, beds)
             VALUES ($1, $2, $3)
             ON CONFLICT (room_id, resident_id) DO NOTHING",
        )
        .bind(booking.room_id.as_uuid())
        .bind(booking.resident_id.as_uuid())
        .bind(party)
        .execute(&mut *tx)
        .await?;
        if occupant.rows_affected() > 0 {
            // The creation-time reservation was lost; take the beds now.
            tracing::warn!(
                reference = %booking.reference,
                "occupant entry missing at capture time; re-reserving beds"
            );
            sqlx::query(
                "UPDATE rooms SET bed_remaining = GREATEST(0, bed_remaining - $2)
                 WHERE id = $1",
            )
            .bind(booking.room_id.as_uuid())
            .bind(party)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "UPDATE rooms SET
                 is_available = bed_remaining > 0,
                 room_status = CASE WHEN bed_remaining > 0
                                    THEN 'available' ELSE 'occupied' END,
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(booking.room_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        booking.status = BookingStatus::Confirmed;
        booking.payment = PaymentRecord {
            status: PaymentStatus::Paid,
            capture_id,
            amount: Some(amount),
            paid_at: Some(paid_at),
        };

        tracing::info!(
            reference = %booking.reference,
            room = %room.room_number,
            amount,
            "payment captured, booking confirmed"
        );

        Ok(booking)
    }

    /// Cancel a booking.
    ///
    /// Restores the room's bed counter by the party size, removes the
    /// resident from the occupant list, recomputes availability and clears
    /// the resident's room reference. Cancelling twice is rejected before any
    /// inventory is touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown booking and
    /// [`Error::Conflict`] when it is already cancelled.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, booking_id: BookingId) -> Result<Booking> {
        let mut tx = self.pool.begin().await?;

        let row = lock_booking(&mut *tx, booking_id)
            .await?
            .ok_or_else(|| Error::not_found("Booking", booking_id))?;
        let mut booking = row.into_domain()?;
        ensure_not_cancelled(booking.status)?;

        sqlx::query("UPDATE bookings SET status = 'cancelled', updated_at = NOW() WHERE id = $1")
            .bind(booking_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        release_inventory(
            &mut tx,
            booking.room_id,
            booking.resident_id,
            booking.guests.total(),
        )
        .await?;

        sqlx::query(
            "UPDATE residents SET room_id = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(booking.resident_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        booking.status = BookingStatus::Cancelled;
        tracing::info!(reference = %booking.reference, "booking cancelled");
        Ok(booking)
    }

    /// Record a completed refund: payment becomes refunded, the booking
    /// becomes cancelled and the inventory reversal mirrors [`Self::cancel`].
    /// A booking the resident had already cancelled keeps its released
    /// inventory; only the payment record changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown booking and
    /// [`Error::Conflict`] when the payment was never captured.
    #[tracing::instrument(skip(self))]
    pub async fn complete_refund(&self, booking_id: BookingId) -> Result<Booking> {
        let mut tx = self.pool.begin().await?;

        let row = lock_booking(&mut *tx, booking_id)
            .await?
            .ok_or_else(|| Error::not_found("Booking", booking_id))?;
        let mut booking = row.into_domain()?;
        ensure_refundable(booking.payment.status)?;
        let was_cancelled = booking.status == BookingStatus::Cancelled;

        sqlx::query(
            "UPDATE bookings SET
                 status = 'cancelled',
                 payment_status = 'refunded',
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(booking_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        if !was_cancelled {
            release_inventory(
                &mut tx,
                booking.room_id,
                booking.resident_id,
                booking.guests.total(),
            )
            .await?;

            sqlx::query(
                "UPDATE residents SET room_id = NULL, updated_at = NOW() WHERE id = $1",
            )
            .bind(booking.resident_id.as_uuid())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        booking.status = BookingStatus::Cancelled;
        booking.payment.status = PaymentStatus::Refunded;
        tracing::info!(reference = %booking.reference, "payment refunded, booking cancelled");
        Ok(booking)
    }
}

/// Insert the booking row, regenerating the reference on a unique-index
/// collision. Each attempt runs under a savepoint so a violation does not
/// poison the outer transaction.
async fn insert_booking(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: BookingId,
    resident_id: ResidentId,
    command: &CreateBooking,
    price: &PriceBreakdown,
    created_at: DateTime<Utc>,
) -> Result<String> {
    for _ in 0..MAX_REFERENCE_ATTEMPTS {
        let reference = new_reference();
        let mut savepoint = tx.begin().await?;
        let result = sqlx::query(
            "INSERT INTO bookings
                 (id, reference, resident_id, room_id, check_in, check_out,
                  adults, children, infants_under_2, base_price, total_nights,
                  room_cost, tax, maintenance_charge, total_price,
                  status, payment_status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                     $14, $15, 'pending', 'pending', $16)",
        )
        .bind(booking_id.as_uuid())
        .bind(&reference)
        .bind(resident_id.as_uuid())
        .bind(command.room_id.as_uuid())
        .bind(command.check_in)
        .bind(command.check_out)
        .bind(command.guests.adults)
        .bind(command.guests.children)
        .bind(command.guests.infants_under_2)
        .bind(price.base_price)
        .bind(price.total_nights)
        .bind(price.room_cost)
        .bind(price.tax)
        .bind(price.maintenance_charge)
        .bind(price.total_price)
        .bind(created_at)
        .execute(&mut *savepoint)
        .await;

        match result {
            Ok(_) => {
                savepoint.commit().await?;
                return Ok(reference);
            }
            Err(err) if is_unique_violation(&err) => {
                savepoint.rollback().await?;
                tracing::debug!(%reference, "booking reference collision, regenerating");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(Error::Conflict(
        "could not allocate a unique booking reference".to_string(),
    ))
}

/// Undo a booking's inventory reservation: shrink (or remove) the occupant
/// entry and give the beds back, capped at capacity. A missing occupant entry
/// means the reservation was already reversed, in which case the counter is
/// left untouched.
async fn release_inventory(
    tx: &mut Transaction<'_, Postgres>,
    room_id: RoomId,
    resident_id: ResidentId,
    party: i32,
) -> Result<()> {
    // An entry fully released disappears; a partially released one shrinks.
    let deleted: Option<(i32,)> = sqlx::query_as(
        "DELETE FROM room_occupants
         WHERE room_id = $1 AND resident_id = $2 AND beds <= $3
         RETURNING beds",
    )
    .bind(room_id.as_uuid())
    .bind(resident_id.as_uuid())
    .bind(party)
    .fetch_optional(&mut **tx)
    .await?;

    if deleted.is_none() {
        let shrunk: Option<(i32,)> = sqlx::query_as(
            "UPDATE room_occupants SET beds = beds - $3
             WHERE room_id = $1 AND resident_id = $2
             RETURNING beds",
        )
        .bind(room_id.as_uuid())
        .bind(resident_id.as_uuid())
        .bind(party)
        .fetch_optional(&mut **tx)
        .await?;
        if shrunk.is_none() {
            // Reservation already reversed; leave the counter alone.
            return Ok(());
        }
    }

    sqlx::query(
        "UPDATE rooms SET
             bed_remaining = LEAST(capacity, bed_remaining + $2),
             is_available = LEAST(capacity, bed_remaining + $2) > 0,
             room_status = CASE WHEN LEAST(capacity, bed_remaining + $2) > 0
                                THEN 'available' ELSE 'occupied' END,
             updated_at = NOW()
         WHERE id = $1",
    )
    .bind(room_id.as_uuid())
    .bind(party)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_is_terminal() {
        assert!(ensure_not_cancelled(BookingStatus::Pending).is_ok());
        assert!(ensure_not_cancelled(BookingStatus::Confirmed).is_ok());
        assert!(matches!(
            ensure_not_cancelled(BookingStatus::Cancelled),
            Err(Error::Conflict(_))
        ));
    }

    #[test]
    fn only_captured_payments_are_refundable() {
        assert!(ensure_refundable(PaymentStatus::Paid).is_ok());
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            assert!(matches!(
                ensure_refundable(status),
                Err(Error::Conflict(_))
            ));
        }
    }
}
