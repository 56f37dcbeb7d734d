//! Booking ledger store (read side).
//!
//! Writes go through [`crate::booking::lifecycle::BookingLifecycle`].

use crate::error::{Error, Result};
use crate::types::{
    Booking, BookingId, BookingStatus, GuestCount, PaymentRecord, PaymentStatus, PriceBreakdown,
    ResidentId, RoomId,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Columns fetched for a booking, in [`BookingRow`] order.
pub(crate) const BOOKING_COLUMNS: &str = "id, reference, resident_id, room_id, check_in, check_out, \
     adults, children, infants_under_2, base_price, total_nights, room_cost, tax, \
     maintenance_charge, total_price, status, payment_status, payment_capture_id, \
     payment_amount, paid_at, created_at";

/// Raw booking row; statuses arrive as text and are parsed into domain enums.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub reference: String,
    pub resident_id: Uuid,
    pub room_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: i32,
    pub children: i32,
    pub infants_under_2: i32,
    pub base_price: f64,
    pub total_nights: i32,
    pub room_cost: f64,
    pub tax: f64,
    pub maintenance_charge: f64,
    pub total_price: f64,
    pub status: String,
    pub payment_status: String,
    pub payment_capture_id: Option<String>,
    pub payment_amount: Option<f64>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl BookingRow {
    pub(crate) fn into_domain(self) -> Result<Booking> {
        let status = BookingStatus::parse(&self.status)
            .ok_or_else(|| Error::Database(format!("unknown booking status '{}'", self.status)))?;
        let payment_status = PaymentStatus::parse(&self.payment_status).ok_or_else(|| {
            Error::Database(format!("unknown payment status '{}'", self.payment_status))
        })?;
        Ok(Booking {
            id: BookingId::from_uuid(self.id),
            reference: self.reference,
            resident_id: ResidentId::from_uuid(self.resident_id),
            room_id: RoomId::from_uuid(self.room_id),
            check_in: self.check_in,
            check_out: self.check_out,
            guests: GuestCount {
                adults: self.adults,
                children: self.children,
                infants_under_2: self.infants_under_2,
            },
            price: PriceBreakdown {
                base_price: self.base_price,
                total_nights: self.total_nights,
                room_cost: self.room_cost,
                tax: self.tax,
                maintenance_charge: self.maintenance_charge,
                total_price: self.total_price,
            },
            status,
            payment: PaymentRecord {
                status: payment_status,
                capture_id: self.payment_capture_id,
                amount: self.payment_amount,
                paid_at: self.paid_at,
            },
            created_at: self.created_at,
        })
    }
}

/// Revenue totals over confirmed, paid bookings in a date range.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    /// Sum of nightly base prices
    pub total_rent: f64,
    /// Sum of maintenance surcharges
    pub total_maintenance_charge: f64,
    /// Sum of taxes
    pub total_tax: f64,
    /// `total_rent + total_maintenance_charge + total_tax`
    pub total_revenue: f64,
}

/// Repository for the `bookings` table.
#[derive(Clone)]
pub struct BookingStore {
    pool: PgPool,
}

impl BookingStore {
    /// Create a new booking store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a booking by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no such booking exists.
    pub async fn get(&self, id: BookingId) -> Result<Booking> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| Error::not_found("Booking", id))?
            .into_domain()
    }

    /// List a resident's bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the query fails.
    pub async fn list_for_resident(&self, resident_id: ResidentId) -> Result<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings
             WHERE resident_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(resident_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(BookingRow::into_domain).collect()
    }

    /// Revenue totals over confirmed, paid bookings whose check-in falls in
    /// the given range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the query fails.
    pub async fn revenue_summary(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RevenueSummary> {
        let row: (Option<f64>, Option<f64>, Option<f64>) = sqlx::query_as(
            "SELECT SUM(base_price), SUM(maintenance_charge), SUM(tax)
             FROM bookings
             WHERE status = 'confirmed'
               AND payment_status = 'paid'
               AND check_in >= $1
               AND check_out <= $2",
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;

        let total_rent = row.0.unwrap_or(0.0);
        let total_maintenance_charge = row.1.unwrap_or(0.0);
        let total_tax = row.2.unwrap_or(0.0);
        Ok(RevenueSummary {
            total_rent,
            total_maintenance_charge,
            total_tax,
            total_revenue: total_rent + total_maintenance_charge + total_tax,
        })
    }
}

/// Lock a booking row for update inside a transaction and return it.
///
/// # Errors
///
/// Returns [`Error::Database`] if the query fails.
pub(crate) async fn lock_booking<'e>(
    executor: impl PgExecutor<'e>,
    id: BookingId,
) -> Result<Option<BookingRow>> {
    let row: Option<BookingRow> = sqlx::query_as(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
    ))
    .bind(id.as_uuid())
    .fetch_optional(executor)
    .await?;
    Ok(row)
}
