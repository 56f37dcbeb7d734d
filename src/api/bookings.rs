//! Booking endpoints.
//!
//! - `POST /api/booking/create` - create a booking (resident)
//! - `GET /api/booking/:id` - fetch a booking (admin)
//! - `PATCH /api/booking/cancel/:id` - cancel a booking (resident, owner)

use crate::auth::middleware::{RequireAdmin, RequireResident};
use crate::booking::lifecycle::CreateBooking;
use crate::error::AppError;
use crate::server::state::AppState;
use crate::types::{Booking, BookingId, GuestCount, RoomId};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a booking.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Room to book
    pub room_id: Uuid,
    /// Stay start (inclusive)
    pub check_in_date: NaiveDate,
    /// Stay end (exclusive)
    pub check_out_date: NaiveDate,
    /// Party composition
    pub guests: GuestCount,
}

/// Booking summary returned after creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBooking {
    /// Booking id
    pub id: BookingId,
    /// Room booked
    pub room_id: RoomId,
    /// Stay start
    pub check_in_date: NaiveDate,
    /// Stay end
    pub check_out_date: NaiveDate,
    /// Human-readable reference
    pub booking_reference: String,
    /// Total price
    pub total_price: f64,
}

/// Response after creating a booking.
#[derive(Debug, Serialize)]
pub struct CreateBookingResponse {
    /// Human-readable outcome
    pub message: String,
    /// The created booking
    pub booking: CreatedBooking,
}

/// Create a booking for the authenticated resident.
pub async fn create_booking(
    caller: RequireResident,
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let booking = state
        .lifecycle
        .create(
            caller.resident_id,
            CreateBooking {
                room_id: RoomId::from_uuid(request.room_id),
                check_in: request.check_in_date,
                check_out: request.check_out_date,
                guests: request.guests,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            message: "Booking created successfully".to_string(),
            booking: CreatedBooking {
                id: booking.id,
                room_id: booking.room_id,
                check_in_date: booking.check_in,
                check_out_date: booking.check_out,
                booking_reference: booking.reference,
                total_price: booking.price.total_price,
            },
        }),
    ))
}

/// Response wrapping a full booking record.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    /// The booking
    pub booking: Booking,
}

/// Fetch a booking by id (admin).
pub async fn get_booking(
    _caller: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.bookings.get(BookingId::from_uuid(id)).await?;
    Ok(Json(BookingResponse { booking }))
}

/// Response after cancelling a booking.
#[derive(Debug, Serialize)]
pub struct CancelBookingResponse {
    /// Human-readable outcome
    pub message: String,
}

/// Cancel a booking. Only the resident who made it may cancel it.
pub async fn cancel_booking(
    caller: RequireResident,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    let booking_id = BookingId::from_uuid(id);
    let booking = state.bookings.get(booking_id).await?;
    if booking.resident_id != caller.resident_id {
        return Err(AppError::forbidden("Access denied"));
    }

    state.lifecycle.cancel(booking_id).await?;

    Ok(Json(CancelBookingResponse {
        message: "Booking cancelled successfully".to_string(),
    }))
}
