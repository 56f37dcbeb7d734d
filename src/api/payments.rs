//! Payment endpoints.
//!
//! - `POST /api/payment/create-order` - create a provider order for a booking
//! - `GET /api/payment/capture-payment/:order_id?bookingId=` - capture and
//!   confirm; the caller here is a browser redirect target, so a rejected
//!   capture redirects to the failure page instead of returning JSON
//! - `POST /api/payment/refund-payment` - refund a paid booking

use crate::auth::middleware::Identity;
use crate::booking::lifecycle::ensure_refundable;
use crate::error::AppError;
use crate::gateway::notifier::{send_best_effort, EmailAttachment, EmailMessage};
use crate::server::state::AppState;
use crate::types::{BookingId, BookingStatus};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a payment order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Booking to pay for
    pub booking_id: Uuid,
}

/// Response after creating a payment order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// Human-readable outcome
    pub message: String,
    /// Provider order id
    pub order_id: String,
}

/// Create a provider order for a booking's total price.
pub async fn create_order(
    _caller: Identity,
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    let booking = state
        .bookings
        .get(BookingId::from_uuid(request.booking_id))
        .await?;

    if booking.status == BookingStatus::Cancelled {
        return Err(AppError::conflict("Booking is already cancelled"));
    }

    let order_id = state
        .payments
        .create_order(booking.price.total_price, &booking.reference)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            message: "Payment order created successfully".to_string(),
            order_id,
        }),
    ))
}

/// Query parameters of the capture callback.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureQuery {
    /// Booking the order was created for
    pub booking_id: Uuid,
}

/// Response after a successful capture.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResponse {
    /// Human-readable outcome
    pub message: String,
    /// Booking status after the capture
    pub booking_status: BookingStatus,
}

/// Capture an approved order and confirm the booking.
///
/// A capture the provider rejects leaves the booking untouched and redirects
/// the browser to the failure page. A capture that succeeds but cannot be
/// reconciled locally is surfaced as a 500 with a distinct log entry.
pub async fn capture_payment(
    _caller: Identity,
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Query(query): Query<CaptureQuery>,
) -> Result<Response, AppError> {
    let booking_id = BookingId::from_uuid(query.booking_id);

    let outcome = state.payments.capture_order(&order_id).await?;
    if !outcome.completed {
        tracing::warn!(
            %order_id,
            status = %outcome.status,
            "payment capture was not successful, redirecting to failure page"
        );
        return Ok(Redirect::temporary(&state.config.paypal.failure_redirect).into_response());
    }

    // Funds are captured from here on: every local failure is a
    // reconciliation error, surfaced by the lifecycle manager.
    let booking = state.bookings.get(booking_id).await.map_err(|_| {
        crate::error::Error::Reconciliation(format!(
            "payment captured for unknown booking {booking_id}"
        ))
    })?;

    let confirmed = state
        .lifecycle
        .confirm_payment(booking_id, outcome.capture_id, booking.price.total_price)
        .await?;

    // Receipt generation and email are best-effort; the capture stands
    // regardless.
    if let Ok(resident) = state.accounts.get_resident(confirmed.resident_id).await {
        let receipt = state.receipts.render(&confirmed);
        send_best_effort(
            state.notifier.clone(),
            EmailMessage {
                to: resident.email,
                subject: format!("Payment Received - Booking {}", confirmed.reference),
                html: format!(
                    "<h1>Payment Confirmation</h1><p>Booking Reference: {}</p>",
                    confirmed.reference
                ),
                text: format!(
                    "Payment Confirmation\nBooking Reference: {}",
                    confirmed.reference
                ),
                attachment: Some(EmailAttachment {
                    filename: format!("{}.txt", confirmed.id),
                    content_type: "text/plain".to_string(),
                    bytes: receipt,
                }),
            },
        );
    }

    Ok(Json(CaptureResponse {
        message: "Payment successful, receipt sent via email".to_string(),
        booking_status: confirmed.status,
    })
    .into_response())
}

/// Request to refund a booking's payment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    /// Booking to refund
    pub booking_id: Uuid,
}

/// Response after a refund.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundResponse {
    /// Human-readable outcome
    pub message: String,
    /// Provider refund id
    pub refund_id: String,
}

/// Refund a captured payment and cancel the booking, reversing its inventory
/// reservation.
pub async fn refund_payment(
    _caller: Identity,
    State(state): State<AppState>,
    Json(request): Json<RefundRequest>,
) -> Result<Json<RefundResponse>, AppError> {
    let booking_id = BookingId::from_uuid(request.booking_id);
    let booking = state.bookings.get(booking_id).await?;
    ensure_refundable(booking.payment.status)?;

    let capture_id = booking
        .payment
        .capture_id
        .ok_or_else(|| AppError::conflict("Cannot refund this booking"))?;
    let amount = booking.payment.amount.unwrap_or(booking.price.total_price);

    let refund_id = state.payments.refund(&capture_id, amount).await?;
    state.lifecycle.complete_refund(booking_id).await?;

    Ok(Json(RefundResponse {
        message: "Refund processed successfully".to_string(),
        refund_id,
    }))
}
