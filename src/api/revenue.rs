//! Revenue endpoint.
//!
//! - `GET /api/revenue/category` - rent/maintenance/tax totals over confirmed,
//!   paid bookings in a date range (admin)

use crate::api::DateRangeQuery;
use crate::auth::middleware::RequireAdmin;
use crate::error::AppError;
use crate::server::state::AppState;
use crate::store::bookings::RevenueSummary;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

/// Response wrapping the revenue totals.
#[derive(Debug, Serialize)]
pub struct RevenueResponse {
    /// Human-readable outcome
    pub message: String,
    /// The totals
    pub data: RevenueSummary,
}

/// Revenue grouped by component over a date range (admin).
pub async fn revenue_by_category(
    _caller: RequireAdmin,
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<RevenueResponse>, AppError> {
    let data = state
        .bookings
        .revenue_summary(range.start_date, range.end_date)
        .await?;
    Ok(Json(RevenueResponse {
        message: "Revenue grouped successfully".to_string(),
        data,
    }))
}
