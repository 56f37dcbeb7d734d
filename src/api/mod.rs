//! HTTP API endpoints, grouped by resource.

pub mod bookings;
pub mod expenses;
pub mod maintenance;
pub mod payments;
pub mod reports;
pub mod residents;
pub mod revenue;
pub mod rooms;
pub mod staff;

use chrono::NaiveDate;
use serde::Deserialize;

/// Date-range query parameters shared by the reporting endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    /// Range start (inclusive)
    pub start_date: NaiveDate,
    /// Range end (inclusive)
    pub end_date: NaiveDate,
}
