//! Downloadable report endpoints (admin).
//!
//! - `GET /api/download-report/expense` - expense report artifact
//! - `GET /api/download-report/revenue` - revenue report artifact

use crate::api::DateRangeQuery;
use crate::auth::middleware::RequireAdmin;
use crate::error::AppError;
use crate::gateway::reports::{expense_report_csv, revenue_report_csv};
use crate::server::state::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

fn csv_download(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Download the expense report for a date range.
pub async fn download_expense_report(
    _caller: RequireAdmin,
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Response, AppError> {
    let expenses = state
        .expenses
        .list_range(range.start_date, range.end_date)
        .await?;
    Ok(csv_download(
        "expense-report.csv",
        expense_report_csv(&expenses),
    ))
}

/// Download the revenue report for a date range.
pub async fn download_revenue_report(
    _caller: RequireAdmin,
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Response, AppError> {
    let summary = state
        .bookings
        .revenue_summary(range.start_date, range.end_date)
        .await?;
    Ok(csv_download(
        "revenue-report.csv",
        revenue_report_csv(&summary),
    ))
}
