//! Expense endpoints.
//!
//! - `POST /api/expense/create` - record an expense (admin)
//! - `GET /api/expense/category` - totals by category in a range (admin)
//! - `GET /api/expense/by-year` - totals by month of a year (admin)

use crate::api::DateRangeQuery;
use crate::auth::middleware::RequireAdmin;
use crate::error::AppError;
use crate::server::state::AppState;
use crate::store::expenses::{CategoryTotal, MonthlyTotal, NewExpense};
use crate::types::Expense;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Request to record an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Expense category
    pub category: String,
    /// Amount spent
    pub amount: f64,
    /// Free-form details
    pub details: String,
    /// Date the expense was incurred
    pub date: NaiveDate,
}

/// Response wrapping one expense.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// Human-readable outcome
    pub message: String,
    /// The expense
    pub data: Expense,
}

/// Record an expense (admin).
pub async fn create_expense(
    _caller: RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<Json<ExpenseResponse>, AppError> {
    if request.category.trim().is_empty() {
        return Err(AppError::bad_request("Invalid or missing category"));
    }
    if !request.amount.is_finite() || request.amount <= 0.0 {
        return Err(AppError::bad_request("Invalid or missing amount"));
    }
    if request.details.trim().is_empty() {
        return Err(AppError::bad_request("Invalid or missing details"));
    }

    let expense = state
        .expenses
        .create(NewExpense {
            date: request.date,
            category: request.category.trim().to_string(),
            amount: request.amount,
            details: Some(request.details.trim().to_string()),
        })
        .await?;

    Ok(Json(ExpenseResponse {
        message: "Expense created successfully".to_string(),
        data: expense,
    }))
}

/// Response with per-category totals.
#[derive(Debug, Serialize)]
pub struct CategoryTotalsResponse {
    /// Human-readable outcome
    pub message: String,
    /// Totals, largest first
    pub data: Vec<CategoryTotal>,
}

/// Totals grouped by category over a date range (admin).
pub async fn totals_by_category(
    _caller: RequireAdmin,
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<CategoryTotalsResponse>, AppError> {
    let data = state
        .expenses
        .totals_by_category(range.start_date, range.end_date)
        .await?;
    Ok(Json(CategoryTotalsResponse {
        message: "Expenses grouped by category and fetched successfully".to_string(),
        data,
    }))
}

/// Year query parameter.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    /// Calendar year
    pub year: i32,
}

/// Response with per-month totals.
#[derive(Debug, Serialize)]
pub struct MonthlyTotalsResponse {
    /// Human-readable outcome
    pub message: String,
    /// Totals in calendar order
    pub expenses: Vec<MonthlyTotal>,
}

/// Totals grouped by month for a year (admin).
pub async fn totals_by_year(
    _caller: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<MonthlyTotalsResponse>, AppError> {
    let expenses = state.expenses.totals_by_month(query.year).await?;
    Ok(Json(MonthlyTotalsResponse {
        message: "Expenses grouped by date successfully".to_string(),
        expenses,
    }))
}
