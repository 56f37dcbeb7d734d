//! Expense store and its reporting aggregations.

use crate::error::{Error, Result};
use crate::types::{Expense, ExpenseId};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Input for recording an expense.
#[derive(Debug)]
pub struct NewExpense {
    /// Date the expense was incurred
    pub date: NaiveDate,
    /// Expense category
    pub category: String,
    /// Amount spent
    pub amount: f64,
    /// Free-form details
    pub details: Option<String>,
}

/// Per-category expense totals over a date range.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// Category name
    pub category: String,
    /// Sum of amounts in the category
    pub total_amount: f64,
    /// Number of expenses in the category
    pub count: i64,
}

/// Per-month expense totals within a year.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    /// Month in `YYYY-MM` form
    pub month: String,
    /// Sum of amounts in the month
    pub total_amount: f64,
    /// Number of expenses in the month
    pub count: i64,
}

/// Repository for the `expenses` table.
#[derive(Clone)]
pub struct ExpenseStore {
    pool: PgPool,
}

impl ExpenseStore {
    /// Create a new expense store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an expense.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the insert fails.
    pub async fn create(&self, expense: NewExpense) -> Result<Expense> {
        let id = ExpenseId::new();
        sqlx::query(
            "INSERT INTO expenses (id, date, category, amount, details)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id.as_uuid())
        .bind(expense.date)
        .bind(&expense.category)
        .bind(expense.amount)
        .bind(&expense.details)
        .execute(&self.pool)
        .await?;

        Ok(Expense {
            id,
            date: expense.date,
            category: expense.category,
            amount: expense.amount,
            details: expense.details,
        })
    }

    /// Expenses in a date range, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the query fails.
    pub async fn list_range(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<Vec<Expense>> {
        let rows: Vec<(Uuid, NaiveDate, String, f64, Option<String>)> = sqlx::query_as(
            "SELECT id, date, category, amount, details FROM expenses
             WHERE date >= $1 AND date <= $2
             ORDER BY date",
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, date, category, amount, details)| Expense {
                id: ExpenseId::from_uuid(id),
                date,
                category,
                amount,
                details,
            })
            .collect())
    }

    /// Totals grouped by category over a date range, largest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the query fails.
    pub async fn totals_by_category(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<CategoryTotal>> {
        let rows: Vec<(String, f64, i64)> = sqlx::query_as(
            "SELECT category, SUM(amount), COUNT(*)
             FROM expenses
             WHERE date >= $1 AND date <= $2
             GROUP BY category
             ORDER BY SUM(amount) DESC",
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(category, total_amount, count)| CategoryTotal {
                category,
                total_amount,
                count,
            })
            .collect())
    }

    /// Totals grouped by month for a year, in calendar order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an unrepresentable year and
    /// [`Error::Database`] if the query fails.
    pub async fn totals_by_month(&self, year: i32) -> Result<Vec<MonthlyTotal>> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| Error::Validation("Year is out of range".to_string()))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| Error::Validation("Year is out of range".to_string()))?;

        let rows: Vec<(String, f64, i64)> = sqlx::query_as(
            "SELECT TO_CHAR(date, 'YYYY-MM'), SUM(amount), COUNT(*)
             FROM expenses
             WHERE date >= $1 AND date <= $2
             GROUP BY TO_CHAR(date, 'YYYY-MM')
             ORDER BY TO_CHAR(date, 'YYYY-MM')",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(month, total_amount, count)| MonthlyTotal {
                month,
                total_amount,
                count,
            })
            .collect())
    }
}
