//! Maintenance request store.
//!
//! Also the production [`SurchargeSource`]: the charge on a resident's most
//! recent ticket feeds the booking price calculator.

use crate::booking::pricing::SurchargeSource;
use crate::error::{Error, Result};
use crate::types::{
    MaintenanceRequest, MaintenanceRequestId, RequestPriority, RequestStatus, ResidentId, RoomId,
    StaffId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const REQUEST_COLUMNS: &str = "id, resident_id, room_id, issue_title, issue_description, \
     priority, charge, status, assigned_to, created_at";

#[derive(Debug, sqlx::FromRow)]
struct RequestRow {
    id: Uuid,
    resident_id: Uuid,
    room_id: Uuid,
    issue_title: String,
    issue_description: String,
    priority: String,
    charge: f64,
    status: String,
    assigned_to: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl RequestRow {
    fn into_domain(self) -> Result<MaintenanceRequest> {
        let priority = RequestPriority::parse(&self.priority)
            .ok_or_else(|| Error::Database(format!("unknown priority '{}'", self.priority)))?;
        let status = RequestStatus::parse(&self.status)
            .ok_or_else(|| Error::Database(format!("unknown request status '{}'", self.status)))?;
        Ok(MaintenanceRequest {
            id: MaintenanceRequestId::from_uuid(self.id),
            resident_id: ResidentId::from_uuid(self.resident_id),
            room_id: RoomId::from_uuid(self.room_id),
            issue_title: self.issue_title,
            issue_description: self.issue_description,
            priority,
            charge: self.charge,
            status,
            assigned_to: self.assigned_to.map(StaffId::from_uuid),
            created_at: self.created_at,
        })
    }
}

/// Input for filing a maintenance request.
#[derive(Debug)]
pub struct NewRequest {
    /// Resident filing the request
    pub resident_id: ResidentId,
    /// Room concerned
    pub room_id: RoomId,
    /// Short issue title
    pub issue_title: String,
    /// Issue description
    pub issue_description: String,
    /// Priority; fixes the charge
    pub priority: RequestPriority,
}

/// Repository for the `maintenance_requests` table.
#[derive(Clone)]
pub struct MaintenanceStore {
    pool: PgPool,
}

impl MaintenanceStore {
    /// Create a new maintenance store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// File a new request; the charge is derived from the priority.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the insert fails.
    pub async fn create(&self, request: NewRequest) -> Result<MaintenanceRequest> {
        let id = MaintenanceRequestId::new();
        sqlx::query(
            "INSERT INTO maintenance_requests
                 (id, resident_id, room_id, issue_title, issue_description,
                  priority, charge, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending')",
        )
        .bind(id.as_uuid())
        .bind(request.resident_id.as_uuid())
        .bind(request.room_id.as_uuid())
        .bind(&request.issue_title)
        .bind(&request.issue_description)
        .bind(request.priority.as_str())
        .bind(request.priority.charge())
        .execute(&self.pool)
        .await?;
        self.get(id).await
    }

    /// Fetch a request by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no such request exists.
    pub async fn get(&self, id: MaintenanceRequestId) -> Result<MaintenanceRequest> {
        let row: Option<RequestRow> = sqlx::query_as(&format!(
            "SELECT {REQUEST_COLUMNS} FROM maintenance_requests WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| Error::not_found("Maintenance request", id))?
            .into_domain()
    }

    /// List pending requests, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the query fails.
    pub async fn list_pending(&self) -> Result<Vec<MaintenanceRequest>> {
        let rows: Vec<RequestRow> = sqlx::query_as(&format!(
            "SELECT {REQUEST_COLUMNS} FROM maintenance_requests
             WHERE status = 'pending' ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(RequestRow::into_domain).collect()
    }

    /// List in-progress requests assigned to a staff member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the query fails.
    pub async fn list_for_staff(&self, staff_id: StaffId) -> Result<Vec<MaintenanceRequest>> {
        let rows: Vec<RequestRow> = sqlx::query_as(&format!(
            "SELECT {REQUEST_COLUMNS} FROM maintenance_requests
             WHERE assigned_to = $1 AND status = 'in_progress'
             ORDER BY created_at"
        ))
        .bind(staff_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(RequestRow::into_domain).collect()
    }

    /// Assign a staff member: request moves to in-progress, staff becomes
    /// unavailable. Both writes commit together.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the request or staff member is
    /// missing.
    pub async fn assign(
        &self,
        request_id: MaintenanceRequestId,
        staff_id: StaffId,
    ) -> Result<MaintenanceRequest> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE maintenance_requests
             SET assigned_to = $2, status = 'in_progress', updated_at = NOW()
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(request_id.as_uuid())
        .bind(staff_id.as_uuid())
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::not_found("Maintenance request", request_id));
        }

        let staff = sqlx::query(
            "UPDATE staff SET is_available = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(staff_id.as_uuid())
        .execute(&mut *tx)
        .await?;
        if staff.rows_affected() == 0 {
            return Err(Error::not_found("Staff", staff_id));
        }

        tx.commit().await?;
        self.get(request_id).await
    }

    /// Resolve a request: request moves to resolved, staff becomes available
    /// again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] when the request is already resolved and
    /// [`Error::NotFound`] when it does not exist.
    pub async fn resolve(
        &self,
        request_id: MaintenanceRequestId,
        staff_id: StaffId,
    ) -> Result<MaintenanceRequest> {
        let request = self.get(request_id).await?;
        if request.status == RequestStatus::Resolved {
            return Err(Error::Conflict("Request is already resolved".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "UPDATE maintenance_requests
             SET status = 'resolved', updated_at = NOW()
             WHERE id = $1",
        )
        .bind(request_id.as_uuid())
        .execute(&mut *tx)
        .await?;
        sqlx::query("UPDATE staff SET is_available = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(staff_id.as_uuid())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.get(request_id).await
    }

    /// Charge on the resident's most recent ticket, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the query fails.
    pub async fn latest_charge(&self, resident_id: ResidentId) -> Result<Option<f64>> {
        let row: Option<(f64,)> = sqlx::query_as(
            "SELECT charge FROM maintenance_requests
             WHERE resident_id = $1
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(resident_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(charge,)| charge))
    }
}

#[async_trait]
impl SurchargeSource for MaintenanceStore {
    async fn surcharge_for(&self, resident_id: ResidentId) -> Result<Option<f64>> {
        self.latest_charge(resident_id).await
    }
}
