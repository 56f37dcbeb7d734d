//! Staff endpoints.
//!
//! - `GET /api/staff/available` - staff free for an assignment (admin)

use crate::auth::middleware::RequireAdmin;
use crate::error::AppError;
use crate::server::state::AppState;
use crate::types::StaffMember;
use axum::{extract::State, Json};
use serde::Serialize;

/// Response wrapping a staff list.
#[derive(Debug, Serialize)]
pub struct StaffListResponse {
    /// The staff members
    pub data: Vec<StaffMember>,
}

/// List staff members currently free for an assignment.
pub async fn list_available(
    _caller: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<StaffListResponse>, AppError> {
    let data = state.accounts.list_available_staff().await?;
    Ok(Json(StaffListResponse { data }))
}
