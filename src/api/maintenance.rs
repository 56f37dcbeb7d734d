//! Maintenance request endpoints.
//!
//! - `POST /api/maintenance-request/create` - file a request (resident)
//! - `GET /api/maintenance-request/pending` - pending requests (admin)
//! - `PATCH /api/maintenance-request/assign-staff/:id` - assign staff (admin)
//! - `PATCH /api/maintenance-request/resolve/:id` - resolve (staff)
//! - `GET /api/maintenance-request/assigned` - caller's assignments (staff)

use crate::auth::middleware::{RequireAdmin, RequireResident, RequireStaff};
use crate::error::AppError;
use crate::gateway::notifier::{send_best_effort, EmailMessage};
use crate::server::state::AppState;
use crate::store::maintenance::NewRequest;
use crate::types::{MaintenanceRequest, MaintenanceRequestId, RequestPriority, StaffId};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to file a maintenance issue.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    /// Room number the issue concerns
    pub room_number: String,
    /// Short issue title
    pub issue_title: String,
    /// Issue description
    pub issue_description: String,
    /// Priority; fixes the charge
    pub priority: RequestPriority,
}

/// Response wrapping one maintenance request.
#[derive(Debug, Serialize)]
pub struct RequestResponse {
    /// Human-readable outcome
    pub message: String,
    /// The request
    pub data: MaintenanceRequest,
}

/// Response wrapping a request list.
#[derive(Debug, Serialize)]
pub struct RequestListResponse {
    /// Human-readable outcome
    pub message: String,
    /// The requests
    pub data: Vec<MaintenanceRequest>,
}

fn status_update_email(
    to: String,
    issue: &str,
    priority: RequestPriority,
    status: &str,
) -> EmailMessage {
    let priority = priority.as_str();
    EmailMessage {
        to,
        subject: "Maintenance Request Update".to_string(),
        html: format!(
            "<h2>Maintenance Request Update</h2>\
             <p>Issue: {issue}</p><p>Priority: {priority}</p><p>Status: {status}</p>"
        ),
        text: format!(
            "Maintenance Request Update\nIssue: {issue}\nPriority: {priority}\nStatus: {status}"
        ),
        attachment: None,
    }
}

/// File a maintenance request for the caller's room.
pub async fn create_request(
    caller: RequireResident,
    State(state): State<AppState>,
    Json(request): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<RequestResponse>), AppError> {
    if request.room_number.trim().is_empty()
        || request.issue_title.trim().is_empty()
        || request.issue_description.trim().is_empty()
    {
        return Err(AppError::bad_request(
            "roomNumber, issueTitle, issueDescription, and priority are required",
        ));
    }

    let resident = state.accounts.get_resident(caller.resident_id).await?;
    let room = state.rooms.get_by_number(&request.room_number).await?;

    // Residents may only file against the room they are assigned to.
    if resident.room_id != Some(room.id) {
        return Err(AppError::forbidden(
            "This room is not associated with the current resident",
        ));
    }

    let created = state
        .maintenance
        .create(NewRequest {
            resident_id: caller.resident_id,
            room_id: room.id,
            issue_title: request.issue_title,
            issue_description: request.issue_description.clone(),
            priority: request.priority,
        })
        .await?;

    send_best_effort(
        state.notifier.clone(),
        status_update_email(
            resident.email,
            &request.issue_description,
            request.priority,
            "Pending",
        ),
    );

    Ok((
        StatusCode::CREATED,
        Json(RequestResponse {
            message: "Maintenance request created successfully".to_string(),
            data: created,
        }),
    ))
}

/// List pending requests (admin).
pub async fn list_pending(
    _caller: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<RequestListResponse>, AppError> {
    let data = state.maintenance.list_pending().await?;
    Ok(Json(RequestListResponse {
        message: "Maintenance requests fetched successfully".to_string(),
        data,
    }))
}

/// Request naming the staff member to assign.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignStaffRequest {
    /// Staff member to assign
    pub staff_id: Uuid,
}

/// Assign a staff member to a pending request (admin).
pub async fn assign_staff(
    _caller: RequireAdmin,
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<AssignStaffRequest>,
) -> Result<Json<RequestResponse>, AppError> {
    let assigned = state
        .maintenance
        .assign(
            MaintenanceRequestId::from_uuid(request_id),
            StaffId::from_uuid(body.staff_id),
        )
        .await?;

    if let Ok(resident) = state.accounts.get_resident(assigned.resident_id).await {
        send_best_effort(
            state.notifier.clone(),
            status_update_email(
                resident.email,
                &assigned.issue_description,
                assigned.priority,
                "In Progress",
            ),
        );
    }

    Ok(Json(RequestResponse {
        message: "Staff assigned successfully".to_string(),
        data: assigned,
    }))
}

/// Resolve a request assigned to the caller (staff).
pub async fn resolve_request(
    caller: RequireStaff,
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<RequestResponse>, AppError> {
    let resolved = state
        .maintenance
        .resolve(MaintenanceRequestId::from_uuid(request_id), caller.staff_id)
        .await?;

    if let Ok(resident) = state.accounts.get_resident(resolved.resident_id).await {
        send_best_effort(
            state.notifier.clone(),
            status_update_email(
                resident.email,
                &resolved.issue_description,
                resolved.priority,
                "Resolved",
            ),
        );
    }

    Ok(Json(RequestResponse {
        message: "Maintenance request resolved successfully".to_string(),
        data: resolved,
    }))
}

/// List in-progress requests assigned to the caller (staff).
pub async fn list_assigned(
    caller: RequireStaff,
    State(state): State<AppState>,
) -> Result<Json<RequestListResponse>, AppError> {
    let data = state.maintenance.list_for_staff(caller.staff_id).await?;
    Ok(Json(RequestListResponse {
        message: "Requests fetched successfully".to_string(),
        data,
    }))
}
