//! Resident profile endpoints.
//!
//! - `GET /api/resident/profile` - own profile
//! - `PUT /api/resident/profile/edit` - update own profile
//! - `DELETE /api/resident/delete-account` - delete a resident (admin)
//! - `GET /api/resident/get-booking` - own bookings

use crate::auth::middleware::{RequireAdmin, RequireResident};
use crate::auth::validate::{is_valid_email, is_valid_phone};
use crate::error::AppError;
use crate::server::state::AppState;
use crate::store::accounts::UpdateResident;
use crate::types::{Booking, EmergencyContact, Resident, ResidentId};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response wrapping a resident profile.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// Human-readable outcome
    pub message: String,
    /// The profile
    pub data: Resident,
}

/// Fetch the caller's profile.
pub async fn get_profile(
    caller: RequireResident,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, AppError> {
    let resident = state.accounts.get_resident(caller.resident_id).await?;
    Ok(Json(ProfileResponse {
        message: "Resident profile found".to_string(),
        data: resident,
    }))
}

/// Request to update the caller's profile; omitted fields are unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New name
    pub name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// New phone number
    pub phone_number: Option<String>,
    /// New emergency contact
    pub emergency_contact: Option<EmergencyContact>,
    /// New address
    pub address: Option<String>,
}

fn validate_update(request: &UpdateProfileRequest) -> Result<(), AppError> {
    let mut errors: Vec<&str> = Vec::new();

    if request.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        errors.push("Name is required.");
    }
    if request.email.as_deref().is_some_and(|e| !is_valid_email(e)) {
        errors.push("Invalid email format.");
    }
    if request
        .phone_number
        .as_deref()
        .is_some_and(|p| !is_valid_phone(p))
    {
        errors.push("Invalid phone number format.");
    }
    if let Some(contact) = &request.emergency_contact {
        if contact.name.trim().is_empty() {
            errors.push("Emergency contact name is required.");
        }
        if contact.relationship.trim().is_empty() {
            errors.push("Emergency contact relationship is required.");
        }
        if !contact.phone_number.is_empty() && !is_valid_phone(&contact.phone_number) {
            errors.push("Invalid emergency contact phone number.");
        }
    }
    if request
        .address
        .as_deref()
        .is_some_and(|a| a.trim().is_empty())
    {
        errors.push("Address is required.");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::bad_request(errors.join(", ")))
    }
}

/// Update the caller's profile.
pub async fn update_profile(
    caller: RequireResident,
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    validate_update(&request)?;

    let resident = state
        .accounts
        .update_resident(
            caller.resident_id,
            UpdateResident {
                name: request.name,
                email: request.email,
                phone_number: request.phone_number,
                emergency_contact: request.emergency_contact,
                address: request.address,
            },
        )
        .await?;

    Ok(Json(ProfileResponse {
        message: "Resident profile updated successfully".to_string(),
        data: resident,
    }))
}

/// Request naming the resident account to delete.
#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    /// Resident account id
    pub id: Uuid,
}

/// Simple message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}

/// Delete a resident account (admin).
pub async fn delete_account(
    _caller: RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<DeleteAccountRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .accounts
        .delete_resident(ResidentId::from_uuid(request.id))
        .await?;
    Ok(Json(MessageResponse {
        message: "Resident account deleted successfully".to_string(),
    }))
}

/// Response wrapping the caller's bookings.
#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    /// Human-readable outcome
    pub message: String,
    /// The bookings
    pub data: Vec<Booking>,
}

/// List the caller's bookings.
pub async fn get_own_bookings(
    caller: RequireResident,
    State(state): State<AppState>,
) -> Result<Json<BookingListResponse>, AppError> {
    let data = state.bookings.list_for_resident(caller.resident_id).await?;
    Ok(Json(BookingListResponse {
        message: "Bookings found".to_string(),
        data,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn update_with_no_fields_is_valid() {
        let request = UpdateProfileRequest {
            name: None,
            email: None,
            phone_number: None,
            emergency_contact: None,
            address: None,
        };
        assert!(validate_update(&request).is_ok());
    }

    #[test]
    fn bad_email_and_phone_collect_errors() {
        let request = UpdateProfileRequest {
            name: Some("  ".to_string()),
            email: Some("not-an-email".to_string()),
            phone_number: Some("abc".to_string()),
            emergency_contact: None,
            address: None,
        };
        let err = validate_update(&request).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Name is required."));
        assert!(text.contains("Invalid email format."));
        assert!(text.contains("Invalid phone number format."));
    }

    #[test]
    fn empty_address_is_rejected() {
        let request = UpdateProfileRequest {
            name: None,
            email: None,
            phone_number: None,
            emergency_contact: None,
            address: Some(" ".to_string()),
        };
        assert!(validate_update(&request).is_err());
    }
}
