//! Registration, login and password-reset handlers.

use crate::auth::password::{hash_password, verify_password};
use crate::auth::validate::{is_valid_email, is_valid_password};
use crate::error::AppError;
use crate::gateway::notifier::EmailMessage;
use crate::server::state::AppState;
use crate::store::accounts::{NewAccount, NewResident};
use crate::types::{EmergencyContact, ResidentStatus, Role};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Account role to create
    pub role: Role,
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone_number: String,
    /// Plain-text password (hashed before storage)
    pub password: String,
    /// Emergency contact; required for residents
    pub emergency_contact: Option<EmergencyContact>,
    /// Postal address; required for residents
    pub address: Option<String>,
}

/// Simple message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}

/// Register an account for any of the three roles.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    if !is_valid_email(&request.email) || !is_valid_password(&request.password) {
        return Err(AppError::bad_request("Invalid email or password format"));
    }

    let password_hash = hash_password(&request.password);

    match request.role {
        Role::Resident => {
            let emergency_contact = request
                .emergency_contact
                .filter(|c| {
                    !c.name.trim().is_empty()
                        && !c.phone_number.trim().is_empty()
                        && !c.relationship.trim().is_empty()
                })
                .ok_or_else(|| {
                    AppError::bad_request("Emergency contact details are incomplete")
                })?;
            let address = request
                .address
                .filter(|a| !a.trim().is_empty())
                .ok_or_else(|| AppError::bad_request("Address cannot be empty"))?;

            state
                .accounts
                .create_resident(NewResident {
                    name: request.name,
                    email: request.email,
                    phone_number: request.phone_number,
                    password_hash,
                    emergency_contact,
                    address,
                })
                .await?;
        }
        Role::Staff | Role::Admin => {
            state
                .accounts
                .create_account(
                    request.role,
                    NewAccount {
                        name: request.name,
                        email: request.email,
                        phone_number: request.phone_number,
                        password_hash,
                    },
                )
                .await?;
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("{} registered successfully", request.role),
        }),
    ))
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Role to authenticate against
    pub role: Role,
    /// Email address
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Login response: the bearer token plus account display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Human-readable outcome
    pub message: String,
    /// Opaque bearer token for subsequent requests
    pub token: Uuid,
    /// Authenticated role
    pub role: Role,
    /// Residency status, for resident logins
    pub resident_status: Option<ResidentStatus>,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
}

/// Authenticate and issue a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if !is_valid_email(&request.email) {
        return Err(AppError::bad_request("Invalid email or password format"));
    }

    let credentials = state
        .accounts
        .credentials(request.role, &request.email)
        .await?
        .ok_or_else(|| AppError::bad_request(format!("{} not found", request.role)))?;

    if !verify_password(&request.password, &credentials.password_hash) {
        return Err(AppError::bad_request("Invalid credentials"));
    }

    let token = state
        .sessions
        .create_session(
            credentials.account_id,
            request.role,
            state.config.auth.session_ttl,
        )
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        role: request.role,
        resident_status: credentials.resident_status,
        name: credentials.name,
        email: credentials.email,
    }))
}

/// Forgot-password request body.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Role of the account
    pub role: Role,
    /// Email address on the account
    pub email: String,
}

/// Email a single-use password-reset link.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if !is_valid_email(&request.email) {
        return Err(AppError::bad_request("Invalid email format"));
    }

    let credentials = state
        .accounts
        .credentials(request.role, &request.email)
        .await?
        .ok_or_else(|| AppError::unauthorized(format!("{} is not found", request.role)))?;

    let token = state
        .sessions
        .create_reset_token(
            credentials.account_id,
            request.role,
            state.config.auth.reset_token_ttl,
        )
        .await?;

    let reset_url = format!(
        "{}/reset-password/{}/{}",
        state.config.auth.base_url, credentials.account_id, token
    );

    // The reset email is the operation here, so its failure is surfaced
    // instead of being fire-and-forget.
    state
        .notifier
        .send(EmailMessage {
            to: credentials.email,
            subject: "Password Reset Link".to_string(),
            html: format!(
                "<p>You recently requested to reset the password for your account.</p>\
                 <p><a href=\"{reset_url}\">Reset Password</a></p>\
                 <p>This link is valid for 30 minutes. If you did not request a password \
                 reset, please ignore this email.</p>"
            ),
            text: format!(
                "You recently requested to reset the password for your account.\n\
                 Reset link: {reset_url}\n\
                 This link is valid for 30 minutes."
            ),
            attachment: None,
        })
        .await
        .map_err(|_| {
            AppError::internal("Failed to send password reset email. Please try again later.")
        })?;

    Ok(Json(MessageResponse {
        message: "Email sent successfully".to_string(),
    }))
}

/// Reset-password request body.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    /// The new password
    pub password: String,
}

/// Consume a reset token and replace the account password. All existing
/// sessions of the account are revoked.
pub async fn reset_password(
    State(state): State<AppState>,
    Path((account_id, token)): Path<(Uuid, Uuid)>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if !is_valid_password(&request.password) {
        return Err(AppError::bad_request("Invalid token or password format"));
    }

    let (token_account, role) = state
        .sessions
        .consume_reset_token(token)
        .await?
        .ok_or_else(|| AppError::bad_request("Invalid token or user not found"))?;

    if token_account != account_id {
        return Err(AppError::bad_request("Invalid token or user not found"));
    }

    state
        .accounts
        .set_password(role, account_id, &hash_password(&request.password))
        .await?;
    state.sessions.revoke_for_account(account_id).await?;

    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}
