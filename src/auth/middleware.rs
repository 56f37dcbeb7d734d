//! Authentication middleware.
//!
//! Axum extractors for bearer tokens and for the resolved request identity.
//! The role-specific wrappers (`RequireResident`, `RequireStaff`,
//! `RequireAdmin`) make role enforcement part of a handler's signature.
//!
//! # Usage
//!
//! ```rust,ignore
//! async fn get_profile(
//!     caller: RequireResident,
//!     State(state): State<AppState>,
//! ) -> Result<Json<ProfileResponse>, AppError> {
//!     // caller.resident_id is guaranteed to be an authenticated resident
//! }
//! ```

use crate::error::AppError;
use crate::server::state::AppState;
use crate::types::{ResidentId, Role, StaffId};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Bearer token extracted from the `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                AppError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
            })?
            .to_string();

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token))
    }
}

/// The authenticated caller, resolved once at the authentication boundary and
/// passed down as explicit context.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Account id in its role table
    pub account_id: Uuid,
    /// Account role
    pub role: Role,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;

        let token = Uuid::parse_str(&bearer.0)
            .map_err(|_| AppError::unauthorized("Invalid session token format"))?;

        let (account_id, role) = state
            .sessions
            .validate(token)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::unauthorized("Session expired or invalid"))?;

        // One resolution per role kind; the account table is picked by the
        // role recorded on the session.
        let (name, email) = state
            .accounts
            .identity(role, account_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

        Ok(Self {
            account_id,
            role,
            name,
            email,
        })
    }
}

/// Requires the caller to be an authenticated resident.
#[derive(Debug, Clone)]
pub struct RequireResident {
    /// The caller's resident id
    pub resident_id: ResidentId,
    /// The full identity
    pub identity: Identity,
}

#[async_trait]
impl FromRequestParts<AppState> for RequireResident {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        if identity.role != Role::Resident {
            return Err(AppError::forbidden("Access denied"));
        }
        Ok(Self {
            resident_id: ResidentId::from_uuid(identity.account_id),
            identity,
        })
    }
}

/// Requires the caller to be an authenticated staff member.
#[derive(Debug, Clone)]
pub struct RequireStaff {
    /// The caller's staff id
    pub staff_id: StaffId,
    /// The full identity
    pub identity: Identity,
}

#[async_trait]
impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        if identity.role != Role::Staff {
            return Err(AppError::forbidden("Access denied"));
        }
        Ok(Self {
            staff_id: StaffId::from_uuid(identity.account_id),
            identity,
        })
    }
}

/// Requires the caller to be an authenticated admin.
#[derive(Debug, Clone)]
pub struct RequireAdmin {
    /// The full identity
    pub identity: Identity,
}

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        if identity.role != Role::Admin {
            return Err(AppError::forbidden("Access denied"));
        }
        Ok(Self { identity })
    }
}
