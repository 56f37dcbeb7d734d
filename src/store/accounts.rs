//! Account stores: residents, staff and admins.
//!
//! One table per role kind; the closed role set makes the dispatch an
//! exhaustive `match` rather than a runtime type lookup.

use crate::error::{Error, Result};
use crate::types::{
    EmergencyContact, Resident, ResidentId, ResidentStatus, Role, RoomId, StaffId, StaffMember,
};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Input for registering a resident.
#[derive(Debug)]
pub struct NewResident {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone_number: String,
    /// Pre-hashed password
    pub password_hash: String,
    /// Emergency contact (required for residents)
    pub emergency_contact: EmergencyContact,
    /// Postal address (required for residents)
    pub address: String,
}

/// Input for registering a staff or admin account.
#[derive(Debug)]
pub struct NewAccount {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone_number: String,
    /// Pre-hashed password
    pub password_hash: String,
}

/// Credential record used by the login flow.
#[derive(Debug)]
pub struct Credentials {
    /// Account id in its role table
    pub account_id: Uuid,
    /// Stored password hash
    pub password_hash: String,
    /// Account display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Residency status, for resident accounts only
    pub resident_status: Option<ResidentStatus>,
}

/// Partial update of a resident profile; `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct UpdateResident {
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

#[derive(Debug, sqlx::FromRow)]
struct ResidentRow {
    id: Uuid,
    name: String,
    email: String,
    phone_number: String,
    room_id: Option<Uuid>,
    emergency_name: Option<String>,
    emergency_phone: Option<String>,
    emergency_relationship: Option<String>,
    address: Option<String>,
    status: String,
    check_in_date: Option<NaiveDate>,
    check_out_date: Option<NaiveDate>,
}

const RESIDENT_COLUMNS: &str = "id, name, email, phone_number, room_id, emergency_name, \
     emergency_phone, emergency_relationship, address, status, check_in_date, check_out_date";

impl ResidentRow {
    fn into_domain(self) -> Result<Resident> {
        let status = ResidentStatus::parse(&self.status)
            .ok_or_else(|| Error::Database(format!("unknown resident status '{}'", self.status)))?;
        let emergency_contact = match (
            self.emergency_name,
            self.emergency_phone,
            self.emergency_relationship,
        ) {
            (Some(name), Some(phone_number), Some(relationship)) => Some(EmergencyContact {
                name,
                phone_number,
                relationship,
            }),
            _ => None,
        };
        Ok(Resident {
            id: ResidentId::from_uuid(self.id),
            name: self.name,
            email: self.email,
            phone_number: self.phone_number,
            room_id: self.room_id.map(RoomId::from_uuid),
            emergency_contact,
            address: self.address,
            status,
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
        })
    }
}

/// Repository over the three account tables.
#[derive(Clone)]
pub struct AccountStore {
    pool: PgPool,
}

impl AccountStore {
    /// Create a new account store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a resident.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] when the email is already registered.
    pub async fn create_resident(&self, resident: NewResident) -> Result<ResidentId> {
        let id = ResidentId::new();
        let result = sqlx::query(
            "INSERT INTO residents
                 (id, name, email, phone_number, password_hash, emergency_name,
                  emergency_phone, emergency_relationship, address, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'non_resident')",
        )
        .bind(id.as_uuid())
        .bind(&resident.name)
        .bind(&resident.email)
        .bind(&resident.phone_number)
        .bind(&resident.password_hash)
        .bind(&resident.emergency_contact.name)
        .bind(&resident.emergency_contact.phone_number)
        .bind(&resident.emergency_contact.relationship)
        .bind(&resident.address)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(id),
            Err(err) if crate::booking::reference::is_unique_violation(&err) => {
                Err(Error::Conflict("resident already exists".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Register a staff or admin account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] when the email is already registered, and
    /// [`Error::Validation`] when called with the resident role (residents
    /// carry extra required fields; use [`Self::create_resident`]).
    pub async fn create_account(&self, role: Role, account: NewAccount) -> Result<Uuid> {
        let table = match role {
            Role::Staff => "staff",
            Role::Admin => "admins",
            Role::Resident => {
                return Err(Error::Validation(
                    "resident registration requires emergency contact and address".to_string(),
                ))
            }
        };
        let id = Uuid::new_v4();
        let result = sqlx::query(&format!(
            "INSERT INTO {table} (id, name, email, phone_number, password_hash)
             VALUES ($1, $2, $3, $4, $5)"
        ))
        .bind(id)
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.phone_number)
        .bind(&account.password_hash)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(id),
            Err(err) if crate::booking::reference::is_unique_violation(&err) => Err(
                Error::Conflict(format!("{role} already exists")),
            ),
            Err(err) => Err(err.into()),
        }
    }

    /// Look up login credentials by role and email.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the query fails.
    pub async fn credentials(&self, role: Role, email: &str) -> Result<Option<Credentials>> {
        match role {
            Role::Resident => {
                let row: Option<(Uuid, String, String, String, String)> = sqlx::query_as(
                    "SELECT id, password_hash, name, email, status FROM residents WHERE email = $1",
                )
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
                row.map(|(account_id, password_hash, name, email, status)| {
                    let resident_status = ResidentStatus::parse(&status).ok_or_else(|| {
                        Error::Database(format!("unknown resident status '{status}'"))
                    })?;
                    Ok(Credentials {
                        account_id,
                        password_hash,
                        name,
                        email,
                        resident_status: Some(resident_status),
                    })
                })
                .transpose()
            }
            Role::Staff | Role::Admin => {
                let table = if role == Role::Staff { "staff" } else { "admins" };
                let row: Option<(Uuid, String, String, String)> = sqlx::query_as(&format!(
                    "SELECT id, password_hash, name, email FROM {table} WHERE email = $1"
                ))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
                Ok(row.map(|(account_id, password_hash, name, email)| Credentials {
                    account_id,
                    password_hash,
                    name,
                    email,
                    resident_status: None,
                }))
            }
        }
    }

    /// Resolve the display identity of an account; one resolution per role
    /// kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the query fails.
    pub async fn identity(&self, role: Role, account_id: Uuid) -> Result<Option<(String, String)>> {
        let table = match role {
            Role::Resident => "residents",
            Role::Staff => "staff",
            Role::Admin => "admins",
        };
        let row: Option<(String, String)> =
            sqlx::query_as(&format!("SELECT name, email FROM {table} WHERE id = $1"))
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    /// Replace an account's password hash.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the account does not exist.
    pub async fn set_password(&self, role: Role, account_id: Uuid, hash: &str) -> Result<()> {
        let table = match role {
            Role::Resident => "residents",
            Role::Staff => "staff",
            Role::Admin => "admins",
        };
        let result = sqlx::query(&format!(
            "UPDATE {table} SET password_hash = $2, updated_at = NOW() WHERE id = $1"
        ))
        .bind(account_id)
        .bind(hash)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found("Account", account_id));
        }
        Ok(())
    }

    /// Fetch a resident by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no such resident exists.
    pub async fn get_resident(&self, id: ResidentId) -> Result<Resident> {
        let row: Option<ResidentRow> = sqlx::query_as(&format!(
            "SELECT {RESIDENT_COLUMNS} FROM residents WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| Error::not_found("Resident", id))?
            .into_domain()
    }

    /// Partially update a resident's profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no such resident exists and
    /// [`Error::Conflict`] when the new email is taken.
    pub async fn update_resident(&self, id: ResidentId, update: UpdateResident) -> Result<Resident> {
        let (emergency_name, emergency_phone, emergency_relationship) =
            match update.emergency_contact {
                Some(contact) => (
                    Some(contact.name),
                    Some(contact.phone_number),
                    Some(contact.relationship),
                ),
                None => (None, None, None),
            };
        let result = sqlx::query(
            "UPDATE residents SET
                 name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 phone_number = COALESCE($4, phone_number),
                 emergency_name = COALESCE($5, emergency_name),
                 emergency_phone = COALESCE($6, emergency_phone),
                 emergency_relationship = COALESCE($7, emergency_relationship),
                 address = COALESCE($8, address),
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(update.name)
        .bind(update.email)
        .bind(update.phone_number)
        .bind(emergency_name)
        .bind(emergency_phone)
        .bind(emergency_relationship)
        .bind(update.address)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(Error::not_found("Resident", id)),
            Ok(_) => self.get_resident(id).await,
            Err(err) if crate::booking::reference::is_unique_violation(&err) => {
                Err(Error::Conflict("email already in use".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Delete a resident account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no such resident exists.
    pub async fn delete_resident(&self, id: ResidentId) -> Result<()> {
        let result = sqlx::query("DELETE FROM residents WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found("Resident", id));
        }
        Ok(())
    }

    /// List staff members currently free for an assignment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the query fails.
    pub async fn list_available_staff(&self) -> Result<Vec<StaffMember>> {
        let rows: Vec<(Uuid, String, String, String, bool)> = sqlx::query_as(
            "SELECT id, name, email, phone_number, is_available
             FROM staff WHERE is_available ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name, email, phone_number, is_available)| StaffMember {
                id: StaffId::from_uuid(id),
                name,
                email,
                phone_number,
                is_available,
            })
            .collect())
    }
}
