//! Domain types for the hostel management backend.
//!
//! Value objects, entities and status enums shared by the booking core, the
//! stores and the HTTP layer. Identifier newtypes wrap UUIDs so a room id can
//! never be passed where a booking id is expected.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a room
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(Uuid);

impl RoomId {
    /// Creates a new random `RoomId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `RoomId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a resident account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResidentId(Uuid);

impl ResidentId {
    /// Creates a new random `ResidentId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ResidentId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ResidentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a staff account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffId(Uuid);

impl StaffId {
    /// Creates a new random `StaffId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `StaffId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StaffId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an admin account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminId(Uuid);

impl AdminId {
    /// Creates a new random `AdminId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `AdminId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AdminId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a booking record.
///
/// Distinct from the human-readable booking reference; the id is the primary
/// key, the reference is what shows up in emails and payment orders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a maintenance request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaintenanceRequestId(Uuid);

impl MaintenanceRequestId {
    /// Creates a new random `MaintenanceRequestId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `MaintenanceRequestId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MaintenanceRequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MaintenanceRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an expense record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    /// Creates a new random `ExpenseId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `ExpenseId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Roles
// ============================================================================

/// Account role, the closed set the authentication boundary dispatches on.
///
/// Each role has its own account table; the resolution function for a token is
/// picked once, at authentication time, and the resolved identity is passed
/// down as explicit context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A hostel resident; can book rooms and file maintenance requests
    Resident,
    /// Maintenance staff; resolves assigned requests
    Staff,
    /// Administrator; manages rooms, accounts and reporting
    Admin,
}

impl Role {
    /// Stable string form, used in the database and in tokens.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }

    /// Parse from the stable string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "resident" => Some(Self::Resident),
            "staff" => Some(Self::Staff),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Status enums
// ============================================================================

/// Booking lifecycle status.
///
/// Transitions: `Pending → Confirmed → Cancelled`, `Pending → Cancelled`.
/// `Cancelled` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created, awaiting payment capture
    Pending,
    /// Payment captured
    Confirmed,
    /// Cancelled by the resident or refunded; terminal
    Cancelled,
}

impl BookingStatus {
    /// Stable string form used in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse from the stable string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status of a booking's payment sub-record.
///
/// Correlated with [`BookingStatus`]: `Confirmed` implies `Paid`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// No capture yet
    Pending,
    /// Captured by the payment provider
    Paid,
    /// Capture attempted and rejected
    Failed,
    /// Refunded after capture
    Refunded,
}

impl PaymentStatus {
    /// Stable string form used in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Parse from the stable string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "failed" => Some(Self::Failed),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Room occupancy status, derived from the bed counter after every mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// At least one bed remaining
    Available,
    /// No beds remaining
    Occupied,
}

impl RoomStatus {
    /// Stable string form used in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
        }
    }

    /// Parse from the stable string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(Self::Available),
            "occupied" => Some(Self::Occupied),
            _ => None,
        }
    }

    /// Derive the status from a bed counter.
    #[must_use]
    pub const fn from_beds(bed_remaining: i32) -> Self {
        if bed_remaining > 0 {
            Self::Available
        } else {
            Self::Occupied
        }
    }
}

/// Room category; the name fixes the intended bed count, the `capacity`
/// column is authoritative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    /// One bed
    Single,
    /// Two beds
    Double,
    /// Three beds
    Triple,
    /// Four beds
    Quad,
}

impl RoomType {
    /// Stable string form used in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
            Self::Quad => "quad",
        }
    }

    /// Parse from the stable string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "single" => Some(Self::Single),
            "double" => Some(Self::Double),
            "triple" => Some(Self::Triple),
            "quad" => Some(Self::Quad),
            _ => None,
        }
    }
}

/// Resident account status; flipped to `Active` on payment capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidentStatus {
    /// Currently staying in a room
    Active,
    /// Registered but not checked in
    NonResident,
}

impl ResidentStatus {
    /// Stable string form used in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::NonResident => "non_resident",
        }
    }

    /// Parse from the stable string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "non_resident" => Some(Self::NonResident),
            _ => None,
        }
    }
}

/// Maintenance request priority; fixes the charge billed to the resident.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestPriority {
    /// Minor issue
    Low,
    /// Standard issue
    Medium,
    /// Urgent issue
    High,
}

impl RequestPriority {
    /// Stable string form used in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse from the stable string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Flat charge billed for a request of this priority.
    #[must_use]
    pub const fn charge(self) -> f64 {
        match self {
            Self::Low => 50.0,
            Self::Medium => 100.0,
            Self::High => 150.0,
        }
    }
}

/// Maintenance request workflow status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Filed, not yet assigned
    Pending,
    /// Assigned to a staff member
    InProgress,
    /// Completed
    Resolved,
}

impl RequestStatus {
    /// Stable string form used in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }

    /// Parse from the stable string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

// ============================================================================
// Value objects
// ============================================================================

/// Guest counts of a booking party.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestCount {
    /// Adults (at least one required)
    pub adults: i32,
    /// Children aged two and over
    pub children: i32,
    /// Infants under two
    #[serde(rename = "infantsUnder2")]
    pub infants_under_2: i32,
}

impl GuestCount {
    /// Total party size; the number of beds a booking reserves.
    #[must_use]
    pub const fn total(&self) -> i32 {
        self.adults + self.children + self.infants_under_2
    }

    /// Validate the counts: adults >= 1, children >= 0, infants >= 0.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Validation`] when a count is out of range.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.adults < 1 || self.children < 0 || self.infants_under_2 < 0 {
            return Err(crate::error::Error::Validation(
                "Invalid guest numbers".to_string(),
            ));
        }
        Ok(())
    }
}

/// Price breakdown of a booking, computed once at creation and stored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Nightly rate of the room at booking time
    pub base_price: f64,
    /// Number of nights in the stay
    pub total_nights: i32,
    /// `base_price * total_nights * party size`
    pub room_cost: f64,
    /// 18% of the room cost
    pub tax: f64,
    /// Effective maintenance surcharge applied to the total
    pub maintenance_charge: f64,
    /// `room_cost + tax + maintenance_charge`
    pub total_price: f64,
}

/// Emergency contact details of a resident.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    /// Contact name
    pub name: String,
    /// Contact phone number
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    /// Relationship to the resident
    pub relationship: String,
}

// ============================================================================
// Entities
// ============================================================================

/// A room in the hostel's inventory.
#[derive(Clone, Debug, Serialize)]
pub struct Room {
    /// Room id
    pub id: RoomId,
    /// Unique room number
    pub room_number: String,
    /// Room category
    pub room_type: RoomType,
    /// Nightly rate
    pub price: f64,
    /// Total beds (1-4)
    pub capacity: i32,
    /// Beds not reserved by any active booking
    pub bed_remaining: i32,
    /// Whether the room accepts new bookings
    pub is_available: bool,
    /// Derived occupancy status
    pub room_status: RoomStatus,
    /// Free-form description
    pub description: String,
    /// Amenities list
    pub amenities: Vec<String>,
}

/// A resident account.
#[derive(Clone, Debug, Serialize)]
pub struct Resident {
    /// Resident id
    pub id: ResidentId,
    /// Full name
    pub name: String,
    /// Email address (unique)
    pub email: String,
    /// Phone number
    pub phone_number: String,
    /// Currently assigned room, set on payment capture
    pub room_id: Option<RoomId>,
    /// Emergency contact
    pub emergency_contact: Option<EmergencyContact>,
    /// Postal address
    pub address: Option<String>,
    /// Residency status
    pub status: ResidentStatus,
    /// Current stay check-in date
    pub check_in_date: Option<NaiveDate>,
    /// Current stay check-out date
    pub check_out_date: Option<NaiveDate>,
}

/// A staff account.
#[derive(Clone, Debug, Serialize)]
pub struct StaffMember {
    /// Staff id
    pub id: StaffId,
    /// Full name
    pub name: String,
    /// Email address (unique)
    pub email: String,
    /// Phone number
    pub phone_number: String,
    /// Free for a new maintenance assignment
    pub is_available: bool,
}

/// Payment sub-record of a booking.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaymentRecord {
    /// Payment status
    pub status: PaymentStatus,
    /// Provider capture id, present once paid
    pub capture_id: Option<String>,
    /// Captured amount
    pub amount: Option<f64>,
    /// Capture timestamp
    pub paid_at: Option<DateTime<Utc>>,
}

/// A booking in the ledger.
#[derive(Clone, Debug, Serialize)]
pub struct Booking {
    /// Booking id (primary key)
    pub id: BookingId,
    /// Human-readable unique reference
    pub reference: String,
    /// Resident who booked
    pub resident_id: ResidentId,
    /// Room booked
    pub room_id: RoomId,
    /// Stay start (inclusive)
    pub check_in: NaiveDate,
    /// Stay end (exclusive)
    pub check_out: NaiveDate,
    /// Party composition
    pub guests: GuestCount,
    /// Price breakdown computed at creation
    pub price: PriceBreakdown,
    /// Lifecycle status
    pub status: BookingStatus,
    /// Payment sub-record
    pub payment: PaymentRecord,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A maintenance request filed by a resident.
#[derive(Clone, Debug, Serialize)]
pub struct MaintenanceRequest {
    /// Request id
    pub id: MaintenanceRequestId,
    /// Resident who filed the request
    pub resident_id: ResidentId,
    /// Room concerned
    pub room_id: RoomId,
    /// Short issue title
    pub issue_title: String,
    /// Issue description
    pub issue_description: String,
    /// Priority, fixes the charge
    pub priority: RequestPriority,
    /// Charge billed for the repair
    pub charge: f64,
    /// Workflow status
    pub status: RequestStatus,
    /// Assigned staff member, if any
    pub assigned_to: Option<StaffId>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// An operating expense record.
#[derive(Clone, Debug, Serialize)]
pub struct Expense {
    /// Expense id
    pub id: ExpenseId,
    /// Date the expense was incurred
    pub date: NaiveDate,
    /// Expense category
    pub category: String,
    /// Amount spent
    pub amount: f64,
    /// Free-form details
    pub details: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_string_form() {
        for role in [Role::Resident, Role::Staff, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn booking_status_round_trips() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn payment_status_round_trips() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn room_status_derives_from_bed_counter() {
        assert_eq!(RoomStatus::from_beds(2), RoomStatus::Available);
        assert_eq!(RoomStatus::from_beds(0), RoomStatus::Occupied);
    }

    #[test]
    fn guest_count_requires_at_least_one_adult() {
        let guests = GuestCount {
            adults: 0,
            children: 1,
            infants_under_2: 0,
        };
        assert!(guests.validate().is_err());

        let guests = GuestCount {
            adults: 2,
            children: 0,
            infants_under_2: 1,
        };
        assert!(guests.validate().is_ok());
        assert_eq!(guests.total(), 3);
    }

    #[test]
    fn guest_count_rejects_negative_counts() {
        let guests = GuestCount {
            adults: 1,
            children: -1,
            infants_under_2: 0,
        };
        assert!(guests.validate().is_err());
    }

    #[test]
    fn priority_fixes_charge() {
        assert!((RequestPriority::Low.charge() - 50.0).abs() < f64::EPSILON);
        assert!((RequestPriority::Medium.charge() - 100.0).abs() < f64::EPSILON);
        assert!((RequestPriority::High.charge() - 150.0).abs() < f64::EPSILON);
    }
}
