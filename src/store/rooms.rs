//! Room inventory store (read side and admin creation).

use crate::error::{Error, Result};
use crate::types::{Room, RoomId, RoomStatus, RoomType};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Columns fetched for a room, in [`RoomRow`] order.
pub(crate) const ROOM_COLUMNS: &str = "id, room_number, room_type, price, capacity, \
     bed_remaining, is_available, room_status, description, amenities";

/// Raw room row; statuses arrive as text and are parsed into domain enums.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RoomRow {
    pub id: Uuid,
    pub room_number: String,
    pub room_type: String,
    pub price: f64,
    pub capacity: i32,
    pub bed_remaining: i32,
    pub is_available: bool,
    pub room_status: String,
    pub description: String,
    pub amenities: Vec<String>,
}

impl RoomRow {
    pub(crate) fn into_domain(self) -> Result<Room> {
        let room_type = RoomType::parse(&self.room_type)
            .ok_or_else(|| Error::Database(format!("unknown room type '{}'", self.room_type)))?;
        let room_status = RoomStatus::parse(&self.room_status)
            .ok_or_else(|| Error::Database(format!("unknown room status '{}'", self.room_status)))?;
        Ok(Room {
            id: RoomId::from_uuid(self.id),
            room_number: self.room_number,
            room_type,
            price: self.price,
            capacity: self.capacity,
            bed_remaining: self.bed_remaining,
            is_available: self.is_available,
            room_status,
            description: self.description,
            amenities: self.amenities,
        })
    }
}

/// Input for creating a room.
#[derive(Debug)]
pub struct NewRoom {
    /// Unique room number
    pub room_number: String,
    /// Room category
    pub room_type: RoomType,
    /// Nightly rate
    pub price: f64,
    /// Total beds (1-4)
    pub capacity: i32,
    /// Free-form description
    pub description: String,
    /// Amenities list
    pub amenities: Vec<String>,
}

/// Repository for the `rooms` table.
#[derive(Clone)]
pub struct RoomStore {
    pool: PgPool,
}

impl RoomStore {
    /// Create a new room store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a room. New rooms start fully available with
    /// `bed_remaining == capacity`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] when the room number is taken.
    pub async fn create(&self, room: NewRoom) -> Result<Room> {
        let id = RoomId::new();
        let result = sqlx::query(
            "INSERT INTO rooms
                 (id, room_number, room_type, price, capacity, bed_remaining,
                  is_available, room_status, description, amenities)
             VALUES ($1, $2, $3, $4, $5, $5, TRUE, 'available', $6, $7)",
        )
        .bind(id.as_uuid())
        .bind(&room.room_number)
        .bind(room.room_type.as_str())
        .bind(room.price)
        .bind(room.capacity)
        .bind(&room.description)
        .bind(&room.amenities)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => self.get(id).await,
            Err(err) if crate::booking::reference::is_unique_violation(&err) => Err(
                Error::Conflict("Room number already exists".to_string()),
            ),
            Err(err) => Err(err.into()),
        }
    }

    /// Fetch a room by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no such room exists.
    pub async fn get(&self, id: RoomId) -> Result<Room> {
        let row: Option<RoomRow> =
            sqlx::query_as(&format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;
        row.ok_or_else(|| Error::not_found("Room", id))?.into_domain()
    }

    /// Fetch a room by its room number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no such room exists.
    pub async fn get_by_number(&self, room_number: &str) -> Result<Room> {
        let row: Option<RoomRow> = sqlx::query_as(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE room_number = $1"
        ))
        .bind(room_number)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| Error::not_found("Room", room_number))?
            .into_domain()
    }

    /// List every room, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Room>> {
        let rows: Vec<RoomRow> = sqlx::query_as(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(RoomRow::into_domain).collect()
    }

    /// List rooms currently accepting bookings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the query fails.
    pub async fn list_available(&self) -> Result<Vec<Room>> {
        let rows: Vec<RoomRow> = sqlx::query_as(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE is_available ORDER BY room_number"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(RoomRow::into_domain).collect()
    }
}

/// Lock a room row for update inside a transaction and return it.
///
/// # Errors
///
/// Returns [`Error::Database`] if the query fails.
pub(crate) async fn lock_room<'e>(
    executor: impl PgExecutor<'e>,
    id: RoomId,
) -> Result<Option<RoomRow>> {
    let row: Option<RoomRow> = sqlx::query_as(&format!(
        "SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1 FOR UPDATE"
    ))
    .bind(id.as_uuid())
    .fetch_optional(executor)
    .await?;
    Ok(row)
}
