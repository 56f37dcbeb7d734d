//! Room endpoints.
//!
//! - `POST /api/room/create` - create a room (admin)
//! - `GET /api/room/all` - list all rooms (admin)
//! - `GET /api/room/available` - list available rooms
//! - `GET /api/room/:room_number` - fetch a room by number

use crate::auth::middleware::{Identity, RequireAdmin};
use crate::error::AppError;
use crate::server::state::AppState;
use crate::store::rooms::NewRoom;
use crate::types::{Room, RoomType};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

/// Request to create a room.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    /// Unique room number
    pub room_number: String,
    /// Room category
    pub room_type: RoomType,
    /// Nightly rate
    pub price: f64,
    /// Total beds (1-4)
    pub capacity: i32,
    /// Amenities list
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Free-form description
    pub room_description: String,
}

/// Response wrapping one room.
#[derive(Debug, Serialize)]
pub struct RoomResponse {
    /// Human-readable outcome
    pub message: String,
    /// The room
    pub data: Room,
}

/// Response wrapping a room list.
#[derive(Debug, Serialize)]
pub struct RoomListResponse {
    /// The rooms
    pub data: Vec<Room>,
}

/// Create a room (admin).
pub async fn create_room(
    _caller: RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>), AppError> {
    if request.room_number.trim().is_empty() || request.room_description.trim().is_empty() {
        return Err(AppError::bad_request(
            "Room number and description are required",
        ));
    }
    if !(1..=4).contains(&request.capacity) {
        return Err(AppError::bad_request("Capacity must be between 1 and 4"));
    }
    if request.price < 0.0 || !request.price.is_finite() {
        return Err(AppError::bad_request("Price must be a non-negative number"));
    }

    let room = state
        .rooms
        .create(NewRoom {
            room_number: request.room_number,
            room_type: request.room_type,
            price: request.price,
            capacity: request.capacity,
            description: request.room_description,
            amenities: request.amenities,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RoomResponse {
            message: "Room added successfully".to_string(),
            data: room,
        }),
    ))
}

/// List every room (admin).
pub async fn list_rooms(
    _caller: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<RoomListResponse>, AppError> {
    let data = state.rooms.list_all().await?;
    Ok(Json(RoomListResponse { data }))
}

/// List rooms currently accepting bookings.
pub async fn list_available_rooms(
    _caller: Identity,
    State(state): State<AppState>,
) -> Result<Json<RoomListResponse>, AppError> {
    let data = state.rooms.list_available().await?;
    Ok(Json(RoomListResponse { data }))
}

/// Fetch a room by its room number.
pub async fn get_room_by_number(
    _caller: Identity,
    State(state): State<AppState>,
    Path(room_number): Path<String>,
) -> Result<Json<RoomResponse>, AppError> {
    let room = state.rooms.get_by_number(&room_number).await?;
    Ok(Json(RoomResponse {
        message: "Room found".to_string(),
        data: room,
    }))
}
