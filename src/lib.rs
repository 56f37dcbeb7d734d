//! Hostel management backend.
//!
//! Resident/staff/admin accounts, room inventory, bookings with date-range
//! conflict checks, PayPal payment capture, maintenance ticketing, and
//! expense/revenue reporting.
//!
//! # Architecture
//!
//! ```text
//! HTTP (axum)                 Core                      PostgreSQL
//! ┌──────────────┐   ┌─────────────────────┐   ┌─────────────────────────┐
//! │ api::*       │──►│ booking::lifecycle  │──►│ bookings, rooms,        │
//! │ auth::*      │   │   availability      │   │ room_occupants,         │
//! │              │   │   pricing           │   │ residents, staff, ...   │
//! └──────────────┘   └─────────────────────┘   └─────────────────────────┘
//!        │
//!        ▼
//! gateway::{paypal, notifier, reports}   (external collaborators)
//! ```
//!
//! The booking lifecycle manager owns every mutation of room inventory; the
//! "check availability, then reserve" sequence runs inside one transaction
//! with the room row locked and the bed counter updated conditionally, so
//! concurrent creates cannot oversell a room.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod booking;
pub mod config;
pub mod error;
pub mod gateway;
pub mod server;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{AppError, Error, Result};
pub use server::{build_router, AppState};
