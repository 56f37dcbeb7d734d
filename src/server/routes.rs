//! Router configuration.
//!
//! Builds the complete Axum router. Role enforcement lives in the extractor
//! types on each handler, not here.

use super::health::{health_check, readiness_check};
use super::state::AppState;
use crate::api;
use crate::auth;
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the complete router.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::handlers::register))
        .route("/login", post(auth::handlers::login))
        .route("/forgot-password", post(auth::handlers::forgot_password))
        .route(
            "/reset-password/:id/:token",
            post(auth::handlers::reset_password),
        );

    let booking_routes = Router::new()
        .route("/create", post(api::bookings::create_booking))
        .route("/cancel/:id", patch(api::bookings::cancel_booking))
        .route("/:id", get(api::bookings::get_booking));

    let payment_routes = Router::new()
        .route("/create-order", post(api::payments::create_order))
        .route(
            "/capture-payment/:order_id",
            get(api::payments::capture_payment),
        )
        .route("/refund-payment", post(api::payments::refund_payment));

    let room_routes = Router::new()
        .route("/create", post(api::rooms::create_room))
        .route("/all", get(api::rooms::list_rooms))
        .route("/available", get(api::rooms::list_available_rooms))
        .route("/:room_number", get(api::rooms::get_room_by_number));

    let resident_routes = Router::new()
        .route("/profile", get(api::residents::get_profile))
        .route("/profile/edit", put(api::residents::update_profile))
        .route("/delete-account", delete(api::residents::delete_account))
        .route("/get-booking", get(api::residents::get_own_bookings));

    let maintenance_routes = Router::new()
        .route("/create", post(api::maintenance::create_request))
        .route("/pending", get(api::maintenance::list_pending))
        .route("/assign-staff/:id", patch(api::maintenance::assign_staff))
        .route("/resolve/:id", patch(api::maintenance::resolve_request))
        .route("/assigned", get(api::maintenance::list_assigned));

    let staff_routes = Router::new().route("/available", get(api::staff::list_available));

    let expense_routes = Router::new()
        .route("/create", post(api::expenses::create_expense))
        .route("/category", get(api::expenses::totals_by_category))
        .route("/by-year", get(api::expenses::totals_by_year));

    let revenue_routes = Router::new().route("/category", get(api::revenue::revenue_by_category));

    let report_routes = Router::new()
        .route("/expense", get(api::reports::download_expense_report))
        .route("/revenue", get(api::reports::download_revenue_report));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/booking", booking_routes)
        .nest("/api/payment", payment_routes)
        .nest("/api/room", room_routes)
        .nest("/api/resident", resident_routes)
        .nest("/api/maintenance-request", maintenance_routes)
        .nest("/api/staff", staff_routes)
        .nest("/api/expense", expense_routes)
        .nest("/api/revenue", revenue_routes)
        .nest("/api/download-report", report_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
