pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/services", get(handlers::catalog::list_services))
        .route("/api/services/:id", get(handlers::catalog::get_service))
        .route("/api/studio", get(handlers::catalog::get_studio))
        .route("/api/booking/start", post(handlers::booking::start_booking))
        .route(
            "/api/booking/reschedule",
            post(handlers::booking::start_reschedule),
        )
        .route(
            "/api/booking/:session_id/calendar",
            get(handlers::booking::get_calendar),
        )
        .route(
            "/api/booking/:session_id/next-month",
            post(handlers::booking::next_month),
        )
        .route(
            "/api/booking/:session_id/prev-month",
            post(handlers::booking::prev_month),
        )
        .route(
            "/api/booking/:session_id/select-date",
            post(handlers::booking::select_date),
        )
        .route(
            "/api/booking/:session_id/select-time",
            post(handlers::booking::select_time),
        )
        .route(
            "/api/booking/:session_id/select-service",
            post(handlers::booking::select_service),
        )
        .route(
            "/api/booking/:session_id/confirm",
            post(handlers::booking::confirm),
        )
        .route(
            "/api/clients/:whatsapp/appointments",
            get(handlers::client::get_client_appointments),
        )
        .route(
            "/api/appointments/:id/cancel",
            post(handlers::client::cancel_appointment),
        )
        .route(
            "/api/admin/appointments",
            get(handlers::admin::get_appointments),
        )
        .route(
            "/api/admin/appointments/:id/status",
            post(handlers::admin::update_appointment_status),
        )
        .route("/api/admin/clients", get(handlers::admin::get_clients))
        .route(
            "/api/admin/clients/:id",
            put(handlers::admin::update_client).delete(handlers::admin::delete_client),
        )
        .route("/api/admin/services", post(handlers::admin::create_service))
        .route(
            "/api/admin/services/:id",
            put(handlers::admin::update_service).delete(handlers::admin::delete_service),
        )
        .route("/api/admin/studio", put(handlers::admin::update_studio))
        .route("/api/admin/stats", get(handlers::admin::get_stats))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
