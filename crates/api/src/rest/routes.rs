//! Route-Definitionen fuer die REST-API (/api/...)

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::rest::{handlers, AppState};

/// Erstellt den vollstaendigen /api-Router
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me))
        // Studenten
        .route(
            "/api/students",
            post(handlers::students::create_student).get(handlers::students::list_students),
        )
        .route(
            "/api/students/:id",
            get(handlers::students::get_student)
                .put(handlers::students::update_student)
                .delete(handlers::students::delete_student),
        )
        // Zimmer
        .route(
            "/api/rooms",
            post(handlers::rooms::create_room).get(handlers::rooms::list_rooms),
        )
        .route("/api/rooms/available", get(handlers::rooms::list_available_rooms))
        .route(
            "/api/rooms/:room_id/allocate/:student_id",
            post(handlers::rooms::allocate_room),
        )
        // Besucher
        .route(
            "/api/visitors",
            post(handlers::visitors::create_visitor).get(handlers::visitors::list_visitors),
        )
        .route("/api/visitors/active", get(handlers::visitors::list_active_visitors))
        .route("/api/visitors/:id/checkout", post(handlers::visitors::checkout_visitor))
        // Wartung
        .route(
            "/api/maintenance",
            post(handlers::maintenance::create_request).get(handlers::maintenance::list_requests),
        )
        .route(
            "/api/maintenance/:id/status",
            put(handlers::maintenance::update_request_status),
        )
        // Gebuehren
        .route(
            "/api/fees",
            post(handlers::fees::create_fee).get(handlers::fees::list_fees),
        )
        .route("/api/fees/overdue", get(handlers::fees::list_overdue_fees))
        .route("/api/fees/:id/pay", post(handlers::fees::pay_fee))
        // Bewegungen
        .route(
            "/api/movements",
            post(handlers::movements::log_movement).get(handlers::movements::list_movements),
        )
        .route("/api/movements/recent", get(handlers::movements::recent_movements))
        // Dashboard
        .route("/api/dashboard/stats", get(handlers::dashboard::stats))
}
