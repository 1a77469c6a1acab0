use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{availability, booking, business_hours, communication, health, rooms};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Public
        .route("/api/v1/rooms", get(rooms::list_rooms))
        .route("/api/v1/business-hours/{date}", get(business_hours::get_day_hours))
        .route("/api/v1/availability", post(availability::check_availability))
        .route("/api/v1/bookings", post(booking::create_booking))

        // Admin - Bookings
        .route("/api/v1/admin/bookings", get(booking::list_bookings))
        .route("/api/v1/admin/bookings/{booking_id}", get(booking::get_booking))
        .route("/api/v1/admin/bookings/{booking_id}/status", put(booking::update_booking_status))
        .route("/api/v1/admin/bookings/{booking_id}/jobs", get(booking::list_booking_jobs))

        // Admin - Business Hours
        .route("/api/v1/admin/business-hours", get(business_hours::list_hours))
        .route("/api/v1/admin/business-hours/weekly/{day}", put(business_hours::upsert_weekly))
        .route(
            "/api/v1/admin/business-hours/overrides/{date}",
            put(business_hours::upsert_override).delete(business_hours::delete_override),
        )

        // Admin - Communication
        .route("/api/v1/admin/email-templates", get(communication::list_templates))
        .route("/api/v1/admin/email-templates/{status}/{language}", put(communication::upsert_template))
        .route(
            "/api/v1/admin/business-profile",
            get(communication::get_business_profile).put(communication::update_business_profile),
        )
        .route("/api/v1/admin/mail-logs", get(communication::list_mail_logs))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        admin_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
