use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};
use crate::domain::models::booking::{hour_label, TimeWindow};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("The business is closed on the requested date")]
    BusinessClosed,
    #[error("Requested time is outside business hours ({open_hour:02}:00-{close_hour:02}:00)")]
    OutsideHours { open_hour: i32, close_hour: i32 },
    #[error("No active room can host {0} guests")]
    NoSuitableRoom(i32),
    #[error("The requested time slot is not available")]
    SlotUnavailable(Option<TimeWindow>),
    #[error("The requested time slot was just taken by another booking")]
    ConcurrentConflict(Option<TimeWindow>),
    #[error("Cannot change booking status from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("Notification failed: {0}")]
    Notifier(String),
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// True for unique-key violations (SQLite 2067, PostgreSQL 23505).
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Database(e) => e.as_database_error().is_some_and(|db| db.is_unique_violation()),
            _ => false,
        }
    }
}

fn with_suggestion(mut body: Value, suggestion: &Option<TimeWindow>) -> Value {
    if let Some(window) = suggestion {
        body["suggestedStart"] = json!(window.start_label());
        body["suggestedEnd"] = json!(window.end_label());
    }
    body
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, body) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal server error" }))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" })),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::BusinessClosed => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "code": "BUSINESS_CLOSED" }),
            ),
            AppError::OutsideHours { open_hour, close_hour } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": message,
                    "code": "OUTSIDE_HOURS",
                    "openTime": hour_label(*open_hour),
                    "closeTime": hour_label(*close_hour),
                }),
            ),
            AppError::NoSuitableRoom(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "code": "NO_SUITABLE_ROOM" }),
            ),
            AppError::SlotUnavailable(suggestion) => (
                StatusCode::CONFLICT,
                with_suggestion(json!({ "error": message, "code": "SLOT_UNAVAILABLE" }), suggestion),
            ),
            AppError::ConcurrentConflict(suggestion) => (
                StatusCode::CONFLICT,
                with_suggestion(json!({ "error": message, "code": "CONCURRENT_CONFLICT" }), suggestion),
            ),
            AppError::InvalidTransition { .. } => (
                StatusCode::CONFLICT,
                json!({ "error": message, "code": "INVALID_TRANSITION" }),
            ),
            AppError::Notifier(msg) => {
                warn!("Notifier error surfaced to a request: {}", msg);
                (StatusCode::BAD_GATEWAY, json!({ "error": "Notification service unavailable" }))
            }
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal error" }))
            }
        };

        (status, Json(body)).into_response()
    }
}
