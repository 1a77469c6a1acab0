use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{parse_date, parse_start_time, AvailabilityCheckRequest};
use crate::api::dtos::responses::AvailabilityResponse;
use crate::domain::services::booking_service::AvailabilityRequest;
use crate::error::AppError;
use std::sync::Arc;

/// Advisory pre-check for the booking form. An occupied slot is still a 200,
/// with `available: false` and the nearest free window if there is one.
pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AvailabilityCheckRequest>,
) -> Result<impl IntoResponse, AppError> {
    let request = AvailabilityRequest {
        date: parse_date(&payload.date)?,
        start_hour: parse_start_time(&payload.start_time)?,
        duration_hours: payload.duration_hours,
        guest_count: payload.guest_count,
    };

    let outcome = state.booking_service.check_availability(&request).await?;
    Ok(Json(AvailabilityResponse::from(outcome)))
}
