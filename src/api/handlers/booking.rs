use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{
    parse_date, parse_start_time, BookingListQuery, CreateBookingRequest, UpdateBookingStatusRequest,
};
use crate::api::dtos::responses::BookingResponse;
use crate::domain::models::booking::BookingStatus;
use crate::domain::ports::BookingFilter;
use crate::domain::services::booking_service::{CustomerDetails, ReservationRequest};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let request = ReservationRequest {
        date: parse_date(&payload.date)?,
        start_hour: parse_start_time(&payload.start_time)?,
        duration_hours: payload.duration_hours,
        guest_count: payload.guest_count,
        customer: CustomerDetails {
            name: payload.customer.name,
            phone: payload.customer.phone,
            email: payload.customer.email,
        },
        notes: payload.notes,
        room_id: payload.room_id,
    };

    let booking = state.booking_service.reserve(request).await?;
    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<BookingListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = params.date.as_deref().map(parse_date).transpose()?;
    let status = params.status.as_deref()
        .map(|s| s.parse::<BookingStatus>().map_err(AppError::Validation))
        .transpose()?;

    let filter = BookingFilter {
        date,
        status,
        limit: params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        offset: params.offset.unwrap_or(0).max(0),
    };

    let bookings: Vec<BookingResponse> = state.booking_repo.list(&filter).await?
        .into_iter()
        .map(BookingResponse::from)
        .collect();
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    Ok(Json(BookingResponse::from(booking)))
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let next = payload.status.parse::<BookingStatus>().map_err(AppError::Validation)?;
    let updated = state.booking_service.update_status(&booking_id, next, &admin.id).await?;
    Ok(Json(BookingResponse::from(updated)))
}

/// Outbox rows for one booking, oldest first.
pub async fn list_booking_jobs(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if state.booking_repo.find_by_id(&booking_id).await?.is_none() {
        return Err(AppError::NotFound("Booking not found".into()));
    }
    let jobs = state.job_repo.list_for_booking(&booking_id).await?;
    info!("Listed {} jobs for booking {}", jobs.len(), booking_id);
    Ok(Json(jobs))
}
