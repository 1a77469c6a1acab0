use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::responses::RoomResponse;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let rooms: Vec<RoomResponse> = state.room_repo.list_active().await?
        .into_iter()
        .map(RoomResponse::from)
        .collect();
    Ok(Json(rooms))
}
