use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{parse_date, HoursRangeQuery, UpsertHoursRequest};
use crate::api::dtos::responses::{BusinessHoursOverview, DayHoursResponse, HoursRuleResponse};
use crate::domain::models::booking::{hour_label, parse_hour_label};
use crate::domain::models::business_hours::{parse_closing_label, BusinessHours};
use crate::domain::services::business_hours::{validate_rule, BusinessHoursResolver};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{Duration, Utc};
use tracing::info;

const DEFAULT_OVERRIDE_RANGE_DAYS: i64 = 90;

/// Opening window as `(is_open, open_hour, close_hour)`. Closed days store 0-0.
fn rule_window(payload: &UpsertHoursRequest) -> Result<(bool, i32, i32), AppError> {
    if !payload.is_open {
        return Ok((false, 0, 0));
    }

    let open = payload.open_time.as_deref()
        .and_then(parse_hour_label)
        .ok_or(AppError::Validation("openTime must be a whole hour (HH:00)".into()))?;
    let close = payload.close_time.as_deref()
        .and_then(parse_closing_label)
        .ok_or(AppError::Validation("closeTime must be a whole hour (HH:00)".into()))?;

    validate_rule(true, open, close)?;
    Ok((true, open, close))
}

pub async fn get_day_hours(
    State(state): State<Arc<AppState>>,
    Path(date_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&date_str)?;
    let resolver = BusinessHoursResolver::new(state.business_hours_repo.clone());

    let response = match resolver.resolve(date).await? {
        Some(hours) if hours.is_open => DayHoursResponse {
            date: date_str,
            is_open: true,
            open_time: Some(hour_label(hours.open_hour)),
            close_time: Some(hour_label(hours.close_hour)),
        },
        _ => DayHoursResponse { date: date_str, is_open: false, open_time: None, close_time: None },
    };
    Ok(Json(response))
}

pub async fn list_hours(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<HoursRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let from = match params.from.as_deref() {
        Some(s) => parse_date(s)?,
        None => Utc::now().with_timezone(&state.config.business_timezone).date_naive(),
    };
    let to = match params.to.as_deref() {
        Some(s) => parse_date(s)?,
        None => from + Duration::days(DEFAULT_OVERRIDE_RANGE_DAYS),
    };
    if to < from {
        return Err(AppError::Validation("'to' must not be before 'from'".into()));
    }

    let weekly = state.business_hours_repo.list_weekly().await?;
    let overrides = state.business_hours_repo.list_overrides(from, to).await?;

    Ok(Json(BusinessHoursOverview {
        weekly: weekly.into_iter().map(HoursRuleResponse::from).collect(),
        overrides: overrides.into_iter().map(HoursRuleResponse::from).collect(),
    }))
}

pub async fn upsert_weekly(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(day): Path<i32>,
    Json(payload): Json<UpsertHoursRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !(0..=6).contains(&day) {
        return Err(AppError::Validation("Day of week must be 0 (Sunday) to 6 (Saturday)".into()));
    }
    let (is_open, open, close) = rule_window(&payload)?;

    let mut rule = BusinessHours::weekly(day, is_open, open, close);
    rule.note = payload.note;

    let saved = state.business_hours_repo.upsert_weekly(&rule).await?;
    info!("Weekly hours for day {} set to open={} {}-{} by {}", day, is_open, open, close, admin.id);
    Ok(Json(HoursRuleResponse::from(saved)))
}

pub async fn upsert_override(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(date_str): Path<String>,
    Json(payload): Json<UpsertHoursRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&date_str)?;
    let (is_open, open, close) = rule_window(&payload)?;

    let rule = BusinessHours::override_for(date, is_open, open, close, payload.note);
    let saved = state.business_hours_repo.upsert_override(&rule).await?;
    info!("Override for {} set to open={} {}-{} by {}", date, is_open, open, close, admin.id);
    Ok(Json(HoursRuleResponse::from(saved)))
}

pub async fn delete_override(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(date_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&date_str)?;
    state.business_hours_repo.delete_override(date).await?;
    info!("Deleted override for {} by {}", date, admin.id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
