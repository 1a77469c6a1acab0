use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{MailLogQuery, UpdateBusinessProfileRequest, UpsertEmailTemplateRequest};
use crate::domain::models::booking::BookingStatus;
use crate::domain::models::communication::{BusinessProfile, EmailTemplate};
use crate::domain::services::notification_service::check_template_syntax;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let templates = state.communication_repo.list_templates().await?;
    Ok(Json(templates))
}

pub async fn upsert_template(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path((status, language)): Path<(String, String)>,
    Json(payload): Json<UpsertEmailTemplateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let status = status.parse::<BookingStatus>().map_err(AppError::Validation)?;
    let language = language.trim().to_ascii_lowercase();
    if language.is_empty() || language.len() > 8 {
        return Err(AppError::Validation("Invalid language code".into()));
    }
    if payload.subject.trim().is_empty() || payload.body_html.trim().is_empty() {
        return Err(AppError::Validation("Subject and body are required".into()));
    }

    check_template_syntax(&payload.subject, &payload.body_html)?;

    let template = EmailTemplate::new(
        status.as_str().to_string(),
        language,
        payload.subject,
        payload.body_html,
        payload.enabled.unwrap_or(true),
    );
    let saved = state.communication_repo.upsert_template(&template).await?;
    info!("Email template {}:{} saved by {}", saved.status, saved.language, admin.id);
    Ok(Json(saved))
}

pub async fn get_business_profile(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.communication_repo.get_business_profile().await?;
    Ok(Json(profile))
}

pub async fn update_business_profile(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Json(payload): Json<UpdateBusinessProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let company_name = payload.company_name.trim().to_string();
    if company_name.is_empty() {
        return Err(AppError::Validation("Company name is required".into()));
    }

    let profile = BusinessProfile {
        company_name,
        phone: payload.phone.unwrap_or_default().trim().to_string(),
        email: payload.email.unwrap_or_default().trim().to_string(),
        updated_at: Utc::now(),
    };
    let saved = state.communication_repo.update_business_profile(&profile).await?;
    info!("Business profile updated by {}", admin.id);
    Ok(Json(saved))
}

pub async fn list_mail_logs(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<MailLogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let logs = state.communication_repo.list_logs(params.recipient.as_deref()).await?;
    Ok(Json(logs))
}
