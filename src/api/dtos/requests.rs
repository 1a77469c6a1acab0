use serde::Deserialize;
use chrono::NaiveDate;
use crate::domain::models::booking::parse_hour_label;
use crate::error::AppError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityCheckRequest {
    pub date: String,
    pub start_time: String,
    pub duration_hours: i32,
    pub guest_count: i32,
}

#[derive(Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub date: String,
    pub start_time: String,
    pub duration_hours: i32,
    pub guest_count: i32,
    pub customer: CustomerRequest,
    pub notes: Option<String>,
    pub room_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

#[derive(Deserialize, Default)]
pub struct BookingListQuery {
    pub date: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize, Default)]
pub struct HoursRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertHoursRequest {
    pub is_open: bool,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub note: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertEmailTemplateRequest {
    pub subject: String,
    pub body_html: String,
    pub enabled: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessProfileRequest {
    pub company_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct MailLogQuery {
    pub recipient: Option<String>,
}

pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))
}

pub fn parse_start_time(value: &str) -> Result<i32, AppError> {
    parse_hour_label(value)
        .ok_or(AppError::Validation("Start time must be a whole hour (HH:00)".into()))
}
