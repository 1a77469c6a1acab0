use serde::Serialize;
use chrono::{DateTime, Utc};
use crate::domain::models::booking::{hour_label, Booking};
use crate::domain::models::business_hours::BusinessHours;
use crate::domain::models::room::Room;
use crate::domain::services::availability::Availability;
use crate::domain::services::booking_service::AvailabilityOutcome;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub capacity: i32,
    pub price_per_hour: i32,
    pub description: Option<String>,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            name: room.name,
            capacity: room.capacity,
            price_per_hour: room.price_per_hour,
            description: room.description,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHoursResponse {
    pub date: String,
    pub is_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_time: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_end: Option<String>,
    pub room_id: String,
    pub room_name: String,
    pub price_total: i32,
}

impl From<AvailabilityOutcome> for AvailabilityResponse {
    fn from(outcome: AvailabilityOutcome) -> Self {
        let (available, suggestion) = match outcome.availability {
            Availability::Available => (true, None),
            Availability::Unavailable { suggestion } => (false, suggestion),
        };
        Self {
            available,
            suggested_start: suggestion.map(|w| w.start_label()),
            suggested_end: suggestion.map(|w| w.end_label()),
            room_id: outcome.room.id,
            room_name: outcome.room.name,
            price_total: outcome.price_total,
        }
    }
}

/// Booking as exposed over HTTP: the stored row plus rendered `HH:00` labels.
#[derive(Serialize)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub start_time: String,
    pub end_time: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            start_time: hour_label(booking.start_hour),
            end_time: hour_label(booking.end_hour),
            booking,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursRuleResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub is_open: bool,
    pub open_time: String,
    pub close_time: String,
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<BusinessHours> for HoursRuleResponse {
    fn from(rule: BusinessHours) -> Self {
        Self {
            id: rule.id,
            day_of_week: rule.day_of_week,
            date: rule.special_date.map(|d| d.format("%Y-%m-%d").to_string()),
            is_open: rule.is_open,
            open_time: hour_label(rule.open_hour),
            close_time: hour_label(rule.close_hour),
            note: rule.note,
            updated_at: rule.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct BusinessHoursOverview {
    pub weekly: Vec<HoursRuleResponse>,
    pub overrides: Vec<HoursRuleResponse>,
}
