use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use crate::domain::models::booking::parse_hour_label;

/// One row of the schedule. Exactly one of `day_of_week` (0 = Sunday) and
/// `special_date` is set.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BusinessHours {
    pub id: String,
    pub day_of_week: Option<i32>,
    pub special_date: Option<NaiveDate>,
    pub is_open: bool,
    pub open_hour: i32,
    pub close_hour: i32,
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl BusinessHours {
    pub fn weekly(day_of_week: i32, is_open: bool, open_hour: i32, close_hour: i32) -> Self {
        Self {
            id: format!("weekly-{}", day_of_week),
            day_of_week: Some(day_of_week),
            special_date: None,
            is_open,
            open_hour,
            close_hour,
            note: None,
            updated_at: Utc::now(),
        }
    }

    pub fn override_for(date: NaiveDate, is_open: bool, open_hour: i32, close_hour: i32, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            day_of_week: None,
            special_date: Some(date),
            is_open,
            open_hour,
            close_hour,
            note,
            updated_at: Utc::now(),
        }
    }

    pub fn day_hours(&self) -> DayHours {
        DayHours {
            is_open: self.is_open,
            open_hour: self.open_hour,
            close_hour: self.close_hour,
        }
    }
}

/// Closing times are exclusive, so `00:00` and `24:00` both mean midnight (24).
pub fn parse_closing_label(value: &str) -> Option<i32> {
    if value.starts_with("24:00") {
        return Some(24);
    }
    match parse_hour_label(value)? {
        0 => Some(24),
        h => Some(h),
    }
}

/// Effective opening window for a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayHours {
    pub is_open: bool,
    pub open_hour: i32,
    pub close_hour: i32,
}
