use std::sync::Arc;
use chrono::{Datelike, NaiveDate};
use crate::domain::models::business_hours::{BusinessHours, DayHours};
use crate::domain::ports::BusinessHoursRepository;
use crate::error::AppError;

/// 0 = Sunday ... 6 = Saturday.
pub fn day_of_week(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

/// A date override always wins over the weekly rule.
pub fn effective_hours(override_rule: Option<&BusinessHours>, weekly_rule: Option<&BusinessHours>) -> Option<DayHours> {
    override_rule.or(weekly_rule).map(BusinessHours::day_hours)
}

/// Rejects a window that does not fit inside the day's opening hours.
pub fn validate_window(hours: Option<DayHours>, start_hour: i32, duration_hours: i32) -> Result<DayHours, AppError> {
    let hours = match hours {
        Some(h) if h.is_open => h,
        _ => return Err(AppError::BusinessClosed),
    };

    if start_hour < hours.open_hour || start_hour + duration_hours > hours.close_hour {
        return Err(AppError::OutsideHours {
            open_hour: hours.open_hour,
            close_hour: hours.close_hour,
        });
    }
    Ok(hours)
}

/// Shape check for an admin-supplied rule. Closed days carry no window.
pub fn validate_rule(is_open: bool, open_hour: i32, close_hour: i32) -> Result<(), AppError> {
    if !is_open {
        return Ok(());
    }
    if !(0..=24).contains(&open_hour) || !(0..=24).contains(&close_hour) {
        return Err(AppError::Validation("Hours must be between 00:00 and 24:00".into()));
    }
    if open_hour >= close_hour {
        return Err(AppError::Validation("Opening time must be before closing time".into()));
    }
    Ok(())
}

pub struct BusinessHoursResolver {
    repo: Arc<dyn BusinessHoursRepository>,
}

impl BusinessHoursResolver {
    pub fn new(repo: Arc<dyn BusinessHoursRepository>) -> Self {
        Self { repo }
    }

    /// `None` means no rule exists for the date; callers treat that as closed.
    pub async fn resolve(&self, date: NaiveDate) -> Result<Option<DayHours>, AppError> {
        if let Some(rule) = self.repo.find_override(date).await? {
            return Ok(Some(rule.day_hours()));
        }
        let weekly = self.repo.find_weekly(day_of_week(date)).await?;
        Ok(effective_hours(None, weekly.as_ref()))
    }
}
