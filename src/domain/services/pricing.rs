use crate::error::AppError;

pub const MIN_DURATION_HOURS: i32 = 1;
pub const MAX_DURATION_HOURS: i32 = 4;

/// Duration multiplier in tenths: 1h = 1.0, 2h = 1.8, 3h = 2.5, 4h = 3.0.
fn multiplier_tenths(duration_hours: i32) -> Option<i64> {
    match duration_hours {
        1 => Some(10),
        2 => Some(18),
        3 => Some(25),
        4 => Some(30),
        _ => None,
    }
}

pub fn validate_duration(duration_hours: i32) -> Result<(), AppError> {
    if multiplier_tenths(duration_hours).is_none() {
        return Err(AppError::Validation(format!(
            "Duration must be between {} and {} hours",
            MIN_DURATION_HOURS, MAX_DURATION_HOURS
        )));
    }
    Ok(())
}

/// `round(price_per_hour * multiplier)`, half rounding up, in whole currency units.
pub fn quote_price(price_per_hour: i32, duration_hours: i32) -> Result<i32, AppError> {
    let tenths = multiplier_tenths(duration_hours)
        .ok_or_else(|| AppError::Validation(format!("Unsupported duration: {} hours", duration_hours)))?;

    let total = (price_per_hour as i64 * tenths + 5) / 10;
    i32::try_from(total).map_err(|_| AppError::Validation("Price out of range".into()))
}
