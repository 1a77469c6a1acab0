use crate::domain::models::booking::{Booking, TimeWindow};
use crate::domain::models::business_hours::DayHours;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable { suggestion: Option<TimeWindow> },
}

/// Windows held by bookings in an active status.
pub fn occupied_windows(bookings: &[Booking]) -> Vec<TimeWindow> {
    bookings
        .iter()
        .filter(|b| b.status().is_ok_and(|s| s.is_active()))
        .map(Booking::window)
        .collect()
}

fn is_free(window: &TimeWindow, occupied: &[TimeWindow]) -> bool {
    !occupied.iter().any(|taken| taken.overlaps(window))
}

/// Free window of `duration_hours` inside opening hours, starting no earlier
/// than `earliest_start`, whose start is closest to `requested_start`; the
/// earlier one wins a tie.
pub fn nearest_free_window(
    hours: DayHours,
    requested_start: i32,
    duration_hours: i32,
    earliest_start: i32,
    occupied: &[TimeWindow],
) -> Option<TimeWindow> {
    if !hours.is_open {
        return None;
    }

    (hours.open_hour.max(earliest_start)..=hours.close_hour - duration_hours)
        .map(|h| TimeWindow::new(h, duration_hours))
        .filter(|w| is_free(w, occupied))
        .min_by_key(|w| ((w.start_hour - requested_start).abs(), w.start_hour))
}

/// Caller has already checked the window against opening hours. Suggestions
/// never start before `earliest_start` (the first bookable hour of the date).
pub fn check_window(
    hours: DayHours,
    start_hour: i32,
    duration_hours: i32,
    earliest_start: i32,
    bookings: &[Booking],
) -> Availability {
    let occupied = occupied_windows(bookings);
    let requested = TimeWindow::new(start_hour, duration_hours);

    if is_free(&requested, &occupied) {
        return Availability::Available;
    }

    Availability::Unavailable {
        suggestion: nearest_free_window(hours, start_hour, duration_hours, earliest_start, &occupied),
    }
}
