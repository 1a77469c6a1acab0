use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use sqlx::FromRow;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

const BOOKING_CODE_PREFIX: &str = "KB-";
const BOOKING_CODE_LEN: usize = 6;
// No 0/O or 1/I, codes get read out over the phone.
const BOOKING_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Cancelled,
    Completed,
    Waitlisted,
}

impl BookingStatus {
    /// Statuses that hold their room for the booked window.
    pub const ACTIVE: [BookingStatus; 3] = [BookingStatus::Pending, BookingStatus::Approved, BookingStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
            BookingStatus::Waitlisted => "waitlisted",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Cancelled) | (Pending, Waitlisted)
                | (Approved, Completed) | (Approved, Cancelled)
                | (Waitlisted, Approved) | (Waitlisted, Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "approved" => Ok(BookingStatus::Approved),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            "waitlisted" => Ok(BookingStatus::Waitlisted),
            other => Err(format!("Unknown booking status '{}'", other)),
        }
    }
}

/// Half-open hour window `[start_hour, end_hour)` on a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_hour: i32,
    pub end_hour: i32,
}

impl TimeWindow {
    pub fn new(start_hour: i32, duration_hours: i32) -> Self {
        Self { start_hour, end_hour: start_hour + duration_hours }
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start_hour < other.end_hour && other.start_hour < self.end_hour
    }

    pub fn start_label(&self) -> String {
        hour_label(self.start_hour)
    }

    pub fn end_label(&self) -> String {
        hour_label(self.end_hour)
    }
}

/// Renders an hour as `HH:00`. Midnight closing (24) renders as `00:00`.
pub fn hour_label(hour: i32) -> String {
    format!("{:02}:00", hour.rem_euclid(24))
}

/// Accepts `HH:MM` or `HH:MM:SS` on a whole hour.
pub fn parse_hour_label(value: &str) -> Option<i32> {
    let time = NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()?;

    if time.minute() != 0 || time.second() != 0 {
        return None;
    }
    Some(time.hour() as i32)
}

pub fn generate_booking_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..BOOKING_CODE_LEN)
        .map(|_| BOOKING_CODE_ALPHABET[rng.gen_range(0..BOOKING_CODE_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", BOOKING_CODE_PREFIX, suffix)
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub room_id: String,
    pub booking_date: NaiveDate,
    pub start_hour: i32,
    pub end_hour: i32,
    pub duration_hours: i32,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub guest_count: i32,
    pub notes: Option<String>,
    pub price_total: i32,
    pub status: String,
    pub booking_code: String,
    pub approved_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub room_id: String,
    pub date: NaiveDate,
    pub start_hour: i32,
    pub duration_hours: i32,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub guest_count: i32,
    pub notes: Option<String>,
    pub price_total: i32,
    pub status: BookingStatus,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            room_id: params.room_id,
            booking_date: params.date,
            start_hour: params.start_hour,
            end_hour: params.start_hour + params.duration_hours,
            duration_hours: params.duration_hours,
            customer_name: params.customer_name,
            customer_phone: params.customer_phone,
            customer_email: params.customer_email,
            guest_count: params.guest_count,
            notes: params.notes,
            price_total: params.price_total,
            status: params.status.as_str().to_string(),
            booking_code: generate_booking_code(),
            approved_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow { start_hour: self.start_hour, end_hour: self.end_hour }
    }

    pub fn status(&self) -> Result<BookingStatus, String> {
        self.status.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_never_return_to_pending() {
        use BookingStatus::*;
        for from in [Pending, Approved, Cancelled, Completed, Waitlisted] {
            assert!(!from.can_transition_to(Pending), "{} -> pending must be rejected", from);
        }
    }

    #[test]
    fn terminal_statuses_have_no_exits() {
        use BookingStatus::*;
        for next in [Pending, Approved, Cancelled, Completed, Waitlisted] {
            assert!(!Cancelled.can_transition_to(next));
            assert!(!Completed.can_transition_to(next));
        }
    }

    #[test]
    fn admin_flow_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Waitlisted));
        assert!(Approved.can_transition_to(Completed));
        assert!(Waitlisted.can_transition_to(Approved));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Approved.can_transition_to(Waitlisted));
    }

    #[test]
    fn hour_labels() {
        assert_eq!(hour_label(9), "09:00");
        assert_eq!(hour_label(24), "00:00");
        assert_eq!(parse_hour_label("18:00"), Some(18));
        assert_eq!(parse_hour_label("18:00:00"), Some(18));
        assert_eq!(parse_hour_label("18:30"), None);
        assert_eq!(parse_hour_label("evening"), None);
    }

    #[test]
    fn booking_code_shape() {
        let code = generate_booking_code();
        assert!(code.starts_with("KB-"));
        assert_eq!(code.len(), 9);
        assert!(code[3..].bytes().all(|b| BOOKING_CODE_ALPHABET.contains(&b)));
    }
}
