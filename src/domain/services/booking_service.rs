use std::sync::Arc;
use chrono::{NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::models::booking::{generate_booking_code, Booking, BookingStatus, NewBookingParams, TimeWindow};
use crate::domain::models::business_hours::DayHours;
use crate::domain::models::communication::NotificationEvent;
use crate::domain::models::job::Job;
use crate::domain::models::room::Room;
use crate::domain::ports::{BookingRepository, BusinessHoursRepository, RoomRepository};
use crate::domain::services::availability::{check_window, Availability};
use crate::domain::services::business_hours::{validate_window, BusinessHoursResolver};
use crate::domain::services::pricing::{quote_price, validate_duration};
use crate::domain::services::room_selector::select_room;
use crate::error::AppError;

const MAX_CODE_ATTEMPTS: usize = 3;

/// Bookings start on the hour, so today only hours after the current one are open.
pub fn earliest_start_hour(date: NaiveDate, now: NaiveDateTime) -> Option<i32> {
    let today = now.date();
    if date < today {
        None
    } else if date == today {
        Some(now.hour() as i32 + 1)
    } else {
        Some(0)
    }
}

#[derive(Debug, Clone)]
pub struct AvailabilityRequest {
    pub date: NaiveDate,
    pub start_hour: i32,
    pub duration_hours: i32,
    pub guest_count: i32,
}

#[derive(Debug, Clone)]
pub struct AvailabilityOutcome {
    pub room: Room,
    pub price_total: i32,
    pub availability: Availability,
}

#[derive(Debug, Clone)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub date: NaiveDate,
    pub start_hour: i32,
    pub duration_hours: i32,
    pub guest_count: i32,
    pub customer: CustomerDetails,
    pub notes: Option<String>,
    /// Room returned by a previous availability check. Re-validated, not trusted.
    pub room_id: Option<String>,
}

pub struct BookingService {
    room_repo: Arc<dyn RoomRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    hours: BusinessHoursResolver,
    timezone: Tz,
    initial_status: BookingStatus,
}

impl BookingService {
    pub fn new(
        room_repo: Arc<dyn RoomRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        hours_repo: Arc<dyn BusinessHoursRepository>,
        config: &Config,
    ) -> Self {
        Self {
            room_repo,
            booking_repo,
            hours: BusinessHoursResolver::new(hours_repo),
            timezone: config.business_timezone,
            initial_status: config.initial_booking_status,
        }
    }

    /// First hour that can still be booked on `date` in the business timezone:
    /// the next whole hour today, `None` for past dates.
    fn first_bookable_hour(&self, date: NaiveDate) -> Option<i32> {
        earliest_start_hour(date, Utc::now().with_timezone(&self.timezone).naive_local())
    }

    fn validate_slot(&self, date: NaiveDate, start_hour: i32, duration_hours: i32, guest_count: i32) -> Result<i32, AppError> {
        validate_duration(duration_hours)?;
        if !(0..24).contains(&start_hour) {
            return Err(AppError::Validation("Start time must be a whole hour between 00:00 and 23:00".into()));
        }
        if guest_count < 1 {
            return Err(AppError::Validation("Guest count must be at least 1".into()));
        }

        match self.first_bookable_hour(date) {
            Some(earliest) if start_hour >= earliest => Ok(earliest),
            _ => Err(AppError::Validation("Cannot book in the past".into())),
        }
    }

    async fn resolve_room(&self, guest_count: i32, room_id: Option<&str>) -> Result<Room, AppError> {
        if let Some(id) = room_id {
            return match self.room_repo.find_by_id(id).await? {
                Some(room) if room.can_host(guest_count) => Ok(room),
                _ => Err(AppError::NoSuitableRoom(guest_count)),
            };
        }

        let rooms = self.room_repo.list_active().await?;
        select_room(guest_count, &rooms)
            .cloned()
            .ok_or(AppError::NoSuitableRoom(guest_count))
    }

    /// Advisory check of one room's window against already-resolved hours. Never writes.
    async fn check_room(&self, room: &Room, hours: DayHours, date: NaiveDate, window: TimeWindow, earliest_start: i32) -> Result<Availability, AppError> {
        let existing = self.booking_repo.list_active_for_room(&room.id, date).await?;
        let duration_hours = window.end_hour - window.start_hour;
        Ok(check_window(hours, window.start_hour, duration_hours, earliest_start, &existing))
    }

    /// Pre-flight for the booking form: validates hours, picks the best-fit room
    /// and checks its window.
    pub async fn check_availability(&self, req: &AvailabilityRequest) -> Result<AvailabilityOutcome, AppError> {
        let earliest = self.validate_slot(req.date, req.start_hour, req.duration_hours, req.guest_count)?;
        let hours = validate_window(self.hours.resolve(req.date).await?, req.start_hour, req.duration_hours)?;

        let room = self.resolve_room(req.guest_count, None).await?;
        let window = TimeWindow::new(req.start_hour, req.duration_hours);
        let availability = self.check_room(&room, hours, req.date, window, earliest).await?;
        let price_total = quote_price(room.price_per_hour, req.duration_hours)?;

        info!(
            "Availability for {} {}h x{} in room {}: {:?}",
            req.date, req.duration_hours, req.guest_count, room.id, availability
        );

        Ok(AvailabilityOutcome { room, price_total, availability })
    }

    async fn fresh_suggestion(&self, room: &Room, hours: DayHours, date: NaiveDate, window: TimeWindow) -> Option<TimeWindow> {
        let earliest = self.first_bookable_hour(date)?;
        match self.check_room(room, hours, date, window, earliest).await {
            Ok(Availability::Unavailable { suggestion }) => suggestion,
            Ok(Availability::Available) => None,
            Err(e) => {
                warn!("Could not compute a suggestion after a lost race: {}", e);
                None
            }
        }
    }

    /// Authoritative commit. The overlap check is the storage constraint, so
    /// check and insert are one atomic step and every overlap surfaces here as
    /// `ConcurrentConflict`.
    pub async fn reserve(&self, req: ReservationRequest) -> Result<Booking, AppError> {
        self.validate_slot(req.date, req.start_hour, req.duration_hours, req.guest_count)?;

        let name = req.customer.name.trim().to_string();
        let phone = req.customer.phone.trim().to_string();
        if name.is_empty() || phone.is_empty() {
            return Err(AppError::Validation("Customer name and phone are required".into()));
        }
        let email = req.customer.email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        if let Some(ref e) = email
            && !e.contains('@') {
            return Err(AppError::Validation("Invalid email address".into()));
        }

        let hours = validate_window(self.hours.resolve(req.date).await?, req.start_hour, req.duration_hours)?;
        let room = self.resolve_room(req.guest_count, req.room_id.as_deref()).await?;
        let price_total = quote_price(room.price_per_hour, req.duration_hours)?;

        let mut booking = Booking::new(NewBookingParams {
            room_id: room.id.clone(),
            date: req.date,
            start_hour: req.start_hour,
            duration_hours: req.duration_hours,
            customer_name: name,
            customer_phone: phone,
            customer_email: email,
            guest_count: req.guest_count,
            notes: req.notes.filter(|n| !n.trim().is_empty()),
            price_total,
            status: self.initial_status,
        });

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let jobs = vec![Job::notify(booking.id.clone(), NotificationEvent::Created)];

            match self.booking_repo.reserve(&booking, jobs).await {
                Ok(created) => {
                    info!(
                        "Reserved {} in room {} on {} {}-{} (status {})",
                        created.booking_code, created.room_id, created.booking_date,
                        created.start_hour, created.end_hour, created.status
                    );
                    return Ok(created);
                }
                Err(e) if e.is_unique_violation() && attempt < MAX_CODE_ATTEMPTS => {
                    warn!("Booking code {} collided, regenerating (attempt {})", booking.booking_code, attempt);
                    booking.booking_code = generate_booking_code();
                }
                Err(AppError::ConcurrentConflict(_)) => {
                    warn!(
                        "Overlap rejected for room {} on {} at {}:00",
                        room.id, req.date, req.start_hour
                    );
                    let suggestion = self.fresh_suggestion(&room, hours, req.date, booking.window()).await;
                    return Err(AppError::ConcurrentConflict(suggestion));
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::InternalWithMsg("Could not allocate a unique booking code".into()))
    }

    /// Admin status change, applied as a compare-and-set on the current status.
    pub async fn update_status(&self, id: &str, next: BookingStatus, admin_id: &str) -> Result<Booking, AppError> {
        let booking = self.booking_repo.find_by_id(id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;
        let current = booking.status().map_err(AppError::InternalWithMsg)?;

        if !current.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: current.to_string(),
                to: next.to_string(),
            });
        }

        let approved_by = (next == BookingStatus::Approved).then_some(admin_id);
        let jobs: Vec<Job> = NotificationEvent::for_status(next)
            .map(|event| Job::notify(booking.id.clone(), event))
            .into_iter()
            .collect();

        let updated = self.booking_repo
            .transition_status(id, current, next, approved_by, jobs)
            .await?
            .ok_or(AppError::Conflict("Booking was modified by someone else, reload and retry".into()))?;

        info!("Booking {} moved {} -> {} by {}", updated.booking_code, current, next, admin_id);
        Ok(updated)
    }
}
