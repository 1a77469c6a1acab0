use crate::domain::models::{
    booking::{Booking, BookingStatus}, business_hours::BusinessHours, job::Job, room::Room,
    communication::{BusinessProfile, EmailTemplate, MailLog, NotificationEvent},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: &Room) -> Result<Room, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, AppError>;
    async fn list_active(&self) -> Result<Vec<Room>, AppError>;
    async fn set_active(&self, id: &str, is_active: bool) -> Result<Room, AppError>;
}

#[async_trait]
pub trait BusinessHoursRepository: Send + Sync {
    async fn find_override(&self, date: NaiveDate) -> Result<Option<BusinessHours>, AppError>;
    async fn find_weekly(&self, day_of_week: i32) -> Result<Option<BusinessHours>, AppError>;
    async fn list_weekly(&self) -> Result<Vec<BusinessHours>, AppError>;
    async fn list_overrides(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<BusinessHours>, AppError>;
    async fn upsert_weekly(&self, rule: &BusinessHours) -> Result<BusinessHours, AppError>;
    async fn upsert_override(&self, rule: &BusinessHours) -> Result<BusinessHours, AppError>;
    async fn delete_override(&self, date: NaiveDate) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub date: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking and its outbox jobs in one transaction. The storage
    /// layer rejects an overlapping active booking with `ConcurrentConflict`.
    async fn reserve(&self, booking: &Booking, jobs: Vec<Job>) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_active_for_room(&self, room_id: &str, date: NaiveDate) -> Result<Vec<Booking>, AppError>;
    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError>;
    /// Compare-and-set on `from`. Returns `None` when the row no longer has
    /// status `from`; an overlap on re-activation is `SlotUnavailable`.
    async fn transition_status(
        &self,
        id: &str,
        from: BookingStatus,
        to: BookingStatus,
        approved_by: Option<&str>,
        jobs: Vec<Job>,
    ) -> Result<Option<Booking>, AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError>;
    async fn list_for_booking(&self, booking_id: &str) -> Result<Vec<Job>, AppError>;
    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError>;
}

#[async_trait]
pub trait CommunicationRepository: Send + Sync {
    async fn find_template(&self, status: &str, language: &str) -> Result<Option<EmailTemplate>, AppError>;
    async fn list_templates(&self) -> Result<Vec<EmailTemplate>, AppError>;
    async fn upsert_template(&self, template: &EmailTemplate) -> Result<EmailTemplate, AppError>;

    async fn get_business_profile(&self) -> Result<BusinessProfile, AppError>;
    async fn update_business_profile(&self, profile: &BusinessProfile) -> Result<BusinessProfile, AppError>;

    async fn log_mail(&self, log: &MailLog) -> Result<(), AppError>;
    async fn has_mail_been_sent(&self, recipient: &str, template_id: &str, context_hash: &str) -> Result<bool, AppError>;
    async fn list_logs(&self, recipient: Option<&str>) -> Result<Vec<MailLog>, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}

/// Customer-facing message dispatch. Called from the background worker only,
/// never on a request path.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, job_id: &str, booking: &Booking, event: NotificationEvent) -> Result<(), AppError>;
}
