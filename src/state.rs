use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, BusinessHoursRepository, CommunicationRepository, EmailService,
    JobRepository, Notifier, RoomRepository,
};
use crate::domain::services::booking_service::BookingService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub room_repo: Arc<dyn RoomRepository>,
    pub business_hours_repo: Arc<dyn BusinessHoursRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub communication_repo: Arc<dyn CommunicationRepository>,
    pub email_service: Arc<dyn EmailService>,
    pub notifier: Arc<dyn Notifier>,
    pub booking_service: Arc<BookingService>,
}
