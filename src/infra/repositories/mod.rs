pub mod sqlite_booking_repo;
pub mod sqlite_business_hours_repo;
pub mod sqlite_communication_repo;
pub mod sqlite_job_repo;
pub mod sqlite_room_repo;

pub mod postgres_booking_repo;
pub mod postgres_business_hours_repo;
pub mod postgres_communication_repo;
pub mod postgres_job_repo;
pub mod postgres_room_repo;
