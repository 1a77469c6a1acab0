pub mod auth;
pub mod booking;
pub mod business_hours;
pub mod communication;
pub mod job;
pub mod room;
