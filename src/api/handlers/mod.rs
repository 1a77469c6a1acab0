pub mod availability;
pub mod booking;
pub mod business_hours;
pub mod communication;
pub mod health;
pub mod rooms;
