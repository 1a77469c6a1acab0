pub mod availability;
pub mod booking_service;
pub mod business_hours;
pub mod defaults;
pub mod notification_service;
pub mod pricing;
pub mod room_selector;
