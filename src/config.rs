use std::env;
use chrono_tz::Tz;
use crate::domain::models::booking::BookingStatus;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub jwt_public_key: String, // Ed25519 public key (PEM) of the admin token issuer
    pub auth_issuer: String,
    pub auth_audience: String,
    pub business_timezone: Tz,
    pub initial_booking_status: BookingStatus,
    pub fallback_notification_email: String,
    pub default_email_language: String,
    pub worker_poll_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let initial_booking_status = env::var("INITIAL_BOOKING_STATUS")
            .unwrap_or_else(|_| "pending".to_string())
            .parse::<BookingStatus>()
            .expect("INITIAL_BOOKING_STATUS must be a booking status");
        assert!(
            matches!(initial_booking_status, BookingStatus::Pending | BookingStatus::Approved),
            "INITIAL_BOOKING_STATUS must be 'pending' or 'approved'"
        );

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://auth.kbox.local".to_string()),
            auth_audience: env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "karaoke-admin".to_string()),
            business_timezone: env::var("BUSINESS_TIMEZONE")
                .unwrap_or_else(|_| "Asia/Jerusalem".to_string())
                .parse()
                .expect("BUSINESS_TIMEZONE must be an IANA timezone name"),
            initial_booking_status,
            fallback_notification_email: env::var("FALLBACK_NOTIFICATION_EMAIL").unwrap_or_else(|_| "info@kbox.co.il".to_string()),
            default_email_language: env::var("DEFAULT_EMAIL_LANGUAGE").unwrap_or_else(|_| "he".to_string()),
            worker_poll_interval_secs: env::var("WORKER_POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("WORKER_POLL_INTERVAL_SECS must be a number"),
        }
    }
}
