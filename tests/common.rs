#![allow(dead_code)]

use karaoke_booking::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::auth::Claims,
    domain::models::booking::BookingStatus,
    domain::models::room::Room,
    domain::ports::EmailService,
    infra::factory::sqlite_state,
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use std::str::FromStr;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc, Weekday};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tower::ServiceExt;
use serde_json::Value;

pub const TEST_ISSUER: &str = "test-issuer";
pub const TEST_AUDIENCE: &str = "karaoke-admin";
pub const FALLBACK_EMAIL: &str = "frontdesk@kbox.test";

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Default)]
pub struct MockEmailService {
    pub sent: Mutex<Vec<SentEmail>>,
}

impl MockEmailService {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

pub struct FailingEmailService;

#[async_trait]
impl EmailService for FailingEmailService {
    async fn send(&self, _recipient: &str, _subject: &str, _html_body: &str) -> Result<(), AppError> {
        Err(AppError::Notifier("mail relay unreachable".to_string()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub emails: Arc<MockEmailService>,
}

pub fn test_config(db_url: &str) -> Config {
    Config {
        database_url: db_url.to_string(),
        port: 0,
        mail_service_url: "http://localhost".to_string(),
        mail_service_token: "token".to_string(),
        jwt_public_key: include_str!("../tests/keys/test_public.pem").to_string(),
        auth_issuer: TEST_ISSUER.to_string(),
        auth_audience: TEST_AUDIENCE.to_string(),
        business_timezone: chrono_tz::Asia::Jerusalem,
        initial_booking_status: BookingStatus::Pending,
        fallback_notification_email: FALLBACK_EMAIL.to_string(),
        default_email_language: "he".to_string(),
        worker_poll_interval_secs: 1,
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(|_| {}, None).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        Self::build(adjust, None).await
    }

    pub async fn with_email_service(email_service: Arc<dyn EmailService>) -> Self {
        Self::build(|_| {}, Some(email_service)).await
    }

    async fn build(adjust: impl FnOnce(&mut Config), email_override: Option<Arc<dyn EmailService>>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut config = test_config(&db_url);
        adjust(&mut config);

        let emails = Arc::new(MockEmailService::default());
        let email_service: Arc<dyn EmailService> = email_override.unwrap_or_else(|| emails.clone() as Arc<dyn EmailService>);

        // The background worker is not spawned; tests drain the queue with
        // `process_pending_jobs` to stay deterministic.
        let state = Arc::new(sqlite_state(&config, pool.clone(), email_service));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            emails,
        }
    }

    pub async fn seed_room(&self, name: &str, capacity: i32, price_per_hour: i32) -> Room {
        let room = Room::new(name.to_string(), capacity, price_per_hour);
        self.state.room_repo.create(&room).await.expect("Failed to seed room")
    }

    pub fn admin_token(&self) -> String {
        mint_token("admin", "admin-1")
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>, bearer: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body), None).await
    }

    pub async fn admin_get(&self, uri: &str) -> (StatusCode, Value) {
        let token = self.admin_token();
        self.request("GET", uri, None, Some(&token)).await
    }

    pub async fn admin_put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let token = self.admin_token();
        self.request("PUT", uri, Some(body), Some(&token)).await
    }

    pub async fn admin_delete(&self, uri: &str) -> (StatusCode, Value) {
        let token = self.admin_token();
        self.request("DELETE", uri, None, Some(&token)).await
    }

    /// Books `start` for `duration` hours and returns the created booking JSON.
    pub async fn book(&self, date: NaiveDate, start: &str, duration: i32, guests: i32, email: Option<&str>) -> Value {
        let (status, body) = self.post("/api/v1/bookings", booking_payload(date, start, duration, guests, email)).await;
        assert_eq!(status, StatusCode::CREATED, "booking failed: {}", body);
        body
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

pub fn mint_token(role: &str, subject: &str) -> String {
    mint_token_with(role, subject, TEST_AUDIENCE, None)
}

pub fn mint_token_with(role: &str, subject: &str, audience: &str, csrf_token: Option<&str>) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        iss: TEST_ISSUER.to_string(),
        sub: subject.to_string(),
        aud: audience.to_string(),
        exp: now + 900,
        iat: now,
        role: role.to_string(),
        csrf_token: csrf_token.map(str::to_string),
    };

    let key = EncodingKey::from_ed_pem(include_bytes!("../tests/keys/test_private.pem")).unwrap();
    encode(&Header::new(Algorithm::EdDSA), &claims, &key).unwrap()
}

pub fn booking_payload(date: NaiveDate, start: &str, duration: i32, guests: i32, email: Option<&str>) -> Value {
    serde_json::json!({
        "date": date.format("%Y-%m-%d").to_string(),
        "startTime": start,
        "durationHours": duration,
        "guestCount": guests,
        "customer": {
            "name": "Dana Levi",
            "phone": "050-1234567",
            "email": email,
        },
        "notes": "Birthday",
    })
}

pub fn availability_payload(date: NaiveDate, start: &str, duration: i32, guests: i32) -> Value {
    serde_json::json!({
        "date": date.format("%Y-%m-%d").to_string(),
        "startTime": start,
        "durationHours": duration,
        "guestCount": guests,
    })
}

/// First `weekday` at least a week out, so "today" in the business timezone
/// never interferes.
pub fn upcoming(weekday: Weekday) -> NaiveDate {
    let mut date = Utc::now().date_naive() + chrono::Duration::days(7);
    while date.weekday() != weekday {
        date += chrono::Duration::days(1);
    }
    date
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
}
