use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{
    BookingRepository, BusinessHoursRepository, CommunicationRepository, EmailService,
    JobRepository, RoomRepository,
};
use crate::domain::services::booking_service::BookingService;
use crate::domain::services::notification_service::EmailNotifier;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_business_hours_repo::PostgresBusinessHoursRepo,
    postgres_communication_repo::PostgresCommunicationRepo, postgres_job_repo::PostgresJobRepo,
    postgres_room_repo::PostgresRoomRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_business_hours_repo::SqliteBusinessHoursRepo,
    sqlite_communication_repo::SqliteCommunicationRepo, sqlite_job_repo::SqliteJobRepo,
    sqlite_room_repo::SqliteRoomRepo,
};

struct Repos {
    room: Arc<dyn RoomRepository>,
    business_hours: Arc<dyn BusinessHoursRepository>,
    booking: Arc<dyn BookingRepository>,
    job: Arc<dyn JobRepository>,
    communication: Arc<dyn CommunicationRepository>,
}

fn assemble(config: &Config, repos: Repos, email_service: Arc<dyn EmailService>) -> AppState {
    let booking_service = Arc::new(BookingService::new(
        repos.room.clone(),
        repos.booking.clone(),
        repos.business_hours.clone(),
        config,
    ));

    let notifier = Arc::new(EmailNotifier::new(
        repos.communication.clone(),
        email_service.clone(),
        config.fallback_notification_email.clone(),
        config.default_email_language.clone(),
    ));

    AppState {
        config: config.clone(),
        room_repo: repos.room,
        business_hours_repo: repos.business_hours,
        booking_repo: repos.booking,
        job_repo: repos.job,
        communication_repo: repos.communication,
        email_service,
        notifier,
        booking_service,
    }
}

/// Wires the SQLite repositories around an already-migrated pool.
pub fn sqlite_state(config: &Config, pool: SqlitePool, email_service: Arc<dyn EmailService>) -> AppState {
    let repos = Repos {
        room: Arc::new(SqliteRoomRepo::new(pool.clone())),
        business_hours: Arc::new(SqliteBusinessHoursRepo::new(pool.clone())),
        booking: Arc::new(SqliteBookingRepo::new(pool.clone())),
        job: Arc::new(SqliteJobRepo::new(pool.clone())),
        communication: Arc::new(SqliteCommunicationRepo::new(pool)),
    };
    assemble(config, repos, email_service)
}

/// Wires the PostgreSQL repositories around an already-migrated pool.
pub fn postgres_state(config: &Config, pool: PgPool, email_service: Arc<dyn EmailService>) -> AppState {
    let repos = Repos {
        room: Arc::new(PostgresRoomRepo::new(pool.clone())),
        business_hours: Arc::new(PostgresBusinessHoursRepo::new(pool.clone())),
        booking: Arc::new(PostgresBookingRepo::new(pool.clone())),
        job: Arc::new(PostgresJobRepo::new(pool.clone())),
        communication: Arc::new(PostgresCommunicationRepo::new(pool)),
    };
    assemble(config, repos, email_service)
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_state(config, pool, email_service)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_state(config, pool, email_service)
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
