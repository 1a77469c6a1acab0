use karaoke_booking::{
    domain::models::communication::NotificationEvent,
    domain::models::job::Job,
    domain::ports::JobRepository,
    infra::repositories::postgres_job_repo::PostgresJobRepo,
};
use chrono::{Duration, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::ConnectOptions;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use tokio::task::JoinSet;
use uuid::Uuid;

/// Ten workers drain the outbox at once; `FOR UPDATE SKIP LOCKED` must hand
/// each job to exactly one of them.
#[tokio::test]
async fn test_notification_outbox_claims_each_job_once() {
    let db_url = match std::env::var("DATABASE_URL") {
        Ok(url) if url.starts_with("postgres") => url,
        _ => {
            println!("Skipping concurrency test (DATABASE_URL does not target Postgres)");
            return;
        }
    };

    let opts = PgConnectOptions::from_str(&db_url)
        .unwrap()
        .log_statements(tracing::log::LevelFilter::Debug);

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect_with(opts)
        .await
        .expect("Failed to connect to DB");

    sqlx::migrate!("./migrations/postgres").run(&pool).await.expect("Failed to migrate");
    sqlx::query("DELETE FROM jobs").execute(&pool).await.unwrap();

    let repo = Arc::new(PostgresJobRepo::new(pool.clone()));

    let total_jobs = 100;
    let now = Utc::now();

    for i in 0..total_jobs {
        let mut job = Job::notify(Uuid::new_v4().to_string(), NotificationEvent::Created);
        job.execute_at = now - Duration::minutes(1) + Duration::milliseconds(i as i64);
        sqlx::query("INSERT INTO jobs (id, job_type, payload, execute_at, status, error_message, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)")
            .bind(&job.id)
            .bind(&job.job_type)
            .bind(&job.payload)
            .bind(job.execute_at)
            .bind(&job.status)
            .bind(&job.error_message)
            .bind(job.created_at)
            .execute(&pool)
            .await
            .expect("Failed to seed job");
    }

    let worker_count = 10;
    let mut set = JoinSet::new();

    for i in 0..worker_count {
        let repo = repo.clone();
        set.spawn(async move {
            let mut claimed = Vec::new();
            let mut empty_streaks = 0;

            while empty_streaks < 10 {
                let batch = repo.find_pending(5).await.expect("Failed to fetch jobs");
                if batch.is_empty() {
                    empty_streaks += 1;
                    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                } else {
                    empty_streaks = 0;
                    for job in batch {
                        assert_eq!(job.status, "PROCESSING");
                        claimed.push(job.id);
                    }
                }
            }
            println!("Worker {} claimed {} jobs", i, claimed.len());
            claimed
        });
    }

    let mut all_claimed = Vec::new();
    while let Some(res) = set.join_next().await {
        all_claimed.extend(res.unwrap());
    }

    let unique: HashSet<String> = all_claimed.iter().cloned().collect();
    assert_eq!(unique.len(), all_claimed.len(), "A job was claimed by more than one worker");
    assert_eq!(all_claimed.len(), total_jobs, "Not all jobs were claimed");

    sqlx::query("DELETE FROM jobs").execute(&pool).await.unwrap();
}
