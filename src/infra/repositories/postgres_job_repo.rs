use crate::domain::{models::job::Job, ports::JobRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::Utc;

pub struct PostgresJobRepo {
    pool: PgPool,
}

impl PostgresJobRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl JobRepository for PostgresJobRepo {
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError> {
        let now = Utc::now();
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = 'PROCESSING'
            WHERE id IN (
                SELECT id
                FROM jobs
                WHERE status = 'PENDING' AND execute_at <= $1
                ORDER BY execute_at ASC
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#
        )
            .bind(now)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_booking(&self, booking_id: &str) -> Result<Vec<Job>, AppError> {
        sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE payload->>'booking_id' = $1 ORDER BY created_at ASC"
        )
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError> {
        sqlx::query("UPDATE jobs SET status = $1, error_message = $2 WHERE id = $3")
            .bind(status)
            .bind(error_message)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
