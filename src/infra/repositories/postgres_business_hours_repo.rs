use crate::domain::{models::business_hours::BusinessHours, ports::BusinessHoursRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

pub struct PostgresBusinessHoursRepo {
    pool: PgPool,
}

impl PostgresBusinessHoursRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl BusinessHoursRepository for PostgresBusinessHoursRepo {
    async fn find_override(&self, date: NaiveDate) -> Result<Option<BusinessHours>, AppError> {
        sqlx::query_as::<_, BusinessHours>(
            "SELECT * FROM business_hours WHERE special_date = $1 ORDER BY updated_at DESC LIMIT 1"
        )
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_weekly(&self, day_of_week: i32) -> Result<Option<BusinessHours>, AppError> {
        sqlx::query_as::<_, BusinessHours>(
            "SELECT * FROM business_hours WHERE day_of_week = $1 AND special_date IS NULL"
        )
            .bind(day_of_week)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_weekly(&self) -> Result<Vec<BusinessHours>, AppError> {
        sqlx::query_as::<_, BusinessHours>(
            "SELECT * FROM business_hours WHERE special_date IS NULL ORDER BY day_of_week ASC"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_overrides(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<BusinessHours>, AppError> {
        sqlx::query_as::<_, BusinessHours>(
            "SELECT * FROM business_hours WHERE special_date >= $1 AND special_date <= $2 ORDER BY special_date ASC"
        )
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upsert_weekly(&self, rule: &BusinessHours) -> Result<BusinessHours, AppError> {
        sqlx::query_as::<_, BusinessHours>(
            r#"INSERT INTO business_hours (id, day_of_week, special_date, is_open, open_hour, close_hour, note, updated_at)
               VALUES ($1, $2, NULL, $3, $4, $5, $6, $7)
               ON CONFLICT(day_of_week) DO UPDATE SET
               is_open=excluded.is_open,
               open_hour=excluded.open_hour,
               close_hour=excluded.close_hour,
               note=excluded.note,
               updated_at=excluded.updated_at
               RETURNING *"#
        )
            .bind(&rule.id)
            .bind(rule.day_of_week)
            .bind(rule.is_open)
            .bind(rule.open_hour)
            .bind(rule.close_hour)
            .bind(&rule.note)
            .bind(rule.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upsert_override(&self, rule: &BusinessHours) -> Result<BusinessHours, AppError> {
        sqlx::query_as::<_, BusinessHours>(
            r#"INSERT INTO business_hours (id, day_of_week, special_date, is_open, open_hour, close_hour, note, updated_at)
               VALUES ($1, NULL, $2, $3, $4, $5, $6, $7)
               ON CONFLICT(special_date) DO UPDATE SET
               is_open=excluded.is_open,
               open_hour=excluded.open_hour,
               close_hour=excluded.close_hour,
               note=excluded.note,
               updated_at=excluded.updated_at
               RETURNING *"#
        )
            .bind(&rule.id)
            .bind(rule.special_date)
            .bind(rule.is_open)
            .bind(rule.open_hour)
            .bind(rule.close_hour)
            .bind(&rule.note)
            .bind(rule.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_override(&self, date: NaiveDate) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM business_hours WHERE special_date = $1")
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Override not found".into()));
        }
        Ok(())
    }
}
