use crate::domain::{
    models::{booking::{Booking, BookingStatus}, job::Job},
    ports::{BookingFilter, BookingRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use chrono::{NaiveDate, Utc};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// 23P01: exclusion_violation on bookings_no_overlap.
fn is_overlap_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23P01")
}

async fn insert_jobs(tx: &mut Transaction<'_, Postgres>, jobs: Vec<Job>) -> Result<(), AppError> {
    for job in jobs {
        sqlx::query("INSERT INTO jobs (id, job_type, payload, execute_at, status, error_message, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)")
            .bind(&job.id).bind(&job.job_type).bind(&job.payload).bind(job.execute_at)
            .bind(&job.status).bind(&job.error_message).bind(job.created_at)
            .execute(&mut **tx).await.map_err(AppError::Database)?;
    }
    Ok(())
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn reserve(&self, booking: &Booking, jobs: Vec<Job>) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Booking>(
            r#"INSERT INTO bookings (id, room_id, booking_date, start_hour, end_hour, duration_hours, customer_name, customer_phone, customer_email, guest_count, notes, price_total, status, booking_code, approved_by, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
               RETURNING *"#
        )
            .bind(&booking.id).bind(&booking.room_id).bind(booking.booking_date)
            .bind(booking.start_hour).bind(booking.end_hour).bind(booking.duration_hours)
            .bind(&booking.customer_name).bind(&booking.customer_phone).bind(&booking.customer_email)
            .bind(booking.guest_count).bind(&booking.notes).bind(booking.price_total)
            .bind(&booking.status).bind(&booking.booking_code).bind(&booking.approved_by)
            .bind(booking.created_at).bind(booking.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| if is_overlap_violation(&e) { AppError::ConcurrentConflict(None) } else { AppError::Database(e) })?;

        insert_jobs(&mut tx, jobs).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active_for_room(&self, room_id: &str, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE room_id = $1 AND booking_date = $2 AND status IN ('pending', 'approved', 'completed') ORDER BY start_hour ASC"
        )
            .bind(room_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE ($1::date IS NULL OR booking_date = $1)
            AND ($2::text IS NULL OR status = $2)
            ORDER BY booking_date ASC, start_hour ASC, room_id ASC
            LIMIT $3 OFFSET $4
            "#
        )
            .bind(filter.date)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn transition_status(
        &self,
        id: &str,
        from: BookingStatus,
        to: BookingStatus,
        approved_by: Option<&str>,
        jobs: Vec<Job>,
    ) -> Result<Option<Booking>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $1, approved_by = COALESCE($2, approved_by), updated_at = $3 WHERE id = $4 AND status = $5 RETURNING *"
        )
            .bind(to.as_str())
            .bind(approved_by)
            .bind(Utc::now())
            .bind(id)
            .bind(from.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| if is_overlap_violation(&e) { AppError::SlotUnavailable(None) } else { AppError::Database(e) })?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        insert_jobs(&mut tx, jobs).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(updated))
    }
}
