use crate::domain::{models::room::Room, ports::RoomRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresRoomRepo {
    pool: PgPool,
}

impl PostgresRoomRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl RoomRepository for PostgresRoomRepo {
    async fn create(&self, room: &Room) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (id, name, capacity, price_per_hour, is_active, description, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *"
        )
            .bind(&room.id)
            .bind(&room.name)
            .bind(room.capacity)
            .bind(room.price_per_hour)
            .bind(room.is_active)
            .bind(&room.description)
            .bind(room.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active(&self) -> Result<Vec<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE is_active = TRUE ORDER BY capacity ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_active(&self, id: &str, is_active: bool) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>("UPDATE rooms SET is_active = $1 WHERE id = $2 RETURNING *")
            .bind(is_active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Room not found".into()))
    }
}
