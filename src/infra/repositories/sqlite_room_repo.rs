use crate::domain::{models::room::Room, ports::RoomRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteRoomRepo {
    pool: SqlitePool,
}

impl SqliteRoomRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl RoomRepository for SqliteRoomRepo {
    async fn create(&self, room: &Room) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (id, name, capacity, price_per_hour, is_active, description, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *"
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
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active(&self) -> Result<Vec<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE is_active = 1 ORDER BY capacity ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_active(&self, id: &str, is_active: bool) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>("UPDATE rooms SET is_active = ? WHERE id = ? RETURNING *")
            .bind(is_active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Room not found".into()))
    }
}
