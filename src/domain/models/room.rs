use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub capacity: i32,
    pub price_per_hour: i32,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(name: String, capacity: i32, price_per_hour: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            capacity,
            price_per_hour,
            is_active: true,
            description: None,
            created_at: Utc::now(),
        }
    }

    pub fn can_host(&self, guests: i32) -> bool {
        self.is_active && self.capacity >= guests
    }
}
