use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use crate::domain::models::communication::NotificationEvent;

pub const JOB_TYPE_NOTIFY: &str = "NOTIFY";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JobPayload {
    pub booking_id: String,
    pub event: NotificationEvent,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Job {
    pub id: String,
    pub job_type: String,
    pub payload: Json<JobPayload>,
    pub execute_at: DateTime<Utc>,
    pub status: String, // PENDING -> PROCESSING -> COMPLETED | FAILED
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn notify(booking_id: String, event: NotificationEvent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            job_type: JOB_TYPE_NOTIFY.to_string(),
            payload: Json(JobPayload { booking_id, event }),
            execute_at: now,
            status: "PENDING".to_string(),
            error_message: None,
            created_at: now,
        }
    }
}
