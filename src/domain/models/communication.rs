use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use crate::domain::models::booking::BookingStatus;

/// Booking lifecycle moments that produce a customer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationEvent {
    Created,
    Approved,
    Cancelled,
    Waitlisted,
}

impl NotificationEvent {
    /// Event emitted when a booking enters `status`, if that status notifies anyone.
    pub fn for_status(status: BookingStatus) -> Option<Self> {
        match status {
            BookingStatus::Approved => Some(NotificationEvent::Approved),
            BookingStatus::Cancelled => Some(NotificationEvent::Cancelled),
            BookingStatus::Waitlisted => Some(NotificationEvent::Waitlisted),
            BookingStatus::Pending | BookingStatus::Completed => None,
        }
    }

    /// Template key. A freshly created booking uses whatever status it was stored with.
    pub fn template_status(&self, current: &str) -> String {
        match self {
            NotificationEvent::Created => current.to_string(),
            NotificationEvent::Approved => "approved".to_string(),
            NotificationEvent::Cancelled => "cancelled".to_string(),
            NotificationEvent::Waitlisted => "waitlisted".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EmailTemplate {
    pub id: String,
    pub status: String,
    pub language: String,
    pub subject: String,
    pub body_html: String,
    pub enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl EmailTemplate {
    pub fn new(status: String, language: String, subject: String, body_html: String, enabled: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            status,
            language,
            subject,
            body_html,
            enabled,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BusinessProfile {
    pub company_name: String,
    pub phone: String,
    pub email: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct MailLog {
    pub id: String,
    pub job_id: String,
    pub recipient: String,
    pub template_id: String,
    pub context_hash: String,
    pub sent_at: DateTime<Utc>,
    pub status: String,
}

impl MailLog {
    pub fn new(job_id: &str, recipient: &str, template_id: &str, context_hash: &str, status: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_id: job_id.to_string(),
            recipient: recipient.to_string(),
            template_id: template_id.to_string(),
            context_hash: context_hash.to_string(),
            sent_at: Utc::now(),
            status: status.to_string(),
        }
    }
}
