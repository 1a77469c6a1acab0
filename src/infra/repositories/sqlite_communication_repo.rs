use crate::domain::models::communication::{BusinessProfile, EmailTemplate, MailLog};
use crate::domain::ports::CommunicationRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCommunicationRepo {
    pool: SqlitePool,
}

impl SqliteCommunicationRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl CommunicationRepository for SqliteCommunicationRepo {
    async fn find_template(&self, status: &str, language: &str) -> Result<Option<EmailTemplate>, AppError> {
        sqlx::query_as::<_, EmailTemplate>(
            "SELECT * FROM booking_email_templates WHERE status = ? AND language = ?"
        )
            .bind(status).bind(language)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_templates(&self) -> Result<Vec<EmailTemplate>, AppError> {
        sqlx::query_as::<_, EmailTemplate>(
            "SELECT * FROM booking_email_templates ORDER BY status ASC, language ASC"
        )
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn upsert_template(&self, t: &EmailTemplate) -> Result<EmailTemplate, AppError> {
        sqlx::query_as::<_, EmailTemplate>(
            r#"INSERT INTO booking_email_templates (id, status, language, subject, body_html, enabled, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(status, language) DO UPDATE SET
               subject=excluded.subject,
               body_html=excluded.body_html,
               enabled=excluded.enabled,
               updated_at=excluded.updated_at
               RETURNING *"#
        )
            .bind(&t.id).bind(&t.status).bind(&t.language)
            .bind(&t.subject).bind(&t.body_html).bind(t.enabled).bind(t.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn get_business_profile(&self) -> Result<BusinessProfile, AppError> {
        sqlx::query_as::<_, BusinessProfile>(
            "SELECT company_name, phone, email, updated_at FROM business_settings WHERE id = 1"
        )
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::InternalWithMsg("Business settings row is missing".into()))
    }

    async fn update_business_profile(&self, p: &BusinessProfile) -> Result<BusinessProfile, AppError> {
        sqlx::query_as::<_, BusinessProfile>(
            r#"INSERT INTO business_settings (id, company_name, phone, email, updated_at)
               VALUES (1, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
               company_name=excluded.company_name,
               phone=excluded.phone,
               email=excluded.email,
               updated_at=excluded.updated_at
               RETURNING company_name, phone, email, updated_at"#
        )
            .bind(&p.company_name).bind(&p.phone).bind(&p.email).bind(p.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn log_mail(&self, log: &MailLog) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO mail_logs (id, job_id, recipient, template_id, context_hash, sent_at, status)
             VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&log.id).bind(&log.job_id).bind(&log.recipient)
            .bind(&log.template_id).bind(&log.context_hash).bind(log.sent_at).bind(&log.status)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn has_mail_been_sent(&self, recipient: &str, template_id: &str, context_hash: &str) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM mail_logs WHERE recipient = ? AND template_id = ? AND context_hash = ? AND status = 'SENT'"
        )
            .bind(recipient).bind(template_id).bind(context_hash)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok(count > 0)
    }

    async fn list_logs(&self, recipient: Option<&str>) -> Result<Vec<MailLog>, AppError> {
        sqlx::query_as::<_, MailLog>(
            "SELECT * FROM mail_logs WHERE (? IS NULL OR recipient = ?) ORDER BY sent_at DESC LIMIT 200"
        )
            .bind(recipient)
            .bind(recipient)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
