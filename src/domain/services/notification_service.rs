use std::sync::Arc;
use async_trait::async_trait;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tera::{Context, Tera};
use tracing::{info, warn};

use crate::domain::models::booking::{hour_label, Booking};
use crate::domain::models::communication::{BusinessProfile, MailLog, NotificationEvent};
use crate::domain::ports::{CommunicationRepository, EmailService, Notifier};
use crate::domain::services::defaults::get_default_template;
use crate::error::AppError;

pub fn build_context(booking: &Booking, status: &str, business: &BusinessProfile) -> Value {
    json!({
        "booking_code": booking.booking_code,
        "booking_date": booking.booking_date.format("%Y-%m-%d").to_string(),
        "start_time": hour_label(booking.start_hour),
        "end_time": hour_label(booking.end_hour),
        "duration_hours": booking.duration_hours,
        "room_id": booking.room_id,
        "customer_name": booking.customer_name,
        "customer_phone": booking.customer_phone,
        "customer_email": booking.customer_email.clone().unwrap_or_default(),
        "price_total": booking.price_total,
        "guest_count": booking.guest_count,
        "notes": booking.notes.clone().unwrap_or_default(),
        "status": status,
        "business": {
            "name": business.company_name,
            "phone": business.phone,
            "email": business.email,
        },
    })
}

pub fn context_hash(template_key: &str, context: &Value) -> String {
    let context_json = serde_json::to_string(context).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(template_key.as_bytes());
    hasher.update(context_json.as_bytes());
    hex::encode(hasher.finalize())
}

/// Renders `(subject, body)`. The body is HTML-escaped, the subject is not.
pub fn render_message(subject_src: &str, body_src: &str, context: &Value) -> Result<(String, String), AppError> {
    let context = Context::from_value(context.clone())
        .map_err(|e| AppError::InternalWithMsg(format!("Invalid template context: {:?}", e)))?;

    let mut tera = Tera::default();
    tera.add_raw_template("subject.txt", subject_src)
        .map_err(|e| AppError::InternalWithMsg(format!("Tera subject parse error: {:?}", e)))?;
    tera.add_raw_template("body.html", body_src)
        .map_err(|e| AppError::InternalWithMsg(format!("Tera parse error: {:?}", e)))?;

    let subject = tera.render("subject.txt", &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Tera subject render error: {:?}", e)))?;
    let body = tera.render("body.html", &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Tera render error: {:?}", e)))?;

    Ok((subject.trim().to_string(), body))
}

/// Parses both sources without rendering, for validating admin edits.
pub fn check_template_syntax(subject_src: &str, body_src: &str) -> Result<(), AppError> {
    let mut tera = Tera::default();
    tera.add_raw_template("subject.txt", subject_src)
        .map_err(|e| AppError::Validation(format!("Subject template does not parse: {}", e)))?;
    tera.add_raw_template("body.html", body_src)
        .map_err(|e| AppError::Validation(format!("Body template does not parse: {}", e)))?;
    Ok(())
}

/// Emails the customer (or the fallback inbox) using the stored template for
/// the status, falling back to the built-in one.
pub struct EmailNotifier {
    repo: Arc<dyn CommunicationRepository>,
    email_service: Arc<dyn EmailService>,
    fallback_recipient: String,
    language: String,
}

impl EmailNotifier {
    pub fn new(
        repo: Arc<dyn CommunicationRepository>,
        email_service: Arc<dyn EmailService>,
        fallback_recipient: String,
        language: String,
    ) -> Self {
        Self { repo, email_service, fallback_recipient, language }
    }

    fn recipient<'a>(&'a self, booking: &'a Booking) -> &'a str {
        booking.customer_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(&self.fallback_recipient)
    }

    async fn load_template(&self, status: &str) -> Result<(String, String, String), AppError> {
        match self.repo.find_template(status, &self.language).await? {
            Some(t) if t.enabled => Ok((format!("{}:{}", t.status, t.language), t.subject, t.body_html)),
            _ => {
                let (subject, body) = get_default_template(status);
                Ok((format!("default:{}", status), subject, body))
            }
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, job_id: &str, booking: &Booking, event: NotificationEvent) -> Result<(), AppError> {
        let recipient = self.recipient(booking);
        let status = event.template_status(&booking.status);

        let (template_key, subject_src, body_src) = self.load_template(&status).await?;
        let business = self.repo.get_business_profile().await?;
        let context = build_context(booking, &status, &business);
        let hash = context_hash(&template_key, &context);

        if self.repo.has_mail_been_sent(recipient, &template_key, &hash).await? {
            info!("Email skipped (idempotency) for job {}. Recipient: {}, Template: {}", job_id, recipient, template_key);
            self.repo.log_mail(&MailLog::new(job_id, recipient, &template_key, &hash, "SKIPPED_DUPLICATE")).await?;
            return Ok(());
        }

        let (subject, body) = render_message(&subject_src, &body_src, &context)?;

        info!("Sending {} email for booking {} to {}", status, booking.booking_code, recipient);
        self.email_service.send(recipient, &subject, &body).await.map_err(|e| {
            warn!("Email delivery failed for booking {}: {}", booking.booking_code, e);
            match e {
                AppError::Notifier(_) => e,
                other => AppError::Notifier(other.to_string()),
            }
        })?;

        self.repo.log_mail(&MailLog::new(job_id, recipient, &template_key, &hash, "SENT")).await?;
        Ok(())
    }
}
