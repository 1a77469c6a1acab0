mod common;

use axum::http::StatusCode;
use chrono::Weekday;
use common::{upcoming, FailingEmailService, TestApp, FALLBACK_EMAIL};
use karaoke_booking::background::process_pending_jobs;
use karaoke_booking::domain::models::communication::NotificationEvent;
use karaoke_booking::domain::models::job::Job;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_created_booking_sends_default_template() {
    let app = TestApp::new().await;
    app.seed_room("Quartet", 4, 50).await;
    let date = upcoming(Weekday::Sun);
    let booking = app.book(date, "20:00", 2, 4, Some("dana@example.com")).await;
    let code = booking["booking_code"].as_str().unwrap();

    assert_eq!(process_pending_jobs(&app.state).await, 1);

    let sent = app.emails.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "dana@example.com");
    assert_eq!(sent[0].subject, format!("אישור שריון הזמנה - {}", code));
    assert!(sent[0].html_body.contains(code));
    assert!(sent[0].html_body.contains("K-Box"));

    let jobs = app.state.job_repo.list_for_booking(booking["id"].as_str().unwrap()).await.unwrap();
    assert_eq!(jobs[0].status, "COMPLETED");

    // Nothing left to do.
    assert_eq!(process_pending_jobs(&app.state).await, 0);
}

#[tokio::test]
async fn test_missing_email_goes_to_front_desk() {
    let app = TestApp::new().await;
    app.seed_room("Quartet", 4, 50).await;
    app.book(upcoming(Weekday::Mon), "19:00", 1, 2, None).await;

    process_pending_jobs(&app.state).await;

    let sent = app.emails.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, FALLBACK_EMAIL);
}

#[tokio::test]
async fn test_status_change_uses_stored_template() {
    let app = TestApp::new().await;
    app.seed_room("Quartet", 4, 50).await;

    let (status, saved) = app.admin_put("/api/v1/admin/email-templates/approved/he", json!({
        "subject": "See you soon, {{ customer_name }}",
        "bodyHtml": "<p>{{ booking_code }} at {{ start_time }}-{{ end_time }}, {{ business.name }}</p>",
    })).await;
    assert_eq!(status, StatusCode::OK, "{}", saved);
    assert_eq!(saved["enabled"], true);

    let booking = app.book(upcoming(Weekday::Thu), "22:00", 2, 3, Some("dana@example.com")).await;
    let id = booking["id"].as_str().unwrap();
    app.admin_put(&format!("/api/v1/admin/bookings/{}/status", id), json!({ "status": "approved" })).await;

    assert_eq!(process_pending_jobs(&app.state).await, 2);

    let sent = app.emails.sent();
    let approved = sent.iter().find(|m| m.subject.starts_with("See you soon")).expect("approved email");
    assert_eq!(approved.subject, "See you soon, Dana Levi");
    assert!(approved.html_body.contains("22:00-00:00"));
    assert!(approved.html_body.contains(booking["booking_code"].as_str().unwrap()));

    let (_, templates) = app.admin_get("/api/v1/admin/email-templates").await;
    assert_eq!(templates.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_disabled_template_falls_back_to_default() {
    let app = TestApp::new().await;
    app.seed_room("Quartet", 4, 50).await;

    app.admin_put("/api/v1/admin/email-templates/pending/he", json!({
        "subject": "Custom pending",
        "bodyHtml": "<p>custom</p>",
        "enabled": false,
    })).await;

    let booking = app.book(upcoming(Weekday::Tue), "20:00", 1, 2, Some("dana@example.com")).await;
    process_pending_jobs(&app.state).await;

    let sent = app.emails.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, format!("אישור שריון הזמנה - {}", booking["booking_code"].as_str().unwrap()));
}

#[tokio::test]
async fn test_template_validation() {
    let app = TestApp::new().await;

    let (status, _) = app.admin_put("/api/v1/admin/email-templates/pending/he", json!({
        "subject": "Hi {{ customer_name",
        "bodyHtml": "<p></p>",
    })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.admin_put("/api/v1/admin/email-templates/unknown/he", json!({
        "subject": "Hi",
        "bodyHtml": "<p></p>",
    })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.admin_put("/api/v1/admin/email-templates/pending/he", json!({
        "subject": " ",
        "bodyHtml": "<p></p>",
    })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_repeated_notification_is_skipped() {
    let app = TestApp::new().await;
    app.seed_room("Quartet", 4, 50).await;
    let booking = app.book(upcoming(Weekday::Wed), "20:00", 1, 2, Some("dana@example.com")).await;
    let id = booking["id"].as_str().unwrap().to_string();

    process_pending_jobs(&app.state).await;

    // A retried job renders the same context and must not mail twice.
    let job = Job::notify(id, NotificationEvent::Created);
    sqlx::query("INSERT INTO jobs (id, job_type, payload, execute_at, status, error_message, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)")
        .bind(&job.id)
        .bind(&job.job_type)
        .bind(&job.payload)
        .bind(job.execute_at)
        .bind(&job.status)
        .bind(&job.error_message)
        .bind(job.created_at)
        .execute(&app.pool)
        .await
        .expect("Failed to seed job");
    process_pending_jobs(&app.state).await;

    assert_eq!(app.emails.sent().len(), 1);

    let (status, logs) = app.admin_get("/api/v1/admin/mail-logs?recipient=dana@example.com").await;
    assert_eq!(status, StatusCode::OK);
    let mut statuses: Vec<String> = logs.as_array().unwrap()
        .iter()
        .map(|l| l["status"].as_str().unwrap().to_string())
        .collect();
    statuses.sort();
    assert_eq!(statuses, vec!["SENT", "SKIPPED_DUPLICATE"]);
}

#[tokio::test]
async fn test_mail_failure_does_not_fail_booking() {
    let app = TestApp::with_email_service(Arc::new(FailingEmailService)).await;
    app.seed_room("Quartet", 4, 50).await;

    let booking = app.book(upcoming(Weekday::Sun), "20:00", 1, 2, Some("dana@example.com")).await;
    process_pending_jobs(&app.state).await;

    let jobs = app.state.job_repo.list_for_booking(booking["id"].as_str().unwrap()).await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].status, "FAILED");
    assert!(jobs[0].error_message.as_deref().unwrap_or_default().contains("mail relay unreachable"));

    let stored = app.state.booking_repo.find_by_id(booking["id"].as_str().unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.status, "pending");

    let (_, logs) = app.admin_get("/api/v1/admin/mail-logs").await;
    assert!(logs.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_business_profile_flows_into_messages() {
    let app = TestApp::new().await;
    app.seed_room("Quartet", 4, 50).await;

    let (status, profile) = app.admin_get("/api/v1/admin/business-profile").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["company_name"], "K-Box");

    let (status, profile) = app.admin_put("/api/v1/admin/business-profile", json!({
        "companyName": "Sing Sing TLV",
        "phone": "03-5551234",
        "email": "hello@singsing.test",
    })).await;
    assert_eq!(status, StatusCode::OK, "{}", profile);
    assert_eq!(profile["company_name"], "Sing Sing TLV");

    let (status, _) = app.admin_put("/api/v1/admin/business-profile", json!({ "companyName": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.book(upcoming(Weekday::Mon), "20:00", 1, 2, Some("dana@example.com")).await;
    process_pending_jobs(&app.state).await;

    let sent = app.emails.sent();
    assert!(sent[0].html_body.contains("Sing Sing TLV"));
}
