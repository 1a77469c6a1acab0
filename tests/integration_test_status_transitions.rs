mod common;

use axum::{body::Body, http::{header, Request, StatusCode}};
use chrono::Weekday;
use common::{booking_payload, mint_token, mint_token_with, parse_body, upcoming, TestApp};
use karaoke_booking::domain::models::booking::BookingStatus;
use karaoke_booking::domain::models::communication::NotificationEvent;
use serde_json::json;
use tower::ServiceExt;

async fn set_status(app: &TestApp, id: &str, status: &str) -> (StatusCode, serde_json::Value) {
    app.admin_put(&format!("/api/v1/admin/bookings/{}/status", id), json!({ "status": status })).await
}

#[tokio::test]
async fn test_approve_then_complete() {
    let app = TestApp::new().await;
    app.seed_room("Quartet", 4, 50).await;
    let date = upcoming(Weekday::Sun);
    let booking = app.book(date, "20:00", 2, 4, None).await;
    let id = booking["id"].as_str().unwrap();

    let (status, body) = set_status(&app, id, "approved").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "approved");
    assert_eq!(body["approved_by"], "admin-1");

    let (status, body) = set_status(&app, id, "completed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let events: Vec<NotificationEvent> = app.state.job_repo.list_for_booking(id).await.unwrap()
        .into_iter()
        .map(|j| j.payload.event)
        .collect();
    assert_eq!(events, vec![NotificationEvent::Created, NotificationEvent::Approved]);
}

#[tokio::test]
async fn test_terminal_and_backward_transitions_rejected() {
    let app = TestApp::new().await;
    app.seed_room("Quartet", 4, 50).await;
    let date = upcoming(Weekday::Mon);
    let booking = app.book(date, "20:00", 1, 2, None).await;
    let id = booking["id"].as_str().unwrap();

    let (status, body) = set_status(&app, id, "completed").await;
    assert_eq!(status, StatusCode::CONFLICT, "pending cannot complete");
    assert_eq!(body["code"], "INVALID_TRANSITION");

    let (status, _) = set_status(&app, id, "cancelled").await;
    assert_eq!(status, StatusCode::OK);

    for next in ["pending", "approved", "waitlisted", "completed"] {
        let (status, body) = set_status(&app, id, next).await;
        assert_eq!(status, StatusCode::CONFLICT, "cancelled -> {}", next);
        assert_eq!(body["code"], "INVALID_TRANSITION");
    }

    let (status, _) = set_status(&app, id, "archived").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = set_status(&app, "missing-id", "approved").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_waitlisted_reapproval_hits_overlap() {
    let app = TestApp::new().await;
    app.seed_room("Quartet", 4, 50).await;
    let date = upcoming(Weekday::Tue);

    let first = app.book(date, "20:00", 2, 4, None).await;
    let first_id = first["id"].as_str().unwrap();
    let (status, _) = set_status(&app, first_id, "waitlisted").await;
    assert_eq!(status, StatusCode::OK);

    // Waitlisted bookings do not hold the room.
    app.book(date, "21:00", 2, 4, None).await;

    let (status, body) = set_status(&app, first_id, "approved").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "SLOT_UNAVAILABLE");

    let stored = app.state.booking_repo.find_by_id(first_id).await.unwrap().unwrap();
    assert_eq!(stored.status, "waitlisted");

    let events: Vec<NotificationEvent> = app.state.job_repo.list_for_booking(first_id).await.unwrap()
        .into_iter()
        .map(|j| j.payload.event)
        .collect();
    assert_eq!(events, vec![NotificationEvent::Created, NotificationEvent::Waitlisted]);
}

#[tokio::test]
async fn test_stale_compare_and_set_is_a_no_op() {
    let app = TestApp::new().await;
    app.seed_room("Quartet", 4, 50).await;
    let date = upcoming(Weekday::Wed);
    let booking = app.book(date, "20:00", 1, 2, None).await;
    let id = booking["id"].as_str().unwrap();

    let result = app.state.booking_repo
        .transition_status(id, BookingStatus::Approved, BookingStatus::Completed, None, vec![])
        .await
        .unwrap();
    assert!(result.is_none());

    let stored = app.state.booking_repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.status, "pending");
}

#[tokio::test]
async fn test_admin_listing_filters() {
    let app = TestApp::new().await;
    app.seed_room("Quartet", 4, 50).await;
    let sunday = upcoming(Weekday::Sun);
    let monday = upcoming(Weekday::Mon);

    let a = app.book(sunday, "18:00", 1, 2, None).await;
    app.book(sunday, "20:00", 1, 2, None).await;
    app.book(monday, "19:00", 1, 2, None).await;
    set_status(&app, a["id"].as_str().unwrap(), "approved").await;

    let (status, all) = app.admin_get("/api/v1/admin/bookings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, on_sunday) = app.admin_get(&format!("/api/v1/admin/bookings?date={}", sunday.format("%Y-%m-%d"))).await;
    let on_sunday = on_sunday.as_array().unwrap();
    assert_eq!(on_sunday.len(), 2);
    assert_eq!(on_sunday[0]["start_time"], "18:00");

    let (_, approved) = app.admin_get("/api/v1/admin/bookings?status=approved").await;
    assert_eq!(approved.as_array().unwrap().len(), 1);

    let (_, page) = app.admin_get("/api/v1/admin/bookings?limit=1&offset=1").await;
    assert_eq!(page.as_array().unwrap().len(), 1);

    let (status, one) = app.admin_get(&format!("/api/v1/admin/bookings/{}", a["id"].as_str().unwrap())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["booking_code"], a["booking_code"]);
}

#[tokio::test]
async fn test_admin_routes_require_admin_token() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/api/v1/admin/bookings").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let staff = mint_token("staff", "user-7");
    let (status, _) = app.request("GET", "/api/v1/admin/bookings", None, Some(&staff)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let foreign = mint_token_with("admin", "admin-1", "some-other-app", None);
    let (status, _) = app.request("GET", "/api/v1/admin/bookings", None, Some(&foreign)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request("GET", "/api/v1/admin/bookings", None, Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_token_needs_csrf_on_writes() {
    let app = TestApp::new().await;
    app.seed_room("Quartet", 4, 50).await;
    let date = upcoming(Weekday::Thu);
    let (_, booking) = app.post("/api/v1/bookings", booking_payload(date, "20:00", 1, 2, None)).await;
    let uri = format!("/api/v1/admin/bookings/{}/status", booking["id"].as_str().unwrap());
    let token = mint_token_with("admin", "admin-2", common::TEST_AUDIENCE, Some("csrf-123"));

    // Reads need no CSRF header.
    let res = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/admin/bookings")
            .header(header::COOKIE, format!("access_token={}", token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(&uri)
            .header(header::COOKIE, format!("access_token={}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "status": "approved" }).to_string()))
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(&uri)
            .header(header::COOKIE, format!("access_token={}", token))
            .header("X-CSRF-Token", "csrf-123")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "status": "approved" }).to_string()))
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["approved_by"], "admin-2");
}
