//! Integration tests for the event endpoints.
//!
//! These tests require a running PostgreSQL instance. Set the
//! TEST_DATABASE_URL environment variable to point at a disposable database;
//! each test creates its own uniquely-named data so tests can run in parallel.

mod common;

use axum::http::{Method, StatusCode};
use tower::util::ServiceExt;
use uuid::Uuid;

use common::*;

#[tokio::test]
async fn test_create_event_returns_enriched_view() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(pool);

    let organizer = register_user(&app, "Olga Organizer", "organizer").await;
    let title = format!("Launch Night {}", Uuid::new_v4().simple());

    let request = json_request_with_auth(
        Method::POST,
        "/api/events",
        serde_json::json!({
            "title": title,
            "description": "Product launch with live demos",
            "date": "2027-03-01T00:00:00Z",
            "time": "19:00",
            "location": "Main Auditorium",
            "category": "Business",
            "maxRegistrations": 25
        }),
        &organizer.token,
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], title.as_str());
    assert_eq!(body["data"]["registrationCount"], 0);
    assert_eq!(body["data"]["isFull"], false);
    assert_eq!(body["data"]["organizer"]["name"], "Olga Organizer");
}

#[tokio::test]
async fn test_get_nonexistent_event_returns_not_found() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(pool);

    let response = app
        .oneshot(get_request(&format!("/api/events/{}", Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_by_non_owner_is_forbidden() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(pool);

    let owner = register_user(&app, "Owner", "organizer").await;
    let other = register_user(&app, "Other Organizer", "organizer").await;
    let event_id = create_test_event(&app, &owner, "Owned Event", "Technology", 10).await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/events/{}", event_id),
        serde_json::json!({ "title": "Hijacked" }),
        &other.token,
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Title is untouched.
    let event = fetch_event(&app, &event_id).await;
    assert_eq!(event["title"], "Owned Event");
}

#[tokio::test]
async fn test_update_by_non_owner_is_forbidden_even_with_invalid_payload() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(pool);

    let owner = register_user(&app, "Owner", "organizer").await;
    let other = register_user(&app, "Other Organizer", "organizer").await;
    let event_id = create_test_event(&app, &owner, "Guarded Event", "Technology", 10).await;

    // maxRegistrations of zero fails validation, but ownership is decided
    // first, so the non-owner sees 403 rather than 400.
    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/events/{}", event_id),
        serde_json::json!({ "maxRegistrations": 0 }),
        &other.token,
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_nonexistent_event_returns_not_found_even_with_invalid_payload() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(pool);

    let organizer = register_user(&app, "Olga Organizer", "organizer").await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/events/{}", Uuid::new_v4()),
        serde_json::json!({ "maxRegistrations": 0 }),
        &organizer.token,
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_owner_update_rejects_invalid_payload() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(pool);

    let owner = register_user(&app, "Owner", "organizer").await;
    let event_id = create_test_event(&app, &owner, "Capped Event", "Technology", 10).await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/events/{}", event_id),
        serde_json::json!({ "maxRegistrations": 0 }),
        &owner.token,
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_partial_update_applies_only_provided_fields() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(pool);

    let owner = register_user(&app, "Owner", "organizer").await;
    let event_id = create_test_event(&app, &owner, "Original Title", "Technology", 10).await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/events/{}", event_id),
        serde_json::json!({ "title": "Renamed Title", "maxRegistrations": 40 }),
        &owner.token,
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let event = fetch_event(&app, &event_id).await;
    assert_eq!(event["title"], "Renamed Title");
    assert_eq!(event["maxRegistrations"], 40);
    assert_eq!(event["category"], "Technology");
    assert_eq!(event["location"], "Community Hall");
}

#[tokio::test]
async fn test_delete_by_non_owner_is_forbidden() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(pool);

    let owner = register_user(&app, "Owner", "organizer").await;
    let other = register_user(&app, "Other Organizer", "organizer").await;
    let event_id = create_test_event(&app, &owner, "Protected Event", "Technology", 10).await;

    let request = request_with_auth(
        Method::DELETE,
        &format!("/api/events/{}", event_id),
        &other.token,
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Still there.
    fetch_event(&app, &event_id).await;
}

#[tokio::test]
async fn test_delete_removes_event() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(pool);

    let owner = register_user(&app, "Owner", "organizer").await;
    let event_id = create_test_event(&app, &owner, "Short-lived Event", "Technology", 10).await;

    let request = request_with_auth(
        Method::DELETE,
        &format!("/api/events/{}", event_id),
        &owner.token,
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Event deleted successfully");

    let response = app
        .oneshot(get_request(&format!("/api/events/{}", event_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_treats_empty_filter_params_as_no_filter() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(pool);

    let organizer = register_user(&app, "Olga Organizer", "organizer").await;
    let marker = Uuid::new_v4().simple().to_string();
    let title = format!("Open Day {}", marker);
    create_test_event(&app, &organizer, &title, "Community", 10).await;

    // `?category=` must not become a filter matching the empty string.
    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/events?category=&search={}",
            marker
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["title"], title.as_str());
}

#[tokio::test]
async fn test_list_search_matches_title_case_insensitively() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(pool);

    let organizer = register_user(&app, "Olga Organizer", "organizer").await;
    let marker = Uuid::new_v4().simple().to_string();
    let matching_title = format!("TechTalk {}", marker);
    let other_title = format!("Garden Party {}", marker);
    create_test_event(&app, &organizer, &matching_title, "Technology", 10).await;
    create_test_event(&app, &organizer, &other_title, "Community", 10).await;

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/events?search=techtalk%20{}", marker)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["title"], matching_title.as_str());
}

#[tokio::test]
async fn test_list_category_filter_excludes_other_categories() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(pool);

    let organizer = register_user(&app, "Olga Organizer", "organizer").await;
    let marker = Uuid::new_v4().simple().to_string();
    create_test_event(&app, &organizer, &format!("Conf {}", marker), "Technology", 10).await;
    create_test_event(&app, &organizer, &format!("Picnic {}", marker), "Community", 10).await;

    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/events?category=Technology&search={}",
            marker
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["category"], "Technology");
}

#[tokio::test]
async fn test_my_events_lists_only_own_events() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(pool);

    let one = register_user(&app, "First Organizer", "organizer").await;
    let two = register_user(&app, "Second Organizer", "organizer").await;
    let own_id = create_test_event(&app, &one, "Mine", "Technology", 10).await;
    let foreign_id = create_test_event(&app, &two, "Theirs", "Technology", 10).await;

    let response = app
        .oneshot(request_with_auth(
            Method::GET,
            "/api/events/organizer/my-events",
            &one.token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&own_id.as_str()));
    assert!(!ids.contains(&foreign_id.as_str()));
}
