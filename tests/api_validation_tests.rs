// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API input validation tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_calendar_invalid_date_format() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", false, &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/calendar?start=invalid-date&end=2024-03-31")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_calendar_period_too_long() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", false, &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/calendar?start=2024-01-01&end=2026-01-01")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_commitment_zero_attendees() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", false, &state.config.jwt_signing_key);

    let body = serde_json::json!({
        "team_id": "downtown",
        "date": "2024-03-05",
        "attendee_count": 0,
        "contact_name": "Pat Doe"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/commitments")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_commitment_empty_contact_name() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", false, &state.config.jwt_signing_key);

    let body = serde_json::json!({
        "team_id": "downtown",
        "date": "2024-03-05",
        "attendee_count": 2,
        "contact_name": ""
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/commitments")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_commitment_malformed_date() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", false, &state.config.jwt_signing_key);

    let body = serde_json::json!({
        "team_id": "downtown",
        "date": "next tuesday",
        "attendee_count": 2,
        "contact_name": "Pat Doe"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/commitments")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
