//! Integration tests for the stateless HTTP adapter

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use marion::core::{create_router, DomainRouter, FixedClock, Mediator};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tower::ServiceExt;

fn create_test_router() -> axum::Router {
    create_router(
        Mediator::new().with_clock(FixedClock(1_700_000_000_000)),
        DomainRouter::new(),
    )
}

async fn post(uri: &str, body: &'static str) -> (StatusCode, Value) {
    let response = create_test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = create_test_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_mediate_endpoint() {
    let (status, json) = post(
        "/mediate",
        r#"{"turn": {"action": "top10", "year": 1988}, "session": {}, "options": {"nowMs": 7}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "ADVANCE");
    assert_eq!(json["latentDesire"], "authority");
    assert_eq!(json["marionState"], "DELIVER");
    assert_eq!(json["telemetry"]["tsMs"], 7);
    assert_eq!(json["sessionUpdate"]["turnsSinceAdvance"], 0);
    assert!(json["errorCode"].is_null());
}

#[tokio::test]
async fn test_mediate_uses_injected_clock() {
    let (_, json) = post("/mediate", r#"{"turn": {"text": "hi"}}"#).await;
    assert_eq!(json["telemetry"]["tsMs"], 1_700_000_000_000i64);
    assert_eq!(json["telemetry"]["event"], "marion.mediation");
}

/// Garbage bodies still produce a full Cognition
#[tokio::test]
async fn test_malformed_body_is_ok() {
    let (status, json) = post("/mediate", "this is not json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["mode"].is_string());
    assert!(json["trace"].as_str().unwrap().len() <= 160);

    let (status, json) = post("/route", "[1, 2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["primary"], "core");
}

#[tokio::test]
async fn test_route_endpoint() {
    let (status, json) = post(
        "/route",
        r#"{"turn": {"text": "breach and ransomware everywhere", "lane": "cyber"},
            "cognition": {"mode": "architect", "intent": "CLARIFY", "riskTier": "low"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["primary"], "cyber");
    assert!(json["reason"]["signals"].as_array().unwrap().len() <= 10);
}

#[tokio::test]
async fn test_turn_endpoint_with_host_risk() {
    let (status, json) = post(
        "/turn",
        r#"{"turn": {"text": "breach and ransomware everywhere", "lane": "cyber"},
            "riskTier": "high"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cognition"]["riskTier"], "high");
    assert_ne!(json["routing"]["primary"], "cyber");
}

#[tokio::test]
async fn test_turn_endpoint_never_echoes_text() {
    let (_, json) = post(
        "/turn",
        r#"{"turn": {"text": "my secret is Quetzalcoatl", "lane": "music"}}"#,
    )
    .await;
    assert!(!json.to_string().contains("Quetzalcoatl"));
}
