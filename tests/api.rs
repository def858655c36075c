use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use oddsforge_probability::api::{create_router, MAX_BATCH};
use oddsforge_probability::services::EstimationEngine;

fn router() -> axum::Router {
    create_router(Arc::new(EstimationEngine::default()))
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_running() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn estimate_returns_full_analysis() {
    let body = json!({
        "home": {
            "team": "Northfield",
            "home": { "matches_played": 10, "wins": 7, "draws": 2, "losses": 1, "goals_for": 20, "goals_against": 8 }
        },
        "away": {
            "team": "Southport",
            "away": { "matches_played": 10, "wins": 2, "draws": 3, "losses": 5, "goals_for": 8, "goals_against": 18 }
        }
    });
    let (status, value) = post_json("/estimate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["success"], json!(true));
    let data = &value["data"];
    assert_eq!(data["home_team"], json!("Northfield"));
    assert_eq!(data["estimate"]["expected_goals"], json!("2.70"));
    assert_eq!(data["estimate"]["goals"].as_array().unwrap().len(), 4);
    assert_eq!(data["head_to_head"]["reliability"], json!("none"));
    assert!(!data["suggestions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn estimate_with_empty_body_object_uses_defaults() {
    let (status, value) = post_json("/estimate", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let outcome = &value["data"]["estimate"]["outcome"];
    assert_eq!(outcome["home"], json!("42.0"));
    assert_eq!(outcome["draw"], json!("28.0"));
    assert_eq!(outcome["away"], json!("30.0"));
}

#[tokio::test]
async fn batch_is_capped() {
    let ok = Value::Array(vec![json!({}); 3]);
    let (status, value) = post_json("/estimate/batch", ok).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["data"].as_array().unwrap().len(), 3);

    let too_many = Value::Array(vec![json!({}); MAX_BATCH + 1]);
    let (status, value) = post_json("/estimate/batch", too_many).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["success"], json!(false));
    assert_eq!(value["data"], Value::Null);
    assert!(value["error"].as_str().unwrap().contains("limit of 100"));
}

#[tokio::test]
async fn estimate_survives_extreme_counts() {
    let huge = json!({
        "matches_played": u32::MAX, "wins": u32::MAX, "draws": u32::MAX,
        "losses": u32::MAX, "goals_for": u32::MAX, "goals_against": u32::MAX
    });
    let meetings: Vec<Value> = (1..=6)
        .map(|d| json!({
            "date": format!("2020-01-0{d}"), "home_team": "X", "away_team": "Y",
            "home_goals": u32::MAX, "away_goals": u32::MAX
        }))
        .collect();
    let body = json!({
        "home": { "team": "X", "home": huge.clone() },
        "away": { "team": "Y", "away": huge },
        "head_to_head": meetings
    });
    let (status, value) = post_json("/estimate", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["data"]["head_to_head"]["draws"], json!(6));
}
