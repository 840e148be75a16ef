use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{api, config::Config, persistence, state::AppState};

fn test_config() -> Config {
    let mut config = Config::default();
    config.database_path = std::env::temp_dir()
        .join(format!("patrol-test-{}.db", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .to_string();
    config.scale_factor = 10;
    config
}

async fn setup_app_with(config: Config) -> axum::Router {
    let db = persistence::init_database(&config.database_path, config.database_max_connections)
        .await
        .expect("init db");
    let state = Arc::new(AppState::with_database(db, config));
    api::routes().with_state(state)
}

async fn setup_app() -> axum::Router {
    setup_app_with(test_config()).await
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create_estate(app: &axum::Router, length: u32, width: u32) -> String {
    let res = app
        .clone()
        .oneshot(post_json("/estate", json!({ "length": length, "width": width }).to_string()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    read_json(res).await["id"].as_str().expect("estate id").to_string()
}

async fn plant(app: &axum::Router, estate_id: &str, x: u32, y: u32, height: u32) -> StatusCode {
    app.clone()
        .oneshot(post_json(
            &format!("/estate/{}/tree", estate_id),
            json!({ "x": x, "y": y, "height": height }).to_string(),
        ))
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn create_estate_returns_uuid() {
    let app = setup_app().await;
    let id = create_estate(&app, 10, 10).await;
    assert!(uuid::Uuid::parse_str(&id).is_ok());
}

#[tokio::test]
async fn reject_invalid_estate_bodies() {
    let app = setup_app().await;
    let bodies = [
        r#"{"length": "abc", "width": 20}"#,
        r#"{"length": 0, "width": 20}"#,
        r#"{"length": -5, "width": -7}"#,
        r#"{"length": 57000, "width": 80000}"#,
        r#"{"width": 80000}"#,
        r#"{}"#,
        r#"{ adjksfboiasdfhu8798 }"#,
    ];

    for body in bodies {
        let res = app.clone().oneshot(post_json("/estate", body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(read_json(res).await["error"], "Invalid request");
    }
}

#[tokio::test]
async fn plant_tree_and_reject_bad_placements() {
    let app = setup_app().await;
    let estate_id = create_estate(&app, 20, 30).await;

    let res = app
        .clone()
        .oneshot(post_json(
            &format!("/estate/{}/tree", estate_id),
            json!({ "x": 5, "y": 30, "height": 15 }).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(read_json(res).await["id"].is_string());

    // Same cell twice
    assert_eq!(plant(&app, &estate_id, 5, 30, 10).await, StatusCode::BAD_REQUEST);
    // Outside the estate
    assert_eq!(plant(&app, &estate_id, 21, 1, 10).await, StatusCode::BAD_REQUEST);
    assert_eq!(plant(&app, &estate_id, 1, 31, 10).await, StatusCode::BAD_REQUEST);
    // Too tall
    assert_eq!(plant(&app, &estate_id, 1, 1, 31).await, StatusCode::BAD_REQUEST);
    // Malformed estate id
    assert_eq!(plant(&app, "not-a-uuid", 1, 1, 5).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn plant_tree_on_missing_estate_is_not_found() {
    let app = setup_app().await;
    let missing = uuid::Uuid::new_v4().to_string();

    let res = app
        .clone()
        .oneshot(post_json(
            &format!("/estate/{}/tree", missing),
            json!({ "x": 1, "y": 1, "height": 5 }).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(res).await["error"], "Estate not found");
}

#[tokio::test]
async fn stats_summarise_tree_heights() {
    let app = setup_app().await;
    let estate_id = create_estate(&app, 10, 20).await;

    let res = app
        .clone()
        .oneshot(get(&format!("/estate/{}/stats", estate_id)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        read_json(res).await,
        json!({ "count": 0, "max": 0, "min": 0, "median": 0.0 })
    );

    for (x, height) in [(1, 5), (2, 15), (3, 10), (4, 12), (5, 7)] {
        assert_eq!(plant(&app, &estate_id, x, 1, height).await, StatusCode::OK);
    }

    let res = app
        .clone()
        .oneshot(get(&format!("/estate/{}/stats", estate_id)))
        .await
        .unwrap();
    let body = read_json(res).await;
    assert_eq!(body["count"], 5);
    assert_eq!(body["max"], 15);
    assert_eq!(body["min"], 5);
    assert_eq!(body["median"], 10.0);
}

#[tokio::test]
async fn stats_for_missing_estate_is_not_found() {
    let app = setup_app().await;
    let res = app
        .clone()
        .oneshot(get(&format!("/estate/{}/stats", uuid::Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(res).await["error"], "Estate not found");
}

#[tokio::test]
async fn drone_plan_reports_full_distance() {
    let app = setup_app().await;
    let estate_id = create_estate(&app, 5, 1).await;
    for (x, height) in [(1, 5), (2, 2), (3, 1), (4, 5), (5, 3)] {
        assert_eq!(plant(&app, &estate_id, x, 1, height).await, StatusCode::OK);
    }

    let res = app
        .clone()
        .oneshot(get(&format!("/estate/{}/drone-plan", estate_id)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(read_json(res).await, json!({ "distance": 60 }));
}

#[tokio::test]
async fn drone_plan_with_budget_echoes_budget_and_reach() {
    let app = setup_app().await;
    let estate_id = create_estate(&app, 5, 2).await;
    assert_eq!(plant(&app, &estate_id, 5, 1, 5).await, StatusCode::OK);
    assert_eq!(plant(&app, &estate_id, 5, 2, 10).await, StatusCode::OK);

    let res = app
        .clone()
        .oneshot(get(&format!("/estate/{}/drone-plan?max_distance=111", estate_id)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        read_json(res).await,
        json!({ "distance": 111, "rest": { "x": 2, "y": 2 } })
    );

    let res = app
        .clone()
        .oneshot(get(&format!("/estate/{}/drone-plan?max_distance=112", estate_id)))
        .await
        .unwrap();
    assert_eq!(
        read_json(res).await,
        json!({ "distance": 112, "rest": { "x": 1, "y": 2 } })
    );
}

#[tokio::test]
async fn drone_plan_rejects_bad_requests() {
    let app = setup_app().await;
    let estate_id = create_estate(&app, 5, 5).await;

    let res = app
        .clone()
        .oneshot(get(&format!("/estate/{}/drone-plan?max_distance=-1", estate_id)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .clone()
        .oneshot(get(&format!("/estate/{}/drone-plan", uuid::Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(res).await["error"], "Estate not found");
}

#[tokio::test]
async fn drone_plan_refuses_oversized_estates() {
    let mut config = test_config();
    config.max_plan_cells = 100;
    let app = setup_app_with(config).await;
    let estate_id = create_estate(&app, 20, 20).await;

    let res = app
        .clone()
        .oneshot(get(&format!("/estate/{}/drone-plan", estate_id)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn request_id_is_propagated() {
    let app = setup_app().await;

    let req = Request::builder()
        .uri("/health")
        .header("x-request-id", "patrol-req-42")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-request-id"], "patrol-req-42");

    let res = app.clone().oneshot(get("/health")).await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}
