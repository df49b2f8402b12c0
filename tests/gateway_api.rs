//! HTTP boundary tests, driving the router in-process

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use trade_settlement::gateway::{router, state::AppState};
use trade_settlement::{Database, SettlementEngine, TradeQueue};

async fn setup() -> (Database, Router) {
    let db = Database::in_memory().await.unwrap();
    db.init_schema().await.unwrap();
    let app = router(Arc::new(AppState::new(db.clone())));
    (db, app)
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/trades")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn post_valid_trade_is_queued() {
    let (db, app) = setup().await;
    let body = json!({
        "account": "123",
        "symbol": "EURUSD",
        "volume": 1.0,
        "open": 1.1,
        "close": 1.2,
        "side": "buy"
    });

    let response = app.oneshot(post_json(&body.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["code"], 0);
    let trade_id = json["data"]["trade_id"].as_i64().unwrap();

    let stored = TradeQueue::get(db.pool(), trade_id).await.unwrap().unwrap();
    assert_eq!(stored.account, "123");
    assert!(!stored.processed);
}

#[tokio::test]
async fn post_empty_object_is_rejected() {
    let (db, app) = setup().await;
    let response = app.oneshot(post_json("{}")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], 1001);
    assert_eq!(TradeQueue::pending_count(db.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn post_malformed_json_is_rejected() {
    let (db, app) = setup().await;
    let response = app.oneshot(post_json("{not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["msg"], "invalid trade data");
    assert_eq!(TradeQueue::pending_count(db.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn post_wrong_field_type_is_rejected() {
    let (_db, app) = setup().await;
    let body = r#"{"account":"a","symbol":"EURUSD","volume":"lots","open":1,"close":2,"side":"buy"}"#;
    let response = app.oneshot(post_json(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_invalid_symbol_names_the_field() {
    let (db, app) = setup().await;
    let body = json!({
        "account": "a",
        "symbol": "eurusd",
        "volume": 1.0,
        "open": 1.0,
        "close": 2.0,
        "side": "buy"
    });
    let response = app.oneshot(post_json(&body.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["msg"], "invalid fields: symbol");
    assert_eq!(TradeQueue::pending_count(db.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn get_on_trades_is_method_not_allowed() {
    let (_db, app) = setup().await;
    let response = app.oneshot(get("/trades")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn stats_for_unknown_account_are_zero() {
    let (_db, app) = setup().await;
    let response = app.oneshot(get("/stats/nobody")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"account": "nobody", "trades": 0, "profit": 0.0})
    );
}

#[tokio::test]
async fn stats_reflect_settled_trades() {
    let (db, app) = setup().await;
    let body = json!({
        "account": "b",
        "symbol": "EURUSD",
        "volume": 10.0,
        "open": 1.0,
        "close": 2.0,
        "side": "buy"
    });
    let response = app
        .clone()
        .oneshot(post_json(&body.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Queued but not yet settled
    let response = app.clone().oneshot(get("/stats/b")).await.unwrap();
    assert_eq!(body_json(response).await["trades"], 0);

    SettlementEngine::new(db.clone()).drain().await.unwrap();

    let response = app.oneshot(get("/stats/b")).await.unwrap();
    assert_eq!(
        body_json(response).await,
        json!({"account": "b", "trades": 1, "profit": 1000000.0})
    );
}

#[tokio::test]
async fn healthz_ok_when_store_reachable() {
    let (_db, app) = setup().await;
    let response = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["code"], 0);
}

#[tokio::test]
async fn healthz_unavailable_when_store_closed() {
    let (db, app) = setup().await;
    db.close().await;

    let response = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], 5001);
    assert_eq!(json["msg"], "unavailable");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (_db, app) = setup().await;
    let response = app.oneshot(get("/api-docs/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["paths"]["/trades"].is_object());
}
