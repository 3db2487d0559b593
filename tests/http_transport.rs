//! HTTP binding exercised in-process.

mod support;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use binance_mcp::transport::http::handler::AppState;
use binance_mcp::transport::http::router;
use binance_mcp::transport::TransportMode;
use serde_json::{json, Value};
use std::time::Duration;
use support::{StubUpstream, STALLED_SYMBOL};
use tower::ServiceExt;

fn app(base_url: &str, max_sessions: usize) -> Router {
    let (handler, _) = support::handler(base_url, TransportMode::Http);
    router(AppState::new(handler, max_sessions))
}

fn post(body: Value, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(session) = session {
        builder = builder.header("mcp-session-id", session);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn initialize(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post(
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let session = response
        .headers()
        .get("mcp-session-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let body = json_body(response).await;
    assert_eq!(body["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(body["result"]["sessionId"], session.as_str());
    session
}

#[tokio::test]
async fn test_session_lifecycle() {
    let upstream = StubUpstream::start().await;
    let app = app(&upstream.base_url, 50);
    let session = initialize(&app).await;

    let response = app
        .clone()
        .oneshot(post(
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            Some(&session),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .clone()
        .oneshot(post(
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
            Some(&session),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let names: Vec<&str> = body["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"get_recent_logs"));

    let response = app
        .clone()
        .oneshot(post(
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": {"name": "get_price", "arguments": {"symbol": "eth"}}
            }),
            Some(&session),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(
        body["result"]["content"][0]["text"],
        "The current price of ETHUSDT is 50000.00"
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/mcp")
                .header("mcp-session-id", &session)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(post(
            json!({"jsonrpc": "2.0", "id": 4, "method": "ping"}),
            Some(&session),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_session_rejected() {
    let upstream = StubUpstream::start().await;
    let app = app(&upstream.base_url, 50);

    let response = app
        .oneshot(post(
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], -32002);
}

#[tokio::test]
async fn test_unknown_session_rejected() {
    let upstream = StubUpstream::start().await;
    let app = app(&upstream.base_url, 50);

    let response = app
        .oneshot(post(
            json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}),
            Some("6f1c1f7e-9a0b-4c1d-8e2f-3a4b5c6d7e8f"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_limit() {
    let upstream = StubUpstream::start().await;
    let app = app(&upstream.base_url, 1);
    initialize(&app).await;

    let response = app
        .oneshot(post(
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], -32000);
}

#[tokio::test]
async fn test_malformed_body() {
    let upstream = StubUpstream::start().await;
    let app = app(&upstream.base_url, 50);

    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], -32700);
    assert!(body["id"].is_null());
}

#[tokio::test]
async fn test_method_errors_stay_in_body() {
    let upstream = StubUpstream::start().await;
    let app = app(&upstream.base_url, 50);
    let session = initialize(&app).await;

    let response = app
        .oneshot(post(
            json!({
                "jsonrpc": "2.0",
                "id": 9,
                "method": "tools/call",
                "params": {"name": "get_rolling_windows_price", "arguments": {"symbol": "btc", "window": "8d"}}
            }),
            Some(&session),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], 9);
    assert_eq!(body["error"]["code"], -32602);
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stalled_upstream_does_not_block_other_requests() {
    let upstream = StubUpstream::start().await;
    let app = app(&upstream.base_url, 50);
    let session = initialize(&app).await;

    let stalled = tokio::spawn({
        let app = app.clone();
        let session = session.clone();
        async move {
            app.oneshot(post(
                json!({
                    "jsonrpc": "2.0",
                    "id": 2,
                    "method": "tools/call",
                    "params": {"name": "get_price", "arguments": {"symbol": STALLED_SYMBOL}}
                }),
                Some(&session),
            ))
            .await
        }
    });

    tokio::time::timeout(Duration::from_secs(5), async {
        while upstream.hits() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("stalled request never reached the upstream");

    let price = tokio::time::timeout(
        Duration::from_secs(5),
        app.clone().oneshot(post(
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": {"name": "get_price", "arguments": {"symbol": "btc"}}
            }),
            Some(&session),
        )),
    )
    .await
    .expect("price lookup waited on the stalled request")
    .unwrap();
    assert_eq!(price.status(), StatusCode::OK);
    let body = json_body(price).await;
    assert!(body["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("BTCUSDT"));

    let log = tokio::time::timeout(
        Duration::from_secs(5),
        app.clone().oneshot(post(
            json!({
                "jsonrpc": "2.0",
                "id": 4,
                "method": "resources/read",
                "params": {"uri": "memory://activity_log"}
            }),
            Some(&session),
        )),
    )
    .await
    .expect("activity log read waited on the stalled request")
    .unwrap();
    assert_eq!(log.status(), StatusCode::OK);
    let body = json_body(log).await;
    assert!(body["result"]["contents"][0]["text"]
        .as_str()
        .unwrap()
        .contains("BTCUSDT"));

    assert!(!stalled.is_finished());
    stalled.abort();
}
