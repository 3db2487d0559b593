//! Stub Binance upstream for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use binance_mcp::activity::MemoryActivityLog;
use binance_mcp::binance::{BinanceClient, MarketDataClient};
use binance_mcp::mcp::{BinanceServer, McpHandler, SurfaceRegistry};
use binance_mcp::symbols::SymbolResolver;
use binance_mcp::transport::TransportMode;

/// A request seen by the stub
#[derive(Debug, Clone)]
pub struct Hit {
    pub path: String,
    pub query: HashMap<String, String>,
}

#[derive(Clone)]
struct StubState {
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<Hit>>>,
    failure: Option<(StatusCode, &'static str)>,
}

/// Symbol the stub holds open without answering
pub const STALLED_SYMBOL: &str = "HANGUSDT";

/// Ticker endpoints on an ephemeral local port
pub struct StubUpstream {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<Hit>>>,
}

impl StubUpstream {
    /// Answers every ticker endpoint with a canned 200 payload
    pub async fn start() -> Self {
        Self::spawn(None).await
    }

    /// Answers every request with `status` and `body`
    pub async fn failing(status: StatusCode, body: &'static str) -> Self {
        Self::spawn(Some((status, body))).await
    }

    async fn spawn(failure: Option<(StatusCode, &'static str)>) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            hits: hits.clone(),
            seen: seen.clone(),
            failure,
        };

        let app = Router::new().fallback(respond).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
            seen,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_hit(&self) -> Option<Hit> {
        self.seen.lock().unwrap().last().cloned()
    }
}

async fn respond(
    State(state): State<StubState>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.seen.lock().unwrap().push(Hit {
        path: uri.path().to_string(),
        query: query.clone(),
    });

    if let Some((status, body)) = state.failure {
        return (status, body).into_response();
    }

    let symbol = query.get("symbol").cloned().unwrap_or_default();
    if symbol == STALLED_SYMBOL {
        tokio::time::sleep(Duration::from_secs(60)).await;
    }
    match uri.path() {
        "/api/v3/ticker/price" => Json(json!({
            "symbol": symbol,
            "price": "50000.00",
        }))
        .into_response(),
        "/api/v3/ticker/24hr" => Json(json!({
            "symbol": symbol,
            "priceChange": "-150.25",
            "priceChangePercent": "-1.2",
            "lastPrice": "50000.00",
            "count": 76,
        }))
        .into_response(),
        "/api/v3/ticker" => Json(json!({
            "symbol": symbol,
            "priceChange": "120.5",
            "priceChangePercent": "2.3",
            "openTime": 1499783499040u64,
        }))
        .into_response(),
        _ => (StatusCode::NOT_FOUND, "{\"code\":-1,\"msg\":\"unknown path\"}").into_response(),
    }
}

/// Server state wired to `base_url` with an in-memory activity log
pub fn server(base_url: &str) -> (BinanceServer, Arc<MemoryActivityLog>) {
    let activity = Arc::new(MemoryActivityLog::default());
    let resolver = Arc::new(SymbolResolver::builtin(activity.clone()));
    let client = BinanceClient::with_base_url(base_url).unwrap();
    let market = MarketDataClient::new(client, activity.clone());
    (BinanceServer::new(resolver, market, activity.clone()), activity)
}

pub fn handler(base_url: &str, mode: TransportMode) -> (McpHandler, Arc<MemoryActivityLog>) {
    let (server, activity) = server(base_url);
    let registry = Arc::new(SurfaceRegistry::new(server, mode));
    (McpHandler::new(registry), activity)
}
