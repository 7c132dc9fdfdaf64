//! Integration Tests - Router + Pipeline over a Mocked Upstream
//!
//! Drives the full axum router with `tower::ServiceExt::oneshot` while the
//! `MarketDataSource` port is mocked with mockall, so call counts and the
//! exact forwarded query can be asserted.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use mockall::mock;
use serde_json::{Value, json};
use tower::ServiceExt;

use binance_kline_proxy::adapters::http::{AppState, build_router};
use binance_kline_proxy::adapters::metrics::MetricsRegistry;
use binance_kline_proxy::domain::{BinanceAuth, Endpoint, ProxyError};
use binance_kline_proxy::ports::{MarketDataSource, UpstreamRequest};
use binance_kline_proxy::usecases::ProxyService;

// ---- Mock Definitions ----

mock! {
    pub Source {}

    #[async_trait::async_trait]
    impl MarketDataSource for Source {
        async fn fetch(&self, request: UpstreamRequest) -> Result<Value, ProxyError>;
    }
}

// ---- Helpers ----

fn app(source: MockSource, auth: BinanceAuth) -> Router {
    let state = Arc::new(AppState::new(
        ProxyService::new(Arc::new(source), auth),
        MetricsRegistry::new().unwrap(),
    ));
    build_router(state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Mock that records every forwarded request and answers with `payload`.
fn recording_source(payload: Value) -> (MockSource, Arc<Mutex<Vec<UpstreamRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let mut source = MockSource::new();
    source.expect_fetch().returning(move |req| {
        recorder.lock().unwrap().push(req);
        Ok(payload.clone())
    });
    (source, seen)
}

fn kline_row() -> Value {
    json!([
        1_700_000_000_000_u64,
        "37000.10",
        "37100.00",
        "36950.00",
        "37050.55",
        "12.5",
        1_700_003_599_999_u64,
        "463000.1",
        1024,
        "6.2",
        "229000.0",
        "0"
    ])
}

// ---- Validation ----

#[tokio::test]
async fn test_missing_symbol_is_400_without_upstream_call() {
    let mut source = MockSource::new();
    source.expect_fetch().times(0);

    let (status, body) = get(app(source, BinanceAuth::default()), "/binance_klines?interval=1h").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"error": "Missing required parameter(s): symbol"}));
}

#[tokio::test]
async fn test_missing_both_on_html_route_is_400_fragment() {
    let mut source = MockSource::new();
    source.expect_fetch().times(0);

    let (status, body) = get(app(source, BinanceAuth::default()), "/binance_klnes_html?limit=5").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "<p>Missing required parameter(s): symbol, interval</p>");
}

#[tokio::test]
async fn test_empty_values_count_as_missing() {
    let mut source = MockSource::new();
    source.expect_fetch().times(0);

    let (status, _) = get(
        app(source, BinanceAuth::default()),
        "/binance_klines?symbol=&interval=1h",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_integer_limit_does_not_match_route() {
    let mut source = MockSource::new();
    source.expect_fetch().times(0);

    let (status, _) = get(
        app(source, BinanceAuth::default()),
        "/binance_klines/BTCUSDT/1h/ten",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_path_limit_is_forwarded() {
    let (source, seen) = recording_source(json!([]));

    let (status, _) = get(
        app(source, BinanceAuth::default()),
        "/binance_klines/BTCUSDT/1h/0099999999999999999999999",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].query,
        "symbol=BTCUSDT&interval=1h&limit=99999999999999999999999"
    );
}

// ---- Forwarding ----

#[tokio::test]
async fn test_query_forwards_only_supplied_keys() {
    let (source, seen) = recording_source(json!([]));

    let (status, body) = get(
        app(source, BinanceAuth::default()),
        "/binance_klines?limit=3&symbol=ETHUSDT&interval=5m&startTime=&extra=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0],
        UpstreamRequest::public(
            Endpoint::Klines,
            "symbol=ETHUSDT&interval=5m&limit=3".to_string()
        )
    );
}

#[tokio::test]
async fn test_path_route_matches_query_route() {
    let (source, seen) = recording_source(json!([kline_row()]));
    let app = app(source, BinanceAuth::default());

    let by_path = get(app.clone(), "/binance_klines/BTCUSDT/1h/10").await;
    let by_query = get(app, "/binance_klines?symbol=BTCUSDT&interval=1h&limit=10").await;

    assert_eq!(by_path, by_query);
    assert_eq!(by_path.0, StatusCode::OK);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[0].query, "symbol=BTCUSDT&interval=1h&limit=10");
}

#[tokio::test]
async fn test_misspelled_aliases_behave_identically() {
    let (source, seen) = recording_source(json!([kline_row()]));
    let app = app(source, BinanceAuth::default());

    let pairs = [
        ("/binance_klines/BTCUSDT/1h/2", "/binance_klnes/BTCUSDT/1h/2"),
        (
            "/binance_klines_html?symbol=BTCUSDT&interval=1h",
            "/binance_klnes_html?symbol=BTCUSDT&interval=1h",
        ),
        (
            "/binance_klines_html/BTCUSDT/1h/2",
            "/binance_klnes_html/BTCUSDT/1h/2",
        ),
    ];

    for (canonical, alias) in pairs {
        let a = get(app.clone(), canonical).await;
        let b = get(app.clone(), alias).await;
        assert_eq!(a, b, "{canonical} vs {alias}");
        assert_eq!(a.0, StatusCode::OK);
    }

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 6);
    for pair in seen.chunks(2) {
        assert_eq!(pair[0], pair[1]);
    }
}

// ---- Upstream failures ----

#[tokio::test]
async fn test_upstream_4xx_becomes_500_with_detail() {
    let mut source = MockSource::new();
    source.expect_fetch().times(1).returning(|_| {
        Err(ProxyError::UpstreamHttp {
            status: 400,
            body: r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string(),
        })
    });

    let (status, body) = get(
        app(source, BinanceAuth::default()),
        "/binance_klines?symbol=NOPE&interval=1h",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Upstream error");
    assert_eq!(body["status_code"], 400);
    assert_eq!(body["detail"], r#"{"code":-1121,"msg":"Invalid symbol."}"#);
}

#[tokio::test]
async fn test_upstream_5xx_on_html_route_is_500_fragment() {
    let mut source = MockSource::new();
    source.expect_fetch().returning(|_| {
        Err(ProxyError::UpstreamHttp {
            status: 503,
            body: "<maintenance>".to_string(),
        })
    });

    let (status, body) = get(
        app(source, BinanceAuth::default()),
        "/binance_klines_html/BTCUSDT/1h/10",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("<html><body><pre>Error: "));
    assert!(body.contains("503"));
    assert!(body.contains("&lt;maintenance&gt;"));
}

#[tokio::test]
async fn test_transport_error_shape() {
    let mut source = MockSource::new();
    source
        .expect_fetch()
        .returning(|_| Err(ProxyError::Transport("operation timed out".to_string())));

    let (status, body) = get(
        app(source, BinanceAuth::default()),
        "/binance_klines/BTCUSDT/1h/10",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({"error": "Transport error", "detail": "operation timed out"})
    );
}

// ---- HTML ----

#[tokio::test]
async fn test_html_empty_payload_has_header_row_only() {
    let (source, _) = recording_source(json!([]));

    let (status, body) = get(
        app(source, BinanceAuth::default()),
        "/binance_klines_html?symbol=BTCUSDT&interval=1d",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<tr>").count(), 1);
    assert!(body.contains("<th>Open time</th>"));
    assert!(body.contains("<th>Ignore</th>"));
    assert!(!body.contains("<td>"));
}

#[tokio::test]
async fn test_html_renders_one_row_per_kline() {
    let (source, _) = recording_source(json!([kline_row(), kline_row()]));

    let (_, body) = get(
        app(source, BinanceAuth::default()),
        "/binance_klines_html/BTCUSDT/1h/2",
    )
    .await;

    assert_eq!(body.matches("<tr>").count(), 3);
    assert_eq!(body.matches("<td>").count(), 24);
    assert!(body.contains("<td>37000.10</td>"));
    assert!(body.contains("<td>1024</td>"));
}

// ---- Account ----

#[tokio::test]
async fn test_account_without_credentials_is_500_before_network() {
    let mut source = MockSource::new();
    source.expect_fetch().times(0);

    let (status, body) = get(app(source, BinanceAuth::default()), "/binance_account").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Configuration error");
    assert!(body["detail"].as_str().unwrap().contains("BINANCE_API_KEY"));
}

#[tokio::test]
async fn test_account_request_is_signed() {
    let auth = BinanceAuth::new(Some("api-key".into()), Some("api-secret".into()));
    let verifier = auth.clone();

    let mut source = MockSource::new();
    source
        .expect_fetch()
        .times(1)
        .withf(move |req| {
            let signer = verifier.signer().unwrap();
            let Some((signed, signature)) = req.query.rsplit_once("&signature=") else {
                return false;
            };
            req.endpoint == Endpoint::Account
                && req.api_key.as_deref() == Some("api-key")
                && signed.starts_with("timestamp=")
                && signed.ends_with("&recvWindow=5000")
                && signer.sign(signed) == signature
        })
        .returning(|_| Ok(json!({"canTrade": true, "balances": []})));

    let (status, body) = get(app(source, auth), "/binance_account?recvWindow=5000").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["canTrade"], true);
}

#[tokio::test]
async fn test_account_caller_timestamp_overrides_injected() {
    let auth = BinanceAuth::new(Some("k".into()), Some("s".into()));
    let (source, seen) = recording_source(json!({}));

    let (status, _) = get(app(source, auth), "/binance_account?timestamp=123&recvWindow=1").await;

    assert_eq!(status, StatusCode::OK);
    let seen = seen.lock().unwrap();
    assert!(seen[0].query.starts_with("timestamp=123&recvWindow=1&signature="));
}

// ---- Operational ----

#[tokio::test]
async fn test_live_and_metrics() {
    let (source, _) = recording_source(json!([]));
    let app = app(source, BinanceAuth::default());

    let (status, body) = get(app.clone(), "/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    get(app.clone(), "/binance_klines/BTCUSDT/1h/1").await;
    get(app.clone(), "/binance_klines?symbol=BTCUSDT").await;

    let (status, body) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("binance_proxy_requests_total"));
    assert!(body.contains("outcome=\"ok\""));
    assert!(body.contains("outcome=\"validation\""));
}
