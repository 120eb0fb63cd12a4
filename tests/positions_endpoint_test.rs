use axum::http::StatusCode;
use liqscope::api::{self, AppState};
use liqscope::config::Config;
use liqscope::quotes::FetchFailurePolicy;
use liqscope::{MemoryLeadStore, MockQuoteSource, QuoteError};
use std::collections::HashMap;
use std::sync::Arc;
use tower::util::ServiceExt;

fn config(pairs: &[(&str, &str)]) -> Config {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_env_map(env).expect("valid test config")
}

fn setup_test_app(config: Config, quotes: MockQuoteSource) -> axum::Router {
    let state = AppState::new(
        config,
        Arc::new(quotes),
        Arc::new(MemoryLeadStore::new()),
    );
    api::create_router(state)
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = setup_test_app(config(&[]), MockQuoteSource::new());

    let (status, body) = get_json(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get_json(app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["instruments"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_default_view_is_ranked_by_proximity() {
    let app = setup_test_app(config(&[]), MockQuoteSource::new());

    let (status, body) = get_json(app, "/v1/positions").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["total"], 200);
    let positions = body["positions"].as_array().unwrap();
    assert_eq!(positions.len(), 200);

    let distances: Vec<f64> = positions
        .iter()
        .map(|p| p["distancePct"].as_f64().unwrap().abs())
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));

    assert_eq!(body["top"].as_array().unwrap().len(), 10);
    assert_eq!(body["topAddresses"].as_array().unwrap().len(), 20);

    let long = body["counts"]["long"].as_u64().unwrap();
    let short = body["counts"]["short"].as_u64().unwrap();
    assert_eq!(long + short, 200);

    let snapshot = &body["snapshot"];
    assert_eq!(snapshot["seed"], 42);
    assert!(snapshot["id"].is_string());
    assert!(snapshot["referencePrices"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["source"] == "fallback"));
}

#[tokio::test]
async fn test_same_seed_same_digest() {
    let app = setup_test_app(config(&[]), MockQuoteSource::new());

    let (_, a) = get_json(app.clone(), "/v1/positions?seed=7").await;
    let (_, b) = get_json(app.clone(), "/v1/positions?seed=7").await;
    let (_, c) = get_json(app, "/v1/positions?seed=8").await;

    assert_ne!(a["snapshot"]["id"], b["snapshot"]["id"]);
    assert_eq!(a["snapshot"]["digest"], b["snapshot"]["digest"]);
    assert_eq!(a["positions"], b["positions"]);
    assert_ne!(a["snapshot"]["digest"], c["snapshot"]["digest"]);
}

#[tokio::test]
async fn test_filters_apply_in_view() {
    let app = setup_test_app(config(&[]), MockQuoteSource::new());

    let (status, body) = get_json(
        app,
        "/v1/positions?instrument=ETH-USD&side=SHORT&maxDistance=15&topN=3",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let positions = body["positions"].as_array().unwrap();
    for p in positions {
        assert_eq!(p["pair"], "ETH-USD");
        assert_eq!(p["side"], "SHORT");
        assert!(p["distancePct"].as_f64().unwrap().abs() <= 15.0);
    }
    assert!(body["top"].as_array().unwrap().len() <= 3);
    assert_eq!(body["counts"]["long"], 0);
    assert_eq!(
        body["counts"]["short"].as_u64().unwrap() as usize,
        positions.len()
    );
}

#[tokio::test]
async fn test_sub_unit_quotes_keep_liquidation_side() {
    let quotes = MockQuoteSource::new()
        .with_price("EURUSD=X", 1.08)
        .with_price("DOGE-USD", 0.0123);
    let cfg = config(&[
        ("INSTRUMENTS", "EURUSD=X,DOGE-USD"),
        ("LIVE_QUOTES", "true"),
    ]);
    let app = setup_test_app(cfg, quotes);

    let (status, body) = get_json(app, "/v1/positions").await;
    assert_eq!(status, StatusCode::OK);

    let positions = body["positions"].as_array().unwrap();
    assert_eq!(positions.len(), 100);
    for p in positions {
        let entry = p["entry"].as_f64().unwrap();
        let liq = p["liq"].as_f64().unwrap();
        assert!(liq > 0.0, "{}", p);
        match p["side"].as_str().unwrap() {
            "LONG" => assert!(liq < entry, "{}", p),
            "SHORT" => assert!(liq > entry, "{}", p),
            other => panic!("unexpected side {}", other),
        }
    }
    assert_eq!(positions.iter().filter(|p| p["assetClass"] == "FOREX").count(), 50);
}

#[tokio::test]
async fn test_invalid_side_rejected() {
    let app = setup_test_app(config(&[]), MockQuoteSource::new());

    let (status, body) = get_json(app, "/v1/positions?side=flat").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("side"));
}

#[tokio::test]
async fn test_live_quote_failure_falls_back() {
    let quotes = MockQuoteSource::new()
        .with_price("BTC-USD", 65000.0)
        .with_failure("AAPL", QuoteError::Timeout);
    let cfg = config(&[
        ("INSTRUMENTS", "BTC-USD,AAPL"),
        ("POSITIONS_PER_INSTRUMENT", "5"),
    ]);
    assert_eq!(cfg.fetch_failure_policy, FetchFailurePolicy::Fallback);
    let app = setup_test_app(cfg, quotes);

    let (status, body) = get_json(app, "/v1/positions?live=true").await;
    assert_eq!(status, StatusCode::OK);

    let prices = body["snapshot"]["referencePrices"].as_array().unwrap();
    assert_eq!(prices.len(), 2);
    assert_eq!(prices[0]["instrument"], "BTC-USD");
    assert_eq!(prices[0]["source"], "live");
    assert_eq!(prices[0]["price"], 65000.0);
    assert_eq!(prices[1]["instrument"], "AAPL");
    assert_eq!(prices[1]["source"], "fallback");
    assert_eq!(prices[1]["price"], 1000.0);

    let aapl = body["positions"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["pair"] == "AAPL")
        .count();
    assert_eq!(aapl, 5);
    assert_eq!(body["total"], 10);
}

#[tokio::test]
async fn test_live_quote_failure_omitted() {
    let quotes = MockQuoteSource::new()
        .with_price("BTC-USD", 65000.0)
        .with_failure("AAPL", QuoteError::NetworkError("refused".to_string()));
    let cfg = config(&[
        ("INSTRUMENTS", "AAPL,BTC-USD"),
        ("POSITIONS_PER_INSTRUMENT", "5"),
        ("FETCH_FAILURE_POLICY", "omit"),
        ("LIVE_QUOTES", "true"),
    ]);
    let app = setup_test_app(cfg, quotes);

    let (status, body) = get_json(app, "/v1/positions").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["snapshot"]["omitted"], serde_json::json!(["AAPL"]));
    assert_eq!(body["total"], 5);
    assert!(body["positions"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["pair"] == "BTC-USD"));
}
