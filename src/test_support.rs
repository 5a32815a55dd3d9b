//! Fixtures shared by the HTTP-backed unit tests.

use std::time::Duration;

use serde_json::json;
use wiremock::MockServer;

use crate::{ClientConfig, MarketDataClient};

/// 2021-01-04 00:00:00 UTC, the first trading day of 2021.
pub const FIRST_SESSION: i64 = 1_609_718_400;
const DAY: i64 = 86_400;

pub fn client_for(server: &MockServer) -> MarketDataClient {
    client_at(&server.uri())
}

pub fn client_at(base_url: &str) -> MarketDataClient {
    let config = ClientConfig::new("test-token")
        .with_base_url(base_url)
        .with_backoff(Duration::from_millis(1))
        .with_pool_size(4);
    MarketDataClient::new(config).expect("test client")
}

/// Client pointed at a port nobody listens on.
pub fn unreachable_client() -> MarketDataClient {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
        listener.local_addr().expect("probe addr").port()
    };
    client_at(&format!("http://127.0.0.1:{port}"))
}

pub fn candles_body(days: usize) -> String {
    let t: Vec<i64> = (0..days as i64).map(|i| FIRST_SESSION + i * DAY).collect();
    let close: Vec<f64> = (0..days).map(|i| 130.0 + i as f64).collect();
    let open: Vec<f64> = close.iter().map(|c| c - 0.5).collect();
    let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
    let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();
    let volume: Vec<u64> = (0..days as u64).map(|i| 90_000_000 + i * 1_000).collect();
    json!({ "s": "ok", "t": t, "o": open, "h": high, "l": low, "c": close, "v": volume })
        .to_string()
}

pub fn stock_quote_body(symbol: &str, updated: i64) -> String {
    json!({
        "s": "ok",
        "symbol": [symbol],
        "ask": [250.1],
        "askSize": [5],
        "bid": [249.9],
        "bidSize": [3],
        "mid": [250.0],
        "last": [250.05],
        "change": [3.09],
        "changepct": [0.0125],
        "volume": [80_123_456u64],
        "updated": [updated]
    })
    .to_string()
}

pub fn option_quote_body(symbol: &str, updated: i64, last: f64) -> String {
    json!({
        "s": "ok",
        "optionSymbol": [symbol],
        "underlying": [&symbol[..symbol.len() - 15]],
        "expiration": [1_737_147_600],
        "side": ["call"],
        "strike": [360],
        "bid": [last - 0.1],
        "bidSize": [10],
        "mid": [last],
        "ask": [last + 0.1],
        "askSize": [12],
        "last": [last],
        "openInterest": [1520],
        "volume": [342],
        "inTheMoney": [false],
        "intrinsicValue": [0],
        "extrinsicValue": [last],
        "underlyingPrice": [340.2],
        "iv": [0.62],
        "delta": [0.41],
        "gamma": [0.008],
        "theta": [-0.35],
        "vega": [0.55],
        "rho": [0.12],
        "updated": [updated]
    })
    .to_string()
}

/// One end-of-day option quote per day starting at [`FIRST_SESSION`].
pub fn option_history_body(symbol: &str, days: usize) -> String {
    let updated: Vec<i64> = (0..days as i64).map(|i| FIRST_SESSION + i * DAY).collect();
    let last: Vec<f64> = (0..days).map(|i| 12.0 + i as f64 * 0.25).collect();
    json!({
        "s": "ok",
        "optionSymbol": vec![symbol; days],
        "underlying": vec![&symbol[..symbol.len() - 15]; days],
        "strike": vec![360; days],
        "bid": last.iter().map(|l| l - 0.1).collect::<Vec<_>>(),
        "bidSize": vec![10; days],
        "mid": last.clone(),
        "ask": last.iter().map(|l| l + 0.1).collect::<Vec<_>>(),
        "askSize": vec![12; days],
        "last": last.clone(),
        "openInterest": vec![1520; days],
        "volume": vec![342; days],
        "extrinsicValue": last,
        "underlyingPrice": vec![340.2; days],
        "updated": updated
    })
    .to_string()
}
