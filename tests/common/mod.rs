#![allow(dead_code)]

use serde_json::{json, Value};
use stock_quotes::{ClientConfig, QuoteClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CSV_BODY: &str = "Date,Open,High,Low,Close,Adj Close,Volume\n\
2024-03-01,10.0,11.0,9.5,10.5,10.4,1200\n\
2024-03-04,10.5,12.0,10.1,11.8,11.7,1500\n";

/// Chart body with one row per close price, timestamps one day apart.
pub fn chart_body(symbol: &str, closes: &[f64]) -> String {
    let timestamps: Vec<i64> = (0..closes.len() as i64)
        .map(|day| 1_709_251_200 + day * 86_400)
        .collect();
    let opens: Vec<f64> = closes.iter().map(|close| close - 0.5).collect();
    let highs: Vec<f64> = closes.iter().map(|close| close + 1.0).collect();
    let lows: Vec<f64> = closes.iter().map(|close| close - 1.0).collect();
    let volumes: Vec<u64> = (1..=closes.len() as u64).map(|n| n * 1_000).collect();

    chart_json(
        symbol,
        json!(timestamps),
        json!({
            "open": opens,
            "high": highs,
            "low": lows,
            "close": closes,
            "volume": volumes,
        }),
    )
    .to_string()
}

pub fn empty_chart_body() -> String {
    json!({ "chart": { "result": [], "error": null } }).to_string()
}

fn chart_json(symbol: &str, timestamps: Value, quote: Value) -> Value {
    json!({
        "chart": {
            "result": [{
                "meta": {
                    "symbol": symbol,
                    "currency": "USD",
                    "dataGranularity": "1d",
                    "range": "1mo"
                },
                "timestamp": timestamps,
                "indicators": { "quote": [quote] }
            }],
            "error": null
        }
    })
}

pub fn client_for(server: &MockServer) -> QuoteClient {
    client_with(server, |_| {})
}

pub fn client_with(server: &MockServer, adjust: impl FnOnce(&mut ClientConfig)) -> QuoteClient {
    let mut config = ClientConfig::builtin().with_base_url(&server.uri());
    adjust(&mut config);
    QuoteClient::new(config).expect("build client")
}

pub async fn mount_chart(server: &MockServer, ticker: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/v8/finance/chart/{ticker}")))
        .respond_with(response)
        .mount(server)
        .await;
}

pub fn ok_body(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(body)
}
