use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use rrg_core::{Period, PriceHistoryProvider, PriceMap, RrgError};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const CHART_PATH: &str = "v8/finance/chart";

/// Connection settings for the chart endpoint
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    /// Optional CORS proxy prefix, e.g. `https://corsproxy.io/?`. The full
    /// target URL is percent-encoded and appended to it.
    pub proxy_url: Option<String>,
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("YAHOO_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            proxy_url: std::env::var("RRG_CORS_PROXY").ok().filter(|p| !p.is_empty()),
            timeout: Duration::from_secs(
                std::env::var("RRG_HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// Yahoo `range` and `interval` query values for a period
pub fn chart_params(period: Period) -> (&'static str, &'static str) {
    match period {
        Period::FiveMin => ("5d", "5m"),
        Period::FifteenMin => ("5d", "15m"),
        Period::Hour => ("1mo", "1h"),
        Period::Day => ("1y", "1d"),
        Period::Week => ("5y", "1wk"),
        Period::Month => ("max", "1mo"),
    }
}

#[derive(Clone)]
pub struct YahooFinanceClient {
    client: reqwest::Client,
    base_url: String,
    proxy_url: Option<String>,
}

impl YahooFinanceClient {
    pub fn with_config(config: YahooConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            proxy_url: config.proxy_url,
        }
    }

    /// URL actually requested for a symbol and period, proxy included
    pub fn chart_url(&self, symbol: &str, period: Period) -> String {
        let (range, interval) = chart_params(period);
        let target = format!(
            "{}/{}/{}?range={}&interval={}",
            self.base_url, CHART_PATH, symbol, range, interval
        );

        match &self.proxy_url {
            Some(proxy) => {
                let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
                format!("{}{}", proxy, encoded)
            }
            None => target,
        }
    }

    /// Close prices keyed by epoch seconds, null closes dropped
    pub async fn get_close_prices(&self, symbol: &str, period: Period) -> Result<PriceMap> {
        let url = self.chart_url(symbol, period);
        tracing::debug!("Fetching {} {} chart: {}", symbol, period, url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            bail!("HTTP error! status: {}", response.status());
        }

        let json: serde_json::Value = response.json().await?;
        parse_chart_closes(&json)
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooFinanceClient {
    async fn price_history(&self, symbol: &str, period: Period) -> Result<PriceMap, RrgError> {
        self.get_close_prices(symbol, period).await.map_err(|e| {
            tracing::error!("Failed to fetch data for {}: {:#}", symbol, e);
            RrgError::Provider(format!("{}: {:#}", symbol, e))
        })
    }
}

/// Extract (timestamp, close) pairs from a v8 chart payload
pub fn parse_chart_closes(json: &serde_json::Value) -> Result<PriceMap> {
    let chart = json.get("chart").ok_or_else(|| anyhow!("Invalid response format"))?;

    if let Some(description) = chart
        .get("error")
        .and_then(|e| e.get("description"))
        .and_then(|d| d.as_str())
    {
        bail!("Provider error: {}", description);
    }

    let result = chart
        .get("result")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| anyhow!("Invalid response format"))?;

    let timestamps = result
        .get("timestamp")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("No timestamps found"))?;

    let closes = result
        .get("indicators")
        .and_then(|v| v.get("quote"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|q| q.get("close"))
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("No close prices"))?;

    let prices = timestamps
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| Some((ts.as_i64()?, close.as_f64()?)))
        .collect();

    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(proxy_url: Option<&str>) -> YahooFinanceClient {
        YahooFinanceClient::with_config(YahooConfig {
            base_url: "https://query1.finance.yahoo.com/".to_string(),
            proxy_url: proxy_url.map(str::to_string),
            timeout: Duration::from_secs(5),
        })
    }

    #[test]
    fn test_chart_params_per_period() {
        assert_eq!(chart_params(Period::FiveMin), ("5d", "5m"));
        assert_eq!(chart_params(Period::Hour), ("1mo", "1h"));
        assert_eq!(chart_params(Period::Week), ("5y", "1wk"));
        assert_eq!(chart_params(Period::Month), ("max", "1mo"));
    }

    #[test]
    fn test_chart_url_direct() {
        let url = client(None).chart_url("XLK", Period::Day);
        assert_eq!(
            url,
            "https://query1.finance.yahoo.com/v8/finance/chart/XLK?range=1y&interval=1d"
        );
    }

    #[test]
    fn test_chart_url_through_proxy_is_encoded() {
        let url = client(Some("https://corsproxy.io/?")).chart_url("SPY", Period::Week);

        assert!(url.starts_with("https://corsproxy.io/?https%3A%2F%2Fquery1"));
        assert!(url.contains("SPY%3Frange%3D5y%26interval%3D1wk"));
    }

    #[test]
    fn test_parse_drops_null_closes() {
        let payload = json!({
            "chart": {
                "result": [{
                    "timestamp": [1_700_000_000, 1_700_086_400, 1_700_172_800],
                    "indicators": { "quote": [{ "close": [451.2, null, 453.9] }] }
                }],
                "error": null
            }
        });

        let prices = parse_chart_closes(&payload).unwrap();

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[&1_700_000_000], 451.2);
        assert_eq!(prices[&1_700_172_800], 453.9);
        assert!(!prices.contains_key(&1_700_086_400));
    }

    #[test]
    fn test_parse_rejects_missing_result() {
        let payload = json!({ "chart": { "result": null, "error": null } });
        assert!(parse_chart_closes(&payload).is_err());

        let payload = json!({ "finance": {} });
        assert!(parse_chart_closes(&payload).is_err());
    }

    #[test]
    fn test_parse_surfaces_provider_error() {
        let payload = json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        });

        let err = parse_chart_closes(&payload).unwrap_err();
        assert!(err.to_string().contains("delisted"));
    }

    #[test]
    fn test_parse_missing_timestamps_is_an_error() {
        let payload = json!({
            "chart": {
                "result": [{ "indicators": { "quote": [{ "close": [] }] } }]
            }
        });

        assert!(parse_chart_closes(&payload).is_err());
    }
}
