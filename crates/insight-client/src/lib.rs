pub mod error;
pub mod prompt;

pub use error::{InsightError, InsightResult};

use async_trait::async_trait;
use rrg_core::{MarketInsight, NarrativeSummarizer, TickerSeries};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Configuration for the Gemini summarizer
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .ok()
                .filter(|k| !k.is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Value>,
    generation_config: Value,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key: config.api_key,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask the model for commentary on the given rotation
    pub async fn market_insights(&self, series: &[TickerSeries]) -> InsightResult<MarketInsight> {
        let api_key = self.api_key.as_deref().ok_or(InsightError::MissingApiKey)?;

        let request = GenerateContentRequest {
            contents: vec![json!({ "parts": [{ "text": prompt::build_prompt(series) }] })],
            generation_config: json!({
                "responseMimeType": "application/json",
                "responseSchema": prompt::response_schema(),
            }),
        };

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(InsightError::ServiceUnavailable(format!(
                "Status: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        parse_insight(&response_text(&body)?)
    }
}

/// Text of the first candidate part
fn response_text(body: &Value) -> InsightResult<String> {
    body.get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .and_then(|p| p.first())
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| InsightError::InvalidResponse("no candidate text".to_string()))
}

fn parse_insight(text: &str) -> InsightResult<MarketInsight> {
    Ok(serde_json::from_str(text.trim())?)
}

#[async_trait]
impl NarrativeSummarizer for GeminiClient {
    async fn summarize(&self, series: &[TickerSeries]) -> Option<MarketInsight> {
        if !self.is_enabled() || series.is_empty() {
            return None;
        }

        match self.market_insights(series).await {
            Ok(insight) => Some(insight),
            Err(e) => {
                tracing::error!("Gemini insight error: {}", e);
                None
            }
        }
    }
}
