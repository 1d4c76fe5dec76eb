use anyhow::{Context, Result};
use insight_client::GeminiConfig;
use rotation_graph::DEFAULT_BENCHMARK;
use std::env;
use std::net::SocketAddr;
use yahoo_client::YahooConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub benchmark: String,
    pub yahoo: YahooConfig,
    pub gemini: GeminiConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("RRG_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Self {
            bind_addr: bind_addr
                .parse()
                .with_context(|| format!("invalid RRG_BIND_ADDR '{}'", bind_addr))?,
            benchmark: env::var("RRG_BENCHMARK")
                .ok()
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_BENCHMARK.to_string()),
            yahoo: YahooConfig::default(),
            gemini: GeminiConfig::default(),
        })
    }
}
