use async_trait::async_trait;
use crate::{MarketInsight, Period, PriceMap, RrgError, TickerSeries};

/// Source of close-price history keyed by epoch seconds
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    async fn price_history(&self, symbol: &str, period: Period) -> Result<PriceMap, RrgError>;
}

/// Optional free-text commentary on a computed rotation.
///
/// Implementations swallow their own failures and return `None`; the numeric
/// result must never depend on a summarizer.
#[async_trait]
pub trait NarrativeSummarizer: Send + Sync {
    async fn summarize(&self, series: &[TickerSeries]) -> Option<MarketInsight>;
}
