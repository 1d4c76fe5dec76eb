//! Rotation Orchestrator
//!
//! Fetches the benchmark, then fans out one task per sector and joins the
//! results. A sector that fails is dropped on its own; only a missing
//! benchmark or an empty result aborts the computation.

use chrono::{DateTime, Utc};
use rotation_graph::{build_ticker_series_at, standard_sectors, DEFAULT_BENCHMARK};
use rrg_core::{Period, PriceHistoryProvider, PriceMap, RrgError, Sector, TickerSeries};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Result of one full rotation computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationSnapshot {
    pub period: Period,
    pub benchmark: String,
    pub generated_at: DateTime<Utc>,
    /// Computed sectors, in universe order
    pub sectors: Vec<TickerSeries>,
}

/// What a per-sector task hands back to the join barrier
#[derive(Debug)]
enum SectorOutcome {
    Computed(TickerSeries),
    Skipped { symbol: String, reason: RrgError },
}

pub struct RotationOrchestrator {
    provider: Arc<dyn PriceHistoryProvider>,
    benchmark: String,
    sectors: Vec<Sector>,
}

impl RotationOrchestrator {
    /// SPDR sectors against SPY
    pub fn new(provider: Arc<dyn PriceHistoryProvider>) -> Self {
        Self::with_universe(provider, DEFAULT_BENCHMARK, standard_sectors())
    }

    pub fn with_universe(
        provider: Arc<dyn PriceHistoryProvider>,
        benchmark: &str,
        sectors: Vec<Sector>,
    ) -> Self {
        Self {
            provider,
            benchmark: benchmark.to_string(),
            sectors,
        }
    }

    pub fn benchmark(&self) -> &str {
        &self.benchmark
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// Recompute every sector's RRG trajectory for `period`
    pub async fn compute(&self, period: Period) -> Result<RotationSnapshot, RrgError> {
        let benchmark_prices = self
            .provider
            .price_history(&self.benchmark, period)
            .await
            .map_err(|e| RrgError::BenchmarkUnavailable {
                symbol: self.benchmark.clone(),
                reason: e.to_string(),
            })?;
        let benchmark_prices = Arc::new(benchmark_prices);
        let generated_at = Utc::now();

        tracing::info!(
            "Computing {} rotation for {} sectors vs {} ({} benchmark prices)",
            period,
            self.sectors.len(),
            self.benchmark,
            benchmark_prices.len()
        );

        let mut tasks = JoinSet::new();

        for (index, sector) in self.sectors.iter().cloned().enumerate() {
            let provider = Arc::clone(&self.provider);
            let benchmark_prices = Arc::clone(&benchmark_prices);
            tasks.spawn(async move {
                let outcome =
                    sector_outcome(provider.as_ref(), &sector, &benchmark_prices, period, generated_at)
                        .await;
                (index, outcome)
            });
        }

        let mut computed = Vec::with_capacity(self.sectors.len());

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok((index, SectorOutcome::Computed(series))) => computed.push((index, series)),
                Ok((_, SectorOutcome::Skipped { symbol, reason })) => match reason {
                    RrgError::InsufficientOverlap { found, .. } => tracing::warn!(
                        "Insufficient overlapping data for {} at period {} ({} common timestamps)",
                        symbol,
                        period,
                        found
                    ),
                    reason => tracing::warn!("Skipping {} due to error: {}", symbol, reason),
                },
                Err(e) => tracing::error!("Sector task error: {}", e),
            }
        }

        if computed.is_empty() {
            return Err(RrgError::EmptyResultSet {
                period: period.to_string(),
            });
        }

        computed.sort_by_key(|(index, _)| *index);
        let sectors: Vec<TickerSeries> = computed.into_iter().map(|(_, series)| series).collect();

        tracing::info!(
            "{} rotation complete: {}/{} sectors computed",
            period,
            sectors.len(),
            self.sectors.len()
        );

        Ok(RotationSnapshot {
            period,
            benchmark: self.benchmark.clone(),
            generated_at,
            sectors,
        })
    }
}

async fn sector_outcome(
    provider: &dyn PriceHistoryProvider,
    sector: &Sector,
    benchmark_prices: &PriceMap,
    period: Period,
    produced_at: DateTime<Utc>,
) -> SectorOutcome {
    let result = match provider.price_history(&sector.symbol, period).await {
        Ok(prices) => build_ticker_series_at(sector, &prices, benchmark_prices, produced_at),
        Err(e) => Err(e),
    };

    match result {
        Ok(series) => SectorOutcome::Computed(series),
        Err(reason) => SectorOutcome::Skipped {
            symbol: sector.symbol.clone(),
            reason,
        },
    }
}
