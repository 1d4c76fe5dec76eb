//! Per-sector pipeline: align, transform, classify.

use chrono::{DateTime, Utc};
use rrg_core::{PriceMap, RrgError, Sector, TickerSeries};

use crate::aligner::align;
use crate::transformer::{compute_rrg_at, latest_position};

/// Build the RRG trajectory of one sector against the benchmark
pub fn build_ticker_series(
    sector: &Sector,
    sector_prices: &PriceMap,
    benchmark_prices: &PriceMap,
) -> Result<TickerSeries, RrgError> {
    build_ticker_series_at(sector, sector_prices, benchmark_prices, Utc::now())
}

pub fn build_ticker_series_at(
    sector: &Sector,
    sector_prices: &PriceMap,
    benchmark_prices: &PriceMap,
    produced_at: DateTime<Utc>,
) -> Result<TickerSeries, RrgError> {
    let aligned = align(sector_prices, benchmark_prices)?;
    let history = compute_rrg_at(&aligned, produced_at);

    let (current_quadrant, distance_from_center) = latest_position(&history).ok_or_else(|| {
        RrgError::InsufficientData(format!(
            "{} aligned points yield no RRG history for {}",
            aligned.len(),
            sector.symbol
        ))
    })?;

    tracing::debug!(
        "{}: {} RRG points, {} at distance {:.2}",
        sector.symbol,
        history.len(),
        current_quadrant,
        distance_from_center
    );

    Ok(TickerSeries {
        symbol: sector.symbol.clone(),
        name: sector.name.clone(),
        color: sector.color.clone(),
        history,
        current_quadrant,
        distance_from_center,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rrg_core::Quadrant;

    fn daily_prices(count: usize, start: f64, growth: f64) -> PriceMap {
        (0..count)
            .map(|i| (1_700_000_000 + i as i64 * 86_400, start * growth.powi(i as i32)))
            .collect()
    }

    #[test]
    fn test_identical_prices_scenario() {
        let sector = Sector::new("XLK", "Technology", "#60a5fa");
        let prices = daily_prices(40, 450.0, 1.002);

        let series = build_ticker_series(&sector, &prices, &prices).unwrap();

        assert_eq!(series.symbol, "XLK");
        assert_eq!(series.name, "Technology");
        assert_eq!(series.history.len(), 16);
        assert_eq!(series.current_quadrant, Quadrant::Leading);
        assert_eq!(series.distance_from_center, 0.0);
    }

    #[test]
    fn test_latest_point_drives_summary_fields() {
        let sector = Sector::new("XLE", "Energy", "#f87171");
        let produced_at = Utc::now();
        let series = build_ticker_series_at(
            &sector,
            &daily_prices(260, 80.0, 0.997),
            &daily_prices(260, 450.0, 1.001),
            produced_at,
        )
        .unwrap();

        let last = series.latest().unwrap();
        assert_eq!(series.history.len(), 260 - 24);
        assert_eq!(series.current_quadrant, last.quadrant());
        assert_eq!(series.distance_from_center, last.distance_from_center());
        assert_eq!(last.produced_at, produced_at);
    }

    #[test]
    fn test_short_overlap_is_rejected() {
        let sector = Sector::new("XLRE", "Real Estate", "#f472b6");
        let err = build_ticker_series(
            &sector,
            &daily_prices(10, 40.0, 1.0),
            &daily_prices(260, 450.0, 1.0),
        )
        .unwrap_err();

        assert!(matches!(err, RrgError::InsufficientOverlap { found: 10, .. }));
    }
}
