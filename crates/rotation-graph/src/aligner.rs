//! Timestamp alignment
//!
//! Keeps only timestamps present in both series. No interpolation.

use rrg_core::{AlignedSeries, PriceMap, RrgError};

/// Fewer shared timestamps than this and the instrument is skipped
pub const MIN_OVERLAP: usize = 30;

/// Timestamps present in both maps, ascending
pub fn common_timestamps(a: &PriceMap, b: &PriceMap) -> Vec<i64> {
    // BTreeMap keys iterate ascending, so the filter output is already sorted.
    a.keys().filter(|ts| b.contains_key(ts)).copied().collect()
}

/// Project both maps onto their shared timestamps
pub fn align(sector: &PriceMap, benchmark: &PriceMap) -> Result<AlignedSeries, RrgError> {
    let timestamps = common_timestamps(sector, benchmark);

    if timestamps.len() < MIN_OVERLAP {
        return Err(RrgError::InsufficientOverlap {
            found: timestamps.len(),
            required: MIN_OVERLAP,
        });
    }

    let sector_prices = timestamps.iter().map(|ts| sector[ts]).collect();
    let benchmark_prices = timestamps.iter().map(|ts| benchmark[ts]).collect();

    AlignedSeries::new(timestamps, sector_prices, benchmark_prices)
}
