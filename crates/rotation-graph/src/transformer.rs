//! RS-Ratio / RS-Momentum computation
//!
//! The ratio line is a trailing SMA of sector/benchmark, rescaled so the whole
//! window averages 100. Momentum is an amplified rate of change of that line.
//! Normalization uses the full window, so every refresh has to recompute the
//! whole series instead of extending the previous one.
//!
//! Non-finite values (a zero benchmark price, a zero normalized value) are not
//! filtered: they propagate through the arithmetic into the output points.

use chrono::{DateTime, Utc};
use rrg_core::{AlignedSeries, Quadrant, RrgPoint, RRG_CENTER};

/// Trailing window of the ratio SMA
pub const RATIO_WINDOW: usize = 14;

/// Lag of the momentum rate of change
pub const MOMENTUM_LAG: usize = 10;

/// Amplification applied to the momentum rate of change so it spans a range
/// comparable to the ratio axis
pub const MOMENTUM_SCALE: f64 = 500.0;

/// Sector price divided by benchmark price, index by index
pub fn relative_ratio(sector: &[f64], benchmark: &[f64]) -> Vec<f64> {
    sector.iter().zip(benchmark).map(|(s, b)| s / b).collect()
}

/// Mean of the `window` values strictly before each index from `window` on.
///
/// Output has `ratio.len() - window` values, or none when there is not
/// enough data.
pub fn smooth_ratio(ratio: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || ratio.len() <= window {
        return Vec::new();
    }

    (window..ratio.len())
        .map(|i| ratio[i - window..i].iter().sum::<f64>() / window as f64)
        .collect()
}

/// Rescale so the series averages 100
pub fn normalize(smoothed: &[f64]) -> Vec<f64> {
    if smoothed.is_empty() {
        return Vec::new();
    }

    let mean = smoothed.iter().sum::<f64>() / smoothed.len() as f64;
    smoothed.iter().map(|v| (v / mean) * RRG_CENTER).collect()
}

/// `100 + pct_change(lag) * 500` for each index from `lag` on
pub fn momentum(normalized: &[f64], lag: usize) -> Vec<f64> {
    if normalized.len() <= lag {
        return Vec::new();
    }

    (lag..normalized.len())
        .map(|j| {
            let current = normalized[j];
            let prev = normalized[j - lag];
            RRG_CENTER + ((current - prev) / prev) * MOMENTUM_SCALE
        })
        .collect()
}

/// RRG trajectory stamped with the current time
pub fn compute_rrg(aligned: &AlignedSeries) -> Vec<RrgPoint> {
    compute_rrg_at(aligned, Utc::now())
}

/// RRG trajectory with every point stamped `produced_at`.
///
/// Produces `max(0, N - RATIO_WINDOW - MOMENTUM_LAG)` points.
pub fn compute_rrg_at(aligned: &AlignedSeries, produced_at: DateTime<Utc>) -> Vec<RrgPoint> {
    let ratio = relative_ratio(aligned.sector(), aligned.benchmark());
    let smoothed = smooth_ratio(&ratio, RATIO_WINDOW);
    let normalized = normalize(&smoothed);
    let momentum = momentum(&normalized, MOMENTUM_LAG);

    normalized[normalized.len().saturating_sub(momentum.len())..]
        .iter()
        .zip(momentum)
        .map(|(&rs_ratio, rs_momentum)| RrgPoint {
            rs_ratio,
            rs_momentum,
            produced_at,
        })
        .collect()
}

/// Quadrant and distance from centre of the most recent point
pub fn latest_position(history: &[RrgPoint]) -> Option<(Quadrant, f64)> {
    history
        .last()
        .map(|point| (point.quadrant(), point.distance_from_center()))
}
