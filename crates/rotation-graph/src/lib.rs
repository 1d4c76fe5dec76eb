//! Relative Rotation Graph
//!
//! Aligns a sector's close prices with a benchmark's and turns them into
//! RS-Ratio / RS-Momentum trajectories classified by quadrant.

pub mod aligner;
pub mod sectors;
pub mod series;
pub mod transformer;

pub use aligner::{align, common_timestamps, MIN_OVERLAP};
pub use sectors::{standard_sectors, DEFAULT_BENCHMARK};
pub use series::{build_ticker_series, build_ticker_series_at};
pub use transformer::{
    compute_rrg, compute_rrg_at, latest_position, momentum, normalize, relative_ratio,
    smooth_ratio, MOMENTUM_LAG, MOMENTUM_SCALE, RATIO_WINDOW,
};
