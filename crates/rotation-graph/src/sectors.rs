//! Sector universe
//!
//! The SPDR sector ETFs plotted against the broad-market benchmark.

use rrg_core::Sector;

/// Broad-market ETF every sector is measured against
pub const DEFAULT_BENCHMARK: &str = "SPY";

/// The eleven SPDR sector ETFs with their chart colors
pub fn standard_sectors() -> Vec<Sector> {
    vec![
        Sector::new("XLK", "Technology", "#60a5fa"),
        Sector::new("XLU", "Utilities", "#fbbf24"),
        Sector::new("XLE", "Energy", "#f87171"),
        Sector::new("XLC", "Communication", "#a78bfa"),
        Sector::new("XLB", "Materials", "#fb923c"),
        Sector::new("XLP", "Consumer Staples", "#34d399"),
        Sector::new("XLRE", "Real Estate", "#f472b6"),
        Sector::new("XLY", "Consumer Discretionary", "#818cf8"),
        Sector::new("XLI", "Industrials", "#94a3b8"),
        Sector::new("XLV", "Health Care", "#2dd4bf"),
        Sector::new("XLF", "Financials", "#fb7185"),
    ]
}
