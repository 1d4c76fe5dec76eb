use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::RrgError;

/// Centre of both RRG axes
pub const RRG_CENTER: f64 = 100.0;

/// Number of trailing points shown when the caller does not ask for more
pub const DEFAULT_TRAIL_LENGTH: usize = 12;
pub const MIN_TRAIL_LENGTH: usize = 5;
pub const MAX_TRAIL_LENGTH: usize = 60;

/// Close prices keyed by epoch seconds
pub type PriceMap = BTreeMap<i64, f64>;

/// Bar period requested from the price provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "5m")]
    FiveMin,
    #[serde(rename = "15m")]
    FifteenMin,
    #[serde(rename = "1h")]
    Hour,
    #[serde(rename = "1d")]
    Day,
    #[default]
    #[serde(rename = "1w")]
    Week,
    #[serde(rename = "1M")]
    Month,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::FiveMin => "5m",
            Period::FifteenMin => "15m",
            Period::Hour => "1h",
            Period::Day => "1d",
            Period::Week => "1w",
            Period::Month => "1M",
        }
    }

    /// All supported periods, shortest first
    pub fn all() -> Vec<Period> {
        vec![
            Period::FiveMin,
            Period::FifteenMin,
            Period::Hour,
            Period::Day,
            Period::Week,
            Period::Month,
        ]
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = RrgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "1M" (month) and "1m" are different periods, so matching is case-sensitive.
        Period::all()
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| RrgError::InvalidData(format!("unknown period '{}'", s)))
    }
}

/// Market regime of a sector relative to the benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    Leading,
    Weakening,
    Lagging,
    Improving,
}

impl Quadrant {
    /// Clockwise from the top-right of the graph
    pub fn all() -> Vec<Quadrant> {
        vec![
            Quadrant::Leading,
            Quadrant::Weakening,
            Quadrant::Lagging,
            Quadrant::Improving,
        ]
    }

    /// Classify a point by the signs of its offsets from the centre.
    /// Exactly 100 on either axis counts as the upper side.
    pub fn classify(rs_ratio: f64, rs_momentum: f64) -> Self {
        match (rs_ratio >= RRG_CENTER, rs_momentum >= RRG_CENTER) {
            (true, true) => Quadrant::Leading,
            (true, false) => Quadrant::Weakening,
            (false, true) => Quadrant::Improving,
            (false, false) => Quadrant::Lagging,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::Leading => "Leading",
            Quadrant::Weakening => "Weakening",
            Quadrant::Lagging => "Lagging",
            Quadrant::Improving => "Improving",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Quadrant::Leading => "Outperforming the benchmark with rising relative momentum",
            Quadrant::Weakening => "Still outperforming, but relative momentum is fading",
            Quadrant::Lagging => "Underperforming the benchmark with falling relative momentum",
            Quadrant::Improving => "Underperforming, but relative momentum is picking up",
        }
    }

    /// Chart color for the quadrant
    pub fn color(&self) -> &'static str {
        match self {
            Quadrant::Leading => "#22c55e",
            Quadrant::Weakening => "#eab308",
            Quadrant::Lagging => "#ef4444",
            Quadrant::Improving => "#3b82f6",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sector and benchmark close prices on a shared, strictly increasing
/// timestamp grid
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    timestamps: Vec<i64>,
    sector: Vec<f64>,
    benchmark: Vec<f64>,
}

impl AlignedSeries {
    pub fn new(timestamps: Vec<i64>, sector: Vec<f64>, benchmark: Vec<f64>) -> Result<Self, RrgError> {
        if sector.len() != timestamps.len() || benchmark.len() != timestamps.len() {
            return Err(RrgError::InvalidData(format!(
                "aligned lengths differ: {} timestamps, {} sector, {} benchmark",
                timestamps.len(),
                sector.len(),
                benchmark.len()
            )));
        }
        if timestamps.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RrgError::InvalidData(
                "aligned timestamps must be strictly increasing".to_string(),
            ));
        }

        Ok(Self {
            timestamps,
            sector,
            benchmark,
        })
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn sector(&self) -> &[f64] {
        &self.sector
    }

    pub fn benchmark(&self) -> &[f64] {
        &self.benchmark
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// serde_json writes non-finite floats as `null`; read them back as NaN
fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// One point on the rotation graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RrgPoint {
    #[serde(deserialize_with = "nullable_f64")]
    pub rs_ratio: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub rs_momentum: f64,
    /// When the series containing this point was computed
    pub produced_at: DateTime<Utc>,
}

impl RrgPoint {
    pub fn quadrant(&self) -> Quadrant {
        Quadrant::classify(self.rs_ratio, self.rs_momentum)
    }

    /// Euclidean distance from (100, 100)
    pub fn distance_from_center(&self) -> f64 {
        let dx = self.rs_ratio - RRG_CENTER;
        let dy = self.rs_momentum - RRG_CENTER;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An instrument plotted against the benchmark
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sector {
    pub symbol: String,
    pub name: String,
    pub color: String,
}

impl Sector {
    pub fn new(symbol: &str, name: &str, color: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// Full RRG trajectory of one sector, most recent point last
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSeries {
    pub symbol: String,
    pub name: String,
    pub color: String,
    pub history: Vec<RrgPoint>,
    pub current_quadrant: Quadrant,
    #[serde(deserialize_with = "nullable_f64")]
    pub distance_from_center: f64,
}

impl TickerSeries {
    pub fn latest(&self) -> Option<&RrgPoint> {
        self.history.last()
    }

    /// The last `len` points of the history (all of it when shorter)
    pub fn trail(&self, len: usize) -> &[RrgPoint] {
        let start = self.history.len().saturating_sub(len);
        &self.history[start..]
    }

    /// Copy of this series with the history cut down to its trail.
    /// Quadrant and distance still describe the latest point.
    pub fn with_trail(&self, len: usize) -> TickerSeries {
        TickerSeries {
            history: self.trail(len).to_vec(),
            ..self.clone()
        }
    }
}

/// Strategist commentary on a rotation snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInsight {
    pub summary: String,
    #[serde(alias = "topSectors")]
    pub top_sectors: Vec<String>,
    #[serde(alias = "riskAssessment")]
    pub risk_assessment: String,
    #[serde(alias = "rotationStrategy")]
    pub rotation_strategy: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(rs_ratio: f64, rs_momentum: f64) -> RrgPoint {
        RrgPoint {
            rs_ratio,
            rs_momentum,
            produced_at: Utc::now(),
        }
    }

    #[test]
    fn test_quadrant_classification() {
        assert_eq!(Quadrant::classify(101.0, 102.0), Quadrant::Leading);
        assert_eq!(Quadrant::classify(101.0, 98.0), Quadrant::Weakening);
        assert_eq!(Quadrant::classify(99.0, 98.0), Quadrant::Lagging);
        assert_eq!(Quadrant::classify(99.0, 102.0), Quadrant::Improving);
        assert_eq!(Quadrant::Leading.color(), "#22c55e");
        assert!(Quadrant::Improving.description().contains("picking up"));
    }

    #[test]
    fn test_quadrant_ties_resolve_upward() {
        assert_eq!(Quadrant::classify(100.0, 100.0), Quadrant::Leading);
        assert_eq!(Quadrant::classify(100.0, 99.9), Quadrant::Weakening);
        assert_eq!(Quadrant::classify(99.9, 100.0), Quadrant::Improving);
    }

    #[test]
    fn test_distance_from_center() {
        assert_eq!(point(100.0, 100.0).distance_from_center(), 0.0);
        assert!((point(103.0, 104.0).distance_from_center() - 5.0).abs() < 1e-12);
        assert!(point(97.0, 96.0).distance_from_center() > 0.0);
    }

    #[test]
    fn test_period_round_trip_through_str() {
        for period in Period::all() {
            assert_eq!(period.as_str().parse::<Period>().unwrap(), period);
        }
        assert_eq!("1M".parse::<Period>().unwrap(), Period::Month);
        assert!("1m".parse::<Period>().is_err());
        assert_eq!(Period::default(), Period::Week);
    }

    #[test]
    fn test_period_serde_uses_short_codes() {
        let json = serde_json::to_string(&Period::FifteenMin).unwrap();
        assert_eq!(json, "\"15m\"");
        let parsed: Period = serde_json::from_str("\"1d\"").unwrap();
        assert_eq!(parsed, Period::Day);
    }

    #[test]
    fn test_aligned_series_rejects_bad_input() {
        assert!(AlignedSeries::new(vec![1, 2], vec![1.0], vec![1.0, 2.0]).is_err());
        assert!(AlignedSeries::new(vec![2, 1], vec![1.0, 1.0], vec![1.0, 2.0]).is_err());
        assert!(AlignedSeries::new(vec![1, 1], vec![1.0, 1.0], vec![1.0, 2.0]).is_err());

        let ok = AlignedSeries::new(vec![1, 2], vec![1.0, 2.0], vec![3.0, 4.0]).unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok.benchmark(), &[3.0, 4.0]);
    }

    #[test]
    fn test_trail_slices_most_recent_points() {
        let history: Vec<RrgPoint> = (0..20).map(|i| point(100.0 + i as f64, 100.0)).collect();
        let series = TickerSeries {
            symbol: "XLK".to_string(),
            name: "Technology".to_string(),
            color: "#60a5fa".to_string(),
            current_quadrant: Quadrant::Leading,
            distance_from_center: 19.0,
            history,
        };

        let trail = series.trail(5);
        assert_eq!(trail.len(), 5);
        assert_eq!(trail[4].rs_ratio, 119.0);
        assert_eq!(trail[0].rs_ratio, 115.0);
        assert_eq!(series.trail(100).len(), 20);

        let trimmed = series.with_trail(3);
        assert_eq!(trimmed.history.len(), 3);
        assert_eq!(trimmed.current_quadrant, Quadrant::Leading);
        assert_eq!(trimmed.latest(), series.latest());
    }

    #[test]
    fn test_non_finite_values_read_back_from_null() {
        let json = serde_json::to_string(&point(f64::NAN, 101.0)).unwrap();
        assert!(json.contains("\"rs_ratio\":null"));

        let parsed: RrgPoint = serde_json::from_str(&json).unwrap();
        assert!(parsed.rs_ratio.is_nan());
        assert_eq!(parsed.rs_momentum, 101.0);
        assert_eq!(parsed.quadrant(), Quadrant::Improving);
    }

    #[test]
    fn test_quadrant_legend_order() {
        let all = Quadrant::all();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], Quadrant::Leading);
        assert_eq!(all[3], Quadrant::Improving);
    }

    #[test]
    fn test_market_insight_accepts_camel_case() {
        let json = r#"{
            "summary": "Risk-on",
            "topSectors": ["XLK"],
            "riskAssessment": "Utilities fading",
            "rotationStrategy": "Overweight tech"
        }"#;
        let insight: MarketInsight = serde_json::from_str(json).unwrap();
        assert_eq!(insight.top_sectors, vec!["XLK".to_string()]);
        assert_eq!(insight.rotation_strategy, "Overweight tech");
    }
}
