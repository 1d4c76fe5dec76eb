use rrg_core::TickerSeries;
use serde_json::{json, Value};

/// One line per sector: symbol, name, quadrant and latest coordinates
pub fn sector_context(series: &[TickerSeries]) -> String {
    series
        .iter()
        .filter_map(|s| {
            let latest = s.latest()?;
            Some(format!(
                "{} ({}): Quadrant={}, RS-Ratio={:.2}, RS-Momentum={:.2}",
                s.symbol, s.name, s.current_quadrant, latest.rs_ratio, latest.rs_momentum
            ))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(series: &[TickerSeries]) -> String {
    format!(
        r#"Act as a senior quantitative macro strategist. Analyze the following Sector Relative Rotation Graph (RRG) data:

{}

Provide a professional market commentary including:
1. A concise summary of the current market regime.
2. Identification of the strongest leading sectors.
3. A brief risk assessment of sectors in the weakening or lagging quadrants.
4. A rotation strategy for the next period.

Return the result strictly as a JSON object matching this structure:
{{
  "summary": "string",
  "topSectors": ["string"],
  "riskAssessment": "string",
  "rotationStrategy": "string"
}}"#,
        sector_context(series)
    )
}

/// Structured-output schema matching `MarketInsight`
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "topSectors": { "type": "ARRAY", "items": { "type": "STRING" } },
            "riskAssessment": { "type": "STRING" },
            "rotationStrategy": { "type": "STRING" }
        },
        "required": ["summary", "topSectors", "riskAssessment", "rotationStrategy"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rrg_core::{Quadrant, RrgPoint};

    fn series(symbol: &str, name: &str, points: &[(f64, f64)], quadrant: Quadrant) -> TickerSeries {
        TickerSeries {
            symbol: symbol.to_string(),
            name: name.to_string(),
            color: "#ffffff".to_string(),
            history: points
                .iter()
                .map(|&(rs_ratio, rs_momentum)| RrgPoint {
                    rs_ratio,
                    rs_momentum,
                    produced_at: Utc::now(),
                })
                .collect(),
            current_quadrant: quadrant,
            distance_from_center: 0.0,
        }
    }

    #[test]
    fn test_sector_context_uses_latest_point() {
        let data = vec![
            series("XLK", "Technology", &[(99.0, 98.0), (101.234, 103.456)], Quadrant::Leading),
            series("XLU", "Utilities", &[(97.5, 99.999)], Quadrant::Lagging),
        ];

        let context = sector_context(&data);
        let lines: Vec<&str> = context.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "XLK (Technology): Quadrant=Leading, RS-Ratio=101.23, RS-Momentum=103.46"
        );
        assert_eq!(
            lines[1],
            "XLU (Utilities): Quadrant=Lagging, RS-Ratio=97.50, RS-Momentum=100.00"
        );
    }

    #[test]
    fn test_empty_history_is_left_out() {
        let data = vec![series("XLE", "Energy", &[], Quadrant::Lagging)];
        assert!(sector_context(&data).is_empty());
    }

    #[test]
    fn test_prompt_embeds_context_and_shape() {
        let data = vec![series("XLF", "Financials", &[(102.0, 97.0)], Quadrant::Weakening)];
        let prompt = build_prompt(&data);

        assert!(prompt.contains("XLF (Financials): Quadrant=Weakening"));
        assert!(prompt.contains("\"topSectors\": [\"string\"]"));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = response_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 4);
        assert_eq!(schema["properties"]["topSectors"]["type"], "ARRAY");
    }
}
