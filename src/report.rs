//! Plain-text rendering of a comparison

use crate::types::*;
use std::fmt;

/// Raw values, bounds, normalized values and the score, as printed by the CLI
pub struct Report<'a>(pub &'a ComparisonResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let (a, b) = (&result.first, &result.second);

        writeln!(f, "{:<10} {:>16} {:>16}", "Metric", a.display_name, b.display_name)?;
        for metric in Metric::ALL {
            writeln!(
                f,
                "{:<10} {:>16} {:>16}",
                metric.name(),
                cell(a.raw.get(metric)),
                cell(b.raw.get(metric))
            )?;
        }

        writeln!(f, "\nMax Values:")?;
        for (metric, bounds) in result.bounds.iter() {
            writeln!(f, "  {:<10} {}", metric.name(), bounds.max)?;
        }
        writeln!(f, "\nMin Values:")?;
        for (metric, bounds) in result.bounds.iter() {
            writeln!(f, "  {:<10} {}", metric.name(), bounds.min)?;
        }

        for profile in [a, b] {
            writeln!(f, "\n{}'s normalized metrics", profile.display_name)?;
            for (metric, value) in profile.normalized.iter() {
                writeln!(f, "  {:<10} {:.4}", metric.name(), value)?;
            }
        }

        if !result.notices.is_empty() {
            writeln!(f)?;
            for notice in &result.notices {
                writeln!(f, "{}", notice)?;
            }
        }

        writeln!(f, "\nSimilarity Score: {:.4}", result.score)
    }
}

pub fn render_report(result: &ComparisonResult) -> String {
    Report(result).to_string()
}

fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.3}", v),
        None => "None".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, id: u64, pts: Option<f64>) -> AthleteProfile {
        let raw: RawFeatureVector = pts.map(|v| (Metric::Pts, v)).into_iter().collect();
        AthleteProfile {
            identity: AthleteIdentity {
                id,
                full_name: name.to_string(),
            },
            display_name: name.to_string(),
            raw,
            normalized: [(Metric::Pts, pts.map_or(0.0, |v| v / 30.0))].into_iter().collect(),
        }
    }

    #[test]
    fn test_report_sections() {
        let result = ComparisonResult {
            first: profile("Player One", 1, Some(15.0)),
            second: profile("Player Two", 2, None),
            bounds: [(Metric::Pts, Bounds::new(0.0, 30.0))].into_iter().collect(),
            score: 0.81234,
            notices: vec![MissingMetric {
                athlete: "Player Two".to_string(),
                metric: Metric::Pts,
            }],
        };

        let text = render_report(&result);

        assert!(text.contains("15.000"));
        assert!(text.contains("None"));
        assert!(text.contains("Max Values:"));
        assert!(text.contains("Player One's normalized metrics"));
        assert!(text.contains("Player Two does not have data for PTS. Setting to 0."));
        assert!(text.trim_end().ends_with("Similarity Score: 0.8123"));
    }
}
