//! Athlete feature extraction: career rows + biography -> raw feature vector

use crate::config::UnmappedPositionPolicy;
use crate::error::{CompareError, Result};
use crate::types::*;
use tracing::warn;

/// Pure transform from collaborator records to a raw feature vector
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor {
    pub position_policy: UnmappedPositionPolicy,
}

impl FeatureExtractor {
    pub fn new(position_policy: UnmappedPositionPolicy) -> Self {
        Self { position_policy }
    }

    pub fn extract(
        &self,
        career: &[StatLine],
        biography: &Biography,
        schema: &MetricSchema,
    ) -> Result<RawFeatureVector> {
        let mut raw = RawFeatureVector::new();

        for def in schema.defs() {
            let value = match def.metric {
                Metric::Height => match biography.height.as_deref() {
                    Some(token) => Some(parse_height(token).ok_or_else(|| {
                        CompareError::MalformedHeight {
                            athlete: biography.display_name.clone(),
                            token: token.to_string(),
                        }
                    })?),
                    None => None,
                },
                Metric::Weight => biography.weight.filter(|w| w.is_finite()),
                Metric::Position => self.position(biography)?,
                metric => career_mean(career, metric),
            };

            if let Some(value) = value {
                raw.insert(def.metric, value);
            }
        }

        Ok(raw)
    }

    fn position(&self, biography: &Biography) -> Result<Option<f64>> {
        let Some(label) = biography.position.as_deref() else {
            return Ok(None);
        };
        match position_ordinal(label) {
            Some(ordinal) => Ok(Some(ordinal)),
            None => match self.position_policy {
                UnmappedPositionPolicy::Reject => Err(CompareError::UnmappedCategory {
                    athlete: biography.display_name.clone(),
                    metric: Metric::Position,
                    label: label.to_string(),
                }),
                UnmappedPositionPolicy::TreatAsMissing => {
                    warn!(
                        "{} has unmapped position '{}', treating as missing",
                        biography.display_name, label
                    );
                    Ok(None)
                }
            },
        }
    }
}

/// Mean of one stat across rows, skipping rows where it was not recorded
pub fn career_mean(career: &[StatLine], metric: Metric) -> Option<f64> {
    let (sum, count) = career
        .iter()
        .filter_map(|line| line.stats.get(&metric).copied())
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

    (count > 0).then(|| sum / count as f64)
}

/// "6-6" -> 6.6. The separator becomes a decimal point; this is not a
/// feet-plus-inches conversion and "6-11" reads as 6.11.
pub fn parse_height(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    token
        .replace('-', ".")
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite())
}

/// Guard -> 1, Forward -> 3, Center -> 5
pub fn position_ordinal(label: &str) -> Option<f64> {
    match label {
        "Guard" => Some(1.0),
        "Forward" => Some(3.0),
        "Center" => Some(5.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(stats: &[(Metric, f64)]) -> StatLine {
        StatLine {
            stats: stats.iter().copied().collect(),
        }
    }

    fn bio(height: Option<&str>, weight: Option<f64>, position: Option<&str>) -> Biography {
        Biography {
            display_name: "Test Player".to_string(),
            height: height.map(String::from),
            weight,
            position: position.map(String::from),
        }
    }

    #[test]
    fn test_height_token_approximation() {
        assert_eq!(parse_height("6-6"), Some(6.6));
        assert_eq!(parse_height("7-0"), Some(7.0));
        assert_eq!(parse_height("6-11"), Some(6.11));
        assert_eq!(parse_height(""), None);
        assert_eq!(parse_height("six feet"), None);
    }

    #[test]
    fn test_position_ordinals() {
        assert_eq!(position_ordinal("Guard"), Some(1.0));
        assert_eq!(position_ordinal("Forward"), Some(3.0));
        assert_eq!(position_ordinal("Center"), Some(5.0));
        assert_eq!(position_ordinal("Guard-Forward"), None);
    }

    #[test]
    fn test_career_mean_skips_missing_seasons() {
        let career = vec![
            line(&[(Metric::Pts, 20.0), (Metric::Fg3m, 1.0)]),
            line(&[(Metric::Pts, 30.0)]),
            line(&[(Metric::Pts, 25.0), (Metric::Fg3m, f64::NAN)]),
        ];
        assert_eq!(career_mean(&career, Metric::Pts), Some(25.0));
        assert_eq!(career_mean(&career, Metric::Fg3m), Some(1.0));
        assert_eq!(career_mean(&career, Metric::Ast), None);
    }

    #[test]
    fn test_extract_distinguishes_absent_from_zero() {
        let career = vec![line(&[(Metric::Pts, 12.0), (Metric::Blk, 0.0)])];
        let raw = FeatureExtractor::default()
            .extract(&career, &bio(Some("6-9"), Some(250.0), Some("Center")), &MetricSchema::standard())
            .unwrap();

        assert_eq!(raw.get(Metric::Pts), Some(12.0));
        assert_eq!(raw.get(Metric::Blk), Some(0.0));
        assert_eq!(raw.get(Metric::Ast), None);
        assert_eq!(raw.get(Metric::Height), Some(6.9));
        assert_eq!(raw.get(Metric::Weight), Some(250.0));
        assert_eq!(raw.get(Metric::Position), Some(5.0));
        assert_eq!(raw.len(), 5);
    }

    #[test]
    fn test_unmapped_position_rejected_by_default() {
        let err = FeatureExtractor::default()
            .extract(&[], &bio(None, None, Some("Forward-Center")), &MetricSchema::standard())
            .unwrap_err();
        match err {
            CompareError::UnmappedCategory { metric, label, .. } => {
                assert_eq!(metric, Metric::Position);
                assert_eq!(label, "Forward-Center");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unmapped_position_can_be_treated_as_missing() {
        let raw = FeatureExtractor::new(UnmappedPositionPolicy::TreatAsMissing)
            .extract(&[], &bio(Some("6-8"), None, Some("Forward-Center")), &MetricSchema::standard())
            .unwrap();
        assert_eq!(raw.get(Metric::Position), None);
        assert_eq!(raw.get(Metric::Height), Some(6.8));
    }

    #[test]
    fn test_malformed_height_is_an_error() {
        let err = FeatureExtractor::default()
            .extract(&[], &bio(Some("tall"), None, None), &MetricSchema::standard())
            .unwrap_err();
        assert!(matches!(err, CompareError::MalformedHeight { .. }));
        assert!(err.is_input_error());
    }
}
