//! Min-max normalization with per-metric polarity

use crate::error::{CompareError, Result};
use crate::types::*;
use tracing::warn;

/// Normalized vector plus the metrics that had to be substituted
#[derive(Debug, Clone)]
pub struct Normalization {
    pub vector: NormalizedVector,
    pub notices: Vec<MissingMetric>,
}

/// Project a raw vector onto the bounds table.
///
/// Every schema metric is present in the output. A metric missing from `raw`
/// becomes 0 and produces a `MissingMetric` notice. Values outside the bounds
/// are left unclamped. The ordinal position passes through unscaled.
pub fn normalize(
    athlete: &str,
    raw: &RawFeatureVector,
    bounds: &BoundsTable,
    schema: &MetricSchema,
) -> Result<Normalization> {
    let mut vector = NormalizedVector::default();
    let mut notices = Vec::new();

    for def in schema.defs() {
        let metric = def.metric;
        let b = bounds.get(metric).ok_or(CompareError::MissingBounds(metric))?;

        if def.kind != MetricKind::Ordinal && !(b.max > b.min) {
            return Err(CompareError::DegenerateBounds {
                metric,
                min: b.min,
                max: b.max,
            });
        }

        let Some(value) = raw.get(metric) else {
            let notice = MissingMetric {
                athlete: athlete.to_string(),
                metric,
            };
            warn!("{}", notice);
            notices.push(notice);
            vector.insert(metric, 0.0);
            continue;
        };

        vector.insert(metric, scale(value, b, def));
    }

    Ok(Normalization { vector, notices })
}

fn scale(value: f64, bounds: Bounds, def: &MetricDef) -> f64 {
    if def.kind == MetricKind::Ordinal {
        return value;
    }
    let t = (value - bounds.min) / (bounds.max - bounds.min);
    match def.polarity {
        Polarity::Ascending => t,
        Polarity::Descending => 1.0 - t,
    }
}
