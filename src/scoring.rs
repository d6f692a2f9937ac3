//! Similarity scoring between two normalized vectors

use crate::error::{CompareError, Result};
use crate::types::*;
use std::collections::BTreeSet;

/// 1 - |a - b| for one metric. Not clamped.
pub fn closeness(a: f64, b: f64) -> f64 {
    1.0 - (a - b).abs()
}

/// Unweighted mean closeness across the schema. Both vectors must carry
/// exactly the schema's metrics.
pub fn score(a: &NormalizedVector, b: &NormalizedVector, schema: &MetricSchema) -> Result<f64> {
    let expected: BTreeSet<Metric> = schema.metrics().collect();
    let keys_a: BTreeSet<Metric> = a.metrics().collect();
    let keys_b: BTreeSet<Metric> = b.metrics().collect();

    if keys_a != expected || keys_b != expected {
        let mismatched: BTreeSet<Metric> = expected
            .symmetric_difference(&keys_a)
            .chain(expected.symmetric_difference(&keys_b))
            .copied()
            .collect();
        return Err(CompareError::SchemaMismatch {
            mismatched: mismatched.into_iter().collect(),
        });
    }

    let total: f64 = schema
        .metrics()
        .filter_map(|m| Some(closeness(a.get(m)?, b.get(m)?)))
        .sum();

    Ok(total / expected.len() as f64)
}
