//! Error taxonomy for comparisons

use crate::types::Metric;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompareError>;

/// Fatal comparison errors. An unresolved athlete name is not one of these;
/// it is reported through `ComparisonOutcome::NotFound`.
#[derive(Error, Debug)]
pub enum CompareError {
    /// max <= min for a metric that is min-max scaled
    #[error("Degenerate bounds for {metric}: min={min}, max={max}")]
    DegenerateBounds { metric: Metric, min: f64, max: f64 },

    /// Reference leaders query failed or came back empty
    #[error("Bounds unavailable for {metric}: {reason}")]
    BoundsUnavailable { metric: Metric, reason: String },

    /// Bounds table or bounds config has no entry for a schema metric
    #[error("No bounds configured for {0}")]
    MissingBounds(Metric),

    /// Normalized vectors disagree with each other or with the schema
    #[error("Schema mismatch on metrics {mismatched:?}")]
    SchemaMismatch { mismatched: Vec<Metric> },

    /// Position label outside Guard/Forward/Center
    #[error("Unmapped {metric} label '{label}' for {athlete}")]
    UnmappedCategory {
        athlete: String,
        metric: Metric,
        label: String,
    },

    #[error("Malformed height '{token}' for {athlete}")]
    MalformedHeight { athlete: String, token: String },

    /// Failure talking to the statistics provider
    #[error("Stats provider error: {0:#}")]
    Provider(#[from] anyhow::Error),
}

impl CompareError {
    /// Errors caused by the athlete's own record rather than configuration or I/O
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CompareError::UnmappedCategory { .. } | CompareError::MalformedHeight { .. }
        )
    }
}
