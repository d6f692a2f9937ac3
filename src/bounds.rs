//! Bounds resolution: fixed floors plus leaderboard-derived maxima

use crate::config::{BoundSpec, BoundsConfig};
use crate::error::{CompareError, Result};
use crate::provider::StatsProvider;
use crate::types::*;
use tracing::{debug, info};

/// Builds a fresh bounds table for one comparison run
pub struct BoundsProvider<'a> {
    stats: &'a dyn StatsProvider,
    config: &'a BoundsConfig,
}

impl<'a> BoundsProvider<'a> {
    pub fn new(stats: &'a dyn StatsProvider, config: &'a BoundsConfig) -> Self {
        Self { stats, config }
    }

    /// Resolve (min, max) for every schema metric. All leaderboards are requested in one batch.
    pub async fn get_bounds(&self, schema: &MetricSchema) -> Result<BoundsTable> {
        let mut table = BoundsTable::new();
        let mut derived = Vec::new();

        for metric in schema.metrics() {
            match self.config.spec(metric)? {
                BoundSpec::Fixed { min, max } => table.insert(metric, Bounds::new(min, max)),
                BoundSpec::Derived { min } => derived.push((metric, min)),
            }
        }

        let metrics: Vec<Metric> = derived.iter().map(|&(metric, _)| metric).collect();
        let results = self.stats.get_reference_leaders_many(&metrics).await;

        for ((metric, min), res) in derived.into_iter().zip(results) {
            let leaders = res.map_err(|e| CompareError::BoundsUnavailable {
                metric,
                reason: format!("{:#}", e),
            })?;
            let top = leaderboard_top(&leaders).ok_or_else(|| CompareError::BoundsUnavailable {
                metric,
                reason: "empty leaderboard".to_string(),
            })?;
            debug!(
                "{} bounds: min={} (fixed), max={} ({})",
                metric, min, top.value, top.athlete_name
            );
            table.insert(metric, Bounds::new(min, top.value));
        }

        info!("Resolved bounds for {} metrics via {}", table.len(), self.stats.name());
        Ok(table)
    }
}

/// Entry with the highest finite value
fn leaderboard_top(leaders: &[LeaderEntry]) -> Option<&LeaderEntry> {
    leaders
        .iter()
        .filter(|e| e.value.is_finite())
        .max_by(|a, b| a.value.total_cmp(&b.value))
}
