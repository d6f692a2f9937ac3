//! Bounds policy and stats API configuration

use crate::error::CompareError;
use crate::types::Metric;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// How a metric's (min, max) pair is obtained.
/// Minima are always fixed; leaderboards only surface maxima.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum BoundSpec {
    Fixed { min: f64, max: f64 },
    Derived { min: f64 },
}

/// Per-metric bounds policy
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsConfig {
    specs: BTreeMap<Metric, BoundSpec>,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        use BoundSpec::{Derived, Fixed};

        let specs = [
            (Metric::Pts, Derived { min: 3.5 }),
            (Metric::Fgm, Derived { min: 1.2 }),
            (Metric::Fga, Derived { min: 3.2 }),
            (Metric::FgPct, Derived { min: 0.302 }),
            (Metric::Ftm, Derived { min: 0.7 }),
            (Metric::Fta, Derived { min: 1.0 }),
            (Metric::FtPct, Derived { min: 0.414 }),
            (Metric::Oreb, Derived { min: 0.3 }),
            (Metric::Dreb, Derived { min: 0.9 }),
            (Metric::Reb, Derived { min: 1.1 }),
            (Metric::Ast, Derived { min: 0.5 }),
            (Metric::Stl, Derived { min: 0.3 }),
            (Metric::Blk, Derived { min: 0.1 }),
            (Metric::Tov, Derived { min: 0.9 }),
            (Metric::Fg3m, Derived { min: 0.0 }),
            (Metric::Fg3a, Derived { min: 0.0 }),
            (Metric::Fg3Pct, Derived { min: 0.266 }),
            (Metric::Height, Fixed { min: 5.99, max: 7.4 }),
            (Metric::Weight, Fixed { min: 160.0, max: 290.0 }),
            (Metric::Position, Fixed { min: 1.0, max: 5.0 }),
        ];

        Self {
            specs: specs.into_iter().collect(),
        }
    }
}

impl BoundsConfig {
    /// Empty policy; every metric must be set explicitly
    pub fn empty() -> Self {
        Self {
            specs: BTreeMap::new(),
        }
    }

    pub fn with(mut self, metric: Metric, spec: BoundSpec) -> Self {
        self.specs.insert(metric, spec);
        self
    }

    pub fn spec(&self, metric: Metric) -> Result<BoundSpec, CompareError> {
        self.specs
            .get(&metric)
            .copied()
            .ok_or(CompareError::MissingBounds(metric))
    }

    /// Load overrides from a JSON object keyed by metric name, merged over the defaults:
    /// `{"HEIGHT": {"source": "fixed", "min": 5.5, "max": 7.6}, "PTS": {"source": "derived", "min": 2.0}}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let overrides: BTreeMap<Metric, BoundSpec> =
            serde_json::from_str(json).context("Invalid bounds config")?;
        let mut config = Self::default();
        config.specs.extend(overrides);
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read bounds config {}", path.display()))?;
        Self::from_json_str(&text)
    }
}

/// What to do with a position label outside Guard/Forward/Center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmappedPositionPolicy {
    /// Fail the comparison with `UnmappedCategory`
    #[default]
    Reject,
    /// Leave POSITION absent; it normalizes to 0 with a notice
    TreatAsMissing,
}

impl UnmappedPositionPolicy {
    pub fn from_env() -> Self {
        match std::env::var("UNMAPPED_POSITION").as_deref() {
            Ok("missing") => Self::TreatAsMissing,
            _ => Self::Reject,
        }
    }
}

/// Stats API endpoint and reference-population settings
#[derive(Debug, Clone)]
pub struct StatsApiConfig {
    pub base_url: String,
    pub league_id: String,
    pub leaders_top_n: u32,
    pub per_mode: String,
    pub season_type: String,
    /// Season used for the all-players index
    pub season: String,
    pub timeout: Duration,
}

impl Default for StatsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://stats.nba.com/stats".to_string(),
            league_id: "00".to_string(),
            leaders_top_n: 10,
            per_mode: "PerGame".to_string(),
            season_type: "Regular Season".to_string(),
            season: "2023-24".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl StatsApiConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("STATS_API_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(top_n) = std::env::var("LEADERS_TOP_N") {
            config.leaders_top_n = top_n
                .parse()
                .with_context(|| format!("LEADERS_TOP_N must be a positive integer, got '{}'", top_n))?;
        }
        if let Ok(season_type) = std::env::var("LEADERS_SEASON_TYPE") {
            config.season_type = season_type;
        }
        if let Ok(season) = std::env::var("STATS_SEASON") {
            config.season = season;
        }
        if let Ok(secs) = std::env::var("STATS_API_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("STATS_API_TIMEOUT_SECS must be an integer, got '{}'", secs))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
