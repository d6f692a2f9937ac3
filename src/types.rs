//! Core type definitions for athlete comparison

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single compared attribute. Declaration order is display order.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Metric {
    Pts,
    Fgm,
    Fga,
    FgPct,
    Ftm,
    Fta,
    FtPct,
    Oreb,
    Dreb,
    Reb,
    Ast,
    Stl,
    Blk,
    Tov,
    Fg3m,
    Fg3a,
    Fg3Pct,
    Height,
    Weight,
    Position,
}

impl Metric {
    pub const ALL: [Metric; 20] = [
        Metric::Pts,
        Metric::Fgm,
        Metric::Fga,
        Metric::FgPct,
        Metric::Ftm,
        Metric::Fta,
        Metric::FtPct,
        Metric::Oreb,
        Metric::Dreb,
        Metric::Reb,
        Metric::Ast,
        Metric::Stl,
        Metric::Blk,
        Metric::Tov,
        Metric::Fg3m,
        Metric::Fg3a,
        Metric::Fg3Pct,
        Metric::Height,
        Metric::Weight,
        Metric::Position,
    ];

    /// Wire name, matching the stats API column headers
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Pts => "PTS",
            Metric::Fgm => "FGM",
            Metric::Fga => "FGA",
            Metric::FgPct => "FG_PCT",
            Metric::Ftm => "FTM",
            Metric::Fta => "FTA",
            Metric::FtPct => "FT_PCT",
            Metric::Oreb => "OREB",
            Metric::Dreb => "DREB",
            Metric::Reb => "REB",
            Metric::Ast => "AST",
            Metric::Stl => "STL",
            Metric::Blk => "BLK",
            Metric::Tov => "TOV",
            Metric::Fg3m => "FG3M",
            Metric::Fg3a => "FG3A",
            Metric::Fg3Pct => "FG3_PCT",
            Metric::Height => "HEIGHT",
            Metric::Weight => "WEIGHT",
            Metric::Position => "POSITION",
        }
    }

    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.name() == name)
    }

    pub fn polarity(&self) -> Polarity {
        match self {
            Metric::Tov => Polarity::Descending,
            _ => Polarity::Ascending,
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Height | Metric::Weight => MetricKind::Physical,
            Metric::Position => MetricKind::Ordinal,
            _ => MetricKind::RateStat,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Polarity {
    /// Higher raw value is better
    Ascending,
    /// Lower raw value is better (turnovers)
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricKind {
    RateStat,     // per-game averages and percentages
    Physical,     // height, weight
    Ordinal,      // categorical position encoded as 1/3/5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricDef {
    pub metric: Metric,
    pub polarity: Polarity,
    pub kind: MetricKind,
}

/// Fixed, ordered metric schema
#[derive(Debug, Clone)]
pub struct MetricSchema {
    defs: Vec<MetricDef>,
}

impl MetricSchema {
    pub fn standard() -> Self {
        let defs = Metric::ALL
            .iter()
            .map(|&metric| MetricDef {
                metric,
                polarity: metric.polarity(),
                kind: metric.kind(),
            })
            .collect();
        Self { defs }
    }

    pub fn defs(&self) -> &[MetricDef] {
        &self.defs
    }

    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.defs.iter().map(|d| d.metric)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl Default for MetricSchema {
    fn default() -> Self {
        Self::standard()
    }
}

/// Unscaled per-metric values for one athlete. Absent != zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFeatureVector(BTreeMap<Metric, f64>);

impl RawFeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: Metric, value: f64) {
        self.0.insert(metric, value);
    }

    pub fn remove(&mut self, metric: Metric) -> Option<f64> {
        self.0.remove(&metric)
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0.get(&metric).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.0.iter().map(|(m, v)| (*m, *v))
    }
}

impl FromIterator<(Metric, f64)> for RawFeatureVector {
    fn from_iter<I: IntoIterator<Item = (Metric, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Per-metric values rescaled against a bounds table. Not clamped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedVector(BTreeMap<Metric, f64>);

impl NormalizedVector {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0.get(&metric).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.0.iter().map(|(m, v)| (*m, *v))
    }

    pub(crate) fn insert(&mut self, metric: Metric, value: f64) {
        self.0.insert(metric, value);
    }
}

impl FromIterator<(Metric, f64)> for NormalizedVector {
    fn from_iter<I: IntoIterator<Item = (Metric, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reference range for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Per-metric bounds built once per comparison run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BoundsTable(BTreeMap<Metric, Bounds>);

impl BoundsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: Metric, bounds: Bounds) {
        self.0.insert(metric, bounds);
    }

    pub fn get(&self, metric: Metric) -> Option<Bounds> {
        self.0.get(&metric).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, Bounds)> + '_ {
        self.0.iter().map(|(m, b)| (*m, *b))
    }
}

impl FromIterator<(Metric, Bounds)> for BoundsTable {
    fn from_iter<I: IntoIterator<Item = (Metric, Bounds)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Athlete identity as returned by a name lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteIdentity {
    pub id: u64,
    pub full_name: String,
}

/// One row of per-game averages (a season, or the career totals row).
/// A stat missing from `stats` was not recorded for that row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatLine {
    pub stats: BTreeMap<Metric, f64>,
}

/// Biographical record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Biography {
    pub display_name: String,
    pub height: Option<String>,   // composite feet-inches token, e.g. "6-6"
    pub weight: Option<f64>,
    pub position: Option<String>,
}

/// One entry of a league-leaders board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderEntry {
    pub athlete_name: String,
    pub value: f64,
}

/// Non-fatal notice: a metric was unavailable and substituted with 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingMetric {
    pub athlete: String,
    pub metric: Metric,
}

impl fmt::Display for MissingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} does not have data for {}. Setting to 0.", self.athlete, self.metric)
    }
}

/// Everything computed for one side of a comparison
#[derive(Debug, Clone, Serialize)]
pub struct AthleteProfile {
    pub identity: AthleteIdentity,
    pub display_name: String,
    pub raw: RawFeatureVector,
    pub normalized: NormalizedVector,
}

/// Result of comparing exactly two athletes
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub first: AthleteProfile,
    pub second: AthleteProfile,
    pub bounds: BoundsTable,
    pub score: f64,
    pub notices: Vec<MissingMetric>,
}

/// Outcome of a comparison request. Unresolved names are an expected case.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    NotFound { unresolved: Vec<String> },
    Compared(Box<ComparisonResult>),
}
