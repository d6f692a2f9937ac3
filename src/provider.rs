//! External statistics collaborators

use crate::types::*;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of athlete records and reference leaderboards
#[async_trait]
pub trait StatsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fuzzy name lookup; may return zero, one, or several identities
    async fn lookup_athlete_by_name(&self, name: &str) -> Result<Vec<AthleteIdentity>>;

    /// Per-game average rows for the athlete's regular-season career
    async fn get_career_averages(&self, athlete_id: u64) -> Result<Vec<StatLine>>;

    async fn get_biography(&self, athlete_id: u64) -> Result<Biography>;

    /// Leaderboard for one metric over the configured reference population
    async fn get_reference_leaders(&self, metric: Metric) -> Result<Vec<LeaderEntry>>;

    /// Leaderboards for several metrics, in input order. Providers whose
    /// source serves every board in one response override this to fetch once.
    async fn get_reference_leaders_many(&self, metrics: &[Metric]) -> Vec<Result<Vec<LeaderEntry>>> {
        let tasks = metrics.iter().map(|&metric| self.get_reference_leaders(metric));
        futures::future::join_all(tasks).await
    }
}

/// In-memory provider for tests and offline runs
#[derive(Default)]
pub struct MockStatsProvider {
    athletes: Vec<AthleteIdentity>,
    careers: HashMap<u64, Vec<StatLine>>,
    biographies: HashMap<u64, Biography>,
    leaders: HashMap<Metric, Vec<LeaderEntry>>,
    lookups: AtomicUsize,
    fetches: AtomicUsize,
}

impl MockStatsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_athlete(
        mut self,
        identity: AthleteIdentity,
        career: Vec<StatLine>,
        biography: Biography,
    ) -> Self {
        self.careers.insert(identity.id, career);
        self.biographies.insert(identity.id, biography);
        self.athletes.push(identity);
        self
    }

    pub fn with_leaders(mut self, metric: Metric, values: &[f64]) -> Self {
        let entries = values
            .iter()
            .enumerate()
            .map(|(i, &value)| LeaderEntry {
                athlete_name: format!("Leader {}", i + 1),
                value,
            })
            .collect();
        self.leaders.insert(metric, entries);
        self
    }

    /// Number of name lookups served
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of career, biography and leaderboard fetches served
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatsProvider for MockStatsProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn lookup_athlete_by_name(&self, name: &str) -> Result<Vec<AthleteIdentity>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(matching_identities(&self.athletes, name))
    }

    async fn get_career_averages(&self, athlete_id: u64) -> Result<Vec<StatLine>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.careers
            .get(&athlete_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No career stats for athlete {}", athlete_id))
    }

    async fn get_biography(&self, athlete_id: u64) -> Result<Biography> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.biographies
            .get(&athlete_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No biography for athlete {}", athlete_id))
    }

    async fn get_reference_leaders(&self, metric: Metric) -> Result<Vec<LeaderEntry>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.leaders
            .get(&metric)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No leaderboard for {}", metric))
    }
}

/// Case-insensitive substring match on the full name, in index order
pub fn matching_identities(index: &[AthleteIdentity], query: &str) -> Vec<AthleteIdentity> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    index
        .iter()
        .filter(|a| a.full_name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
