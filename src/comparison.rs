//! Comparison orchestrator: resolves two athletes and runs the scoring pipeline

use crate::bounds::BoundsProvider;
use crate::config::{BoundsConfig, UnmappedPositionPolicy};
use crate::error::Result;
use crate::extract::FeatureExtractor;
use crate::normalize::normalize;
use crate::provider::StatsProvider;
use crate::scoring::score;
use crate::types::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Compares exactly two athletes against a shared, freshly built bounds table
pub struct Comparator {
    provider: Arc<dyn StatsProvider>,
    schema: MetricSchema,
    bounds_config: BoundsConfig,
    extractor: FeatureExtractor,
}

/// Records fetched for one resolved athlete
struct AthleteRecords {
    identity: AthleteIdentity,
    career: Vec<StatLine>,
    biography: Biography,
}

impl Comparator {
    pub fn new(
        provider: Arc<dyn StatsProvider>,
        bounds_config: BoundsConfig,
        position_policy: UnmappedPositionPolicy,
    ) -> Self {
        Self {
            provider,
            schema: MetricSchema::standard(),
            bounds_config,
            extractor: FeatureExtractor::new(position_policy),
        }
    }

    /// Default bounds policy and strict position handling
    pub fn with_defaults(provider: Arc<dyn StatsProvider>) -> Self {
        Self::new(provider, BoundsConfig::default(), UnmappedPositionPolicy::Reject)
    }

    /// Main entry point: compare two athletes by name
    pub async fn compare(&self, name1: &str, name2: &str) -> Result<ComparisonOutcome> {
        let start = Instant::now();
        info!("Comparing '{}' with '{}' via {}", name1, name2, self.provider.name());

        // Step 1: Resolve both names
        let (found1, found2) = futures::try_join!(
            self.provider.lookup_athlete_by_name(name1),
            self.provider.lookup_athlete_by_name(name2),
        )?;

        let (id1, id2) = match (first_match(name1, found1), first_match(name2, found2)) {
            (Some(id1), Some(id2)) => (id1, id2),
            (id1, id2) => {
                let unresolved: Vec<String> = [(name1, id1.is_none()), (name2, id2.is_none())]
                    .into_iter()
                    .filter(|(_, missing)| *missing)
                    .map(|(name, _)| name.to_string())
                    .collect();
                info!("Player not found: {:?}", unresolved);
                return Ok(ComparisonOutcome::NotFound { unresolved });
            }
        };

        // Step 2: Fetch both athletes and the reference bounds
        let bounds_provider = BoundsProvider::new(self.provider.as_ref(), &self.bounds_config);
        let (records1, records2, bounds) = futures::try_join!(
            self.fetch_records(id1),
            self.fetch_records(id2),
            bounds_provider.get_bounds(&self.schema),
        )?;

        // Step 3: Extract and normalize against the shared table
        let mut notices = Vec::new();
        let first = self.build_profile(records1, &bounds, &mut notices)?;
        let second = self.build_profile(records2, &bounds, &mut notices)?;

        // Step 4: Score
        let similarity = score(&first.normalized, &second.normalized, &self.schema)?;

        info!(
            "Comparison complete: {} vs {} = {:.4} ({} missing metrics, {}ms)",
            first.display_name,
            second.display_name,
            similarity,
            notices.len(),
            start.elapsed().as_millis()
        );

        Ok(ComparisonOutcome::Compared(Box::new(ComparisonResult {
            first,
            second,
            bounds,
            score: similarity,
            notices,
        })))
    }

    async fn fetch_records(&self, identity: AthleteIdentity) -> Result<AthleteRecords> {
        let (career, biography) = futures::try_join!(
            self.provider.get_career_averages(identity.id),
            self.provider.get_biography(identity.id),
        )?;
        debug!(
            "Fetched {} career rows for {} ({})",
            career.len(),
            biography.display_name,
            identity.id
        );
        Ok(AthleteRecords {
            identity,
            career,
            biography,
        })
    }

    fn build_profile(
        &self,
        records: AthleteRecords,
        bounds: &BoundsTable,
        notices: &mut Vec<MissingMetric>,
    ) -> Result<AthleteProfile> {
        let raw = self
            .extractor
            .extract(&records.career, &records.biography, &self.schema)?;
        let normalization = normalize(&records.biography.display_name, &raw, bounds, &self.schema)?;
        notices.extend(normalization.notices);

        Ok(AthleteProfile {
            identity: records.identity,
            display_name: records.biography.display_name,
            raw,
            normalized: normalization.vector,
        })
    }
}

/// First candidate wins; ambiguity is not resolved further
fn first_match(name: &str, found: Vec<AthleteIdentity>) -> Option<AthleteIdentity> {
    if found.len() > 1 {
        debug!(
            "'{}' matched {} athletes, using {}",
            name,
            found.len(),
            found[0].full_name
        );
    }
    found.into_iter().next()
}
