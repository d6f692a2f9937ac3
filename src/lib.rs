//! hoopsim - Athlete similarity scoring
//!
//! Compares two basketball players on a fixed set of per-game statistics
//! and physical attributes:
//! - Bounds from fixed floors plus league-leader maxima
//! - Min-max normalization with per-metric polarity
//! - Unweighted mean closeness as the similarity score

pub mod types;
pub mod error;
pub mod config;
pub mod provider;
pub mod http_provider;
pub mod bounds;
pub mod extract;
pub mod normalize;
pub mod scoring;
pub mod comparison;
pub mod report;
pub mod server;

pub use types::*;
pub use error::{CompareError, Result};
pub use config::{BoundSpec, BoundsConfig, StatsApiConfig, UnmappedPositionPolicy};
pub use provider::{MockStatsProvider, StatsProvider};
pub use http_provider::HttpStatsProvider;
pub use bounds::BoundsProvider;
pub use extract::FeatureExtractor;
pub use comparison::Comparator;
pub use report::render_report;
