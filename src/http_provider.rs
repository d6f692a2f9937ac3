//! HTTP stats provider for stats.nba.com-compatible APIs

use crate::config::StatsApiConfig;
use crate::provider::{matching_identities, StatsProvider};
use crate::types::*;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

/// Envelope shared by every stats endpoint
#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(rename = "resultSets")]
    result_sets: Vec<ResultSet>,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    name: String,
    headers: Vec<String>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<Value>>,
}

impl StatsResponse {
    fn result_set(&self, name: &str) -> Result<&ResultSet> {
        self.result_sets
            .iter()
            .find(|rs| rs.name == name)
            .with_context(|| format!("Response has no result set '{}'", name))
    }
}

impl ResultSet {
    fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    fn require_column(&self, header: &str) -> Result<usize> {
        self.column(header)
            .with_context(|| format!("Result set '{}' has no column '{}'", self.name, header))
    }
}

/// Numeric cell; null, empty, or NaN count as missing
fn number_at(row: &[Value], idx: usize) -> Option<f64> {
    let value = match row.get(idx)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn text_at(row: &[Value], idx: usize) -> Option<String> {
    match row.get(idx)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_identities(response: &StatsResponse) -> Result<Vec<AthleteIdentity>> {
    let rs = response.result_set("CommonAllPlayers")?;
    let id_col = rs.require_column("PERSON_ID")?;
    let name_col = rs.require_column("DISPLAY_FIRST_LAST")?;

    Ok(rs
        .row_set
        .iter()
        .filter_map(|row| {
            Some(AthleteIdentity {
                id: number_at(row, id_col)? as u64,
                full_name: text_at(row, name_col)?,
            })
        })
        .collect())
}

fn parse_stat_lines(response: &StatsResponse, set_name: &str) -> Result<Vec<StatLine>> {
    let rs = response.result_set(set_name)?;
    let columns: Vec<(Metric, usize)> = Metric::ALL
        .iter()
        .filter(|m| m.kind() == MetricKind::RateStat)
        .filter_map(|&m| rs.column(m.name()).map(|idx| (m, idx)))
        .collect();

    Ok(rs
        .row_set
        .iter()
        .map(|row| StatLine {
            stats: columns
                .iter()
                .filter_map(|&(metric, idx)| number_at(row, idx).map(|v| (metric, v)))
                .collect(),
        })
        .collect())
}

fn parse_biography(response: &StatsResponse) -> Result<Biography> {
    let rs = response.result_set("CommonPlayerInfo")?;
    let row = rs
        .row_set
        .first()
        .with_context(|| format!("Result set '{}' is empty", rs.name))?;
    let display_name = text_at(row, rs.require_column("DISPLAY_FIRST_LAST")?)
        .context("Biography has no display name")?;

    Ok(Biography {
        display_name,
        height: rs.column("HEIGHT").and_then(|idx| text_at(row, idx)),
        weight: rs.column("WEIGHT").and_then(|idx| number_at(row, idx)),
        position: rs.column("POSITION").and_then(|idx| text_at(row, idx)),
    })
}

fn parse_leaders(response: &StatsResponse, metric: Metric) -> Result<Vec<LeaderEntry>> {
    let rs = response.result_set(&format!("{}Leaders", metric.name()))?;
    let value_col = rs.require_column(metric.name())?;
    let name_col = rs.column("PLAYER_NAME");

    Ok(rs
        .row_set
        .iter()
        .filter_map(|row| {
            Some(LeaderEntry {
                athlete_name: name_col
                    .and_then(|idx| text_at(row, idx))
                    .unwrap_or_default(),
                value: number_at(row, value_col)?,
            })
        })
        .collect())
}

/// Provider backed by the league stats HTTP API
pub struct HttpStatsProvider {
    config: StatsApiConfig,
    client: reqwest::Client,
}

impl HttpStatsProvider {
    pub fn new(config: StatsApiConfig) -> Result<Self> {
        // The stats API drops requests that do not look like they came from its site
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (hoopsim)"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
        headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { config, client })
    }

    async fn fetch(&self, endpoint: &str, query: &str) -> Result<StatsResponse> {
        let url = format!("{}/{}?{}", self.config.base_url, endpoint, query);
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to call stats endpoint {}", endpoint))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Stats API error on {} ({}): {}", endpoint, status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", endpoint))
    }

    /// All-time leaders grid: one result set per metric
    async fn fetch_leaders_grid(&self) -> Result<StatsResponse> {
        let query = format!(
            "LeagueID={}&PerMode={}&SeasonType={}&TopX={}",
            self.config.league_id,
            urlencoding::encode(&self.config.per_mode),
            urlencoding::encode(&self.config.season_type),
            self.config.leaders_top_n
        );
        self.fetch("alltimeleadersgrids", &query).await
    }

    /// Health check against the players index
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!(
            "{}/commonallplayers?LeagueID={}&Season={}&IsOnlyCurrentSeason=1",
            self.config.base_url, self.config.league_id, self.config.season
        );
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl StatsProvider for HttpStatsProvider {
    fn name(&self) -> &'static str {
        "http_stats"
    }

    async fn lookup_athlete_by_name(&self, name: &str) -> Result<Vec<AthleteIdentity>> {
        let query = format!(
            "LeagueID={}&Season={}&IsOnlyCurrentSeason=0",
            self.config.league_id,
            urlencoding::encode(&self.config.season)
        );
        let response = self.fetch("commonallplayers", &query).await?;
        let index = parse_identities(&response)?;
        let found = matching_identities(&index, name);

        info!("Lookup '{}': {} of {} athletes matched", name, found.len(), index.len());
        Ok(found)
    }

    async fn get_career_averages(&self, athlete_id: u64) -> Result<Vec<StatLine>> {
        let query = format!(
            "PlayerID={}&PerMode={}&LeagueID={}",
            athlete_id,
            urlencoding::encode(&self.config.per_mode),
            self.config.league_id
        );
        let response = self.fetch("playercareerstats", &query).await?;
        parse_stat_lines(&response, "CareerTotalsRegularSeason")
    }

    async fn get_biography(&self, athlete_id: u64) -> Result<Biography> {
        let query = format!("PlayerID={}&LeagueID={}", athlete_id, self.config.league_id);
        let response = self.fetch("commonplayerinfo", &query).await?;
        parse_biography(&response)
    }

    async fn get_reference_leaders(&self, metric: Metric) -> Result<Vec<LeaderEntry>> {
        let response = self.fetch_leaders_grid().await?;
        parse_leaders(&response, metric)
    }

    /// One grid request serves every metric
    async fn get_reference_leaders_many(&self, metrics: &[Metric]) -> Vec<Result<Vec<LeaderEntry>>> {
        match self.fetch_leaders_grid().await {
            Ok(response) => metrics.iter().map(|&m| parse_leaders(&response, m)).collect(),
            Err(e) => metrics
                .iter()
                .map(|_| Err(anyhow::anyhow!("{:#}", e)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::BoundsProvider;
    use crate::config::BoundsConfig;
    use crate::error::CompareError;
    use axum::{routing::get, Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn response(json: &str) -> StatsResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_career_totals_skips_null_cells() {
        let resp = response(
            r#"{"resultSets": [{
                "name": "CareerTotalsRegularSeason",
                "headers": ["PLAYER_ID", "GP", "PTS", "FG3M", "FG3_PCT", "TOV"],
                "rowSet": [[76003, 1074, 30.1, null, null, 2.7]]
            }]}"#,
        );
        let lines = parse_stat_lines(&resp, "CareerTotalsRegularSeason").unwrap();
        assert_eq!(lines.len(), 1);
        let stats = &lines[0].stats;
        assert_eq!(stats.get(&Metric::Pts), Some(&30.1));
        assert_eq!(stats.get(&Metric::Tov), Some(&2.7));
        assert!(!stats.contains_key(&Metric::Fg3m));
        assert!(!stats.contains_key(&Metric::Fg3Pct));
        assert!(!stats.contains_key(&Metric::Ast));
    }

    #[test]
    fn test_parse_biography() {
        let resp = response(
            r#"{"resultSets": [{
                "name": "CommonPlayerInfo",
                "headers": ["PERSON_ID", "DISPLAY_FIRST_LAST", "HEIGHT", "WEIGHT", "POSITION"],
                "rowSet": [[893, "Michael Jordan", "6-6", "216", "Guard"]]
            }]}"#,
        );
        let bio = parse_biography(&resp).unwrap();
        assert_eq!(bio.display_name, "Michael Jordan");
        assert_eq!(bio.height.as_deref(), Some("6-6"));
        assert_eq!(bio.weight, Some(216.0));
        assert_eq!(bio.position.as_deref(), Some("Guard"));
    }

    #[test]
    fn test_parse_biography_blank_fields_are_absent() {
        let resp = response(
            r#"{"resultSets": [{
                "name": "CommonPlayerInfo",
                "headers": ["DISPLAY_FIRST_LAST", "HEIGHT", "WEIGHT", "POSITION"],
                "rowSet": [["George Mikan", "", "", ""]]
            }]}"#,
        );
        let bio = parse_biography(&resp).unwrap();
        assert!(bio.height.is_none());
        assert!(bio.weight.is_none());
        assert!(bio.position.is_none());
    }

    #[test]
    fn test_parse_leaders_reads_metric_column() {
        let resp = response(
            r#"{"resultSets": [
                {"name": "PTSLeaders", "headers": ["PLAYER_ID", "PLAYER_NAME", "PTS", "PTS_RANK"],
                 "rowSet": [[893, "Michael Jordan", 30.12, 1], [76375, "Wilt Chamberlain", 30.07, 2]]},
                {"name": "TOVLeaders", "headers": ["PLAYER_ID", "PLAYER_NAME", "TOV", "TOV_RANK"],
                 "rowSet": [[201935, "James Harden", 3.9, 1]]}
            ]}"#,
        );
        let pts = parse_leaders(&resp, Metric::Pts).unwrap();
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0].athlete_name, "Michael Jordan");
        assert_eq!(pts[1].value, 30.07);

        let tov = parse_leaders(&resp, Metric::Tov).unwrap();
        assert_eq!(tov[0].value, 3.9);

        assert!(parse_leaders(&resp, Metric::Ast).is_err());
    }

    #[test]
    fn test_parse_identities() {
        let resp = response(
            r#"{"resultSets": [{
                "name": "CommonAllPlayers",
                "headers": ["PERSON_ID", "DISPLAY_LAST_COMMA_FIRST", "DISPLAY_FIRST_LAST"],
                "rowSet": [[893, "Jordan, Michael", "Michael Jordan"], [202695, "Leonard, Kawhi", "Kawhi Leonard"]]
            }]}"#,
        );
        let ids = parse_identities(&resp).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[1].id, 202695);
        assert_eq!(ids[1].full_name, "Kawhi Leonard");
    }

    /// Local stand-in for the leaders grid endpoint; counts requests
    async fn serve_leaders_grid(hits: Arc<AtomicUsize>) -> String {
        let result_sets: Vec<Value> = Metric::ALL
            .iter()
            .filter(|m| m.kind() == MetricKind::RateStat)
            .map(|m| {
                json!({
                    "name": format!("{}Leaders", m.name()),
                    "headers": ["PLAYER_ID", "PLAYER_NAME", m.name(), format!("{}_RANK", m.name())],
                    "rowSet": [[1, "Top Player", 10.0, 1], [2, "Runner Up", 8.0, 2]]
                })
            })
            .collect();
        let grid = json!({ "resultSets": result_sets });

        let app = Router::new().route(
            "/alltimeleadersgrids",
            get(move || {
                let hits = hits.clone();
                let grid = grid.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(grid)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn provider_at(base_url: String) -> HttpStatsProvider {
        HttpStatsProvider::new(StatsApiConfig {
            base_url,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_bounds_request_leaders_grid_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let provider = provider_at(serve_leaders_grid(hits.clone()).await);
        let config = BoundsConfig::default();

        let table = BoundsProvider::new(&provider, &config)
            .get_bounds(&MetricSchema::standard())
            .await
            .unwrap();

        assert_eq!(table.len(), 20);
        assert_eq!(table.get(Metric::Pts), Some(Bounds::new(3.5, 10.0)));
        assert_eq!(table.get(Metric::Tov), Some(Bounds::new(0.9, 10.0)));
        assert_eq!(hits.load(Ordering::SeqCst), 1, "one grid request per bounds run");
    }

    #[tokio::test]
    async fn test_failed_grid_request_makes_bounds_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new()).await.unwrap();
        });
        let provider = provider_at(format!("http://{}", addr));
        let config = BoundsConfig::default();

        let err = BoundsProvider::new(&provider, &config)
            .get_bounds(&MetricSchema::standard())
            .await
            .unwrap_err();

        match err {
            CompareError::BoundsUnavailable { metric, reason } => {
                assert_eq!(metric, Metric::Pts);
                assert!(reason.contains("alltimeleadersgrids"), "{}", reason);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_health_check_reports_players_index_status() {
        let app = Router::new().route(
            "/commonallplayers",
            get(|| async { Json(json!({ "resultSets": [] })) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        assert!(provider_at(format!("http://{}", addr)).health_check().await.unwrap());

        let hits = Arc::new(AtomicUsize::new(0));
        let grid_only = provider_at(serve_leaders_grid(hits).await);
        assert!(!grid_only.health_check().await.unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires network access to the stats API
    async fn test_http_provider_integration() {
        let provider = HttpStatsProvider::new(StatsApiConfig::default()).unwrap();
        let health = provider.health_check().await;
        assert!(health.is_ok());
    }
}
