//! hoopsim CLI and HTTP server binary

use hoopsim::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let use_mock = args.iter().any(|arg| arg == "--mock");
    let serve = args.iter().any(|arg| arg == "--serve");
    let names: Vec<&str> = args
        .iter()
        .filter(|arg| !arg.starts_with("--"))
        .map(String::as_str)
        .collect();

    let provider: Arc<dyn StatsProvider> = if use_mock {
        println!("✓ Mode: MOCK stats provider");
        Arc::new(create_mock_provider())
    } else {
        let api_config = StatsApiConfig::from_env()?;
        println!("✓ Stats API: {}", api_config.base_url);
        let http = HttpStatsProvider::new(api_config)?;

        // Test connection to the stats API
        match http.health_check().await {
            Ok(true) => println!("✓ Stats API is reachable"),
            Ok(false) => eprintln!("⚠️  Stats API returned a non-success status"),
            Err(e) => {
                eprintln!("❌ Failed to connect to stats API: {:#}", e);
                eprintln!("   Set STATS_API_URL or run with --mock");
                return Err(e);
            }
        }
        Arc::new(http)
    };

    let bounds_config = match std::env::var("BOUNDS_CONFIG") {
        Ok(path) => {
            println!("✓ Bounds config: {}", path);
            BoundsConfig::from_json_file(&path)?
        }
        Err(_) => BoundsConfig::default(),
    };

    let comparator = Arc::new(Comparator::new(
        provider,
        bounds_config,
        UnmappedPositionPolicy::from_env(),
    ));

    if serve {
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8090);
        println!("✓ Starting HTTP server on port {}...", port);
        return server::run_server(comparator, port).await;
    }

    let (name1, name2) = match names.as_slice() {
        [] => ("Michael Jordan", "Kawhi Leonard"),
        [a, b] => (*a, *b),
        _ => anyhow::bail!("usage: hoopsim [--mock] [--serve] [<player1> <player2>]"),
    };

    match comparator.compare(name1, name2).await? {
        ComparisonOutcome::Compared(result) => print!("{}", render_report(&result)),
        ComparisonOutcome::NotFound { unresolved } => {
            println!("Player not found: {}", unresolved.join(", "));
        }
    }

    Ok(())
}

/// Demo data set: two career lines and an all-time per-game leaders board
fn create_mock_provider() -> MockStatsProvider {
    use Metric::*;

    let jordan = [
        (Pts, 30.1), (Fgm, 11.4), (Fga, 22.9), (FgPct, 0.497), (Ftm, 6.8), (Fta, 8.2),
        (FtPct, 0.835), (Oreb, 1.6), (Dreb, 4.7), (Reb, 6.2), (Ast, 5.3), (Stl, 2.3),
        (Blk, 0.8), (Tov, 2.7), (Fg3m, 0.5), (Fg3a, 1.7), (Fg3Pct, 0.327),
    ];
    let leonard = [
        (Pts, 19.9), (Fgm, 7.2), (Fga, 14.6), (FgPct, 0.495), (Ftm, 4.4), (Fta, 5.1),
        (FtPct, 0.860), (Oreb, 1.2), (Dreb, 5.2), (Reb, 6.4), (Ast, 2.9), (Stl, 1.7),
        (Blk, 0.6), (Tov, 1.8), (Fg3m, 1.4), (Fg3a, 3.6), (Fg3Pct, 0.390),
    ];
    let leaders = [
        (Pts, 30.1), (Fgm, 12.1), (Fga, 22.9), (FgPct, 0.674), (Ftm, 7.2), (Fta, 11.4),
        (FtPct, 0.910), (Oreb, 5.1), (Dreb, 10.2), (Reb, 22.9), (Ast, 11.2), (Stl, 2.7),
        (Blk, 3.5), (Tov, 3.9), (Fg3m, 3.8), (Fg3a, 9.0), (Fg3Pct, 0.454),
    ];

    let career = |line: &[(Metric, f64)]| {
        vec![StatLine {
            stats: line.iter().copied().collect(),
        }]
    };
    let bio = |name: &str, height: &str, weight: f64, position: &str| Biography {
        display_name: name.to_string(),
        height: Some(height.to_string()),
        weight: Some(weight),
        position: Some(position.to_string()),
    };

    let mock = MockStatsProvider::new()
        .with_athlete(
            AthleteIdentity { id: 893, full_name: "Michael Jordan".to_string() },
            career(&jordan),
            bio("Michael Jordan", "6-6", 216.0, "Guard"),
        )
        .with_athlete(
            AthleteIdentity { id: 202695, full_name: "Kawhi Leonard".to_string() },
            career(&leonard),
            bio("Kawhi Leonard", "6-7", 225.0, "Forward"),
        );

    leaders
        .iter()
        .fold(mock, |mock, &(metric, top)| mock.with_leaders(metric, &[top, top * 0.95]))
}
