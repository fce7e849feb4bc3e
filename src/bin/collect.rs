use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use epl_odds_tracker::football_data_api::FootballDataClient;
use epl_odds_tracker::ingest::ingest_odds_events;
use epl_odds_tracker::matcher::{FixtureMatcher, MatcherConfig};
use epl_odds_tracker::odds_api::OddsApiClient;
use epl_odds_tracker::store::{self, FixtureStore, SnapshotStore};
use epl_odds_tracker::utils::utc_now_second;
use epl_odds_tracker::Settings;

/// Run one collection pass: upsert fixtures, fetch odds, reconcile and
/// append price snapshots.
#[derive(Parser, Debug)]
struct Args {
    /// Fixture range: days before today.
    #[arg(long, default_value_t = 14)]
    days_back: i64,
    /// Fixture range: days after today.
    #[arg(long, default_value_t = 14)]
    days_forward: i64,
    /// Override the fixture match window in minutes.
    #[arg(long)]
    window_minutes: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let settings = Settings::from_env()?;

    let conn = store::open(&settings.db_path)?;
    store::init_schema(&conn)?;
    let fixtures = FixtureStore::new(&conn);
    let snapshots = SnapshotStore::new(&conn);

    // Fixtures first: matching needs an up-to-date fixture population.
    let fixture_client = FootballDataClient::new(settings.football_data_token.clone());
    let fetched = fixture_client
        .fetch_fixtures(args.days_back, args.days_forward)
        .await
        .context("Failed to fetch fixtures")?;
    let n_fixtures = fixtures.upsert(&fetched)?;

    let odds_client = OddsApiClient::new(settings.odds_api_key.clone());
    let events = odds_client
        .fetch_events(
            &settings.odds_sport_key,
            &settings.odds_regions,
            &settings.odds_markets,
        )
        .await
        .context("Failed to fetch odds")?;

    let matcher = FixtureMatcher::new(MatcherConfig {
        window_minutes: args
            .window_minutes
            .unwrap_or(settings.match_window_minutes),
        min_name_score: settings.min_name_score,
    });
    let summary = ingest_odds_events(&fixtures, &snapshots, &matcher, &events, utc_now_second())?;

    if let Some(cap) = settings.snapshot_cap {
        let evicted = snapshots.trim(cap)?;
        if evicted > 0 {
            info!("Evicted {} snapshot rows past the {} row cap", evicted, cap);
        }
    }

    println!("Upserted fixtures: {}", n_fixtures);
    println!("Stored odds snapshots: {}", summary.rows_written);

    // Check API usage
    odds_client.check_usage().await?;

    Ok(())
}
