//! One-run reconciliation: odds events → fixture match → market rows →
//! snapshot append.
//!
//! Nothing here is fatal short of a storage failure. An event that cannot
//! be matched is skipped for this run and may match on a later run once
//! fixture data is fresher; the worst outcome is a summary full of zeros.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::api::odds_api::OddsApiEvent;
use crate::store::{FixtureStore, SnapshotStore, StoreError};
use crate::utils::extractor::extract_market_rows;
use crate::utils::matcher::FixtureMatcher;

/// What one ingestion run did, for logging and the exit report.
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    pub events_seen: usize,
    pub events_matched: usize,
    pub events_skipped: usize,
    pub rows_extracted: usize,
    pub rows_written: usize,
}

/// Reconcile a batch of odds events against the fixture store and append
/// the normalized rows, all under one capture instant.
pub fn ingest_odds_events(
    fixtures: &FixtureStore<'_>,
    snapshots: &SnapshotStore<'_>,
    matcher: &FixtureMatcher,
    events: &[OddsApiEvent],
    captured_at: DateTime<Utc>,
) -> Result<IngestSummary, StoreError> {
    let mut summary = IngestSummary::default();
    let mut rows = Vec::new();

    for event in events {
        summary.events_seen += 1;
        let matched = matcher.match_event(
            fixtures,
            &event.commence_time,
            &event.home_team,
            &event.away_team,
        )?;
        let Some(fixture_id) = matched else {
            debug!(
                "No fixture match for odds event {} ({} vs {} at {}), skipping",
                event.id, event.home_team, event.away_team, event.commence_time
            );
            summary.events_skipped += 1;
            continue;
        };
        summary.events_matched += 1;

        for bookmaker in &event.bookmakers {
            for market in &bookmaker.markets {
                rows.extend(extract_market_rows(
                    captured_at,
                    &fixture_id,
                    bookmaker.display_name(),
                    &event.home_team,
                    &event.away_team,
                    market,
                ));
            }
        }
    }

    summary.rows_extracted = rows.len();
    summary.rows_written = snapshots.append(&rows)?;
    info!(
        "Ingested {} events: {} matched, {} skipped, {} rows written",
        summary.events_seen, summary.events_matched, summary.events_skipped, summary.rows_written
    );
    Ok(summary)
}
