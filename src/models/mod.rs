use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A canonical Premier League fixture, keyed by the fixture provider's id.
///
/// Re-ingesting the same `fixture_id` updates the mutable fields (status,
/// score, kickoff) in place; it never creates a second record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub fixture_id: String,
    pub commence_time_utc: DateTime<Utc>,
    pub matchweek: Option<i64>,
    pub status: String,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: Option<i64>,
    pub away_goals: Option<i64>,
    pub last_updated_utc: DateTime<Utc>,
}

/// Market families this pipeline normalizes.
///
/// Anything outside this set in a provider payload is ignored, which is how
/// the pipeline tolerates provider drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketKind {
    Totals,
    AlternateTotals,
    Spreads,
    Btts,
}

impl MarketKind {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "totals" => Some(MarketKind::Totals),
            "alternate_totals" => Some(MarketKind::AlternateTotals),
            "spreads" => Some(MarketKind::Spreads),
            "btts" => Some(MarketKind::Btts),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketKind::Totals => "totals",
            MarketKind::AlternateTotals => "alternate_totals",
            MarketKind::Spreads => "spreads",
            MarketKind::Btts => "btts",
        }
    }
}

/// One timestamped observation of a two-sided price for one market line
/// from one bookmaker.
///
/// Side semantics depend on the market: over/under for totals, home/away
/// for spreads, yes/no for btts. `line` is `None` only for btts; a missing
/// line is a distinct grouping key from any numeric line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsSnapshot {
    pub captured_at_utc: DateTime<Utc>,
    pub fixture_id: String,
    pub bookmaker: String,
    pub market: MarketKind,
    pub line: Option<f64>,
    pub side_a_price: f64,
    pub side_b_price: f64,
}

/// A latest-per-key snapshot row joined with its fixture attributes, the
/// shape the exporter serializes. Timestamps are kept as stored text.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub captured_at_utc: String,
    pub fixture_id: String,
    pub commence_time_utc: String,
    pub matchweek: Option<i64>,
    pub status: String,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: Option<i64>,
    pub away_goals: Option<i64>,
    pub bookmaker: String,
    pub market: String,
    pub line: Option<f64>,
    pub side_a_price: f64,
    pub side_b_price: f64,
}
