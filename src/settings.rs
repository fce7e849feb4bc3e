//! Runtime configuration, resolved from the environment exactly once.
//!
//! Components never read the environment themselves; the binaries build a
//! `Settings` value here and pass the pieces in.

use anyhow::{bail, Context, Result};

use crate::utils::matcher::DEFAULT_WINDOW_MINUTES;

#[derive(Debug, Clone)]
pub struct Settings {
    pub football_data_token: String,
    pub odds_api_key: String,
    pub db_path: String,
    pub odds_sport_key: String,
    pub odds_regions: String,
    pub odds_markets: String,
    pub match_window_minutes: i64,
    pub min_name_score: i64,
    /// Optional bound on stored snapshot rows; oldest captures are evicted
    /// past it. Unset means unbounded.
    pub snapshot_cap: Option<u64>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let football_data_token = required_key("FOOTBALL_DATA_TOKEN")?;
        let odds_api_key = required_key("ODDS_API_KEY")?;

        Ok(Self {
            football_data_token,
            odds_api_key,
            db_path: var_or("DB_PATH", "data/app.db"),
            odds_sport_key: var_or("ODDS_SPORT_KEY", "soccer_epl"),
            odds_regions: var_or("ODDS_REGIONS", "uk,eu"),
            odds_markets: var_or("ODDS_MARKETS", "totals,alternate_totals,spreads,btts"),
            match_window_minutes: parsed_or("MATCH_WINDOW_MINUTES", DEFAULT_WINDOW_MINUTES)?,
            min_name_score: parsed_or("MATCH_MIN_NAME_SCORE", 0)?,
            snapshot_cap: match std::env::var("SNAPSHOT_CAP") {
                Ok(raw) if !raw.trim().is_empty() => Some(
                    raw.trim()
                        .parse()
                        .context("SNAPSHOT_CAP is not a valid row count")?,
                ),
                _ => None,
            },
        })
    }
}

fn required_key(name: &str) -> Result<String> {
    let value = std::env::var(name).unwrap_or_default().trim().to_string();
    if value.is_empty() || value.starts_with("YOUR_") {
        bail!("Missing {name}");
    }
    Ok(value)
}

fn var_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}

fn parsed_or(name: &str, default: i64) -> Result<i64> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} is not a valid integer")),
        _ => Ok(default),
    }
}
