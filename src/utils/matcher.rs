//! Fixture matching.
//!
//! The odds provider identifies an event only by kickoff time and free-text
//! team names; its event ids are unrelated to the fixture provider's ids.
//! This module resolves an odds event to a canonical `fixture_id` by
//! scoring every fixture inside a kickoff time window on name overlap and
//! time proximity.

use chrono::Duration;
use tracing::debug;

use crate::models::Fixture;
use crate::store::{FixtureStore, StoreError};
use crate::utils::normalize::{name_tokens, normalize_name};
use crate::utils::{fmt_instant, parse_instant};

/// Calibrated default kickoff window.
pub const DEFAULT_WINDOW_MINUTES: i64 = 10;

/// A side whose normalized name matches exactly scores this instead of the
/// token-overlap score.
const EXACT_NAME_SCORE: i64 = 100;
/// Score per shared name token when the side is not an exact match.
const TOKEN_SCORE: i64 = 10;
/// Awarded when the candidate's stored kickoff stamp is byte-identical to
/// the normalized target stamp. Larger than any time score at the default
/// window, so an identical stamp always outranks mere proximity among
/// equally named candidates.
const EXACT_TIME_BONUS: i64 = 500;

/// Matching knobs, resolved once at construction rather than read from the
/// environment inside the scoring code.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Hard candidate filter: fixtures outside `±window_minutes` of the
    /// event kickoff are never selected. 0 means exact-instant only.
    pub window_minutes: i64,
    /// Minimum combined name score a candidate must reach. The default 0
    /// keeps time-proximate candidates with zero name overlap eligible;
    /// raise to 1+ to require at least one shared token.
    pub min_name_score: i64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            window_minutes: DEFAULT_WINDOW_MINUTES,
            min_name_score: 0,
        }
    }
}

pub struct FixtureMatcher {
    config: MatcherConfig,
}

impl FixtureMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Resolve an odds event against the fixture store.
    ///
    /// Unparsable timestamps, empty team names and an empty candidate
    /// window all yield `Ok(None)` — the caller skips the event for this
    /// run. Only storage failures are errors.
    pub fn match_event(
        &self,
        fixtures: &FixtureStore<'_>,
        commence_time: &str,
        home_name: &str,
        away_name: &str,
    ) -> Result<Option<String>, StoreError> {
        let Some(target) = parse_instant(commence_time) else {
            debug!("unparsable commence_time {:?}, no match", commence_time);
            return Ok(None);
        };
        let window = Duration::minutes(self.config.window_minutes);
        let candidates = fixtures.candidates_between(target - window, target + window)?;
        Ok(self
            .best_match(commence_time, home_name, away_name, &candidates)
            .map(|f| f.fixture_id.clone()))
    }

    /// Pick the best-scoring candidate, or `None`.
    ///
    /// Candidates outside the window are never selected regardless of name
    /// score. Ties keep the first-seen candidate, so callers should supply
    /// a deterministic ordering (the store orders by ascending
    /// `fixture_id`).
    pub fn best_match<'a>(
        &self,
        commence_time: &str,
        home_name: &str,
        away_name: &str,
        candidates: &'a [Fixture],
    ) -> Option<&'a Fixture> {
        let target = parse_instant(commence_time)?;
        let target_stamp = fmt_instant(target);

        let home_norm = normalize_name(home_name);
        let away_norm = normalize_name(away_name);
        // A missing required name is unparsable input, not a zero score.
        if home_norm.is_empty() || away_norm.is_empty() {
            debug!(
                "empty team name (home {:?}, away {:?}), no match",
                home_name, away_name
            );
            return None;
        }
        let home_tokens = name_tokens(home_name);
        let away_tokens = name_tokens(away_name);

        let window_seconds = self.config.window_minutes * 60;
        let mut best: Option<(&Fixture, i64)> = None;

        for fixture in candidates {
            let delta = (fixture.commence_time_utc - target).num_seconds().abs();
            if delta > window_seconds {
                continue;
            }

            let name_score = side_score(&home_norm, &home_tokens, &fixture.home_team)
                + side_score(&away_norm, &away_tokens, &fixture.away_team);
            if name_score < self.config.min_name_score {
                continue;
            }

            let time_score = window_seconds - delta;
            let bonus = if fmt_instant(fixture.commence_time_utc) == target_stamp {
                EXACT_TIME_BONUS
            } else {
                0
            };
            let composite = name_score * 10 + time_score + bonus;

            match best {
                Some((_, top)) if composite <= top => {}
                _ => best = Some((fixture, composite)),
            }
        }

        best.map(|(fixture, _)| fixture)
    }
}

/// Score one side of the matchup: exact normalized match wins outright,
/// otherwise 10 points per shared token.
fn side_score(
    query_norm: &str,
    query_tokens: &std::collections::HashSet<String>,
    candidate_name: &str,
) -> i64 {
    let candidate_norm = normalize_name(candidate_name);
    if candidate_norm == query_norm {
        return EXACT_NAME_SCORE;
    }
    let overlap = candidate_norm
        .split_whitespace()
        .filter(|token| query_tokens.contains(*token))
        .count() as i64;
    TOKEN_SCORE * overlap
}
