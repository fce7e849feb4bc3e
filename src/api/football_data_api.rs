use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::Fixture;
use crate::utils::utc_now_second;

const FOOTBALL_DATA_BASE_URL: &str = "https://api.football-data.org/v4";
const COMPETITION: &str = "PL";

/// Response from football-data.org for a competition's matches
#[derive(Debug, Deserialize)]
struct MatchesResponse {
    #[serde(default)]
    matches: Vec<ApiMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMatch {
    id: i64,
    utc_date: Option<DateTime<Utc>>,
    status: Option<String>,
    matchday: Option<i64>,
    home_team: Option<ApiTeam>,
    away_team: Option<ApiTeam>,
    score: Option<ApiScore>,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiScore {
    full_time: Option<ApiFullTime>,
}

#[derive(Debug, Deserialize)]
struct ApiFullTime {
    home: Option<i64>,
    away: Option<i64>,
}

pub struct FootballDataClient {
    token: String,
    client: reqwest::Client,
}

impl FootballDataClient {
    pub fn new(token: String) -> Self {
        Self {
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch Premier League fixtures in a date range around today and map
    /// them to typed records. Transport and HTTP errors propagate; a match
    /// without a kickoff instant is skipped with a warning.
    pub async fn fetch_fixtures(&self, days_back: i64, days_forward: i64) -> Result<Vec<Fixture>> {
        let today = Utc::now().date_naive();
        let date_from = (today - Duration::days(days_back)).to_string();
        let date_to = (today + Duration::days(days_forward)).to_string();

        let url = format!(
            "{}/competitions/{}/matches",
            FOOTBALL_DATA_BASE_URL, COMPETITION
        );

        let response = self
            .client
            .get(&url)
            .header("X-Auth-Token", &self.token)
            .query(&[("dateFrom", date_from.as_str()), ("dateTo", date_to.as_str())])
            .send()
            .await
            .context("Failed to fetch fixtures from football-data.org")?;

        if !response.status().is_success() {
            anyhow::bail!("football-data.org returned error: {}", response.status());
        }

        let payload: MatchesResponse = response
            .json()
            .await
            .context("Failed to parse football-data.org response")?;

        let now = utc_now_second();
        let mut fixtures = Vec::new();
        for m in payload.matches {
            let Some(commence_time_utc) = m.utc_date else {
                warn!("Fixture {} has no kickoff instant, skipping", m.id);
                continue;
            };
            let full_time = m.score.and_then(|s| s.full_time);
            fixtures.push(Fixture {
                fixture_id: m.id.to_string(),
                commence_time_utc,
                matchweek: m.matchday,
                status: m.status.unwrap_or_else(|| "UNKNOWN".to_string()),
                home_team: m
                    .home_team
                    .and_then(|t| t.name)
                    .unwrap_or_else(|| "UNKNOWN_HOME".to_string()),
                away_team: m
                    .away_team
                    .and_then(|t| t.name)
                    .unwrap_or_else(|| "UNKNOWN_AWAY".to_string()),
                home_goals: full_time.as_ref().and_then(|f| f.home),
                away_goals: full_time.as_ref().and_then(|f| f.away),
                last_updated_utc: now,
            });
        }

        info!("Fetched {} fixtures for {}", fixtures.len(), COMPETITION);
        Ok(fixtures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_payload_maps_to_fixtures() {
        let raw = r#"{
            "matches": [
                {
                    "id": 100,
                    "utcDate": "2026-01-19T15:00:00Z",
                    "status": "FINISHED",
                    "matchday": 22,
                    "homeTeam": {"name": "Arsenal FC"},
                    "awayTeam": {"name": "Chelsea FC"},
                    "score": {"fullTime": {"home": 2, "away": 1}}
                },
                {
                    "id": 101,
                    "status": "POSTPONED",
                    "homeTeam": {"name": "Everton FC"},
                    "awayTeam": {"name": "Fulham FC"}
                }
            ]
        }"#;

        let payload: MatchesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.matches.len(), 2);
        assert_eq!(payload.matches[0].id, 100);
        assert_eq!(
            payload.matches[0]
                .home_team
                .as_ref()
                .and_then(|t| t.name.as_deref()),
            Some("Arsenal FC")
        );
        // The postponed match has no kickoff; fetch_fixtures drops it.
        assert!(payload.matches[1].utc_date.is_none());
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_fixtures() {
        dotenv::dotenv().ok();
        let token = std::env::var("FOOTBALL_DATA_TOKEN").expect("FOOTBALL_DATA_TOKEN not set");
        let client = FootballDataClient::new(token);

        let fixtures = client.fetch_fixtures(14, 14).await.unwrap();
        assert!(!fixtures.is_empty());
    }
}
