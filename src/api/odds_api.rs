use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

const ODDS_API_BASE_URL: &str = "https://api.the-odds-api.com/v4";

/// One event from The Odds API: kickoff, free-text team names and the
/// bookmaker payloads. The event id is the odds provider's own and is
/// unrelated to the fixture provider's id, which is why events go through
/// the matcher instead of being keyed directly.
#[derive(Debug, Clone, Deserialize)]
pub struct OddsApiEvent {
    pub id: String,
    #[serde(default)]
    pub commence_time: String,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<OddsApiBookmaker>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsApiBookmaker {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub markets: Vec<OddsApiMarket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsApiMarket {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<OddsApiOutcome>,
}

/// Prices and points are kept as raw JSON values; the extractor coerces
/// them outcome by outcome so one malformed number never rejects a payload.
#[derive(Debug, Clone, Deserialize)]
pub struct OddsApiOutcome {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub point: Value,
}

impl OddsApiBookmaker {
    /// Display name, falling back to the provider key when the title is
    /// missing.
    pub fn display_name(&self) -> &str {
        if self.title.is_empty() {
            &self.key
        } else {
            &self.title
        }
    }
}

pub struct OddsApiClient {
    api_key: String,
    client: reqwest::Client,
}

impl OddsApiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch odds events for a sport and market set, decimal prices.
    pub async fn fetch_events(
        &self,
        sport_key: &str,
        regions: &str,
        markets: &str,
    ) -> Result<Vec<OddsApiEvent>> {
        let url = format!("{}/sports/{}/odds", ODDS_API_BASE_URL, sport_key);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", regions),
                ("markets", markets),
                ("oddsFormat", "decimal"),
                ("dateFormat", "iso"),
            ])
            .send()
            .await
            .context("Failed to fetch odds from The Odds API")?;

        if !response.status().is_success() {
            anyhow::bail!("Odds API returned error: {}", response.status());
        }

        let events: Vec<OddsApiEvent> = response
            .json()
            .await
            .context("Failed to parse Odds API response")?;

        info!("Fetched {} odds events for {}", events.len(), sport_key);
        Ok(events)
    }

    /// Report how many API requests remain on the key's quota.
    pub async fn check_usage(&self) -> Result<()> {
        let url = format!("{}/sports", ODDS_API_BASE_URL);

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        if let Some(remaining) = response.headers().get("x-requests-remaining") {
            println!("API requests remaining: {:?}", remaining);
        }

        if let Some(used) = response.headers().get("x-requests-used") {
            println!("API requests used: {:?}", used);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_payload_deserializes_with_gaps() {
        // Missing titles, string prices and absent points must not reject
        // the payload.
        let raw = r#"[{
            "id": "abc",
            "commence_time": "2026-01-19T15:05:00Z",
            "home_team": "Arsenal",
            "away_team": "Chelsea",
            "bookmakers": [{
                "key": "bet1",
                "markets": [{
                    "key": "totals",
                    "outcomes": [
                        {"name": "Over", "price": "2.05", "point": 2.5},
                        {"name": "Under", "price": 1.80}
                    ]
                }]
            }]
        }]"#;

        let events: Vec<OddsApiEvent> = serde_json::from_str(raw).unwrap();
        assert_eq!(events.len(), 1);
        let bookmaker = &events[0].bookmakers[0];
        assert_eq!(bookmaker.display_name(), "bet1");
        assert_eq!(bookmaker.markets[0].outcomes.len(), 2);
        assert!(bookmaker.markets[0].outcomes[1].point.is_null());
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_events() {
        dotenv::dotenv().ok();
        let api_key = std::env::var("ODDS_API_KEY").expect("ODDS_API_KEY not set");
        let client = OddsApiClient::new(api_key);

        let events = client
            .fetch_events("soccer_epl", "uk,eu", "totals")
            .await
            .unwrap();
        assert!(!events.is_empty());
    }
}
