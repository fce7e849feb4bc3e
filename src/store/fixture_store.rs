//! Fixture persistence: upsert by provider id, windowed candidate reads.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use super::StoreError;
use crate::models::Fixture;
use crate::utils::fmt_instant;

pub struct FixtureStore<'c> {
    conn: &'c Connection,
}

impl<'c> FixtureStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Upsert fixtures by primary key, last writer wins. Returns the number
    /// of records written.
    pub fn upsert(&self, fixtures: &[Fixture]) -> Result<usize, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO fixtures (
                   fixture_id, commence_time_utc, matchweek, status, home_team, away_team,
                   home_goals, away_goals, last_updated_utc
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(fixture_id) DO UPDATE SET
                   commence_time_utc = excluded.commence_time_utc,
                   matchweek         = excluded.matchweek,
                   status            = excluded.status,
                   home_team         = excluded.home_team,
                   away_team         = excluded.away_team,
                   home_goals        = excluded.home_goals,
                   away_goals        = excluded.away_goals,
                   last_updated_utc  = excluded.last_updated_utc",
            )?;
            for fixture in fixtures {
                stmt.execute(params![
                    fixture.fixture_id,
                    fmt_instant(fixture.commence_time_utc),
                    fixture.matchweek,
                    fixture.status,
                    fixture.home_team,
                    fixture.away_team,
                    fixture.home_goals,
                    fixture.away_goals,
                    fmt_instant(fixture.last_updated_utc),
                ])?;
            }
        }
        tx.commit()?;
        Ok(fixtures.len())
    }

    pub fn get(&self, fixture_id: &str) -> Result<Option<Fixture>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT fixture_id, commence_time_utc, matchweek, status, home_team, away_team,
                    home_goals, away_goals, last_updated_utc
             FROM fixtures WHERE fixture_id = ?1",
        )?;
        let mut rows = stmt.query_map([fixture_id], row_to_fixture)?;
        Ok(rows.next().transpose()?)
    }

    /// Fixtures with a kickoff in `[from, to]`, ordered by ascending
    /// `fixture_id` so matcher tie-breaks are deterministic.
    pub fn candidates_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Fixture>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT fixture_id, commence_time_utc, matchweek, status, home_team, away_team,
                    home_goals, away_goals, last_updated_utc
             FROM fixtures
             WHERE commence_time_utc >= ?1 AND commence_time_utc <= ?2
             ORDER BY fixture_id ASC",
        )?;
        let rows = stmt.query_map(params![fmt_instant(from), fmt_instant(to)], row_to_fixture)?;
        let mut fixtures = Vec::new();
        for row in rows {
            fixtures.push(row?);
        }
        Ok(fixtures)
    }

    /// Final scores of finished matches, for the league baseline model.
    pub fn finished_scores(&self) -> Result<Vec<(i64, i64)>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT home_goals, away_goals
             FROM fixtures
             WHERE home_goals IS NOT NULL AND away_goals IS NOT NULL",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut scores = Vec::new();
        for row in rows {
            scores.push(row?);
        }
        Ok(scores)
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM fixtures", [], |row| row.get(0))?;
        Ok(n)
    }
}

fn row_to_fixture(row: &Row<'_>) -> rusqlite::Result<Fixture> {
    Ok(Fixture {
        fixture_id: row.get(0)?,
        commence_time_utc: parse_stored_instant(row, 1)?,
        matchweek: row.get(2)?,
        status: row.get(3)?,
        home_team: row.get(4)?,
        away_team: row.get(5)?,
        home_goals: row.get(6)?,
        away_goals: row.get(7)?,
        last_updated_utc: parse_stored_instant(row, 8)?,
    })
}

/// Stored timestamps are text this crate wrote; a parse failure here means
/// the database was edited out of band.
pub(crate) fn parse_stored_instant(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_in_memory;
    use crate::utils::parse_instant;

    fn fixture(id: &str, kickoff: &str, status: &str, goals: Option<(i64, i64)>) -> Fixture {
        Fixture {
            fixture_id: id.to_string(),
            commence_time_utc: parse_instant(kickoff).unwrap(),
            matchweek: Some(22),
            status: status.to_string(),
            home_team: "Arsenal FC".to_string(),
            away_team: "Chelsea FC".to_string(),
            home_goals: goals.map(|g| g.0),
            away_goals: goals.map(|g| g.1),
            last_updated_utc: parse_instant("2026-01-19T12:00:00Z").unwrap(),
        }
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let conn = open_in_memory();
        let store = FixtureStore::new(&conn);

        store
            .upsert(&[fixture("100", "2026-01-19T15:00:00Z", "SCHEDULED", None)])
            .unwrap();
        store
            .upsert(&[fixture(
                "100",
                "2026-01-19T15:00:00Z",
                "FINISHED",
                Some((2, 1)),
            )])
            .unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let stored = store.get("100").unwrap().unwrap();
        assert_eq!(stored.status, "FINISHED");
        assert_eq!(stored.home_goals, Some(2));
        assert_eq!(stored.away_goals, Some(1));
    }

    #[test]
    fn test_candidates_between_window_and_order() {
        let conn = open_in_memory();
        let store = FixtureStore::new(&conn);

        store
            .upsert(&[
                fixture("201", "2026-01-19T15:05:00Z", "SCHEDULED", None),
                fixture("200", "2026-01-19T15:00:00Z", "SCHEDULED", None),
                fixture("300", "2026-01-19T18:00:00Z", "SCHEDULED", None),
            ])
            .unwrap();

        let candidates = store
            .candidates_between(
                parse_instant("2026-01-19T14:50:00Z").unwrap(),
                parse_instant("2026-01-19T15:10:00Z").unwrap(),
            )
            .unwrap();
        let ids: Vec<&str> = candidates.iter().map(|f| f.fixture_id.as_str()).collect();
        assert_eq!(ids, vec!["200", "201"]);
    }

    #[test]
    fn test_finished_scores_only_complete() {
        let conn = open_in_memory();
        let store = FixtureStore::new(&conn);

        store
            .upsert(&[
                fixture("1", "2026-01-10T15:00:00Z", "FINISHED", Some((3, 1))),
                fixture("2", "2026-01-19T15:00:00Z", "SCHEDULED", None),
            ])
            .unwrap();

        assert_eq!(store.finished_scores().unwrap(), vec![(3, 1)]);
    }
}
