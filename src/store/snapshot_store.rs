//! Append-only snapshot persistence with latest-per-key reads.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use super::fixture_store::parse_stored_instant;
use super::StoreError;
use crate::models::{ExportRow, MarketKind, OddsSnapshot};
use crate::utils::fmt_instant;

/// Subquery picking the newest snapshot id for the row's logical key.
/// `IS` is SQLite's null-safe equality, so a NULL line only matches NULL.
/// Ties on `captured_at_utc` go to the highest insertion sequence.
const LATEST_KEY_FILTER: &str = "o.snapshot_id = (
    SELECT s.snapshot_id FROM odds_snapshots AS s
    WHERE s.fixture_id = o.fixture_id
      AND s.bookmaker = o.bookmaker
      AND s.market = o.market
      AND s.line IS o.line
    ORDER BY s.captured_at_utc DESC, s.snapshot_id DESC
    LIMIT 1
)";

pub struct SnapshotStore<'c> {
    conn: &'c Connection,
}

impl<'c> SnapshotStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Append rows, skipping exact key duplicates (first write wins).
    /// Returns the number of rows actually written, so a re-run of an
    /// already-stored capture reports 0.
    pub fn append(&self, rows: &[OddsSnapshot]) -> Result<usize, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO odds_snapshots (
                   captured_at_utc, fixture_id, bookmaker, market, line,
                   side_a_price, side_b_price
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for snapshot in rows {
                written += stmt.execute(params![
                    fmt_instant(snapshot.captured_at_utc),
                    snapshot.fixture_id,
                    snapshot.bookmaker,
                    snapshot.market.as_str(),
                    snapshot.line,
                    snapshot.side_a_price,
                    snapshot.side_b_price,
                ])?;
            }
        }
        tx.commit()?;
        Ok(written)
    }

    /// One row per distinct `(fixture_id, bookmaker, market, line)` key,
    /// selected by maximum `captured_at_utc`.
    pub fn latest(&self) -> Result<Vec<OddsSnapshot>, StoreError> {
        let sql = format!(
            "SELECT o.captured_at_utc, o.fixture_id, o.bookmaker, o.market, o.line,
                    o.side_a_price, o.side_b_price
             FROM odds_snapshots AS o
             WHERE {LATEST_KEY_FILTER}
             ORDER BY o.fixture_id, o.bookmaker, o.market, o.line"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_snapshot)?;
        let mut snapshots = Vec::new();
        for row in rows {
            snapshots.push(row?);
        }
        Ok(snapshots)
    }

    /// Latest rows joined with fixture attributes, for export. Ordering
    /// matches the exported document: kickoff, market, line (NULL first),
    /// bookmaker.
    pub fn latest_joined(&self, limit: u32) -> Result<Vec<ExportRow>, StoreError> {
        let sql = format!(
            "SELECT o.captured_at_utc, o.fixture_id, f.commence_time_utc, f.matchweek,
                    f.status, f.home_team, f.away_team, f.home_goals, f.away_goals,
                    o.bookmaker, o.market, o.line, o.side_a_price, o.side_b_price
             FROM odds_snapshots AS o
             JOIN fixtures AS f USING (fixture_id)
             WHERE {LATEST_KEY_FILTER}
             ORDER BY f.commence_time_utc ASC, o.market ASC,
                      COALESCE(o.line, -9999) ASC, o.bookmaker ASC
             LIMIT ?1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([limit], |row| {
            Ok(ExportRow {
                captured_at_utc: row.get(0)?,
                fixture_id: row.get(1)?,
                commence_time_utc: row.get(2)?,
                matchweek: row.get(3)?,
                status: row.get(4)?,
                home_team: row.get(5)?,
                away_team: row.get(6)?,
                home_goals: row.get(7)?,
                away_goals: row.get(8)?,
                bookmaker: row.get(9)?,
                market: row.get(10)?,
                line: row.get(11)?,
                side_a_price: row.get(12)?,
                side_b_price: row.get(13)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Bound the store to the newest `max_rows` observations, evicting
    /// oldest `captured_at_utc` first. Fixtures are never touched. Returns
    /// the number of evicted rows.
    pub fn trim(&self, max_rows: u64) -> Result<usize, StoreError> {
        let evicted = self.conn.execute(
            "DELETE FROM odds_snapshots
             WHERE snapshot_id IN (
               SELECT snapshot_id FROM odds_snapshots
               ORDER BY captured_at_utc DESC, snapshot_id DESC
               LIMIT -1 OFFSET ?1
             )",
            [max_rows as i64],
        )?;
        Ok(evicted)
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM odds_snapshots", [], |row| row.get(0))?;
        Ok(n)
    }
}

fn row_to_snapshot(row: &Row<'_>) -> rusqlite::Result<OddsSnapshot> {
    let market_raw: String = row.get(3)?;
    let market = MarketKind::from_key(&market_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("unknown market tag {market_raw:?}").into(),
        )
    })?;
    Ok(OddsSnapshot {
        captured_at_utc: parse_stored_instant(row, 0)?,
        fixture_id: row.get(1)?,
        bookmaker: row.get(2)?,
        market,
        line: row.get(4)?,
        side_a_price: row.get(5)?,
        side_b_price: row.get(6)?,
    })
}
