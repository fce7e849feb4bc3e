//! Table and index creation.

use rusqlite::Connection;

/// Create all tables and indexes. Idempotent.
///
/// The unique snapshot index is the dedup contract: a second append with an
/// identical `(captured_at_utc, fixture_id, bookmaker, market, line)` key is
/// ignored. `ifnull(line, '')` keeps a NULL line (btts) distinct from every
/// numeric line — SQLite never compares the text sentinel equal to a REAL.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS fixtures (
            fixture_id        TEXT PRIMARY KEY,
            commence_time_utc TEXT NOT NULL,
            matchweek         INTEGER,
            status            TEXT NOT NULL,
            home_team         TEXT NOT NULL,
            away_team         TEXT NOT NULL,
            home_goals        INTEGER,
            away_goals        INTEGER,
            last_updated_utc  TEXT
        );

        CREATE TABLE IF NOT EXISTS odds_snapshots (
            snapshot_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            captured_at_utc TEXT NOT NULL,
            fixture_id      TEXT NOT NULL,
            bookmaker       TEXT NOT NULL,
            market          TEXT NOT NULL,
            line            REAL,
            side_a_price    REAL NOT NULL,
            side_b_price    REAL NOT NULL,
            FOREIGN KEY (fixture_id) REFERENCES fixtures(fixture_id)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_snapshots_key
        ON odds_snapshots(captured_at_utc, fixture_id, bookmaker, market, ifnull(line, ''));

        CREATE INDEX IF NOT EXISTS idx_snapshots_fixture_time
        ON odds_snapshots(fixture_id, captured_at_utc);

        CREATE INDEX IF NOT EXISTS idx_fixtures_commence
        ON fixtures(commence_time_utc);",
    )
}
