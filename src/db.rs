//! Database module for Nifty Lens
//! Handles SQLite storage for the symbol universe, cached bars, and profiles

use crate::types::{CompanyProfile, DailyBar, Equity};
use rusqlite::{params, Connection, Result};
use std::path::Path;
use tracing::{debug, error};

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        debug!(path = %path.display(), "Database opened");
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS symbols (
                code TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                sector TEXT NOT NULL,
                watchlisted INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS bars (
                symbol TEXT NOT NULL,
                ts INTEGER NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume INTEGER NOT NULL,
                PRIMARY KEY (symbol, ts)
            );

            CREATE INDEX IF NOT EXISTS idx_bars_symbol ON bars(symbol);

            CREATE TABLE IF NOT EXISTS profiles (
                symbol TEXT PRIMARY KEY,
                summary TEXT,
                sector TEXT,
                industry TEXT,
                website TEXT,
                fetched_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS metadata (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Import the compiled-in universe, preserving watchlist flags
    pub fn import_universe(&self, universe: &[(&str, &str, &str)]) -> Result<usize> {
        let mut imported = 0;

        for (code, name, sector) in universe {
            let result = self.conn.execute(
                "INSERT INTO symbols (code, name, sector) VALUES (?1, ?2, ?3)
                 ON CONFLICT(code) DO UPDATE SET
                    name = excluded.name,
                    sector = excluded.sector",
                params![code, name, sector],
            );

            match result {
                Ok(_) => imported += 1,
                Err(e) => error!(symbol = %code, error = %e, "Failed to import symbol"),
            }
        }

        debug!(imported = imported, total = universe.len(), "Universe imported");
        Ok(imported)
    }

    /// Get all symbols
    pub fn get_all_symbols(&self) -> Result<Vec<Equity>> {
        let mut stmt = self.conn.prepare(
            "SELECT code, name, sector, watchlisted FROM symbols ORDER BY code COLLATE NOCASE",
        )?;

        let symbols = stmt
            .query_map([], |row| {
                Ok(Equity {
                    code: row.get(0)?,
                    name: row.get(1)?,
                    sector: row.get(2)?,
                    watchlisted: row.get::<_, i32>(3)? != 0,
                })
            })?
            .collect::<Result<Vec<_>>>()?;

        Ok(symbols)
    }

    /// Set the watchlist flag for a symbol
    pub fn set_watchlisted(&self, code: &str, watchlisted: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE symbols SET watchlisted = ?1 WHERE code = ?2",
            params![watchlisted as i32, code],
        )?;
        Ok(())
    }

    /// Replace all cached bars for a symbol in one transaction
    pub fn replace_bars(&mut self, symbol: &str, bars: &[DailyBar]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM bars WHERE symbol = ?1", params![symbol])?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO bars (symbol, ts, open, high, low, close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for bar in bars {
                stmt.execute(params![
                    symbol, bar.ts, bar.open, bar.high, bar.low, bar.close, bar.volume
                ])?;
            }
        }
        tx.commit()?;
        debug!(symbol = %symbol, bars = bars.len(), "Bars replaced");
        Ok(())
    }

    /// Get cached bars for a symbol in ascending timestamp order
    pub fn get_bars(&self, symbol: &str) -> Result<Vec<DailyBar>> {
        let mut stmt = self.conn.prepare(
            "SELECT ts, open, high, low, close, volume FROM bars
             WHERE symbol = ?1 ORDER BY ts ASC",
        )?;

        let bars = stmt
            .query_map(params![symbol], |row| {
                Ok(DailyBar {
                    ts: row.get(0)?,
                    open: row.get(1)?,
                    high: row.get(2)?,
                    low: row.get(3)?,
                    close: row.get(4)?,
                    volume: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;

        Ok(bars)
    }

    /// Total cached bar count across all symbols
    pub fn bar_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM bars", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    /// Upsert a company profile
    pub fn upsert_profile(&self, profile: &CompanyProfile) -> Result<()> {
        self.conn.execute(
            "INSERT INTO profiles (symbol, summary, sector, industry, website, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(symbol) DO UPDATE SET
                summary = excluded.summary,
                sector = excluded.sector,
                industry = excluded.industry,
                website = excluded.website,
                fetched_at = excluded.fetched_at",
            params![
                profile.symbol,
                profile.summary,
                profile.sector,
                profile.industry,
                profile.website,
                profile.fetched_at
            ],
        )?;
        Ok(())
    }

    /// Get a cached company profile
    pub fn get_profile(&self, symbol: &str) -> Result<Option<CompanyProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT symbol, summary, sector, industry, website, fetched_at
             FROM profiles WHERE symbol = ?1",
        )?;
        let mut rows = stmt.query(params![symbol])?;

        if let Some(row) = rows.next()? {
            Ok(Some(CompanyProfile {
                symbol: row.get(0)?,
                summary: row.get(1)?,
                sector: row.get(2)?,
                industry: row.get(3)?,
                website: row.get(4)?,
                fetched_at: row.get(5)?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Get a metadata value
    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;

        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    /// Set a metadata value
    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO metadata (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Get symbol count
    pub fn symbol_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM symbols", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    fn bar(ts: i64, close: f64) -> DailyBar {
        DailyBar {
            ts,
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn universe_import_preserves_watchlist() {
        let (_dir, db) = open_temp();
        let universe = [("AAA.NS", "Alpha", "IT"), ("BBB.NS", "Beta", "Banking")];
        assert_eq!(db.import_universe(&universe).unwrap(), 2);

        db.set_watchlisted("AAA.NS", true).unwrap();

        // Re-import with a renamed company; the star must survive
        let updated = [("AAA.NS", "Alpha Ltd", "IT"), ("BBB.NS", "Beta", "Banking")];
        db.import_universe(&updated).unwrap();

        let symbols = db.get_all_symbols().unwrap();
        let alpha = symbols.iter().find(|s| s.code == "AAA.NS").unwrap();
        assert_eq!(alpha.name, "Alpha Ltd");
        assert!(alpha.watchlisted);
    }

    #[test]
    fn bars_round_trip_ascending() {
        let (_dir, mut db) = open_temp();
        // Insert out of order; reads must come back ascending
        let bars = vec![bar(300, 11.0), bar(100, 10.0), bar(200, 10.5)];
        db.replace_bars("AAA.NS", &bars).unwrap();

        let stored = db.get_bars("AAA.NS").unwrap();
        assert_eq!(stored.len(), 3);
        assert!(stored.windows(2).all(|w| w[0].ts < w[1].ts));
        assert_eq!(db.bar_count().unwrap(), 3);
    }

    #[test]
    fn replace_bars_is_per_symbol() {
        let (_dir, mut db) = open_temp();
        db.replace_bars("AAA.NS", &[bar(100, 10.0), bar(200, 11.0)])
            .unwrap();
        db.replace_bars("BBB.NS", &[bar(100, 50.0)]).unwrap();

        // Replacing AAA must not touch BBB
        db.replace_bars("AAA.NS", &[bar(300, 12.0)]).unwrap();
        assert_eq!(db.get_bars("AAA.NS").unwrap().len(), 1);
        assert_eq!(db.get_bars("BBB.NS").unwrap().len(), 1);
    }

    #[test]
    fn profile_upsert_and_get() {
        let (_dir, db) = open_temp();
        let profile = CompanyProfile {
            symbol: "AAA.NS".into(),
            summary: Some("A company.".into()),
            sector: Some("Technology".into()),
            industry: None,
            website: Some("https://example.com".into()),
            fetched_at: 1700000000,
        };
        db.upsert_profile(&profile).unwrap();

        let stored = db.get_profile("AAA.NS").unwrap().unwrap();
        assert_eq!(stored.summary.as_deref(), Some("A company."));
        assert_eq!(stored.industry, None);

        assert!(db.get_profile("ZZZ.NS").unwrap().is_none());
    }

    #[test]
    fn metadata_round_trip() {
        let (_dir, db) = open_temp();
        assert!(db.get_meta("schema_version").unwrap().is_none());
        db.set_meta("schema_version", "1").unwrap();
        assert_eq!(db.get_meta("schema_version").unwrap().unwrap(), "1");
    }
}
