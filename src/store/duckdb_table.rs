//! DuckDB-backed price table.
//!
//! Records live in a single `component_prices` table. Row order is kept in an
//! explicit `position` column since a full rewrite deletes and re-inserts every
//! row.

use std::fs;
use std::path::Path;

use duckdb::{params, Connection};

use super::{format_timestamp, parse_timestamp, PriceTable};
use crate::config;
use crate::error::Result;
use crate::models::{Category, PriceRecord};

/// A [`PriceTable`] stored in a DuckDB database file (or in memory).
pub struct DuckDbTable {
    conn: Connection,
}

impl DuckDbTable {
    /// Open or create the database at `path`, creating parent directories as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (\
               component_name VARCHAR NOT NULL, \
               category VARCHAR NOT NULL, \
               estimated_new_price DOUBLE NOT NULL, \
               estimated_used_price DOUBLE NOT NULL, \
               last_updated VARCHAR NOT NULL, \
               source VARCHAR NOT NULL, \
               position BIGINT NOT NULL\
             )",
            config::PRICE_TABLE
        ))?;
        Ok(Self { conn })
    }
}

impl PriceTable for DuckDbTable {
    fn load(&self) -> Result<Vec<PriceRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT component_name, category, estimated_new_price, estimated_used_price, \
                    last_updated, source \
             FROM {} ORDER BY position",
            config::PRICE_TABLE
        ))?;

        let rows = stmt.query_map([], |row| {
            let category: String = row.get(1)?;
            let last_updated: String = row.get(4)?;
            Ok(PriceRecord {
                component_name: row.get(0)?,
                category: Category::from_label(&category),
                estimated_new_price: row.get(2)?,
                estimated_used_price: row.get(3)?,
                last_updated: parse_timestamp(&last_updated),
                source: row.get(5)?,
            })
        })?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    fn save(&mut self, records: &[PriceRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(&format!("DELETE FROM {}", config::PRICE_TABLE), [])?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} VALUES (?, ?, ?, ?, ?, ?, ?)",
                config::PRICE_TABLE
            ))?;
            for (position, r) in records.iter().enumerate() {
                stmt.execute(params![
                    r.component_name,
                    r.category.as_str(),
                    r.estimated_new_price,
                    r.estimated_used_price,
                    format_timestamp(&r.last_updated),
                    r.source,
                    position as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
