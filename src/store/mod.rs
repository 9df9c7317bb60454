//! Persistent component price cache.
//!
//! The store keeps at most one [`PriceRecord`] per normalized component name
//! and treats entries older than the freshness window as absent. Persistence
//! is delegated to a [`PriceTable`] backend and is best-effort: a table that
//! cannot be read behaves like an empty one, and a failed write is logged while
//! the caller still receives the record it asked for.
//!
//! Every [`PriceStore::upsert`] rewrites the whole table. Writers must be
//! serialized; two processes sharing one file can lose updates.

mod csv_table;
mod duckdb_table;

pub use csv_table::CsvTable;
pub use duckdb_table::DuckDbTable;

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};

use crate::error::Result;
use crate::models::{normalize_name, Category, PriceRecord};

/// Storage backend holding the full, ordered list of price records.
pub trait PriceTable {
    /// Read every record in insertion order.
    fn load(&self) -> Result<Vec<PriceRecord>>;

    /// Replace the stored contents with `records`.
    fn save(&mut self, records: &[PriceRecord]) -> Result<()>;
}

// ---------------------------------------------------------------------------
// PriceStore
// ---------------------------------------------------------------------------

/// Keyed price cache with a freshness window, backed by a [`PriceTable`].
pub struct PriceStore {
    table: Box<dyn PriceTable + Send>,
}

impl PriceStore {
    /// Wrap an arbitrary backend.
    pub fn new<T: PriceTable + Send + 'static>(table: T) -> Self {
        Self {
            table: Box::new(table),
        }
    }

    /// Open (or create) a DuckDB-backed store at `path`.
    pub fn open_duckdb<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(DuckDbTable::open(path)?))
    }

    /// Open a CSV-backed store at `path`. The file is created on first write.
    pub fn open_csv<P: AsRef<Path>>(path: P) -> Self {
        Self::new(CsvTable::new(path))
    }

    /// A store that lives only as long as this value.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(DuckDbTable::open_in_memory()?))
    }

    fn read_all(&self) -> Vec<PriceRecord> {
        match self.table.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("price store unreadable, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Fresh record for `name`, matched case-insensitively.
    pub fn lookup(&self, name: &str) -> Option<PriceRecord> {
        self.lookup_at(name, Utc::now())
    }

    /// Like [`lookup`](Self::lookup), judging freshness against `now`.
    pub fn lookup_at(&self, name: &str, now: DateTime<Utc>) -> Option<PriceRecord> {
        let name = normalize_name(name);
        let record = self.read_all().into_iter().find(|r| r.matches(&name))?;
        if record.is_fresh_at(now) {
            Some(record)
        } else {
            tracing::debug!(
                "cached price for '{}' is stale (updated {})",
                name,
                record.last_updated
            );
            None
        }
    }

    /// Store a new-price estimate for `name`, replacing any existing entry in place.
    ///
    /// Returns the stored record even when it could not be persisted.
    pub fn upsert(
        &mut self,
        name: &str,
        category: Category,
        new_price: f64,
        source: &str,
    ) -> PriceRecord {
        self.upsert_at(name, category, new_price, source, Utc::now())
    }

    /// Like [`upsert`](Self::upsert), stamping the record with `now`.
    pub fn upsert_at(
        &mut self,
        name: &str,
        category: Category,
        new_price: f64,
        source: &str,
        now: DateTime<Utc>,
    ) -> PriceRecord {
        let name = normalize_name(name);
        let new_price = if new_price.is_finite() && new_price > 0.0 {
            new_price
        } else {
            0.0
        };
        // Persisted timestamps carry microseconds.
        let record = PriceRecord::new(&name, category, new_price, source, now.trunc_subsecs(6));

        let mut records = self.read_all();
        match records.iter_mut().find(|r| r.matches(&name)) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }

        if let Err(e) = self.table.save(&records) {
            tracing::warn!("could not save price for '{}': {}", name, e);
        }
        record
    }

    /// Every record in insertion order, stale ones included.
    pub fn list_all(&self) -> Vec<PriceRecord> {
        self.read_all()
    }

    /// Write the whole store to a CSV file for inspection.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        CsvTable::new(path).save(&self.list_all())
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp. Naive ISO-8601 values are read as UTC.
///
/// Unreadable values map to the Unix epoch, so the record is always stale.
pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Utc);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .unwrap_or_else(|| {
            tracing::debug!("unreadable price timestamp '{}'", raw);
            DateTime::<Utc>::UNIX_EPOCH
        })
}
