//! Resale appraisal for used PC listings.
//!
//! Combines a free-text AI appraisal with a locally cached component price
//! table and derives a BUY / PASS / TRASH verdict. Component prices are cached
//! in a DuckDB (or CSV) table with a 30-day freshness window; components the
//! cache does not know are priced by keyword heuristics and written back.
//!
//! # Quick start
//!
//! ```no_run
//! use lbc_arbitrage::{Appraiser, ListingInput, UnverifiedGuess};
//!
//! let mut appraiser = Appraiser::builder().build().unwrap();
//!
//! let listing = ListingInput::new("PC gamer RTX 3060", "Ryzen 5, 16GB DDR4 ...", "450 €");
//! let guess = UnverifiedGuess::from(r#"{"parts": [{"component": "RTX 3060", "estimated_price": 200}]}"#);
//!
//! let record = appraiser.analyze(&listing, &guess);
//! println!("{} ({}%)", record.verdict, record.profit_percentage);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod currency;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod models;
pub mod oracle;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncAppraiser;
pub use engine::ReconciliationEngine;
pub use error::{AppraisalError, Result};
pub use models::{
    AnalysisRecord, Category, EnrichedPart, ListingInput, PriceRecord, RawPart, UnverifiedGuess,
    Verdict,
};
pub use oracle::{OpenAiOracle, Oracle};
pub use store::{CsvTable, DuckDbTable, PriceStore, PriceTable};

use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// AppraiserBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`Appraiser`].
///
/// Use [`Appraiser::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](AppraiserBuilder::build).
#[derive(Default)]
pub struct AppraiserBuilder {
    cache_dir: Option<PathBuf>,
    store_path: Option<PathBuf>,
    csv: bool,
    in_memory: bool,
    store: Option<PriceStore>,
}

impl AppraiserBuilder {
    /// Set the directory holding the price cache.
    ///
    /// If not set, the platform cache directory is used (e.g.
    /// `~/.cache/lbc-arbitrage` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use this exact file for the price cache, ignoring `cache_dir`.
    pub fn store_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.store_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep the cache in a CSV file instead of a DuckDB database.
    pub fn csv_store(mut self, csv: bool) -> Self {
        self.csv = csv;
        self
    }

    /// Keep the cache in memory only. Nothing is written to disk.
    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = in_memory;
        self
    }

    /// Use an already constructed store. Overrides every other store option.
    pub fn store(mut self, store: PriceStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Open the price store and build the appraiser.
    pub fn build(self) -> Result<Appraiser> {
        let store = match self.store {
            Some(store) => store,
            None if self.in_memory => PriceStore::in_memory()?,
            None => {
                let file = if self.csv {
                    config::CSV_STORE_FILE
                } else {
                    config::DUCKDB_STORE_FILE
                };
                let path = self.store_path.unwrap_or_else(|| {
                    self.cache_dir
                        .unwrap_or_else(config::default_cache_dir)
                        .join(file)
                });
                tracing::debug!("opening price store at {}", path.display());
                if self.csv {
                    PriceStore::open_csv(path)
                } else {
                    PriceStore::open_duckdb(path)?
                }
            }
        };
        Ok(Appraiser { store })
    }
}

// ---------------------------------------------------------------------------
// Appraiser
// ---------------------------------------------------------------------------

/// The main entry point: owns the price store and runs appraisals against it.
///
/// Created via [`Appraiser::builder()`].
pub struct Appraiser {
    store: PriceStore,
}

impl Appraiser {
    /// Create a new builder for configuring the appraiser.
    pub fn builder() -> AppraiserBuilder {
        AppraiserBuilder::default()
    }

    /// Read access to the price store.
    pub fn prices(&self) -> &PriceStore {
        &self.store
    }

    /// Write access to the price store, e.g. to seed known prices.
    pub fn prices_mut(&mut self) -> &mut PriceStore {
        &mut self.store
    }

    /// A reconciliation engine borrowing this appraiser's store.
    pub fn engine(&mut self) -> ReconciliationEngine<'_> {
        ReconciliationEngine::new(&mut self.store)
    }

    /// Appraise a listing from an oracle guess obtained elsewhere.
    pub fn analyze(&mut self, listing: &ListingInput, guess: &UnverifiedGuess) -> AnalysisRecord {
        self.engine().analyze(listing, guess)
    }

    /// Ask `oracle` about the listing, then appraise it.
    ///
    /// An oracle failure is logged and the listing is appraised from the
    /// neutral guess instead.
    pub fn appraise(&mut self, oracle: &dyn Oracle, listing: &ListingInput) -> AnalysisRecord {
        let guess = oracle.appraise(listing).unwrap_or_else(|e| {
            tracing::warn!("oracle failed for '{}': {}", listing.title, e);
            UnverifiedGuess::Unavailable
        });
        self.analyze(listing, &guess)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Appraiser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let records = self.store.list_all();
        let now = chrono::Utc::now();
        let fresh = records.iter().filter(|r| r.is_fresh_at(now)).count();
        write!(
            f,
            "Appraiser(cached_components={}, fresh={})",
            records.len(),
            fresh
        )
    }
}
