//! Async wrapper around [`Appraiser`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every operation on the blocking thread pool via
//! [`tokio::task::spawn_blocking`]. The appraiser sits behind one [`Mutex`],
//! so concurrent appraisals against the same store run one at a time.
//!
//! # Example
//!
//! ```no_run
//! use lbc_arbitrage::{AsyncAppraiser, ListingInput, UnverifiedGuess};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let appraiser = AsyncAppraiser::builder().build().await.unwrap();
//!
//!     let listing = ListingInput::new("PC gamer", "RTX 3070, 32GB DDR4", "600");
//!     let guess = UnverifiedGuess::from(r#"{"verdict": "PASS"}"#);
//!     let record = appraiser.analyze(listing, guess).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{AppraisalError, Result};
use crate::models::{AnalysisRecord, ListingInput, PriceRecord, UnverifiedGuess};
use crate::oracle::Oracle;
use crate::Appraiser;

// ---------------------------------------------------------------------------
// AsyncAppraiserBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncAppraiser`].
#[derive(Default)]
pub struct AsyncAppraiserBuilder {
    cache_dir: Option<PathBuf>,
    csv: bool,
    in_memory: bool,
}

impl AsyncAppraiserBuilder {
    /// Set the directory holding the price cache.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep the cache in a CSV file instead of a DuckDB database.
    pub fn csv_store(mut self, csv: bool) -> Self {
        self.csv = csv;
        self
    }

    /// Keep the cache in memory only.
    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = in_memory;
        self
    }

    /// Build the async appraiser, opening the store on the blocking pool.
    pub async fn build(self) -> Result<AsyncAppraiser> {
        tokio::task::spawn_blocking(move || {
            let mut builder = Appraiser::builder()
                .csv_store(self.csv)
                .in_memory(self.in_memory);
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            Ok(AsyncAppraiser::from_appraiser(builder.build()?))
        })
        .await
        .map_err(|e| AppraisalError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncAppraiser
// ---------------------------------------------------------------------------

/// Async wrapper around [`Appraiser`].
///
/// Cloning is cheap; clones share the same store and lock.
#[derive(Clone)]
pub struct AsyncAppraiser {
    inner: Arc<Mutex<Appraiser>>,
}

impl AsyncAppraiser {
    /// Create a new builder for configuring the async appraiser.
    pub fn builder() -> AsyncAppraiserBuilder {
        AsyncAppraiserBuilder::default()
    }

    /// Wrap an already built appraiser.
    pub fn from_appraiser(appraiser: Appraiser) -> Self {
        Self {
            inner: Arc::new(Mutex::new(appraiser)),
        }
    }

    /// Run a sync operation on the blocking thread pool while holding the lock.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Appraiser) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let appraiser = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = appraiser
                .lock()
                .map_err(|_| AppraisalError::InvalidArgument("appraiser lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| AppraisalError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Appraise a listing from an oracle guess.
    pub async fn analyze(
        &self,
        listing: ListingInput,
        guess: UnverifiedGuess,
    ) -> Result<AnalysisRecord> {
        self.run(move |a| Ok(a.analyze(&listing, &guess))).await
    }

    /// Query `oracle` and appraise the listing. The HTTP call also runs on the
    /// blocking pool.
    pub async fn appraise<O>(&self, oracle: Arc<O>, listing: ListingInput) -> Result<AnalysisRecord>
    where
        O: Oracle + Send + Sync + 'static,
    {
        self.run(move |a| Ok(a.appraise(oracle.as_ref(), &listing)))
            .await
    }

    /// Snapshot of every cached price.
    pub async fn list_prices(&self) -> Result<Vec<PriceRecord>> {
        self.run(|a| Ok(a.prices().list_all())).await
    }
}
