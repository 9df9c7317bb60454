//! Shared fixtures for the integration tests.
//!
//! Provides throwaway price stores (in-memory DuckDB, temp-dir CSV), a backend
//! that always fails, and helpers for building oracle guesses.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use lbc_arbitrage::{
    AppraisalError, ListingInput, PriceRecord, PriceStore, PriceTable, Result, UnverifiedGuess,
};
use serde_json::{json, Value};

/// A fresh in-memory store.
pub fn memory_store() -> PriceStore {
    PriceStore::in_memory().unwrap()
}

/// A CSV store inside a temp directory.
///
/// The caller must keep the `TempDir` alive for the duration of the test.
pub fn csv_store() -> (PriceStore, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let store = PriceStore::open_csv(tmp_dir.path().join("components_cache.csv"));
    (store, tmp_dir)
}

/// Backend whose reads and writes always fail.
pub struct BrokenTable;

impl PriceTable for BrokenTable {
    fn load(&self) -> Result<Vec<PriceRecord>> {
        Err(AppraisalError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "table is gone",
        )))
    }

    fn save(&mut self, _records: &[PriceRecord]) -> Result<()> {
        Err(AppraisalError::InvalidArgument("disk full".into()))
    }
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn listing(price_str: &str) -> ListingInput {
    ListingInput::new("PC gamer", "Tour complète, bon état.", price_str)
}

/// A part the heuristics price at zero, so the oracle's number is used.
pub fn zero_priced_part(label: &str, price: f64) -> Value {
    json!({ "component": format!("Generic case {label}"), "estimated_price": price, "notes": "" })
}

/// Oracle guess with the given listing price, parts and verdict.
pub fn guess(listing_price: Value, parts: Vec<Value>, verdict: Option<&str>) -> UnverifiedGuess {
    let mut body = json!({
        "is_gaming_pc": true,
        "listing_price": listing_price,
        "parts": parts,
        "reasoning": "test reasoning",
    });
    if let Some(v) = verdict {
        body["verdict"] = json!(v);
    }
    UnverifiedGuess::Text(body.to_string())
}
