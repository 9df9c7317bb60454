//! Reconciliation of the oracle's appraisal with cached and heuristic prices.
//!
//! The oracle's per-part prices are only a fallback: every part is priced from
//! the [`PriceStore`] (or the heuristics, which then seed the store), and the
//! oracle's number is used only when that price is zero. Totals, profit,
//! margin and verdict are recomputed here and never taken from the oracle.
//!
//! Nothing in this module returns an error. Malformed oracle output, missing
//! prices and unwritable stores all degrade to zeros, empty lists and `PASS`.

use crate::config;
use crate::currency::{self, round2};
use crate::estimator;
use crate::models::{
    normalize_name, AnalysisRecord, EnrichedPart, ListingInput, ListingPriceHint, OracleGuess,
    RawPart, UnverifiedGuess, Verdict,
};
use crate::store::PriceStore;

// ---------------------------------------------------------------------------
// Listing price resolution
// ---------------------------------------------------------------------------

/// One source for the asking price. Returns `0.0` when it has nothing to offer.
pub type ListingPriceExtractor = fn(&ListingInput, &OracleGuess) -> f64;

/// Extractors in priority order; the first positive result wins.
pub const LISTING_PRICE_CHAIN: [(&str, ListingPriceExtractor); 4] = [
    ("oracle number", oracle_numeric_price),
    ("oracle text", oracle_text_price),
    ("scraped price", scraped_price),
    ("description", description_price),
];

pub fn oracle_numeric_price(_: &ListingInput, guess: &OracleGuess) -> f64 {
    match guess.listing_price {
        ListingPriceHint::Number(n) if n > 0.0 => n,
        _ => 0.0,
    }
}

pub fn oracle_text_price(_: &ListingInput, guess: &OracleGuess) -> f64 {
    match &guess.listing_price {
        ListingPriceHint::Text(s) => currency::parse_price(s),
        _ => 0.0,
    }
}

pub fn scraped_price(listing: &ListingInput, _: &OracleGuess) -> f64 {
    currency::parse_price(&listing.price_str)
}

pub fn description_price(listing: &ListingInput, _: &OracleGuess) -> f64 {
    currency::find_price_in_text(&listing.raw_text)
}

/// Walk [`LISTING_PRICE_CHAIN`] and return the first positive price, or `0.0`.
pub fn resolve_listing_price(listing: &ListingInput, guess: &OracleGuess) -> f64 {
    LISTING_PRICE_CHAIN
        .iter()
        .find_map(|(label, extract)| {
            let price = extract(listing, guess);
            if price > 0.0 {
                tracing::debug!("listing price {} taken from {}", price, label);
                Some(price)
            } else {
                None
            }
        })
        .unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Final verdict.
///
/// Any oracle verdict mentioning TRASH wins outright. An exact BUY or PASS
/// from the oracle is kept. Otherwise the margin decides.
pub fn derive_verdict(
    oracle_verdict: Option<&str>,
    listing_price: f64,
    profit_percentage: f64,
) -> Verdict {
    let oracle = oracle_verdict.map(str::trim).unwrap_or("");
    if oracle.to_uppercase().contains("TRASH") {
        return Verdict::Trash;
    }
    if oracle.eq_ignore_ascii_case("BUY") {
        return Verdict::Buy;
    }
    if oracle.eq_ignore_ascii_case("PASS") {
        return Verdict::Pass;
    }
    if listing_price > 0.0 && profit_percentage > config::BUY_MARGIN_PERCENT {
        Verdict::Buy
    } else {
        Verdict::Pass
    }
}

// ---------------------------------------------------------------------------
// ReconciliationEngine
// ---------------------------------------------------------------------------

/// Prices oracle parts against a [`PriceStore`] and builds the final record.
pub struct ReconciliationEngine<'a> {
    store: &'a mut PriceStore,
}

impl<'a> ReconciliationEngine<'a> {
    /// Create an engine bound to the given store.
    pub fn new(store: &'a mut PriceStore) -> Self {
        Self { store }
    }

    /// Resolve one part.
    ///
    /// A fresh cache entry is used as is. On a miss the heuristics price the
    /// part and the estimate is written back to the store. The oracle's own
    /// guess is used only when the resolved used price is zero.
    pub fn enrich_part(&mut self, part: &RawPart) -> EnrichedPart {
        let name = normalize_name(&part.component);

        let (record, cached) = match self.store.lookup(&name) {
            Some(record) => {
                tracing::debug!("price cache hit for '{}'", name);
                (record, true)
            }
            None => {
                let (category, new_price) = estimator::estimate(&name);
                tracing::debug!(
                    "price cache miss for '{}', estimated {} new as {}",
                    name,
                    new_price,
                    category
                );
                let record =
                    self.store
                        .upsert(&name, category, new_price, config::HEURISTIC_SOURCE);
                (record, false)
            }
        };

        let used_price = if record.estimated_used_price > 0.0 {
            record.estimated_used_price
        } else {
            part.estimated_price
        };

        EnrichedPart {
            component: part.component.clone(),
            estimated_price: part.estimated_price,
            notes: part.notes.clone(),
            category: record.category,
            estimated_new_price: record.estimated_new_price,
            estimated_used_price: used_price,
            cached,
        }
    }

    /// Appraise a listing from the oracle's unverified guess. Never fails.
    pub fn analyze(&mut self, listing: &ListingInput, guess: &UnverifiedGuess) -> AnalysisRecord {
        let guess = guess.validate();

        let parts: Vec<EnrichedPart> = guess.parts.iter().map(|p| self.enrich_part(p)).collect();
        let total_estimated_value: f64 = parts.iter().map(|p| p.estimated_used_price).sum();

        let listing_price = resolve_listing_price(listing, &guess);
        let profit_potential = round2(total_estimated_value - listing_price);
        let profit_percentage = if listing_price > 0.0 {
            round2(profit_potential / listing_price * 100.0)
        } else {
            0.0
        };

        let verdict = derive_verdict(guess.verdict.as_deref(), listing_price, profit_percentage);
        tracing::debug!(
            "'{}': value {} vs price {} ({}%) -> {}",
            listing.title,
            total_estimated_value,
            listing_price,
            profit_percentage,
            verdict
        );

        AnalysisRecord {
            is_gaming_pc: guess.is_gaming_pc,
            listing_price,
            parts,
            total_estimated_value,
            profit_potential,
            profit_percentage,
            verdict,
            reasoning: guess.reasoning,
        }
    }
}
