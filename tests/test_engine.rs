//! Reconciliation engine: enrichment, totals, listing price chain and verdicts.

mod common;

use lbc_arbitrage::engine::{
    derive_verdict, oracle_numeric_price, oracle_text_price, resolve_listing_price,
    scraped_price, description_price,
};
use lbc_arbitrage::models::{ListingPriceHint, OracleGuess};
use lbc_arbitrage::{
    Category, ListingInput, RawPart, ReconciliationEngine, UnverifiedGuess, Verdict,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// enrich_part
// ---------------------------------------------------------------------------

#[test]
fn enrichment_is_idempotent() {
    let mut store = common::memory_store();
    let mut engine = ReconciliationEngine::new(&mut store);
    let part = RawPart::new("RTX 3060", 200.0);

    let first = engine.enrich_part(&part);
    let second = engine.enrich_part(&part);

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(first.estimated_used_price, second.estimated_used_price);
    assert_eq!(first.estimated_new_price, second.estimated_new_price);
    assert_eq!(first.estimated_used_price, 227.5);
    assert_eq!(first.category, Category::Gpu);
}

#[test]
fn enrichment_seeds_the_store() {
    let mut store = common::memory_store();
    ReconciliationEngine::new(&mut store).enrich_part(&RawPart::new("16GB DDR4", 40.0));

    let record = store.lookup("16gb ddr4").unwrap();
    assert_eq!(record.estimated_new_price, 80.0);
    assert_eq!(record.source, "heuristic");
}

#[test]
fn cached_price_beats_oracle_guess() {
    let mut store = common::memory_store();
    store.upsert("RTX 3080", Category::Gpu, 400.0, "manual");
    let enriched = ReconciliationEngine::new(&mut store).enrich_part(&RawPart::new("rtx 3080", 900.0));

    assert!(enriched.cached);
    assert_eq!(enriched.estimated_used_price, 260.0);
    assert_eq!(enriched.estimated_price, 900.0);
}

#[test]
fn heuristic_beats_higher_oracle_guess() {
    let mut store = common::memory_store();
    // Heuristic: 20 new -> 13 used, even though the oracle says 60.
    let enriched = ReconciliationEngine::new(&mut store).enrich_part(&RawPart::new("Stock cooler", 60.0));
    assert_eq!(enriched.estimated_used_price, 13.0);
}

#[test]
fn oracle_guess_fills_zero_heuristic_price() {
    let mut store = common::memory_store();
    let enriched =
        ReconciliationEngine::new(&mut store).enrich_part(&RawPart::new("Generic PSU 500W", 25.0));
    assert_eq!(enriched.category, Category::Psu);
    assert_eq!(enriched.estimated_new_price, 0.0);
    assert_eq!(enriched.estimated_used_price, 25.0);
}

#[test]
fn enrichment_keeps_part_fields() {
    let mut store = common::memory_store();
    let part = RawPart {
        component: "  Noctua   cooler ".to_string(),
        estimated_price: 30.0,
        notes: Some("boxed".to_string()),
    };
    let enriched = ReconciliationEngine::new(&mut store).enrich_part(&part);
    assert_eq!(enriched.component, "  Noctua   cooler ");
    assert_eq!(enriched.notes.as_deref(), Some("boxed"));
    assert!(store.lookup("noctua cooler").is_some());
}

// ---------------------------------------------------------------------------
// analyze: totals
// ---------------------------------------------------------------------------

#[test]
fn total_is_sum_of_resolved_prices() {
    let mut store = common::memory_store();
    let guess = common::guess(
        json!(1000),
        vec![
            common::zero_priced_part("a", 250.0),
            common::zero_priced_part("b", 300.0),
            common::zero_priced_part("c", 80.0),
        ],
        Some("PASS"),
    );
    let record = ReconciliationEngine::new(&mut store).analyze(&common::listing("1000"), &guess);

    assert_eq!(record.parts.len(), 3);
    assert_eq!(record.total_estimated_value, 630.0);
    assert!(record.parts.iter().all(|p| p.category == Category::Case));
}

#[test]
fn empty_parts_total_zero() {
    let mut store = common::memory_store();
    let guess = common::guess(json!(500), vec![], Some("PASS"));
    let record = ReconciliationEngine::new(&mut store).analyze(&common::listing("500"), &guess);
    assert!(record.parts.is_empty());
    assert_eq!(record.total_estimated_value, 0.0);
}

#[test]
fn missing_parts_total_zero() {
    let mut store = common::memory_store();
    let guess = UnverifiedGuess::from(r#"{"listing_price": 500, "verdict": "PASS"}"#);
    let record = ReconciliationEngine::new(&mut store).analyze(&common::listing("500"), &guess);
    assert_eq!(record.total_estimated_value, 0.0);
    assert_eq!(record.profit_potential, -500.0);
}

#[test]
fn heuristic_prices_drive_the_total() {
    let mut store = common::memory_store();
    let guess = common::guess(
        json!(400),
        vec![
            json!({"component": "RTX 3060", "estimated_price": 150}),
            json!({"component": "16GB DDR4", "estimated_price": 30}),
        ],
        None,
    );
    let record = ReconciliationEngine::new(&mut store).analyze(&common::listing("400"), &guess);
    // 350 * 0.65 + 80 * 0.65
    assert_eq!(record.total_estimated_value, 227.5 + 52.0);
    assert_eq!(record.profit_potential, -120.5);
}

// ---------------------------------------------------------------------------
// analyze: verdicts and margins
// ---------------------------------------------------------------------------

#[test]
fn trash_overrides_profitability() {
    let mut store = common::memory_store();
    let guess = common::guess(
        json!(100),
        vec![common::zero_priced_part("a", 500.0)],
        Some("TRASH"),
    );
    let record = ReconciliationEngine::new(&mut store).analyze(&common::listing("100"), &guess);
    assert_eq!(record.profit_percentage, 400.0);
    assert_eq!(record.verdict, Verdict::Trash);
}

#[test]
fn trash_matches_anywhere_in_oracle_verdict() {
    assert_eq!(derive_verdict(Some("probably trash"), 100.0, 300.0), Verdict::Trash);
}

#[test]
fn sixty_percent_margin_without_oracle_verdict_is_buy() {
    let mut store = common::memory_store();
    let guess = common::guess(json!(100), vec![common::zero_priced_part("a", 160.0)], None);
    let record = ReconciliationEngine::new(&mut store).analyze(&common::listing("100"), &guess);
    assert_eq!(record.total_estimated_value, 160.0);
    assert_eq!(record.profit_potential, 60.0);
    assert_eq!(record.profit_percentage, 60.0);
    assert_eq!(record.verdict, Verdict::Buy);
}

#[test]
fn invalid_oracle_verdict_falls_back_to_margin() {
    let mut store = common::memory_store();
    let guess = common::guess(json!(100), vec![common::zero_priced_part("a", 160.0)], Some("MAYBE"));
    let record = ReconciliationEngine::new(&mut store).analyze(&common::listing("100"), &guess);
    assert_eq!(record.verdict, Verdict::Buy);
}

#[test]
fn negative_margin_is_pass() {
    let mut store = common::memory_store();
    let guess = common::guess(json!(1000), vec![common::zero_priced_part("a", 550.0)], None);
    let record = ReconciliationEngine::new(&mut store).analyze(&common::listing("1000"), &guess);
    assert_eq!(record.profit_potential, -450.0);
    assert_eq!(record.profit_percentage, -45.0);
    assert_eq!(record.verdict, Verdict::Pass);
}

#[test]
fn oracle_buy_or_pass_is_kept() {
    assert_eq!(derive_verdict(Some("pass"), 100.0, 90.0), Verdict::Pass);
    assert_eq!(derive_verdict(Some(" Buy "), 100.0, -20.0), Verdict::Buy);
}

#[test]
fn margin_must_exceed_threshold() {
    assert_eq!(derive_verdict(None, 100.0, 50.0), Verdict::Pass);
    assert_eq!(derive_verdict(None, 100.0, 50.01), Verdict::Buy);
    assert_eq!(derive_verdict(None, 0.0, 900.0), Verdict::Pass);
}

#[test]
fn percentage_follows_rounded_profit() {
    let mut store = common::memory_store();
    let guess = common::guess(json!(1), vec![common::zero_priced_part("a", 1.005)], None);
    let record = ReconciliationEngine::new(&mut store).analyze(&common::listing("1"), &guess);

    assert_eq!(record.profit_potential, 0.0);
    assert_eq!(record.profit_percentage, 0.0);
}

#[test]
fn half_point_profit_sits_on_threshold() {
    let mut store = common::memory_store();
    let guess = common::guess(json!(1), vec![common::zero_priced_part("a", 1.505)], None);
    let record = ReconciliationEngine::new(&mut store).analyze(&common::listing("1"), &guess);

    assert_eq!(record.profit_potential, 0.5);
    assert_eq!(record.profit_percentage, 50.0);
    assert_eq!(record.verdict, Verdict::Pass);
}

#[test]
fn zero_listing_price_gives_zero_percentage_and_pass() {
    let mut store = common::memory_store();
    let guess = common::guess(json!(0), vec![common::zero_priced_part("a", 100.0)], None);
    let listing = ListingInput::new("PC gamer", "Description without price", "");
    let record = ReconciliationEngine::new(&mut store).analyze(&listing, &guess);

    assert_eq!(record.listing_price, 0.0);
    assert_eq!(record.profit_percentage, 0.0);
    assert!(!record.profit_percentage.is_nan());
    assert_eq!(record.profit_potential, 100.0);
    assert_eq!(record.verdict, Verdict::Pass);
}

#[test]
fn unparseable_guess_is_neutral() {
    let mut store = common::memory_store();
    let guess = UnverifiedGuess::from("Sorry, I cannot help with that.");
    let record = ReconciliationEngine::new(&mut store).analyze(&common::listing("500"), &guess);

    assert!(record.parts.is_empty());
    assert_eq!(record.total_estimated_value, 0.0);
    assert_eq!(record.listing_price, 500.0);
    assert_eq!(record.verdict, Verdict::Pass);
    assert_eq!(record.reasoning, "unparseable");
}

#[test]
fn reasoning_and_gaming_flag_are_carried_over() {
    let mut store = common::memory_store();
    let guess = common::guess(json!(100), vec![], Some("PASS"));
    let record = ReconciliationEngine::new(&mut store).analyze(&common::listing("100"), &guess);
    assert!(record.is_gaming_pc);
    assert_eq!(record.reasoning, "test reasoning");
}

// ---------------------------------------------------------------------------
// Listing price chain
// ---------------------------------------------------------------------------

fn guess_with_price(hint: ListingPriceHint) -> OracleGuess {
    OracleGuess {
        listing_price: hint,
        ..OracleGuess::neutral()
    }
}

#[test]
fn each_extractor_reads_its_own_source() {
    let listing = ListingInput::new("PC", "Vendu 300 € ferme", "1\u{00A0}200");
    let numeric = guess_with_price(ListingPriceHint::Number(450.0));
    let text = guess_with_price(ListingPriceHint::Text("499,90 €".into()));

    assert_eq!(oracle_numeric_price(&listing, &numeric), 450.0);
    assert_eq!(oracle_numeric_price(&listing, &text), 0.0);
    assert_eq!(oracle_text_price(&listing, &text), 499.90);
    assert_eq!(oracle_text_price(&listing, &numeric), 0.0);
    assert_eq!(scraped_price(&listing, &numeric), 1200.0);
    assert_eq!(description_price(&listing, &numeric), 300.0);
}

#[test]
fn oracle_number_comes_first() {
    let listing = ListingInput::new("PC", "Vendu 300 €", "1200");
    let guess = guess_with_price(ListingPriceHint::Number(450.0));
    assert_eq!(resolve_listing_price(&listing, &guess), 450.0);
}

#[test]
fn non_positive_oracle_number_is_skipped() {
    let listing = ListingInput::new("PC", "Vendu 300 €", "1200");
    let guess = guess_with_price(ListingPriceHint::Number(-5.0));
    assert_eq!(resolve_listing_price(&listing, &guess), 1200.0);
}

#[test]
fn oracle_text_comes_before_scraped_price() {
    let listing = ListingInput::new("PC", "", "1200");
    let guess = guess_with_price(ListingPriceHint::Text("about 800 EUR".into()));
    assert_eq!(resolve_listing_price(&listing, &guess), 800.0);
}

#[test]
fn description_is_last_resort() {
    let listing = ListingInput::new("PC", "Prix : 2\u{202F}500 €", "");
    let guess = guess_with_price(ListingPriceHint::Missing);
    assert_eq!(resolve_listing_price(&listing, &guess), 2500.0);
}

#[test]
fn nothing_found_is_zero() {
    let listing = ListingInput::new("PC", "Faire offre", "");
    let guess = guess_with_price(ListingPriceHint::Text("number found in text".into()));
    assert_eq!(resolve_listing_price(&listing, &guess), 0.0);
}

#[test]
fn analyze_uses_scraped_price_when_oracle_is_silent() {
    let mut store = common::memory_store();
    let guess = UnverifiedGuess::from(r#"{"parts": [], "verdict": "PASS"}"#);
    let listing = ListingInput::new("PC", "", "1\u{00A0}000");
    let record = ReconciliationEngine::new(&mut store).analyze(&listing, &guess);
    assert_eq!(record.listing_price, 1000.0);
}
