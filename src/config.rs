use std::path::PathBuf;

/// Fraction knocked off the new price to get the used price.
pub const USED_PART_DISCOUNT: f64 = 0.35;

/// Days a cached price stays fresh.
pub const CACHE_EXPIRY_DAYS: i64 = 30;

/// Margin (in percent) above which a listing is worth buying.
pub const BUY_MARGIN_PERCENT: f64 = 50.0;

/// Listing descriptions are cut to this many characters.
pub const MAX_RAW_TEXT_CHARS: usize = 8000;

/// Source tag written for prices produced by the heuristic estimator.
pub const HEURISTIC_SOURCE: &str = "heuristic";

/// Reasoning attached to the neutral guess substituted for malformed oracle output.
pub const UNPARSEABLE_REASONING: &str = "unparseable";

pub const DUCKDB_STORE_FILE: &str = "components_cache.duckdb";
pub const CSV_STORE_FILE: &str = "components_cache.csv";
pub const PRICE_TABLE: &str = "component_prices";

/// Column layout shared by every persistence backend.
pub const CSV_HEADER: [&str; 6] = [
    "component_name",
    "category",
    "estimated_new_price_eur",
    "estimated_used_price_eur",
    "last_updated",
    "source",
];

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_ORACLE_MODEL: &str = "gpt-4o";

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("lbc-arbitrage")
    } else {
        PathBuf::from(".lbc-arbitrage-cache")
    }
}
