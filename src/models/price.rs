use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::currency::round2;

// ---------------------------------------------------------------------------
// Category — Component family used for pricing and reporting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "RAM")]
    Ram,
    Storage,
    Motherboard,
    #[serde(rename = "PSU")]
    Psu,
    Case,
    Cooler,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Gpu,
        Category::Cpu,
        Category::Ram,
        Category::Storage,
        Category::Motherboard,
        Category::Psu,
        Category::Case,
        Category::Cooler,
        Category::Other,
    ];

    /// The label written to persistence (`"GPU"`, `"Storage"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Gpu => "GPU",
            Category::Cpu => "CPU",
            Category::Ram => "RAM",
            Category::Storage => "Storage",
            Category::Motherboard => "Motherboard",
            Category::Psu => "PSU",
            Category::Case => "Case",
            Category::Cooler => "Cooler",
            Category::Other => "Other",
        }
    }

    /// Parse a persisted label, case-insensitively. Unknown labels map to `Other`.
    pub fn from_label(label: &str) -> Category {
        let label = label.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
            .unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PriceRecord — One cached component price
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub component_name: String,
    pub category: Category,
    pub estimated_new_price: f64,
    pub estimated_used_price: f64,
    pub last_updated: DateTime<Utc>,
    pub source: String,
}

impl PriceRecord {
    /// Build a record stamped at `now`, deriving the used price from the new price.
    pub fn new(
        component_name: &str,
        category: Category,
        estimated_new_price: f64,
        source: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            component_name: component_name.to_string(),
            category,
            estimated_new_price,
            estimated_used_price: used_price(estimated_new_price),
            last_updated: now,
            source: source.to_string(),
        }
    }

    /// True while `now - last_updated` does not exceed the freshness window.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now - self.last_updated <= Duration::days(config::CACHE_EXPIRY_DAYS)
    }

    /// Whether this record is keyed by the same normalized name as `name`.
    pub fn matches(&self, name: &str) -> bool {
        normalize_name(&self.component_name).to_lowercase() == normalize_name(name).to_lowercase()
    }
}

/// Used price for a given new price, rounded to cents.
pub fn used_price(new_price: f64) -> f64 {
    round2(new_price * (1.0 - config::USED_PART_DISCOUNT))
}

/// Trim a component label and collapse internal runs of whitespace.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}
