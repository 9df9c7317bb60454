use std::fmt;

use serde::{Deserialize, Serialize};

use super::price::Category;

// ---------------------------------------------------------------------------
// RawPart — One component as named and priced by the oracle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPart {
    pub component: String,
    pub estimated_price: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RawPart {
    pub fn new(component: &str, estimated_price: f64) -> Self {
        Self {
            component: component.to_string(),
            estimated_price,
            notes: None,
        }
    }
}

// ---------------------------------------------------------------------------
// EnrichedPart — A raw part after cache / heuristic resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPart {
    pub component: String,
    /// The oracle's own guess, kept for display.
    pub estimated_price: f64,
    pub notes: Option<String>,
    pub category: Category,
    pub estimated_new_price: f64,
    /// Price counted toward the listing's total value.
    pub estimated_used_price: f64,
    /// True when the price came from a fresh cache entry.
    pub cached: bool,
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Buy,
    Pass,
    Trash,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Buy => "BUY",
            Verdict::Pass => "PASS",
            Verdict::Trash => "TRASH",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AnalysisRecord — Final appraisal of one listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub is_gaming_pc: bool,
    pub listing_price: f64,
    pub parts: Vec<EnrichedPart>,
    pub total_estimated_value: f64,
    pub profit_potential: f64,
    pub profit_percentage: f64,
    pub verdict: Verdict,
    pub reasoning: String,
}
