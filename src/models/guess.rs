//! Oracle output before and after validation.
//!
//! The oracle replies with free text that is supposed to be a JSON object.
//! Nothing about it is trusted: [`UnverifiedGuess::validate`] checks each field
//! on its own and falls back to a neutral value for anything missing or of the
//! wrong type. If the payload is not a JSON object at all, the whole guess is
//! replaced by [`OracleGuess::neutral`].

use serde_json::{Map, Value};

use super::analysis::RawPart;
use crate::config;
use crate::currency;

// ---------------------------------------------------------------------------
// UnverifiedGuess — Raw oracle output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UnverifiedGuess {
    /// The reply text, expected (but not guaranteed) to hold a JSON object.
    Text(String),
    /// An already-decoded JSON value of unknown shape.
    Json(Value),
    /// The oracle could not be reached.
    Unavailable,
}

impl UnverifiedGuess {
    /// Validate the guess field by field. Never fails.
    pub fn validate(&self) -> OracleGuess {
        match self {
            UnverifiedGuess::Text(text) => match serde_json::from_str::<Value>(strip_code_fence(text)) {
                Ok(value) => OracleGuess::from_value(&value),
                Err(e) => {
                    tracing::warn!("oracle reply is not valid JSON: {}", e);
                    OracleGuess::neutral()
                }
            },
            UnverifiedGuess::Json(value) => OracleGuess::from_value(value),
            UnverifiedGuess::Unavailable => OracleGuess::neutral(),
        }
    }
}

impl From<&str> for UnverifiedGuess {
    fn from(text: &str) -> Self {
        UnverifiedGuess::Text(text.to_string())
    }
}

impl From<String> for UnverifiedGuess {
    fn from(text: String) -> Self {
        UnverifiedGuess::Text(text)
    }
}

impl From<Value> for UnverifiedGuess {
    fn from(value: Value) -> Self {
        UnverifiedGuess::Json(value)
    }
}

/// Models sometimes wrap JSON in a Markdown fence despite being asked not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line.
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

// ---------------------------------------------------------------------------
// ListingPriceHint — The oracle's idea of the asking price
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ListingPriceHint {
    Number(f64),
    Text(String),
    Missing,
}

// ---------------------------------------------------------------------------
// OracleGuess — Validated oracle output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct OracleGuess {
    pub is_gaming_pc: bool,
    pub listing_price: ListingPriceHint,
    pub parts: Vec<RawPart>,
    pub verdict: Option<String>,
    pub reasoning: String,
}

impl OracleGuess {
    /// Stand-in for output that could not be understood: no parts, zero price, PASS.
    pub fn neutral() -> Self {
        Self {
            is_gaming_pc: false,
            listing_price: ListingPriceHint::Number(0.0),
            parts: Vec::new(),
            verdict: Some("PASS".to_string()),
            reasoning: config::UNPARSEABLE_REASONING.to_string(),
        }
    }

    fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            tracing::warn!("oracle reply is JSON but not an object");
            return Self::neutral();
        };

        let listing_price = match map.get("listing_price") {
            Some(Value::Number(n)) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(ListingPriceHint::Number)
                .unwrap_or(ListingPriceHint::Missing),
            Some(Value::String(s)) => ListingPriceHint::Text(s.clone()),
            _ => ListingPriceHint::Missing,
        };

        let parts = match map.get("parts") {
            Some(Value::Array(items)) => items.iter().filter_map(part_from_value).collect(),
            _ => Vec::new(),
        };

        Self {
            is_gaming_pc: map.get("is_gaming_pc").and_then(Value::as_bool).unwrap_or(false),
            listing_price,
            parts,
            verdict: string_field(map, "verdict"),
            reasoning: string_field(map, "reasoning").unwrap_or_default(),
        }
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(|s| s.to_string())
}

/// Parts without a usable component label are dropped.
fn part_from_value(value: &Value) -> Option<RawPart> {
    let map = value.as_object()?;
    let component = map.get("component").and_then(Value::as_str)?.trim();
    if component.is_empty() {
        return None;
    }

    let estimated_price = match map.get("estimated_price") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => currency::parse_price(s),
        _ => 0.0,
    };
    let estimated_price = if estimated_price.is_finite() && estimated_price > 0.0 {
        estimated_price
    } else {
        0.0
    };

    let notes = string_field(map, "notes").filter(|n| !n.trim().is_empty());

    Some(RawPart {
        component: component.to_string(),
        estimated_price,
        notes,
    })
}
