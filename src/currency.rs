//! Locale-tolerant price parsing.
//!
//! French listings write prices like `1 000,50 €`, often with a non-breaking or
//! narrow non-breaking space as the thousands separator. Parsing never fails:
//! anything that does not contain a number is worth `0.0`.

use std::sync::LazyLock;

use regex::Regex;

/// First number in a cleaned string: digits, at most one point, more digits.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+\.?[0-9]*").expect("valid number regex")
});

/// A number written next to a euro marker, either `450 €` / `450 euros` or `€450`.
static EURO_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<suffixed>(?:[0-9]{1,3}(?:[ \x{00A0}\x{202F}\x{2009}][0-9]{3})+|[0-9]+)(?:[.,][0-9]{1,2})?)\s*(?:€|eur(?:os?)?\b)|€\s*(?P<prefixed>(?:[0-9]{1,3}(?:[ \x{00A0}\x{202F}\x{2009}][0-9]{3})+|[0-9]+)(?:[.,][0-9]{1,2})?)",
    )
    .expect("valid euro amount regex")
});

/// Parse a currency string such as `"1\u{00A0}000,50 €"` into `1000.5`.
///
/// Space-like separators and all whitespace are removed, the comma is read as
/// the decimal separator, and the first decimal number left is returned.
pub fn parse_price(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .map(|c| match c {
            '\u{00A0}' | '\u{202F}' | '\u{2009}' => ' ',
            ',' => '.',
            other => other,
        })
        .filter(|c| !c.is_whitespace())
        .collect();

    NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Scan free text for the first positive euro amount.
///
/// Returns `0.0` when the text mentions no priced amount.
pub fn find_price_in_text(text: &str) -> f64 {
    EURO_AMOUNT
        .captures_iter(text)
        .filter_map(|caps| caps.name("suffixed").or_else(|| caps.name("prefixed")))
        .map(|m| parse_price(m.as_str()))
        .find(|price| *price > 0.0)
        .unwrap_or(0.0)
}

/// Round to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
