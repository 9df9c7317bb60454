//! The AI appraisal oracle.
//!
//! An [`Oracle`] reads a listing and answers with an [`UnverifiedGuess`]. The
//! answer is never trusted; the reconciliation engine validates it.
//! [`OpenAiOracle`] talks to an OpenAI-compatible chat-completions endpoint
//! over blocking HTTP.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};

use crate::config;
use crate::currency;
use crate::error::{AppraisalError, Result};
use crate::models::{ListingInput, UnverifiedGuess};

/// Anything that can produce an appraisal guess for a listing.
pub trait Oracle {
    fn appraise(&self, listing: &ListingInput) -> Result<UnverifiedGuess>;
}

/// Build the reseller appraisal prompt for a listing.
pub fn build_prompt(listing: &ListingInput) -> String {
    let listing_price = currency::parse_price(&listing.price_str);
    let price_field = if listing_price > 0.0 {
        listing_price.to_string()
    } else {
        "\"number found in text\"".to_string()
    };

    format!(
        r#"You are an expert PC hardware reseller in France.
Analyze the text from this Leboncoin listing.

Listing Title: {title}
Listing Price (extracted): {listing_price} EUR (If 0, try to find it in the text).

Task:
1. Identify the specific PC components (CPU, GPU, RAM, SSD/HDD, Motherboard, PSU).
2. Estimate the current USED market price in France (in EUR) for each part separately. Be CONSERVATIVE (undervalue slightly).
3. Ignore peripherals (keyboard/mouse) unless they are high-end.
4. CRITICAL: Value "Cases", "Fans", and "PSUs" at 0 EUR unless they are clearly high-end brands (Corsair, Seasonic, Lian Li, etc) AND models. Standard/Generic = 0.
5. If the description mentions "HS", "H.S", "Panne", "Broken", "Pour pièces", set verdict to "TRASH".

Return ONLY valid JSON with this structure:
{{
    "is_gaming_pc": boolean,
    "listing_price": {price_field},
    "parts": [
        {{ "component": "Name (e.g. RTX 3060)", "estimated_price": 150, "notes": "optional" }}
    ],
    "verdict": "BUY" or "PASS" or "TRASH",
    "reasoning": "Short explanation of the verdict"
}}

Logic for Verdict:
- TRASH if broken/HS.
- BUY if (Total Estimated - Listing Price) / Listing Price > 0.50 (50% margin).
- PASS otherwise.

Listing Text:
{raw_text}
"#,
        title = listing.title,
        listing_price = listing_price,
        price_field = price_field,
        raw_text = listing.raw_text,
    )
}

/// Pull `choices[0].message.content` out of a chat-completions response.
pub fn reply_content(response: &Value) -> Result<String> {
    response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(|s| s.to_string())
        .ok_or_else(|| AppraisalError::Oracle("response has no message content".into()))
}

// ---------------------------------------------------------------------------
// OpenAiOracleBuilder
// ---------------------------------------------------------------------------

/// Builder for [`OpenAiOracle`].
pub struct OpenAiOracleBuilder {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl Default for OpenAiOracleBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            model: config::DEFAULT_ORACLE_MODEL.to_string(),
            base_url: config::OPENAI_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl OpenAiOracleBuilder {
    /// Set the API key. Defaults to the `OPENAI_API_KEY` environment variable.
    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    /// Set the model name. Defaults to `gpt-4o`.
    pub fn model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Point the client at another OpenAI-compatible endpoint.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the HTTP request timeout. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenAiOracle> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => std::env::var(config::OPENAI_API_KEY_ENV).map_err(|_| {
                AppraisalError::InvalidArgument(format!(
                    "no API key given and {} is not set",
                    config::OPENAI_API_KEY_ENV
                ))
            })?,
        };
        let client = Client::builder().timeout(self.timeout).build()?;
        Ok(OpenAiOracle {
            client,
            api_key,
            model: self.model,
            base_url: self.base_url,
        })
    }
}

// ---------------------------------------------------------------------------
// OpenAiOracle
// ---------------------------------------------------------------------------

/// Oracle backed by the OpenAI chat-completions API in JSON mode.
pub struct OpenAiOracle {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiOracle {
    pub fn builder() -> OpenAiOracleBuilder {
        OpenAiOracleBuilder::default()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The JSON body sent for a listing.
    pub fn request_body(&self, listing: &ListingInput) -> Value {
        json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "user", "content": build_prompt(listing) }
            ]
        })
    }
}

impl Oracle for OpenAiOracle {
    fn appraise(&self, listing: &ListingInput) -> Result<UnverifiedGuess> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("requesting appraisal from {} ({})", url, self.model);

        let response: Value = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(listing))
            .send()?
            .error_for_status()?
            .json()?;

        Ok(UnverifiedGuess::Text(reply_content(&response)?))
    }
}
