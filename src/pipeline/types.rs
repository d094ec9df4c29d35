//! Shared types for webhook processing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// GroupMe callback payload.
///
/// Only the fields the bot reads are modelled; everything else in the
/// callback is ignored. Missing, null or oddly typed fields fall back to
/// empty values instead of rejecting the whole callback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Message body.
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
    /// GroupMe user id of the sender.
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender_id: String,
    /// Unix timestamp (seconds) the message was created.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<i64>,
}

/// Strings pass through, numbers and booleans are stringified, anything else is empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Integer, float (floored) or numeric string seconds; anything else is `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(float_secs)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_secs))
        }
        _ => None,
    })
}

fn float_secs(secs: f64) -> Option<i64> {
    if secs.is_finite() && secs.abs() < i64::MAX as f64 {
        Some(secs.floor() as i64)
    } else {
        None
    }
}

impl InboundMessage {
    /// Creation time as UTC, if present and representable.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Trimmed, lowercased text used for all matching.
    pub fn normalized_text(&self) -> String {
        normalize(&self.text)
    }
}

/// Trim and lowercase.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// What an inbound message is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Bingo,
    Link,
    Keeper,
    NoMatch,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bingo => "bingo",
            Self::Link => "link",
            Self::Keeper => "keeper",
            Self::NoMatch => "no_match",
        }
    }
}

/// Result of handling a request successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A card image was posted.
    Photo,
    /// A link response was posted.
    Link,
    /// The keepers response was posted.
    Keepers,
    /// Nothing matched.
    Ignored,
}

impl Outcome {
    /// Plain-text response returned to the webhook caller.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Photo => "Success: photo!",
            Self::Link => "Success: link!",
            Self::Keepers => "Success: keepers!",
            Self::Ignored => "No data to process.",
        }
    }
}
