//! Request classifier.
//!
//! Rules are checked in a fixed order and the first match wins:
//! 1. bingo call phrase (exact, case/whitespace-insensitive)
//! 2. keeper call phrase (exact, case/whitespace-insensitive)
//! 3. link request (sender + local weekday + call word contained in text)

use chrono::Datelike;
use tracing::debug;

use crate::config::TriggerConfig;
use crate::pipeline::types::{Classification, InboundMessage, normalize};

/// Classifies inbound messages against the configured triggers.
#[derive(Debug, Clone)]
pub struct RulesEngine {
    call_phrase: String,
    keeper_call_phrase: Option<String>,
    triggers: TriggerConfig,
}

impl RulesEngine {
    pub fn new(triggers: TriggerConfig) -> Self {
        Self {
            call_phrase: normalize(&triggers.call_phrase),
            keeper_call_phrase: triggers.keeper_call_phrase.as_deref().map(normalize),
            triggers,
        }
    }

    /// Decide what the message is asking for.
    pub fn evaluate(&self, message: &InboundMessage) -> Classification {
        let text = message.normalized_text();

        if text == self.call_phrase {
            return Classification::Bingo;
        }

        if self.keeper_call_phrase.as_deref() == Some(text.as_str()) {
            return Classification::Keeper;
        }

        if self.is_link_request(message, &text) {
            return Classification::Link;
        }

        Classification::NoMatch
    }

    fn is_link_request(&self, message: &InboundMessage, text: &str) -> bool {
        if message.sender_id != self.triggers.link_user_id {
            return false;
        }

        let Some(created) = message.created_at_utc() else {
            debug!("Message has no usable created_at, skipping link check");
            return false;
        };
        let weekday = created.with_timezone(&self.triggers.timezone).weekday();
        debug!(
            weekday = %weekday,
            target = %self.triggers.link_weekday,
            "Checking link request weekday"
        );
        if weekday != self.triggers.link_weekday {
            return false;
        }

        self.triggers
            .link_callwords
            .iter()
            .any(|word| text.contains(word.as_str()))
    }
}
