//! Message processor: classifies inbound messages and runs the matching action.
//!
//! Flow:
//! 1. Rules engine → classification
//! 2. Bingo: generate card → render PNG → upload → post
//! 3. Link: post a random link response
//! 4. Keeper: post the keepers response

use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{error, info};

use crate::cards::{BingoCard, card_document, terms};
use crate::channels::{ChatApi, GroupMeChannel, HTTP_TIMEOUT};
use crate::config::BotConfig;
use crate::error::{ChannelError, PipelineError};
use crate::pipeline::rules::RulesEngine;
use crate::pipeline::types::{Classification, InboundMessage, Outcome};
use crate::render::{CardRenderer, ChromeRenderer};

/// Caption posted with every card.
pub const CARD_CAPTION: &str = "Here's your bingo card!";

/// Everything the processor needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct ProcessorSettings {
    pub terms: Vec<String>,
    pub free_space: String,
    pub link_responses: Vec<String>,
    pub keeper_response: String,
}

/// Handles one webhook at a time; holds no per-request state.
pub struct MessageProcessor {
    rules: RulesEngine,
    settings: ProcessorSettings,
    renderer: Arc<dyn CardRenderer>,
    chat: Arc<dyn ChatApi>,
}

impl MessageProcessor {
    pub fn new(
        rules: RulesEngine,
        settings: ProcessorSettings,
        renderer: Arc<dyn CardRenderer>,
        chat: Arc<dyn ChatApi>,
    ) -> Self {
        Self {
            rules,
            settings,
            renderer,
            chat,
        }
    }

    /// Wire up the production collaborators from configuration.
    ///
    /// Loads the term list once; it is not re-read per request.
    pub fn from_config(config: &BotConfig) -> crate::error::Result<Self> {
        let terms = terms::load(&config.term_source)?;

        let settings = ProcessorSettings {
            terms,
            free_space: config.free_space.clone(),
            link_responses: config.link_responses.clone(),
            keeper_response: config.keeper_response.clone(),
        };

        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ChannelError::Client {
                reason: e.to_string(),
            })?;

        Ok(Self::new(
            RulesEngine::new(config.triggers.clone()),
            settings,
            Arc::new(ChromeRenderer::new(config.render.clone())),
            Arc::new(GroupMeChannel::with_client(config.groupme.clone(), client)),
        ))
    }

    /// Classify a webhook message and act on it.
    pub async fn process(&self, message: &InboundMessage) -> Result<Outcome, PipelineError> {
        let classification = self.rules.evaluate(message);
        info!(
            sender = %message.sender_id,
            created_at = ?message.created_at,
            classification = classification.label(),
            "Processing inbound message"
        );

        let result = match classification {
            Classification::Bingo => self.send_card().await,
            Classification::Link => self.send_link().await,
            Classification::Keeper => self.send_keepers().await,
            Classification::NoMatch => Ok(Outcome::Ignored),
        };

        if let Err(e) = &result {
            error!(
                classification = classification.label(),
                error = %e,
                cause = %failure_cause(e),
                "Failed to handle message"
            );
        }
        result
    }

    /// Build the HTML for a fresh card.
    pub fn card_html(&self) -> Result<String, PipelineError> {
        let mut rng = rand::thread_rng();
        let card = BingoCard::generate(&self.settings.terms, &self.settings.free_space, &mut rng)?;
        Ok(card_document(&card))
    }

    /// Generate, render, upload and post a card.
    pub async fn send_card(&self) -> Result<Outcome, PipelineError> {
        let html = self.card_html()?;
        let png = self.renderer.render_png(&html).await?;
        let url = self.chat.upload_image(png).await?;
        self.chat
            .post_message(CARD_CAPTION, Some(&url), "image")
            .await?;
        Ok(Outcome::Photo)
    }

    async fn send_link(&self) -> Result<Outcome, PipelineError> {
        let text = self
            .settings
            .link_responses
            .choose(&mut rand::thread_rng())
            .ok_or(PipelineError::NoLinkResponses)?;
        self.chat.post_message(text, None, "link response").await?;
        Ok(Outcome::Link)
    }

    async fn send_keepers(&self) -> Result<Outcome, PipelineError> {
        if self.settings.keeper_response.trim().is_empty() {
            return Err(PipelineError::NoKeeperResponse);
        }
        self.chat
            .post_message(&self.settings.keeper_response, None, "keepers response")
            .await?;
        Ok(Outcome::Keepers)
    }
}

/// Log detail for a failure whose `Display` text is kept generic.
fn failure_cause(e: &PipelineError) -> String {
    match e {
        PipelineError::Channel(c) => c.reason().to_string(),
        PipelineError::Card(c) => c.to_string(),
        PipelineError::Render(r) => r.to_string(),
        PipelineError::NoLinkResponses => "LINK_RESPONSE_TEXT is empty".to_string(),
        PipelineError::NoKeeperResponse => "KEEPER_RESPONSE_TEXT is empty".to_string(),
    }
}
