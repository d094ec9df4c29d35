//! Error types for the bingo bot.

use std::time::Duration;

/// Top-level error type for the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Card error: {0}")]
    Card(#[from] CardError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to read term file {path}: {source}")]
    TermFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Bingo card construction errors.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("Not enough terms for a bingo card: need {needed}, got {got}")]
    NotEnoughTerms { needed: usize, got: usize },
}

/// Headless browser rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to launch browser {binary}: {reason}")]
    Launch { binary: String, reason: String },

    #[error("Browser session failed: {0}")]
    Browser(String),

    #[error("Element {selector} not found: {reason}")]
    ElementNotFound { selector: String, reason: String },

    #[error("Element is {width}x{height}, larger than the {window:?} window")]
    ElementTooLarge {
        width: u32,
        height: u32,
        window: (u32, u32),
    },

    #[error("Browser timed out after {0:?}")]
    Timeout(Duration),

    #[error("Browser produced no usable PNG: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Chat API errors.
///
/// The `Display` text of `Upload` and `Post` is what the webhook caller sees,
/// so it stays generic; the detail travels in `reason` for the logs.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("There was an error while uploading the image.")]
    Upload { reason: String },

    #[error("There was an error while posting the {what} to chat.")]
    Post { what: &'static str, reason: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
    #[error("Failed to create HTTP client: {reason}")]
    Client { reason: String },
}

impl ChannelError {
    /// Underlying cause, for logging.
    pub fn reason(&self) -> &str {
        match self {
            Self::Upload { reason } | Self::Post { reason, .. } => reason,
            Self::InvalidResponse { reason, .. } | Self::Client { reason } => reason,
        }
    }
}

/// Request handling errors, converted into the plain-text webhook response.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("There was an error while generating the bingo card.")]
    Card(#[from] CardError),

    #[error("There was an error while rendering the bingo card.")]
    Render(#[from] RenderError),

    #[error("There was an error while choosing a link response.")]
    NoLinkResponses,

    #[error("There was an error while preparing the keepers response.")]
    NoKeeperResponse,

    #[error("{0}")]
    Channel(#[from] ChannelError),
}

impl PipelineError {
    /// Whether the failure happened in an external collaborator (browser or chat API).
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Render(_) | Self::Channel(_))
    }
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
