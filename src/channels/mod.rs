//! Chat channel abstraction for outbound posts.

pub mod groupme;

use async_trait::async_trait;

use crate::error::ChannelError;

pub use groupme::{GroupMeChannel, HTTP_TIMEOUT};

/// Outbound side of a group chat.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Upload a PNG and return its hosted URL.
    async fn upload_image(&self, png: Vec<u8>) -> Result<String, ChannelError>;

    /// Post `text` (and optionally an image) to the chat.
    ///
    /// `what` names the post in the error message ("image", "link response").
    async fn post_message(
        &self,
        text: &str,
        picture_url: Option<&str>,
        what: &'static str,
    ) -> Result<(), ChannelError>;
}
