//! GroupMe channel: image service upload and bot posts.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::ChatApi;
use crate::config::GroupMeConfig;
use crate::error::ChannelError;

/// Request timeout for the GroupMe HTTP client built at startup.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of `POST /v3/bots/post`.
#[derive(Debug, Serialize)]
struct BotPost<'a> {
    bot_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    picture_url: Option<&'a str>,
}

/// Response of `POST /pictures`.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    payload: UploadPayload,
}

#[derive(Debug, Deserialize)]
struct UploadPayload {
    picture_url: String,
}

/// GroupMe bot client.
pub struct GroupMeChannel {
    access_token: SecretString,
    bot_id: String,
    api_url: String,
    image_url: String,
    client: reqwest::Client,
}

impl GroupMeChannel {
    pub fn new(config: GroupMeConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Build with an existing HTTP client.
    pub fn with_client(config: GroupMeConfig, client: reqwest::Client) -> Self {
        Self {
            access_token: config.access_token,
            bot_id: config.bot_id,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            image_url: config.image_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn post_url(&self) -> String {
        format!("{}/v3/bots/post", self.api_url)
    }

    fn upload_url(&self) -> String {
        format!("{}/pictures", self.image_url)
    }
}

#[async_trait]
impl ChatApi for GroupMeChannel {
    async fn upload_image(&self, png: Vec<u8>) -> Result<String, ChannelError> {
        let resp = self
            .client
            .post(self.upload_url())
            .header("X-Access-Token", self.access_token.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, "image/png")
            .body(png)
            .send()
            .await
            .map_err(|e| ChannelError::Upload {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "GroupMe image upload failed");
            return Err(ChannelError::Upload {
                reason: format!("HTTP {status}: {body}"),
            });
        }

        let parsed: UploadResponse =
            resp.json()
                .await
                .map_err(|e| ChannelError::InvalidResponse {
                    endpoint: self.upload_url(),
                    reason: e.to_string(),
                })?;

        info!(url = %parsed.payload.picture_url, "Uploaded bingo card image");
        Ok(parsed.payload.picture_url)
    }

    async fn post_message(
        &self,
        text: &str,
        picture_url: Option<&str>,
        what: &'static str,
    ) -> Result<(), ChannelError> {
        let body = BotPost {
            bot_id: &self.bot_id,
            text,
            picture_url,
        };

        let resp = self
            .client
            .post(self.post_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::Post {
                what,
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let err = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %err, what, "GroupMe bot post failed");
            return Err(ChannelError::Post {
                what,
                reason: format!("HTTP {status}: {err}"),
            });
        }

        info!(what, "Posted to GroupMe");
        Ok(())
    }
}
