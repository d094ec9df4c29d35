//! Rasterizing card HTML into PNG images.

pub mod chrome;

use async_trait::async_trait;

use crate::error::RenderError;

pub use chrome::ChromeRenderer;

/// PNG file signature.
pub const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Turns an HTML document into a PNG screenshot.
#[async_trait]
pub trait CardRenderer: Send + Sync {
    /// Render `html` and return the PNG bytes.
    async fn render_png(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Check that `bytes` start with the PNG signature.
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(PNG_SIGNATURE)
}
