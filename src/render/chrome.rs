//! Headless Chrome renderer.
//!
//! Writes the document into a scratch directory, loads it in a headless
//! browser over the DevTools protocol and screenshots only the card element.

use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions};
use tracing::{debug, info};

use super::{CardRenderer, is_png};
use crate::cards::CARD_ELEMENT_ID;
use crate::config::RenderConfig;
use crate::error::RenderError;

/// Renders HTML through a Chrome binary and captures one element.
pub struct ChromeRenderer {
    config: RenderConfig,
    selector: String,
}

/// Everything a single capture needs, moved onto a blocking thread.
struct Capture {
    binary: String,
    page_url: String,
    selector: String,
    options: LaunchOptions<'static>,
    window_size: (u32, u32),
    timeout: Duration,
}

impl ChromeRenderer {
    /// Capture the `bingocard` element.
    pub fn new(config: RenderConfig) -> Self {
        Self::for_element(config, CARD_ELEMENT_ID)
    }

    /// Capture the element with the given id.
    pub fn for_element(config: RenderConfig, element_id: &str) -> Self {
        Self {
            config,
            selector: format!("#{element_id}"),
        }
    }

    /// CSS selector of the captured element.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    fn capture(&self, html_path: &Path) -> Result<Capture, RenderError> {
        let binary = self.config.chrome_bin.display().to_string();
        let options = LaunchOptions::default_builder()
            .path(Some(self.config.chrome_bin.clone()))
            .headless(true)
            .sandbox(false)
            .window_size(Some(self.config.window_size))
            .idle_browser_timeout(self.config.timeout)
            .args(vec![OsStr::new("--disable-dev-shm-usage"), OsStr::new("--hide-scrollbars")])
            .build()
            .map_err(|e| RenderError::Launch {
                binary: binary.clone(),
                reason: e.to_string(),
            })?;

        Ok(Capture {
            binary,
            page_url: format!("file://{}", html_path.display()),
            selector: self.selector.clone(),
            options,
            window_size: self.config.window_size,
            timeout: self.config.timeout,
        })
    }
}

impl Capture {
    /// Blocking: launches the browser, loads the page, screenshots the element.
    fn run(self) -> Result<Vec<u8>, RenderError> {
        let browser = Browser::new(self.options).map_err(|e| RenderError::Launch {
            binary: self.binary.clone(),
            reason: e.to_string(),
        })?;
        let browser_err = |e: anyhow::Error| RenderError::Browser(e.to_string());

        let tab = browser.new_tab().map_err(browser_err)?;
        tab.set_default_timeout(self.timeout);
        tab.navigate_to(&self.page_url)
            .and_then(|t| t.wait_until_navigated())
            .map_err(browser_err)?;

        let element = tab
            .wait_for_element(&self.selector)
            .map_err(|e| RenderError::ElementNotFound {
                selector: self.selector.clone(),
                reason: e.to_string(),
            })?;

        // An element larger than the window would come back clipped.
        let model = element.get_box_model().map_err(browser_err)?;
        let (w, h) = self.window_size;
        if model.width > f64::from(w) || model.height > f64::from(h) {
            return Err(RenderError::ElementTooLarge {
                width: model.width.ceil() as u32,
                height: model.height.ceil() as u32,
                window: self.window_size,
            });
        }

        element
            .capture_screenshot(CaptureScreenshotFormatOption::Png)
            .map_err(browser_err)
    }
}

#[async_trait]
impl CardRenderer for ChromeRenderer {
    async fn render_png(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let scratch = tempfile::tempdir()?;
        let html_path = scratch.path().join("card.html");
        tokio::fs::write(&html_path, html).await?;

        let capture = self.capture(&html_path)?;
        debug!(
            binary = %capture.binary,
            selector = %capture.selector,
            "Launching headless browser"
        );

        // Browser startup plus navigation, so allow twice the per-step timeout.
        let png = tokio::time::timeout(
            self.config.timeout * 2,
            tokio::task::spawn_blocking(move || capture.run()),
        )
        .await
        .map_err(|_| RenderError::Timeout(self.config.timeout * 2))?
        .map_err(|e| RenderError::Browser(e.to_string()))??;

        if !is_png(&png) {
            return Err(RenderError::InvalidOutput(format!(
                "{} bytes without PNG signature",
                png.len()
            )));
        }

        info!(bytes = png.len(), "Rendered bingo card");
        Ok(png)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config(bin: &str) -> RenderConfig {
        RenderConfig {
            chrome_bin: PathBuf::from(bin),
            window_size: (640, 480),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn captures_the_card_element_by_default() {
        let r = ChromeRenderer::new(config("chromium"));
        assert_eq!(r.selector(), "#bingocard");

        let capture = r.capture(Path::new("/tmp/x/card.html")).unwrap();
        assert_eq!(capture.selector, format!("#{CARD_ELEMENT_ID}"));
        assert_eq!(capture.page_url, "file:///tmp/x/card.html");
        assert_eq!(capture.window_size, (640, 480));
        assert_eq!(capture.binary, "chromium");
    }

    #[test]
    fn other_elements_can_be_targeted() {
        let r = ChromeRenderer::for_element(config("chromium"), "sheet");
        assert_eq!(r.selector(), "#sheet");
    }

    #[tokio::test]
    async fn missing_binary_is_a_launch_error() {
        let r = ChromeRenderer::new(config("/nonexistent/bingo-chrome"));
        let err = r.render_png("<html></html>").await.unwrap_err();
        assert!(matches!(err, RenderError::Launch { .. }));
    }
}
