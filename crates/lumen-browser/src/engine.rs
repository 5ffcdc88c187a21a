use crate::actions::{parse_url, BrowserActions};
use crate::error::{BrowserError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig as ChromiumConfig};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use futures_util::stream::StreamExt;
use lumen_core::BrowserConfig;
use std::time::Duration;

/// Browser automation engine
pub struct BrowserEngine {
    browser: Browser,
    navigation_timeout: Duration,
}

impl BrowserEngine {
    /// Create a new browser engine with default configuration
    pub async fn new() -> Result<Self> {
        Self::with_config(&BrowserConfig::default()).await
    }

    /// Create a new browser engine from browser settings
    pub async fn with_config(settings: &BrowserConfig) -> Result<Self> {
        let mut builder = ChromiumConfig::builder()
            .no_sandbox()
            .window_size(settings.window_width, settings.window_height);
        if !settings.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Spawn browser handler
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {}", e);
                }
            }
        });

        tracing::debug!(
            headless = settings.headless,
            width = settings.window_width,
            height = settings.window_height,
            "launched chromium"
        );

        Ok(Self {
            browser,
            navigation_timeout: Duration::from_secs(settings.navigation_timeout_secs),
        })
    }

    /// Open a new tab and navigate it to `url`.
    pub async fn open(&self, url: &str) -> Result<BrowserPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let page = BrowserPage {
            page,
            navigation_timeout: self.navigation_timeout,
        };
        page.navigate(url).await?;
        Ok(page)
    }

    /// Shut the browser down.
    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(())
    }
}

/// A single tab driven over the DevTools protocol.
pub struct BrowserPage {
    page: Page,
    navigation_timeout: Duration,
}

impl BrowserPage {
    /// Access the underlying chromiumoxide page.
    pub fn inner(&self) -> &Page {
        &self.page
    }
}

#[async_trait::async_trait]
impl BrowserActions for BrowserPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        let target = parse_url(url)?;

        let navigation = async {
            self.page
                .goto(target.as_str())
                .await
                .map_err(|e| BrowserError::NavigationError(e.to_string()))?
                .wait_for_navigation()
                .await
                .map_err(|e| BrowserError::NavigationError(e.to_string()))?;
            Ok::<(), BrowserError>(())
        };

        tokio::time::timeout(self.navigation_timeout, navigation)
            .await
            .map_err(|_| {
                BrowserError::Timeout(format!(
                    "navigation to {} exceeded {:?}",
                    target, self.navigation_timeout
                ))
            })??;

        tracing::debug!(url = %target, "navigated");
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let params = EvaluateParams::builder()
            .expression(script)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(BrowserError::ScriptError)?;

        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?;

        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }
}
