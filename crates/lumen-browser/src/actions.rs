use crate::error::{BrowserError, Result};

/// Page primitives an audit drives.
#[async_trait::async_trait]
pub trait BrowserActions: Send + Sync {
    /// Navigate to a URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Evaluate a script in the page's global scope.
    ///
    /// Returned promises are awaited and the settled value is returned by
    /// value. `undefined` and non-serializable results come back as `Null`.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;
}

/// Validate a navigation target.
///
/// Only absolute `http`, `https`, `file` and `data` URLs are accepted.
pub fn parse_url(url: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" | "file" | "data" => Ok(parsed),
        other => Err(BrowserError::NavigationError(format!(
            "Unsupported URL scheme: {}",
            other
        ))),
    }
}
