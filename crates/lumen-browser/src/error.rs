use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("script evaluation failed: {0}")]
    ScriptError(String),

    #[error("timeout: {0}")]
    Timeout(String),
}

impl From<BrowserError> for lumen_core::LumenError {
    fn from(err: BrowserError) -> Self {
        Self::Browser(err.to_string())
    }
}
