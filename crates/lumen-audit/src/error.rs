use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("axe engine script not found at {}: {source}", .path.display())]
    ResourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("axe engine failed: {0}")]
    EngineRuntime(String),

    #[error("Browser error: {0}")]
    Browser(#[from] lumen_browser::BrowserError),
}

pub type Result<T> = std::result::Result<T, AuditError>;

impl From<AuditError> for lumen_core::LumenError {
    fn from(err: AuditError) -> Self {
        match err {
            AuditError::Browser(e) => e.into(),
            other => Self::Audit(other.to_string()),
        }
    }
}
