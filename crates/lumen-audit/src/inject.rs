//! Getting the axe engine into the page exactly once.
//!
//! The guard checks the page first and only reads `axe.min.js` from disk
//! when the engine global is missing. There is no retry: a failed load or
//! evaluation is returned to the caller as-is.

use crate::engine::ScanEngine;
use crate::error::{AuditError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where `axe-core` publishes its bundled script, relative to a project root.
pub const DEFAULT_SCRIPT_PATH: &str = "node_modules/axe-core/axe.min.js";

/// Supplies the engine's source text.
#[async_trait]
pub trait ScriptSource: Send + Sync {
    /// Read the full engine source.
    async fn load(&self) -> Result<String>;
}

/// Reads `axe.min.js` from the filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileScriptSource {
    path: Option<PathBuf>,
}

impl FileScriptSource {
    /// Use an explicit script path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Locate the script under `node_modules` at load time.
    #[must_use]
    pub fn discover() -> Self {
        Self::default()
    }

    /// Resolve the path that [`ScriptSource::load`] will read.
    ///
    /// An explicit path wins. Otherwise walk up from the current directory
    /// looking for `node_modules/axe-core/axe.min.js`, and fall back to that
    /// path relative to the working directory.
    #[must_use]
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }

        match std::env::current_dir() {
            Ok(dir) => find_upwards(&dir).unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT_PATH)),
            Err(_) => PathBuf::from(DEFAULT_SCRIPT_PATH),
        }
    }
}

/// Search `start` and each of its ancestors for the published engine script.
fn find_upwards(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(DEFAULT_SCRIPT_PATH))
        .find(|candidate| candidate.is_file())
}

#[async_trait]
impl ScriptSource for FileScriptSource {
    async fn load(&self) -> Result<String> {
        let path = self.resolve();
        debug!(path = %path.display(), "reading axe engine script");

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| AuditError::ResourceNotFound { path, source })
    }
}

/// Make sure the engine global exists in the page.
///
/// Returns `Ok(true)` when the script was evaluated, `Ok(false)` when the
/// engine was already present and nothing was read.
pub async fn ensure_injected<E, S>(engine: &E, source: &S) -> Result<bool>
where
    E: ScanEngine + ?Sized,
    S: ScriptSource + ?Sized,
{
    if engine.is_injected().await? {
        debug!("axe already present in page, skipping injection");
        return Ok(false);
    }

    let script = source.load().await?;
    engine.inject(&script).await?;
    debug!(bytes = script.len(), "injected axe engine");
    Ok(true)
}
