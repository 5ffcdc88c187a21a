//! The contract with the in-page axe engine.
//!
//! The engine lives in the page's global scope as `window.axe`. The audit
//! core only reaches it through [`ScanEngine`], so tests can substitute a
//! stub for a real browser.

use crate::context::ScanContext;
use crate::error::{AuditError, Result};
use crate::result::ScanResult;
use async_trait::async_trait;
use lumen_browser::{BrowserActions, BrowserError};
use serde_json::Value;

/// Checks that `window.axe` exposes callable `run` and `configure`.
const IS_INJECTED_SCRIPT: &str = "(function () { \
    var axe = window.axe; \
    return !!axe && typeof axe.run === 'function' && typeof axe.configure === 'function'; \
})()";

/// The engine's global entry points.
#[async_trait]
pub trait ScanEngine: Send + Sync {
    /// Whether the engine global is present and callable.
    async fn is_injected(&self) -> Result<bool>;

    /// Evaluate the engine source in the page's global scope.
    async fn inject(&self, source: &str) -> Result<()>;

    /// Run a scan over `context`, or the whole document when `None`.
    async fn run(&self, context: Option<&ScanContext>, options: &Value) -> Result<ScanResult>;

    /// Apply global engine configuration (custom rules, checks, branding).
    async fn configure(&self, spec: &Value) -> Result<()>;
}

/// [`ScanEngine`] backed by script evaluation in a live page.
pub struct PageEngine<B> {
    page: B,
}

impl<B: BrowserActions> PageEngine<B> {
    /// Wrap a page that will host the engine.
    pub fn new(page: B) -> Self {
        Self { page }
    }

    /// The wrapped page.
    pub fn page(&self) -> &B {
        &self.page
    }

    /// Unwrap the page.
    pub fn into_inner(self) -> B {
        self.page
    }
}

/// Render the `axe.run` call. Without a context the whole document is scanned.
fn run_script(context: Option<&ScanContext>, options: &Value) -> Result<String> {
    let context = match context {
        Some(ctx) => serde_json::to_string(ctx).map_err(encode_error)?,
        None => "document".to_string(),
    };
    let options = serde_json::to_string(options).map_err(encode_error)?;
    Ok(format!("window.axe.run({context}, {options})"))
}

fn configure_script(spec: &Value) -> Result<String> {
    let spec = serde_json::to_string(spec).map_err(encode_error)?;
    Ok(format!("void window.axe.configure({spec})"))
}

fn encode_error(e: serde_json::Error) -> AuditError {
    AuditError::EngineRuntime(format!("could not encode engine arguments: {e}"))
}

fn engine_failure(e: BrowserError) -> AuditError {
    match e {
        BrowserError::ScriptError(msg) => AuditError::EngineRuntime(msg),
        other => AuditError::Browser(other),
    }
}

#[async_trait]
impl<B: BrowserActions> ScanEngine for PageEngine<B> {
    async fn is_injected(&self) -> Result<bool> {
        let present = self.page.evaluate(IS_INJECTED_SCRIPT).await?;
        Ok(present.as_bool().unwrap_or(false))
    }

    async fn inject(&self, source: &str) -> Result<()> {
        // Only the global the bundle defines matters, not its completion value.
        self.page.evaluate(source).await?;
        Ok(())
    }

    async fn run(&self, context: Option<&ScanContext>, options: &Value) -> Result<ScanResult> {
        let script = run_script(context, options)?;
        let raw = self.page.evaluate(&script).await.map_err(engine_failure)?;
        Ok(ScanResult::new(raw))
    }

    async fn configure(&self, spec: &Value) -> Result<()> {
        let script = configure_script(spec)?;
        self.page.evaluate(&script).await.map_err(engine_failure)?;
        Ok(())
    }
}
