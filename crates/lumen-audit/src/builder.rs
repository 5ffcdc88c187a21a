//! The audit builder.
//!
//! `AxeBuilder` accumulates what to scan and how, then drives the engine in
//! the page through [`AxeBuilder::configure`] and [`AxeBuilder::analyze`].
//! Running a scan never changes the builder.

use crate::context::ScanContext;
use crate::engine::ScanEngine;
use crate::error::Result;
use crate::executor::ScanExecutor;
use crate::inject::{ensure_injected, FileScriptSource, ScriptSource};
use crate::normalize::OneOrMany;
use crate::options::{RetryPolicy, RunOnly, RunOptions};
use crate::result::ScanResult;
use lumen_core::AppConfig;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Chainable configuration for an accessibility scan.
///
/// Mutators take and return the builder so calls can be chained:
///
/// ```rust
/// use lumen_audit::AxeBuilder;
///
/// let builder = AxeBuilder::new()
///     .include("main")
///     .exclude("#ads")
///     .with_tags(["wcag2a", "wcag2aa"])
///     .disable_rules("color-contrast");
///
/// assert_eq!(builder.excludes(), ["#ads"]);
/// ```
#[derive(Clone)]
pub struct AxeBuilder {
    includes: Vec<String>,
    excludes: Vec<String>,
    options: RunOptions,
    script_source: Arc<dyn ScriptSource>,
}

impl AxeBuilder {
    /// Create an empty builder that scans the whole document once.
    #[must_use]
    pub fn new() -> Self {
        Self {
            includes: Vec::new(),
            excludes: Vec::new(),
            options: RunOptions::default(),
            script_source: Arc::new(FileScriptSource::discover()),
        }
    }

    /// Create a builder seeded with the configured retry policy and script path.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let mut builder = Self::new();
        builder.options.set_retry_policy(RetryPolicy {
            retries: config.scanning.retries,
            interval: Duration::from_millis(config.scanning.interval_ms),
        });
        if let Some(path) = &config.engine.script_path {
            builder.script_source = Arc::new(FileScriptSource::new(path));
        }
        builder
    }

    /// Load the engine source from somewhere other than `node_modules`.
    #[must_use]
    pub fn with_script_source(mut self, source: impl ScriptSource + 'static) -> Self {
        self.script_source = Arc::new(source);
        self
    }

    /// Restrict the scan to elements matching `selector`. Empty selectors are ignored.
    #[must_use]
    pub fn include(mut self, selector: impl Into<String>) -> Self {
        let selector = selector.into();
        if !selector.is_empty() {
            self.includes.push(selector);
        }
        self
    }

    /// Skip elements matching `selector`. Empty selectors are ignored.
    #[must_use]
    pub fn exclude(mut self, selector: impl Into<String>) -> Self {
        let selector = selector.into();
        if !selector.is_empty() {
            self.excludes.push(selector);
        }
        self
    }

    /// Merge run options, overwriting keys already set.
    ///
    /// `interval` (ms) and `retries` control rescans and are not sent to the
    /// engine. Anything that isn't a JSON object is ignored.
    #[must_use]
    pub fn options(mut self, opts: Value) -> Self {
        match opts {
            Value::Object(map) => self.options.merge(map),
            other => tracing::debug!(%other, "ignoring non-object run options"),
        }
        self
    }

    /// Only run rules with these tags, replacing any tag or rule filter.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<OneOrMany>) -> Self {
        self.options.set_run_only(RunOnly::Tag(tags.into().into_vec()));
        self
    }

    /// Only run these rules, replacing any tag or rule filter.
    #[must_use]
    pub fn with_rules(mut self, rules: impl Into<OneOrMany>) -> Self {
        self.options.set_run_only(RunOnly::Rule(rules.into().into_vec()));
        self
    }

    /// Disable these rules in addition to any disabled before.
    #[must_use]
    pub fn disable_rules(mut self, rules: impl Into<OneOrMany>) -> Self {
        self.options.disable_rules(rules.into().into_vec());
        self
    }

    /// Accepted for compatibility; has no effect.
    #[must_use]
    pub fn set_legacy_mode(self, _legacy: bool) -> Self {
        self
    }

    /// Apply global engine configuration in the page, injecting axe first if needed.
    ///
    /// This changes the engine inside the page, not the builder.
    pub async fn configure<E>(self, engine: &E, spec: &Value) -> Result<Self>
    where
        E: ScanEngine + ?Sized,
    {
        ensure_injected(engine, &*self.script_source).await?;
        engine.configure(spec).await?;
        Ok(self)
    }

    /// Scan the page, rescanning while violations remain and retries are left.
    pub async fn analyze<E>(&self, engine: &E) -> Result<ScanResult>
    where
        E: ScanEngine + ?Sized,
    {
        ScanExecutor::new(
            engine,
            &*self.script_source,
            self.context(),
            self.options.engine_options(),
            self.options.retry_policy(),
        )
        .execute()
        .await
    }

    /// Selectors to scan, in the order they were added.
    #[must_use]
    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    /// Selectors to skip, in the order they were added.
    #[must_use]
    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    /// Accumulated run options.
    #[must_use]
    pub fn run_options(&self) -> &RunOptions {
        &self.options
    }

    /// The context a scan would use right now; `None` means the whole document.
    #[must_use]
    pub fn context(&self) -> Option<ScanContext> {
        ScanContext::build(&self.includes, &self.excludes)
    }
}

impl Default for AxeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AxeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxeBuilder")
            .field("includes", &self.includes)
            .field("excludes", &self.excludes)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
