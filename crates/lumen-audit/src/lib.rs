//! Lumen Audit - accessibility scans driven from end-to-end browser tests.
//!
//! This crate makes sure the axe engine is present in the page under test,
//! builds the scan context and run options a test asked for, and re-runs the
//! scan after a delay while violations remain and the retry budget allows.
//!
//! # Features
//!
//! - Chainable builder for include/exclude regions, tag and rule filters
//! - Engine injection that reads `axe.min.js` at most once per page
//! - Bounded rescans for pages that settle after load
//! - Engine access through a trait so the core runs against stubs
//!
//! # Example
//!
//! ```rust,ignore
//! use lumen_audit::{AxeBuilder, PageEngine};
//! use lumen_browser::BrowserEngine;
//!
//! let browser = BrowserEngine::new().await?;
//! let page = PageEngine::new(browser.open("https://example.com").await?);
//!
//! let result = AxeBuilder::new()
//!     .exclude("#ads")
//!     .with_tags(["wcag2a", "wcag2aa"])
//!     .options(serde_json::json!({ "retries": 2, "interval": 500 }))
//!     .analyze(&page)
//!     .await?;
//!
//! assert_eq!(result.violation_count(), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod builder;
#[allow(missing_docs)]
pub mod context;
pub mod engine;
#[allow(missing_docs)]
pub mod error;
#[allow(missing_docs)]
pub mod executor;
pub mod inject;
pub mod normalize;
#[allow(missing_docs)]
pub mod options;
#[allow(missing_docs)]
pub mod result;

// Re-export commonly used types
pub use builder::AxeBuilder;
pub use context::ScanContext;
pub use engine::{PageEngine, ScanEngine};
pub use error::{AuditError, Result};
pub use executor::{ScanExecutor, ScanState};
pub use inject::{ensure_injected, FileScriptSource, ScriptSource, DEFAULT_SCRIPT_PATH};
pub use normalize::OneOrMany;
pub use options::{RetryPolicy, RunOnly, RunOptions, DEFAULT_INTERVAL_MS};
pub use result::{ScanResult, Violation};
