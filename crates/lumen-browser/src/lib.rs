//! Browser automation for in-page accessibility audits.
//!
//! Launches headless Chromium and exposes the few page primitives an
//! audit needs: navigation and script evaluation in the page's global scope.

pub mod actions;
pub mod engine;
pub mod error;

pub use actions::BrowserActions;
pub use engine::{BrowserEngine, BrowserPage};
pub use error::{BrowserError, Result};
