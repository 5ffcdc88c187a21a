//! Scan context derived from include/exclude selectors.

use serde::Serialize;

/// The region of the document a scan is restricted to.
///
/// Only produced when at least one list is non-empty; an absent context
/// means the whole document. Empty lists are left out of the JSON shape
/// handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanContext {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl ScanContext {
    /// Build a context from selector lists, or `None` for the whole document.
    ///
    /// Selectors are not validated; the engine rejects invalid CSS at scan time.
    #[must_use]
    pub fn build(includes: &[String], excludes: &[String]) -> Option<Self> {
        if includes.is_empty() && excludes.is_empty() {
            return None;
        }

        Some(Self {
            include: includes.to_vec(),
            exclude: excludes.to_vec(),
        })
    }
}
