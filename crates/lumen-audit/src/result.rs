//! Scan results returned by the engine.

use serde::Deserialize;
use serde_json::Value;

/// Raw result of one `axe.run` call.
///
/// The orchestration only ever looks at how many violations came back; the
/// rest of the document is left for the caller to inspect.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult(Value);

impl ScanResult {
    #[must_use]
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Number of entries in `violations`; 0 when missing or not a list.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.0
            .get("violations")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    #[must_use]
    pub fn has_violations(&self) -> bool {
        self.violation_count() > 0
    }

    /// Typed summary of each violation. Entries that don't look like a
    /// violation object are skipped.
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        self.0
            .get("violations")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Emit one tracing event per violation.
    pub fn log_summary(&self) {
        let violations = self.violations();
        if violations.is_empty() {
            tracing::info!("no accessibility violations");
            return;
        }

        for violation in &violations {
            tracing::warn!(
                rule = %violation.id,
                impact = violation.impact.as_deref().unwrap_or("unknown"),
                nodes = violation.nodes.len(),
                help_url = violation.help_url.as_deref().unwrap_or(""),
                "{}",
                violation.help
            );
        }
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// A rule failure reported by the engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub id: String,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub help_url: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_violation_count() {
        let result = ScanResult::new(json!({
            "violations": [{"id": "region"}, {"id": "color-contrast"}],
            "passes": [{"id": "html-has-lang"}]
        }));
        assert_eq!(result.violation_count(), 2);
        assert!(result.has_violations());
    }

    #[test]
    fn test_missing_violations_counts_zero() {
        assert_eq!(ScanResult::new(json!({})).violation_count(), 0);
        assert_eq!(ScanResult::new(Value::Null).violation_count(), 0);
        assert_eq!(
            ScanResult::new(json!({"violations": "none"})).violation_count(),
            0
        );
    }

    #[test]
    fn test_typed_violations() {
        let result = ScanResult::new(json!({
            "violations": [
                {
                    "id": "image-alt",
                    "impact": "critical",
                    "help": "Images must have alternate text",
                    "helpUrl": "https://dequeuniversity.com/rules/axe/4.10/image-alt",
                    "nodes": [{"target": ["img"]}, {"target": ["#logo"]}]
                },
                "not a violation"
            ]
        }));

        let violations = result.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].id, "image-alt");
        assert_eq!(violations[0].impact.as_deref(), Some("critical"));
        assert_eq!(violations[0].nodes.len(), 2);
        // The raw count still sees both entries
        assert_eq!(result.violation_count(), 2);
    }
}
