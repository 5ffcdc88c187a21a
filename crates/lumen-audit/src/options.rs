//! Run options accumulated by the builder.
//!
//! Everything here is handed to `axe.run` except the retry policy
//! (`interval` and `retries`), which only the builder reads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

/// Delay between scan attempts when no interval is configured.
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

const RUN_ONLY_KEY: &str = "runOnly";
const RULES_KEY: &str = "rules";
const INTERVAL_KEY: &str = "interval";
const RETRIES_KEY: &str = "retries";

/// Restrict a scan to a set of tags or a set of rule ids.
///
/// The two filters share one slot: setting either replaces the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum RunOnly {
    /// Run rules carrying any of these tags
    #[serde(alias = "tags")]
    Tag(Vec<String>),
    /// Run exactly these rules
    #[serde(alias = "rules")]
    Rule(Vec<String>),
}

/// How often and how long to wait when re-scanning a page with violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts allowed after the first scan
    pub retries: u32,
    /// Delay before each extra attempt
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 0,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

/// Engine run options plus the builder-private retry policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    run_only: Option<RunOnly>,
    // `runOnly` exactly as given to `merge`, sent instead of the typed form
    run_only_raw: Option<Value>,
    rules: BTreeMap<String, Value>,
    interval: Option<u64>,
    retries: Option<u32>,
    passthrough: Map<String, Value>,
}

impl RunOptions {
    /// Shallow-merge `opts`, overwriting any key already set.
    ///
    /// `runOnly` is always handed to the engine exactly as given; it also
    /// fills the typed slot when it parses as a tag or rule filter. `rules`
    /// values that aren't objects are kept verbatim.
    pub fn merge(&mut self, opts: Map<String, Value>) {
        for (key, value) in opts {
            match key.as_str() {
                RUN_ONLY_KEY => match serde_json::from_value::<RunOnly>(value.clone()) {
                    Ok(run_only) => {
                        self.set_run_only(run_only);
                        self.run_only_raw = Some(value);
                    }
                    Err(_) => {
                        self.run_only = None;
                        self.run_only_raw = None;
                        self.passthrough.insert(key, value);
                    }
                },
                RULES_KEY => match value {
                    Value::Object(rules) => {
                        self.passthrough.remove(RULES_KEY);
                        self.rules = rules.into_iter().collect();
                    }
                    other => {
                        self.rules.clear();
                        self.passthrough.insert(key, other);
                    }
                },
                INTERVAL_KEY => {
                    self.interval = whole_number(&value);
                    if self.interval.is_none() {
                        tracing::warn!(%value, "ignoring non-numeric interval");
                    }
                }
                RETRIES_KEY => {
                    self.retries =
                        whole_number(&value).map(|n| u32::try_from(n).unwrap_or(u32::MAX));
                    if self.retries.is_none() {
                        tracing::warn!(%value, "ignoring non-numeric retries");
                    }
                }
                _ => {
                    self.passthrough.insert(key, value);
                }
            }
        }
    }

    /// Replace any tag or rule filter.
    pub fn set_run_only(&mut self, run_only: RunOnly) {
        self.passthrough.remove(RUN_ONLY_KEY);
        self.run_only_raw = None;
        self.run_only = Some(run_only);
    }

    /// Mark each rule disabled, keeping overrides already present.
    pub fn disable_rules(&mut self, rule_ids: Vec<String>) {
        // A non-object rules value cannot hold per-rule overrides.
        self.passthrough.remove(RULES_KEY);
        for rule_id in rule_ids {
            self.rules
                .insert(rule_id, serde_json::json!({ "enabled": false }));
        }
    }

    /// Set the retry budget and delay.
    pub fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.retries = Some(policy.retries);
        self.interval = Some(u64::try_from(policy.interval.as_millis()).unwrap_or(u64::MAX));
    }

    #[must_use]
    pub fn run_only(&self) -> Option<&RunOnly> {
        self.run_only.as_ref()
    }

    #[must_use]
    pub fn rules(&self) -> &BTreeMap<String, Value> {
        &self.rules
    }

    /// Retry policy with defaults filled in.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries.unwrap_or(0),
            interval: Duration::from_millis(self.interval.unwrap_or(DEFAULT_INTERVAL_MS)),
        }
    }

    /// The options object passed to `axe.run`, without `interval`/`retries`.
    #[must_use]
    pub fn engine_options(&self) -> Value {
        let mut options = self.passthrough.clone();

        if let Some(raw) = &self.run_only_raw {
            options.insert(RUN_ONLY_KEY.to_string(), raw.clone());
        } else if let Some(run_only) = &self.run_only {
            if let Ok(value) = serde_json::to_value(run_only) {
                options.insert(RUN_ONLY_KEY.to_string(), value);
            }
        }

        if !self.rules.is_empty() {
            let rules: Map<String, Value> = self
                .rules
                .iter()
                .map(|(id, value)| (id.clone(), value.clone()))
                .collect();
            options.insert(RULES_KEY.to_string(), Value::Object(rules));
        }

        Value::Object(options)
    }
}

/// A non-negative integer, also accepting integral floats such as `2.0`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn whole_number(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then(|| f as u64)
}
