#![allow(dead_code)]

use async_trait::async_trait;
use lumen_audit::{AuditError, Result, ScanContext, ScanEngine, ScanResult, ScriptSource};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory stand-in for `window.axe`.
///
/// Each run pops the next violation count from `script`; once the script is
/// empty the last count repeats.
pub struct StubEngine {
    present: AtomicBool,
    script: Mutex<VecDeque<usize>>,
    last: Mutex<usize>,
    fail_runs: bool,
    fail_configure: bool,
    pub events: Mutex<Vec<String>>,
    pub runs: AtomicUsize,
    pub injections: AtomicUsize,
    pub contexts: Mutex<Vec<Option<ScanContext>>>,
    pub options: Mutex<Vec<Value>>,
    pub injected_source: Mutex<Option<String>>,
    pub configured: Mutex<Vec<Value>>,
}

impl StubEngine {
    fn build(present: bool, violations: &[usize], fail_runs: bool) -> Self {
        Self {
            present: AtomicBool::new(present),
            script: Mutex::new(violations.iter().copied().collect()),
            last: Mutex::new(0),
            fail_runs,
            fail_configure: false,
            events: Mutex::new(Vec::new()),
            runs: AtomicUsize::new(0),
            injections: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
            options: Mutex::new(Vec::new()),
            injected_source: Mutex::new(None),
            configured: Mutex::new(Vec::new()),
        }
    }

    /// A page where axe is already loaded.
    pub fn injected(violations: &[usize]) -> Self {
        Self::build(true, violations, false)
    }

    /// A page without axe.
    pub fn empty(violations: &[usize]) -> Self {
        Self::build(false, violations, false)
    }

    /// A page whose `axe.run` always rejects.
    pub fn failing() -> Self {
        Self::build(true, &[], true)
    }

    /// A page with axe loaded whose `axe.configure` throws.
    pub fn rejecting_configure() -> Self {
        Self {
            fail_configure: true,
            ..Self::build(true, &[0], false)
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn injections(&self) -> usize {
        self.injections.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: &str) {
        self.events.lock().unwrap().push(event.to_string());
    }
}

#[async_trait]
impl ScanEngine for StubEngine {
    async fn is_injected(&self) -> Result<bool> {
        Ok(self.present.load(Ordering::SeqCst))
    }

    async fn inject(&self, source: &str) -> Result<()> {
        self.record("inject");
        self.injections.fetch_add(1, Ordering::SeqCst);
        *self.injected_source.lock().unwrap() = Some(source.to_string());
        self.present.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn run(&self, context: Option<&ScanContext>, options: &Value) -> Result<ScanResult> {
        self.record("run");
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().unwrap().push(context.cloned());
        self.options.lock().unwrap().push(options.clone());

        if self.fail_runs {
            return Err(AuditError::EngineRuntime(
                "unknown rule `not-a-rule` in options.runOnly".to_string(),
            ));
        }

        let count = {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.script.lock().unwrap().pop_front() {
                *last = next;
            }
            *last
        };

        let violations: Vec<Value> = (0..count)
            .map(|i| json!({ "id": format!("rule-{i}"), "nodes": [] }))
            .collect();
        Ok(ScanResult::new(json!({ "violations": violations, "passes": [] })))
    }

    async fn configure(&self, spec: &Value) -> Result<()> {
        self.record("configure");
        self.configured.lock().unwrap().push(spec.clone());
        if self.fail_configure {
            return Err(AuditError::EngineRuntime(
                "TypeError: rule custom-landmark has no selector".to_string(),
            ));
        }
        Ok(())
    }
}

/// Script source that counts reads.
pub struct CountingSource {
    pub loads: AtomicUsize,
}

impl CountingSource {
    pub fn new() -> Self {
        Self {
            loads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ScriptSource for CountingSource {
    async fn load(&self) -> Result<String> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok("/*! axe stub */ window.axe = {};".to_string())
    }
}

/// Shares a [`CountingSource`] between the builder and the test.
pub struct SharedSource(pub std::sync::Arc<CountingSource>);

#[async_trait]
impl ScriptSource for SharedSource {
    async fn load(&self) -> Result<String> {
        self.0.load().await
    }
}
