//! Retry-driven scan execution.
//!
//! A scan moves through `Idle -> Injecting -> Scanning`, then either finishes
//! or waits in `Retrying` before scanning again. Each retry consumes one unit
//! of the budget, so a run makes at most `retries + 1` engine calls. Context
//! and engine options are fixed for the whole run; only the counter moves.

use crate::context::ScanContext;
use crate::engine::ScanEngine;
use crate::error::{AuditError, Result};
use crate::inject::{ensure_injected, ScriptSource};
use crate::options::RetryPolicy;
use crate::result::ScanResult;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Where a scan run currently stands.
#[derive(Debug)]
pub enum ScanState {
    Idle,
    Injecting,
    Scanning { remaining: u32, attempt: u32 },
    Retrying { remaining: u32, attempt: u32 },
    Done { result: ScanResult, attempts: u32 },
    Failed(AuditError),
}

/// One scan run against a page.
pub struct ScanExecutor<'a, E: ?Sized, S: ?Sized> {
    engine: &'a E,
    source: &'a S,
    context: Option<ScanContext>,
    options: Value,
    policy: RetryPolicy,
}

impl<'a, E, S> ScanExecutor<'a, E, S>
where
    E: ScanEngine + ?Sized,
    S: ScriptSource + ?Sized,
{
    pub fn new(
        engine: &'a E,
        source: &'a S,
        context: Option<ScanContext>,
        options: Value,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            engine,
            source,
            context,
            options,
            policy,
        }
    }

    /// Drive the run to completion and return the latest scan result.
    ///
    /// Violations are not an error: once the budget is spent the last result
    /// is returned even if it still has violations. Injection and engine
    /// failures abort immediately and are never retried.
    pub async fn execute(self) -> Result<ScanResult> {
        let mut state = ScanState::Idle;
        loop {
            state = match state {
                ScanState::Done { result, attempts } => {
                    info!(
                        violations = result.violation_count(),
                        attempts, "accessibility scan complete"
                    );
                    return Ok(result);
                }
                ScanState::Failed(err) => return Err(err),
                other => self.step(other).await,
            };
        }
    }

    /// Advance one transition.
    pub async fn step(&self, state: ScanState) -> ScanState {
        match state {
            ScanState::Idle => ScanState::Injecting,
            ScanState::Injecting => match ensure_injected(self.engine, self.source).await {
                Ok(_) => ScanState::Scanning {
                    remaining: self.policy.retries,
                    attempt: 1,
                },
                Err(err) => ScanState::Failed(err),
            },
            ScanState::Scanning { remaining, attempt } => {
                debug!(attempt, remaining, "running axe");
                match self.engine.run(self.context.as_ref(), &self.options).await {
                    Ok(result) if result.has_violations() && remaining > 0 => {
                        debug!(
                            violations = result.violation_count(),
                            "violations found, scheduling rescan in {:?}", self.policy.interval
                        );
                        ScanState::Retrying {
                            remaining: remaining - 1,
                            attempt,
                        }
                    }
                    Ok(result) => {
                        if result.has_violations() && self.policy.retries > 0 {
                            warn!(
                                violations = result.violation_count(),
                                retries = self.policy.retries,
                                "violations remain after exhausting retries"
                            );
                        }
                        ScanState::Done {
                            result,
                            attempts: attempt,
                        }
                    }
                    Err(err) => ScanState::Failed(err),
                }
            }
            ScanState::Retrying { remaining, attempt } => {
                tokio::time::sleep(self.policy.interval).await;
                ScanState::Scanning {
                    remaining,
                    attempt: attempt + 1,
                }
            }
            terminal @ (ScanState::Done { .. } | ScanState::Failed(_)) => terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // Engine already present; reports `violations` on every run.
    struct FixedEngine {
        violations: usize,
        runs: AtomicUsize,
    }

    #[async_trait]
    impl ScanEngine for FixedEngine {
        async fn is_injected(&self) -> Result<bool> {
            Ok(true)
        }

        async fn inject(&self, _source: &str) -> Result<()> {
            Ok(())
        }

        async fn run(&self, _context: Option<&ScanContext>, _options: &Value) -> Result<ScanResult> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            let violations: Vec<Value> = (0..self.violations).map(|i| json!({ "id": i })).collect();
            Ok(ScanResult::new(json!({ "violations": violations })))
        }

        async fn configure(&self, _spec: &Value) -> Result<()> {
            Ok(())
        }
    }

    struct NoSource;

    #[async_trait]
    impl ScriptSource for NoSource {
        async fn load(&self) -> Result<String> {
            panic!("engine is already injected");
        }
    }

    fn policy(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            interval: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_transitions_with_retry() {
        let engine = FixedEngine {
            violations: 1,
            runs: AtomicUsize::new(0),
        };
        let exec = ScanExecutor::new(&engine, &NoSource, None, json!({}), policy(1));

        let state = exec.step(ScanState::Idle).await;
        assert!(matches!(state, ScanState::Injecting));

        let state = exec.step(state).await;
        assert!(matches!(state, ScanState::Scanning { remaining: 1, attempt: 1 }));

        let state = exec.step(state).await;
        assert!(matches!(state, ScanState::Retrying { remaining: 0, attempt: 1 }));

        let state = exec.step(state).await;
        assert!(matches!(state, ScanState::Scanning { remaining: 0, attempt: 2 }));

        let state = exec.step(state).await;
        assert!(matches!(state, ScanState::Done { attempts: 2, .. }));
        assert_eq!(engine.runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clean_scan_finishes_without_retry() {
        let engine = FixedEngine {
            violations: 0,
            runs: AtomicUsize::new(0),
        };
        let result = ScanExecutor::new(&engine, &NoSource, None, json!({}), policy(5))
            .execute()
            .await
            .unwrap();

        assert_eq!(result.violation_count(), 0);
        assert_eq!(engine.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_terminal_states_are_fixed_points() {
        let engine = FixedEngine {
            violations: 0,
            runs: AtomicUsize::new(0),
        };
        let exec = ScanExecutor::new(&engine, &NoSource, None, json!({}), policy(0));

        let state = exec
            .step(ScanState::Failed(AuditError::EngineRuntime("boom".into())))
            .await;
        assert!(matches!(state, ScanState::Failed(_)));
        assert_eq!(engine.runs.load(Ordering::SeqCst), 0);
    }
}
