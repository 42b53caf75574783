// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake capability implementations for testing

use super::traits::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Recorded call to a capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityCall {
    Produce { encoded: String },
    Check { content: String },
    Fetch { plan_key: String },
}

/// Shared state for fake capabilities
#[derive(Default)]
struct FakeState {
    calls: Vec<CapabilityCall>,
    producer_output: ProducerOutput,
    producer_launch_fails: bool,
    check_failure: Option<String>,
    plans: HashMap<String, String>,
}

/// Fake capabilities with call recording for testing
#[derive(Clone, Default)]
pub struct FakeCapabilities {
    state: Arc<Mutex<FakeState>>,
}

impl FakeCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CapabilityCall> {
        self.state().calls.clone()
    }

    /// Output returned by the next producer invocations
    pub fn set_producer_output(&self, output: ProducerOutput) {
        self.state().producer_output = output;
    }

    /// Make the producer fail to launch
    pub fn set_producer_launch_fails(&self, fails: bool) {
        self.state().producer_launch_fails = fails;
    }

    /// Make the checker reject every script with `diagnostics`
    pub fn set_check_failure(&self, diagnostics: impl Into<String>) {
        self.state().check_failure = Some(diagnostics.into());
    }

    /// Register a plan export served by the fetcher
    pub fn add_plan(&self, key: impl Into<String>, yaml: impl Into<String>) {
        self.state().plans.insert(key.into(), yaml.into());
    }

    pub fn producer(&self) -> FakeProducer {
        FakeProducer {
            inner: self.clone(),
        }
    }

    pub fn checker(&self) -> FakeChecker {
        FakeChecker {
            inner: self.clone(),
        }
    }

    pub fn fetcher(&self) -> FakeFetcher {
        FakeFetcher {
            inner: self.clone(),
        }
    }
}

#[derive(Clone)]
pub struct FakeProducer {
    inner: FakeCapabilities,
}

impl PlanSpecProducer for FakeProducer {
    fn produce(&self, encoded: &str) -> Result<ProducerOutput, ProducerError> {
        let mut state = self.inner.state();
        state.calls.push(CapabilityCall::Produce {
            encoded: encoded.to_string(),
        });
        if state.producer_launch_fails {
            return Err(ProducerError::Launch {
                program: "fake-producer".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            });
        }
        Ok(state.producer_output.clone())
    }
}

#[derive(Clone)]
pub struct FakeChecker {
    inner: FakeCapabilities,
}

impl SyntaxChecker for FakeChecker {
    fn check(&self, content: &str) -> Result<CheckOutcome, CheckError> {
        let mut state = self.inner.state();
        state.calls.push(CapabilityCall::Check {
            content: content.to_string(),
        });
        Ok(match &state.check_failure {
            Some(diagnostics) => CheckOutcome {
                passed: false,
                diagnostics: diagnostics.clone(),
            },
            None => CheckOutcome {
                passed: true,
                diagnostics: String::new(),
            },
        })
    }
}

#[derive(Clone)]
pub struct FakeFetcher {
    inner: FakeCapabilities,
}

impl PlanGraphFetcher for FakeFetcher {
    fn fetch(&self, plan_key: &str) -> Result<String, FetchError> {
        let mut state = self.inner.state();
        state.calls.push(CapabilityCall::Fetch {
            plan_key: plan_key.to_string(),
        });
        state
            .plans
            .get(plan_key)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(plan_key.to_string()))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
