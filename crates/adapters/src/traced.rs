// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced capability wrappers for consistent observability

use aeolus_core::{FetchError, PlanGraphFetcher, PlanSpecProducer, ProducerError, ProducerOutput};

/// Wrapper that adds tracing to any PlanSpecProducer
#[derive(Clone)]
pub struct TracedPlanSpecProducer<P> {
    inner: P,
}

impl<P> TracedPlanSpecProducer<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: PlanSpecProducer> PlanSpecProducer for TracedPlanSpecProducer<P> {
    fn produce(&self, encoded: &str) -> Result<ProducerOutput, ProducerError> {
        let span = tracing::info_span!("producer.produce", payload_len = encoded.len());
        let _guard = span.enter();

        tracing::info!("starting");

        let start = std::time::Instant::now();
        let result = self.inner.produce(encoded);
        let elapsed = start.elapsed();

        match &result {
            Ok(output) => tracing::info!(
                exit_code = output.exit_code,
                stdout_len = output.stdout.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "producer finished"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "producer failed to run"
            ),
        }

        result
    }
}

/// Wrapper that adds tracing to any PlanGraphFetcher
#[derive(Clone)]
pub struct TracedPlanGraphFetcher<F> {
    inner: F,
}

impl<F> TracedPlanGraphFetcher<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: PlanGraphFetcher> PlanGraphFetcher for TracedPlanGraphFetcher<F> {
    fn fetch(&self, plan_key: &str) -> Result<String, FetchError> {
        let span = tracing::info_span!("bamboo.fetch", plan_key);
        let _guard = span.enter();

        // Precondition: Bamboo plan keys are never blank
        if plan_key.trim().is_empty() {
            tracing::error!("plan key is empty");
            return Err(FetchError::NotFound(plan_key.to_string()));
        }

        let start = std::time::Instant::now();
        let result = self.inner.fetch(plan_key);
        let elapsed = start.elapsed();

        match &result {
            Ok(code) => tracing::info!(
                bytes = code.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "plan fetched"
            ),
            // not found is an answer, not a failure of the transport
            Err(FetchError::NotFound(_)) => {
                tracing::warn!(elapsed_ms = elapsed.as_millis() as u64, "plan not found")
            }
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "fetch failed"
            ),
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
