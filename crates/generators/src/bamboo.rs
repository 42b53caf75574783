// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bamboo plan specs, produced by an external plan spec producer

use crate::base::{GenerateError, Generator};
use aeolus_core::{Direction, EnvironmentTable, PlanSpecProducer, Target, Windfile};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub struct BambooGenerator<P> {
    producer: P,
    table: EnvironmentTable,
}

impl<P: PlanSpecProducer> BambooGenerator<P> {
    pub fn new(producer: P) -> Self {
        Self {
            producer,
            table: EnvironmentTable::for_target(Target::Bamboo),
        }
    }

    pub fn with_environment(mut self, table: EnvironmentTable) -> Self {
        self.table = table;
        self
    }

    /// Base64 of the JSON form of the substituted windfile.
    /// Key order follows the document; absent fields are omitted.
    pub fn encode(&self, windfile: &Windfile) -> Result<String, GenerateError> {
        let mut prepared = windfile.clone();
        self.table
            .substitute_windfile(&mut prepared, Direction::Forward);
        prepared.jobs.retain(|name, action| {
            let keep = !action.is_foreign_to(Target::Bamboo);
            if !keep {
                tracing::info!(job = %name, "platform action for another target skipped");
            }
            keep
        });
        let json = serde_json::to_string(&prepared)
            .map_err(|e| GenerateError::BackendFailed(format!("could not encode windfile: {}", e)))?;
        Ok(STANDARD.encode(json))
    }
}

impl<P: PlanSpecProducer> Generator for BambooGenerator<P> {
    fn target(&self) -> Target {
        Target::Bamboo
    }

    fn generate(&self, windfile: &Windfile) -> Result<String, GenerateError> {
        let payload = self.encode(windfile)?;
        tracing::info!(bytes = payload.len(), "generating bamboo plan specs");

        let output = self
            .producer
            .produce(&payload)
            .map_err(|e| GenerateError::BackendFailed(e.to_string()))?;
        for line in output.stderr.lines().filter(|l| !l.is_empty()) {
            tracing::info!(target: "aeolus::bamboo", "{}", line);
        }
        if !output.success() {
            tracing::error!(exit_code = output.exit_code, "bamboo plan spec generation failed");
            return Err(GenerateError::BackendFailed(format!(
                "producer exited with code {}",
                output.exit_code
            )));
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
#[path = "bamboo_tests.rs"]
mod tests;
