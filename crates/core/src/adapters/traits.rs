// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability traits for the external tools the pipeline depends on

use thiserror::Error;

// =============================================================================
// Plan spec producer (Bamboo backend)
// =============================================================================

/// Captured result of one producer invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProducerOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ProducerOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Errors from launching the producer
#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("producer terminated without an exit code")]
    Terminated,
}

/// Turns a base64-encoded JSON windfile into Bamboo plan specs
pub trait PlanSpecProducer: Send + Sync {
    fn produce(&self, encoded: &str) -> Result<ProducerOutput, ProducerError>;
}

impl<T: PlanSpecProducer + ?Sized> PlanSpecProducer for Box<T> {
    fn produce(&self, encoded: &str) -> Result<ProducerOutput, ProducerError> {
        (**self).produce(encoded)
    }
}

// =============================================================================
// Shell syntax checker
// =============================================================================

/// Result of a syntax check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub diagnostics: String,
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to run syntax checker: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse-only check of generated shell content
pub trait SyntaxChecker: Send + Sync {
    fn check(&self, content: &str) -> Result<CheckOutcome, CheckError>;
}

impl<T: SyntaxChecker + ?Sized> SyntaxChecker for Box<T> {
    fn check(&self, content: &str) -> Result<CheckOutcome, CheckError> {
        (**self).check(content)
    }
}

// =============================================================================
// Plan graph fetcher (Bamboo REST)
// =============================================================================

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("plan {0} not found")]
    NotFound(String),
    #[error("request failed: {0}")]
    Http(String),
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// Downloads the YAML export of a remote plan
pub trait PlanGraphFetcher: Send + Sync {
    fn fetch(&self, plan_key: &str) -> Result<String, FetchError>;
}

impl<T: PlanGraphFetcher + ?Sized> PlanGraphFetcher for Box<T> {
    fn fetch(&self, plan_key: &str) -> Result<String, FetchError> {
        (**self).fetch(plan_key)
    }
}
