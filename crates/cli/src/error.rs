// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! This module provides enhanced error types that include:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use aeolus_core::{FetchError, MergeError, ValidationError};
use aeolus_generators::GenerateError;
use aeolus_translator::TranslateError;
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct AeolusError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AeolusError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for AeolusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for AeolusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Common error builders for typical failure scenarios.
impl AeolusError {
    /// The document failed validation; one context line per violation.
    pub fn invalid_document(path: &Path, err: ValidationError) -> Self {
        let mut error = AeolusError::new(format!("{} is not valid", path.display()));
        for violation in &err.violations {
            error = error.with_context(violation.to_string());
        }
        error
            .with_suggestion(format!("Check the document with: aeolus validate {}", path.display()))
            .with_source(err)
    }

    pub fn merge_failed(path: &Path, err: MergeError) -> Self {
        let error = AeolusError::new(format!("failed to merge {}", path.display()))
            .with_context(err.to_string());
        let error = match &err {
            MergeError::NotFound { .. } | MergeError::ReadFailure { .. } => error
                .with_context("Referenced files resolve against the windfile's directory")
                .with_suggestion("Check the `file` and `use` paths of the windfile's jobs"),
            MergeError::UnsupportedNesting { .. } => error
                .with_suggestion("Inline the nested action file's steps into the outer action file"),
            MergeError::InvalidActionFile { path, .. } => error.with_suggestion(format!(
                "Check the action file with: aeolus validate --actionfile {}",
                path.display()
            )),
        };
        error.with_source(err)
    }

    pub fn generate_failed(target: &str, err: GenerateError) -> Self {
        let error = AeolusError::new(format!("failed to generate the {} pipeline", target));
        let error = match &err {
            GenerateError::BackendFailed(reason) => error
                .with_context(reason.clone())
                .with_suggestion("Run with --verbose to see the generator output")
                .with_suggestion("Select another producer with --producer docker|jar"),
            GenerateError::SyntaxCheckFailed(diagnostics) => error
                .with_context(diagnostics.clone())
                .with_suggestion("Report the generated script together with the windfile"),
        };
        error.with_source(err)
    }

    pub fn translate_failed(plan_key: &str, err: TranslateError) -> Self {
        let error = AeolusError::new(format!("failed to translate plan '{}'", plan_key))
            .with_context(err.to_string());
        let error = match &err {
            TranslateError::Fetch(FetchError::NotFound(_)) => error
                .with_suggestion("Check the plan key, it has the form PROJECT-PLAN")
                .with_suggestion("Check that the token can read the plan"),
            TranslateError::Fetch(_) => error.with_suggestion("Check --url and --token"),
            TranslateError::UnsupportedTask { .. } => {
                error.with_context("Only script, checkout, maven, junit and test-parser tasks are supported")
            }
            TranslateError::MissingField { .. } | TranslateError::Malformed { .. } => error,
        };
        error.with_source(err)
    }
}
