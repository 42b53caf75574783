// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared generator contract and output helpers

use aeolus_core::{
    Action, Direction, EnvValue, EnvironmentTable, InternalAction, Target, Windfile,
};
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("bamboo plan spec producer failed: {0}")]
    BackendFailed(String),
    #[error("generated script failed the syntax check:\n{0}")]
    SyntaxCheckFailed(String),
}

/// Turns a resolved windfile into the configuration of one CI system
pub trait Generator {
    fn target(&self) -> Target;

    fn generate(&self, windfile: &Windfile) -> Result<String, GenerateError>;
}

/// Output buffer joined with newlines
#[derive(Debug, Default)]
pub struct Lines {
    lines: Vec<String>,
}

impl Lines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn add(&mut self, indent: usize, line: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", " ".repeat(indent), line.as_ref()));
    }

    /// Add every non-empty line of `script` at `indent`
    pub fn script(&mut self, indent: usize, script: &str) {
        for line in script.lines().filter(|l| !l.is_empty()) {
            self.add(indent, line);
        }
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Copy of `windfile` with target names substituted and repository URLs
/// exported. Returns the environment variable holding each repository URL.
pub(crate) fn prepare(
    windfile: &Windfile,
    table: &EnvironmentTable,
) -> (Windfile, IndexMap<String, String>) {
    let mut prepared = windfile.clone();
    table.substitute_windfile(&mut prepared, Direction::Forward);
    let urls = export_repository_urls(&mut prepared, table);
    (prepared, urls)
}

fn export_repository_urls(
    windfile: &mut Windfile,
    table: &EnvironmentTable,
) -> IndexMap<String, String> {
    let mut variables = IndexMap::new();
    let Some(repositories) = &windfile.repositories else {
        return variables;
    };
    let base = table.native("REPOSITORY_URL").unwrap_or("REPOSITORY_URL");
    let environment = windfile.environment.get_or_insert_with(Default::default);
    for (index, (name, repository)) in repositories.iter().enumerate() {
        let variable = match index {
            0 => base.to_string(),
            n => format!("{}_{}", base, n),
        };
        environment.insert(variable.clone(), EnvValue::from(repository.url.as_str()));
        variables.insert(name.clone(), variable);
    }
    variables
}

/// Jobs a generator for `target` should emit, in windfile order
pub(crate) fn jobs_for(
    windfile: &Windfile,
    target: Target,
) -> Vec<(&str, &Action, &InternalAction)> {
    let mut jobs = Vec::with_capacity(windfile.jobs.len());
    for (name, action) in &windfile.jobs {
        let Some(internal) = action.as_internal() else {
            tracing::warn!(job = %name, kind = action.kind.name(), "unresolved action skipped");
            continue;
        };
        if action.is_foreign_to(target) {
            tracing::info!(job = %name, %target, "platform action for another target skipped");
            continue;
        }
        jobs.push((name.as_str(), action, internal));
    }
    jobs
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
