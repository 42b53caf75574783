// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inlines file, external and platform actions into internal actions.
//!
//! Merging runs three passes in a fixed order. Each pass reads the job map
//! left by the previous one and builds a fresh map; actions introduced by a
//! pass are not revisited by the same merge.

use crate::action::{Action, ActionKind, InternalAction, Parameters};
use crate::validator::{validate_actionfile, ValidationError};
use crate::windfile::Windfile;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Ordered job (or step) map
pub type Jobs = IndexMap<String, Action>;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("referenced file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error(
        "step '{step}' in {} uses another action file; external actions in an external action are not supported",
        path.display()
    )]
    UnsupportedNesting { path: PathBuf, step: String },
    #[error("failed to read {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid action file {}: {source}", path.display())]
    InvalidActionFile {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

/// Merge with default options; relative paths resolve against `base_path`
pub fn merge(windfile: Windfile, base_path: &Path) -> Result<Windfile, MergeError> {
    Merger::new(base_path).merge(windfile)
}

/// Resolves every job of a windfile into an internal action
#[derive(Debug, Clone)]
pub struct Merger {
    base_path: PathBuf,
    verbose: bool,
}

impl Merger {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            verbose: false,
        }
    }

    /// Log the merged document when enabled
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn merge(&self, mut windfile: Windfile) -> Result<Windfile, MergeError> {
        windfile.jobs = self.resolve_file_actions(&windfile.jobs)?;
        windfile.jobs = self.resolve_external_actions(&windfile.jobs)?;
        windfile.jobs = self.resolve_platform_actions(&windfile.jobs)?;

        if self.verbose {
            match windfile.to_yaml() {
                Ok(document) => tracing::info!("merged windfile:\n{}", document),
                Err(e) => tracing::warn!(error = %e, "could not render merged windfile"),
            }
        }
        Ok(windfile)
    }

    /// File pass: read each file action's script, keeping the job key
    pub fn resolve_file_actions(&self, jobs: &Jobs) -> Result<Jobs, MergeError> {
        let count = jobs
            .values()
            .filter(|a| matches!(a.kind, ActionKind::File(_)))
            .count();
        tracing::info!(count, "merging file actions");

        let mut resolved = Jobs::with_capacity(jobs.len());
        for (name, action) in jobs {
            let action = match &action.kind {
                ActionKind::File(file) => {
                    let script = read_script(&self.base_path.join(&file.file))?;
                    action.with_kind(internal(script, None))
                }
                _ => action.clone(),
            };
            resolved.insert(name.clone(), action);
        }
        Ok(resolved)
    }

    /// External pass: replace each reference by one job per step
    pub fn resolve_external_actions(&self, jobs: &Jobs) -> Result<Jobs, MergeError> {
        let count = jobs.values().filter(|a| a.is_external()).count();
        tracing::info!(count, "merging external actions");

        let mut resolved = Jobs::with_capacity(jobs.len());
        for (name, action) in jobs {
            let ActionKind::External(external) = &action.kind else {
                resolved.insert(name.clone(), action.clone());
                continue;
            };

            let path = self.base_path.join(&external.uses);
            let steps = load_steps(&path)?;
            tracing::info!(job = %name, steps = steps.len(), path = %path.display(), "inlining action file");

            for (step_name, step) in steps {
                let job_name = format!("{}_{}", name, step_name);
                let step = inherit(step, action);
                if resolved.insert(job_name.clone(), step).is_some() {
                    tracing::warn!(job = %job_name, "inlined step replaces an existing job");
                }
            }
        }
        Ok(resolved)
    }

    /// Platform pass: read each platform action's file, tagging the script
    pub fn resolve_platform_actions(&self, jobs: &Jobs) -> Result<Jobs, MergeError> {
        let count = jobs
            .values()
            .filter(|a| matches!(a.kind, ActionKind::Platform(_)))
            .count();
        tracing::info!(count, "merging platform actions");

        let mut resolved = Jobs::with_capacity(jobs.len());
        for (name, action) in jobs {
            let action = match &action.kind {
                ActionKind::Platform(platform) => {
                    let script = read_script(&self.base_path.join(&platform.file))?;
                    action.with_kind(internal(script, Some(platform.platform)))
                }
                _ => action.clone(),
            };
            resolved.insert(name.clone(), action);
        }
        Ok(resolved)
    }
}

/// Load an action file and turn its steps into internal actions.
/// Files referenced by steps resolve against the action file's directory.
fn load_steps(path: &Path) -> Result<Jobs, MergeError> {
    let text = read_script(path)?;
    let actionfile = validate_actionfile(&text).map_err(|source| MergeError::InvalidActionFile {
        path: path.to_path_buf(),
        source,
    })?;
    let dir = path.parent().unwrap_or(Path::new("."));

    let mut steps = Jobs::with_capacity(actionfile.steps.len());
    for (step_name, step) in actionfile.steps {
        let kind = match &step.kind {
            ActionKind::Internal(_) => step.kind.clone(),
            ActionKind::Platform(platform) => {
                let script = read_script(&dir.join(&platform.file))?;
                internal(script, Some(platform.platform))
            }
            ActionKind::File(file) => {
                tracing::warn!(
                    step = %step_name,
                    file = %file.file.display(),
                    "file action nested in an action file, resolving it in place"
                );
                internal(read_script(&dir.join(&file.file))?, None)
            }
            ActionKind::External(_) => {
                return Err(MergeError::UnsupportedNesting {
                    path: path.to_path_buf(),
                    step: step_name,
                });
            }
        };
        steps.insert(step_name, step.with_kind(kind));
    }
    Ok(steps)
}

/// Layer the caller's settings over a step's own
fn inherit(mut step: Action, caller: &Action) -> Action {
    if let Some(env) = &caller.environment {
        let merged = step.environment.get_or_insert_with(Default::default);
        for (key, value) in env {
            merged.insert(key.clone(), value.clone());
        }
    }
    if let Some(params) = &caller.parameters {
        step.parameters = Some(match step.parameters.take() {
            Some(own) => merge_parameters(own, params),
            None => params.clone(),
        });
    }
    // appended as-is; duplicates are kept
    if let Some(exclusions) = &caller.exclude_during {
        step.exclude_during
            .get_or_insert_with(Vec::new)
            .extend(exclusions.iter().copied());
    }
    if step.docker.is_none() {
        step.docker = caller.docker.clone();
    }
    if step.workdir.is_none() {
        step.workdir = caller.workdir.clone();
    }
    step.run_always |= caller.run_always;
    step
}

fn merge_parameters(own: Parameters, caller: &Parameters) -> Parameters {
    match (own, caller) {
        (Parameters::Map(mut own), Parameters::Map(caller)) => {
            for (key, value) in caller {
                own.insert(key.clone(), value.clone());
            }
            Parameters::Map(own)
        }
        (Parameters::List(mut own), Parameters::List(caller)) => {
            own.extend(caller.iter().cloned());
            Parameters::List(own)
        }
        (_, caller) => caller.clone(),
    }
}

fn internal(script: String, platform: Option<crate::target::Target>) -> ActionKind {
    ActionKind::Internal(InternalAction { script, platform })
}

fn read_script(path: &Path) -> Result<String, MergeError> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => MergeError::NotFound {
            path: path.to_path_buf(),
        },
        _ => MergeError::ReadFailure {
            path: path.to_path_buf(),
            source,
        },
    })
}

#[cfg(test)]
#[path = "merger_tests.rs"]
mod tests;
