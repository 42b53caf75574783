// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Post-processing of a translated windfile

use aeolus_core::Windfile;

/// Hoist a docker config shared by every job to the windfile metadata.
///
/// Only happens when all jobs carry an identical config. Returns whether the
/// config was hoisted.
pub fn consolidate_docker(windfile: &mut Windfile) -> bool {
    let mut configs = windfile.jobs.values().map(|a| a.docker.as_ref());
    let Some(Some(first)) = configs.next() else {
        return false;
    };
    if !configs.all(|c| c == Some(first)) {
        tracing::info!("jobs use different docker configurations, keeping them per job");
        return false;
    }

    windfile.metadata.docker = Some(first.clone());
    for action in windfile.jobs.values_mut() {
        action.docker = None;
    }
    tracing::debug!("docker configuration moved to metadata");
    true
}

/// Turn empty environment, parameter, exclusion and result collections into absent ones
pub fn clean_up(windfile: &mut Windfile) {
    for action in windfile.jobs.values_mut() {
        if action.environment.as_ref().is_some_and(|e| e.is_empty()) {
            action.environment = None;
        }
        if action.parameters.as_ref().is_some_and(|p| p.is_empty()) {
            action.parameters = None;
        }
        if action.exclude_during.as_ref().is_some_and(|e| e.is_empty()) {
            action.exclude_during = None;
        }
        if action.results.as_ref().is_some_and(|r| r.is_empty()) {
            action.results = None;
        }
    }
}

#[cfg(test)]
#[path = "consolidate_tests.rs"]
mod tests;
