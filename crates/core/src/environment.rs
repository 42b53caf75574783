// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical and native environment variable names per target.
//!
//! Substitution is plain ordered string replacement with no escaping.
//! Later pairs see text already rewritten by earlier ones, so table order is
//! part of the contract.

use crate::action::{Action, ActionKind, Docker, Environment, Parameters};
use crate::target::Target;
use crate::windfile::Windfile;

/// Built-in pairs; `TMPDIR` precedes `WORKDIR` so Jenkins' `WORKSPACE_TMP`
/// is rewritten before `WORKSPACE`
const CANONICAL: [&str; 9] = [
    "JOB_NAME",
    "JOB_ID",
    "JOB_URI",
    "JOB_URL",
    "RUNNER_NAME",
    "BRANCH_NAME",
    "REPOSITORY_URL",
    "TMPDIR",
    "WORKDIR",
];

const CLI_NATIVE: [&str; 9] = [
    "AEOLUS_JOB_NAME",
    "AEOLUS_JOB_ID",
    "AEOLUS_JOB_URI",
    "AEOLUS_JOB_URL",
    "HOSTNAME",
    "AEOLUS_BRANCH_NAME",
    "AEOLUS_REPOSITORY_URL",
    "AEOLUS_TMPDIR",
    "AEOLUS_INITIAL_DIRECTORY",
];

const JENKINS_NATIVE: [&str; 9] = [
    "JOB_NAME",
    "BUILD_ID",
    "BUILD_TAG",
    "BUILD_URL",
    "NODE_NAME",
    "GIT_BRANCH",
    "GIT_URL",
    "WORKSPACE_TMP",
    "WORKSPACE",
];

const BAMBOO_NATIVE: [&str; 9] = [
    "bamboo_buildPlanName",
    "bamboo_buildResultKey",
    "bamboo_buildKey",
    "bamboo_buildResultsUrl",
    "bamboo_agentId",
    "bamboo_planRepository_branchName",
    "bamboo_planRepository_repositoryUrl",
    "bamboo_tmp_directory",
    "bamboo_working_directory",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// canonical -> native
    Forward,
    /// native -> canonical
    Reverse,
}

/// Ordered canonical -> native pairs for one target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentTable {
    pairs: Vec<(String, String)>,
}

impl EnvironmentTable {
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Built-in table for `target`
    pub fn for_target(target: Target) -> Self {
        let native = match target {
            Target::Cli => CLI_NATIVE,
            Target::Jenkins => JENKINS_NATIVE,
            Target::Bamboo => BAMBOO_NATIVE,
        };
        Self::new(CANONICAL.into_iter().zip(native))
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn native(&self, canonical: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(c, _)| c == canonical)
            .map(|(_, n)| n.as_str())
    }

    /// Override an existing canonical name in place, or append a new pair
    pub fn set(&mut self, canonical: impl Into<String>, native: impl Into<String>) {
        let canonical = canonical.into();
        let native = native.into();
        match self.pairs.iter_mut().find(|(c, _)| *c == canonical) {
            Some(pair) => pair.1 = native,
            None => self.pairs.push((canonical, native)),
        }
    }

    pub fn substitute(&self, text: &str, direction: Direction) -> String {
        substitute(text, self, direction)
    }

    pub fn substitute_list(&self, items: &[String], direction: Direction) -> Vec<String> {
        items
            .iter()
            .map(|item| substitute(item, self, direction))
            .collect()
    }

    /// Substitutes values; keys are left alone
    pub fn substitute_map(&self, map: &Environment, direction: Direction) -> Environment {
        map.iter()
            .map(|(k, v)| (k.clone(), v.map(|s| substitute(s, self, direction))))
            .collect()
    }

    /// Rewrite every substitutable field of `windfile` in place
    pub fn substitute_windfile(&self, windfile: &mut Windfile, direction: Direction) {
        if let Some(env) = &windfile.environment {
            windfile.environment = Some(self.substitute_map(env, direction));
        }
        if let Some(docker) = &mut windfile.metadata.docker {
            self.substitute_docker(docker, direction);
        }
        for action in windfile.jobs.values_mut() {
            self.substitute_action(action, direction);
        }
    }

    pub fn substitute_action(&self, action: &mut Action, direction: Direction) {
        if let ActionKind::Internal(internal) = &mut action.kind {
            internal.script = substitute(&internal.script, self, direction);
        }
        if let Some(env) = &action.environment {
            action.environment = Some(self.substitute_map(env, direction));
        }
        if let Some(params) = &action.parameters {
            action.parameters = Some(self.substitute_parameters(params, direction));
        }
        if let Some(workdir) = &action.workdir {
            action.workdir = Some(substitute(workdir, self, direction));
        }
        if let Some(docker) = &mut action.docker {
            self.substitute_docker(docker, direction);
        }
    }

    pub fn substitute_parameters(&self, params: &Parameters, direction: Direction) -> Parameters {
        params.map_values(|s| substitute(s, self, direction))
    }

    pub fn substitute_docker(&self, docker: &mut Docker, direction: Direction) {
        if let Some(volumes) = &docker.volumes {
            docker.volumes = Some(self.substitute_list(volumes, direction));
        }
        if let Some(parameters) = &docker.parameters {
            docker.parameters = Some(self.substitute_list(parameters, direction));
        }
    }
}

/// Replace every name of `table` in `text`, in table order
pub fn substitute(text: &str, table: &EnvironmentTable, direction: Direction) -> String {
    let mut result = text.to_string();
    for (canonical, native) in &table.pairs {
        let (from, to) = match direction {
            Direction::Forward => (canonical, native),
            Direction::Reverse => (native, canonical),
        };
        if from.is_empty() || from == to {
            continue;
        }
        result = result.replace(from.as_str(), to);
    }
    result
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
