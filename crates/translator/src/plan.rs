// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only view of a Bamboo plan export

use aeolus_core::EnvValue;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanGraph {
    pub plan: Plan,
    /// Stage order is execution order
    pub stages: IndexMap<String, Stage>,
    pub repositories: IndexMap<String, PlanRepository>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub project_key: Option<String>,
    pub key: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub jobs: IndexMap<String, Job>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub key: String,
    /// Regular tasks followed by final tasks
    pub tasks: Vec<Task>,
    pub docker: Option<DockerConfig>,
    pub artifacts: Vec<Artifact>,
    pub other: Option<serde_yaml::Mapping>,
}

/// Files a job shares after it ran, `location/pattern`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub location: String,
    pub pattern: String,
    pub exclusion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerConfig {
    pub image: String,
    /// host path -> container path
    pub volumes: IndexMap<String, String>,
    pub docker_run_arguments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Script(ScriptTask),
    Checkout(CheckoutTask),
    Special(SpecialTask),
}

/// `variable -> regex` pairs of one `variable: { matches: ... }` condition
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Condition {
    pub matches: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptTask {
    pub interpreter: String,
    pub scripts: Vec<String>,
    pub environment: IndexMap<String, String>,
    pub arguments: Vec<String>,
    pub description: String,
    pub working_dir: Option<String>,
    pub conditions: Vec<Condition>,
    pub always_execute: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutTask {
    pub repository: String,
    pub path: String,
    pub force_clean_build: bool,
    pub description: String,
}

/// Typed build step (`maven`, `junit`, `test_parser`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialTask {
    pub kind: String,
    pub executable: Option<String>,
    pub jdk: Option<String>,
    pub goal: Option<String>,
    pub tests: Option<String>,
    pub working_dir: Option<String>,
    /// Every remaining field, in document order
    pub parameters: IndexMap<String, EnvValue>,
    pub description: String,
    pub conditions: Vec<Condition>,
    pub always_execute: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRepository {
    pub url: String,
    pub branch: String,
    pub shared_credentials: Option<String>,
}
