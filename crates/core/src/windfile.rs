// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Windfile and action file documents

use crate::action::{Action, Docker, Environment};
use crate::target::Target;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Descriptive metadata shared by windfiles and action files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    pub description: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<Target>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker: Option<Docker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_credentials: Option<String>,
}

impl Metadata {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            author: author.into(),
            id: None,
            targets: None,
            docker: None,
            git_credentials: None,
        }
    }
}

/// A repository checked out before the jobs run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub url: String,
    pub branch: String,
    pub path: String,
}

/// Top-level pipeline document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Windfile {
    pub api_version: String,
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repositories: Option<IndexMap<String, Repository>>,
    /// Emission order is insertion order
    pub jobs: IndexMap<String, Action>,
}

impl Windfile {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            api_version: crate::API_VERSION.to_string(),
            metadata,
            environment: None,
            repositories: None,
            jobs: IndexMap::new(),
        }
    }

    /// Names of jobs that still reference an action file
    pub fn external_jobs(&self) -> Vec<&str> {
        self.jobs
            .iter()
            .filter(|(_, action)| action.is_external())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// True once every job is an internal action
    pub fn is_resolved(&self) -> bool {
        self.jobs.values().all(Action::is_internal)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Shareable bundle of steps referenced by an external action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionFile {
    pub api_version: String,
    pub metadata: Metadata,
    pub steps: IndexMap<String, Action>,
}
