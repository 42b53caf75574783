// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action definitions shared by windfiles and action files

use crate::target::{Lifecycle, Target};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An environment or parameter value: a scalar or a list of scalars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Scalar(String),
    List(Vec<String>),
}

impl EnvValue {
    /// Shell-friendly rendering; list items are joined with spaces
    pub fn render(&self) -> String {
        match self {
            EnvValue::Scalar(s) => s.clone(),
            EnvValue::List(items) => items.join(" "),
        }
    }

    /// Apply `f` to the scalar or to every list item
    pub fn map(&self, f: impl Fn(&str) -> String) -> EnvValue {
        match self {
            EnvValue::Scalar(s) => EnvValue::Scalar(f(s)),
            EnvValue::List(items) => EnvValue::List(items.iter().map(|i| f(i)).collect()),
        }
    }
}

impl From<&str> for EnvValue {
    fn from(s: &str) -> Self {
        EnvValue::Scalar(s.to_string())
    }
}

impl From<String> for EnvValue {
    fn from(s: String) -> Self {
        EnvValue::Scalar(s)
    }
}

/// Ordered environment variables
pub type Environment = IndexMap<String, EnvValue>;

/// Action parameters, either named or positional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameters {
    Map(IndexMap<String, EnvValue>),
    List(Vec<String>),
}

impl Parameters {
    pub fn is_empty(&self) -> bool {
        match self {
            Parameters::Map(m) => m.is_empty(),
            Parameters::List(l) => l.is_empty(),
        }
    }

    pub fn map_values(&self, f: impl Fn(&str) -> String) -> Parameters {
        match self {
            Parameters::Map(m) => {
                Parameters::Map(m.iter().map(|(k, v)| (k.clone(), v.map(&f))).collect())
            }
            Parameters::List(l) => Parameters::List(l.iter().map(|i| f(i)).collect()),
        }
    }
}

/// Container configuration for a job or a whole windfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Docker {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
}

impl Docker {
    /// Build from an `image[:tag]` reference; the tag defaults to `latest`
    pub fn from_reference(reference: &str) -> Self {
        let (image, tag) = match reference.split_once(':') {
            Some((image, tag)) => (image, tag),
            None => (reference, "latest"),
        };
        Self {
            image: image.to_string(),
            tag: Some(tag.to_string()),
            volumes: None,
            parameters: None,
        }
    }

    /// `image:tag`, appending `latest` when no tag is set
    pub fn reference(&self) -> String {
        if self.image.contains(':') {
            return self.image.clone();
        }
        format!("{}:{}", self.image, self.tag.as_deref().unwrap_or("latest"))
    }
}

/// Files a job leaves behind for collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub name: String,
    /// Glob, relative to the job's workdir
    pub path: String,
    /// Glob of files under `path` to leave out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<String>,
    /// Report format, e.g. `junit`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Collect before the script runs instead of after
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub before: bool,
}

impl JobResult {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ignore: None,
            kind: None,
            before: false,
        }
    }
}

/// Terminal form: an opaque script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalAction {
    pub script: String,
    /// Set when the script only applies to one target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Target>,
}

/// Script content read from a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAction {
    pub file: PathBuf,
}

/// Vendor-specific step, only consumed by the matching generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformAction {
    pub platform: Target,
    pub file: PathBuf,
}

/// Reference to an action file whose steps become jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalAction {
    #[serde(rename = "use")]
    pub uses: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionKind {
    Internal(InternalAction),
    Platform(PlatformAction),
    File(FileAction),
    External(ExternalAction),
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Internal(_) => "internal",
            ActionKind::Platform(_) => "platform",
            ActionKind::File(_) => "file",
            ActionKind::External(_) => "external",
        }
    }
}

/// A job or step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(flatten)]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_during: Option<Vec<Lifecycle>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker: Option<Docker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub run_always: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<JobResult>>,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            environment: None,
            parameters: None,
            exclude_during: None,
            docker: None,
            workdir: None,
            run_always: false,
            results: None,
        }
    }

    pub fn internal(script: impl Into<String>) -> Self {
        Self::new(ActionKind::Internal(InternalAction {
            script: script.into(),
            platform: None,
        }))
    }

    /// Same shared fields, different variant
    pub fn with_kind(&self, kind: ActionKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    pub fn as_internal(&self) -> Option<&InternalAction> {
        match &self.kind {
            ActionKind::Internal(internal) => Some(internal),
            _ => None,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.as_internal().is_some()
    }

    pub fn is_external(&self) -> bool {
        matches!(self.kind, ActionKind::External(_))
    }

    /// True when the action is tagged for a different target
    pub fn is_foreign_to(&self, target: Target) -> bool {
        match &self.kind {
            ActionKind::Internal(InternalAction {
                platform: Some(p), ..
            }) => *p != target,
            ActionKind::Platform(p) => p.platform != target,
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
