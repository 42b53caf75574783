// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema validation for windfiles and action files.
//!
//! Documents are parsed as YAML and checked field by field. Every violation
//! is collected with its path from the document root; a typed document is
//! only returned when there are none.

use crate::action::{
    Action, ActionKind, Docker, EnvValue, Environment, ExternalAction, FileAction,
    InternalAction, JobResult, Parameters, PlatformAction,
};
use crate::target::{Lifecycle, Target};
use crate::windfile::{ActionFile, Metadata, Repository, Windfile};
use indexmap::IndexMap;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::sync::LazyLock;

/// Pattern every job and step name must match
#[allow(clippy::expect_used)]
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._-]+$").expect("constant regex pattern is valid")
});

const ACTION_COMMON_KEYS: &[&str] = &[
    "environment",
    "parameters",
    "excludeDuring",
    "docker",
    "workdir",
    "runAlways",
    "results",
];

// =============================================================================
// Violations
// =============================================================================

/// One step of a field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a violation, from the document root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(pub Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Document is not parseable YAML
    Syntax,
    Missing,
    WrongType,
    PatternMismatch,
    UnknownVariant,
    UnknownField,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViolationKind::Syntax => "syntax",
            ViolationKind::Missing => "missing",
            ViolationKind::WrongType => "wrong-type",
            ViolationKind::PatternMismatch => "pattern-mismatch",
            ViolationKind::UnknownVariant => "unknown-variant",
            ViolationKind::UnknownField => "unknown-field",
        })
    }
}

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: FieldPath,
    pub kind: ViolationKind,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}

/// One `<path>: <message>` line per violation
impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// =============================================================================
// Entry points
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Windfile,
    ActionFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Windfile(Windfile),
    ActionFile(ActionFile),
}

/// Parse and type-check `text` as a document of `kind`
pub fn validate(text: &str, kind: DocumentKind) -> Result<Document, ValidationError> {
    match kind {
        DocumentKind::Windfile => validate_windfile(text).map(Document::Windfile),
        DocumentKind::ActionFile => validate_actionfile(text).map(Document::ActionFile),
    }
}

pub fn validate_windfile(text: &str) -> Result<Windfile, ValidationError> {
    let value = parse(text)?;
    let mut checker = Checker::default();
    let windfile = checker.windfile(&value, &FieldPath::root());
    let windfile = checker.finish(windfile)?;

    let external = windfile.external_jobs();
    if !external.is_empty() {
        tracing::info!(jobs = ?external, "external actions detected");
    }
    Ok(windfile)
}

pub fn validate_actionfile(text: &str) -> Result<ActionFile, ValidationError> {
    let value = parse(text)?;
    let mut checker = Checker::default();
    let actionfile = checker.actionfile(&value, &FieldPath::root());
    checker.finish(actionfile)
}

fn parse(text: &str) -> Result<Value, ValidationError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(text).map_err(|e| ValidationError {
        violations: vec![Violation {
            path: FieldPath::root(),
            kind: ViolationKind::Syntax,
            message: e.to_string(),
        }],
    })
}

// =============================================================================
// Field walker
// =============================================================================

#[derive(Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn finish<T>(self, value: Option<T>) -> Result<T, ValidationError> {
        match value {
            Some(value) if self.violations.is_empty() => Ok(value),
            _ => Err(ValidationError {
                violations: self.violations,
            }),
        }
    }

    fn report(&mut self, path: &FieldPath, kind: ViolationKind, message: impl Into<String>) {
        self.violations.push(Violation {
            path: path.clone(),
            kind,
            message: message.into(),
        });
    }

    fn windfile(&mut self, value: &Value, path: &FieldPath) -> Option<Windfile> {
        let map = self.mapping(value, path)?;
        self.reject_unknown(
            map,
            &["apiVersion", "metadata", "environment", "repositories", "jobs"],
            path,
        );

        let api_version = self.required_string(map, "apiVersion", path);
        let metadata = self
            .required(map, "metadata", path)
            .and_then(|v| self.metadata(v, &path.key("metadata")));
        let environment = self.optional(map, "environment", path, Self::environment);
        let repositories = self.optional(map, "repositories", path, Self::repositories);
        let jobs = self
            .required(map, "jobs", path)
            .and_then(|v| self.actions(v, &path.key("jobs")));

        Some(Windfile {
            api_version: api_version?,
            metadata: metadata?,
            environment: environment?,
            repositories: repositories?,
            jobs: jobs?,
        })
    }

    fn actionfile(&mut self, value: &Value, path: &FieldPath) -> Option<ActionFile> {
        let map = self.mapping(value, path)?;
        self.reject_unknown(map, &["apiVersion", "metadata", "steps"], path);

        let api_version = self.required_string(map, "apiVersion", path);
        let metadata = self
            .required(map, "metadata", path)
            .and_then(|v| self.metadata(v, &path.key("metadata")));
        let steps = self
            .required(map, "steps", path)
            .and_then(|v| self.actions(v, &path.key("steps")));

        Some(ActionFile {
            api_version: api_version?,
            metadata: metadata?,
            steps: steps?,
        })
    }

    fn metadata(&mut self, value: &Value, path: &FieldPath) -> Option<Metadata> {
        let map = self.mapping(value, path)?;
        self.reject_unknown(
            map,
            &[
                "name",
                "description",
                "author",
                "id",
                "targets",
                "docker",
                "gitCredentials",
            ],
            path,
        );

        let name = self.required_string(map, "name", path);
        let description = self.required_string(map, "description", path);
        let author = self.required_string(map, "author", path);
        let id = self.optional(map, "id", path, Self::string);
        let targets = self.optional(map, "targets", path, Self::targets);
        let docker = self.optional(map, "docker", path, Self::docker);
        let git_credentials = self.optional(map, "gitCredentials", path, Self::string);

        Some(Metadata {
            name: name?,
            description: description?,
            author: author?,
            id: id?,
            targets: targets?,
            docker: docker?,
            git_credentials: git_credentials?,
        })
    }

    fn actions(&mut self, value: &Value, path: &FieldPath) -> Option<IndexMap<String, Action>> {
        let map = self.mapping(value, path)?;
        let mut actions = IndexMap::new();
        let mut complete = true;
        for (key, value) in map {
            let Some(name) = self.name(key, path) else {
                complete = false;
                continue;
            };
            match self.action(value, &path.key(name.as_str())) {
                Some(action) => {
                    actions.insert(name, action);
                }
                None => complete = false,
            }
        }
        complete.then_some(actions)
    }

    fn name(&mut self, key: &Value, path: &FieldPath) -> Option<String> {
        let Some(name) = key.as_str() else {
            self.report(
                path,
                ViolationKind::WrongType,
                format!("name {} must be a string", describe(key)),
            );
            return None;
        };
        if !NAME_PATTERN.is_match(name) {
            self.report(
                &path.key(name),
                ViolationKind::PatternMismatch,
                format!("name '{}' does not match {}", name, NAME_PATTERN.as_str()),
            );
            return None;
        }
        Some(name.to_string())
    }

    fn action(&mut self, value: &Value, path: &FieldPath) -> Option<Action> {
        let map = self.mapping(value, path)?;

        let discriminators: Vec<&str> = ["script", "file", "use"]
            .into_iter()
            .filter(|k| map.contains_key(*k))
            .collect();
        let variant = match discriminators.as_slice() {
            [one] => *one,
            [] => {
                self.report(
                    path,
                    ViolationKind::UnknownVariant,
                    "action must define one of 'script', 'file' or 'use'",
                );
                return None;
            }
            many => {
                self.report(
                    path,
                    ViolationKind::UnknownVariant,
                    format!("action defines conflicting keys: {}", many.join(", ")),
                );
                return None;
            }
        };
        if variant == "use" && map.contains_key("platform") {
            self.report(
                &path.key("platform"),
                ViolationKind::UnknownVariant,
                "'platform' cannot be combined with 'use'",
            );
            return None;
        }

        let mut allowed: Vec<&str> = ACTION_COMMON_KEYS.to_vec();
        allowed.push(variant);
        if variant != "use" {
            allowed.push("platform");
        }
        self.reject_unknown(map, &allowed, path);

        let platform = self.optional(map, "platform", path, Self::target);
        let payload = self.required_string(map, variant, path);
        let kind = match (variant, payload, platform) {
            ("script", Some(script), Some(platform)) => {
                Some(ActionKind::Internal(InternalAction { script, platform }))
            }
            ("file", Some(file), Some(Some(platform))) => {
                Some(ActionKind::Platform(PlatformAction {
                    platform,
                    file: file.into(),
                }))
            }
            ("file", Some(file), Some(None)) => {
                Some(ActionKind::File(FileAction { file: file.into() }))
            }
            ("use", Some(uses), _) => Some(ActionKind::External(ExternalAction {
                uses: uses.into(),
            })),
            _ => None,
        };

        let environment = self.optional(map, "environment", path, Self::environment);
        let parameters = self.optional(map, "parameters", path, Self::parameters);
        let exclude_during = self.optional(map, "excludeDuring", path, Self::lifecycles);
        let docker = self.optional(map, "docker", path, Self::docker);
        let workdir = self.optional(map, "workdir", path, Self::string);
        let run_always = self.optional(map, "runAlways", path, Self::boolean);
        let results = self.optional(map, "results", path, Self::results);

        Some(Action {
            kind: kind?,
            environment: environment?,
            parameters: parameters?,
            exclude_during: exclude_during?,
            docker: docker?,
            workdir: workdir?,
            run_always: run_always?.unwrap_or(false),
            results: results?,
        })
    }

    fn results(&mut self, value: &Value, path: &FieldPath) -> Option<Vec<JobResult>> {
        self.sequence(value, path, |checker, item, path| {
            let map = checker.mapping(item, path)?;
            checker.reject_unknown(map, &["name", "path", "ignore", "type", "before"], path);

            let name = checker.required_string(map, "name", path);
            let result_path = checker.required_string(map, "path", path);
            let ignore = checker.optional(map, "ignore", path, Self::string);
            let kind = checker.optional(map, "type", path, Self::string);
            let before = checker.optional(map, "before", path, Self::boolean);

            Some(JobResult {
                name: name?,
                path: result_path?,
                ignore: ignore?,
                kind: kind?,
                before: before?.unwrap_or(false),
            })
        })
    }

    fn docker(&mut self, value: &Value, path: &FieldPath) -> Option<Docker> {
        let map = self.mapping(value, path)?;
        self.reject_unknown(map, &["image", "tag", "volumes", "parameters"], path);

        let image = self.required_string(map, "image", path);
        let tag = self.optional(map, "tag", path, Self::scalar);
        let volumes = self.optional(map, "volumes", path, Self::strings);
        let parameters = self.optional(map, "parameters", path, Self::strings);

        Some(Docker {
            image: image?,
            tag: tag?,
            volumes: volumes?,
            parameters: parameters?,
        })
    }

    fn repositories(
        &mut self,
        value: &Value,
        path: &FieldPath,
    ) -> Option<IndexMap<String, Repository>> {
        let map = self.mapping(value, path)?;
        let mut repositories = IndexMap::new();
        let mut complete = true;
        for (key, value) in map {
            let Some(name) = self.name(key, path) else {
                complete = false;
                continue;
            };
            let path = path.key(name.as_str());
            let Some(repo) = self.mapping(value, &path) else {
                complete = false;
                continue;
            };
            self.reject_unknown(repo, &["url", "branch", "path"], &path);
            let url = self.required_string(repo, "url", &path);
            let branch = self.required_string(repo, "branch", &path);
            let repo_path = self.required_string(repo, "path", &path);
            match (url, branch, repo_path) {
                (Some(url), Some(branch), Some(repo_path)) => {
                    repositories.insert(
                        name,
                        Repository {
                            url,
                            branch,
                            path: repo_path,
                        },
                    );
                }
                _ => complete = false,
            }
        }
        complete.then_some(repositories)
    }

    fn environment(&mut self, value: &Value, path: &FieldPath) -> Option<Environment> {
        let map = self.mapping(value, path)?;
        let mut environment = Environment::new();
        let mut complete = true;
        for (key, value) in map {
            let Some(key) = self.scalar(key, path) else {
                complete = false;
                continue;
            };
            match self.env_value(value, &path.key(key.as_str())) {
                Some(value) => {
                    environment.insert(key, value);
                }
                None => complete = false,
            }
        }
        complete.then_some(environment)
    }

    fn parameters(&mut self, value: &Value, path: &FieldPath) -> Option<Parameters> {
        match value {
            Value::Sequence(_) => self.strings(value, path).map(Parameters::List),
            Value::Mapping(_) => self.environment(value, path).map(Parameters::Map),
            other => {
                self.report(
                    path,
                    ViolationKind::WrongType,
                    format!("expected a mapping or a list, found {}", describe(other)),
                );
                None
            }
        }
    }

    fn env_value(&mut self, value: &Value, path: &FieldPath) -> Option<EnvValue> {
        match value {
            Value::Sequence(_) => self.strings(value, path).map(EnvValue::List),
            other => self.scalar(other, path).map(EnvValue::Scalar),
        }
    }

    fn lifecycles(&mut self, value: &Value, path: &FieldPath) -> Option<Vec<Lifecycle>> {
        self.sequence(value, path, |checker, item, path| {
            let name = checker.string(item, path)?;
            match name.parse::<Lifecycle>() {
                Ok(lifecycle) => Some(lifecycle),
                Err(message) => {
                    checker.report(path, ViolationKind::UnknownVariant, message);
                    None
                }
            }
        })
    }

    fn targets(&mut self, value: &Value, path: &FieldPath) -> Option<Vec<Target>> {
        self.sequence(value, path, Self::target)
    }

    fn target(&mut self, value: &Value, path: &FieldPath) -> Option<Target> {
        let name = self.string(value, path)?;
        match name.parse::<Target>() {
            Ok(target) => Some(target),
            Err(message) => {
                self.report(path, ViolationKind::UnknownVariant, message);
                None
            }
        }
    }

    fn strings(&mut self, value: &Value, path: &FieldPath) -> Option<Vec<String>> {
        self.sequence(value, path, Self::scalar)
    }

    fn sequence<T>(
        &mut self,
        value: &Value,
        path: &FieldPath,
        item: impl Fn(&mut Self, &Value, &FieldPath) -> Option<T>,
    ) -> Option<Vec<T>> {
        let Value::Sequence(items) = value else {
            self.report(
                path,
                ViolationKind::WrongType,
                format!("expected a list, found {}", describe(value)),
            );
            return None;
        };
        let mut out = Vec::with_capacity(items.len());
        let mut complete = true;
        for (i, value) in items.iter().enumerate() {
            match item(self, value, &path.index(i)) {
                Some(v) => out.push(v),
                None => complete = false,
            }
        }
        complete.then_some(out)
    }

    // -------------------------------------------------------------------------
    // Primitives
    // -------------------------------------------------------------------------

    fn mapping<'a>(&mut self, value: &'a Value, path: &FieldPath) -> Option<&'a Mapping> {
        match value {
            Value::Mapping(map) => Some(map),
            other => {
                self.report(
                    path,
                    ViolationKind::WrongType,
                    format!("expected a mapping, found {}", describe(other)),
                );
                None
            }
        }
    }

    fn required<'a>(&mut self, map: &'a Mapping, key: &str, path: &FieldPath) -> Option<&'a Value> {
        let value = map.get(key);
        if value.is_none() {
            self.report(
                &path.key(key),
                ViolationKind::Missing,
                format!("missing required field '{}'", key),
            );
        }
        value
    }

    fn required_string(&mut self, map: &Mapping, key: &str, path: &FieldPath) -> Option<String> {
        let value = self.required(map, key, path)?;
        self.string(value, &path.key(key))
    }

    /// `Some(None)` when absent, `None` when present but invalid
    fn optional<T>(
        &mut self,
        map: &Mapping,
        key: &str,
        path: &FieldPath,
        parse: impl Fn(&mut Self, &Value, &FieldPath) -> Option<T>,
    ) -> Option<Option<T>> {
        match map.get(key) {
            None => Some(None),
            Some(value) => parse(self, value, &path.key(key)).map(Some),
        }
    }

    fn string(&mut self, value: &Value, path: &FieldPath) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.report(
                    path,
                    ViolationKind::WrongType,
                    format!("expected a string, found {}", describe(other)),
                );
                None
            }
        }
    }

    /// Strings, numbers and booleans, normalized to their string form
    fn scalar(&mut self, value: &Value, path: &FieldPath) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => {
                self.report(
                    path,
                    ViolationKind::WrongType,
                    format!("expected a scalar, found {}", describe(other)),
                );
                None
            }
        }
    }

    fn boolean(&mut self, value: &Value, path: &FieldPath) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            other => {
                self.report(
                    path,
                    ViolationKind::WrongType,
                    format!("expected a boolean, found {}", describe(other)),
                );
                None
            }
        }
    }

    fn reject_unknown(&mut self, map: &Mapping, allowed: &[&str], path: &FieldPath) {
        for key in map.keys() {
            match key.as_str() {
                Some(k) if allowed.contains(&k) => {}
                Some(k) => self.report(
                    &path.key(k),
                    ViolationKind::UnknownField,
                    format!("unknown field '{}'", k),
                ),
                None => self.report(
                    path,
                    ViolationKind::WrongType,
                    format!("field name {} must be a string", describe(key)),
                ),
            }
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
