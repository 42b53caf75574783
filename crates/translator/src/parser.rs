// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parser for the YAML export of a Bamboo plan.
//!
//! Bamboo spells keys with dashes (`final-tasks`); lookups here accept dashes
//! and underscores alike.

use crate::plan::*;
use crate::TranslateError;
use aeolus_core::EnvValue;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

/// Separates the plan from the permissions document that follows it
const DOCUMENT_SEPARATOR: &str = "\n---\n";

const SPECIAL_TASKS: [&str; 3] = ["maven", "junit", "test_parser"];

/// Parse the plan part of a Bamboo YAML export
pub fn parse_plan(code: &str) -> Result<PlanGraph, TranslateError> {
    let specs = code.split(DOCUMENT_SEPARATOR).next().unwrap_or(code);
    let root: Value =
        serde_yaml::from_str(specs).map_err(|e| malformed("(root)", e.to_string()))?;
    let root = mapping(&root, "(root)")?;

    let plan = parse_header(required(root, "plan", "")?)?;
    let repositories = match field(root, "repositories") {
        Some(value) => parse_repositories(value)?,
        None => IndexMap::new(),
    };

    let mut stages = IndexMap::new();
    for (index, entry) in sequence(required(root, "stages", "")?, "stages")?
        .iter()
        .enumerate()
    {
        let path = format!("stages[{}]", index);
        let (name, body) = single_entry(entry, &path)?;
        let path = format!("{}.{}", path, name);
        let body = mapping(body, &path)?;
        let job_path = format!("{}.jobs", path);
        let mut jobs = IndexMap::new();
        for job_name in sequence(required(body, "jobs", &path)?, &job_path)? {
            let job_name = scalar(job_name, &job_path)?;
            let job = parse_job(required(root, &job_name, "")?, &job_name)?;
            jobs.insert(job_name, job);
        }
        stages.insert(name, Stage { jobs });
    }

    tracing::debug!(
        plan = %plan.key,
        stages = stages.len(),
        repositories = repositories.len(),
        "parsed plan document"
    );
    Ok(PlanGraph {
        plan,
        stages,
        repositories,
    })
}

fn parse_header(value: &Value) -> Result<Plan, TranslateError> {
    let plan = mapping(value, "plan")?;
    Ok(Plan {
        project_key: optional_scalar(plan, "project_key", "plan")?,
        key: required_scalar(plan, "key", "plan")?,
        name: required_scalar(plan, "name", "plan")?,
        description: optional_scalar(plan, "description", "plan")?.unwrap_or_default(),
    })
}

fn parse_repositories(value: &Value) -> Result<IndexMap<String, PlanRepository>, TranslateError> {
    let mut repositories = IndexMap::new();
    for (index, entry) in sequence(value, "repositories")?.iter().enumerate() {
        let path = format!("repositories[{}]", index);
        let (name, body) = single_entry(entry, &path)?;
        let path = format!("repositories.{}", name);
        let body = mapping(body, &path)?;
        repositories.insert(
            name,
            PlanRepository {
                url: required_scalar(body, "url", &path)?,
                branch: required_scalar(body, "branch", &path)?,
                shared_credentials: optional_scalar(body, "shared_credentials", &path)?,
            },
        );
    }
    Ok(repositories)
}

fn parse_job(value: &Value, path: &str) -> Result<Job, TranslateError> {
    let job = mapping(value, path)?;
    let docker = match field(job, "docker") {
        Some(docker) => Some(parse_docker(docker, &format!("{}.docker", path))?),
        None => None,
    };

    let tasks_path = format!("{}.tasks", path);
    let mut tasks = Vec::new();
    for (index, task) in sequence(required(job, "tasks", path)?, &tasks_path)?
        .iter()
        .enumerate()
    {
        tasks.push(parse_task(task, path, &format!("{}[{}]", tasks_path, index), false)?);
    }
    if let Some(finals) = field(job, "final_tasks") {
        let finals_path = format!("{}.final_tasks", path);
        for (index, task) in sequence(finals, &finals_path)?.iter().enumerate() {
            tasks.push(parse_task(task, path, &format!("{}[{}]", finals_path, index), true)?);
        }
    }

    let artifacts = match field(job, "artifacts") {
        Some(value) => parse_artifacts(value, &format!("{}.artifacts", path))?,
        None => Vec::new(),
    };

    Ok(Job {
        key: required_scalar(job, "key", path)?,
        tasks,
        docker,
        artifacts,
        other: field(job, "other").and_then(Value::as_mapping).cloned(),
    })
}

fn parse_artifacts(value: &Value, path: &str) -> Result<Vec<Artifact>, TranslateError> {
    let mut artifacts = Vec::new();
    for (index, entry) in sequence(value, path)?.iter().enumerate() {
        let path = format!("{}[{}]", path, index);
        let body = mapping(entry, &path)?;
        artifacts.push(Artifact {
            name: required_scalar(body, "name", &path)?,
            location: optional_scalar(body, "location", &path)?.unwrap_or_default(),
            pattern: required_scalar(body, "pattern", &path)?,
            exclusion: optional_scalar(body, "exclusion", &path)?,
        });
    }
    Ok(artifacts)
}

fn parse_docker(value: &Value, path: &str) -> Result<DockerConfig, TranslateError> {
    let docker = mapping(value, path)?;
    let mut volumes = IndexMap::new();
    if let Some(value) = field(docker, "volumes").filter(|v| !v.is_null()) {
        let volume_path = format!("{}.volumes", path);
        for (host, container) in mapping(value, &volume_path)? {
            volumes.insert(scalar(host, &volume_path)?, scalar(container, &volume_path)?);
        }
    }
    Ok(DockerConfig {
        image: required_scalar(docker, "image", path)?,
        volumes,
        docker_run_arguments: optional_strings(docker, "docker_run_arguments", path)?,
    })
}

/// `final` tasks always execute, regardless of what the task says
fn parse_task(
    value: &Value,
    job: &str,
    path: &str,
    final_task: bool,
) -> Result<Task, TranslateError> {
    let (kind, body) = single_entry(value, path)?;
    let empty = Mapping::new();
    let body = match body {
        Value::Null => &empty,
        other => mapping(other, path)?,
    };
    // final tasks may name their kind in a `type` field
    let kind = match optional_scalar(body, "type", path)? {
        Some(declared) if final_task => declared,
        _ => kind,
    }
    .replace('-', "_");
    let always_execute = final_task || optional_bool(body, "always_execute", path)?.unwrap_or(false);
    let description = optional_scalar(body, "description", path)?.unwrap_or_default();

    match kind.as_str() {
        "script" => Ok(Task::Script(ScriptTask {
            interpreter: required_scalar(body, "interpreter", path)?,
            scripts: optional_strings(body, "scripts", path)?,
            environment: parse_environment(body, path)?,
            arguments: optional_scalar(body, "argument", path)?
                .map(|a| a.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            description,
            working_dir: optional_scalar(body, "working_dir", path)?.filter(|d| !d.is_empty()),
            conditions: parse_conditions(body, path)?,
            always_execute,
        })),
        "checkout" => Ok(Task::Checkout(CheckoutTask {
            repository: required_scalar(body, "repository", path)?,
            path: optional_scalar(body, "path", path)?
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| ".".to_string()),
            force_clean_build: optional_bool(body, "force_clean_build", path)?.unwrap_or(false),
            description,
        })),
        special if SPECIAL_TASKS.contains(&special) => {
            let mut parameters = IndexMap::new();
            for (key, value) in body {
                let key = scalar(key, path)?.replace('-', "_");
                if matches!(
                    key.as_str(),
                    "type" | "description" | "always_execute" | "conditions"
                ) {
                    continue;
                }
                if let Some(value) = env_value(value) {
                    parameters.insert(key, value);
                }
            }
            Ok(Task::Special(SpecialTask {
                kind: special.to_string(),
                executable: optional_scalar(body, "executable", path)?,
                jdk: optional_scalar(body, "jdk", path)?,
                goal: optional_scalar(body, "goal", path)?,
                tests: optional_scalar(body, "tests", path)?,
                working_dir: optional_scalar(body, "working_dir", path)?,
                parameters,
                description,
                conditions: parse_conditions(body, path)?,
                always_execute,
            }))
        }
        other => Err(TranslateError::UnsupportedTask {
            job: job.to_string(),
            kind: other.to_string(),
        }),
    }
}

/// `"K=V;K2=V2"`
fn parse_environment(body: &Mapping, path: &str) -> Result<IndexMap<String, String>, TranslateError> {
    let mut environment = IndexMap::new();
    let Some(text) = optional_scalar(body, "environment", path)? else {
        return Ok(environment);
    };
    for entry in text.split(';').filter(|e| !e.trim().is_empty()) {
        let (key, value) = entry.split_once('=').ok_or_else(|| {
            malformed(
                &format!("{}.environment", path),
                format!("expected KEY=VALUE, found '{}'", entry),
            )
        })?;
        environment.insert(key.trim().to_string(), value.to_string());
    }
    Ok(environment)
}

/// `[{variable: {matches: {name: regex}}}]`
fn parse_conditions(body: &Mapping, path: &str) -> Result<Vec<Condition>, TranslateError> {
    let Some(value) = field(body, "conditions") else {
        return Ok(Vec::new());
    };
    let path = format!("{}.conditions", path);
    let mut conditions = Vec::new();
    for entry in sequence(value, &path)? {
        let Some(entry) = entry.as_mapping() else {
            continue;
        };
        let Some(variable) = field(entry, "variable").and_then(Value::as_mapping) else {
            continue;
        };
        let mut matches = IndexMap::new();
        if let Some(found) = field(variable, "matches") {
            for (name, regex) in mapping(found, &path)? {
                matches.insert(scalar(name, &path)?, scalar(regex, &path)?);
            }
        }
        conditions.push(Condition { matches });
    }
    Ok(conditions)
}

fn env_value(value: &Value) -> Option<EnvValue> {
    match value {
        Value::Sequence(items) => Some(EnvValue::List(
            items.iter().filter_map(scalar_text).collect(),
        )),
        other => scalar_text(other).map(EnvValue::Scalar),
    }
}

// Value access helpers

/// Look up `key`, treating `-` and `_` as the same character
fn field<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| {
            k.as_str()
                .is_some_and(|k| k.replace('-', "_") == key.replace('-', "_"))
        })
        .map(|(_, v)| v)
}

fn required<'a>(map: &'a Mapping, key: &str, path: &str) -> Result<&'a Value, TranslateError> {
    field(map, key).ok_or_else(|| missing(path, key))
}

fn required_scalar(map: &Mapping, key: &str, path: &str) -> Result<String, TranslateError> {
    let value = required(map, key, path)?;
    scalar(value, &join(path, key))
}

fn optional_scalar(map: &Mapping, key: &str, path: &str) -> Result<Option<String>, TranslateError> {
    match field(map, key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar(value, &join(path, key)).map(Some),
    }
}

fn optional_bool(map: &Mapping, key: &str, path: &str) -> Result<Option<bool>, TranslateError> {
    match field(map, key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) if s == "true" || s == "false" => Ok(Some(s == "true")),
        Some(_) => Err(malformed(&join(path, key), "expected a boolean")),
    }
}

fn optional_strings(map: &Mapping, key: &str, path: &str) -> Result<Vec<String>, TranslateError> {
    match field(map, key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => {
            let path = join(path, key);
            sequence(value, &path)?
                .iter()
                .map(|item| scalar(item, &path))
                .collect()
        }
    }
}

fn mapping<'a>(value: &'a Value, path: &str) -> Result<&'a Mapping, TranslateError> {
    value
        .as_mapping()
        .ok_or_else(|| malformed(path, "expected a mapping"))
}

fn sequence<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, TranslateError> {
    value
        .as_sequence()
        .ok_or_else(|| malformed(path, "expected a list"))
}

fn scalar(value: &Value, path: &str) -> Result<String, TranslateError> {
    scalar_text(value).ok_or_else(|| malformed(path, "expected a scalar"))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A map with exactly one key, as used for stages, tasks and repositories
fn single_entry<'a>(value: &'a Value, path: &str) -> Result<(String, &'a Value), TranslateError> {
    let map = mapping(value, path)?;
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some((key, value)), None) => Ok((scalar(key, path)?, value)),
        _ => Err(malformed(path, "expected a single-key mapping")),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn missing(path: &str, key: &str) -> TranslateError {
    TranslateError::MissingField {
        path: join(path, key),
    }
}

fn malformed(path: &str, message: impl Into<String>) -> TranslateError {
    TranslateError::Malformed {
        path: path.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
