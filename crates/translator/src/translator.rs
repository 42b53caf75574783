// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bamboo plan graph -> windfile

use crate::consolidate::{clean_up, consolidate_docker};
use crate::parser::parse_plan;
use crate::plan::*;
use aeolus_core::{
    Action, ActionKind, Direction, Docker, EnvValue, Environment, EnvironmentTable, FetchError,
    InternalAction, JobResult, Lifecycle, Metadata, Parameters, PlanGraphFetcher, Repository,
    Target, Windfile,
};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Strips a condition's matcher down to lifecycle names and `|`
#[allow(clippy::expect_used)]
static LIFECYCLE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z |_]").expect("constant regex pattern is valid"));

/// Fields of a maven task that are folded into its script
const MAVEN_FIELDS: [&str; 5] = ["executable", "jdk", "goal", "tests", "working_dir"];

/// Script of an action that only exists to carry test results
const RESULTS_ONLY_SCRIPT: &str = "#empty script action, just for the results";

/// Errors that abort a translation
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("missing field: {path}")]
    MissingField { path: String },

    #[error("malformed field {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("job {job} uses unsupported task '{kind}'")]
    UnsupportedTask { job: String, kind: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

pub struct Translator<F> {
    fetcher: F,
    table: EnvironmentTable,
}

impl<F: PlanGraphFetcher> Translator<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            table: EnvironmentTable::for_target(Target::Bamboo),
        }
    }

    pub fn with_environment(mut self, table: EnvironmentTable) -> Self {
        self.table = table;
        self
    }

    /// Fetch the plan `plan_key` and rebuild it as a windfile
    pub fn translate(&self, plan_key: &str) -> Result<Windfile, TranslateError> {
        tracing::info!(plan = plan_key, "fetching plan");
        let code = self.fetcher.fetch(plan_key)?;
        let graph = parse_plan(&code)?;
        self.translate_graph(plan_key, &graph)
    }

    pub fn translate_graph(
        &self,
        plan_key: &str,
        graph: &PlanGraph,
    ) -> Result<Windfile, TranslateError> {
        let mut metadata = Metadata::new(
            graph.plan.name.clone(),
            graph.plan.description.clone(),
            "bamboo",
        );
        metadata.id = Some(plan_key.to_string());
        metadata.git_credentials = graph
            .repositories
            .values()
            .next()
            .and_then(|r| r.shared_credentials.clone());

        let mut windfile = Windfile::new(metadata);
        let mut repositories = IndexMap::new();

        for (stage_name, stage) in &graph.stages {
            for (job_name, job) in &stage.jobs {
                tracing::debug!(stage = %stage_name, job = %job_name, tasks = job.tasks.len(), "translating job");
                let docker = job.docker.as_ref().map(|d| self.docker(d));
                let mut actions = Vec::new();
                let mut reports = Vec::new();
                for task in &job.tasks {
                    let action = match task {
                        Task::Checkout(checkout) => {
                            let repository = self.repository(graph, checkout)?;
                            repositories.insert(checkout.repository.clone(), repository);
                            continue;
                        }
                        Task::Script(script) => self.script_action(script)?,
                        Task::Special(special) if special.kind == "maven" => {
                            self.maven_action(special)?
                        }
                        Task::Special(special) => {
                            reports.push(special);
                            continue;
                        }
                    };
                    actions.push(action);
                }

                if let Some(last) = actions.last_mut() {
                    if !job.artifacts.is_empty() {
                        last.results = Some(job.artifacts.iter().map(artifact_result).collect());
                    }
                }
                for report in reports {
                    self.fold_report(&mut actions, report)?;
                }

                for (index, mut action) in actions.into_iter().enumerate() {
                    action.docker = docker.clone();
                    let name = format!("{}{}", job.key.to_lowercase(), index + 1);
                    if windfile.jobs.insert(name.clone(), action).is_some() {
                        tracing::warn!(job = %name, "duplicate job key replaced");
                    }
                }
            }
        }

        if !repositories.is_empty() {
            windfile.repositories = Some(repositories);
        }
        consolidate_docker(&mut windfile);
        clean_up(&mut windfile);
        tracing::info!(plan = plan_key, jobs = windfile.jobs.len(), "translated plan");
        Ok(windfile)
    }

    fn repository(
        &self,
        graph: &PlanGraph,
        checkout: &CheckoutTask,
    ) -> Result<Repository, TranslateError> {
        let declared = graph
            .repositories
            .get(&checkout.repository)
            .ok_or_else(|| TranslateError::MissingField {
                path: format!("repositories.{}", checkout.repository),
            })?;
        Ok(Repository {
            url: declared.url.clone(),
            branch: declared.branch.clone(),
            path: checkout.path.clone(),
        })
    }

    fn script_action(&self, task: &ScriptTask) -> Result<Action, TranslateError> {
        let script = self.reverse(&task.scripts.concat());
        let mut action = Action::new(ActionKind::Internal(InternalAction {
            script: script.trim_matches('"').to_string(),
            platform: None,
        }));
        action.environment = Some(
            task.environment
                .iter()
                .map(|(k, v)| (k.clone(), EnvValue::Scalar(self.reverse(v))))
                .collect::<Environment>(),
        );
        action.parameters = Some(Parameters::Map(self.arguments(&task.arguments)));
        action.exclude_during = Some(exclusions(&task.conditions)?);
        action.workdir = task.working_dir.clone();
        action.run_always = task.always_execute;
        Ok(action)
    }

    fn maven_action(&self, task: &SpecialTask) -> Result<Action, TranslateError> {
        let mut action = Action::new(ActionKind::Internal(InternalAction {
            script: format!("mvn {}", task.goal.as_deref().unwrap_or_default()),
            platform: None,
        }));
        let parameters: IndexMap<String, EnvValue> = task
            .parameters
            .iter()
            .filter(|(key, _)| !MAVEN_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.map(|s| self.reverse(s))))
            .collect();
        action.parameters = Some(Parameters::Map(parameters));
        action.exclude_during = Some(exclusions(&task.conditions)?);
        action.workdir = task.working_dir.clone();
        action.run_always = task.always_execute;
        Ok(action)
    }

    /// Attach the test reports of a `junit` or `test_parser` task to the
    /// last script of its job that runs under the same conditions, or to a
    /// new script that does nothing else.
    fn fold_report(
        &self,
        actions: &mut Vec<Action>,
        task: &SpecialTask,
    ) -> Result<(), TranslateError> {
        let paths = match task.parameters.get("test_results") {
            Some(EnvValue::Scalar(path)) => vec![path.clone()],
            Some(EnvValue::List(paths)) => paths.clone(),
            None => {
                tracing::warn!(kind = %task.kind, "test report task without test results, skipped");
                return Ok(());
            }
        };
        let results: Vec<JobResult> = paths
            .iter()
            .map(|path| {
                let name = format!("{}_{}", task.kind, path);
                let mut result = JobResult::new(name, self.reverse(path));
                result.kind = Some(task.kind.clone());
                result
            })
            .collect();

        let exclude_during = Some(exclusions(&task.conditions)?);
        let host = actions.iter_mut().rev().find(|action| {
            action.as_internal().is_some()
                && action.exclude_during == exclude_during
                && action.run_always == task.always_execute
                && action.workdir == task.working_dir
        });
        match host {
            Some(action) => action.results.get_or_insert_with(Vec::new).extend(results),
            None => {
                let mut action = Action::new(ActionKind::Internal(InternalAction {
                    script: RESULTS_ONLY_SCRIPT.to_string(),
                    platform: None,
                }));
                action.exclude_during = exclude_during;
                action.workdir = task.working_dir.clone();
                action.run_always = task.always_execute;
                action.results = Some(results);
                actions.push(action);
            }
        }
        Ok(())
    }

    /// Each argument word becomes a parameter named after itself
    fn arguments(&self, arguments: &[String]) -> IndexMap<String, EnvValue> {
        arguments
            .iter()
            .map(|arg| (arg.clone(), EnvValue::Scalar(self.reverse(arg))))
            .collect()
    }

    fn docker(&self, config: &DockerConfig) -> Docker {
        let mut docker = Docker::from_reference(&config.image);
        let volumes: Vec<String> = config
            .volumes
            .iter()
            .map(|(host, container)| format!("{}:{}", self.reverse(host), self.reverse(container)))
            .collect();
        let parameters = self
            .table
            .substitute_list(&config.docker_run_arguments, Direction::Reverse);
        docker.volumes = Some(volumes).filter(|v| !v.is_empty());
        docker.parameters = Some(parameters).filter(|p| !p.is_empty());
        docker
    }

    fn reverse(&self, text: &str) -> String {
        self.table.substitute(text, Direction::Reverse)
    }
}

/// Artifacts keep their name; the path joins location and pattern
fn artifact_result(artifact: &Artifact) -> JobResult {
    let path = match artifact.location.trim_end_matches('/') {
        "" => artifact.pattern.clone(),
        location => format!("{}/{}", location, artifact.pattern),
    };
    let mut result = JobResult::new(artifact.name.clone(), path);
    result.ignore = artifact.exclusion.clone();
    result
}

/// Lifecycle phases named by the matchers of `conditions`
fn exclusions(conditions: &[Condition]) -> Result<Vec<Lifecycle>, TranslateError> {
    let mut exclude = Vec::new();
    for condition in conditions {
        for (variable, matcher) in &condition.matches {
            let names = LIFECYCLE_CHARS.replace_all(matcher, "");
            for name in names.split('|').map(str::trim).filter(|n| !n.is_empty()) {
                let phase = name.parse::<Lifecycle>().map_err(|e| TranslateError::Malformed {
                    path: format!("conditions.{}", variable),
                    message: e,
                })?;
                exclude.push(phase);
            }
        }
    }
    Ok(exclude)
}

#[cfg(test)]
#[path = "translator_tests.rs"]
mod tests;
