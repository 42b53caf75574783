// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative Jenkins pipeline

use crate::base::{jobs_for, prepare, GenerateError, Generator, Lines};
use aeolus_core::{
    Action, Docker, EnvironmentTable, InternalAction, Lifecycle, Parameters, Repository, Target,
    Windfile,
};
use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct JenkinsGenerator {
    table: EnvironmentTable,
}

impl Default for JenkinsGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl JenkinsGenerator {
    pub fn new() -> Self {
        Self::with_environment(EnvironmentTable::for_target(Target::Jenkins))
    }

    pub fn with_environment(table: EnvironmentTable) -> Self {
        Self { table }
    }
}

impl Generator for JenkinsGenerator {
    fn target(&self) -> Target {
        Target::Jenkins
    }

    fn generate(&self, windfile: &Windfile) -> Result<String, GenerateError> {
        let (windfile, urls) = prepare(windfile, &self.table);
        let jobs = jobs_for(&windfile, Target::Jenkins);

        let mut lines = Lines::new();
        prefix(&mut lines, &windfile);

        match &windfile.repositories {
            Some(repositories) if !repositories.is_empty() => {
                for (name, repository) in repositories {
                    let url = urls
                        .get(name)
                        .map(|variable| format!("${{{}}}", variable))
                        .unwrap_or_else(|| repository.url.clone());
                    checkout(
                        &mut lines,
                        name,
                        repository,
                        &url,
                        windfile.metadata.git_credentials.as_deref(),
                    );
                }
            }
            _ => {
                lines.add(4, "stage('checkout') {");
                lines.add(6, "steps {");
                lines.add(8, "checkout scm");
                lines.add(6, "}");
                lines.add(4, "}");
            }
        }

        for (name, action, internal) in jobs.iter().filter(|(_, a, _)| !a.run_always) {
            stage(&mut lines, name, action, internal);
        }
        lines.add(2, "}");

        let always: Vec<_> = jobs.iter().filter(|(_, a, _)| a.run_always).collect();
        if !always.is_empty() {
            lines.add(2, "post {");
            lines.add(4, "always {");
            for (name, action, internal) in always {
                lines.add(6, format!("// step {}", name));
                script(&mut lines, 6, name, action, internal);
            }
            lines.add(4, "}");
            lines.add(2, "}");
        }
        lines.push("}");

        tracing::info!(jobs = jobs.len(), "generated jenkins pipeline");
        Ok(lines.finish())
    }
}

fn prefix(lines: &mut Lines, windfile: &Windfile) {
    lines.push("pipeline {");
    match &windfile.metadata.docker {
        Some(docker) => agent(lines, 2, docker),
        None => lines.add(2, "agent any"),
    }
    // jobs compare against this to honor excludeDuring
    lines.add(2, "parameters {");
    lines.add(
        4,
        "string(name: 'current_lifecycle', defaultValue: 'working_time', description: 'The current stage')",
    );
    lines.add(2, "}");
    if let Some(environment) = &windfile.environment {
        lines.add(2, "environment {");
        for (name, value) in environment {
            lines.add(4, format!("{} = '{}'", name, value.render()));
        }
        lines.add(2, "}");
    }
    lines.add(2, "stages {");
}

fn agent(lines: &mut Lines, indent: usize, docker: &Docker) {
    lines.add(indent, "agent {");
    lines.add(indent + 2, "docker {");
    lines.add(indent + 4, format!("image '{}'", docker.reference()));
    let mut args: Vec<String> = docker
        .volumes
        .iter()
        .flatten()
        .map(|volume| format!("-v {}", volume))
        .collect();
    args.extend(docker.parameters.iter().flatten().cloned());
    if !args.is_empty() {
        lines.add(indent + 4, format!("args '{}'", args.join(" ")));
    }
    lines.add(indent + 2, "}");
    lines.add(indent, "}");
}

fn checkout(
    lines: &mut Lines,
    name: &str,
    repository: &Repository,
    url: &str,
    credentials: Option<&str>,
) {
    let mut indent = 4;
    lines.add(indent, format!("stage('{}') {{", name));
    lines.add(indent + 2, "steps {");
    indent += 4;
    lines.add(indent, format!("echo '🖨️ cloning {}'", name));
    let nested = repository.path != ".";
    if nested {
        lines.add(indent, format!("dir('{}') {{", repository.path));
        indent += 2;
    }
    lines.add(indent, "checkout([$class: 'GitSCM',");
    lines.add(indent + 2, format!("branches: [[name: '{}']],", repository.branch));
    lines.add(indent + 2, "doGenerateSubmoduleConfigurations: false,");
    lines.add(indent + 2, "extensions: [],");
    lines.add(indent + 2, "submoduleCfg: [],");
    lines.add(indent + 2, "userRemoteConfigs: [[");
    if let Some(credentials) = credentials {
        lines.add(indent + 4, format!("credentialsId: '{}',", credentials));
    }
    lines.add(indent + 4, format!("name: '{}',", name));
    lines.add(indent + 4, format!("url: '{}'", url));
    lines.add(indent + 2, "]]");
    lines.add(indent, "])");
    if nested {
        indent -= 2;
        lines.add(indent, "}");
    }
    lines.add(6, "}");
    lines.add(4, "}");
}

fn stage(lines: &mut Lines, name: &str, action: &Action, internal: &InternalAction) {
    lines.add(4, format!("// step {}", name));
    lines.add(4, format!("stage('{}') {{", name));
    if let Some(docker) = &action.docker {
        agent(lines, 6, docker);
    }
    if let Some(exclusions) = action.exclude_during.as_deref().filter(|e| !e.is_empty()) {
        when(lines, exclusions);
    }
    environment(lines, action);
    lines.add(6, "steps {");
    script(lines, 8, name, action, internal);
    lines.add(6, "}");
    lines.add(4, "}");
}

/// Skip the stage when the current lifecycle is any excluded phase
fn when(lines: &mut Lines, exclusions: &[Lifecycle]) {
    lines.add(6, "when {");
    lines.add(8, "allOf {");
    for phase in exclusions {
        lines.add(
            10,
            format!("expression {{ params.current_lifecycle != '{}' }}", phase),
        );
    }
    lines.add(8, "}");
    lines.add(6, "}");
}

fn environment(lines: &mut Lines, action: &Action) {
    let mut entries: IndexMap<&str, String> = IndexMap::new();
    match &action.parameters {
        Some(Parameters::Map(params)) => {
            for (key, value) in params {
                entries.insert(key, value.render());
            }
        }
        Some(Parameters::List(params)) if !params.is_empty() => {
            tracing::warn!(?params, "positional parameters have no jenkins equivalent, skipped");
        }
        _ => {}
    }
    for (key, value) in action.environment.iter().flatten() {
        entries.insert(key, value.render());
    }
    if entries.is_empty() {
        return;
    }
    lines.add(6, "environment {");
    for (key, value) in entries {
        lines.add(8, format!("{} = \"{}\"", key, value));
    }
    lines.add(6, "}");
}

/// Run the script with `sh`, inside `dir(workdir)` when the job sets one
fn script(
    lines: &mut Lines,
    indent: usize,
    name: &str,
    action: &Action,
    internal: &InternalAction,
) {
    lines.add(indent, format!("echo '⚙️ executing {}'", name));
    let body = match &action.workdir {
        Some(workdir) => {
            lines.add(indent, format!("dir('{}') {{", single_quoted(workdir)));
            indent + 2
        }
        None => indent,
    };
    lines.add(body, "sh '''");
    lines.script(body, &triple_quoted(&internal.script));
    lines.add(body, "'''");
    if action.workdir.is_some() {
        lines.add(indent, "}");
    }
}

// Groovy single-quoted strings still read backslash escapes

fn single_quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Body of a `'''` string; an embedded `'''` would end it early
fn triple_quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace("'''", "\\'\\'\\'")
}

#[cfg(test)]
#[path = "jenkins_tests.rs"]
mod tests;
