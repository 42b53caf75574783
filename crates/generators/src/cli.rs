// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local runner: a bash script with one function per job

use crate::base::{jobs_for, prepare, GenerateError, Generator, Lines};
use aeolus_core::{
    Action, EnvironmentTable, InternalAction, JobResult, Parameters, SyntaxChecker, Target,
    Windfile,
};

/// Captured at startup; every job returns here afterwards
const INITIAL_DIRECTORY: &str = "AEOLUS_INITIAL_DIRECTORY";
const POST_ACTION: &str = "final_aeolus_post_action";
/// Collected results are copied here, keeping their relative paths
const RESULTS_DIRECTORY: &str = "/var/tmp/aeolus-results";
/// Lifecycle argument that only sources the script
const SOURCING: &str = "aeolus_sourcing";

#[derive(Debug, Clone)]
pub struct CliGenerator {
    table: EnvironmentTable,
}

impl Default for CliGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CliGenerator {
    pub fn new() -> Self {
        Self::with_environment(EnvironmentTable::for_target(Target::Cli))
    }

    pub fn with_environment(table: EnvironmentTable) -> Self {
        Self { table }
    }

    /// Run `content` through `checker`, surfacing its diagnostics on failure
    pub fn check(&self, content: &str, checker: &dyn SyntaxChecker) -> Result<(), GenerateError> {
        let outcome = checker
            .check(content)
            .map_err(|e| GenerateError::SyntaxCheckFailed(e.to_string()))?;
        if outcome.passed {
            tracing::debug!("generated script passed the syntax check");
            return Ok(());
        }
        tracing::error!(diagnostics = %outcome.diagnostics, "generated script failed the syntax check");
        Err(GenerateError::SyntaxCheckFailed(outcome.diagnostics))
    }

    fn prefix(&self, lines: &mut Lines, windfile: &Windfile) {
        lines.push("#!/usr/bin/env bash");
        lines.push("set -e");
        lines.push(format!("export {}=$(pwd)", INITIAL_DIRECTORY));
        if let Some(environment) = &windfile.environment {
            for (name, value) in environment {
                lines.push(format!("export {}=\"{}\"", name, value.render()));
            }
        }
        if let Some(repositories) = &windfile.repositories {
            for (name, repository) in repositories {
                lines.push(format!(
                    "# the repository {} is expected to be mounted into the container at /{}",
                    name, repository.path
                ));
            }
        }
        lines.push("");
    }

    fn job(&self, lines: &mut Lines, name: &str, action: &Action, internal: &InternalAction) {
        lines.push(format!("{} () {{", name));
        if let Some(exclusions) = &action.exclude_during {
            lines.add(2, "local _current_lifecycle=\"${1}\"");
            for phase in exclusions {
                lines.add(
                    2,
                    format!("if [[ \"${{_current_lifecycle}}\" == \"{}\" ]]; then", phase),
                );
                lines.add(4, format!("echo '⚠️  {} is excluded during {}'", name, phase));
                lines.add(4, "return 0");
                lines.add(2, "fi");
            }
        }
        collect_results(lines, action, true);
        if let Some(workdir) = &action.workdir {
            lines.add(2, format!("cd \"{}\"", workdir));
        }
        if let Some(environment) = &action.environment {
            for (key, value) in environment {
                lines.add(2, format!("export {}=\"{}\"", key, value.render()));
            }
        }
        match &action.parameters {
            Some(Parameters::Map(params)) => {
                for (key, value) in params {
                    lines.add(2, format!("local {}=\"{}\"", key, value.render()));
                }
            }
            Some(Parameters::List(params)) if !params.is_empty() => {
                let quoted: Vec<String> = params.iter().map(|p| format!("\"{}\"", p)).collect();
                lines.add(2, format!("set -- {}", quoted.join(" ")));
            }
            _ => {}
        }
        lines.script(2, &internal.script);
        collect_results(lines, action, false);
        lines.push("}");
        lines.push("");
    }

    fn post_action(&self, lines: &mut Lines, always: &[&str]) {
        lines.push(format!("{} () {{", POST_ACTION));
        lines.add(2, "set +e # from now on, we don't exit on errors");
        lines.add(2, format!("cd \"${{{}}}\"", INITIAL_DIRECTORY));
        for name in always {
            call(lines, name);
        }
        lines.push("}");
        lines.push("");
    }

    fn postfix(&self, lines: &mut Lines, calls: &[&str], has_post_action: bool) {
        lines.push("main () {");
        lines.add(2, format!("if [[ \"${{1}}\" == \"{}\" ]]; then", SOURCING));
        lines.add(4, "# just source to use the functions in the subshell, no execution");
        lines.add(4, "return 0");
        lines.add(2, "fi");
        // globals, the post action reads them after main returns
        lines.add(2, "_current_lifecycle=\"${1}\"");
        lines.add(2, "_script_name=$(realpath \"${0}\")");
        if has_post_action {
            lines.add(2, format!("trap {} EXIT", POST_ACTION));
        }
        for name in calls {
            call(lines, name);
        }
        lines.push("}");
        lines.push("");
        lines.push("main \"${@}\"");
    }
}

/// Copy the job's results collected `before` (or after) the script into the
/// results directory. A result without matching files only prints a warning.
fn collect_results(lines: &mut Lines, action: &Action, before: bool) {
    let results: Vec<&JobResult> = action
        .results
        .iter()
        .flatten()
        .filter(|r| r.before == before)
        .collect();
    if results.is_empty() {
        return;
    }
    lines.add(2, format!("cd \"${{{}}}\"", INITIAL_DIRECTORY));
    lines.add(2, format!("mkdir -p {}", RESULTS_DIRECTORY));
    for result in results {
        let sources = match &action.workdir {
            Some(workdir) => format!("{}/{}", workdir.trim_end_matches('/'), result.path),
            None => result.path.clone(),
        };
        lines.add(2, format!("local _sources=\"{}\"", sources));
        lines.add(2, "local _directory");
        lines.add(2, "_directory=$(dirname \"${_sources}\")");
        lines.add(2, format!("mkdir -p {}/\"${{_directory}}\"", RESULTS_DIRECTORY));
        // unquoted so the glob expands
        let copy = format!("cp -a ${{_sources}} {}/\"${{_directory}}\"", RESULTS_DIRECTORY);
        let copy = match &result.ignore {
            Some(ignore) => format!("(GLOBIGNORE=\"${{_directory}}/{}\"; {})", ignore, copy),
            None => copy,
        };
        lines.add(
            2,
            format!("{} || echo '⚠️  no files collected for {}'", copy, result.name),
        );
    }
}

/// Echo, run the job in a subshell, return to the initial directory
fn call(lines: &mut Lines, name: &str) {
    lines.add(2, format!("echo '⚙️ executing {}'", name));
    lines.add(
        2,
        format!(
            "bash -c \"source ${{_script_name}} {};{} ${{_current_lifecycle}}\"",
            SOURCING, name
        ),
    );
    lines.add(2, format!("cd \"${{{}}}\"", INITIAL_DIRECTORY));
}

impl Generator for CliGenerator {
    fn target(&self) -> Target {
        Target::Cli
    }

    fn generate(&self, windfile: &Windfile) -> Result<String, GenerateError> {
        let (windfile, _) = prepare(windfile, &self.table);
        let jobs = jobs_for(&windfile, Target::Cli);

        let mut lines = Lines::new();
        self.prefix(&mut lines, &windfile);

        let mut calls = Vec::new();
        let mut always = Vec::new();
        for (name, action, internal) in &jobs {
            self.job(&mut lines, name, action, internal);
            if action.run_always {
                always.push(*name);
            } else {
                calls.push(*name);
            }
        }
        if !always.is_empty() {
            self.post_action(&mut lines, &always);
        }
        self.postfix(&mut lines, &calls, !always.is_empty());

        tracing::info!(jobs = jobs.len(), "generated bash script");
        Ok(lines.finish())
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
