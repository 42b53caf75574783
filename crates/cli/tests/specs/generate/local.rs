//! `aeolus generate --target cli` specs

use crate::prelude::*;

#[test]
fn hello_job_becomes_a_function() {
    let project = Project::empty();
    project.file("windfile.yaml", HELLO_WINDFILE);
    let run = project
        .aeolus()
        .args(&["generate", "windfile.yaml", "--target", "cli"])
        .passes()
        .stdout_has("hello () {\n  echo hi\n}")
        .stdout_has("bash -c \"source ${_script_name} aeolus_sourcing;hello ${_current_lifecycle}\"");
    let out = run.stdout();
    assert!(out.starts_with("#!/usr/bin/env bash\n"));
    assert_eq!(out.matches('{').count(), out.matches('}').count());
}

#[test]
fn canonical_names_are_rewritten() {
    let project = Project::empty();
    project
        .file("windfile.yaml", EXTERNAL_WINDFILE)
        .file("actions/shared.yaml", SHARED_ACTIONS);
    project
        .aeolus()
        .args(&["generate", "windfile.yaml", "--target", "cli"])
        .passes()
        .stdout_has("echo \"${AEOLUS_INITIAL_DIRECTORY}/report.xml\"")
        .stdout_lacks("${WORKDIR}");
}

#[test]
fn output_flag_writes_a_file() {
    let project = Project::empty();
    project.file("windfile.yaml", HELLO_WINDFILE);
    project
        .aeolus()
        .args(&["generate", "windfile.yaml", "-t", "cli", "-o", "run.sh"])
        .passes()
        .stdout_eq("");
    assert!(project.read("run.sh").contains("hello () {"));
}

#[test]
fn config_overrides_native_names() {
    let project = Project::empty();
    project
        .file("windfile.yaml", EXTERNAL_WINDFILE)
        .file("actions/shared.yaml", SHARED_ACTIONS)
        .file(
            ".config/aeolus/config.toml",
            "[environment.cli]\nWORKDIR = \"CI_PROJECT_DIR\"\n",
        );
    project
        .aeolus()
        .args(&["generate", "windfile.yaml", "--target", "cli"])
        .passes()
        .stdout_has("${CI_PROJECT_DIR}/report.xml");
}

#[cfg(unix)]
#[test]
fn generated_script_passes_bash_check() {
    if !std::path::Path::new("/bin/bash").exists() {
        return;
    }
    let project = Project::empty();
    project
        .file("windfile.yaml", EXTERNAL_WINDFILE)
        .file("actions/shared.yaml", SHARED_ACTIONS);
    project
        .aeolus()
        .args(&["generate", "windfile.yaml", "--target", "cli", "--check"])
        .passes()
        .stdout_has("shared_compile () {");
}
