//! Error presentation specs

use crate::prelude::*;

#[test]
fn missing_windfile_is_reported() {
    Project::empty()
        .aeolus()
        .args(&["merge", "nope.yaml"])
        .fails()
        .stderr_has("error: failed to read nope.yaml");
}

#[test]
fn unknown_target_is_a_usage_error() {
    let project = Project::empty();
    project.file("windfile.yaml", HELLO_WINDFILE);
    project
        .aeolus()
        .args(&["generate", "windfile.yaml", "--target", "gitlab"])
        .fails_with_usage()
        .stderr_has("invalid value");
}

#[test]
fn broken_config_is_reported() {
    let project = Project::empty();
    project.file("windfile.yaml", HELLO_WINDFILE);
    project.file("aeolus.toml", "[bamboo\n");
    project
        .aeolus()
        .args(&["--config", "aeolus.toml", "merge", "windfile.yaml"])
        .fails()
        .stderr_has("error: failed to load configuration");
}

#[test]
fn merge_failure_names_the_missing_file() {
    let project = Project::empty();
    project.file(
        "windfile.yaml",
        &HELLO_WINDFILE.replace("script: echo hi", "file: scripts/missing.sh"),
    );
    project
        .aeolus()
        .args(&["merge", "windfile.yaml"])
        .fails()
        .stderr_has("failed to merge windfile.yaml")
        .stderr_has("scripts/missing.sh")
        .stderr_has("suggestions:");
}
