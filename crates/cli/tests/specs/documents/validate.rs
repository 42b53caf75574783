//! `aeolus validate` specs

use crate::prelude::*;

#[test]
fn valid_windfile_prints_valid() {
    let project = Project::empty();
    project.file("windfile.yaml", HELLO_WINDFILE);
    project
        .aeolus()
        .args(&["validate", "windfile.yaml"])
        .passes()
        .stdout_eq("valid\n");
}

#[test]
fn invalid_windfile_lists_violations() {
    let project = Project::empty();
    project.file(
        "windfile.yaml",
        &HELLO_WINDFILE.replace("  author: Test Author\n", ""),
    );
    project
        .aeolus()
        .args(&["validate", "windfile.yaml"])
        .fails()
        .stdout_has("invalid: windfile.yaml")
        .stdout_has("metadata.author");
}

#[test]
fn unknown_action_field_is_rejected() {
    let project = Project::empty();
    project.file(
        "windfile.yaml",
        &HELLO_WINDFILE.replace("script: echo hi", "script: echo hi\n    retries: 3"),
    );
    project
        .aeolus()
        .args(&["validate", "windfile.yaml"])
        .fails()
        .stdout_has("retries");
}

#[test]
fn action_files_are_validated_with_flag() {
    let project = Project::empty();
    project.file("actions/shared.yaml", SHARED_ACTIONS);
    project
        .aeolus()
        .args(&["validate", "--actionfile", "actions/shared.yaml"])
        .passes()
        .stdout_eq("valid\n");
    // an action file has no jobs, so it is not a windfile
    project
        .aeolus()
        .args(&["validate", "actions/shared.yaml"])
        .fails()
        .stdout_has("jobs");
}
