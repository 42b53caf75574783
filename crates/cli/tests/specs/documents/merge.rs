//! `aeolus merge` specs

use crate::prelude::*;

#[test]
fn internal_only_windfile_is_unchanged() {
    let project = Project::empty();
    project.file("windfile.yaml", HELLO_WINDFILE);
    project
        .aeolus()
        .args(&["merge", "windfile.yaml"])
        .passes()
        .stdout_eq(HELLO_WINDFILE);
}

#[test]
fn external_action_expands_into_prefixed_jobs() {
    let project = Project::empty();
    project
        .file("ci/windfile.yaml", EXTERNAL_WINDFILE)
        .file("ci/actions/shared.yaml", SHARED_ACTIONS);

    let run = project
        .aeolus()
        .args(&["merge", "ci/windfile.yaml"])
        .passes()
        .stdout_lacks("use:");
    let out = run.stdout();
    let compile = out.find("shared_compile:").unwrap();
    let report = out.find("shared_report:").unwrap();
    let done = out.find("done:").unwrap();
    assert!(compile < report && report < done, "{}", out);
}

#[test]
fn file_action_is_inlined() {
    let project = Project::empty();
    project
        .file(
            "windfile.yaml",
            &HELLO_WINDFILE.replace("script: echo hi", "file: scripts/hello.sh"),
        )
        .file("scripts/hello.sh", "echo from file\n");

    project
        .aeolus()
        .args(&["merge", "windfile.yaml"])
        .passes()
        .stdout_has("echo from file")
        .stdout_lacks("file:");
}

#[test]
fn json_output_uses_camel_case_keys() {
    let project = Project::empty();
    project.file("windfile.yaml", HELLO_WINDFILE);
    let run = project
        .aeolus()
        .args(&["merge", "windfile.yaml", "--format", "json"])
        .passes();
    let json: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(json["apiVersion"], "v0.0.1");
    assert_eq!(json["jobs"]["hello"]["script"], "echo hi");
}

#[test]
fn verbose_dumps_merge_progress_to_stderr() {
    let project = Project::empty();
    project
        .file("windfile.yaml", EXTERNAL_WINDFILE)
        .file("actions/shared.yaml", SHARED_ACTIONS);
    project
        .aeolus()
        .args(&["--verbose", "merge", "windfile.yaml"])
        .passes()
        .stderr_has("INFO");
}
