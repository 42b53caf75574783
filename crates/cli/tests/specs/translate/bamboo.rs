//! `aeolus translate` specs

use crate::prelude::*;

#[test]
fn unreachable_server_fails_with_plan_key() {
    let project = Project::empty();
    project
        .aeolus()
        .args(&[
            "translate",
            "--key",
            "PROJ-PLAN",
            "--url",
            "http://127.0.0.1:9",
            "--token",
            "secret",
        ])
        .fails()
        .stderr_has("failed to translate plan 'PROJ-PLAN'")
        .stderr_has("Check --url and --token");
}

#[test]
fn key_url_and_token_are_required() {
    let project = Project::empty();
    project
        .aeolus()
        .args(&["translate", "--key", "PROJ-PLAN"])
        .fails_with_usage();
}
