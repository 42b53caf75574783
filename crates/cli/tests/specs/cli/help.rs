//! Help and completion specs

use crate::prelude::*;

#[test]
fn help_lists_every_command() {
    let project = Project::empty();
    let run = project.aeolus().args(&["--help"]).passes();
    for command in ["validate", "merge", "generate", "translate", "completions"] {
        assert!(run.stdout().contains(command), "missing {}", command);
    }
}

#[test]
fn version_is_printed() {
    Project::empty()
        .aeolus()
        .args(&["--version"])
        .passes()
        .stdout_has("aeolus");
}

#[test]
fn bash_completions_mention_the_binary() {
    Project::empty()
        .aeolus()
        .args(&["completions", "bash"])
        .passes()
        .stdout_has("_aeolus");
}
