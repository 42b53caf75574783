//! `aeolus generate --target bamboo` specs

use crate::prelude::*;

#[cfg(unix)]
fn with_fake_java(project: &Project, body: &str) {
    project.script("bin/java", &format!("#!/bin/sh\n{}\n", body));
    project.file(
        ".config/aeolus/config.toml",
        &format!(
            "[bamboo]\nproducer = \"jar\"\njar = \"gen.jar\"\njava = {:?}\n",
            project.join("bin/java").display().to_string()
        ),
    );
}

#[cfg(unix)]
#[test]
fn producer_stdout_becomes_the_artifact() {
    let project = Project::empty();
    project.file("windfile.yaml", HELLO_WINDFILE);
    with_fake_java(&project, "echo 'plan specs'");
    project
        .aeolus()
        .args(&["generate", "windfile.yaml", "--target", "bamboo"])
        .passes()
        .stdout_eq("plan specs\n");
}

#[cfg(unix)]
#[test]
fn producer_receives_base64_payload() {
    let project = Project::empty();
    project.file("windfile.yaml", HELLO_WINDFILE);
    with_fake_java(&project, "[ \"$1 $2 $3\" = \"-jar gen.jar --base64\" ] || exit 3\necho ok");
    project
        .aeolus()
        .args(&["generate", "windfile.yaml", "--target", "bamboo"])
        .passes()
        .stdout_eq("ok\n");
}

#[cfg(unix)]
#[test]
fn failing_producer_is_reported() {
    let project = Project::empty();
    project.file("windfile.yaml", HELLO_WINDFILE);
    with_fake_java(&project, "echo broken >&2\nexit 1");
    project
        .aeolus()
        .args(&["generate", "windfile.yaml", "--target", "bamboo"])
        .fails()
        .stderr_has("failed to generate the bamboo pipeline")
        .stderr_has("producer exited with code 1");
}

#[test]
fn jar_producer_without_jar_suggests_fixes() {
    let project = Project::empty();
    project.file("windfile.yaml", HELLO_WINDFILE);
    project
        .aeolus()
        .args(&[
            "generate",
            "windfile.yaml",
            "--target",
            "bamboo",
            "--producer",
            "jar",
        ])
        .fails()
        .stderr_has("no bamboo generator jar configured")
        .stderr_has("BAMBOO_GENERATOR_JAR");
}
