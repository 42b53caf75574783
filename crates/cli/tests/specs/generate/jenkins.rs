//! `aeolus generate --target jenkins` specs

use crate::prelude::*;

const REPOSITORY_WINDFILE: &str = r#"apiVersion: v0.0.1
metadata:
  name: java
  description: builds and tests
  author: Test Author
  gitCredentials: artemis_gitlab
  docker:
    image: maven
    tag: 3-eclipse-temurin-17
repositories:
  tests:
    url: https://example.org/tests.git
    branch: main
    path: tests
jobs:
  build:
    script: ./gradlew build
  report:
    script: cp ${WORKDIR}/build/*.xml results/
    runAlways: true
"#;

#[test]
fn pipeline_has_one_block_and_balanced_braces() {
    let project = Project::empty();
    project.file("windfile.yaml", HELLO_WINDFILE);
    let run = project
        .aeolus()
        .args(&["generate", "windfile.yaml", "--target", "jenkins"])
        .passes()
        .stdout_has("stage('hello') {")
        .stdout_has("checkout scm");
    let out = run.stdout();
    assert_eq!(out.matches("pipeline {").count(), 1);
    assert_eq!(out.matches('{').count(), out.matches('}').count());
}

#[test]
fn repositories_docker_and_post_actions() {
    let project = Project::empty();
    project.file("windfile.yaml", REPOSITORY_WINDFILE);
    project
        .aeolus()
        .args(&["generate", "windfile.yaml", "--target", "jenkins"])
        .passes()
        .stdout_has("image 'maven:3-eclipse-temurin-17'")
        .stdout_has("GIT_URL = 'https://example.org/tests.git'")
        .stdout_has("credentialsId: 'artemis_gitlab'")
        .stdout_has("dir('tests')")
        .stdout_has("post {")
        .stdout_has("cp ${WORKSPACE}/build/*.xml results/")
        .stdout_lacks("stage('report')");
}
