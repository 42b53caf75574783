use super::*;
use aeolus_core::{ActionKind, FileAction, Metadata, Repository};

fn windfile() -> Windfile {
    let mut windfile = Windfile::new(Metadata::new("base", "generator base", "Test Author"));
    windfile
        .jobs
        .insert("build".to_string(), Action::internal("cd ${WORKDIR}"));
    windfile
}

#[test]
fn lines_indent_and_skip_empty_script_lines() {
    let mut lines = Lines::new();
    lines.push("f () {");
    lines.script(2, "echo a\n\necho b\n");
    lines.add(0, "}");
    assert_eq!(lines.finish(), "f () {\n  echo a\n  echo b\n}");
}

#[test]
fn prepare_substitutes_a_copy() {
    let original = windfile();
    let (prepared, urls) = prepare(&original, &EnvironmentTable::for_target(Target::Jenkins));

    assert!(urls.is_empty());
    assert_eq!(
        prepared.jobs["build"].as_internal().unwrap().script,
        "cd ${WORKSPACE}"
    );
    assert_eq!(
        original.jobs["build"].as_internal().unwrap().script,
        "cd ${WORKDIR}"
    );
}

#[test]
fn repository_urls_are_exported_per_repository() {
    let mut original = windfile();
    let mut repositories = IndexMap::new();
    for (name, url) in [("assignment", "https://a.git"), ("tests", "https://t.git")] {
        repositories.insert(
            name.to_string(),
            Repository {
                url: url.to_string(),
                branch: "main".to_string(),
                path: name.to_string(),
            },
        );
    }
    original.repositories = Some(repositories);

    let (prepared, urls) = prepare(&original, &EnvironmentTable::for_target(Target::Cli));

    assert_eq!(urls["assignment"], "AEOLUS_REPOSITORY_URL");
    assert_eq!(urls["tests"], "AEOLUS_REPOSITORY_URL_1");
    let env = prepared.environment.unwrap();
    assert_eq!(env["AEOLUS_REPOSITORY_URL_1"], EnvValue::from("https://t.git"));
}

#[test]
fn jobs_for_skips_foreign_and_unresolved_actions() {
    let mut windfile = windfile();
    let mut junit = Action::internal("parse");
    junit.kind = ActionKind::Internal(InternalAction {
        script: "parse".to_string(),
        platform: Some(Target::Bamboo),
    });
    windfile.jobs.insert("junit".to_string(), junit);
    windfile.jobs.insert(
        "pending".to_string(),
        Action::new(ActionKind::File(FileAction {
            file: "x.sh".into(),
        })),
    );

    let cli: Vec<&str> = jobs_for(&windfile, Target::Cli).iter().map(|j| j.0).collect();
    assert_eq!(cli, vec!["build"]);
    let bamboo: Vec<&str> = jobs_for(&windfile, Target::Bamboo)
        .iter()
        .map(|j| j.0)
        .collect();
    assert_eq!(bamboo, vec!["build", "junit"]);
}
