use super::*;
use aeolus_core::adapters::FakeCapabilities;
use aeolus_core::{EnvValue, Lifecycle, Metadata};

fn windfile(jobs: &[(&str, Action)]) -> Windfile {
    let mut windfile = Windfile::new(Metadata::new("cli", "local runner", "Test Author"));
    for (name, action) in jobs {
        windfile.jobs.insert(name.to_string(), action.clone());
    }
    windfile
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn single_internal_job() {
    let script = CliGenerator::new()
        .generate(&windfile(&[(
            "internal-action",
            Action::internal("echo \"This is an internal action\""),
        )]))
        .unwrap();

    assert_eq!(count(&script, "#!/usr/bin/env bash"), 1);
    assert!(script.starts_with("#!/usr/bin/env bash\nset -e\n"));
    assert_eq!(count(&script, "internal-action () {"), 1);
    assert!(script.contains("  echo \"This is an internal action\""));
    assert_eq!(count(&script, "{"), count(&script, "}"));
    assert!(script.ends_with("main \"${@}\""));
}

#[test]
fn hello_job_body_is_indented() {
    let script = CliGenerator::new()
        .generate(&windfile(&[("hello", Action::internal("echo hi"))]))
        .unwrap();
    assert!(script.contains("hello () {\n  echo hi\n}"));
}

#[test]
fn jobs_are_called_in_order() {
    let script = CliGenerator::new()
        .generate(&windfile(&[
            ("first", Action::internal("echo 1")),
            ("second", Action::internal("echo 2")),
        ]))
        .unwrap();

    let main = &script[script.find("main () {").unwrap()..];
    let first = main.find("aeolus_sourcing;first").unwrap();
    let second = main.find("aeolus_sourcing;second").unwrap();
    assert!(first < second);
    assert!(main.contains("echo '⚙️ executing first'"));
    assert!(!script.contains("trap"));
}

#[test]
fn exports_environment_and_parameters() {
    let mut top = aeolus_core::Environment::new();
    top.insert("GLOBAL".to_string(), EnvValue::from("${WORKDIR}/out"));
    let mut action = Action::internal("make");
    let mut env = aeolus_core::Environment::new();
    env.insert(
        "FLAGS".to_string(),
        EnvValue::List(vec!["-j".to_string(), "4".to_string()]),
    );
    action.environment = Some(env);
    let mut params = indexmap::IndexMap::new();
    params.insert("SORTING_ALGORITHM".to_string(), EnvValue::from("quicksort"));
    action.parameters = Some(Parameters::Map(params));
    action.workdir = Some("src".to_string());
    let mut wf = windfile(&[("build", action)]);
    wf.environment = Some(top);

    let script = CliGenerator::new().generate(&wf).unwrap();

    assert!(script.contains("export GLOBAL=\"${AEOLUS_INITIAL_DIRECTORY}/out\""));
    assert!(script.contains("  cd \"src\"\n  export FLAGS=\"-j 4\"\n  local SORTING_ALGORITHM=\"quicksort\"\n  make"));
}

#[test]
fn positional_parameters_are_set() {
    let mut action = Action::internal("./run.sh \"$@\"");
    action.parameters = Some(Parameters::List(vec!["--fast".to_string(), "a b".to_string()]));
    let script = CliGenerator::new()
        .generate(&windfile(&[("run", action)]))
        .unwrap();
    assert!(script.contains("  set -- \"--fast\" \"a b\""));
}

#[test]
fn lifecycle_guards() {
    let mut action = Action::internal("./hidden-tests.sh");
    action.exclude_during = Some(vec![Lifecycle::WorkingTime, Lifecycle::Preparation]);
    let script = CliGenerator::new()
        .generate(&windfile(&[("hidden", action)]))
        .unwrap();

    assert!(script.contains("  local _current_lifecycle=\"${1}\""));
    assert!(script.contains("  if [[ \"${_current_lifecycle}\" == \"working_time\" ]]; then\n    echo '⚠️  hidden is excluded during working_time'\n    return 0\n  fi"));
    assert!(script.contains("\"${_current_lifecycle}\" == \"preparation\""));
}

#[test]
fn run_always_jobs_go_to_post_action() {
    let mut cleanup = Action::internal("rm -rf build");
    cleanup.run_always = true;
    let script = CliGenerator::new()
        .generate(&windfile(&[
            ("build", Action::internal("make")),
            ("cleanup", cleanup),
        ]))
        .unwrap();

    let post = script.find("final_aeolus_post_action () {").unwrap();
    let main = script.find("main () {").unwrap();
    assert!(post < main);
    assert!(script[post..main].contains("aeolus_sourcing;cleanup"));
    assert!(!script[main..].contains("aeolus_sourcing;cleanup"));
    assert!(script[main..].contains("trap final_aeolus_post_action EXIT"));
}

#[test]
fn foreign_platform_jobs_are_skipped() {
    let mut junit = Action::internal("parse results");
    if let aeolus_core::ActionKind::Internal(internal) = &mut junit.kind {
        internal.platform = Some(Target::Bamboo);
    }
    let script = CliGenerator::new()
        .generate(&windfile(&[("build", Action::internal("make")), ("junit", junit)]))
        .unwrap();
    assert!(!script.contains("junit"));
}

#[test]
fn repositories_are_documented_and_exported() {
    let mut wf = windfile(&[("build", Action::internal("make"))]);
    let mut repositories = indexmap::IndexMap::new();
    repositories.insert(
        "assignment".to_string(),
        aeolus_core::Repository {
            url: "https://example.com/a.git".to_string(),
            branch: "main".to_string(),
            path: "assignment".to_string(),
        },
    );
    wf.repositories = Some(repositories);

    let script = CliGenerator::new().generate(&wf).unwrap();
    assert!(script.contains("export AEOLUS_REPOSITORY_URL=\"https://example.com/a.git\""));
    assert!(script.contains(
        "# the repository assignment is expected to be mounted into the container at /assignment"
    ));
}

#[test]
fn check_passes_and_fails_through_checker() {
    let fakes = FakeCapabilities::new();
    let generator = CliGenerator::new();
    assert!(generator.check("echo ok", &fakes.checker()).is_ok());

    fakes.set_check_failure("line 2: syntax error near unexpected token `fi'");
    let err = generator.check("fi", &fakes.checker()).unwrap_err();
    match err {
        GenerateError::SyntaxCheckFailed(diagnostics) => {
            assert!(diagnostics.contains("unexpected token"))
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn results_are_collected_around_the_script() {
    let mut action = Action::internal("./gradlew test");
    action.workdir = Some("assignment".to_string());
    let mut junit = JobResult::new("junit", "build/test-results/*.xml");
    junit.ignore = Some("skipped-*.xml".to_string());
    let mut logs = JobResult::new("logs", "logs");
    logs.before = true;
    action.results = Some(vec![junit, logs]);

    let script = CliGenerator::new()
        .generate(&windfile(&[("test", action)]))
        .unwrap();

    let logs = script.find("local _sources=\"assignment/logs\"").unwrap();
    let cd = script.find("  cd \"assignment\"").unwrap();
    let run = script.find("  ./gradlew test").unwrap();
    let junit = script
        .find("local _sources=\"assignment/build/test-results/*.xml\"")
        .unwrap();
    assert!(logs < cd && cd < run && run < junit, "{}", script);
    assert!(script.contains(
        "(GLOBIGNORE=\"${_directory}/skipped-*.xml\"; cp -a ${_sources} /var/tmp/aeolus-results/\"${_directory}\") || echo '⚠️  no files collected for junit'"
    ));
    assert_eq!(count(&script, "mkdir -p /var/tmp/aeolus-results\n"), 2);
    assert_eq!(count(&script, "{"), count(&script, "}"));
}

#[test]
fn jobs_without_results_collect_nothing() {
    let script = CliGenerator::new()
        .generate(&windfile(&[("hello", Action::internal("echo hi"))]))
        .unwrap();
    assert!(!script.contains("aeolus-results"));
}
