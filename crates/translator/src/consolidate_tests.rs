use super::*;
use aeolus_core::{Action, Docker, JobResult, Lifecycle, Metadata, Parameters};
use indexmap::IndexMap;

fn windfile(dockers: &[Option<&str>]) -> Windfile {
    let mut windfile = Windfile::new(Metadata::new("plan", "", "bamboo"));
    for (index, docker) in dockers.iter().enumerate() {
        let mut action = Action::internal("true");
        action.docker = docker.map(Docker::from_reference);
        windfile.jobs.insert(format!("job{}", index + 1), action);
    }
    windfile
}

#[test]
fn identical_configs_hoist_exactly_one() {
    let mut wf = windfile(&[Some("maven:17"), Some("maven:17"), Some("maven:17")]);
    assert!(consolidate_docker(&mut wf));
    assert_eq!(wf.metadata.docker, Some(Docker::from_reference("maven:17")));
    assert!(wf.jobs.values().all(|a| a.docker.is_none()));
}

#[test]
fn differing_configs_hoist_nothing() {
    let mut wf = windfile(&[Some("maven:17"), Some("maven:21")]);
    let before = wf.clone();
    assert!(!consolidate_docker(&mut wf));
    assert_eq!(wf, before);
}

#[test]
fn differing_volumes_hoist_nothing() {
    let mut wf = windfile(&[Some("maven:17"), Some("maven:17")]);
    wf.jobs["job2"].docker.as_mut().unwrap().volumes = Some(vec!["/a:/b".to_string()]);
    assert!(!consolidate_docker(&mut wf));
    assert!(wf.metadata.docker.is_none());
}

#[test]
fn partially_dockerized_jobs_hoist_nothing() {
    let mut wf = windfile(&[Some("maven:17"), None]);
    assert!(!consolidate_docker(&mut wf));
    assert!(wf.jobs["job1"].docker.is_some());
}

#[test]
fn no_jobs_or_no_docker_is_a_no_op() {
    let mut empty = windfile(&[]);
    assert!(!consolidate_docker(&mut empty));
    let mut bare = windfile(&[None, None]);
    assert!(!consolidate_docker(&mut bare));
    assert!(bare.metadata.docker.is_none());
}

#[test]
fn clean_up_clears_empty_collections_only() {
    let mut wf = windfile(&[None, None]);
    {
        let first = &mut wf.jobs["job1"];
        first.environment = Some(IndexMap::new());
        first.parameters = Some(Parameters::List(Vec::new()));
        first.exclude_during = Some(Vec::new());
        first.results = Some(Vec::new());
    }
    {
        let second = &mut wf.jobs["job2"];
        second.parameters = Some(Parameters::List(vec!["-v".to_string()]));
        second.exclude_during = Some(vec![Lifecycle::Evaluation]);
        second.results = Some(vec![JobResult::new("junit", "build/*.xml")]);
    }

    clean_up(&mut wf);

    let first = &wf.jobs["job1"];
    assert!(first.environment.is_none());
    assert!(first.parameters.is_none());
    assert!(first.exclude_during.is_none());
    assert!(first.results.is_none());
    let second = &wf.jobs["job2"];
    assert!(second.parameters.is_some());
    assert_eq!(second.exclude_during, Some(vec![Lifecycle::Evaluation]));
    assert_eq!(second.results.as_ref().map(Vec::len), Some(1));
}
