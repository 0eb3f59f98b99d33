//! Test: Decision - which builds publish, and FLAG_SKIP_PUBLISH_RUN

use crate::helpers::*;
use autodocs::execution::PublishEvent;
use autodocs::{Autodocs, RunOutcome};

#[tokio::test]
async fn test_pull_request_build_is_not_published() {
    let project = Project::new();
    let executor = project.executor();
    let mut config = travis_branch_build();
    config.set("TRAVIS_PULL_REQUEST", "17");

    let outcome = run(&project, &executor, config).await.unwrap();

    match outcome {
        RunOutcome::NotPublished { decision } => {
            assert!(!decision.flag);
            assert_eq!(decision.reasons(), vec!["is not a pull request failure"]);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_other_job_of_build_matrix_is_not_published() {
    let project = Project::new();
    let executor = project.executor();
    let mut config = travis_branch_build();
    config.set("TRAVIS_JOB_NUMBER", "42.3");

    let outcome = run(&project, &executor, config).await.unwrap();

    assert!(matches!(outcome, RunOutcome::NotPublished { .. }));
    assert_eq!(
        outcome.decision().message,
        "Publish on branch\n- job index match failure"
    );
}

#[tokio::test]
async fn test_release_build_without_tag_is_not_published() {
    let project = Project::new();
    let executor = project.executor();
    let mut config = travis_branch_build();
    config.set("FLAG_PUBLISH_ON_RELEASE", "true");

    let outcome = run(&project, &executor, config).await.unwrap();

    assert_eq!(
        outcome.decision().message,
        "Publish on release\n- travis tag exists failure"
    );
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_skip_publish_run_validates_but_runs_nothing() {
    let project = Project::new();
    let executor = project.executor();
    let mut config = travis_branch_build();
    config.set("FLAG_SKIP_PUBLISH_RUN", "true");

    let outcome = run(&project, &executor, config).await.unwrap();

    assert!(matches!(outcome, RunOutcome::PublishRunSkipped { ref decision } if decision.flag));
    assert!(executor.calls().is_empty());
    assert!(!project.repo_dir().exists());
}

#[tokio::test]
async fn test_skip_publish_run_still_requires_token() {
    let project = Project::new();
    let executor = project.executor();
    let mut config = travis_branch_build();
    config.set("FLAG_SKIP_PUBLISH_RUN", "true");
    config.set("GH_TOKEN", "");

    let err = run(&project, &executor, config).await.unwrap_err();
    assert_eq!(err.missing_variable(), Some("GH_TOKEN"));
}

#[test]
fn test_check_spawns_nothing() {
    let project = Project::new();
    let executor = project.executor();
    let mut engine = Autodocs::new(executor.clone());
    let events = record_events(&mut engine);

    let decision = engine.check(travis_branch_build(), project.path()).unwrap();

    assert!(decision.flag);
    assert_eq!(decision.message, "Publish on branch");
    assert!(executor.calls().is_empty());
    assert!(matches!(
        events.lock().unwrap().as_slice(),
        [PublishEvent::DecisionMade { .. }]
    ));
}
