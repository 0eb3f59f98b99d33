//! Test: Failure Handling - a failed stage stops the run, tokens stay out of errors

use crate::helpers::*;
use autodocs::core::ExecutionStatus;
use autodocs::execution::{CommandOutput, PublishEvent};
use autodocs::{Autodocs, AutodocsError, Stage};

fn push_rejected() -> CommandOutput {
    CommandOutput::failed(
        128,
        format!(
            "fatal: unable to access 'https://{}@github.com/bguiz/unicorn-docs.git/': 403",
            TOKEN
        ),
    )
}

#[tokio::test]
async fn test_generate_failure_stops_pipeline() {
    let project = Project::new();
    let executor = project
        .executor()
        .respond(&["npm", "run", "generatedocs"], CommandOutput::failed(1, "jsdoc: not found"));
    let mut engine = Autodocs::new(executor.clone());
    let events = record_events(&mut engine);

    let err = engine.run(travis_branch_build(), project.path()).await.unwrap_err();

    match &err {
        AutodocsError::StageFailure { stage, cause } => {
            assert_eq!(*stage, Stage::GenerateDocs);
            assert!(cause.contains("`npm run generatedocs` exited with code 1"));
            assert!(cause.contains("jsdoc: not found"));
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(executor.command_lines(), vec!["npm run generatedocs"]);
    assert!(!project.repo_dir().exists());

    let events = events.lock().unwrap();
    assert!(!events
        .iter()
        .any(|e| matches!(e, PublishEvent::StageStarted { stage: Stage::TestDocs })));
    assert!(matches!(
        events.last(),
        Some(PublishEvent::RunFinished { status: ExecutionStatus::Failed, .. })
    ));
}

#[tokio::test]
async fn test_undeclared_test_hook_fails() {
    let project = Project::with_manifest(
        r#"{"name": "unicorn-docs", "version": "1.2.3", "scripts": {"generatedocs": "jsdoc"}}"#,
    );
    let executor = project.executor();

    let err = run(&project, &executor, travis_branch_build()).await.unwrap_err();

    assert_eq!(err.to_string(), "Stage test-docs failed: missing script: testdocs");
    assert_eq!(executor.command_lines(), vec!["npm run generatedocs"]);
}

#[tokio::test]
async fn test_missing_generated_folder_fails() {
    let project = Project::new();
    std::fs::remove_dir_all(project.path().join("documentation")).unwrap();
    let executor = project.executor();

    let err = run(&project, &executor, travis_branch_build()).await.unwrap_err();

    assert!(matches!(
        err,
        AutodocsError::StageFailure { stage: Stage::CopyGeneratedFiles, .. }
    ));
    assert!(!executor.ran("git ls-files"));
}

#[tokio::test]
async fn test_push_failure_redacts_token() {
    let project = Project::new();
    let executor = project
        .executor()
        .respond(&["git", "ls-files"], CommandOutput::ok("api/1.2/index.html\n"))
        .respond(&["git", "push"], push_rejected());

    let err = run(&project, &executor, travis_branch_build()).await.unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Stage commit-and-push failed"));
    assert!(message.contains("https://[secure]@github.com"));
    assert!(!message.contains(TOKEN));
}

#[tokio::test]
async fn test_token_kept_when_stripping_disabled() {
    let project = Project::new();
    let executor = project
        .executor()
        .respond(&["git", "ls-files"], CommandOutput::ok("api/1.2/index.html\n"))
        .respond(&["git", "push"], push_rejected());
    let mut config = travis_branch_build();
    config.set("FLAG_STRIP_TOKEN_OUTPUT", "false");

    let err = run(&project, &executor, config).await.unwrap_err();

    assert!(err.to_string().contains(TOKEN));
}

#[tokio::test]
async fn test_remote_add_failure_hides_token_in_command_line() {
    let project = Project::new();
    let executor = project
        .executor()
        .respond(&["git", "remote"], CommandOutput::failed(3, "error: remote upstream already exists"));

    let err = run(&project, &executor, travis_branch_build()).await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("git remote add upstream https://[secure]@github.com/bguiz/unicorn-docs.git"));
    assert!(!message.contains(TOKEN));
    assert!(matches!(
        err,
        AutodocsError::StageFailure { stage: Stage::PrepareWorkingRepo, .. }
    ));
}
