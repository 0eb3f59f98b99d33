//! Test: Validation - missing variables and unknown providers fail before any command

use crate::helpers::*;
use autodocs::core::ProviderKind;
use autodocs::AutodocsError;

#[tokio::test]
async fn test_missing_token_fails_fast() {
    let project = Project::new();
    let executor = project.executor();
    let mut config = travis_branch_build();
    config.set("GH_TOKEN", "");

    let err = run(&project, &executor, config).await.unwrap_err();

    assert_eq!(err.missing_variable(), Some("GH_TOKEN"));
    assert_eq!(err.to_string(), "Config variable `GH_TOKEN` not set");
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_missing_travis_variable_fails_fast() {
    let project = Project::new();
    let executor = project.executor();
    let mut config = travis_branch_build();
    config.set("TRAVIS_JOB_NUMBER", "");

    let err = run(&project, &executor, config).await.unwrap_err();

    assert_eq!(err.missing_variable(), Some("TRAVIS_JOB_NUMBER"));
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_unsupported_ci() {
    let project = Project::new();
    let executor = project.executor();
    let mut config = travis_branch_build();
    config.set("SELECT_CI", "circle");

    let err = run(&project, &executor, config).await.unwrap_err();

    assert!(matches!(
        err,
        AutodocsError::UnsupportedProvider { kind: ProviderKind::Ci, ref name } if name == "circle"
    ));
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_unsupported_publish_target() {
    let project = Project::new();
    let executor = project.executor();
    let mut config = travis_branch_build();
    config.set("SELECT_PUBLISH", "s3");

    let err = run(&project, &executor, config).await.unwrap_err();

    assert_eq!(err.to_string(), "Unsupported publish provider `s3`");
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_missing_manifest() {
    let project = Project::new();
    std::fs::remove_file(project.path().join("package.json")).unwrap();
    let executor = project.executor();

    let err = run(&project, &executor, travis_branch_build()).await.unwrap_err();

    assert!(matches!(err, AutodocsError::Manifest { .. }));
    assert!(executor.calls().is_empty());
}
