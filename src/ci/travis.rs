//! Travis CI: publish from one job of a branch or tag build

use crate::ci::CiProvider;
use crate::core::{ConfigStore, PublishDecision, Result};
use tracing::debug;

pub const NAME: &str = "travis";

/// Variables Travis must export for autodocs to run
pub const REQUIRED: &[&str] = &[
    "TRAVIS_REPO_SLUG",
    "TRAVIS_PULL_REQUEST",
    "TRAVIS_BRANCH",
    "TRAVIS_BUILD_NUMBER",
    "TRAVIS_JOB_NUMBER",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Travis;

impl CiProvider for Travis {
    fn name(&self) -> &'static str {
        NAME
    }

    fn init(&self, config: &mut ConfigStore) -> Result<()> {
        config.require("TRAVIS_REPO_SLUG")?;
        let slug = config.value("TRAVIS_REPO_SLUG").to_string();
        config.default("REPO_SLUG", &slug);

        for name in &REQUIRED[1..] {
            config.require(name)?;
        }

        let build_id = config
            .get("TRAVIS_COMMIT")
            .unwrap_or_else(|| config.value("TRAVIS_BUILD_NUMBER"))
            .to_string();
        config.default("BUILD_ID", &build_id);
        Ok(())
    }

    fn should_run(&self, config: &ConfigStore) -> PublishDecision {
        let expected_job = format!(
            "{}.{}",
            config.value("TRAVIS_BUILD_NUMBER"),
            config.value("DOCUMENT_JOB_INDEX")
        );
        let correct_job_index = expected_job == config.value("TRAVIS_JOB_NUMBER");
        debug!(
            "job {} (publishing job {})",
            config.value("TRAVIS_JOB_NUMBER"),
            expected_job
        );

        let mut decision;
        if config.flag("FLAG_PUBLISH_ON_RELEASE") {
            decision = PublishDecision::new("Publish on release");
            decision.check(config.exists("TRAVIS_TAG"), "travis tag exists failure");
        } else {
            decision = PublishDecision::new("Publish on branch");
            decision.check(
                config.value("TRAVIS_PULL_REQUEST") == "false",
                "is not a pull request failure",
            );
            decision.check(
                config.value("TRAVIS_BRANCH") == config.value("DOCUMENT_BRANCH"),
                "branch name match failure",
            );
        }
        decision.check(correct_job_index, "job index match failure");
        decision
    }
}
