//! Publish pipeline stages

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the publish pipeline
///
/// Stages always run in the order of [`Stage::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    GenerateDocs,
    TestDocs,
    PrepareWorkingRepo,
    SelectOrCreatePublishBranch,
    CopyGeneratedFiles,
    CopyAssets,
    BuildIndexPage,
    BuildLatestAlias,
    CommitAndPush,
    CleanUp,
    ReportUrls,
}

impl Stage {
    /// Every stage, in execution order
    pub const ALL: [Stage; 11] = [
        Stage::GenerateDocs,
        Stage::TestDocs,
        Stage::PrepareWorkingRepo,
        Stage::SelectOrCreatePublishBranch,
        Stage::CopyGeneratedFiles,
        Stage::CopyAssets,
        Stage::BuildIndexPage,
        Stage::BuildLatestAlias,
        Stage::CommitAndPush,
        Stage::CleanUp,
        Stage::ReportUrls,
    ];

    /// Stable, kebab-case name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Stage::GenerateDocs => "generate-docs",
            Stage::TestDocs => "test-docs",
            Stage::PrepareWorkingRepo => "prepare-working-repo",
            Stage::SelectOrCreatePublishBranch => "select-or-create-publish-branch",
            Stage::CopyGeneratedFiles => "copy-generated-files",
            Stage::CopyAssets => "copy-assets",
            Stage::BuildIndexPage => "build-index-page",
            Stage::BuildLatestAlias => "build-latest-alias",
            Stage::CommitAndPush => "commit-and-push",
            Stage::CleanUp => "clean-up",
            Stage::ReportUrls => "report-urls",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
