//! GitHub Pages: publish into a versioned folder of the `gh-pages` branch
//!
//! Stages run against a throwaway clone of the publish branch. Git and npm
//! go through the [`CommandExecutor`]; file copying and page rendering are
//! done in-process.

mod files;
mod hooks;
mod pages;
mod repo;
mod urls;

use crate::core::{AutodocsError, ConfigStore, PipelineContext, Result, Stage};
use crate::execution::command::{run_checked, CommandOutput, CommandSpec};
use crate::execution::{CommandExecutor, Redactor};
use crate::publish::{PublishTarget, StageOutcome};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use urls::publish_urls;

pub const NAME: &str = "github-pages";

/// Variable holding the GitHub access token
pub const TOKEN_VAR: &str = "GH_TOKEN";

/// Default publish branch
pub const DEFAULT_PUBLISH_BRANCH: &str = "gh-pages";

/// Name of the remote the throwaway clone pushes to
pub const REMOTE: &str = "upstream";

/// The only variables handed to subprocesses
pub const SUBPROCESS_VARS: &[&str] = &[
    "PATH",
    "HOME",
    "PROJECT_DIR",
    "PROJECT_NAME",
    "MAJOR_VERSION",
    "MINOR_VERSION",
    "PATCH_VERSION",
    "GIT_USER",
    "GIT_EMAIL",
    "REPO_SLUG",
    "BUILD_ID",
    "GHPAGES_DIR",
    "FLAG_COPY_ASSETS",
    "FLAG_PUBLISH_ON_RELEASE",
    "FLAG_CLEAN_DOCUMENT",
    "FLAG_STRIP_TOKEN_OUTPUT",
    "FLAG_ALL_PAGE",
    "FLAG_LATEST_PAGE",
    "FLAG_SKIP_PUSH",
    "FLAG_SKIP_GENERATE",
    "FLAG_SKIP_TEST",
    "FLAG_SKIP_PUBLISH_RUN",
    "FLAG_PUBLISH_IN_ROOT",
    "DOCUMENT_BRANCH",
    "DOCUMENT_JOB_INDEX",
    "DOCUMENT_GENERATE_HOOK",
    "DOCUMENT_TEST_HOOK",
    "DOCUMENT_GENERATED_FOLDER",
    "DOCUMENT_PUBLISH_FOLDER_ROOT",
    "DOCUMENT_PUBLISH_SUBFOLDER",
    "DOCUMENT_PUBLISH_FOLDER",
    "DOCUMENT_ASSETS",
    "GH_PUBLISH_BRANCH",
    "GH_TOKEN",
    "GH_USER",
    "GH_REPO",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct GithubPages;

#[async_trait]
impl PublishTarget for GithubPages {
    fn name(&self) -> &'static str {
        NAME
    }

    fn token_variable(&self) -> &'static str {
        TOKEN_VAR
    }

    fn init(&self, config: &mut ConfigStore) -> Result<()> {
        config.require(TOKEN_VAR)?;
        config.default("GH_PUBLISH_BRANCH", DEFAULT_PUBLISH_BRANCH);
        config.require("REPO_SLUG")?;

        if !config.exists("GH_USER") || !config.exists("GH_REPO") {
            let slug = config.value("REPO_SLUG").to_string();
            let mut tokens = slug.split('/');
            config.default("GH_USER", tokens.next().unwrap_or(""));
            config.default("GH_REPO", tokens.next().unwrap_or(""));
        }
        Ok(())
    }

    async fn run_stage(
        &self,
        stage: Stage,
        ctx: &mut PipelineContext,
        executor: &dyn CommandExecutor,
    ) -> Result<StageOutcome> {
        let mut stages = Stages { ctx, executor };
        match stage {
            Stage::GenerateDocs => stages.generate_docs().await,
            Stage::TestDocs => stages.test_docs().await,
            Stage::PrepareWorkingRepo => stages.prepare_working_repo().await,
            Stage::SelectOrCreatePublishBranch => stages.select_or_create_branch().await,
            Stage::CopyGeneratedFiles => stages.copy_generated_files().await,
            Stage::CopyAssets => stages.copy_assets().await,
            Stage::BuildIndexPage => stages.build_index_page().await,
            Stage::BuildLatestAlias => stages.build_latest_alias().await,
            Stage::CommitAndPush => stages.commit_and_push().await,
            Stage::CleanUp => stages.clean_up().await,
            Stage::ReportUrls => stages.report_urls(),
        }
    }
}

/// Stage implementations share the context and executor of one run
pub(crate) struct Stages<'a> {
    ctx: &'a mut PipelineContext,
    executor: &'a dyn CommandExecutor,
}

impl Stages<'_> {
    fn redactor(&self) -> Redactor {
        Redactor::from_config(&self.ctx.config, TOKEN_VAR)
    }

    fn subprocess_env(&self) -> HashMap<String, String> {
        self.ctx.config.selected(SUBPROCESS_VARS)
    }

    /// Run `program args...` in `dir`, failing `stage` on any error
    async fn run(
        &self,
        stage: Stage,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<CommandOutput> {
        let spec = CommandSpec::new(program, args.iter().copied())
            .in_dir(dir)
            .with_env(self.subprocess_env());
        self.run_spec(stage, &spec).await
    }

    /// Run an embedded shell script, logged by `name` only
    async fn script(&self, stage: Stage, dir: &Path, name: &str, source: &str) -> Result<CommandOutput> {
        let spec = CommandSpec::new("sh", ["-c", source, name])
            .in_dir(dir)
            .with_env(self.subprocess_env())
            .with_label(format!("{}.sh", name));
        self.run_spec(stage, &spec).await
    }

    async fn run_spec(&self, stage: Stage, spec: &CommandSpec) -> Result<CommandOutput> {
        run_checked(self.executor, spec, &self.redactor())
            .await
            .map_err(|e| AutodocsError::stage(stage, e.to_string()))
    }

    async fn git(&self, stage: Stage, dir: &Path, args: &[&str]) -> Result<CommandOutput> {
        self.run(stage, dir, "git", args).await
    }

    fn repo_dir(&self, stage: Stage) -> Result<PathBuf> {
        self.ctx
            .repo_dir
            .clone()
            .ok_or_else(|| AutodocsError::stage(stage, "working repository has not been prepared"))
    }

    /// A variable that an earlier stage must have produced
    fn produced(&self, stage: Stage, name: &str) -> Result<String> {
        self.ctx
            .config
            .get(name)
            .map(str::to_string)
            .ok_or_else(|| AutodocsError::stage(stage, format!("Config variable `{}` not set", name)))
    }
}

/// Run blocking file-system work off the async runtime
async fn blocking<T, F>(stage: Stage, work: F) -> Result<T>
where
    F: FnOnce() -> std::io::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AutodocsError::stage(stage, e.to_string()))?;
    result.map_err(|e| {
        debug!("{} I/O error: {:?}", stage, e);
        AutodocsError::stage(stage, e.to_string())
    })
}
