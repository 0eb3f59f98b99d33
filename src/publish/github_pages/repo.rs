//! The throwaway clone: set up, branch selection, commit and clean up

use super::{blocking, Stages, REMOTE};
use crate::core::{AutodocsError, Result, Stage};
use crate::publish::StageOutcome;
use chrono::Utc;
use std::path::PathBuf;
use tracing::info;

const SET_UP_VARS: &str = include_str!("set-up-vars.sh");

/// Count non-empty lines of command output
fn count_lines(stdout: &str) -> usize {
    stdout.lines().filter(|line| !line.trim().is_empty()).count()
}

impl Stages<'_> {
    pub(super) async fn prepare_working_repo(&mut self) -> Result<StageOutcome> {
        let stage = Stage::PrepareWorkingRepo;
        let project_dir = self.ctx.project_dir.clone();

        let output = self
            .script(stage, &project_dir, "set-up-vars", SET_UP_VARS)
            .await?;
        self.ctx.config.ingest_key_value_text(&output.stdout);

        let repo_dir = PathBuf::from(self.produced(stage, "GHPAGES_DIR")?);
        let auth_url = self.produced(stage, "REPO_URL_AUTH")?;
        info!("Staging publish branch in {}", repo_dir.display());

        let fresh = repo_dir.clone();
        blocking(stage, move || {
            if fresh.exists() {
                std::fs::remove_dir_all(&fresh)?;
            }
            std::fs::create_dir_all(&fresh)
        })
        .await?;
        self.ctx.repo_dir = Some(repo_dir.clone());

        let git_user = self.ctx.var("GIT_USER").to_string();
        let git_email = self.ctx.var("GIT_EMAIL").to_string();
        self.git(stage, &repo_dir, &["init"]).await?;
        self.git(stage, &repo_dir, &["config", "user.name", &git_user]).await?;
        self.git(stage, &repo_dir, &["config", "user.email", &git_email]).await?;
        self.git(stage, &repo_dir, &["remote", "add", REMOTE, &auth_url]).await?;
        Ok(StageOutcome::Completed)
    }

    pub(super) async fn select_or_create_branch(&mut self) -> Result<StageOutcome> {
        let stage = Stage::SelectOrCreatePublishBranch;
        let repo_dir = self.repo_dir(stage)?;
        let project_dir = self.ctx.project_dir.clone();
        let unauth_url = self.produced(stage, "REPO_URL_UNAUTH")?;
        let branch = self.ctx.var("GH_PUBLISH_BRANCH").to_string();
        let head_ref = format!("refs/heads/{}", branch);

        let output = self
            .git(stage, &project_dir, &["ls-remote", "--heads", &unauth_url, &head_ref])
            .await?;
        let num_publish_branches = output
            .stdout
            .lines()
            .filter(|line| line.split_whitespace().nth(1) == Some(head_ref.as_str()))
            .count();
        info!("NUM_PUBLISH_BRANCHES {}", num_publish_branches);
        self.ctx.num_publish_branches = Some(num_publish_branches);

        if num_publish_branches == 0 {
            info!("Creating new {} branch", branch);
            self.git(stage, &repo_dir, &["checkout", "--orphan", &branch]).await?;
        } else {
            info!("Using existing {} branch", branch);
            self.git(stage, &repo_dir, &["fetch", REMOTE, &branch]).await?;
            self.git(stage, &repo_dir, &["checkout", "-b", &branch, "FETCH_HEAD"]).await?;
        }
        Ok(StageOutcome::Completed)
    }

    pub(super) async fn commit_and_push(&mut self) -> Result<StageOutcome> {
        let stage = Stage::CommitAndPush;
        let repo_dir = self.repo_dir(stage)?;

        let output = self.git(stage, &repo_dir, &["ls-files", "-m", "-o"]).await?;
        let num_files_changed = count_lines(&output.stdout);
        info!("NUM_FILES_CHANGED {}", num_files_changed);
        self.ctx.num_files_changed = Some(num_files_changed);
        if num_files_changed == 0 {
            return Ok(StageOutcome::Skipped(
                "Documentation unchanged, no need to publish".to_string(),
            ));
        }

        let paths = self.staged_paths();
        let mut add = vec!["add", "-A", "--"];
        add.extend(paths.iter().map(String::as_str));
        self.git(stage, &repo_dir, &add).await?;

        let message = format!(
            "autodocs publish {} {}",
            Utc::now().to_rfc3339(),
            self.ctx.var("BUILD_ID")
        );
        self.git(stage, &repo_dir, &["commit", "-m", &message]).await?;

        if self.ctx.flag("FLAG_SKIP_PUSH") {
            info!("FLAG_SKIP_PUSH is set, not pushing");
        } else {
            let branch = self.ctx.var("GH_PUBLISH_BRANCH").to_string();
            self.git(stage, &repo_dir, &["push", REMOTE, &branch]).await?;
        }
        Ok(StageOutcome::Completed)
    }

    /// Paths to stage: the publish folder, assets, and generated pages
    fn staged_paths(&self) -> Vec<String> {
        let publish_folder = self.ctx.var("DOCUMENT_PUBLISH_FOLDER");
        let mut paths = vec![if publish_folder.is_empty() {
            ".".to_string()
        } else {
            publish_folder.to_string()
        }];
        paths.extend(
            self.ctx
                .var("DOCUMENT_ASSETS")
                .split_whitespace()
                .map(str::to_string),
        );
        for tracked in ["ALL_ASSETS", "LATEST_ASSETS"] {
            if let Some(dir) = self.ctx.config.get(tracked) {
                paths.push(dir.to_string());
            }
        }
        paths
    }

    pub(super) async fn clean_up(&mut self) -> Result<StageOutcome> {
        let stage = Stage::CleanUp;
        let repo_dir = self.repo_dir(stage)?;
        if !self.ctx.flag("FLAG_CLEAN_DOCUMENT") {
            return Ok(StageOutcome::Skipped(format!(
                "Leaving git repo as is at {}",
                repo_dir.display()
            )));
        }

        info!("Cleaning up git repo at {}", repo_dir.display());
        tokio::fs::remove_dir_all(&repo_dir)
            .await
            .map_err(|e| AutodocsError::stage(stage, format!("{}: {}", repo_dir.display(), e)))?;
        Ok(StageOutcome::Completed)
    }
}
