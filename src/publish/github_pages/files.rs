//! Copying generated documentation and assets into the working repo

use super::{blocking, Stages};
use crate::core::{AutodocsError, Result, Stage};
use crate::publish::StageOutcome;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use glob::MatchOptions;
use walkdir::WalkDir;

/// Remove everything in `dir` except `.git`, creating it if absent
fn clear_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        return fs::create_dir_all(dir);
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name() == ".git" {
            continue;
        }
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Recursively copy `src` into `dest`, returning the number of files copied
fn copy_tree(src: &Path, dest: &Path) -> io::Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Bash-style matching: wildcards never match a leading dot
fn glob_options() -> MatchOptions {
    MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    }
}

/// Whether `path` is `repo_dir`, inside it, or contains it
fn overlaps(path: &Path, repo_dir: &Path) -> bool {
    if path.starts_with(repo_dir) || repo_dir.starts_with(path) {
        return true;
    }
    match (fs::canonicalize(path), fs::canonicalize(repo_dir)) {
        (Ok(path), Ok(repo_dir)) => path.starts_with(&repo_dir) || repo_dir.starts_with(&path),
        _ => false,
    }
}

/// Expand whitespace-separated glob patterns relative to `base`
///
/// Matches are unique, in pattern order. Paths overlapping `repo_dir` are
/// left out so the working repo is never copied into itself.
fn match_assets(
    base: &Path,
    patterns: &str,
    repo_dir: &Path,
) -> std::result::Result<Vec<PathBuf>, String> {
    let mut matched: Vec<PathBuf> = Vec::new();
    for pattern in patterns.split_whitespace() {
        let full = base.join(pattern);
        let paths = glob::glob_with(&full.to_string_lossy(), glob_options())
            .map_err(|e| format!("invalid pattern {}: {}", pattern, e))?;
        let mut found = false;
        for path in paths {
            let path = path.map_err(|e| e.to_string())?;
            if overlaps(&path, repo_dir) {
                debug!("Not copying {} into the working repo", path.display());
                continue;
            }
            found = true;
            let relative = path
                .strip_prefix(base)
                .map_err(|e| e.to_string())?
                .to_path_buf();
            if !matched.contains(&relative) {
                matched.push(relative);
            }
        }
        if !found {
            return Err(format!("no files matched: {}", pattern));
        }
    }
    Ok(matched)
}

impl Stages<'_> {
    pub(super) async fn copy_generated_files(&mut self) -> Result<StageOutcome> {
        let stage = Stage::CopyGeneratedFiles;
        let repo_dir = self.repo_dir(stage)?;
        let source = self
            .ctx
            .project_dir
            .join(self.ctx.var("DOCUMENT_GENERATED_FOLDER"));
        if !source.is_dir() {
            return Err(AutodocsError::stage(
                stage,
                format!("generated documentation not found at {}", source.display()),
            ));
        }

        let dest = repo_dir.join(self.ctx.var("DOCUMENT_PUBLISH_FOLDER"));
        info!("Copying {} to {}", source.display(), dest.display());
        let copied = blocking(stage, move || {
            clear_dir(&dest)?;
            copy_tree(&source, &dest)
        })
        .await?;
        debug!("Copied {} generated files", copied);
        Ok(StageOutcome::Completed)
    }

    pub(super) async fn copy_assets(&mut self) -> Result<StageOutcome> {
        let stage = Stage::CopyAssets;
        if !self.ctx.flag("FLAG_COPY_ASSETS") {
            self.ctx.config.set("DOCUMENT_ASSETS", "");
            return Ok(StageOutcome::Skipped("FLAG_COPY_ASSETS is not set".to_string()));
        }

        let repo_dir = self.repo_dir(stage)?;
        let project_dir = self.ctx.project_dir.clone();
        let assets = match_assets(&project_dir, self.ctx.var("DOCUMENT_ASSETS"), &repo_dir)
            .map_err(|e| AutodocsError::stage(stage, e))?;
        info!("Copying {} assets", assets.len());

        blocking(stage, move || {
            for relative in &assets {
                let source = project_dir.join(relative);
                let target = repo_dir.join(relative);
                if source.is_dir() {
                    copy_tree(&source, &target)?;
                } else {
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::copy(&source, &target)?;
                }
            }
            Ok(())
        })
        .await?;
        Ok(StageOutcome::Completed)
    }
}
