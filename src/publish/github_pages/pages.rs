//! "all versions" index page and "latest" redirect

use super::{blocking, Stages};
use crate::core::{AutodocsError, Result, Stage};
use crate::publish::StageOutcome;
use minijinja::{context, Environment};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use tracing::info;

const ALL_TEMPLATE: &str = include_str!("templates/all.html");
const LATEST_TEMPLATE: &str = include_str!("templates/latest.html");

/// Directory names under the publish root that are not versions
const RESERVED: &[&str] = &["all", "latest"];

const INDEX_FILE: &str = "index.html";

/// The `.html` name turns on auto-escaping
fn render(name: &str, source: &'static str, ctx: minijinja::Value) -> std::result::Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(name, source)?;
    env.get_template(name)?.render(ctx)
}

pub(crate) fn render_all_page(name: &str, versions: &[String]) -> std::result::Result<String, minijinja::Error> {
    render("all.html", ALL_TEMPLATE, context! { name => name, versions => versions })
}

pub(crate) fn render_latest_page(name: &str, subfolder: &str) -> std::result::Result<String, minijinja::Error> {
    render("latest.html", LATEST_TEMPLATE, context! { name => name, subfolder => subfolder })
}

/// Dot-separated numeric comparison, falling back to string order per component
fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

/// Version directories directly under `root`, in version order
fn list_versions(root: &Path) -> std::io::Result<Vec<String>> {
    let mut versions = Vec::new();
    if !root.is_dir() {
        return Ok(versions);
    }
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || RESERVED.contains(&name.as_str()) {
            continue;
        }
        versions.push(name);
    }
    versions.sort_by(|a, b| compare_versions(a, b));
    Ok(versions)
}

fn write_page(dir: &Path, html: String) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(INDEX_FILE), html)
}

impl Stages<'_> {
    pub(super) async fn build_index_page(&mut self) -> Result<StageOutcome> {
        let stage = Stage::BuildIndexPage;
        if let Some(reason) = self.page_disabled("FLAG_ALL_PAGE", "all") {
            self.ctx.config.set("ALL_ASSETS", "");
            return Ok(StageOutcome::Skipped(reason));
        }

        let repo_dir = self.repo_dir(stage)?;
        let all_dir = self.produced(stage, "ALL_DIR")?;
        let root = repo_dir.join(self.ctx.var("DOCUMENT_PUBLISH_FOLDER_ROOT"));
        let versions = blocking(stage, move || list_versions(&root)).await?;
        info!("Creating an all page for {} versions", versions.len());

        let html = render_all_page(self.ctx.var("PROJECT_NAME"), &versions)
            .map_err(|e| AutodocsError::stage(stage, e.to_string()))?;
        let dir = repo_dir.join(&all_dir);
        blocking(stage, move || write_page(&dir, html)).await?;

        self.ctx.config.set("ALL_ASSETS", all_dir);
        Ok(StageOutcome::Completed)
    }

    pub(super) async fn build_latest_alias(&mut self) -> Result<StageOutcome> {
        let stage = Stage::BuildLatestAlias;
        if let Some(reason) = self.page_disabled("FLAG_LATEST_PAGE", "latest") {
            self.ctx.config.set("LATEST_ASSETS", "");
            return Ok(StageOutcome::Skipped(reason));
        }

        let repo_dir = self.repo_dir(stage)?;
        let latest_dir = self.produced(stage, "LATEST_DIR")?;
        info!("Creating a latest alias");

        let html = render_latest_page(
            self.ctx.var("PROJECT_NAME"),
            self.ctx.var("DOCUMENT_PUBLISH_SUBFOLDER"),
        )
        .map_err(|e| AutodocsError::stage(stage, e.to_string()))?;
        let dir = repo_dir.join(&latest_dir);
        blocking(stage, move || write_page(&dir, html)).await?;

        self.ctx.config.set("LATEST_ASSETS", latest_dir);
        Ok(StageOutcome::Completed)
    }

    fn page_disabled(&self, flag: &str, page: &str) -> Option<String> {
        if !self.ctx.flag(flag) {
            Some(format!("Not creating a {} page", page))
        } else if self.ctx.flag("FLAG_PUBLISH_IN_ROOT") {
            Some(format!("Not creating a {} page when publishing in root", page))
        } else {
            None
        }
    }
}
