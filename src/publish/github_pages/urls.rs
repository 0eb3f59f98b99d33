//! Public URLs of the published documentation

use super::Stages;
use crate::core::{ConfigStore, PublishUrls, Result};
use crate::publish::StageOutcome;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

fn user_page_regex() -> &'static Regex {
    static USER_PAGE: OnceLock<Regex> = OnceLock::new();
    USER_PAGE.get_or_init(|| Regex::new(r"^[^.]+\.github\.io$").expect("user page regex is valid"))
}

/// Custom domain from a `CNAME` file, if one was copied as an asset
fn custom_domain(config: &ConfigStore, project_dir: &Path) -> Option<String> {
    if !config.flag("FLAG_COPY_ASSETS") {
        return None;
    }
    if !config.value("DOCUMENT_ASSETS").split_whitespace().any(|asset| asset == "CNAME") {
        return None;
    }
    match std::fs::read_to_string(project_dir.join("CNAME")) {
        Ok(contents) => Some(contents.trim().to_string()).filter(|domain| !domain.is_empty()),
        Err(e) => {
            debug!("CNAME listed as an asset but unreadable: {}", e);
            None
        }
    }
}

/// Compute where the documentation will be served from
pub fn publish_urls(config: &ConfigStore, project_dir: &Path) -> PublishUrls {
    let domain = custom_domain(config, project_dir).unwrap_or_else(|| {
        let user = config.value("GH_USER");
        if user_page_regex().is_match(user) {
            user.to_string()
        } else {
            format!("{}.github.io", user)
        }
    });

    let base_url = format!("http://{}/{}", domain, config.value("GH_REPO"));
    let docs_url = match config.value("DOCUMENT_PUBLISH_FOLDER") {
        "" => base_url.clone(),
        folder => format!("{}/{}", base_url, folder),
    };
    PublishUrls { base_url, docs_url }
}

impl Stages<'_> {
    pub(super) fn report_urls(&mut self) -> Result<StageOutcome> {
        let urls = publish_urls(&self.ctx.config, &self.ctx.project_dir);
        info!("Base URL: {}", urls.base_url);
        info!("API  URL: {}", urls.docs_url);
        self.ctx.urls = Some(urls);
        Ok(StageOutcome::Completed)
    }
}
