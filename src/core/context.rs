//! Pipeline context - configuration plus run-scoped derived state

use crate::core::config::ConfigStore;
use crate::core::project::ProjectManifest;
use crate::core::state::RunState;
use crate::core::stage::Stage;
use serde::Serialize;
use std::path::PathBuf;

/// Public locations of the published documentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishUrls {
    /// Site root for the repository, e.g. `http://user.github.io/repo`
    pub base_url: String,
    /// Version-specific documentation, e.g. `http://user.github.io/repo/api/1.2`
    pub docs_url: String,
}

/// Shared state of one publish run
///
/// Created once per run; every stage receives it by `&mut` and adds to it.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Configuration variables
    pub config: ConfigStore,

    /// The host project's manifest
    pub manifest: ProjectManifest,

    /// Absolute path of the documentation-owning project
    pub project_dir: PathBuf,

    /// Throwaway clone used to stage the publish branch
    pub repo_dir: Option<PathBuf>,

    /// Whether the publish branch exists on the remote (0 or 1)
    pub num_publish_branches: Option<usize>,

    /// Modified or untracked files in the clone after staging
    pub num_files_changed: Option<usize>,

    /// Set by the final stage
    pub urls: Option<PublishUrls>,

    /// Per-stage progress
    pub state: RunState,
}

impl PipelineContext {
    pub fn new(config: ConfigStore, manifest: ProjectManifest, project_dir: PathBuf) -> Self {
        Self {
            config,
            manifest,
            project_dir,
            repo_dir: None,
            num_publish_branches: None,
            num_files_changed: None,
            urls: None,
            state: RunState::new(&Stage::ALL),
        }
    }

    /// Shortcut for `self.config.flag(name)`
    pub fn flag(&self, name: &str) -> bool {
        self.config.flag(name)
    }

    /// Shortcut for `self.config.value(name)`
    pub fn var(&self, name: &str) -> &str {
        self.config.value(name)
    }
}
