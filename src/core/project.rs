//! The host project whose documentation is published

use crate::core::config::ConfigStore;
use crate::core::error::{AutodocsError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the manifest read from the project directory
pub const MANIFEST_FILE: &str = "package.json";

/// The parts of `package.json` autodocs cares about
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectManifest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    /// Declared npm scripts (`npm run <name>`)
    #[serde(default)]
    pub scripts: HashMap<String, String>,
}

/// `major.minor.patch[.more]` split of a version string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectVersion {
    pub major: String,
    pub minor: String,
    /// Everything after the minor component, re-joined with `.`
    pub patch: String,
}

impl ProjectVersion {
    pub fn parse(version: &str) -> Self {
        let mut tokens = version.split('.');
        let major = tokens.next().unwrap_or("").to_string();
        let minor = tokens.next().unwrap_or("").to_string();
        let patch = tokens.collect::<Vec<_>>().join(".");
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl ProjectManifest {
    /// Read `package.json` from `project_dir`
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| AutodocsError::Manifest {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|message| AutodocsError::Manifest { path, message })
    }

    /// Parse manifest JSON
    pub fn from_json(json: &str) -> std::result::Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    pub fn version(&self) -> ProjectVersion {
        ProjectVersion::parse(&self.version)
    }

    /// Whether `npm run <name>` refers to a declared script
    pub fn has_script(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }

    /// Set the read-only project variables
    pub fn apply(&self, project_dir: &Path, config: &mut ConfigStore) {
        let version = self.version();
        config.set("PROJECT_NAME", self.name.as_str());
        config.set("PROJECT_DIR", project_dir.to_string_lossy());
        config.set("MAJOR_VERSION", version.major);
        config.set("MINOR_VERSION", version.minor);
        config.set("PATCH_VERSION", version.patch);
    }
}

/// Resolve the project directory to an absolute path
pub fn resolve_project_dir(dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => PathBuf::from("."),
    };
    std::path::absolute(&dir).map_err(|e| AutodocsError::Manifest {
        path: dir.join(MANIFEST_FILE),
        message: e.to_string(),
    })
}
