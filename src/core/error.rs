//! Error types for an autodocs run

use crate::core::stage::Stage;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which pluggable component a provider name was looked up for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Selected by `SELECT_CI`
    Ci,
    /// Selected by `SELECT_PUBLISH`
    Publish,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Ci => write!(f, "CI"),
            ProviderKind::Publish => write!(f, "publish"),
        }
    }
}

/// Errors that terminate a run
#[derive(Debug, Error)]
pub enum AutodocsError {
    /// A required configuration value is absent or empty
    #[error("Config variable `{0}` not set")]
    MissingVariable(String),

    /// `SELECT_CI` or `SELECT_PUBLISH` names an unknown implementation
    #[error("Unsupported {kind} provider `{name}`")]
    UnsupportedProvider { kind: ProviderKind, name: String },

    /// A pipeline stage failed; remaining stages were not run
    #[error("Stage {stage} failed: {cause}")]
    StageFailure { stage: Stage, cause: String },

    /// The host project's manifest could not be read
    #[error("Failed to read project manifest {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },
}

impl AutodocsError {
    pub fn stage(stage: Stage, cause: impl Into<String>) -> Self {
        AutodocsError::StageFailure {
            stage,
            cause: cause.into(),
        }
    }

    /// Name of the missing variable, if this is a `MissingVariable`
    pub fn missing_variable(&self) -> Option<&str> {
        match self {
            AutodocsError::MissingVariable(name) => Some(name),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AutodocsError>;
