//! Core domain models for autodocs
//!
//! Configuration, the publish decision, the pipeline context threaded
//! through every stage, and the errors that end a run.

pub mod config;
pub mod context;
pub mod decision;
pub mod error;
pub mod project;
pub mod stage;
pub mod state;

pub use config::ConfigStore;
pub use context::*;
pub use decision::PublishDecision;
pub use error::{AutodocsError, ProviderKind, Result};
pub use project::ProjectManifest;
pub use stage::Stage;
pub use state::*;
