//! Continuous-integration providers
//!
//! A provider validates the variables its CI system exports and decides
//! whether the current build should publish.

pub mod travis;

use crate::core::{AutodocsError, ConfigStore, ProviderKind, PublishDecision, Result};
pub use travis::Travis;

/// A CI system autodocs can run under
pub trait CiProvider: Send + Sync {
    /// Registry key, as used in `SELECT_CI`
    fn name(&self) -> &'static str;

    /// Require the build-identity variables and derive `REPO_SLUG`
    fn init(&self, config: &mut ConfigStore) -> Result<()>;

    /// Decide whether this build publishes
    fn should_run(&self, config: &ConfigStore) -> PublishDecision;
}

/// Look up the provider selected by `SELECT_CI`
pub fn select(name: &str) -> Result<Box<dyn CiProvider>> {
    match name {
        travis::NAME => Ok(Box::new(Travis)),
        _ => Err(AutodocsError::UnsupportedProvider {
            kind: ProviderKind::Ci,
            name: name.to_string(),
        }),
    }
}
