//! Publish targets
//!
//! A target validates its own variables and knows how to run each
//! [`Stage`] of the publish pipeline against a [`PipelineContext`].

pub mod github_pages;

use crate::core::{AutodocsError, ConfigStore, PipelineContext, ProviderKind, Result, Stage};
use crate::execution::CommandExecutor;
use async_trait::async_trait;
pub use github_pages::GithubPages;

/// How a stage finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage did its work
    Completed,
    /// The stage was gated off; the pipeline continues
    Skipped(String),
}

/// Somewhere generated documentation can be published
#[async_trait]
pub trait PublishTarget: Send + Sync {
    /// Registry key, as used in `SELECT_PUBLISH`
    fn name(&self) -> &'static str;

    /// Variable holding the access token (redacted from output)
    fn token_variable(&self) -> &'static str;

    /// Require the target's variables and derive its defaults
    fn init(&self, config: &mut ConfigStore) -> Result<()>;

    /// Run one pipeline stage
    async fn run_stage(
        &self,
        stage: Stage,
        ctx: &mut PipelineContext,
        executor: &dyn CommandExecutor,
    ) -> Result<StageOutcome>;
}

/// Look up the target selected by `SELECT_PUBLISH`
pub fn select(name: &str) -> Result<Box<dyn PublishTarget>> {
    match name {
        github_pages::NAME => Ok(Box::new(GithubPages)),
        _ => Err(AutodocsError::UnsupportedProvider {
            kind: ProviderKind::Publish,
            name: name.to_string(),
        }),
    }
}
