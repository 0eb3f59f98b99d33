//! Documentation generate/test hooks (`npm run <script>`)

use super::Stages;
use crate::core::{AutodocsError, Result, Stage};
use crate::publish::StageOutcome;
use tracing::info;

impl Stages<'_> {
    pub(super) async fn generate_docs(&mut self) -> Result<StageOutcome> {
        if self.ctx.flag("FLAG_SKIP_GENERATE") {
            return Ok(StageOutcome::Skipped(
                "Re-using previously generated documentation".to_string(),
            ));
        }
        self.run_hook(Stage::GenerateDocs, "DOCUMENT_GENERATE_HOOK").await
    }

    pub(super) async fn test_docs(&mut self) -> Result<StageOutcome> {
        if self.ctx.flag("FLAG_SKIP_TEST") {
            return Ok(StageOutcome::Skipped(
                "Skipping tests for documentation".to_string(),
            ));
        }
        self.run_hook(Stage::TestDocs, "DOCUMENT_TEST_HOOK").await
    }

    async fn run_hook(&self, stage: Stage, hook_var: &str) -> Result<StageOutcome> {
        let hook = self.ctx.var(hook_var).to_string();
        // npm 1.x exits 0 for undeclared scripts, so check the manifest first
        if !self.ctx.manifest.has_script(&hook) {
            return Err(AutodocsError::stage(
                stage,
                format!("missing script: {}", hook),
            ));
        }

        info!("Invoking \"{}\" script", hook);
        let project_dir = self.ctx.project_dir.clone();
        self.run(stage, &project_dir, "npm", &["run", &hook]).await?;
        Ok(StageOutcome::Completed)
    }
}
