//! Orchestrator - validates configuration, decides, then drives the stages

use crate::{
    ci::{self, CiProvider},
    core::{
        config::apply_defaults, AutodocsError, ConfigStore, ExecutionStatus, PipelineContext,
        ProjectManifest, PublishDecision, PublishUrls, Result, Stage, StageState,
    },
    execution::{CommandExecutor, Redactor},
    publish::{self, PublishTarget, StageOutcome},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Events emitted while a run progresses
#[derive(Debug, Clone)]
pub enum PublishEvent {
    DecisionMade {
        decision: PublishDecision,
    },
    RunStarted {
        execution_id: Uuid,
        target: String,
    },
    StageStarted {
        stage: Stage,
    },
    StageCompleted {
        stage: Stage,
    },
    StageSkipped {
        stage: Stage,
        reason: String,
    },
    StageFailed {
        stage: Stage,
        error: String,
    },
    RunFinished {
        execution_id: Uuid,
        status: ExecutionStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(PublishEvent) + Send + Sync>;

/// Summary of a run that went through the stages
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub execution_id: Uuid,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub stages: Vec<(Stage, StageState)>,
    pub num_files_changed: Option<usize>,
    pub urls: Option<PublishUrls>,
}

impl PublishReport {
    fn from_context(ctx: &PipelineContext) -> Self {
        Self {
            execution_id: ctx.state.execution_id,
            started_at: ctx.state.started_at,
            completed_at: ctx.state.completed_at,
            stages: ctx.state.stages.clone(),
            num_files_changed: ctx.num_files_changed,
            urls: ctx.urls.clone(),
        }
    }
}

/// How a successful invocation ended
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum RunOutcome {
    /// The CI provider declined; nothing was run
    NotPublished { decision: PublishDecision },
    /// `FLAG_SKIP_PUBLISH_RUN` stopped the run after validation
    PublishRunSkipped { decision: PublishDecision },
    /// Every stage completed or was skipped
    Published {
        decision: PublishDecision,
        report: PublishReport,
    },
}

impl RunOutcome {
    pub fn decision(&self) -> &PublishDecision {
        match self {
            RunOutcome::NotPublished { decision }
            | RunOutcome::PublishRunSkipped { decision }
            | RunOutcome::Published { decision, .. } => decision,
        }
    }
}

/// A validated run: configuration resolved, providers initialized
pub struct PreparedRun {
    pub ctx: PipelineContext,
    ci: Box<dyn CiProvider>,
    target: Box<dyn PublishTarget>,
}

impl PreparedRun {
    /// Ask the CI provider whether this build publishes
    pub fn decision(&self) -> PublishDecision {
        self.ci.should_run(&self.ctx.config)
    }

    pub fn ci_name(&self) -> &'static str {
        self.ci.name()
    }

    pub fn target_name(&self) -> &'static str {
        self.target.name()
    }

    /// Resolved variables, sorted, with the access token redacted
    pub fn redacted_vars(&self) -> BTreeMap<String, String> {
        let redactor = Redactor::new(self.ctx.config.get(self.target.token_variable()).map(str::to_string));
        self.ctx
            .config
            .sorted()
            .into_iter()
            .map(|(name, value)| (name.to_string(), redactor.redact(value)))
            .collect()
    }
}

/// Drives one autodocs invocation
pub struct Autodocs<E> {
    executor: E,
    event_handlers: Vec<EventHandler>,
}

impl<E: CommandExecutor> Autodocs<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(PublishEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: PublishEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Resolve configuration and initialize the selected providers
    ///
    /// Spawns no subprocess. Any missing variable or unknown provider fails
    /// here, before a decision is made.
    pub fn prepare(&self, mut config: ConfigStore, project_dir: &Path) -> Result<PreparedRun> {
        let manifest = ProjectManifest::load(project_dir)?;
        manifest.apply(project_dir, &mut config);
        apply_defaults(&mut config)?;

        let ci = ci::select(config.value("SELECT_CI"))?;
        ci.init(&mut config)?;
        let target = publish::select(config.value("SELECT_PUBLISH"))?;
        target.init(&mut config)?;
        info!("Using CI `{}` and publish target `{}`", ci.name(), target.name());

        Ok(PreparedRun {
            ctx: PipelineContext::new(config, manifest, project_dir.to_path_buf()),
            ci,
            target,
        })
    }

    /// Validate and decide, without running any stage
    pub fn check(&self, config: ConfigStore, project_dir: &Path) -> Result<PublishDecision> {
        let decision = self.prepare(config, project_dir)?.decision();
        self.emit_event(PublishEvent::DecisionMade {
            decision: decision.clone(),
        });
        Ok(decision)
    }

    /// Full run: validate, decide, then publish if the decision is positive
    pub async fn run(&self, config: ConfigStore, project_dir: &Path) -> Result<RunOutcome> {
        let mut prepared = self.prepare(config, project_dir)?;
        let decision = prepared.decision();
        info!("{}", decision.message);
        self.emit_event(PublishEvent::DecisionMade {
            decision: decision.clone(),
        });

        if !decision.flag {
            return Ok(RunOutcome::NotPublished { decision });
        }
        if prepared.ctx.flag("FLAG_SKIP_PUBLISH_RUN") {
            info!("FLAG_SKIP_PUBLISH_RUN is set, not running any stage");
            return Ok(RunOutcome::PublishRunSkipped { decision });
        }

        self.publish(&mut prepared).await?;
        let report = PublishReport::from_context(&prepared.ctx);
        Ok(RunOutcome::Published { decision, report })
    }

    /// Run every stage in order, stopping at the first failure
    pub async fn publish(&self, prepared: &mut PreparedRun) -> Result<()> {
        let PreparedRun { ctx, target, .. } = prepared;
        let execution_id = ctx.state.execution_id;

        ctx.state.start();
        self.emit_event(PublishEvent::RunStarted {
            execution_id,
            target: target.name().to_string(),
        });

        for stage in Stage::ALL {
            let started_at = Utc::now();
            ctx.state.set_stage(stage, StageState::Running { started_at });
            self.emit_event(PublishEvent::StageStarted { stage });
            info!("Stage {}", stage);

            match target.run_stage(stage, ctx, &self.executor).await {
                Ok(StageOutcome::Completed) => {
                    ctx.state.set_stage(
                        stage,
                        StageState::Completed {
                            started_at,
                            completed_at: Utc::now(),
                        },
                    );
                    self.emit_event(PublishEvent::StageCompleted { stage });
                }
                Ok(StageOutcome::Skipped(reason)) => {
                    info!("{}", reason);
                    ctx.state.set_stage(
                        stage,
                        StageState::Skipped {
                            reason: reason.clone(),
                        },
                    );
                    self.emit_event(PublishEvent::StageSkipped { stage, reason });
                }
                Err(e) => {
                    let e = match e {
                        AutodocsError::StageFailure { .. } => e,
                        other => AutodocsError::stage(stage, other.to_string()),
                    };
                    error!("{}", e);
                    ctx.state.set_stage(
                        stage,
                        StageState::Failed {
                            error: e.to_string(),
                            failed_at: Utc::now(),
                        },
                    );
                    ctx.state.fail();
                    self.emit_event(PublishEvent::StageFailed {
                        stage,
                        error: e.to_string(),
                    });
                    self.emit_event(PublishEvent::RunFinished {
                        execution_id,
                        status: ExecutionStatus::Failed,
                    });
                    return Err(e);
                }
            }
        }

        ctx.state.complete();
        self.emit_event(PublishEvent::RunFinished {
            execution_id,
            status: ExecutionStatus::Completed,
        });
        Ok(())
    }
}
