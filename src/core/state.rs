//! Execution state models

use crate::core::stage::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Run has not started
    Pending,
    /// Stages are executing
    Running,
    /// Every stage completed or was skipped
    Completed,
    /// A stage failed
    Failed,
}

/// State of a single stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageState {
    /// Not reached yet
    Pending,
    /// Currently executing
    Running { started_at: DateTime<Utc> },
    /// Finished successfully
    Completed {
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
    /// Gated off by a flag or by earlier results
    Skipped { reason: String },
    /// Failed; later stages stay `Pending`
    Failed {
        error: String,
        failed_at: DateTime<Utc>,
    },
}

impl StageState {
    /// Check if stage is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StageState::Completed { .. } | StageState::Skipped { .. } | StageState::Failed { .. }
        )
    }
}

/// State of one publish run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Unique run ID
    pub execution_id: Uuid,

    /// Current status
    pub status: ExecutionStatus,

    /// When the first stage started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run completed or failed
    pub completed_at: Option<DateTime<Utc>>,

    /// Per-stage state, in execution order
    pub stages: Vec<(Stage, StageState)>,
}

impl RunState {
    /// Create a pending run covering `stages`
    pub fn new(stages: &[Stage]) -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            status: ExecutionStatus::Pending,
            started_at: None,
            completed_at: None,
            stages: stages.iter().map(|s| (*s, StageState::Pending)).collect(),
        }
    }

    /// Mark run as started
    pub fn start(&mut self) {
        self.status = ExecutionStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Mark run as completed
    pub fn complete(&mut self) {
        self.status = ExecutionStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark run as failed
    pub fn fail(&mut self) {
        self.status = ExecutionStatus::Failed;
        self.completed_at = Some(Utc::now());
    }

    /// Replace the state of `stage`
    pub fn set_stage(&mut self, stage: Stage, state: StageState) {
        if let Some(entry) = self.stages.iter_mut().find(|(s, _)| *s == stage) {
            entry.1 = state;
        }
    }
}
