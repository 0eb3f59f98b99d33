//! autodocs - publish versioned API documentation from a CI build

pub mod ci;
pub mod cli;
pub mod core;
pub mod execution;
pub mod publish;

// Re-export commonly used types
pub use crate::ci::CiProvider;
pub use crate::core::{AutodocsError, ConfigStore, PipelineContext, PublishDecision, Stage, StageState};
pub use crate::execution::{
    Autodocs, CommandExecutor, CommandOutput, CommandSpec, ExecutorConfig, PublishEvent,
    RunOutcome, SubprocessExecutor,
};
pub use crate::publish::{PublishTarget, StageOutcome};
