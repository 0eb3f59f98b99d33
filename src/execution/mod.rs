//! Command execution and the stage orchestrator

pub mod command;
pub mod engine;
pub mod redact;

pub use command::{
    run_checked, CommandError, CommandExecutor, CommandOutput, CommandSpec, ExecutorConfig,
    SubprocessExecutor,
};
pub use engine::{Autodocs, EventHandler, PreparedRun, PublishEvent, PublishReport, RunOutcome};
pub use redact::Redactor;
