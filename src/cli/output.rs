//! CLI output formatting

use crate::{
    core::{ExecutionStatus, PublishDecision, StageState},
    execution::{PublishEvent, PublishReport, RunOutcome},
};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "- ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format a stage state for display
pub fn format_stage_state(state: &StageState) -> String {
    match state {
        StageState::Pending => style("PENDING").dim().to_string(),
        StageState::Running { .. } => style("RUNNING").yellow().to_string(),
        StageState::Completed { .. } => style("COMPLETED").green().to_string(),
        StageState::Skipped { reason } => format!("{} ({})", style("SKIPPED").dim(), reason),
        StageState::Failed { .. } => style("FAILED").red().to_string(),
    }
}

/// Format a publish decision, one reason per line
pub fn format_decision(decision: &PublishDecision) -> String {
    let (icon, verdict) = if decision.flag {
        (CHECK, style("will publish").green().to_string())
    } else {
        (INFO, style("will not publish").yellow().to_string())
    };
    let mut lines = decision.message.lines();
    let mut out = format!("{}{}: {}", icon, lines.next().unwrap_or_default(), verdict);
    for line in lines {
        out.push_str("\n  ");
        out.push_str(&style(line).dim().to_string());
    }
    out
}

/// Format a publish event for display
pub fn format_event(event: &PublishEvent) -> String {
    match event {
        PublishEvent::DecisionMade { decision } => format_decision(decision),
        PublishEvent::RunStarted {
            execution_id,
            target,
        } => format!(
            "{}Publishing to {} ({})",
            ROCKET,
            style(target).bold(),
            style(&execution_id.to_string()[..8]).dim()
        ),
        PublishEvent::StageStarted { stage } => format!("{}{}", SPINNER, style(stage).cyan()),
        PublishEvent::StageCompleted { stage } => format!("{}{}", CHECK, style(stage).green()),
        PublishEvent::StageSkipped { stage, reason } => {
            format!("{}{}: {}", SKIP, style(stage).dim(), reason)
        }
        PublishEvent::StageFailed { stage, error } => {
            format!("{}{}: {}", CROSS, style(stage).red(), style(error).dim())
        }
        PublishEvent::RunFinished {
            execution_id,
            status,
        } => {
            let status_str = match status {
                ExecutionStatus::Completed => style("completed").green().to_string(),
                ExecutionStatus::Failed => style("failed").red().to_string(),
                other => format!("{:?}", other),
            };
            format!(
                "{}Publish run ({}) {}",
                INFO,
                style(&execution_id.to_string()[..8]).dim(),
                status_str
            )
        }
    }
}

/// Format the per-stage table of a finished run
pub fn format_report(report: &PublishReport) -> String {
    let mut out = String::new();
    for (stage, state) in &report.stages {
        out.push_str(&format!("  {:<32} {}\n", stage.name(), format_stage_state(state)));
    }
    if let Some(changed) = report.num_files_changed {
        out.push_str(&format!("  files changed: {}\n", style(changed).cyan()));
    }
    if let Some(urls) = &report.urls {
        out.push_str(&format!("  base url: {}\n", style(&urls.base_url).underlined()));
        out.push_str(&format!("  docs url: {}\n", style(&urls.docs_url).underlined()));
    }
    out
}

/// One-line summary of how a run ended
pub fn format_outcome(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::NotPublished { .. } => format!("{}Nothing published", INFO),
        RunOutcome::PublishRunSkipped { .. } => {
            format!("{}Publish run skipped (FLAG_SKIP_PUBLISH_RUN)", SKIP)
        }
        RunOutcome::Published { report, .. } => format!(
            "{}Documentation {}\n{}",
            CHECK,
            style("published").green(),
            format_report(report)
        ),
    }
}
