//! Publish decision

use serde::{Deserialize, Serialize};

/// Whether this build should publish, and why
///
/// `message` starts with a baseline line and gains one `\n- <reason>` line
/// per failed condition. Once `flag` is false it stays false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishDecision {
    pub flag: bool,
    pub message: String,
}

impl PublishDecision {
    /// Start an affirmative decision with a baseline message
    pub fn new(baseline: impl Into<String>) -> Self {
        Self {
            flag: true,
            message: baseline.into(),
        }
    }

    /// Record a failed condition
    pub fn fail(&mut self, reason: &str) {
        self.flag = false;
        self.message.push_str("\n- ");
        self.message.push_str(reason);
    }

    /// Record `reason` as a failure unless `condition` holds
    pub fn check(&mut self, condition: bool, reason: &str) {
        if !condition {
            self.fail(reason);
        }
    }

    /// The reasons that caused a negative decision
    pub fn reasons(&self) -> Vec<&str> {
        self.message
            .lines()
            .skip(1)
            .filter_map(|line| line.strip_prefix("- "))
            .collect()
    }
}
