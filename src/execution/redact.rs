//! Access-token redaction for anything that reaches the logs

use crate::core::ConfigStore;
use crate::execution::command::CommandError;

/// Replacement text for a redacted token
pub const REDACTED: &str = "[secure]";

/// Strips the access token out of text before it is printed
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    secret: Option<String>,
}

impl Redactor {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// A redactor that leaves text untouched
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Redact `token_var` when `FLAG_STRIP_TOKEN_OUTPUT` is `"true"`
    pub fn from_config(config: &ConfigStore, token_var: &str) -> Self {
        if config.flag("FLAG_STRIP_TOKEN_OUTPUT") {
            Self::new(config.get(token_var).map(str::to_string))
        } else {
            Self::disabled()
        }
    }

    pub fn redact(&self, text: &str) -> String {
        match &self.secret {
            Some(secret) => text.replace(secret.as_str(), REDACTED),
            None => text.to_string(),
        }
    }

    pub fn redact_error(&self, err: CommandError) -> CommandError {
        match err {
            CommandError::Spawn { command, message } => CommandError::Spawn {
                command: self.redact(&command),
                message: self.redact(&message),
            },
            CommandError::Timeout { command, secs } => CommandError::Timeout {
                command: self.redact(&command),
                secs,
            },
            CommandError::Failed {
                command,
                code,
                output,
            } => CommandError::Failed {
                command: self.redact(&command),
                code,
                output: self.redact(&output),
            },
        }
    }
}
