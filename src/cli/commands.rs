//! CLI command definitions

use clap::Args;

/// Validate configuration and print the publish decision
#[derive(Debug, Args, Clone)]
pub struct CheckCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Print the resolved configuration, token redacted
#[derive(Debug, Args, Clone)]
pub struct VarsCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Parse NAME=VALUE pairs
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("Invalid NAME=VALUE pair: {}", s)),
    }
}
