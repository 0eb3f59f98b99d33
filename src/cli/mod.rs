//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{parse_key_value, CheckCommand, VarsCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Publish generated documentation from a CI build
#[derive(Debug, Parser, Clone)]
#[command(name = "autodocs")]
#[command(version)]
#[command(about = "Publish versioned API documentation to GitHub Pages from CI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory containing package.json (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Configuration overrides (NAME=VALUE), applied on top of the environment
    #[arg(long = "var", global = true, value_parser = parse_key_value)]
    pub vars: Vec<(String, String)>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Validate, decide, and publish when the build qualifies (default)
    Run,

    /// Validate configuration and print the publish decision
    Check(CheckCommand),

    /// Print the resolved configuration
    Vars(VarsCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    /// The subcommand, defaulting to `run`
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}
