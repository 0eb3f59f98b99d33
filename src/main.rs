use anyhow::{Context, Result};
use autodocs::cli::output::*;
use autodocs::cli::{Cli, Command};
use autodocs::core::project::resolve_project_dir;
use autodocs::{Autodocs, ConfigStore, ExecutorConfig, RunOutcome, SubprocessExecutor};
use std::path::Path;
use tracing::{error, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Per-command timeout in seconds for git and npm
const TIMEOUT_VAR: &str = "AUTODOCS_COMMAND_TIMEOUT";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    let mut config = ConfigStore::from_env();
    config.extend(cli.vars.iter().cloned());

    let mut executor_config = ExecutorConfig::new();
    if let Some(secs) = config.get(TIMEOUT_VAR) {
        let secs = secs
            .parse::<u64>()
            .with_context(|| format!("{} must be a number of seconds, got `{}`", TIMEOUT_VAR, secs))?;
        executor_config = executor_config.with_timeout(secs);
    }
    let mut engine = Autodocs::new(SubprocessExecutor::new(executor_config));

    let result = match cli.command() {
        Command::Run => run(&mut engine, config, &project_dir).await,
        Command::Check(cmd) => check(&engine, config, &project_dir, cmd.json),
        Command::Vars(cmd) => vars(&engine, config, &project_dir, cmd.json),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        println!("{}{}", CROSS, style("autodocs failed").red());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(
    engine: &mut Autodocs<SubprocessExecutor>,
    config: ConfigStore,
    project_dir: &Path,
) -> Result<()> {
    engine.add_event_handler(|event| println!("{}", format_event(&event)));

    let outcome = engine.run(config, project_dir).await?;
    println!("\n{}", format_outcome(&outcome));
    if let RunOutcome::Published { report, .. } = &outcome {
        if let Some(urls) = &report.urls {
            println!("{}{}", ROCKET, style(&urls.docs_url).bold());
        }
    }
    Ok(())
}

fn check(
    engine: &Autodocs<SubprocessExecutor>,
    config: ConfigStore,
    project_dir: &Path,
    json: bool,
) -> Result<()> {
    let decision = engine.check(config, project_dir)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        println!("{}", format_decision(&decision));
    }
    Ok(())
}

fn vars(
    engine: &Autodocs<SubprocessExecutor>,
    config: ConfigStore,
    project_dir: &Path,
    json: bool,
) -> Result<()> {
    let prepared = engine.prepare(config, project_dir)?;
    let vars = prepared.redacted_vars();
    if json {
        println!("{}", serde_json::to_string_pretty(&vars)?);
    } else {
        println!(
            "{}CI {} / publish {}",
            INFO,
            style(prepared.ci_name()).bold(),
            style(prepared.target_name()).bold()
        );
        for (name, value) in &vars {
            println!("  {}={}", style(name).cyan(), value);
        }
    }
    Ok(())
}
