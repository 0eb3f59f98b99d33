//! Test utility functions for autodocs scenarios

use async_trait::async_trait;
use autodocs::core::StageState;
use autodocs::execution::{CommandError, CommandExecutor, CommandOutput, CommandSpec, PublishEvent};
use autodocs::{Autodocs, ConfigStore, RunOutcome, Stage};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const TOKEN: &str = "s3cr3t-token";

type Responder = Arc<dyn Fn(&CommandSpec) -> CommandOutput + Send + Sync>;

/// Scripted stand-in for git and npm
///
/// Records every command. Answers with the first response whose prefix
/// matches `program args...`, or an empty success.
#[derive(Clone, Default)]
pub struct FakeExecutor {
    calls: Arc<Mutex<Vec<CommandSpec>>>,
    responses: Arc<Mutex<Vec<(Vec<String>, Responder)>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, prefix: &[&str], output: CommandOutput) -> Self {
        self.respond_with(prefix, move |_| output.clone())
    }

    /// Answer by running `responder`, which may also touch the file system
    pub fn respond_with<F>(self, prefix: &[&str], responder: F) -> Self
    where
        F: Fn(&CommandSpec) -> CommandOutput + Send + Sync + 'static,
    {
        self.responses.lock().unwrap().push((
            prefix.iter().map(|s| s.to_string()).collect(),
            Arc::new(responder),
        ));
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(CommandSpec::command_line).collect()
    }

    /// Whether a recorded command line starts with `prefix`
    pub fn ran(&self, prefix: &str) -> bool {
        self.command_lines().iter().any(|line| line.starts_with(prefix))
    }
}

#[async_trait]
impl CommandExecutor for FakeExecutor {
    async fn execute(&self, command: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(command.clone());

        let mut words = vec![command.program.clone()];
        words.extend(command.args.iter().cloned());

        let responder = self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| words.starts_with(prefix))
            .map(|(_, responder)| responder.clone());
        Ok(match responder {
            Some(responder) => responder(command),
            None => CommandOutput::ok(""),
        })
    }
}

/// A host project in a temporary directory
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    /// `unicorn-docs` 1.2.3 with both hooks declared and docs generated
    pub fn new() -> Self {
        Self::with_manifest(
            r#"{
                "name": "unicorn-docs",
                "version": "1.2.3",
                "scripts": {"generatedocs": "jsdoc -d documentation", "testdocs": "true"}
            }"#,
        )
    }

    pub fn with_manifest(manifest: &str) -> Self {
        let project = Self {
            dir: TempDir::new().unwrap(),
        };
        project.write("package.json", manifest);
        project.write("documentation/index.html", "<h1>unicorn-docs</h1>");
        project.write("documentation/scripts/app.js", "var unicorn;");
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// Where the working clone of the publish branch is staged
    pub fn repo_dir(&self) -> PathBuf {
        self.path().join("autodocs").join("gh-pages")
    }

    /// What the variable setup script prints for this project
    pub fn set_up_vars_output(&self) -> String {
        format!(
            "GHPAGES_DIR={}\n\
             REPO_URL_UNAUTH=https://github.com/bguiz/unicorn-docs.git\n\
             REPO_URL_AUTH=https://{}@github.com/bguiz/unicorn-docs.git\n\
             ALL_DIR=api/all\n\
             LATEST_DIR=api/latest\n",
            self.repo_dir().display(),
            TOKEN
        )
    }

    /// A fake executor that answers the variable setup script
    pub fn executor(&self) -> FakeExecutor {
        FakeExecutor::new().respond(&["sh"], CommandOutput::ok(self.set_up_vars_output()))
    }
}

/// The environment of the publishing job of a Travis branch build
pub fn travis_branch_build() -> ConfigStore {
    ConfigStore::from_vars([
        ("TRAVIS_REPO_SLUG", "bguiz/unicorn-docs"),
        ("TRAVIS_PULL_REQUEST", "false"),
        ("TRAVIS_BRANCH", "master"),
        ("TRAVIS_BUILD_NUMBER", "42"),
        ("TRAVIS_JOB_NUMBER", "42.1"),
        ("TRAVIS_COMMIT", "deadbeef"),
        ("GH_TOKEN", TOKEN),
    ])
}

/// Events received by a handler, in order
pub fn record_events<E: CommandExecutor>(engine: &mut Autodocs<E>) -> Arc<Mutex<Vec<PublishEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    engine.add_event_handler(move |event| sink.lock().unwrap().push(event));
    events
}

/// Run the full pipeline for `project`
pub async fn run(
    project: &Project,
    executor: &FakeExecutor,
    config: ConfigStore,
) -> autodocs::core::Result<RunOutcome> {
    Autodocs::new(executor.clone()).run(config, project.path()).await
}

/// Stage states of a published run
pub fn stage_states(outcome: &RunOutcome) -> Vec<(Stage, StageState)> {
    match outcome {
        RunOutcome::Published { report, .. } => report.stages.clone(),
        other => panic!("expected a published outcome, got {:?}", other),
    }
}

pub fn state_of(outcome: &RunOutcome, stage: Stage) -> StageState {
    stage_states(outcome)
        .into_iter()
        .find(|(s, _)| *s == stage)
        .map(|(_, st)| st)
        .unwrap()
}

/// Assert that `stage` was skipped with a reason containing `text`
pub fn assert_skipped(outcome: &RunOutcome, stage: Stage, text: &str) {
    match state_of(outcome, stage) {
        StageState::Skipped { reason } => {
            assert!(reason.contains(text), "{} skipped with `{}`", stage, reason)
        }
        other => panic!("expected {} to be skipped, got {:?}", stage, other),
    }
}

pub fn assert_completed(outcome: &RunOutcome, stage: Stage) {
    let state = state_of(outcome, stage);
    assert!(
        matches!(state, StageState::Completed { .. }),
        "expected {} to complete, got {:?}",
        stage,
        state
    );
}

pub fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path.as_ref())
        .unwrap_or_else(|e| panic!("reading {}: {}", path.as_ref().display(), e))
}
