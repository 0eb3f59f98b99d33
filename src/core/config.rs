//! Configuration store over a flat string-keyed environment

use crate::core::error::{AutodocsError, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Defaults applied at the start of every run, in order.
///
/// `DOCUMENT_PUBLISH_FOLDER` is not listed here because its default depends
/// on `FLAG_PUBLISH_IN_ROOT`; see [`apply_defaults`].
pub const DEFAULTS: &[(&str, &str)] = &[
    ("GIT_USER", "autodocs Git User"),
    ("GIT_EMAIL", "autodocs-git-user@bguiz.com"),
    ("FLAG_COPY_ASSETS", "false"),
    ("FLAG_PUBLISH_ON_RELEASE", "false"),
    ("FLAG_CLEAN_DOCUMENT", "false"),
    ("FLAG_STRIP_TOKEN_OUTPUT", "true"),
    ("FLAG_LATEST_PAGE", "true"),
    ("FLAG_ALL_PAGE", "true"),
    ("FLAG_SKIP_PUSH", "false"),
    ("FLAG_SKIP_GENERATE", "false"),
    ("FLAG_SKIP_TEST", "false"),
    ("FLAG_SKIP_PUBLISH_RUN", "false"),
    ("DOCUMENT_BRANCH", "master"),
    ("DOCUMENT_JOB_INDEX", "1"),
    ("DOCUMENT_GENERATE_HOOK", "generatedocs"),
    ("DOCUMENT_TEST_HOOK", "testdocs"),
    ("DOCUMENT_GENERATED_FOLDER", "documentation"),
    ("DOCUMENT_PUBLISH_FOLDER_ROOT", "api"),
    ("DOCUMENT_PUBLISH_SUBFOLDER", "{{MAJOR_VERSION}}.{{MINOR_VERSION}}"),
    ("FLAG_PUBLISH_IN_ROOT", "false"),
    ("DOCUMENT_ASSETS", ""),
    ("FLAG_TESTING", "false"),
];

/// Variables resolved with [`ConfigStore::substitute`]. Earlier entries are
/// referenced by later ones, so the order matters.
pub const SUBSTITUTED: &[&str] = &[
    "DOCUMENT_PUBLISH_FOLDER_ROOT",
    "DOCUMENT_PUBLISH_SUBFOLDER",
    "DOCUMENT_PUBLISH_FOLDER",
];

const NESTED_PUBLISH_FOLDER: &str = "{{DOCUMENT_PUBLISH_FOLDER_ROOT}}/{{DOCUMENT_PUBLISH_SUBFOLDER}}";

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{[^{}]+\}\}").expect("placeholder regex is valid"))
}

/// Typed accessor over the run's configuration variables
///
/// A value that is an empty string is treated exactly like an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    vars: HashMap<String, String>,
}

impl ConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self { vars: HashMap::new() }
    }

    /// Snapshot the current process environment
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build a store from name/value pairs
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// True iff `name` holds a non-empty value
    pub fn exists(&self, name: &str) -> bool {
        self.vars.get(name).is_some_and(|v| !v.is_empty())
    }

    /// Fail with `MissingVariable` unless `name` exists
    pub fn require(&self, name: &str) -> Result<()> {
        if self.exists(name) {
            Ok(())
        } else {
            Err(AutodocsError::MissingVariable(name.to_string()))
        }
    }

    /// Set `name` to `value` unless it already exists; returns the current value
    pub fn default(&mut self, name: &str, value: &str) -> &str {
        if !self.exists(name) {
            self.vars.insert(name.to_string(), value.to_string());
        }
        self.value(name)
    }

    /// Replace each `{{OTHER}}` in the value of `name` with the value of `OTHER`
    ///
    /// Single pass: the substituted values are not themselves expanded.
    pub fn substitute(&mut self, name: &str) -> Result<&str> {
        let current = self.value(name);
        let mut resolved = String::with_capacity(current.len());
        let mut last = 0;
        for placeholder in placeholder_regex().find_iter(current) {
            let other = placeholder
                .as_str()
                .trim_matches(|c| c == '{' || c == '}')
                .trim();
            self.require(other)?;
            resolved.push_str(&current[last..placeholder.start()]);
            resolved.push_str(self.value(other));
            last = placeholder.end();
        }
        resolved.push_str(&current[last..]);

        if self.vars.contains_key(name) {
            self.vars.insert(name.to_string(), resolved);
        }
        Ok(self.value(name))
    }

    /// Project the store onto exactly the given names (absent names are left out)
    pub fn selected(&self, names: &[&str]) -> HashMap<String, String> {
        names
            .iter()
            .filter_map(|name| {
                self.vars
                    .get(*name)
                    .map(|value| (name.to_string(), value.clone()))
            })
            .collect()
    }

    /// Merge `NAME=value` lines produced by an external command into the store
    pub fn ingest_key_value_text(&mut self, text: &str) {
        let vars = std::mem::take(&mut self.vars);
        self.vars = parse_key_value_text(text, vars);
    }

    /// Value of `name`, or the empty string when unset
    pub fn value(&self, name: &str) -> &str {
        self.vars.get(name).map(String::as_str).unwrap_or("")
    }

    /// Value of `name` when it exists
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Whether a `FLAG_*` variable is exactly `"true"`
    pub fn flag(&self, name: &str) -> bool {
        self.value(name) == "true"
    }

    /// Overwrite a variable
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.vars.insert(name.to_string(), value.into());
    }

    /// Apply `NAME=VALUE` overrides (e.g. from the command line)
    pub fn extend<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.vars.extend(overrides);
    }

    /// All variables, sorted by name
    pub fn sorted(&self) -> BTreeMap<&str, &str> {
        self.vars
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Parse `NAME=value` lines into `base`, overriding existing names
///
/// The first `=` delimits name from value; lines without one, or with an
/// empty name, are ignored.
pub fn parse_key_value_text(
    text: &str,
    mut base: HashMap<String, String>,
) -> HashMap<String, String> {
    for line in text.lines() {
        if let Some((name, value)) = line.split_once('=') {
            if !name.is_empty() {
                base.insert(name.to_string(), value.to_string());
            }
        }
    }
    base
}

/// Apply the global defaults and resolve the publish folder placeholders
///
/// Project variables (`MAJOR_VERSION` etc.) must already be present.
pub fn apply_defaults(config: &mut ConfigStore) -> Result<()> {
    config.default("SELECT_CI", "travis");
    config.default("SELECT_PUBLISH", "github-pages");
    for (name, value) in DEFAULTS {
        config.default(name, value);
    }

    let publish_folder = if config.flag("FLAG_PUBLISH_IN_ROOT") {
        ""
    } else {
        NESTED_PUBLISH_FOLDER
    };
    config.default("DOCUMENT_PUBLISH_FOLDER", publish_folder);

    for name in SUBSTITUTED {
        config.substitute(name)?;
    }
    Ok(())
}
