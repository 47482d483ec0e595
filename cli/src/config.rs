//! Settings with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Settings file: `--config <FILE>`, `$ABPRUNE_CONFIG` or `./abprune.toml`
//! 3. Environment variables: `ABPRUNE__<SECTION>__<KEY>`, e.g. `ABPRUNE__PROBLEM__DEPTH=5`
//! 4. Command-line flags (applied by the caller)

use std::path::{Path, PathBuf};

use abprune_tree::TreeParams;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Settings file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "abprune.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default shape for new problems
    pub problem: TreeParams,
    /// JSON-lines file holding recorded attempts
    pub scores_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            problem: TreeParams::default(),
            scores_path: PathBuf::from("abprune-scores.jsonl"),
        }
    }
}

impl Settings {
    /// Load settings. An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        Self::load_with_env(&file, required, Environment::with_prefix("ABPRUNE"))
    }

    fn load_with_env(file: &Path, required: bool, env: Environment) -> Result<Self> {
        debug!(file = %file.display(), required, "loading settings");
        let settings: Settings = Config::builder()
            .add_source(File::from(file).required(required))
            .add_source(env.prefix_separator("__").separator("__").try_parsing(true))
            .build()
            .with_context(|| format!("failed to read settings from {}", file.display()))?
            .try_deserialize()
            .context("invalid settings")?;
        settings
            .problem
            .validate()
            .context("invalid problem defaults in settings")?;
        Ok(settings)
    }
}
