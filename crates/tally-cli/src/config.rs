use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tally_core::serde::from_yaml_str;

/// YAML-configurable settings for a tabulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Seed used by the tie-breaker.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Which artefacts get written next to `summary.json`.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Tie-breaker seeding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed. Without one the seed is drawn from OS entropy and reported.
    #[serde(default)]
    pub master_seed: Option<u64>,
    /// Free-form label copied into the summary.
    #[serde(default)]
    pub label: Option<String>,
}

/// Artefact selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write `audit.txt` and `media.txt`.
    #[serde(default = "default_true")]
    pub text_report: bool,
    /// List the ballot distribution after every IR round in the audit.
    #[serde(default = "default_true")]
    pub ballot_listing: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            text_report: true,
            ballot_listing: true,
        }
    }
}

/// Reads a run configuration, falling back to defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<RunConfig, Box<dyn Error>> {
    match path {
        Some(path) => Ok(from_yaml_str(&fs::read_to_string(path)?)?),
        None => Ok(RunConfig::default()),
    }
}
