//! Provenance and schema descriptors attached to run summaries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version of the serialized summary layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Incremented for breaking changes.
    pub major: u32,
    /// Incremented for additive changes.
    pub minor: u32,
    /// Incremented for fixes.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Everything needed to replay a tabulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Hash of the election definition that was tabulated.
    pub input_hash: String,
    /// Seed driving the tie-breaker.
    pub seed: u64,
    /// RFC 3339 timestamp of the run.
    pub created_at: String,
    /// Crate versions involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}
