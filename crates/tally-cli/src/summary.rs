use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tally_core::errors::TallyError;
use tally_core::{stable_hash_string, RunProvenance, SchemaVersion, TieBreaker};
use tally_ir::IrOutcome;
use tally_opl::OplOutcome;
use tracing::info;

use crate::input::{ElectionDefinition, PreparedElection};

/// Engine result tagged with the election kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "outcome", rename_all = "kebab-case")]
pub enum ElectionResult {
    /// Instant-runoff outcome.
    InstantRunoff(IrOutcome),
    /// Open-party-list outcome.
    OpenPartyList(OplOutcome),
}

/// Everything written to `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Layout version of this document.
    pub schema_version: SchemaVersion,
    /// Optional label from the run configuration.
    pub label: Option<String>,
    /// Seed, input hash and tool versions needed to replay the run.
    pub provenance: RunProvenance,
    /// Ranked ballots rejected by the half-ranked rule.
    pub invalidated_ballots: Vec<Vec<Option<u32>>>,
    /// Hash of `result`, independent of the run timestamp.
    pub outcome_hash: String,
    /// Engine result.
    pub result: ElectionResult,
}

/// Crate versions recorded in provenance.
pub fn tool_versions() -> BTreeMap<String, String> {
    [
        ("tally", env!("CARGO_PKG_VERSION")),
        ("tally-core", tally_core::VERSION),
        ("tally-ir", tally_ir::VERSION),
        ("tally-opl", tally_opl::VERSION),
    ]
    .into_iter()
    .map(|(name, version)| (name.to_string(), version.to_string()))
    .collect()
}

/// Validates and runs one election, stamping the summary with `seed`.
pub fn tabulate(
    definition: &ElectionDefinition,
    oracle: &mut dyn TieBreaker,
    seed: u64,
    label: Option<String>,
) -> Result<RunSummary, TallyError> {
    let input_hash = stable_hash_string(definition)?;
    let (result, invalidated_ballots) = match definition.prepare()? {
        PreparedElection::InstantRunoff { count, invalidated } => {
            (ElectionResult::InstantRunoff(count.run(oracle)?), invalidated)
        }
        PreparedElection::OpenPartyList(engine) => {
            (ElectionResult::OpenPartyList(engine.run(oracle)?), Vec::new())
        }
    };
    let outcome_hash = stable_hash_string(&result)?;
    info!(kind = definition.kind(), seed, %outcome_hash, "tabulated election");

    Ok(RunSummary {
        schema_version: SchemaVersion::default(),
        label,
        provenance: RunProvenance {
            input_hash,
            seed,
            created_at: chrono::Utc::now().to_rfc3339(),
            tool_versions: tool_versions(),
        },
        invalidated_ballots,
        outcome_hash,
        result,
    })
}
