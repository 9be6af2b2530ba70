use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tally_core::RandomTieBreaker;
use tracing::debug;

use crate::config::OutputConfig;
use crate::render;
use crate::summary::{ElectionResult, RunSummary};

pub mod batch;
pub mod run;
pub mod version;

pub(crate) fn write_json<P: AsRef<Path>, T: Serialize>(
    path: P,
    value: &T,
) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(value)?)?;
    debug!(path = %path.as_ref().display(), "wrote json");
    Ok(())
}

/// Seeded tie-breaker, or an entropy-seeded one whose seed is still reported.
pub(crate) fn tie_breaker(seed: Option<u64>) -> RandomTieBreaker {
    match seed {
        Some(seed) => RandomTieBreaker::from_seed(seed),
        None => RandomTieBreaker::from_entropy(),
    }
}

/// Writes `summary.json` and, when enabled, the text reports into `out`.
pub(crate) fn write_artefacts(
    out: &Path,
    summary: &RunSummary,
    output: &OutputConfig,
) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(out)?;
    write_json(out.join("summary.json"), summary)?;
    if !summary.invalidated_ballots.is_empty() {
        write_json(out.join("invalidated.json"), &summary.invalidated_ballots)?;
    }
    if output.text_report {
        let audit = match &summary.result {
            ElectionResult::InstantRunoff(outcome) => {
                render::ir_audit(outcome, output.ballot_listing)?
            }
            ElectionResult::OpenPartyList(outcome) => render::opl_audit(outcome)?,
        };
        fs::write(out.join("audit.txt"), audit)?;
        fs::write(out.join("media.txt"), render::media_report(summary)?)?;
    }
    Ok(())
}

/// One-line description of the result for the terminal.
pub(crate) fn headline(summary: &RunSummary) -> String {
    match &summary.result {
        ElectionResult::InstantRunoff(outcome) => format!(
            "winner: {} ({}) after {} rounds",
            outcome.winner.name, outcome.winner.party, outcome.rounds
        ),
        ElectionResult::OpenPartyList(outcome) => format!(
            "seated {} of {} (quota {})",
            outcome.winners.len(),
            outcome.seats_available,
            outcome.quota
        ),
    }
}
