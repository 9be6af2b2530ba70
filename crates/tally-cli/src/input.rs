//! Election definition files.
//!
//! A definition is a YAML or JSON document tagged with `kind`:
//!
//! ```yaml
//! kind: instant-runoff
//! candidates:
//!   - { name: Rosen, party: D }
//!   - { name: Kleinberg, party: R }
//! signatures: { "(D)(R)": 12, "(R)": 9 }
//! ranked:
//!   - [2, 1]
//! require_half_ranked: true
//! ```
//!
//! ```yaml
//! kind: open-party-list
//! seats: 3
//! candidates:
//!   - { name: Pike, party: D, votes: 3000 }
//! ```

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tally_core::errors::{ErrorInfo, TallyError};
use tally_core::serde::{from_json_slice, from_yaml_str};
use tally_core::{
    parties_from_candidates, registry_from_entries, BallotMultiset, Candidate, RankedBallotBuilder,
};
use tally_ir::InstantRunoff;
use tally_opl::OpenPartyList;

/// One candidate line of a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEntry {
    /// Candidate name.
    pub name: String,
    /// Party tag; the ballot token for IR elections.
    pub party: String,
    /// Votes received (OPL only).
    #[serde(default)]
    pub votes: u64,
}

/// Instant-runoff election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrDefinition {
    /// Candidates in registry order.
    pub candidates: Vec<CandidateEntry>,
    /// Pre-compressed ballots.
    #[serde(default)]
    pub signatures: BallotMultiset,
    /// Individual ballots as per-candidate ranks.
    #[serde(default)]
    pub ranked: Vec<Vec<Option<u32>>>,
    /// Invalidate ranked ballots that rank fewer than half the candidates.
    #[serde(default)]
    pub require_half_ranked: bool,
    /// Ballots cast; defaults to the number of valid ballots.
    #[serde(default)]
    pub total_ballots: Option<u64>,
}

/// Open-party-list election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OplDefinition {
    /// Seats up for election.
    pub seats: usize,
    /// Candidates with their votes; parties are formed in order of first appearance.
    pub candidates: Vec<CandidateEntry>,
    /// Ballots cast; defaults to the sum of candidate votes.
    #[serde(default)]
    pub total_ballots: Option<u64>,
}

/// A parsed election definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ElectionDefinition {
    /// Ranked ballots counted by instant runoff.
    InstantRunoff(IrDefinition),
    /// Party-list votes allocated by quota and largest remainder.
    OpenPartyList(OplDefinition),
}

/// A validated engine ready to run.
#[derive(Debug)]
pub enum PreparedElection {
    /// Instant-runoff count plus the ranked ballots that were set aside.
    InstantRunoff {
        /// Validated count.
        count: InstantRunoff,
        /// Ranked ballots rejected by the half-ranked rule.
        invalidated: Vec<Vec<Option<u32>>>,
    },
    /// Validated allocation.
    OpenPartyList(OpenPartyList),
}

fn registry(entries: &[CandidateEntry]) -> Result<Vec<Candidate>, TallyError> {
    let mut candidates = registry_from_entries(
        entries
            .iter()
            .map(|entry| (entry.name.clone(), entry.party.clone())),
    )?;
    for (candidate, entry) in candidates.iter_mut().zip(entries) {
        candidate.set_votes(entry.votes);
    }
    Ok(candidates)
}

fn mismatch(code: &str, message: &str) -> TallyError {
    TallyError::Input(ErrorInfo::new(code, message))
}

fn same_registry(left: &[CandidateEntry], right: &[CandidateEntry]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(a, b)| a.name == b.name && a.party == b.party)
}

fn merge_totals(left: Option<u64>, right: Option<u64>) -> Result<Option<u64>, TallyError> {
    match (left, right) {
        (Some(a), Some(b)) => a
            .checked_add(b)
            .map(Some)
            .ok_or_else(|| mismatch("definition-total-overflow", "ballot totals overflow")),
        (None, None) => Ok(None),
        _ => Err(mismatch(
            "definition-total-mismatch",
            "either every file or no file must give total_ballots",
        )),
    }
}

impl ElectionDefinition {
    /// Reads several definitions of one election and merges them in order.
    pub fn load_all(paths: &[PathBuf]) -> Result<Self, Box<dyn Error>> {
        let mut paths = paths.iter();
        let first = paths.next().ok_or("at least one election file is needed")?;
        let mut definition = Self::load(first)?;
        for path in paths {
            definition = definition.merge(Self::load(path)?)?;
        }
        Ok(definition)
    }

    /// Combines two ballot files of the same election.
    ///
    /// Both sides must list the same candidates in the same order. Instant-runoff
    /// ballots are pooled; open-party-list candidate votes are summed. Explicit
    /// ballot totals are summed too.
    pub fn merge(self, other: ElectionDefinition) -> Result<Self, TallyError> {
        match (self, other) {
            (
                ElectionDefinition::InstantRunoff(mut left),
                ElectionDefinition::InstantRunoff(right),
            ) => {
                if !same_registry(&left.candidates, &right.candidates) {
                    return Err(mismatch(
                        "definition-candidate-mismatch",
                        "merged files must list the same candidates",
                    ));
                }
                if left.require_half_ranked != right.require_half_ranked {
                    return Err(mismatch(
                        "definition-rule-mismatch",
                        "merged files disagree on require_half_ranked",
                    ));
                }
                left.total_ballots = merge_totals(left.total_ballots, right.total_ballots)?;
                for (signature, count) in right.signatures.iter() {
                    left.signatures.add(signature.clone(), count);
                }
                left.ranked.extend(right.ranked);
                Ok(ElectionDefinition::InstantRunoff(left))
            }
            (
                ElectionDefinition::OpenPartyList(mut left),
                ElectionDefinition::OpenPartyList(right),
            ) => {
                if !same_registry(&left.candidates, &right.candidates) {
                    return Err(mismatch(
                        "definition-candidate-mismatch",
                        "merged files must list the same candidates",
                    ));
                }
                if left.seats != right.seats {
                    return Err(TallyError::Input(
                        ErrorInfo::new(
                            "definition-seat-mismatch",
                            "merged files disagree on the number of seats",
                        )
                        .with_context("left", left.seats)
                        .with_context("right", right.seats),
                    ));
                }
                left.total_ballots = merge_totals(left.total_ballots, right.total_ballots)?;
                for (entry, extra) in left.candidates.iter_mut().zip(&right.candidates) {
                    entry.votes = entry.votes.checked_add(extra.votes).ok_or_else(|| {
                        mismatch("definition-vote-overflow", "candidate votes overflow")
                    })?;
                }
                Ok(ElectionDefinition::OpenPartyList(left))
            }
            (left, right) => Err(TallyError::Input(
                ErrorInfo::new(
                    "definition-kind-mismatch",
                    "merged files describe different elections",
                )
                .with_context("left", left.kind())
                .with_context("right", right.kind()),
            )),
        }
    }

    /// Reads a definition, choosing JSON for `.json` files and YAML otherwise.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let bytes = fs::read(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let definition: ElectionDefinition = if is_json {
            from_json_slice(&bytes)?
        } else {
            from_yaml_str(&String::from_utf8(bytes)?)?
        };
        Ok(definition)
    }

    /// Short name of the election kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ElectionDefinition::InstantRunoff(_) => "instant-runoff",
            ElectionDefinition::OpenPartyList(_) => "open-party-list",
        }
    }

    /// Builds the registry and ballots and validates them through the engine constructors.
    pub fn prepare(&self) -> Result<PreparedElection, TallyError> {
        match self {
            ElectionDefinition::InstantRunoff(def) => {
                let candidates = registry(&def.candidates)?;
                let mut ballots: BallotMultiset = def.signatures.clone();
                let mut invalidated = Vec::new();
                if !def.ranked.is_empty() {
                    let mut builder = RankedBallotBuilder::new(&candidates)
                        .require_half_ranked(def.require_half_ranked);
                    for (idx, ranks) in def.ranked.iter().enumerate() {
                        builder.push(ranks).map_err(|err| {
                            TallyError::Input(err.info().clone().with_context("ballot", idx))
                        })?;
                    }
                    let tally = builder.finish();
                    for (signature, count) in tally.multiset.iter() {
                        ballots.add(signature.clone(), count);
                    }
                    invalidated = tally.invalidated;
                }
                let total = def.total_ballots.unwrap_or_else(|| ballots.total());
                let count = InstantRunoff::new(ballots, candidates, total)?;
                Ok(PreparedElection::InstantRunoff { count, invalidated })
            }
            ElectionDefinition::OpenPartyList(def) => {
                if def.candidates.is_empty() {
                    return Err(TallyError::Input(ErrorInfo::new(
                        "definition-no-candidates",
                        "an open-party-list definition needs candidates",
                    )));
                }
                let mut parties = parties_from_candidates(registry(&def.candidates)?)?;
                for party in &mut parties {
                    party.tally_from_candidates();
                }
                let cast: u64 = parties.iter().map(|party| party.total_votes()).sum();
                let total = def.total_ballots.unwrap_or(cast);
                Ok(PreparedElection::OpenPartyList(OpenPartyList::new(
                    total, def.seats, parties,
                )?))
            }
        }
    }
}
