//! Structured audit record shared by the IR and OPL engines.
//!
//! The engines never format report text. They push round snapshots, tie
//! records and free-form notes into an [`ElectionRecord`]; renderers turn the
//! record into audit or media output afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ballot::BallotMultiset;
use crate::candidate::{Candidate, CandidateId};

/// Vote count of one candidate at the end of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTally {
    /// Candidate identifier.
    pub id: CandidateId,
    /// Candidate name.
    pub name: String,
    /// Party tag.
    pub party: String,
    /// Votes held at the end of the round.
    pub votes: u64,
    /// Change against the previous snapshot; zero for the first one.
    pub delta: i64,
}

impl CandidateTally {
    /// Captures the candidate's current count with a zero delta.
    pub fn capture(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id(),
            name: candidate.name().to_string(),
            party: candidate.party().to_string(),
            votes: candidate.votes(),
            delta: 0,
        }
    }
}

/// One ballot signature and its count, as listed in an audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotEntry {
    /// Signature text such as `(D)(R)`.
    pub signature: String,
    /// Ballots carrying the signature.
    pub count: u64,
}

/// State of an IR count after one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    /// Round number, starting at 1 for the initial count.
    pub round: u32,
    /// Candidate eliminated in this round, if any.
    pub eliminated: Option<CandidateTally>,
    /// Live candidates after the round, in registry order.
    pub tallies: Vec<CandidateTally>,
    /// Ballots still counting towards a candidate.
    pub remaining_ballots: u64,
    /// Ballot distribution after the round, in multiset order.
    pub ballots: Vec<BallotEntry>,
}

/// Where a tie occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TieContext {
    /// Several candidates shared the lowest count.
    IrElimination {
        /// Round in which the elimination happened.
        round: u32,
    },
    /// Two candidates remained and neither held a majority.
    IrFinalTwo {
        /// Round in which the count ended.
        round: u32,
    },
    /// Parties shared a remainder while fewer seats were left than parties.
    OplRemainder,
    /// Candidates of one party shared a vote count competing for its seats.
    OplCandidate {
        /// Party whose seats were being filled.
        party: String,
    },
}

/// A tie settled by the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieRecord {
    /// Tie location.
    pub context: TieContext,
    /// Tied entries in scan order.
    pub tied: Vec<String>,
    /// Entry picked by the oracle.
    pub chosen: String,
}

impl TieRecord {
    /// One-sentence narration used by the text reports.
    pub fn narrative(&self) -> String {
        let tied = self.tied.join(", ");
        match &self.context {
            TieContext::IrElimination { round } => format!(
                "{tied} tied for fewest votes in round {round}. {} was eliminated in a fair coin toss.",
                self.chosen
            ),
            TieContext::IrFinalTwo { round } => format!(
                "{tied} remained without a majority after round {round}. {} won in a fair coin toss.",
                self.chosen
            ),
            TieContext::OplRemainder => format!(
                "{tied} tied when assigning remaining seats. {} won in a fair coin toss.",
                self.chosen
            ),
            TieContext::OplCandidate { party } => format!(
                "{tied} tied in popularity when assigning seats for {party}. {} won in a fair coin toss.",
                self.chosen
            ),
        }
    }
}

/// Append-only log of rounds, ties and notes for one election.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionRecord {
    rounds: Vec<RoundSnapshot>,
    ties: Vec<TieRecord>,
    notes: Vec<String>,
}

impl ElectionRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a round, filling in each tally's delta from the previous round.
    pub fn push_round(
        &mut self,
        round: u32,
        eliminated: Option<CandidateTally>,
        mut tallies: Vec<CandidateTally>,
        ballots: &BallotMultiset,
        remaining_ballots: u64,
    ) {
        if let Some(previous) = self.rounds.last() {
            let before: BTreeMap<CandidateId, u64> = previous
                .tallies
                .iter()
                .map(|tally| (tally.id, tally.votes))
                .collect();
            for tally in &mut tallies {
                let prior = before.get(&tally.id).copied().unwrap_or(0);
                tally.delta = tally.votes as i64 - prior as i64;
            }
        }
        let ballots = ballots
            .iter()
            .map(|(signature, count)| BallotEntry {
                signature: signature.to_string(),
                count,
            })
            .collect();
        self.rounds.push(RoundSnapshot {
            round,
            eliminated,
            tallies,
            remaining_ballots,
            ballots,
        });
    }

    /// Appends a tie record.
    pub fn push_tie(&mut self, tie: TieRecord) {
        self.ties.push(tie);
    }

    /// Appends a free-form note.
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Rounds in the order they were recorded.
    pub fn rounds(&self) -> &[RoundSnapshot] {
        &self.rounds
    }

    /// Ties in the order they were settled.
    pub fn ties(&self) -> &[TieRecord] {
        &self.ties
    }

    /// Notes in the order they were recorded.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Whether any tie was settled by the oracle.
    pub fn has_ties(&self) -> bool {
        !self.ties.is_empty()
    }
}
