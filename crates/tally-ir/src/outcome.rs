use serde::{Deserialize, Serialize};
use tally_core::{BallotMultiset, CandidateTally, ElectionRecord};

/// Result of an instant-runoff count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrOutcome {
    /// Winning candidate with its final vote count.
    pub winner: CandidateTally,
    /// Whether the winner was picked by the two-candidate coin toss.
    pub resolved_by_coin_toss: bool,
    /// Winner's votes as a percentage of the ballots still counting.
    pub winning_share: f64,
    /// Winner's votes as a percentage of all ballots cast.
    pub share_of_total: f64,
    /// Number of rounds counted, the initial count being round 1.
    pub rounds: u32,
    /// Ballots cast.
    pub total_ballots: u64,
    /// Ballots still counting after exhausted ones were dropped.
    pub remaining_ballots: u64,
    /// Ballot distribution when the count ended.
    pub final_ballots: BallotMultiset,
    /// Candidates still standing at the end, in registry order.
    pub remaining: Vec<CandidateTally>,
    /// Eliminated candidates in elimination order, with their votes when eliminated.
    pub eliminated: Vec<CandidateTally>,
    /// Round snapshots, ties and notes.
    pub record: ElectionRecord,
}

impl IrOutcome {
    /// Ballots dropped because every preference on them was eliminated.
    pub fn exhausted_ballots(&self) -> u64 {
        self.total_ballots - self.remaining_ballots
    }
}
