use serde::{Deserialize, Serialize};
use tally_core::{Candidate, ElectionRecord};

/// Seat allocation of one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyAllocation {
    /// Party name.
    pub name: String,
    /// Votes cast for the party.
    pub votes: u64,
    /// Seats won in the quota phase.
    pub first_allocation: usize,
    /// Votes left after the quota phase.
    pub remaining_votes: u64,
    /// Seats won in the remainder phase.
    pub second_allocation: usize,
    /// Seats won overall.
    pub total_seats: usize,
    /// The party list with final vote counts, in input order.
    pub candidates: Vec<Candidate>,
    /// Candidates seated, in award order.
    pub winners: Vec<Candidate>,
}

/// Result of an open-party-list allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OplOutcome {
    /// Ballots cast.
    pub total_ballots: u64,
    /// Seats up for election.
    pub seats_available: usize,
    /// Votes needed for one quota seat.
    pub quota: u64,
    /// Seats nobody could take because every list was exhausted.
    pub unfilled_seats: usize,
    /// Per-party rows in input order.
    pub parties: Vec<PartyAllocation>,
    /// All seated candidates, party by party.
    pub winners: Vec<Candidate>,
    /// Ties and notes.
    pub record: ElectionRecord,
}

impl OplOutcome {
    /// Whether every seat went to a candidate.
    pub fn all_seats_filled(&self) -> bool {
        self.unfilled_seats == 0
    }

    /// Seats won by the named party.
    pub fn seats_for(&self, party: &str) -> Option<usize> {
        self.parties
            .iter()
            .find(|row| row.name == party)
            .map(|row| row.total_seats)
    }
}
