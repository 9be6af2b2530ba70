use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::errors::{ErrorInfo, TallyError};

/// A party list: its candidates in input order plus allocation counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    name: String,
    candidates: Vec<Candidate>,
    total_votes: u64,
    remaining_votes: u64,
    seats_won: usize,
}

impl Party {
    /// Creates an empty party. Fails when the name is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, TallyError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TallyError::invalid(
                "party-empty-name",
                "party name must be non-empty",
            ));
        }
        Ok(Self {
            name,
            candidates: Vec::new(),
            total_votes: 0,
            remaining_votes: 0,
            seats_won: 0,
        })
    }

    /// Party name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a candidate to the list.
    pub fn add_candidate(&mut self, candidate: Candidate) {
        self.candidates.push(candidate);
    }

    /// Candidates in input order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Mutable access to the candidates (vote fields only are expected to change).
    pub fn candidates_mut(&mut self) -> &mut [Candidate] {
        &mut self.candidates
    }

    /// Number of candidates, which caps the seats this party can win.
    pub fn num_candidates(&self) -> usize {
        self.candidates.len()
    }

    /// Total votes cast for the party.
    pub fn total_votes(&self) -> u64 {
        self.total_votes
    }

    /// Sets the total votes cast for the party.
    pub fn set_total_votes(&mut self, votes: u64) {
        self.total_votes = votes;
    }

    /// Sets the party total to the sum of its candidates' votes.
    pub fn tally_from_candidates(&mut self) {
        self.total_votes = self.candidates.iter().map(Candidate::votes).sum();
    }

    /// Votes left over after the quota phase.
    pub fn remaining_votes(&self) -> u64 {
        self.remaining_votes
    }

    /// Sets the votes left over after the quota phase.
    pub fn set_remaining_votes(&mut self, votes: u64) {
        self.remaining_votes = votes;
    }

    /// Seats won so far.
    pub fn seats_won(&self) -> usize {
        self.seats_won
    }

    /// Sets the seat count, rejecting values above the candidate count.
    pub fn set_seats_won(&mut self, seats: usize) -> Result<(), TallyError> {
        if seats > self.candidates.len() {
            return Err(TallyError::InvalidArgument(
                ErrorInfo::new("party-over-capacity", "party cannot win more seats than candidates")
                    .with_context("party", &self.name)
                    .with_context("seats", seats)
                    .with_context("candidates", self.candidates.len()),
            ));
        }
        self.seats_won = seats;
        Ok(())
    }

    /// Whether the party already holds one seat per candidate.
    pub fn at_capacity(&self) -> bool {
        self.seats_won >= self.candidates.len()
    }

    /// Awards one more seat unless the party is at capacity. Returns whether it did.
    pub fn try_award_seat(&mut self) -> bool {
        if self.at_capacity() {
            return false;
        }
        self.seats_won += 1;
        true
    }
}

/// Groups candidates into parties by party tag, in order of first appearance.
pub fn parties_from_candidates(
    candidates: impl IntoIterator<Item = Candidate>,
) -> Result<Vec<Party>, TallyError> {
    let mut parties: Vec<Party> = Vec::new();
    for candidate in candidates {
        match parties.iter_mut().find(|party| party.name() == candidate.party()) {
            Some(party) => party.add_candidate(candidate),
            None => {
                let mut party = Party::new(candidate.party())?;
                party.add_candidate(candidate);
                parties.push(party);
            }
        }
    }
    Ok(parties)
}
