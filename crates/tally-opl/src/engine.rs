use std::collections::BTreeSet;

use tally_core::errors::{ErrorInfo, TallyError};
use tally_core::{ElectionRecord, Party, TieBreaker};
use tracing::{info, warn};

use crate::allocation::{quota_allocation, remainder_allocation};
use crate::outcome::{OplOutcome, PartyAllocation};
use crate::winners::select_winners;

/// Open-party-list allocation over validated party totals.
#[derive(Debug, Clone)]
pub struct OpenPartyList {
    parties: Vec<Party>,
    total_ballots: u64,
    seats: usize,
    quota: u64,
}

impl OpenPartyList {
    /// Validates the inputs and fixes the quota at `⌊total_ballots / seats⌋`.
    ///
    /// Party totals are taken as given; call [`Party::tally_from_candidates`]
    /// first when they should follow the candidates' votes.
    pub fn new(total_ballots: u64, seats: usize, parties: Vec<Party>) -> Result<Self, TallyError> {
        if total_ballots == 0 {
            return Err(TallyError::invalid(
                "opl-total-ballots",
                "total ballots must be positive",
            ));
        }
        if seats == 0 {
            return Err(TallyError::invalid(
                "opl-seats",
                "at least one seat must be available",
            ));
        }
        if parties.is_empty() {
            return Err(TallyError::invalid(
                "opl-no-parties",
                "an open-party-list allocation needs at least one party",
            ));
        }

        let mut names = BTreeSet::new();
        for party in &parties {
            if !names.insert(party.name()) {
                return Err(TallyError::InvalidArgument(
                    ErrorInfo::new("opl-duplicate-party", "party names must be unique")
                        .with_context("party", party.name()),
                ));
            }
            if party.num_candidates() == 0 {
                return Err(TallyError::InvalidArgument(
                    ErrorInfo::new("opl-empty-party", "every party needs at least one candidate")
                        .with_context("party", party.name()),
                ));
            }
        }

        let cast: u64 = parties.iter().map(Party::total_votes).sum();
        if cast > total_ballots {
            return Err(TallyError::InvalidArgument(
                ErrorInfo::new("opl-vote-overflow", "party votes exceed total ballots")
                    .with_context("cast", cast)
                    .with_context("total", total_ballots),
            ));
        }

        Ok(Self {
            parties,
            total_ballots,
            seats,
            quota: total_ballots / seats as u64,
        })
    }

    /// Votes needed for one quota seat.
    pub fn quota(&self) -> u64 {
        self.quota
    }

    /// Allocates every seat and picks the seated candidates.
    pub fn run(mut self, oracle: &mut dyn TieBreaker) -> Result<OplOutcome, TallyError> {
        let mut record = ElectionRecord::new();
        for party in &mut self.parties {
            party.set_seats_won(0)?;
        }

        let seats_left = quota_allocation(&mut self.parties, self.quota, self.seats, &mut record)?;
        let first: Vec<usize> = self.parties.iter().map(Party::seats_won).collect();
        let unfilled = remainder_allocation(&mut self.parties, seats_left, oracle, &mut record)?;

        if unfilled > 0 {
            record.note(format!(
                "Not all seats have been distributed: {unfilled} of {} seats left after every candidate was seated.",
                self.seats
            ));
            warn!(
                unfilled,
                seats = self.seats,
                "party lists exhausted before all seats were filled"
            );
        } else {
            record.note("All seats have been filled.");
        }

        let mut rows = Vec::with_capacity(self.parties.len());
        let mut winners = Vec::new();
        for (party, first_allocation) in self.parties.iter().zip(first) {
            let seated = select_winners(party, oracle, &mut record)?;
            winners.extend(seated.iter().cloned());
            rows.push(PartyAllocation {
                name: party.name().to_string(),
                votes: party.total_votes(),
                first_allocation,
                remaining_votes: party.remaining_votes(),
                second_allocation: party.seats_won() - first_allocation,
                total_seats: party.seats_won(),
                candidates: party.candidates().to_vec(),
                winners: seated,
            });
        }

        info!(
            quota = self.quota,
            seated = winners.len(),
            unfilled,
            "open-party-list allocation finished"
        );
        Ok(OplOutcome {
            total_ballots: self.total_ballots,
            seats_available: self.seats,
            quota: self.quota,
            unfilled_seats: unfilled,
            parties: rows,
            winners,
            record,
        })
    }
}
