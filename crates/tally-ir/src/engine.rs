//! Instant-runoff state machine.
//!
//! A run moves through `Counting → CheckMajority → (Eliminate → Redistribute →
//! CheckMajority)* → Done`. All "first occurrence" scans run over the live
//! candidate list in registry order, so the only nondeterminism is the
//! [`TieBreaker`] passed to [`InstantRunoff::run`].

use std::collections::BTreeSet;

use tally_core::errors::{ErrorInfo, TallyError};
use tally_core::{
    percentage, BallotMultiset, Candidate, CandidateTally, ElectionRecord, TieBreaker, TieContext,
    TieRecord,
};
use tracing::{debug, info};

use crate::outcome::IrOutcome;

/// Step the count is about to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrPhase {
    /// Credit first choices.
    Counting,
    /// Look for a majority or the two-candidate end.
    CheckMajority,
    /// Pick the candidate to drop.
    Eliminate,
    /// Move the eliminated candidate's ballots on; holds its index in the live list.
    Redistribute(usize),
    /// Count finished; holds the winner's index and whether a coin toss decided it.
    Done {
        /// Index of the winner in the live list.
        winner: usize,
        /// Whether the two-candidate coin toss picked the winner.
        by_toss: bool,
    },
}

/// Instant-runoff count over a ballot multiset.
#[derive(Debug, Clone)]
pub struct InstantRunoff {
    live: Vec<Candidate>,
    eliminated: Vec<CandidateTally>,
    ballots: BallotMultiset,
    total_ballots: u64,
    total_counts: u64,
    round: u32,
    record: ElectionRecord,
}

impl InstantRunoff {
    /// Validates the inputs and prepares a count.
    ///
    /// Every ballot token must name exactly one candidate through its party
    /// tag, and the ballots may not outnumber `total_ballots`.
    pub fn new(
        ballots: BallotMultiset,
        candidates: Vec<Candidate>,
        total_ballots: u64,
    ) -> Result<Self, TallyError> {
        if total_ballots == 0 {
            return Err(TallyError::invalid(
                "ir-total-ballots",
                "total ballots must be positive",
            ));
        }
        if candidates.is_empty() {
            return Err(TallyError::invalid(
                "ir-no-candidates",
                "an instant-runoff count needs at least one candidate",
            ));
        }
        if ballots.is_empty() {
            return Err(TallyError::invalid(
                "ir-no-ballots",
                "an instant-runoff count needs at least one ballot",
            ));
        }

        let mut tokens = BTreeSet::new();
        for candidate in &candidates {
            if !tokens.insert(candidate.party()) {
                return Err(TallyError::InvalidArgument(
                    ErrorInfo::new(
                        "ir-duplicate-token",
                        "each candidate needs a distinct party tag",
                    )
                    .with_context("party", candidate.party()),
                ));
            }
        }

        for (signature, _) in ballots.iter() {
            if signature.is_empty() {
                return Err(TallyError::invalid(
                    "ir-empty-ballot",
                    "ballots must rank at least one candidate",
                ));
            }
            let mut seen = BTreeSet::new();
            for token in signature.tokens() {
                if !tokens.contains(token.as_str()) {
                    return Err(TallyError::InvalidArgument(
                        ErrorInfo::new("ir-unknown-token", "ballot names an unknown candidate")
                            .with_context("signature", signature)
                            .with_context("token", token),
                    ));
                }
                if !seen.insert(token.as_str()) {
                    return Err(TallyError::InvalidArgument(
                        ErrorInfo::new("ir-repeated-token", "ballot ranks a candidate twice")
                            .with_context("signature", signature)
                            .with_context("token", token),
                    ));
                }
            }
        }

        let counted = ballots.total();
        if counted > total_ballots {
            return Err(TallyError::InvalidArgument(
                ErrorInfo::new("ir-ballot-overflow", "ballot counts exceed total ballots")
                    .with_context("counted", counted)
                    .with_context("total", total_ballots),
            ));
        }

        Ok(Self {
            live: candidates,
            eliminated: Vec::new(),
            ballots,
            total_ballots,
            total_counts: total_ballots,
            round: 1,
            record: ElectionRecord::new(),
        })
    }

    /// Runs the count to completion.
    pub fn run(mut self, oracle: &mut dyn TieBreaker) -> Result<IrOutcome, TallyError> {
        let mut phase = IrPhase::Counting;
        loop {
            debug!(round = self.round, ?phase, "ir step");
            phase = match phase {
                IrPhase::Counting => {
                    self.count_first_choices();
                    IrPhase::CheckMajority
                }
                IrPhase::CheckMajority => match self.check_majority(oracle)? {
                    Some((winner, by_toss)) => IrPhase::Done { winner, by_toss },
                    None => IrPhase::Eliminate,
                },
                IrPhase::Eliminate => IrPhase::Redistribute(self.eliminate(oracle)?),
                IrPhase::Redistribute(loser) => {
                    self.redistribute(loser);
                    IrPhase::CheckMajority
                }
                IrPhase::Done { winner, by_toss } => return Ok(self.finish(winner, by_toss)),
            };
        }
    }

    fn count_first_choices(&mut self) {
        for candidate in &mut self.live {
            candidate.set_votes(0);
        }
        for (signature, count) in self.ballots.iter() {
            if let Some(first) = signature.first() {
                if let Some(candidate) = self.live.iter_mut().find(|c| c.party() == first) {
                    candidate.add_votes(count);
                }
            }
        }
        self.snapshot(None);
    }

    fn check_majority(
        &mut self,
        oracle: &mut dyn TieBreaker,
    ) -> Result<Option<(usize, bool)>, TallyError> {
        if self.live.len() == 1 {
            self.record.note(format!(
                "{} is the only candidate left standing.",
                self.live[0].label()
            ));
            return Ok(Some((0, false)));
        }

        let mut leader = 0;
        for (idx, candidate) in self.live.iter().enumerate() {
            if candidate.votes() > self.live[leader].votes() {
                leader = idx;
            }
        }
        let votes = self.live[leader].votes();
        if self.total_counts > 0 && votes as f64 / self.total_counts as f64 > 0.5 {
            self.record.note(format!(
                "{} won with {} of {} remaining ballots ({:.2}%), a majority.",
                self.live[leader].label(),
                votes,
                self.total_counts,
                percentage(votes, self.total_counts)
            ));
            info!(
                winner = %self.live[leader].label(),
                votes,
                round = self.round,
                "majority reached"
            );
            return Ok(Some((leader, false)));
        }

        if self.live.len() == 2 {
            let pick = oracle.choose_one(2)?;
            self.record.push_tie(TieRecord {
                context: TieContext::IrFinalTwo { round: self.round },
                tied: self.live.iter().map(Candidate::label).collect(),
                chosen: self.live[pick].label(),
            });
            self.record.note(format!(
                "No majority with two candidates left; {} won the coin toss.",
                self.live[pick].label()
            ));
            info!(winner = %self.live[pick].label(), round = self.round, "two-candidate coin toss");
            return Ok(Some((pick, true)));
        }

        Ok(None)
    }

    fn eliminate(&mut self, oracle: &mut dyn TieBreaker) -> Result<usize, TallyError> {
        let mut lowest = 0;
        for (idx, candidate) in self.live.iter().enumerate() {
            if candidate.votes() < self.live[lowest].votes() {
                lowest = idx;
            }
        }
        let floor = self.live[lowest].votes();
        let losing: Vec<usize> = self
            .live
            .iter()
            .enumerate()
            .filter(|(_, candidate)| candidate.votes() == floor)
            .map(|(idx, _)| idx)
            .collect();

        let loser = if losing.len() == 1 {
            losing[0]
        } else {
            let loser = losing[oracle.choose_one(losing.len())?];
            self.record.push_tie(TieRecord {
                context: TieContext::IrElimination { round: self.round },
                tied: losing.iter().map(|&idx| self.live[idx].label()).collect(),
                chosen: self.live[loser].label(),
            });
            loser
        };
        debug!(
            round = self.round,
            candidate = %self.live[loser].label(),
            votes = floor,
            tied = losing.len(),
            "eliminating"
        );
        Ok(loser)
    }

    fn redistribute(&mut self, loser: usize) {
        let loser = self.live.remove(loser);
        let token = loser.party();
        for signature in self.ballots.signatures_containing(token) {
            let Some(count) = self.ballots.remove(&signature) else {
                continue;
            };
            let replacement = signature.without(token);
            if replacement.is_empty() {
                self.total_counts -= count;
                continue;
            }
            if replacement.first() != signature.first() {
                if let Some(next) = replacement.first() {
                    if let Some(candidate) = self.live.iter_mut().find(|c| c.party() == next) {
                        candidate.add_votes(count);
                    }
                }
            }
            self.ballots.add(replacement, count);
        }

        let eliminated = CandidateTally::capture(&loser);
        self.eliminated.push(eliminated.clone());
        self.round += 1;
        self.snapshot(Some(eliminated));
        debug!(
            round = self.round,
            remaining = self.total_counts,
            "redistributed ballots"
        );
    }

    fn snapshot(&mut self, eliminated: Option<CandidateTally>) {
        let tallies = self.live.iter().map(CandidateTally::capture).collect();
        self.record.push_round(
            self.round,
            eliminated,
            tallies,
            &self.ballots,
            self.total_counts,
        );
    }

    fn finish(self, winner: usize, by_toss: bool) -> IrOutcome {
        let champion = &self.live[winner];
        IrOutcome {
            winner: CandidateTally::capture(champion),
            resolved_by_coin_toss: by_toss,
            winning_share: percentage(champion.votes(), self.total_counts),
            share_of_total: percentage(champion.votes(), self.total_ballots),
            rounds: self.round,
            total_ballots: self.total_ballots,
            remaining_ballots: self.total_counts,
            remaining: self.live.iter().map(CandidateTally::capture).collect(),
            eliminated: self.eliminated,
            final_ballots: self.ballots,
            record: self.record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{registry_from_entries, BallotSignature, ScriptedTieBreaker};

    fn ballots(entries: &[(&str, u64)]) -> BallotMultiset {
        entries
            .iter()
            .map(|(sig, count)| (sig.parse::<BallotSignature>().unwrap(), *count))
            .collect()
    }

    #[test]
    fn first_choices_are_credited() {
        let candidates = registry_from_entries([("A", "p0"), ("B", "p1")]).unwrap();
        let mut count =
            InstantRunoff::new(ballots(&[("(p0)(p1)", 3), ("(p1)", 2), ("(p0)", 1)]), candidates, 6)
                .unwrap();
        count.count_first_choices();
        let votes: Vec<u64> = count.live.iter().map(Candidate::votes).collect();
        assert_eq!(votes, vec![4, 2]);
        assert_eq!(count.record.rounds().len(), 1);
    }

    #[test]
    fn lowest_tie_goes_to_oracle_in_registry_order() {
        let candidates =
            registry_from_entries([("A", "p0"), ("B", "p1"), ("C", "p2")]).unwrap();
        let mut count =
            InstantRunoff::new(ballots(&[("(p0)", 5), ("(p1)", 2), ("(p2)", 2)]), candidates, 9)
                .unwrap();
        count.count_first_choices();
        let mut oracle = ScriptedTieBreaker::new([1]);
        let loser = count.eliminate(&mut oracle).unwrap();
        assert_eq!(loser, 2);
        assert_eq!(oracle.requests(), &[2]);
        assert_eq!(count.record.ties()[0].tied, vec!["B (p1)", "C (p2)"]);
    }
}
