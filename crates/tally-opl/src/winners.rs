use std::collections::BTreeMap;

use tally_core::errors::TallyError;
use tally_core::{Candidate, ElectionRecord, Party, TieBreaker, TieContext, TieRecord};
use tracing::debug;

/// Picks the candidates that fill `party`'s seats.
///
/// Candidates are grouped by vote count and seated from the highest group down.
/// A group larger than the seats still open for the party is settled by the
/// oracle one winner at a time. Winners come back in award order.
pub fn select_winners(
    party: &Party,
    oracle: &mut dyn TieBreaker,
    record: &mut ElectionRecord,
) -> Result<Vec<Candidate>, TallyError> {
    let mut open = party.seats_won();
    let mut winners = Vec::with_capacity(open);

    let mut grouped: BTreeMap<u64, Vec<&Candidate>> = BTreeMap::new();
    for candidate in party.candidates() {
        grouped.entry(candidate.votes()).or_default().push(candidate);
    }

    for (_, mut group) in grouped.into_iter().rev() {
        if open == 0 {
            break;
        }
        if group.len() <= open {
            open -= group.len();
            winners.extend(group.into_iter().cloned());
            continue;
        }
        while open > 0 {
            let pick = oracle.choose_one(group.len())?;
            let tied = group.iter().map(|c| c.name().to_string()).collect();
            let chosen = group.remove(pick);
            record.push_tie(TieRecord {
                context: TieContext::OplCandidate {
                    party: party.name().to_string(),
                },
                tied,
                chosen: chosen.name().to_string(),
            });
            debug!(party = party.name(), candidate = chosen.name(), "seat by coin toss");
            winners.push(chosen.clone());
            open -= 1;
        }
    }
    Ok(winners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{parties_from_candidates, registry_from_entries, ScriptedTieBreaker};

    fn party_with_votes(votes: &[u64], seats: usize) -> Party {
        let entries = (0..votes.len()).map(|idx| (format!("N{idx}"), "P"));
        let mut candidates = registry_from_entries(entries).unwrap();
        for (candidate, &count) in candidates.iter_mut().zip(votes) {
            candidate.set_votes(count);
        }
        let mut party = parties_from_candidates(candidates).unwrap().remove(0);
        party.tally_from_candidates();
        party.set_seats_won(seats).unwrap();
        party
    }

    #[test]
    fn highest_counts_win_without_oracle() {
        let party = party_with_votes(&[10, 40, 30, 20], 2);
        let mut oracle = ScriptedTieBreaker::default();
        let mut record = ElectionRecord::new();
        let winners = select_winners(&party, &mut oracle, &mut record).unwrap();
        let names: Vec<&str> = winners.iter().map(Candidate::name).collect();
        assert_eq!(names, vec!["N1", "N2"]);
        assert!(oracle.requests().is_empty());
    }

    #[test]
    fn tied_group_is_drawn_one_seat_at_a_time() {
        let party = party_with_votes(&[50, 90, 50, 50], 3);
        let mut oracle = ScriptedTieBreaker::new([2, 0]);
        let mut record = ElectionRecord::new();
        let winners = select_winners(&party, &mut oracle, &mut record).unwrap();
        let names: Vec<&str> = winners.iter().map(Candidate::name).collect();
        assert_eq!(names, vec!["N1", "N3", "N0"]);
        assert_eq!(oracle.requests(), &[3, 2]);
        assert_eq!(record.ties()[0].tied, vec!["N0", "N2", "N3"]);
        assert_eq!(record.ties()[1].tied, vec!["N0", "N2"]);
    }
}
