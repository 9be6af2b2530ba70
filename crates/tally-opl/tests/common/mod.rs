#![allow(dead_code)]

use tally_core::{parties_from_candidates, registry_from_entries, Party};

/// Builds parties named `P0`, `P1`, ... with the given list sizes and totals.
pub fn parties(sizes: &[usize], votes: &[u64]) -> Vec<Party> {
    let entries = sizes.iter().enumerate().flat_map(|(p, &size)| {
        (0..size).map(move |c| (format!("P{p}-{c}"), format!("P{p}")))
    });
    let mut parties = parties_from_candidates(registry_from_entries(entries).unwrap()).unwrap();
    for (party, &total) in parties.iter_mut().zip(votes) {
        party.set_total_votes(total);
    }
    parties
}

/// Builds parties whose totals follow the candidates' votes.
pub fn parties_with_candidate_votes(votes: &[&[u64]]) -> Vec<Party> {
    let sizes: Vec<usize> = votes.iter().map(|list| list.len()).collect();
    let mut parties = parties(&sizes, &[]);
    for (party, list) in parties.iter_mut().zip(votes) {
        for (candidate, &count) in party.candidates_mut().iter_mut().zip(list.iter()) {
            candidate.set_votes(count);
        }
        party.tally_from_candidates();
    }
    parties
}
