#![allow(dead_code)]

use tally_core::{registry_from_entries, BallotMultiset, BallotSignature, Candidate};

pub fn ballots(entries: &[(&str, u64)]) -> BallotMultiset {
    entries
        .iter()
        .map(|(sig, count)| (sig.parse::<BallotSignature>().unwrap(), *count))
        .collect()
}

pub fn parties(tokens: &[&str]) -> Vec<Candidate> {
    registry_from_entries(tokens.iter().map(|token| (format!("Cand-{token}"), token.to_string())))
        .unwrap()
}
