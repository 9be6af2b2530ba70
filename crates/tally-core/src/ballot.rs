//! Compressed ranked-ballot representation.
//!
//! Ranked ballots are not stored one by one. Each distinct preference order is
//! reduced to a [`BallotSignature`] (the party tokens in ranked order, written
//! `(D)(I)(R)`) and the [`BallotMultiset`] keeps how many ballots share it.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::errors::{ErrorInfo, TallyError};

/// Ordered party tokens of a ranked ballot, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BallotSignature {
    tokens: Vec<String>,
}

impl BallotSignature {
    /// Builds a signature from tokens. Tokens must be non-empty and free of parentheses.
    pub fn new<I, S>(tokens: I) -> Result<Self, TallyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        for token in &tokens {
            if token.is_empty() || token.contains('(') || token.contains(')') {
                return Err(TallyError::InvalidArgument(
                    ErrorInfo::new(
                        "ballot-bad-token",
                        "ballot token is empty or contains parentheses",
                    )
                    .with_context("token", token),
                ));
            }
        }
        Ok(Self { tokens })
    }

    /// Tokens in ranked order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// First-choice token, `None` for an exhausted ballot.
    pub fn first(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Whether the ballot still ranks `token`.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Signature with every occurrence of `token` removed.
    pub fn without(&self, token: &str) -> BallotSignature {
        Self {
            tokens: self
                .tokens
                .iter()
                .filter(|t| t.as_str() != token)
                .cloned()
                .collect(),
        }
    }

    /// Whether no preference is left.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for BallotSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "({token})")?;
        }
        Ok(())
    }
}

impl FromStr for BallotSignature {
    type Err = TallyError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || {
            TallyError::InvalidArgument(
                ErrorInfo::new("ballot-bad-signature", "signature must look like (A)(B)(C)")
                    .with_context("signature", text),
            )
        };
        let mut tokens = Vec::new();
        let mut rest = text.trim();
        while !rest.is_empty() {
            let inner = rest.strip_prefix('(').ok_or_else(malformed)?;
            let close = inner.find(')').ok_or_else(malformed)?;
            tokens.push(inner[..close].to_string());
            rest = &inner[close + 1..];
        }
        Self::new(tokens).map_err(|_| malformed())
    }
}

impl TryFrom<String> for BallotSignature {
    type Error = TallyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BallotSignature> for String {
    fn from(signature: BallotSignature) -> Self {
        signature.to_string()
    }
}

/// Signature → ballot count, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BallotMultiset {
    counts: IndexMap<BallotSignature, u64>,
}

impl BallotMultiset {
    /// Creates an empty multiset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` ballots under `signature`, merging with an existing entry.
    /// Zero counts are ignored so every stored count stays positive.
    pub fn add(&mut self, signature: BallotSignature, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(signature).or_insert(0) += count;
    }

    /// Removes a signature, returning its count. Remaining entries keep their order.
    pub fn remove(&mut self, signature: &BallotSignature) -> Option<u64> {
        self.counts.shift_remove(signature)
    }

    /// Count stored under `signature`.
    pub fn get(&self, signature: &BallotSignature) -> Option<u64> {
        self.counts.get(signature).copied()
    }

    /// Number of distinct signatures.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no signature is stored.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&BallotSignature, u64)> + '_ {
        self.counts.iter().map(|(sig, count)| (sig, *count))
    }

    /// Signatures that still rank `token`, in insertion order.
    pub fn signatures_containing(&self, token: &str) -> Vec<BallotSignature> {
        self.counts
            .keys()
            .filter(|sig| sig.contains(token))
            .cloned()
            .collect()
    }
}

impl FromIterator<(BallotSignature, u64)> for BallotMultiset {
    fn from_iter<T: IntoIterator<Item = (BallotSignature, u64)>>(iter: T) -> Self {
        let mut multiset = BallotMultiset::new();
        for (signature, count) in iter {
            multiset.add(signature, count);
        }
        multiset
    }
}

/// Result of folding ranked ballots into a multiset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotTally {
    /// Valid ballots keyed by signature.
    pub multiset: BallotMultiset,
    /// Number of ballots that made it into the multiset.
    pub valid_ballots: u64,
    /// Ballots rejected for ranking too few candidates, as submitted.
    pub invalidated: Vec<Vec<Option<u32>>>,
}

/// Folds per-candidate rank vectors into a [`BallotMultiset`].
///
/// A rank vector has one slot per candidate in registry order; `Some(1)` marks
/// the first choice. With [`RankedBallotBuilder::require_half_ranked`] a ballot
/// must rank at least half of the candidates (rounded up) or it is set aside.
#[derive(Debug, Clone)]
pub struct RankedBallotBuilder {
    tokens: Vec<String>,
    require_half: bool,
    tally: BallotTally,
}

impl RankedBallotBuilder {
    /// Creates a builder for the given candidate registry.
    pub fn new(candidates: &[Candidate]) -> Self {
        Self {
            tokens: candidates.iter().map(|c| c.party().to_string()).collect(),
            require_half: false,
            tally: BallotTally::default(),
        }
    }

    /// Enables invalidation of ballots that rank fewer than half of the candidates.
    pub fn require_half_ranked(mut self, enabled: bool) -> Self {
        self.require_half = enabled;
        self
    }

    /// Adds one ballot. Returns `Ok(false)` when the ballot was invalidated.
    pub fn push(&mut self, ranks: &[Option<u32>]) -> Result<bool, TallyError> {
        let n = self.tokens.len();
        if ranks.len() != n {
            return Err(TallyError::Input(
                ErrorInfo::new("ballot-width", "ballot must carry one slot per candidate")
                    .with_context("expected", n)
                    .with_context("found", ranks.len()),
            ));
        }
        let mut ranked: Vec<(u32, &str)> = Vec::new();
        for (slot, rank) in ranks.iter().enumerate() {
            if let Some(rank) = rank {
                if *rank == 0 || *rank as usize > n {
                    return Err(TallyError::Input(
                        ErrorInfo::new("ballot-rank-range", "rank must lie in 1..=candidates")
                            .with_context("rank", rank)
                            .with_context("candidates", n),
                    ));
                }
                if ranked.iter().any(|(seen, _)| seen == rank) {
                    return Err(TallyError::Input(
                        ErrorInfo::new("ballot-rank-duplicate", "rank used twice on one ballot")
                            .with_context("rank", rank),
                    ));
                }
                ranked.push((*rank, self.tokens[slot].as_str()));
            }
        }

        if ranked.is_empty() || (self.require_half && ranked.len() < (n + 1) / 2) {
            self.tally.invalidated.push(ranks.to_vec());
            return Ok(false);
        }

        ranked.sort_by_key(|(rank, _)| *rank);
        let signature = BallotSignature::new(ranked.into_iter().map(|(_, token)| token))?;
        self.tally.multiset.add(signature, 1);
        self.tally.valid_ballots += 1;
        Ok(true)
    }

    /// Consumes the builder.
    pub fn finish(self) -> BallotTally {
        self.tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::registry_from_entries;

    fn sig(text: &str) -> BallotSignature {
        text.parse().unwrap()
    }

    #[test]
    fn signature_parses_and_renders() {
        let signature = sig("(D)(I)(R)");
        assert_eq!(signature.tokens(), &["D", "I", "R"]);
        assert_eq!(signature.first(), Some("D"));
        assert_eq!(signature.to_string(), "(D)(I)(R)");
        assert_eq!(signature.without("I").to_string(), "(D)(R)");
        assert!(sig("").is_empty());
    }

    #[test]
    fn malformed_signature_is_rejected() {
        for bad in ["D", "(D", "(D)R", "()", "(D)(R"] {
            assert!(bad.parse::<BallotSignature>().is_err(), "{bad}");
        }
    }

    #[test]
    fn multiset_merges_and_keeps_order() {
        let mut ballots = BallotMultiset::new();
        ballots.add(sig("(R)(D)"), 4);
        ballots.add(sig("(D)"), 3);
        ballots.add(sig("(R)(D)"), 1);
        ballots.add(sig("(I)"), 0);
        assert_eq!(ballots.len(), 2);
        assert_eq!(ballots.total(), 8);
        assert_eq!(ballots.get(&sig("(R)(D)")), Some(5));
        let order: Vec<String> = ballots.iter().map(|(s, _)| s.to_string()).collect();
        assert_eq!(order, vec!["(R)(D)", "(D)"]);
        assert_eq!(ballots.remove(&sig("(R)(D)")), Some(5));
        assert_eq!(ballots.signatures_containing("D"), vec![sig("(D)")]);
    }

    #[test]
    fn builder_orders_tokens_by_rank_and_invalidates_short_ballots() {
        let candidates = registry_from_entries([
            ("Rosen", "D"),
            ("Kleinberg", "R"),
            ("Chou", "I"),
            ("Royce", "L"),
        ])
        .unwrap();
        let mut builder = RankedBallotBuilder::new(&candidates).require_half_ranked(true);
        assert!(builder.push(&[Some(2), None, Some(1), None]).unwrap());
        assert!(builder.push(&[Some(2), None, Some(1), None]).unwrap());
        assert!(!builder.push(&[None, Some(1), None, None]).unwrap());
        assert!(!builder.push(&[None, None, None, Some(3)]).unwrap());
        let out_of_range = builder.push(&[Some(5), None, None, None]).unwrap_err();
        assert_eq!(out_of_range.info().code, "ballot-rank-range");
        let repeated = builder.push(&[Some(1), Some(1), None, None]).unwrap_err();
        assert_eq!(repeated.info().code, "ballot-rank-duplicate");
        let tally = builder.finish();
        assert_eq!(tally.valid_ballots, 2);
        assert_eq!(tally.multiset.get(&sig("(I)(D)")), Some(2));
        assert_eq!(
            tally.invalidated,
            vec![vec![None, Some(1), None, None], vec![None, None, None, Some(3)]]
        );
    }
}
