use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TallyError};

/// Identifier for a candidate, unique within one election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(u32);

impl CandidateId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A candidate standing in an election together with its running vote total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    id: CandidateId,
    name: String,
    party: String,
    votes: u64,
}

impl Candidate {
    /// Creates a candidate with zero votes.
    ///
    /// Fails when either the name or the party tag is empty.
    pub fn new(
        name: impl Into<String>,
        party: impl Into<String>,
        id: CandidateId,
    ) -> Result<Self, TallyError> {
        let name = name.into();
        let party = party.into();
        if name.trim().is_empty() || party.trim().is_empty() {
            return Err(TallyError::InvalidArgument(
                ErrorInfo::new(
                    "candidate-empty-field",
                    "candidate name and party must be non-empty",
                )
                .with_context("id", id)
                .with_context("name", &name)
                .with_context("party", &party),
            ));
        }
        Ok(Self {
            id,
            name,
            party,
            votes: 0,
        })
    }

    /// Candidate identifier.
    pub fn id(&self) -> CandidateId {
        self.id
    }

    /// Candidate name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Party tag; in ranked ballots this is the token naming the candidate.
    pub fn party(&self) -> &str {
        &self.party
    }

    /// Current vote total.
    pub fn votes(&self) -> u64 {
        self.votes
    }

    /// Overwrites the current vote total.
    pub fn set_votes(&mut self, votes: u64) {
        self.votes = votes;
    }

    /// Adds `votes` to the current total.
    pub fn add_votes(&mut self, votes: u64) {
        self.votes += votes;
    }

    /// `name (party)` label used in reports and tie narration.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.party)
    }
}

/// Builds candidates from `(name, party)` pairs, assigning ids sequentially from 0.
pub fn registry_from_entries<I, N, P>(entries: I) -> Result<Vec<Candidate>, TallyError>
where
    I: IntoIterator<Item = (N, P)>,
    N: Into<String>,
    P: Into<String>,
{
    entries
        .into_iter()
        .enumerate()
        .map(|(idx, (name, party))| Candidate::new(name, party, CandidateId::from_raw(idx as u32)))
        .collect()
}
