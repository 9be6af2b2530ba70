#![deny(missing_docs)]
#![doc = "Election data model shared by the tally engines: candidates, parties, ranked-ballot multisets, the tie-break oracle and the audit record."]

pub mod ballot;
/// Candidates and their identifiers.
pub mod candidate;
pub mod errors;
/// Stable content hashes.
pub mod hash;
/// Party lists and seat counters.
pub mod party;
pub mod provenance;
pub mod record;
pub mod rng;
/// Canonical JSON and YAML helpers.
pub mod serde;
pub mod tiebreak;

pub use ballot::{BallotMultiset, BallotSignature, BallotTally, RankedBallotBuilder};
pub use candidate::{registry_from_entries, Candidate, CandidateId};
pub use errors::{ErrorInfo, TallyError};
pub use hash::stable_hash_string;
pub use party::{parties_from_candidates, Party};
pub use provenance::{RunProvenance, SchemaVersion};
pub use record::{
    BallotEntry, CandidateTally, ElectionRecord, RoundSnapshot, TieContext, TieRecord,
};
pub use rng::{derive_substream_seed, RngHandle};
pub use tiebreak::{RandomTieBreaker, ScriptedTieBreaker, TieBreaker};

/// Share of `part` in `whole` as a percentage; zero when `whole` is zero.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Crate version recorded in run provenance.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
