#![deny(missing_docs)]
#![doc = "Instant-runoff (IR) tabulation: first-choice counting, majority checks, lowest-candidate elimination and ballot redistribution until a winner emerges."]

pub mod engine;
/// Count results.
pub mod outcome;

pub use engine::{InstantRunoff, IrPhase};
pub use outcome::IrOutcome;

/// Crate version recorded in run provenance.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
