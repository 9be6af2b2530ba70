#![deny(missing_docs)]
#![doc = "Open-party-list (OPL) seat allocation: a quota phase, a cyclic largest-remainder phase capped by list length, and per-party winner selection."]

/// Quota and remainder phases of the seat allocation.
pub mod allocation;
/// Validated engine entry point.
pub mod engine;
/// Allocation results.
pub mod outcome;
/// Choosing which candidates fill a party's seats.
pub mod winners;

pub use engine::OpenPartyList;
pub use outcome::{OplOutcome, PartyAllocation};

/// Crate version recorded in run provenance.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
