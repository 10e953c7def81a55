//! Replay-and-tally engine for a chief governance contract.
//!
//! The chief's whole state is a function of its historical event log: etch
//! events introduce slates (immutable candidate lists) and vote events move
//! voter weight between slates. Folding the ordered log once through
//! [`replay`] reproduces the live voter ledger and the elected candidate
//! (the hat) without touching chain state; [`tallies`] then derives the
//! per-candidate breakdown from the final state.

pub mod event;
pub mod ledger;
pub mod registry;
pub mod replay;
pub mod tally;

pub use event::{normalize, Address, Etch, Event, LogOrder, RawEvent, SlateId, Vote, Weight};
pub use ledger::{VoterLedger, VoterState};
pub use registry::SlateRegistry;
pub use replay::{replay, ReplayState};
pub use tally::{tallies, CandidateTally};

use thiserror::Error;

/// Structural defects detected while consuming the event stream. Any of
/// these aborts the run before output is produced; replay has no rollback
/// and a stream that trips one of them cannot be tallied safely.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed event at input index {index}: {reason}")]
    MalformedEvent { index: usize, reason: String },
    #[error("slate {slate} re-etched with different candidates")]
    SlateConflict { slate: SlateId },
    #[error("reference to unknown slate {slate}")]
    UnknownSlate { slate: SlateId },
}
