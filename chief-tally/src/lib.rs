//! Tooling around the [`chief_replay`] engine: best-effort spell decoding,
//! file-backed boundary sources and the text/JSON report renderers used by
//! the `chief-tally` binary.

pub mod report;
pub mod source;
pub mod spell;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Replay(#[from] chief_replay::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
