use crate::event::{Address, SlateId, Vote, Weight};
use crate::registry::SlateRegistry;
use crate::Error;
use std::collections::HashMap;

/// A voter's live choice. Only the latest vote in replay order survives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoterState {
    pub slate: SlateId,
    pub weight: Weight,
}

/// Per-voter state built up during replay.
#[derive(Clone, Debug, Default)]
pub struct VoterLedger {
    voters: HashMap<Address, VoterState>,
}

impl VoterLedger {
    /// Overwrites the voter's state with the new choice. A vote always
    /// references a slate etched earlier in the stream; anything else means
    /// the input is inconsistent and the registry lookup fails the run.
    pub fn apply(&mut self, registry: &SlateRegistry, vote: &Vote) -> Result<(), Error> {
        registry.resolve(&vote.slate)?;
        self.voters.insert(
            vote.voter,
            VoterState {
                slate: vote.slate,
                weight: vote.weight,
            },
        );
        Ok(())
    }

    pub fn get(&self, voter: &Address) -> Option<&VoterState> {
        self.voters.get(voter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &VoterState)> {
        self.voters.iter()
    }
}
