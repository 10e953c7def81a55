use crate::event::{Address, Etch, SlateId};
use crate::Error;
use std::collections::HashMap;

/// Slate membership recovered from etch events. The registry only grows
/// during replay and a slate's candidate list is immutable once seen.
#[derive(Clone, Debug, Default)]
pub struct SlateRegistry {
    slates: HashMap<SlateId, Vec<Address>>,
}

impl SlateRegistry {
    /// Registers a slate. Re-etching an already known id is a no-op, but the
    /// candidate list must match exactly: slate ids are content-addressed,
    /// so a mismatch means corrupted or forged input.
    pub fn register(&mut self, etch: &Etch) -> Result<(), Error> {
        match self.slates.get(&etch.slate) {
            Some(existing) if *existing != etch.candidates => {
                Err(Error::SlateConflict { slate: etch.slate })
            }
            Some(_) => Ok(()),
            None => {
                self.slates.insert(etch.slate, etch.candidates.clone());
                Ok(())
            }
        }
    }

    pub fn resolve(&self, slate: &SlateId) -> Result<&[Address], Error> {
        self.get(slate).ok_or(Error::UnknownSlate { slate: *slate })
    }

    /// Infallible lookup for consumers working off a replayed state, where
    /// every referenced slate is known to be registered.
    pub fn get(&self, slate: &SlateId) -> Option<&[Address]> {
        self.slates.get(slate).map(Vec::as_slice)
    }
}
