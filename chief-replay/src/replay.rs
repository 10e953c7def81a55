use crate::event::{Address, Event, Vote, Weight};
use crate::ledger::VoterLedger;
use crate::registry::SlateRegistry;
use crate::Error;

/// Everything the fold accumulates. Owned by the caller; independent tally
/// runs share no state.
#[derive(Clone, Debug, Default)]
pub struct ReplayState {
    pub registry: SlateRegistry,
    pub ledger: VoterLedger,
    pub hat: Option<Address>,
}

/// Folds an ordered event stream into the final governance state. The input
/// must come from [`normalize`](crate::event::normalize): the hat rule is
/// order sensitive and replaying out of order corrupts the result.
pub fn replay(events: &[Event]) -> Result<ReplayState, Error> {
    let mut state = ReplayState::default();
    for event in events {
        state.apply(event)?;
    }
    Ok(state)
}

impl ReplayState {
    pub fn apply(&mut self, event: &Event) -> Result<(), Error> {
        match event {
            Event::Etch(etch) => self.registry.register(etch),
            Event::Vote(vote) => {
                self.ledger.apply(&self.registry, vote)?;
                self.lift_hat(vote)
            }
        }
    }

    /// Current aggregate support for a candidate: the weight of every voter
    /// whose live slate contains it.
    pub fn candidate_weight(&self, candidate: &Address) -> Weight {
        self.ledger
            .iter()
            .filter(|(_, state)| {
                self.registry
                    .get(&state.slate)
                    .map_or(false, |slate| slate.contains(candidate))
            })
            .map(|(_, state)| state.weight)
            .sum()
    }

    // The on-chain election only moves the hat when a vote lifts some slate
    // above the incumbent. Weights are recomputed here, mid-replay; a final
    // global argmax does not reproduce the chain's behavior because events
    // that merely drain the incumbent's support never depose it.
    fn lift_hat(&mut self, vote: &Vote) -> Result<(), Error> {
        let slate = self.registry.resolve(&vote.slate)?.to_vec();

        let mut best: Option<(Address, Weight)> = None;
        for candidate in slate {
            let weight = self.candidate_weight(&candidate);
            // strict comparison keeps the earliest listed candidate on ties
            if best.map_or(true, |(_, top)| weight > top) {
                best = Some((candidate, weight));
            }
        }

        if let Some((candidate, weight)) = best {
            let incumbent = self.hat.map(|hat| self.candidate_weight(&hat));
            if incumbent.map_or(true, |held| weight > held) {
                self.hat = Some(candidate);
            }
        }
        Ok(())
    }
}
