use crate::event::{Address, Weight};
use crate::replay::ReplayState;
use std::collections::{BTreeMap, HashMap};

/// Aggregate support for one candidate with the contributing voters.
/// `weight` is always the sum of the `voters` values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateTally {
    pub candidate: Address,
    pub weight: Weight,
    pub voters: BTreeMap<Address, Weight>,
}

/// Recomputes per-candidate support from the final replay state rather than
/// maintaining it incrementally; at tool scale the extra scan is cheap.
/// Ordered by weight descending, ties by candidate address ascending, so
/// repeated runs render identically.
pub fn tallies(state: &ReplayState) -> Vec<CandidateTally> {
    let mut voters_by_candidate: HashMap<Address, BTreeMap<Address, Weight>> = HashMap::new();
    for (voter, voter_state) in state.ledger.iter() {
        for candidate in state.registry.get(&voter_state.slate).into_iter().flatten() {
            let entry = voters_by_candidate.entry(*candidate).or_default();
            // zero-weight voters still surface their candidates but are not
            // listed as contributors
            if voter_state.weight > Weight::ZERO {
                entry.insert(*voter, voter_state.weight);
            }
        }
    }

    let mut tallies = voters_by_candidate
        .into_iter()
        .map(|(candidate, voters)| CandidateTally {
            candidate,
            weight: voters.values().sum(),
            voters,
        })
        .collect::<Vec<_>>();
    tallies.sort_by(|a, b| {
        b.weight
            .cmp(&a.weight)
            .then_with(|| a.candidate.cmp(&b.candidate))
    });
    tallies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Etch, Event, LogOrder, SlateId, Vote};
    use crate::replay::replay;
    use proptest::prelude::*;

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    fn slate_id(n: u8) -> SlateId {
        SlateId::new([n; 32])
    }

    fn order(block: u64) -> LogOrder {
        LogOrder {
            block,
            tx_index: 0,
            log_index: 0,
        }
    }

    fn etch(block: u64, id: u8, candidates: &[u8]) -> Event {
        Event::Etch(Etch {
            slate: slate_id(id),
            candidates: candidates.iter().map(|c| addr(*c)).collect(),
            order: order(block),
        })
    }

    fn vote(block: u64, voter: u8, slate: u8, weight: u32) -> Event {
        Event::Vote(Vote {
            voter: addr(voter),
            slate: slate_id(slate),
            weight: Weight::from(weight),
            order: order(block),
        })
    }

    #[test]
    fn tallies_are_ordered_by_weight_then_address() {
        let events = vec![
            etch(1, 1, &[10]),
            etch(2, 2, &[11]),
            etch(3, 3, &[9]),
            vote(4, 1, 1, 5),
            vote(5, 2, 2, 5),
            vote(6, 3, 3, 8),
        ];
        let state = replay(&events).unwrap();
        let result = tallies(&state);
        let order: Vec<Address> = result.iter().map(|t| t.candidate).collect();
        // 8 first, then the two 5s by ascending address
        assert_eq!(order, [addr(9), addr(10), addr(11)]);
    }

    #[test]
    fn a_voter_counts_once_per_candidate_in_its_slate() {
        let events = vec![etch(1, 1, &[10, 11]), vote(2, 1, 1, 7)];
        let state = replay(&events).unwrap();
        let result = tallies(&state);
        assert_eq!(result.len(), 2);
        for tally in &result {
            assert_eq!(tally.weight, Weight::from(7u32));
            assert_eq!(tally.voters.get(&addr(1)), Some(&Weight::from(7u32)));
        }
    }

    #[test]
    fn abandoned_slates_drop_out_of_the_tally() {
        let events = vec![
            etch(1, 1, &[10]),
            etch(2, 2, &[11]),
            vote(3, 1, 1, 7),
            vote(4, 1, 2, 7), // voter moves entirely to S2
        ];
        let state = replay(&events).unwrap();
        let result = tallies(&state);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].candidate, addr(11));
    }

    #[test]
    fn zero_weight_voters_surface_candidates_without_contributing() {
        let events = vec![etch(1, 1, &[10]), vote(2, 1, 1, 0)];
        let state = replay(&events).unwrap();
        let result = tallies(&state);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].weight, Weight::ZERO);
        assert!(result[0].voters.is_empty());
    }

    // Streams where every vote references a previously etched slate, the
    // shape any consistent chief log has.
    fn consistent_stream() -> impl Strategy<Value = Vec<Event>> {
        let slates = proptest::collection::vec(proptest::collection::btree_set(0u8..6, 1..4), 1..5);
        let votes = proptest::collection::vec((0usize..8, 0u8..8, 0u32..1000), 0..16);
        (slates, votes).prop_map(|(slates, votes)| {
            let mut events = Vec::new();
            let mut block = 0u64;
            for (i, candidates) in slates.iter().enumerate() {
                events.push(etch(
                    block,
                    i as u8,
                    &candidates.iter().copied().collect::<Vec<_>>(),
                ));
                block += 1;
            }
            for (slate, voter, weight) in votes {
                events.push(vote(block, voter, (slate % slates.len()) as u8, weight));
                block += 1;
            }
            events
        })
    }

    proptest! {
        #[test]
        fn replay_is_deterministic(events in consistent_stream()) {
            let first = replay(&events).unwrap();
            let second = replay(&events).unwrap();
            prop_assert_eq!(tallies(&first), tallies(&second));
            prop_assert_eq!(first.hat, second.hat);
        }

        #[test]
        fn voter_weight_is_conserved(events in consistent_stream()) {
            let state = replay(&events).unwrap();
            let result = tallies(&state);
            for (voter, voter_state) in state.ledger.iter() {
                let slate = state.registry.get(&voter_state.slate).unwrap();
                for tally in &result {
                    let contribution = tally.voters.get(voter).copied().unwrap_or_default();
                    if slate.contains(&tally.candidate) && voter_state.weight > Weight::ZERO {
                        prop_assert_eq!(contribution, voter_state.weight);
                    } else {
                        prop_assert_eq!(contribution, Weight::ZERO);
                    }
                }
            }
        }

        #[test]
        fn candidate_weight_matches_the_tally(events in consistent_stream()) {
            let state = replay(&events).unwrap();
            for tally in tallies(&state) {
                prop_assert_eq!(state.candidate_weight(&tally.candidate), tally.weight);
                prop_assert_eq!(tally.voters.values().copied().sum::<Weight>(), tally.weight);
            }
        }
    }
}
