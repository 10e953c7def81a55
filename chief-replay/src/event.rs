use crate::Error;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Voter weight, denominated in the governance token's display unit.
pub type Weight = Decimal;

/// A 20-byte account: a voter or a candidate action contract.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

/// Content-addressed slate identifier, 32 bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlateId([u8; 32]);

macro_rules! hex_newtype {
    ($name:ident, $len:expr) => {
        impl $name {
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = hex::FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix("0x").unwrap_or(s);
                let mut buf = [0u8; $len];
                hex::decode_to_slice(s, &mut buf)?;
                Ok(Self(buf))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

hex_newtype!(Address, 20);
hex_newtype!(SlateId, 32);

/// Position of a log entry in chain history. The derived order (block, then
/// transaction index, then log index) is the replay order; duplicate keys do
/// not occur in a deduplicated log set.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct LogOrder {
    pub block: u64,
    pub tx_index: u32,
    pub log_index: u32,
}

/// An event record as it comes out of a log dump, before validation. Every
/// payload field is optional here so that [`normalize`] can report exactly
/// which record is missing what.
#[derive(Clone, Debug, Deserialize)]
pub struct RawEvent {
    pub kind: String,
    #[serde(default)]
    pub block: Option<u64>,
    #[serde(default)]
    pub tx_index: Option<u32>,
    #[serde(default)]
    pub log_index: Option<u32>,
    #[serde(default)]
    pub slate: Option<SlateId>,
    #[serde(default)]
    pub candidates: Option<Vec<Address>>,
    #[serde(default)]
    pub voter: Option<Address>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub weight: Option<Weight>,
}

/// Registration of a slate: the candidate list hashing to `slate`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Etch {
    pub slate: SlateId,
    pub candidates: Vec<Address>,
    pub order: LogOrder,
}

/// A voter pointing their whole weight at a slate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vote {
    pub voter: Address,
    pub slate: SlateId,
    pub weight: Weight,
    pub order: LogOrder,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Etch(Etch),
    Vote(Vote),
}

impl Event {
    pub fn order(&self) -> LogOrder {
        match self {
            Event::Etch(etch) => etch.order,
            Event::Vote(vote) => vote.order,
        }
    }
}

/// Validates raw log records and sorts them into replay order. Records with
/// a missing required field or a negative weight fail the whole run.
pub fn normalize(raw: Vec<RawEvent>) -> Result<Vec<Event>, Error> {
    let mut events = raw
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            typed(record).map_err(|reason| Error::MalformedEvent { index, reason })
        })
        .collect::<Result<Vec<_>, _>>()?;
    events.sort_by_key(Event::order);
    Ok(events)
}

fn typed(raw: RawEvent) -> Result<Event, String> {
    let order = LogOrder {
        block: raw.block.ok_or("missing block")?,
        tx_index: raw.tx_index.ok_or("missing tx_index")?,
        log_index: raw.log_index.ok_or("missing log_index")?,
    };
    match raw.kind.as_str() {
        "etch" => Ok(Event::Etch(Etch {
            slate: raw.slate.ok_or("missing slate")?,
            candidates: raw.candidates.ok_or("missing candidates")?,
            order,
        })),
        "vote" => {
            let weight = raw.weight.ok_or("missing weight")?;
            if weight < Weight::ZERO {
                return Err(format!("negative weight {}", weight));
            }
            Ok(Event::Vote(Vote {
                voter: raw.voter.ok_or("missing voter")?,
                slate: raw.slate.ok_or("missing slate")?,
                weight,
                order,
            }))
        }
        other => Err(format!("unknown event kind {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    fn slate_id(n: u8) -> SlateId {
        SlateId::new([n; 32])
    }

    fn raw_vote(block: u64, voter: u8, slate: u8, weight: &str) -> RawEvent {
        RawEvent {
            kind: "vote".into(),
            block: Some(block),
            tx_index: Some(0),
            log_index: Some(0),
            slate: Some(slate_id(slate)),
            candidates: None,
            voter: Some(addr(voter)),
            weight: Some(weight.parse().unwrap()),
        }
    }

    #[test]
    fn address_hex_round_trip() {
        let addr: Address = "0x8E2a84D6adE1E7ffFEe039A35EF5F19F13057152"
            .parse()
            .unwrap();
        assert_eq!(
            addr.to_string(),
            "0x8e2a84d6ade1e7fffee039a35ef5f19f13057152"
        );
        assert_eq!(addr.to_string().parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn log_order_sorts_by_block_then_tx_then_log() {
        let mut keys = vec![
            LogOrder {
                block: 2,
                tx_index: 0,
                log_index: 0,
            },
            LogOrder {
                block: 1,
                tx_index: 3,
                log_index: 0,
            },
            LogOrder {
                block: 1,
                tx_index: 0,
                log_index: 7,
            },
            LogOrder {
                block: 1,
                tx_index: 0,
                log_index: 2,
            },
        ];
        keys.sort();
        assert_eq!(
            keys.iter().map(|k| k.block).collect::<Vec<_>>(),
            [1, 1, 1, 2]
        );
        assert_eq!(keys[0].log_index, 2);
        assert_eq!(keys[1].log_index, 7);
        assert_eq!(keys[2].tx_index, 3);
    }

    #[test]
    fn normalize_sorts_events() {
        let raw = vec![raw_vote(9, 1, 1, "5"), raw_vote(3, 2, 1, "1")];
        let events = normalize(raw).unwrap();
        assert_eq!(events[0].order().block, 3);
        assert_eq!(events[1].order().block, 9);
    }

    #[test]
    fn normalize_is_insertion_order_invariant() {
        let records = vec![
            raw_vote(3, 2, 1, "1"),
            raw_vote(9, 1, 1, "5"),
            raw_vote(7, 3, 1, "2"),
        ];
        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(normalize(records).unwrap(), normalize(reversed).unwrap());
    }

    #[test]
    fn normalize_rejects_missing_fields() {
        let mut raw = raw_vote(1, 1, 1, "5");
        raw.voter = None;
        let err = normalize(vec![raw]).unwrap_err();
        assert!(
            matches!(err, Error::MalformedEvent { index: 0, ref reason } if reason == "missing voter")
        );
    }

    #[test]
    fn normalize_rejects_negative_weight() {
        let raw = raw_vote(1, 1, 1, "-3");
        assert!(matches!(
            normalize(vec![raw]).unwrap_err(),
            Error::MalformedEvent { .. }
        ));
    }

    #[test]
    fn raw_event_parses_from_dump_json() {
        let json = format!(
            r#"{{"kind": "vote", "block": 4749400, "tx_index": 2, "log_index": 0,
                "voter": "{}", "slate": "{}", "weight": "125.5"}}"#,
            addr(1),
            slate_id(2),
        );
        let raw: RawEvent = serde_json::from_str(&json).unwrap();
        let events = normalize(vec![raw]).unwrap();
        match &events[0] {
            Event::Vote(vote) => {
                assert_eq!(vote.voter, addr(1));
                assert_eq!(vote.weight, "125.5".parse::<Weight>().unwrap());
            }
            other => panic!("expected vote, got {:?}", other),
        }
    }
}
