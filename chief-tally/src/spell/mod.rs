//! Best-effort decoding of candidate spell contracts.
//!
//! A spell, once elected and activated, calls exactly one parameter-setting
//! function on a governance-controlled target contract. Its deployment
//! parameters (target, 4-byte selector, argument blob) are enough to tell a
//! reader what the vote is actually about, provided the selector is one we
//! know. Decoding never fails: anything unexpected collapses into
//! [`DecodedAction::Unrecognized`] so one odd candidate cannot block the
//! tally of the others.

mod format;

use chief_replay::Address;
use serde::Serialize;
use std::collections::BTreeMap;

pub use format::{annualized_rate, format_key, scale_ray, scale_wad};

/// Deployment parameters of a candidate spell contract, as read from chain
/// storage by the metadata source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpellMeta {
    pub target: Address,
    pub selector: [u8; 4],
    pub calldata: Vec<u8>,
}

/// What a candidate does, as far as we can tell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedAction {
    Recognized {
        target: Address,
        function: String,
        /// The raw 32-byte argument words, hex encoded, in signature order.
        raw_args: Vec<String>,
        /// Human-readable rendering per parameter name.
        formatted_args: BTreeMap<String, String>,
    },
    Unrecognized {
        calldata: String,
    },
}

#[derive(Clone, Copy)]
enum Param {
    /// bytes32 identifier, usually a short ascii tag
    Key,
    /// per-second compounding rate in ray (1e27) fixed point
    RayRate,
    /// plain ray fixed-point value
    Ray,
    /// wad (1e18) fixed-point amount
    Wad,
    /// address, right-aligned in its word
    Account,
}

struct KnownFunction {
    selector: [u8; 4],
    name: &'static str,
    params: &'static [(&'static str, Param)],
}

// Selectors are the first four bytes of keccak-256 over the canonical
// signature.
const KNOWN_FUNCTIONS: &[KnownFunction] = &[
    // setFee(bytes32,uint256)
    KnownFunction {
        selector: [0xb9, 0x6f, 0x8f, 0x32],
        name: "setFee",
        params: &[("what", Param::Key), ("ray", Param::RayRate)],
    },
    // setCeiling(bytes32,uint256)
    KnownFunction {
        selector: [0x3c, 0x48, 0xdb, 0x7a],
        name: "setCeiling",
        params: &[("what", Param::Key), ("wad", Param::Wad)],
    },
    // setRatio(bytes32,uint256)
    KnownFunction {
        selector: [0x3e, 0xa8, 0xec, 0x49],
        name: "setRatio",
        params: &[("what", Param::Key), ("ray", Param::Ray)],
    },
    // setOracle(bytes32,address)
    KnownFunction {
        selector: [0x5e, 0xa8, 0xdf, 0xfb],
        name: "setOracle",
        params: &[("what", Param::Key), ("who", Param::Account)],
    },
];

/// Decodes a spell's call into a structured action. Total by construction:
/// unknown selectors, blobs of the wrong length, words past the supported
/// magnitude and overflowing rate scaling all degrade to `Unrecognized`.
pub fn decode(meta: &SpellMeta) -> DecodedAction {
    try_decode(meta).unwrap_or_else(|| DecodedAction::Unrecognized {
        calldata: format!(
            "0x{}{}",
            hex::encode(meta.selector),
            hex::encode(&meta.calldata)
        ),
    })
}

fn try_decode(meta: &SpellMeta) -> Option<DecodedAction> {
    let func = KNOWN_FUNCTIONS
        .iter()
        .find(|f| f.selector == meta.selector)?;
    if meta.calldata.len() != 32 * func.params.len() {
        return None;
    }

    let mut raw_args = Vec::new();
    let mut formatted_args = BTreeMap::new();
    for (chunk, (name, param)) in meta.calldata.chunks_exact(32).zip(func.params) {
        let word: [u8; 32] = chunk.try_into().ok()?;
        raw_args.push(format!("0x{}", hex::encode(word)));
        let rendered = match param {
            Param::Key => format::format_key(&word),
            Param::RayRate => format::annualized_rate(format::word_to_decimal(&word)?)?,
            Param::Ray => format::scale_ray(format::word_to_decimal(&word)?),
            Param::Wad => format::scale_wad(format::word_to_decimal(&word)?),
            Param::Account => format::word_to_address(&word)?.to_string(),
        };
        formatted_args.insert((*name).to_string(), rendered);
    }

    Some(DecodedAction::Recognized {
        target: meta.target,
        function: func.name.to_string(),
        raw_args,
        formatted_args,
    })
}
