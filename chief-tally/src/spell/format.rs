//! Rendering of decoded spell arguments. Everything comes out as an exact
//! decimal string; floating point never enters the picture.

use chief_replay::Address;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

const RAY: Decimal = dec!(1_000_000_000_000_000_000_000_000_000);
const WAD: Decimal = dec!(1_000_000_000_000_000_000);
const SECONDS_PER_YEAR: u64 = 60 * 60 * 24 * 365;

/// uint256 word to a decimal magnitude. Values past 128 bits (or past the
/// decimal mantissa) have no business in a governance parameter; callers
/// treat `None` as unrecognizable.
pub(crate) fn word_to_decimal(word: &[u8; 32]) -> Option<Decimal> {
    if word[..16].iter().any(|b| *b != 0) {
        return None;
    }
    let value = u128::from_be_bytes(word[16..].try_into().ok()?);
    Decimal::try_from_i128_with_scale(i128::try_from(value).ok()?, 0).ok()
}

pub(crate) fn word_to_address(word: &[u8; 32]) -> Option<Address> {
    if word[..12].iter().any(|b| *b != 0) {
        return None;
    }
    Some(Address::new(word[12..].try_into().ok()?))
}

/// bytes32 keys are conventionally short ascii tags padded with zeros;
/// render those as text and anything else as hex.
pub fn format_key(word: &[u8; 32]) -> String {
    let end = word.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    match std::str::from_utf8(&word[..end]) {
        Ok(tag) if !tag.is_empty() && tag.bytes().all(|b| b.is_ascii_graphic()) => tag.to_string(),
        _ => format!("0x{}", hex::encode(word)),
    }
}

/// Annualizes a per-second ray rate by compounding over a year:
/// `((ray / 1e27) ^ 31536000 - 1) * 100`, rendered with two decimals.
pub fn annualized_rate(ray: Decimal) -> Option<String> {
    let per_second = ray / RAY;
    let yearly = per_second.checked_powu(SECONDS_PER_YEAR)?;
    let percent = yearly.checked_mul(dec!(100))? - dec!(100);
    Some(format!("{:.2}%", percent.round_dp(2)))
}

/// Exact decimal rendering of a wad (1e18) fixed-point amount.
pub fn scale_wad(value: Decimal) -> String {
    scaled(value, WAD)
}

/// Exact decimal rendering of a ray (1e27) fixed-point value.
pub fn scale_ray(value: Decimal) -> String {
    scaled(value, RAY)
}

fn scaled(value: Decimal, unit: Decimal) -> String {
    (value / unit).normalize().to_string()
}
