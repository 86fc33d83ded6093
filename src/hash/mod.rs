//! 32-bit string identifiers used by the bounds format.
//!
//! The engine stores names (surfaces, attribute names, bound names, paints)
//! as a one-way hash of the original text. [`hash`] reproduces that hash,
//! [`string_to_identifier`] accepts either a name or a literal `0x` value,
//! and [`HashResolver`] maps identifiers back to readable names using an
//! external string dictionary.

mod resolver;

pub use resolver::*;

use crate::util::{Error, Result};

/// Seed of the accumulator.
const HASH_SEED: u32 = 0xFFFF_FFFF;

/// Identifier reserved for "no value". Never looked up in a dictionary.
pub const NULL_IDENTIFIER: u32 = 0;

/// Hash a string the way the engine does.
///
/// Each character contributes its full Unicode scalar value, and the
/// accumulator wraps modulo 2^32.
#[inline]
pub fn hash(input: &str) -> u32 {
    input
        .chars()
        .fold(HASH_SEED, |acc, c| acc.wrapping_mul(33).wrapping_add(c as u32))
}

/// Convert user text to an identifier.
///
/// `"0x"` followed by hex digits is taken literally. Anything else,
/// including a `"0x"` prefix followed by non-hex text, is hashed. A literal
/// that is valid hex but wider than 32 bits is an error rather than being
/// silently hashed or truncated.
pub fn string_to_identifier(input: &str) -> Result<u32> {
    let Some(digits) = input.strip_prefix("0x") else {
        return Ok(hash(input));
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Ok(hash(input));
    }
    u32::from_str_radix(digits, 16)
        .map_err(|_| Error::invalid(format!("identifier {} does not fit in 32 bits", input)))
}

/// Canonical text for an identifier with no known name: `0x` + 8 uppercase hex digits.
#[inline]
pub fn format_identifier(id: u32) -> String {
    format!("0x{:08X}", id)
}

/// Name <-> identifier mapping used by the bounds codec.
///
/// The codec only reaches hashing through this trait, so hosts can swap in
/// their own tables.
pub trait NameTable {
    /// Identifier for a name (see [`string_to_identifier`]).
    fn to_identifier(&self, text: &str) -> Result<u32>;

    /// Known name for an identifier, if any.
    fn lookup(&self, id: u32) -> Option<String>;
}
