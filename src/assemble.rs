//! Reads a group of wires as an unsigned binary number.
//!
//! Wires are selected by name prefix and ordered by name, descending, so the
//! greatest name is the most significant bit. The ordering is a plain string
//! comparison: names must be zero padded to a common width (`z00`..`z45`),
//! otherwise `z9` sorts above `z10`.

use itertools::Itertools;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::{network::Network, resolve::ResolvedNetwork};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("No wire name starts with {0:?}")]
    MissingPrefix(String),
    #[error("Wire {0} has no value")]
    UnresolvedWire(String),
    #[error("Wires with prefix {prefix:?} ({width} bits) don't fit into u64")]
    Overflow { prefix: String, width: usize },
}
pub type AssembleError = Error;

/// Anything that can list its wires with their values, known or not.
pub trait WireSource {
    fn wires_with_prefix<'s>(&'s self, prefix: &str) -> Vec<(&'s str, Option<bool>)>;
}

impl WireSource for ResolvedNetwork {
    fn wires_with_prefix<'s>(&'s self, prefix: &str) -> Vec<(&'s str, Option<bool>)> {
        self.with_prefix(prefix)
            .map(|(name, value)| (name, Some(value)))
            .collect()
    }
}

impl WireSource for Network {
    fn wires_with_prefix<'s>(&'s self, prefix: &str) -> Vec<(&'s str, Option<bool>)> {
        self.iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .collect()
    }
}

/// Selected wires, most significant first.
fn select<'s, S: WireSource + ?Sized>(
    source: &'s S,
    prefix: &str,
) -> Result<Vec<(&'s str, bool)>, Error> {
    let wires = source.wires_with_prefix(prefix);
    if wires.is_empty() {
        return Err(Error::MissingPrefix(prefix.to_owned()));
    }

    wires
        .into_iter()
        .sorted_unstable_by(|(a, _), (b, _)| b.cmp(a))
        .map(|(name, value)| {
            value
                .map(|bit| (name, bit))
                .ok_or_else(|| Error::UnresolvedWire(name.to_owned()))
        })
        .collect()
}

fn fold_bits<'s>(bits: impl IntoIterator<Item = (&'s str, bool)>) -> BigUint {
    bits.into_iter()
        .fold(BigUint::zero(), |acc, (_, bit)| (acc << 1u32) + u32::from(bit))
}

/// The binary literal of the selected wires, e.g. `"101000"`.
pub fn bits<S: WireSource + ?Sized>(source: &S, prefix: &str) -> Result<String, Error> {
    Ok(select(source, prefix)?
        .into_iter()
        .map(|(_, bit)| if bit { '1' } else { '0' })
        .collect())
}

/// Assembles the wires starting with `prefix` into a `u64`.
///
/// Leading zero wires beyond 64 are fine, only the value has to fit.
pub fn assemble<S: WireSource + ?Sized>(source: &S, prefix: &str) -> Result<u64, Error> {
    let selected = select(source, prefix)?;
    let width = selected.len();

    fold_bits(selected)
        .to_u64()
        .ok_or_else(|| Error::Overflow {
            prefix: prefix.to_owned(),
            width,
        })
}

/// Same as [`assemble`] without a width limit.
pub fn assemble_wide<S: WireSource + ?Sized>(source: &S, prefix: &str) -> Result<BigUint, Error> {
    Ok(fold_bits(select(source, prefix)?))
}
