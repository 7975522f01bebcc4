//! Checks whether a network behaves like a ripple-carry adder.
//!
//! The network is expected to read two operands from the `x00`, `x01`, ...
//! and `y00`, `y01`, ... wires and write `x + y` to the `z..` wires. Operand
//! wires are the prefix followed by digits only, are not written by any gate,
//! and are ordered by their number. For every bit position a handful of
//! probe operands is fed through the gate structure: the bit alone in either
//! operand, in both, and with a carry coming in from the bit below. A probe
//! for bit `i` checks the sum bits `0..=i` (the top bit also checks the final
//! carry), so a broken slice is blamed on its own position rather than on
//! every position whose carry passes through it.
//!
//! For each failing bit the audit lists the gate outputs of its slice: the
//! wires `z_i` and `z_i+1` depend on that no lower sum bit depends on.
//! [`AdderAudit::find_swaps`] tries exchanging the drivers of every pair of
//! those wires and keeps the swaps that repair bits without breaking others.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;

use crate::{
    Gate, WireId,
    network::{Network, NetworkError},
    resolve::{Resolver, Strategy},
};

pub const X_PREFIX: &str = "x";
pub const Y_PREFIX: &str = "y";
pub const Z_PREFIX: &str = "z";

const MAX_WIDTH: usize = 64;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("No operand wires with prefix {0:?}")]
    MissingOperand(&'static str),
    #[error("Operands have different widths: {x} x wires, {y} y wires")]
    WidthMismatch { x: usize, y: usize },
    #[error("Operands of {0} bits are wider than 64")]
    TooWide(usize),
    #[error(transparent)]
    Network(#[from] NetworkError),
}
pub type AdderError = Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdderAudit {
    pub width: usize,
    pub probes: usize,
    pub failing_bits: BTreeSet<usize>,
    /// Gate outputs in the slice of each failing bit
    pub suspects: BTreeMap<usize, BTreeSet<String>>,
}

/// Exchanging the drivers of `a` and `b` repairs `repaired`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swap {
    pub a: String,
    pub b: String,
    pub repaired: BTreeSet<usize>,
}

impl AdderAudit {
    pub fn run(network: &Network, strategy: Strategy) -> Result<Self, Error> {
        let operands = Operands::find(network)?;
        let width = operands.xs.len();

        let mut audit = AdderAudit {
            width,
            probes: 0,
            failing_bits: BTreeSet::new(),
            suspects: BTreeMap::new(),
        };

        for bit in 0..width {
            // the top slice also owns the final carry
            let mask = if bit + 1 == width {
                u128::MAX
            } else {
                (1u128 << (bit + 1)) - 1
            };

            for (x, y) in probes(bit) {
                audit.probes += 1;
                let expected = (u128::from(x) + u128::from(y)) & mask;

                match sum(network, &operands, x, y, strategy)? {
                    Some(got) if got & mask == expected => {}
                    got => {
                        debug!("adder: bit {bit} probe {x:#b} + {y:#b} gave {got:?}");
                        audit.failing_bits.insert(bit);
                    }
                }
            }
        }

        audit.suspects = suspects(network, &operands.zs, &audit.failing_bits);

        info!(
            "adder: {} bit(s), {} probe(s), failing bits {:?}",
            audit.width, audit.probes, audit.failing_bits
        );

        Ok(audit)
    }

    pub fn is_correct(&self) -> bool {
        self.failing_bits.is_empty()
    }

    pub fn first_failing_bit(&self) -> Option<usize> {
        self.failing_bits.first().copied()
    }

    /// Pairs of suspect wires whose swapped drivers fix at least one failing
    /// bit and break none that passed.
    pub fn find_swaps(&self, network: &Network, strategy: Strategy) -> Result<Vec<Swap>, Error> {
        let candidates = self.suspects.values().flatten().collect::<BTreeSet<_>>();
        let pairs = candidates
            .iter()
            .copied()
            .tuple_combinations::<(_, _)>()
            .collect::<Vec<_>>();

        debug!("adder: trying {} swap(s)", pairs.len());

        let swaps = pairs
            .par_iter()
            .map(|(a, b)| self.try_swap(network, a, b, strategy))
            .collect::<Result<Vec<_>, Error>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        info!("adder: {} repairing swap(s)", swaps.len());

        Ok(swaps)
    }

    fn try_swap(
        &self,
        network: &Network,
        a: &str,
        b: &str,
        strategy: Strategy,
    ) -> Result<Option<Swap>, Error> {
        let mut swapped = network.clone();
        swapped.swap_outputs(a, b)?;

        let audit = AdderAudit::run(&swapped, strategy)?;
        if !audit.failing_bits.is_subset(&self.failing_bits) {
            return Ok(None);
        }

        let repaired = self
            .failing_bits
            .difference(&audit.failing_bits)
            .copied()
            .collect::<BTreeSet<_>>();
        if repaired.is_empty() {
            return Ok(None);
        }

        debug!("adder: swapping {a} and {b} repairs {repaired:?}");
        Ok(Some(Swap {
            a: a.to_owned(),
            b: b.to_owned(),
            repaired,
        }))
    }
}

/// Operand and sum wires, least significant first.
struct Operands {
    xs: Vec<WireId>,
    ys: Vec<WireId>,
    zs: Vec<WireId>,
}

impl Operands {
    fn find(network: &Network) -> Result<Self, Error> {
        let xs = numbered(network, X_PREFIX, true)?;
        let ys = numbered(network, Y_PREFIX, true)?;
        let zs = numbered(network, Z_PREFIX, false)?;

        if xs.len() != ys.len() {
            return Err(Error::WidthMismatch {
                x: xs.len(),
                y: ys.len(),
            });
        }
        if xs.len() > MAX_WIDTH {
            return Err(Error::TooWide(xs.len()));
        }

        Ok(Self { xs, ys, zs })
    }
}

/// Bit number of `name` if it is `prefix` followed by digits only.
fn bit_number(name: &str, prefix: &str) -> Option<usize> {
    let digits = name.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn numbered(
    network: &Network,
    prefix: &'static str,
    inputs_only: bool,
) -> Result<Vec<WireId>, Error> {
    let wires = network
        .iter()
        .filter_map(|(name, _)| Some((bit_number(name, prefix)?, network.wire_id(name)?)))
        .filter(|(_, wire_id)| !inputs_only || !network.is_driven(*wire_id))
        .sorted_unstable()
        .map(|(_, wire_id)| wire_id)
        .collect::<Vec<_>>();

    if wires.is_empty() {
        return Err(Error::MissingOperand(prefix));
    }

    Ok(wires)
}

fn probes(bit: usize) -> Vec<(u64, u64)> {
    let own = 1u64 << bit;
    let mut probes = vec![(own, 0), (0, own), (own, own), (0, 0)];

    if bit > 0 {
        let below = own >> 1;
        // carry in alone, then carry in on top of x_i
        probes.push((below, below));
        probes.push((own | below, below));
    }

    probes
}

/// `None` when the network does not resolve for these operands.
fn sum(
    network: &Network,
    operands: &Operands,
    x: u64,
    y: u64,
    strategy: Strategy,
) -> Result<Option<u128>, Error> {
    let inputs = operand_bits(&operands.xs, x).chain(operand_bits(&operands.ys, y));
    let probe = network.with_inputs(inputs)?;

    let resolved = match Resolver::new(probe).with_strategy(strategy).resolve() {
        Ok(resolved) => resolved,
        Err(err) => {
            debug!("adder: probe {x:#b} + {y:#b} doesn't resolve: {err}");
            return Ok(None);
        }
    };

    Ok(operands
        .zs
        .iter()
        .rev()
        .map(|wire| network.wire_name(*wire).and_then(|name| resolved.get(name)))
        .try_fold(0u128, |acc, bit| Some(acc.checked_mul(2)? | u128::from(bit?))))
}

fn operand_bits(wires: &[WireId], value: u64) -> impl Iterator<Item = (WireId, bool)> + '_ {
    wires
        .iter()
        .enumerate()
        .map(move |(i, wire)| (*wire, (value >> i) & 1 == 1))
}

/// Driven wires `targets` depend on, the targets included.
fn cone(
    drivers: &HashMap<WireId, Vec<&Gate>>,
    targets: impl IntoIterator<Item = WireId>,
) -> BTreeSet<WireId> {
    let mut seen = BTreeSet::new();
    let mut stack = targets.into_iter().collect::<Vec<_>>();

    while let Some(wire) = stack.pop() {
        let Some(gates) = drivers.get(&wire) else {
            continue;
        };
        if seen.insert(wire) {
            stack.extend(gates.iter().flat_map(|gate| gate.inputs()));
        }
    }

    seen
}

fn suspects(
    network: &Network,
    zs: &[WireId],
    failing_bits: &BTreeSet<usize>,
) -> BTreeMap<usize, BTreeSet<String>> {
    let drivers = network
        .gates()
        .iter()
        .into_group_map_by(|gate| gate.wire_c);

    failing_bits
        .iter()
        .map(|&bit| {
            let below = cone(&drivers, zs.iter().take(bit).copied());
            let slice = cone(&drivers, zs.iter().skip(bit).take(2).copied());

            let names = slice
                .difference(&below)
                .filter_map(|wire| network.wire_name(*wire))
                .map(str::to_owned)
                .collect::<BTreeSet<_>>();

            (bit, names)
        })
        .collect()
}
