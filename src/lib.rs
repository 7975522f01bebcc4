pub mod adder;
pub mod assemble;
mod core;
pub mod network;
pub mod parse;
pub mod resolve;

pub use crate::core::{
    gate::Gate,
    gate_type::{GateCount, GateType, GateTypeError},
    wire::{OptionalBoolean, WireError, WireId, Wires},
};

pub use adder::{AdderAudit, AdderError, Swap};
pub use assemble::{AssembleError, WireSource, assemble, assemble_wide, bits};
pub use network::{Network, NetworkError};
pub use parse::{ParseError, ParseReport, parse, parse_file};
pub use resolve::{ResolveError, ResolveStats, ResolvedNetwork, Resolver, Strategy};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error(transparent)]
    Adder(#[from] AdderError),
    #[error("Failed to serialize resolved network: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses, resolves and assembles the wires starting with `prefix`.
pub fn evaluate(input: &str, prefix: &str, strategy: Strategy) -> Result<u64, Error> {
    let (network, _report) = parse(input)?;
    let resolved = Resolver::new(network).with_strategy(strategy).resolve()?;
    Ok(assemble(&resolved, prefix)?)
}

#[cfg(test)]
pub mod test_utils {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use crate::{GateType, Network};

    pub fn trng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(0)
    }

    /// `z = x + y` over `width` bits, operands all zero.
    pub fn ripple_carry_adder(width: usize) -> Network {
        let mut network = Network::new();
        for i in 0..width {
            network.set_value(&format!("x{i:02}"), false).unwrap();
            network.set_value(&format!("y{i:02}"), false).unwrap();
        }

        let carry = |i: usize| {
            if i == width {
                format!("z{i:02}")
            } else {
                format!("c{i:02}")
            }
        };

        network.add_gate("x00", GateType::Xor, "y00", "z00");
        network.add_gate("x00", GateType::And, "y00", &carry(1));

        for i in 1..width {
            let (x, y) = (format!("x{i:02}"), format!("y{i:02}"));
            let (s, a, t) = (format!("s{i:02}"), format!("a{i:02}"), format!("t{i:02}"));
            let carry_in = carry(i);

            network.add_gate(&x, GateType::Xor, &y, &s);
            network.add_gate(&x, GateType::And, &y, &a);
            network.add_gate(&s, GateType::Xor, &carry_in, &format!("z{i:02}"));
            network.add_gate(&s, GateType::And, &carry_in, &t);
            network.add_gate(&a, GateType::Or, &t, &carry(i + 1));
        }

        network
    }
}
