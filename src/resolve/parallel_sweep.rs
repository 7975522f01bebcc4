use log::trace;
use rayon::prelude::*;

use super::{Error, ResolveMode, ResolveStats, Strategy, stuck};
use crate::{Gate, network::Network};

/// Sweep-synchronous evaluation on the rayon pool.
///
/// Gates that are ready when a sweep starts only read the network, so their
/// values are computed in parallel. Writes are applied in declaration order
/// once the whole sweep has been computed; the next sweep only sees them
/// after that barrier.
#[derive(Debug, Default)]
pub struct ParallelSweepMode;

impl ResolveMode for ParallelSweepMode {
    const STRATEGY: Strategy = Strategy::ParallelSweep;

    fn run(network: &mut Network, stats: &mut ResolveStats) -> Result<(), Error> {
        let mut pending = (0..network.gates().len()).collect::<Vec<_>>();

        while !pending.is_empty() {
            stats.sweeps += 1;

            let mut ready: Vec<(Gate, bool, bool)> = Vec::new();
            let mut rest = Vec::new();

            for index in pending {
                let gate = network.gates()[index];
                match gate.ready_inputs(network.wires())? {
                    Some((a, b)) => ready.push((gate, a, b)),
                    None => rest.push(index),
                }
            }

            if ready.is_empty() {
                return Err(stuck(network, rest));
            }

            let outputs = ready
                .par_iter()
                .map(|(gate, a, b)| (*gate, gate.execute(*a, *b)))
                .collect::<Vec<_>>();

            for (gate, value) in outputs {
                trace!("{}: {} = {}", Self::STRATEGY, network.describe(&gate), value);
                network.set_wire(gate.wire_c, value)?;
            }

            trace!(
                "{}: sweep {} applied {}, {} left",
                Self::STRATEGY,
                stats.sweeps,
                ready.len(),
                rest.len()
            );

            stats.applied += ready.len();
            stats.deferred += rest.len();
            pending = rest;
        }

        Ok(())
    }
}
