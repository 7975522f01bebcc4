use std::collections::VecDeque;

use log::trace;

use super::{Error, ResolveMode, ResolveStats, Strategy, stuck};
use crate::network::Network;

/// Kahn's algorithm over the gate dependency graph.
///
/// A gate waits on each input slot whose wire is unknown. When a wire gets its
/// first value every slot reading it is released, and a gate with no waiting
/// slot left joins the queue. Gates never released sit on a cycle or read a
/// wire nothing produces.
#[derive(Debug, Default)]
pub struct TopologicalMode;

impl ResolveMode for TopologicalMode {
    const STRATEGY: Strategy = Strategy::Topological;

    fn run(network: &mut Network, stats: &mut ResolveStats) -> Result<(), Error> {
        let gates = network.gates().to_vec();
        if gates.is_empty() {
            return Ok(());
        }

        let mut consumers = vec![Vec::new(); network.wire_count()];
        let mut waiting = Vec::with_capacity(gates.len());
        let mut queue = VecDeque::new();

        for (index, gate) in gates.iter().enumerate() {
            let mut unknown_inputs = 0usize;
            for input in gate.inputs() {
                if network.wires().get(input)?.is_none() {
                    unknown_inputs += 1;
                    if let Some(readers) = consumers.get_mut(*input) {
                        readers.push(index);
                    }
                }
            }

            waiting.push(unknown_inputs);
            if unknown_inputs == 0 {
                queue.push_back(index);
            }
        }

        let mut applied = vec![false; gates.len()];
        stats.sweeps = 1;

        while let Some(index) = queue.pop_front() {
            let gate = gates[index];

            let Some(value) = gate.evaluate(network.wires())? else {
                // released gates always have both inputs
                return Err(stuck(network, pending(&applied)));
            };

            trace!("{}: {} = {}", Self::STRATEGY, network.describe(&gate), value);

            let first_write = network.set_wire(gate.wire_c, value)?;
            applied[index] = true;
            stats.applied += 1;

            if !first_write {
                continue;
            }

            for &reader in consumers.get(*gate.wire_c).into_iter().flatten() {
                waiting[reader] -= 1;
                if waiting[reader] == 0 {
                    queue.push_back(reader);
                }
            }
        }

        if stats.applied < gates.len() {
            return Err(stuck(network, pending(&applied)));
        }

        Ok(())
    }
}

fn pending(applied: &[bool]) -> Vec<usize> {
    applied
        .iter()
        .enumerate()
        .filter(|(_, applied)| !**applied)
        .map(|(index, _)| index)
        .collect()
}
