use std::collections::VecDeque;

use log::trace;

use super::{Error, ResolveMode, ResolveStats, Strategy, stuck};
use crate::network::Network;

/// FIFO worklist with bounded retry.
///
/// Gates that are not ready go to the back of the queue. One sweep is a pass
/// over the gates queued when it started; a sweep that applies nothing means
/// the rest can never fire.
#[derive(Debug, Default)]
pub struct WorklistMode;

impl ResolveMode for WorklistMode {
    const STRATEGY: Strategy = Strategy::Worklist;

    fn run(network: &mut Network, stats: &mut ResolveStats) -> Result<(), Error> {
        let mut worklist = (0..network.gates().len()).collect::<VecDeque<_>>();

        while !worklist.is_empty() {
            stats.sweeps += 1;

            let sweep_len = worklist.len();
            let mut fired = 0;

            for _ in 0..sweep_len {
                let Some(index) = worklist.pop_front() else {
                    break;
                };
                let gate = network.gates()[index];

                match gate.evaluate(network.wires())? {
                    Some(value) => {
                        trace!("{}: {} = {}", Self::STRATEGY, network.describe(&gate), value);
                        network.set_wire(gate.wire_c, value)?;
                        fired += 1;
                    }
                    None => {
                        worklist.push_back(index);
                        stats.deferred += 1;
                    }
                }
            }

            stats.applied += fired;
            trace!(
                "{}: sweep {} applied {} of {}",
                Self::STRATEGY,
                stats.sweeps,
                fired,
                sweep_len
            );

            if fired == 0 {
                return Err(stuck(network, worklist));
            }
        }

        Ok(())
    }
}
