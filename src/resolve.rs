//! Drives a [`Network`] to a fixpoint where every wire has a value.
//!
//! Resolution applies each gate exactly once, only after both of its inputs
//! are known. Three strategies are available and all of them produce the same
//! wire values for the same network:
//!
//! - [`Strategy::Worklist`]: FIFO worklist, not-ready gates are deferred to the
//!   back of the queue. A full sweep that applies no gate stops the run.
//! - [`Strategy::Topological`]: Kahn's algorithm over the gate dependency graph,
//!   gates are applied in the order the sort produces them.
//! - [`Strategy::ParallelSweep`]: every sweep applies the gates that were ready
//!   when the sweep started, computing their outputs on the rayon pool.
//!
//! A cyclic network, or a gate reading a wire nothing produces, is reported as
//! [`Error::UnresolvableNetwork`] by every strategy.

use std::{
    collections::BTreeMap,
    fmt,
    ops::Bound,
    str::FromStr,
};

use log::{debug, warn};
use serde::Serialize;

use crate::{
    WireError,
    network::{Network, NetworkError},
};

mod parallel_sweep;
mod topological;
mod worklist;

pub use parallel_sweep::ParallelSweepMode;
pub use topological::TopologicalMode;
pub use worklist::WorklistMode;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// No further gate can fire but some are still pending
    #[error(
        "Network can't be resolved: {} gate(s) pending [{}], unknown wires [{}]",
        .pending.len(),
        .pending.join("; "),
        .unknown.join(", ")
    )]
    UnresolvableNetwork {
        pending: Vec<String>,
        unknown: Vec<String>,
    },
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Wire(#[from] WireError),
}
pub type ResolveError = Error;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Unknown strategy {0:?}, expected worklist, topological or parallel-sweep")]
pub struct UnknownStrategy(String);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    #[default]
    Worklist,
    Topological,
    ParallelSweep,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Worklist,
        Strategy::Topological,
        Strategy::ParallelSweep,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Strategy::Worklist => "worklist",
            Strategy::Topological => "topological",
            Strategy::ParallelSweep => "parallel-sweep",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parallel" => Ok(Strategy::ParallelSweep),
            s => Strategy::ALL
                .into_iter()
                .find(|strategy| strategy.name() == s)
                .ok_or_else(|| UnknownStrategy(s.to_owned())),
        }
    }
}

/// Counters collected while resolving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    pub strategy: Strategy,
    /// Full passes over the pending gates
    pub sweeps: usize,
    /// Gates applied, each one exactly once
    pub applied: usize,
    /// Times a not-ready gate was pushed back
    pub deferred: usize,
}

/// One way of ordering gate applications.
pub trait ResolveMode {
    const STRATEGY: Strategy;

    /// Applies every gate of `network` once, or fails without looping.
    fn run(network: &mut Network, stats: &mut ResolveStats) -> Result<(), Error>;
}

/// Owns a network for the duration of one resolution run.
#[derive(Debug)]
pub struct Resolver {
    network: Network,
    strategy: Strategy,
}

impl Resolver {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            strategy: Strategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn resolve(mut self) -> Result<ResolvedNetwork, Error> {
        debug!(
            "resolve: strategy={} gates={} wires={} known={}",
            self.strategy,
            self.network.gates().len(),
            self.network.wire_count(),
            self.network.wires().resolved_count()
        );

        let mut stats = ResolveStats {
            strategy: self.strategy,
            ..Default::default()
        };

        match self.strategy {
            Strategy::Worklist => WorklistMode::run(&mut self.network, &mut stats)?,
            Strategy::Topological => TopologicalMode::run(&mut self.network, &mut stats)?,
            Strategy::ParallelSweep => ParallelSweepMode::run(&mut self.network, &mut stats)?,
        }

        debug!(
            "resolve: done strategy={} sweeps={} applied={} deferred={}",
            stats.strategy, stats.sweeps, stats.applied, stats.deferred
        );

        ResolvedNetwork::from_network(self.network, stats)
    }
}

/// Builds the failure for a run that can't make progress.
fn stuck(network: &Network, pending: impl IntoIterator<Item = usize>) -> Error {
    let gates = network.gates();
    let pending = pending
        .into_iter()
        .filter_map(|index| gates.get(index))
        .map(|gate| network.describe(gate))
        .collect::<Vec<_>>();
    let unknown = network.unresolved_names();

    warn!(
        "resolve: stuck with {} pending gate(s), {} unknown wire(s)",
        pending.len(),
        unknown.len()
    );

    Error::UnresolvableNetwork { pending, unknown }
}

/// Every wire of a network with its final value, ordered by name.
#[derive(Clone, Debug, Serialize)]
pub struct ResolvedNetwork {
    wires: BTreeMap<String, bool>,
    stats: ResolveStats,
}

impl ResolvedNetwork {
    fn from_network(network: Network, stats: ResolveStats) -> Result<Self, Error> {
        let unknown = network.unresolved_names();
        if !unknown.is_empty() {
            return Err(Error::UnresolvableNetwork {
                pending: vec![],
                unknown,
            });
        }

        let wires = network
            .iter()
            .filter_map(|(name, value)| Some((name.to_owned(), value?)))
            .collect();

        Ok(Self { wires, stats })
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.wires.get(name).copied()
    }

    pub fn values(&self) -> &BTreeMap<String, bool> {
        &self.wires
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.wires.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Wires whose name starts with `prefix`, in ascending name order.
    pub fn with_prefix<'s>(&'s self, prefix: &str) -> impl Iterator<Item = (&'s str, bool)> {
        self.wires
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(name, _)| name.starts_with(prefix))
            .map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    pub fn stats(&self) -> &ResolveStats {
        &self.stats
    }
}
