//! Named wires, their write-once values and the gates connecting them.

use std::collections::{HashMap, hash_map::Entry};

use crate::{
    Gate, GateCount, GateType, WireId, Wires,
    core::wire::{self, WireError},
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Wire {wire} is already {current}, can't assign {new}")]
    DuplicateAssignment {
        wire: String,
        current: bool,
        new: bool,
    },
    #[error("Wire {0} is not part of the network")]
    UnknownWire(String),
    #[error("No gate drives wire {0}")]
    NotDriven(String),
    #[error(transparent)]
    Wire(#[from] WireError),
}
pub type NetworkError = Error;

/// A combinational network: interned wire names, their values and the gates
/// between them, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Network {
    names: Vec<String>,
    ids: HashMap<String, WireId>,
    wires: Wires,
    gates: Vec<Gate>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `name`, issuing a new unknown wire on first mention.
    ///
    /// Only assignments and gates intern names, so every wire is either
    /// valued or connected to a gate.
    pub(crate) fn wire(&mut self, name: &str) -> WireId {
        match self.ids.entry(name.to_owned()) {
            Entry::Occupied(occupied) => *occupied.get(),
            Entry::Vacant(vacant) => {
                let id = self.wires.issue();
                self.names.push(name.to_owned());
                *vacant.insert(id)
            }
        }
    }

    pub fn wire_id(&self, name: &str) -> Option<WireId> {
        self.ids.get(name).copied()
    }

    pub fn wire_name(&self, wire_id: WireId) -> Option<&str> {
        self.names.get(*wire_id).map(String::as_str)
    }

    /// Records a known value for `name`.
    pub fn set_value(&mut self, name: &str, value: bool) -> Result<(), Error> {
        let wire_id = self.wire(name);
        self.set_wire(wire_id, value).map(|_| ())
    }

    /// Records a value by id. Returns `true` if the wire was unknown before.
    pub fn set_wire(&mut self, wire_id: WireId, value: bool) -> Result<bool, Error> {
        match self.wires.init(wire_id, value) {
            Err(wire::Error::WireAlreadyInitialized { wire, current }) => {
                Err(Error::DuplicateAssignment {
                    wire: self.display_name(wire),
                    current,
                    new: value,
                })
            }
            other => Ok(other?),
        }
    }

    pub fn get_value(&self, name: &str) -> Option<bool> {
        self.wire_id(name).and_then(|wire_id| self.value(wire_id))
    }

    pub fn value(&self, wire_id: WireId) -> Option<bool> {
        self.wires.get(wire_id).ok().flatten()
    }

    pub fn wires(&self) -> &Wires {
        &self.wires
    }

    /// Declares `a OP b -> out`, interning all three names.
    pub fn add_gate(&mut self, a: &str, gate_type: GateType, b: &str, out: &str) -> Gate {
        let gate = Gate::new(gate_type, self.wire(a), self.wire(b), self.wire(out));
        self.gates.push(gate);
        gate
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Gates whose output wire is still unknown.
    pub fn pending_gates(&self) -> impl Iterator<Item = &Gate> + '_ {
        self.gates
            .iter()
            .filter(|gate| self.value(gate.wire_c).is_none())
    }

    pub fn gate_count(&self) -> GateCount {
        let mut count = GateCount::default();
        self.gates.iter().for_each(|gate| count.handle(gate.gate_type));
        count
    }

    pub fn wire_count(&self) -> usize {
        self.names.len()
    }

    /// All wires with their current value, in the order they were first mentioned.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<bool>)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), self.value(WireId(index))))
    }

    /// Names of the wires that still have no value, sorted.
    pub fn unresolved_names(&self) -> Vec<String> {
        let mut names = self
            .wires
            .unresolved()
            .map(|wire_id| self.display_name(wire_id))
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    /// Renders a gate with wire names, e.g. `x00 AND y00 -> z00`.
    pub fn describe(&self, gate: &Gate) -> String {
        format!(
            "{} {} {} -> {}",
            self.display_name(gate.wire_a),
            gate.gate_type,
            self.display_name(gate.wire_b),
            self.display_name(gate.wire_c)
        )
    }

    /// Exchanges the output wires of the gates driving `a` and `b`.
    pub fn swap_outputs(&mut self, a: &str, b: &str) -> Result<(), Error> {
        let a_id = self.driven_wire(a)?;
        let b_id = self.driven_wire(b)?;

        for gate in self.gates.iter_mut() {
            if gate.wire_c == a_id {
                gate.wire_c = b_id;
            } else if gate.wire_c == b_id {
                gate.wire_c = a_id;
            }
        }

        Ok(())
    }

    /// Copy of the network where `inputs` replace the values of their wires.
    ///
    /// Every other wire keeps the value it has here.
    pub fn with_inputs(
        &self,
        inputs: impl IntoIterator<Item = (WireId, bool)>,
    ) -> Result<Network, Error> {
        let mut network = self.clone();

        for (wire_id, value) in inputs {
            network.wires.reset(wire_id)?;
            network.set_wire(wire_id, value)?;
        }

        Ok(network)
    }

    /// Whether some gate writes `wire_id`.
    pub fn is_driven(&self, wire_id: WireId) -> bool {
        self.gates.iter().any(|gate| gate.wire_c == wire_id)
    }

    fn driven_wire(&self, name: &str) -> Result<WireId, Error> {
        let wire_id = self
            .wire_id(name)
            .ok_or_else(|| Error::UnknownWire(name.to_owned()))?;

        if self.is_driven(wire_id) {
            Ok(wire_id)
        } else {
            Err(Error::NotDriven(name.to_owned()))
        }
    }

    fn display_name(&self, wire_id: WireId) -> String {
        self.wire_name(wire_id)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("#{wire_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Network {
        let mut network = Network::new();
        network.set_value("x00", true).unwrap();
        network.set_value("y00", false).unwrap();
        network.add_gate("x00", GateType::And, "y00", "z00");
        network.add_gate("x00", GateType::Xor, "y00", "z01");
        network
    }

    #[test]
    fn interns_names_once() {
        let mut network = sample();

        assert_eq!(network.wire_count(), 4);
        let x00 = network.wire("x00");
        assert_eq!(network.wire_id("x00"), Some(x00));
        assert_eq!(network.wire_name(x00), Some("x00"));
        assert_eq!(network.wire_count(), 4);
        assert_eq!(network.wire_id("nope"), None);
    }

    #[test]
    fn set_value_is_write_once() {
        let mut network = sample();

        assert_eq!(network.set_value("x00", true), Ok(()));
        assert_eq!(
            network.set_value("x00", false),
            Err(Error::DuplicateAssignment {
                wire: "x00".to_owned(),
                current: true,
                new: false
            })
        );
        assert_eq!(network.get_value("x00"), Some(true));
    }

    #[test]
    fn get_value_of_unresolved_or_unknown_is_none() {
        let network = sample();

        assert_eq!(network.get_value("z00"), None);
        assert_eq!(network.get_value("missing"), None);
        assert_eq!(network.unresolved_names(), vec!["z00", "z01"]);
    }

    #[test]
    fn gates_keep_declaration_order() {
        let network = sample();
        let described = network
            .gates()
            .iter()
            .map(|gate| network.describe(gate))
            .collect::<Vec<_>>();

        assert_eq!(described, vec!["x00 AND y00 -> z00", "x00 XOR y00 -> z01"]);
    }

    #[test]
    fn pending_gates_skip_resolved_outputs() {
        let mut network = sample();
        network.set_value("z00", false).unwrap();

        let pending = network
            .pending_gates()
            .map(|gate| network.describe(gate))
            .collect::<Vec<_>>();

        assert_eq!(pending, vec!["x00 XOR y00 -> z01"]);
    }

    #[test]
    fn swap_outputs_exchanges_drivers() {
        let mut network = sample();
        network.swap_outputs("z00", "z01").unwrap();

        let described = network
            .gates()
            .iter()
            .map(|gate| network.describe(gate))
            .collect::<Vec<_>>();
        assert_eq!(described, vec!["x00 AND y00 -> z01", "x00 XOR y00 -> z00"]);

        assert_eq!(
            network.swap_outputs("x00", "z00"),
            Err(Error::NotDriven("x00".to_owned()))
        );
        assert_eq!(
            network.swap_outputs("z00", "q"),
            Err(Error::UnknownWire("q".to_owned()))
        );
    }

    #[test]
    fn with_inputs_replaces_only_the_given_wires() {
        let mut network = sample();
        network.set_value("one", true).unwrap();
        let y00 = network.wire_id("y00").unwrap();

        let fresh = network.with_inputs([(y00, true)]).unwrap();

        assert_eq!(fresh.get_value("y00"), Some(true));
        // wires outside the inputs keep their value
        assert_eq!(fresh.get_value("x00"), Some(true));
        assert_eq!(fresh.get_value("one"), Some(true));
        assert_eq!(fresh.get_value("z00"), None);
        assert_eq!(fresh.gates(), network.gates());
        // the source network is untouched
        assert_eq!(network.get_value("y00"), Some(false));
    }

    #[test]
    fn is_driven_only_for_gate_outputs() {
        let network = sample();

        assert!(network.is_driven(network.wire_id("z00").unwrap()));
        assert!(!network.is_driven(network.wire_id("x00").unwrap()));
    }

    #[test]
    fn every_wire_is_valued_or_connected() {
        let mut network = sample();
        network.add_gate("z00", GateType::Or, "dangling", "z02");

        let connected = network
            .gates()
            .iter()
            .flat_map(|gate| [gate.wire_a, gate.wire_b, gate.wire_c])
            .collect::<std::collections::HashSet<_>>();

        for (index, (name, value)) in network.iter().enumerate() {
            assert!(
                value.is_some() || connected.contains(&WireId(index)),
                "{name} is neither valued nor connected"
            );
        }
    }

    #[test]
    fn foreign_wire_id_fails_every_strategy() {
        use crate::resolve::{ResolveError, Resolver, Strategy};

        let mut network = sample();
        network.gates.push(Gate::and(WireId(0), WireId(42), WireId(2)));

        for strategy in Strategy::ALL {
            let err = Resolver::new(network.clone())
                .with_strategy(strategy)
                .resolve()
                .expect_err("wire 42 was never issued");

            assert_eq!(
                err,
                ResolveError::Wire(WireError::WireNotFound(WireId(42))),
                "{strategy}"
            );
        }
    }

    #[test]
    fn counts_gates_per_type() {
        let count = sample().gate_count();
        assert_eq!((count.and, count.or, count.xor), (1, 0, 1));
    }
}
