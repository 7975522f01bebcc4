use std::fmt;

use crate::{GateType, WireId, Wires, core::wire::WireError};

/// A two-input gate driving a single output wire.
///
/// Gates are plain immutable records: the network decides when a gate is
/// ready, the gate only knows how to combine two input values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Gate {
    pub gate_type: GateType,
    pub wire_a: WireId,
    pub wire_b: WireId,
    pub wire_c: WireId,
}

impl Gate {
    pub fn new(gate_type: GateType, wire_a: WireId, wire_b: WireId, wire_c: WireId) -> Self {
        Self {
            gate_type,
            wire_a,
            wire_b,
            wire_c,
        }
    }

    pub fn and(wire_a: WireId, wire_b: WireId, wire_c: WireId) -> Self {
        Self::new(GateType::And, wire_a, wire_b, wire_c)
    }

    pub fn or(wire_a: WireId, wire_b: WireId, wire_c: WireId) -> Self {
        Self::new(GateType::Or, wire_a, wire_b, wire_c)
    }

    pub fn xor(wire_a: WireId, wire_b: WireId, wire_c: WireId) -> Self {
        Self::new(GateType::Xor, wire_a, wire_b, wire_c)
    }

    pub fn inputs(&self) -> [WireId; 2] {
        [self.wire_a, self.wire_b]
    }

    pub fn execute(&self, a: bool, b: bool) -> bool {
        self.gate_type.f()(a, b)
    }

    /// Input values of the gate, if both of them are known.
    pub fn ready_inputs(&self, wires: &Wires) -> Result<Option<(bool, bool)>, WireError> {
        Ok(wires.get(self.wire_a)?.zip(wires.get(self.wire_b)?))
    }

    /// Computes the output value if the gate is ready.
    pub fn evaluate(&self, wires: &Wires) -> Result<Option<bool>, WireError> {
        Ok(self
            .ready_inputs(wires)?
            .map(|(a, b)| self.execute(a, b)))
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -> {}",
            self.wire_a, self.gate_type, self.wire_b, self.wire_c
        )
    }
}
