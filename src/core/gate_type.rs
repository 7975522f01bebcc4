use std::{fmt, str::FromStr};

use serde::Serialize;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown gate operator {0:?}, expected one of AND, OR, XOR")]
    UnknownOperator(String),
}
pub type GateTypeError = Error;

/// The closed set of two-input gates a network may contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum GateType {
    And,
    Or,
    Xor,
}

impl GateType {
    pub const ALL: [GateType; 3] = [GateType::And, GateType::Or, GateType::Xor];

    pub fn f(&self) -> fn(bool, bool) -> bool {
        match self {
            GateType::And => |a, b| a & b,
            GateType::Or => |a, b| a | b,
            GateType::Xor => |a, b| a ^ b,
        }
    }

    pub const fn mnemonic(&self) -> &'static str {
        match self {
            GateType::And => "AND",
            GateType::Or => "OR",
            GateType::Xor => "XOR",
        }
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for GateType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GateType::ALL
            .into_iter()
            .find(|gate_type| gate_type.mnemonic() == s)
            .ok_or_else(|| Error::UnknownOperator(s.to_owned()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GateCount {
    pub and: usize,
    pub or: usize,
    pub xor: usize,
}

impl GateCount {
    pub fn handle(&mut self, gate_type: GateType) {
        match gate_type {
            GateType::And => self.and += 1,
            GateType::Or => self.or += 1,
            GateType::Xor => self.xor += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.and + self.or + self.xor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mnemonics() {
        assert_eq!("AND".parse::<GateType>(), Ok(GateType::And));
        assert_eq!("OR".parse::<GateType>(), Ok(GateType::Or));
        assert_eq!("XOR".parse::<GateType>(), Ok(GateType::Xor));
    }

    #[test]
    fn rejects_unknown_operator() {
        for op in ["NAND", "and", "", "XNOR"] {
            assert_eq!(
                op.parse::<GateType>(),
                Err(Error::UnknownOperator(op.to_owned())),
                "{op:?} must not parse"
            );
        }
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for gate_type in GateType::ALL {
            assert_eq!(gate_type.to_string().parse::<GateType>(), Ok(gate_type));
        }
    }

    #[test]
    fn gate_count_handles_each_type() {
        let mut count = GateCount::default();
        [GateType::And, GateType::Xor, GateType::Xor, GateType::Or]
            .into_iter()
            .for_each(|gate_type| count.handle(gate_type));

        assert_eq!(
            count,
            GateCount {
                and: 1,
                or: 1,
                xor: 2
            }
        );
        assert_eq!(count.total(), 4);
    }
}
