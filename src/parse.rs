//! Text front end.
//!
//! ```text
//! x00: 1
//! y00: 0
//!
//! x00 AND y00 -> z00
//! ```
//!
//! Lines that match neither form are skipped with a warning; a single bad
//! line never fails the whole input.

use std::{fs, path::Path};

use log::{debug, warn};

use crate::{
    GateType,
    core::gate_type::GateTypeError,
    network::{Network, NetworkError},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read network description: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Network(#[from] NetworkError),
}
pub type ParseError = Error;

/// Why a line was skipped.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LineError {
    #[error("expected `<wire>: <0|1>` or `<wire> <OP> <wire> -> <wire>`")]
    Malformed,
    #[error("invalid wire name {0:?}")]
    InvalidWireName(String),
    #[error("invalid wire value {0:?}, expected 0 or 1")]
    InvalidValue(String),
    #[error(transparent)]
    Operator(#[from] GateTypeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based
    pub line: usize,
    pub reason: LineError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub assignments: usize,
    pub gates: usize,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'l> {
    Blank,
    Assignment(&'l str, bool),
    Gate {
        a: &'l str,
        gate_type: GateType,
        b: &'l str,
        out: &'l str,
    },
}

fn wire_name(name: &str) -> Result<&str, LineError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(name)
    } else {
        Err(LineError::InvalidWireName(name.to_owned()))
    }
}

fn parse_line(line: &str) -> Result<Line<'_>, LineError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Line::Blank);
    }

    if let Some((name, value)) = line.split_once(':') {
        let value = match value.trim() {
            "0" => false,
            "1" => true,
            other => return Err(LineError::InvalidValue(other.to_owned())),
        };
        return Ok(Line::Assignment(wire_name(name.trim())?, value));
    }

    match line.split_whitespace().collect::<Vec<_>>()[..] {
        [a, op, b, "->", out] => Ok(Line::Gate {
            a: wire_name(a)?,
            gate_type: op.parse()?,
            b: wire_name(b)?,
            out: wire_name(out)?,
        }),
        _ => Err(LineError::Malformed),
    }
}

/// Builds a network from its text description.
pub fn parse(input: &str) -> Result<(Network, ParseReport), Error> {
    let mut network = Network::new();
    let mut report = ParseReport::default();

    for (index, line) in input.lines().enumerate() {
        match parse_line(line) {
            Ok(Line::Blank) => {}
            Ok(Line::Assignment(name, value)) => {
                network.set_value(name, value)?;
                report.assignments += 1;
            }
            Ok(Line::Gate {
                a,
                gate_type,
                b,
                out,
            }) => {
                network.add_gate(a, gate_type, b, out);
                report.gates += 1;
            }
            Err(reason) => {
                warn!("parse: skipping line {}: {reason}: {line:?}", index + 1);
                report.skipped.push(SkippedLine {
                    line: index + 1,
                    reason,
                });
            }
        }
    }

    debug!(
        "parse: {} assignment(s), {} gate(s), {} skipped line(s)",
        report.assignments,
        report.gates,
        report.skipped.len()
    );

    Ok((network, report))
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<(Network, ParseReport), Error> {
    let input = fs::read_to_string(path.as_ref())?;
    parse(&input)
}
