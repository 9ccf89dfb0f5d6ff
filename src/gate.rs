use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Gate types available for synthesis.
///
/// Each type carries an integer *marker* used by the constraint system:
/// `NOT -> 0`, `NAND -> -1`. A gate outputs 1 exactly when the number of its
/// connected inputs that are 1 does not exceed `-marker`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GateType {
    Not,
    Nand,
}

impl GateType {
    pub const fn marker(self) -> i64 {
        match self {
            GateType::Not => 0,
            GateType::Nand => -1,
        }
    }

    /// Upper bound on the number of incoming connections, `1 - marker`.
    pub const fn max_fan_in(self) -> usize {
        (1 - self.marker()) as usize
    }

    /// Output of the gate when `ones` of its connected inputs are 1.
    ///
    /// Mirrors the constraint semantics exactly: a NAND with fewer than two
    /// connections, or a NOT with none, is the constant 1.
    pub fn eval(self, ones: usize) -> bool {
        (ones as i64) + self.marker() <= 0
    }

    pub const fn name(self) -> &'static str {
        match self {
            GateType::Not => "NOT",
            GateType::Nand => "NAND",
        }
    }
}

impl Display for GateType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GateType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("NOT") {
            Ok(GateType::Not)
        } else if s.eq_ignore_ascii_case("NAND") {
            Ok(GateType::Nand)
        } else {
            Err(Error::UnknownGate(s.to_string()))
        }
    }
}

/// Parses a whitespace-separated gate sequence, e.g. `"NOT NAND NAND NAND"`.
///
/// Order is significant: gate `k` may only be fed by gates `1..k`.
pub fn parse_gates(s: &str) -> Result<Vec<GateType>> {
    let gates = s.split_whitespace().map(GateType::from_str).collect::<Result<Vec<_>>>()?;
    if gates.is_empty() {
        return Err(Error::NoGates);
    }
    Ok(gates)
}
