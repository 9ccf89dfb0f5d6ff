//! Decoded circuits: wiring, validation and simulation.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::gate::GateType;
use crate::space::{ParseVarKindError, VarKind};
use crate::truth::{InputMatrix, TruthTable};

/// Where a connection comes from. Indices are 1-based.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Source {
    Input(usize),
    Gate(usize),
}

/// A wire from an external input or a gate output into gate `target` (1-based).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Connection {
    pub source: Source,
    pub target: usize,
}

// Constructors
impl Connection {
    pub const fn input(input: usize, gate: usize) -> Self {
        Self {
            source: Source::Input(input),
            target: gate,
        }
    }

    pub const fn gate(from: usize, to: usize) -> Self {
        Self {
            source: Source::Gate(from),
            target: to,
        }
    }

    /// Connection described by a `u` or `v` variable; `None` for auxiliary variables.
    pub fn from_kind(kind: VarKind) -> Option<Self> {
        match kind {
            VarKind::Input { input, gate } => Some(Connection::input(input, gate)),
            VarKind::Link { from, to } => Some(Connection::gate(from, to)),
            VarKind::Output { .. } | VarKind::Product { .. } => None,
        }
    }
}

impl Connection {
    /// `"input"` or `"gate"`.
    pub fn kind(&self) -> &'static str {
        match self.source {
            Source::Input(_) => "input",
            Source::Gate(_) => "gate",
        }
    }

    /// Name of the decision variable selecting this connection.
    pub fn var_name(&self) -> String {
        match self.source {
            Source::Input(e) => VarKind::Input {
                input: e,
                gate: self.target,
            },
            Source::Gate(i) => VarKind::Link { from: i, to: self.target },
        }
        .to_string()
    }
}

impl Display for Connection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.source {
            Source::Input(e) => write!(f, "Input {} connects to gate {}", e, self.target),
            Source::Gate(i) => write!(f, "Gate {} connects to gate {}", i, self.target),
        }
    }
}

impl FromStr for Connection {
    type Err = ParseVarKindError;

    /// Parses a variable name such as `u.1.2` or `v.1.3`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let kind: VarKind = s.parse()?;
        Connection::from_kind(kind).ok_or_else(|| ParseVarKindError(s.to_string()))
    }
}

/// A feed-forward network of NOT/NAND gates. The last gate is the output.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Circuit {
    num_inputs: usize,
    gates: Vec<GateType>,
    connections: Vec<Connection>,
}

impl Circuit {
    /// Creates a circuit, checking that every connection exists and points forward.
    ///
    /// Fan-in limits are *not* enforced here; see [`Circuit::respects_fan_in`].
    pub fn new(num_inputs: usize, gates: Vec<GateType>, connections: Vec<Connection>) -> Result<Self> {
        if num_inputs == 0 {
            return Err(Error::NoInputs);
        }
        if gates.is_empty() {
            return Err(Error::NoGates);
        }
        for &c in connections.iter() {
            let target_ok = (1..=gates.len()).contains(&c.target);
            let source_ok = match c.source {
                Source::Input(e) => (1..=num_inputs).contains(&e),
                Source::Gate(i) => i >= 1 && i < c.target,
            };
            if !target_ok || !source_ok {
                return Err(Error::InvalidConnection(c));
            }
        }
        Ok(Self {
            num_inputs,
            gates,
            connections,
        })
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn gates(&self) -> &[GateType] {
        &self.gates
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Number of wires, the quantity the model minimizes.
    pub fn cost(&self) -> usize {
        self.connections.len()
    }

    /// Sources feeding gate `k`.
    pub fn inputs_of(&self, k: usize) -> impl Iterator<Item = Source> + '_ {
        self.connections.iter().filter(move |c| c.target == k).map(|c| c.source)
    }

    pub fn fan_in(&self, k: usize) -> usize {
        self.inputs_of(k).count()
    }

    pub fn respects_fan_in(&self) -> bool {
        self.gates.iter().enumerate().all(|(i, g)| self.fan_in(i + 1) <= g.max_fan_in())
    }

    /// Outputs of all gates for one input assignment (`inputs[e - 1]` is `x_e`).
    pub fn eval_gates(&self, inputs: &[bool]) -> Vec<bool> {
        assert_eq!(inputs.len(), self.num_inputs, "Wrong number of inputs");
        let mut outputs: Vec<bool> = Vec::with_capacity(self.gates.len());
        for (index, gate) in self.gates.iter().enumerate() {
            let ones = self
                .inputs_of(index + 1)
                .filter(|&source| match source {
                    Source::Input(e) => inputs[e - 1],
                    Source::Gate(i) => outputs[i - 1],
                })
                .count();
            outputs.push(gate.eval(ones));
        }
        outputs
    }

    /// Output of the circuit (the last gate) for one input assignment.
    pub fn eval(&self, inputs: &[bool]) -> bool {
        let outputs = self.eval_gates(inputs);
        outputs[outputs.len() - 1]
    }

    /// Outputs over all `2^n` rows, in canonical row order.
    pub fn simulate(&self) -> Vec<bool> {
        InputMatrix::new(self.num_inputs).rows().map(|row| self.eval(row)).collect()
    }

    pub fn truth_table(&self) -> TruthTable {
        TruthTable::from_simulation(self.simulate())
    }

    pub fn computes(&self, table: &TruthTable) -> bool {
        table.num_inputs() == self.num_inputs && self.simulate() == table.bits()
    }
}

impl Display for Circuit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for c in self.connections.iter() {
            writeln!(f, "{}", c)?;
        }
        Ok(())
    }
}
