//! Decision variables of the gate-interconnection model.
//!
//! Four families of binary variables are allocated, all with 1-based indices:
//!
//! | name      | meaning                                          | range                         |
//! |-----------|--------------------------------------------------|-------------------------------|
//! | `u.e.k`   | external input `e` feeds gate `k`                | `e in 1..=n`, `k in 1..=R`    |
//! | `v.i.k`   | output of gate `i` feeds gate `k`                | `k in 1..=R`, `i in 1..k`     |
//! | `p.k.j`   | output of gate `k` on input row `j`              | `k in 1..R`, `j in 1..=2^n`   |
//! | `r.i.k.j` | `v.i.k AND p.i.j`                                | `k in 1..=R`, `i in 1..k`, `j`|
//!
//! `v.i.k` only exists for `i < k`, which is what makes every circuit feed-forward.
//! The last gate has no `p` variables: its output is compared directly against
//! the truth table.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::model::Model;
use crate::types::Var;

/// Family and indices of a model variable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum VarKind {
    /// `u.e.k`
    Input { input: usize, gate: usize },
    /// `v.i.k`
    Link { from: usize, to: usize },
    /// `p.k.j`
    Output { gate: usize, row: usize },
    /// `r.i.k.j`
    Product { from: usize, to: usize, row: usize },
}

impl VarKind {
    /// Whether the variable is a connection indicator, i.e. part of the objective.
    pub fn is_connection(&self) -> bool {
        matches!(self, VarKind::Input { .. } | VarKind::Link { .. })
    }
}

impl Display for VarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            VarKind::Input { input, gate } => write!(f, "u.{}.{}", input, gate),
            VarKind::Link { from, to } => write!(f, "v.{}.{}", from, to),
            VarKind::Output { gate, row } => write!(f, "p.{}.{}", gate, row),
            VarKind::Product { from, to, row } => write!(f, "r.{}.{}.{}", from, to, row),
        }
    }
}

/// Error returned when a string is not a well-formed variable name.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseVarKindError(pub String);

impl Display for ParseVarKindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed variable name: {:?}", self.0)
    }
}

impl std::error::Error for ParseVarKindError {}

impl FromStr for VarKind {
    type Err = ParseVarKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVarKindError(s.to_string());
        let mut parts = s.split('.');
        let family = parts.next().ok_or_else(err)?;
        let indices = parts
            .map(|part| part.parse::<usize>().ok().filter(|&i| i >= 1))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(err)?;
        match (family, indices.as_slice()) {
            ("u", &[input, gate]) => Ok(VarKind::Input { input, gate }),
            ("v", &[from, to]) if from < to => Ok(VarKind::Link { from, to }),
            ("p", &[gate, row]) => Ok(VarKind::Output { gate, row }),
            ("r", &[from, to, row]) if from < to => Ok(VarKind::Product { from, to, row }),
            _ => Err(err()),
        }
    }
}

/// All decision variables of one encoding, addressable by their 1-based indices.
#[derive(Debug, Clone)]
pub struct VariableSpace {
    num_inputs: usize,
    num_gates: usize,
    num_rows: usize,
    kinds: Vec<VarKind>,
    u: Vec<Var>,
    v: Vec<Var>,
    p: Vec<Var>,
    r: Vec<Var>,
}

/// Offset of the pair `(i, k)`, `1 <= i < k`, in a row-major lower triangle.
fn triangle(i: usize, k: usize) -> usize {
    (k - 1) * (k - 2) / 2 + (i - 1)
}

impl VariableSpace {
    /// Allocates every variable in `model`, family by family:
    /// `u` (by input, then gate), `v` (by gate, then source), `p` (by gate, then row),
    /// `r` (by gate, then source, then row).
    pub fn allocate(model: &mut Model, num_inputs: usize, num_gates: usize, num_rows: usize) -> Self {
        assert!(num_gates >= 1, "Number of gates must be >= 1");
        assert_eq!(model.num_vars(), 0, "Variable space must be allocated in an empty model");

        let mut kinds = Vec::new();
        let mut alloc = |kind: VarKind| -> Var {
            let var = model.add_var(kind.to_string());
            debug_assert_eq!(var.index(), kinds.len());
            kinds.push(kind);
            var
        };

        let mut u = Vec::with_capacity(num_inputs * num_gates);
        for input in 1..=num_inputs {
            for gate in 1..=num_gates {
                u.push(alloc(VarKind::Input { input, gate }));
            }
        }

        let mut v = Vec::with_capacity(num_gates * (num_gates - 1) / 2);
        for to in 1..=num_gates {
            for from in 1..to {
                v.push(alloc(VarKind::Link { from, to }));
            }
        }

        let mut p = Vec::with_capacity((num_gates - 1) * num_rows);
        for gate in 1..num_gates {
            for row in 1..=num_rows {
                p.push(alloc(VarKind::Output { gate, row }));
            }
        }

        let mut r = Vec::with_capacity(v.len() * num_rows);
        for to in 1..=num_gates {
            for from in 1..to {
                for row in 1..=num_rows {
                    r.push(alloc(VarKind::Product { from, to, row }));
                }
            }
        }

        log::debug!(
            "allocated {} variables: |u| = {}, |v| = {}, |p| = {}, |r| = {}",
            kinds.len(),
            u.len(),
            v.len(),
            p.len(),
            r.len()
        );

        Self {
            num_inputs,
            num_gates,
            num_rows,
            kinds,
            u,
            v,
            p,
            r,
        }
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_gates(&self) -> usize {
        self.num_gates
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn kind(&self, var: Var) -> VarKind {
        self.kinds[var.index()]
    }

    /// `u.e.k`: external input `e` feeds gate `k`.
    pub fn u(&self, e: usize, k: usize) -> Var {
        assert!((1..=self.num_inputs).contains(&e), "Input index {} out of range", e);
        assert!((1..=self.num_gates).contains(&k), "Gate index {} out of range", k);
        self.u[(e - 1) * self.num_gates + (k - 1)]
    }

    /// `v.i.k`: gate `i` feeds gate `k`.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= i < k <= R`: links never point backwards.
    pub fn v(&self, i: usize, k: usize) -> Var {
        assert!(i >= 1 && i < k && k <= self.num_gates, "No link variable v.{}.{}", i, k);
        self.v[triangle(i, k)]
    }

    /// `p.k.j`: output of gate `k` on row `j`.
    ///
    /// # Panics
    ///
    /// Panics for the last gate, which has no output variables.
    pub fn p(&self, k: usize, j: usize) -> Var {
        assert!(k >= 1 && k < self.num_gates, "No output variable p.{}.{}", k, j);
        assert!((1..=self.num_rows).contains(&j), "Row index {} out of range", j);
        self.p[(k - 1) * self.num_rows + (j - 1)]
    }

    /// `r.i.k.j`: product of `v.i.k` and `p.i.j`.
    pub fn r(&self, i: usize, k: usize, j: usize) -> Var {
        assert!(i >= 1 && i < k && k <= self.num_gates, "No product variable r.{}.{}.{}", i, k, j);
        assert!((1..=self.num_rows).contains(&j), "Row index {} out of range", j);
        self.r[triangle(i, k) * self.num_rows + (j - 1)]
    }

    /// Connection indicators (`u` then `v`), in allocation order.
    pub fn connections(&self) -> impl Iterator<Item = Var> + '_ {
        self.u.iter().chain(self.v.iter()).copied()
    }

    /// Incoming connection indicators of gate `k`.
    pub fn fan_in(&self, k: usize) -> impl Iterator<Item = Var> + '_ {
        (1..=self.num_inputs).map(move |e| self.u(e, k)).chain((1..k).map(move |i| self.v(i, k)))
    }
}
