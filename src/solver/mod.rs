//! Solving models.
//!
//! Every backend implements [`Solver`]: it takes a [`Model`] and returns either an
//! optimal assignment of 0/1 values to variable *names*, or reports infeasibility.
//!
//! - [`PbSolver`] solves in-process, on the BatSat SAT solver through RustSAT.
//! - [`Scip`] runs the external SCIP executable on an exported LP file and reads
//!   its log.

mod pb;
mod scip;

use std::collections::BTreeMap;

pub use pb::{PbConfig, PbSolver, PbStats};
pub use scip::{parse_scip_log, Scip, ScipConfig};

use crate::error::Result;
use crate::model::Model;

/// Values of a solution, keyed by variable name.
///
/// Variables that are absent are 0, which matches solvers that only report nonzeros.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Assignment {
    values: BTreeMap<String, bool>,
    objective: i64,
}

impl Assignment {
    pub fn new(values: BTreeMap<String, bool>, objective: i64) -> Self {
        Self { values, objective }
    }

    /// Builds an assignment from a full vector indexed like the model's variables.
    pub fn from_values(model: &Model, values: &[bool]) -> Self {
        let map = model.vars().map(|v| (model.var_name(v).to_string(), values[v.index()])).collect();
        Self::new(map, model.objective_value(values))
    }

    pub fn get(&self, name: &str) -> bool {
        self.values.get(name).copied().unwrap_or(false)
    }

    /// Names of the variables set to 1, in name order.
    pub fn ones(&self) -> impl Iterator<Item = &str> {
        self.values.iter().filter(|(_, &v)| v).map(|(name, _)| name.as_str())
    }

    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// Expands to a full vector over the model's variables.
    pub fn to_values(&self, model: &Model) -> Vec<bool> {
        model.vars().map(|v| self.get(model.var_name(v))).collect()
    }
}

/// Result of a solve.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    Optimal(Assignment),
    Infeasible,
}

impl Outcome {
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Outcome::Infeasible)
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            Outcome::Optimal(assignment) => Some(assignment),
            Outcome::Infeasible => None,
        }
    }
}

pub trait Solver {
    fn solve(&mut self, model: &Model) -> Result<Outcome>;
}

impl<S: Solver + ?Sized> Solver for &mut S {
    fn solve(&mut self, model: &Model) -> Result<Outcome> {
        (**self).solve(model)
    }
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn solve(&mut self, model: &Model) -> Result<Outcome> {
        (**self).solve(model)
    }
}
