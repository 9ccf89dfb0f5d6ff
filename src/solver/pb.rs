//! In-process 0/1 optimization on top of a SAT solver.
//!
//! Every linear row of the model becomes a RustSAT pseudo-Boolean constraint and is
//! encoded to CNF, then solved with BatSat. The objective is minimized by linear
//! search: after each model, the row `objective <= best - 1` is added and the
//! instance is solved again, until it becomes unsatisfiable.

use std::fmt::Display;

use log::debug;
use rustsat::instances::SatInstance;
use rustsat::solvers::{Solve, SolverResult};
use rustsat::types::constraints::PbConstraint;
use rustsat::types::{Lit, TernaryVal};
use rustsat_batsat::BasicSolver;

use crate::error::{Error, Result};
use crate::model::{LinExpr, Model, Sense};
use crate::solver::{Assignment, Outcome, Solver};

#[derive(Debug, Clone, Default)]
pub struct PbConfig {
    /// Give up with [`Error::CallLimit`] after this many SAT calls.
    pub call_limit: Option<u64>,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct PbStats {
    /// SAT calls, including the final unsatisfiable one.
    pub calls: u64,
    /// Improving solutions found.
    pub solutions: u64,
    /// Clauses handed to the SAT solver over all calls.
    pub clauses: u64,
}

#[derive(Debug, Default)]
pub struct PbSolver {
    config: PbConfig,
    stats: PbStats,
}

impl PbSolver {
    pub fn new(config: PbConfig) -> Self {
        Self {
            config,
            stats: PbStats::default(),
        }
    }

    /// Statistics of the most recent [`Solver::solve`] call.
    pub fn stats(&self) -> PbStats {
        self.stats
    }

    /// One SAT call over `rows`, plus `objective <= bound` if given.
    fn solve_once(&mut self, model: &Model, rows: &[(&LinExpr, Sense, i64)], bound: Option<i64>) -> Result<Option<Vec<bool>>> {
        let mut instance: SatInstance = SatInstance::new();
        let lits: Vec<Lit> = model.vars().map(|_| instance.new_lit()).collect();

        for &(lhs, sense, rhs) in rows.iter() {
            instance.add_pb_constr(pb_constraint(&lits, lhs, sense, rhs));
        }
        if let Some(bound) = bound {
            let objective = model.objective();
            instance.add_pb_constr(pb_constraint(&lits, objective, Sense::Le, bound - objective.constant()));
        }

        let (cnf, _) = instance.into_cnf();
        self.stats.calls += 1;
        self.stats.clauses += cnf.len() as u64;

        let mut solver = BasicSolver::default();
        solver.add_cnf(cnf).map_err(backend)?;
        match solver.solve().map_err(backend)? {
            SolverResult::Sat => {
                let mut values = Vec::with_capacity(lits.len());
                for &lit in lits.iter() {
                    values.push(solver.lit_val(lit).map_err(backend)? == TernaryVal::True);
                }
                Ok(Some(values))
            }
            SolverResult::Unsat => Ok(None),
            SolverResult::Interrupted => Err(Error::Backend("SAT solver was interrupted".to_string())),
        }
    }
}

impl Solver for PbSolver {
    fn solve(&mut self, model: &Model) -> Result<Outcome> {
        self.stats = PbStats::default();

        let mut rows = Vec::with_capacity(model.num_constraints());
        for (name, c) in model.constraints() {
            match triviality(c.lhs(), c.sense(), c.rhs()) {
                Some(true) => continue,
                Some(false) => {
                    debug!("constraint {} can never hold: infeasible", name);
                    return Ok(Outcome::Infeasible);
                }
                None => rows.push((c.lhs(), c.sense(), c.rhs())),
            }
        }

        let objective = model.objective();
        let (floor, _) = activity_range(objective);
        let floor = floor + objective.constant();

        let mut best: Option<(i64, Vec<bool>)> = None;
        loop {
            if let Some(limit) = self.config.call_limit {
                if self.stats.calls >= limit {
                    return Err(Error::CallLimit(limit));
                }
            }
            let bound = best.as_ref().map(|&(value, _)| value - 1);
            let Some(values) = self.solve_once(model, &rows, bound)? else {
                break;
            };
            let value = model.objective_value(&values);
            debug!("new incumbent with objective {}", value);
            self.stats.solutions += 1;
            best = Some((value, values));
            if value <= floor {
                break;
            }
        }

        debug!(
            "pseudo-Boolean search: {} SAT calls, {} improving solutions, {} clauses",
            self.stats.calls, self.stats.solutions, self.stats.clauses
        );

        Ok(match best {
            Some((objective, values)) => {
                debug!("optimal objective = {}", objective);
                Outcome::Optimal(Assignment::from_values(model, &values))
            }
            None => Outcome::Infeasible,
        })
    }
}

fn backend(e: impl Display) -> Error {
    Error::Backend(e.to_string())
}

fn pb_constraint(lits: &[Lit], lhs: &LinExpr, sense: Sense, rhs: i64) -> PbConstraint {
    let weighted = lhs.terms().iter().map(|&(var, coeff)| (lits[var.index()], coeff as isize));
    let b = rhs as isize;
    match sense {
        Sense::Le => PbConstraint::new_ub(weighted, b),
        Sense::Ge => PbConstraint::new_lb(weighted, b),
        Sense::Eq => PbConstraint::new_eq(weighted, b),
    }
}

/// Smallest and largest value of the variable part of `expr` over all 0/1 points.
fn activity_range(expr: &LinExpr) -> (i64, i64) {
    expr.terms().iter().fold((0, 0), |(lo, hi), &(_, coeff)| {
        if coeff < 0 {
            (lo + coeff, hi)
        } else {
            (lo, hi + coeff)
        }
    })
}

/// `Some(true)` if the row holds at every 0/1 point, `Some(false)` if at none,
/// `None` if it actually constrains the variables.
fn triviality(lhs: &LinExpr, sense: Sense, rhs: i64) -> Option<bool> {
    let (lo, hi) = activity_range(lhs);
    let (always, never) = match sense {
        Sense::Le => (hi <= rhs, lo > rhs),
        Sense::Ge => (lo >= rhs, hi < rhs),
        Sense::Eq => (lo == rhs && hi == rhs, rhs < lo || rhs > hi),
    };
    if never {
        Some(false)
    } else if always {
        Some(true)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::model::Constraint;

    fn constraint_triviality(c: &Constraint) -> Option<bool> {
        triviality(c.lhs(), c.sense(), c.rhs())
    }

    #[test]
    fn test_picks_cheapest_cover() {
        // Cover {a, b} with sets x = {a}, y = {b}, z = {a, b}, each of cost 1.
        let mut model = Model::new("cover");
        let x = model.add_var("x");
        let y = model.add_var("y");
        let z = model.add_var("z");
        model.set_objective(LinExpr::from(x) + y + z);
        model.add_constraint("a", (LinExpr::from(x) + z).geq(1));
        model.add_constraint("b", (LinExpr::from(y) + z).geq(1));

        let mut solver = PbSolver::default();
        let outcome = solver.solve(&model).unwrap();
        println!("outcome = {:?}, stats = {:?}", outcome, solver.stats());
        let assignment = outcome.assignment().unwrap();
        assert_eq!(assignment.objective(), 1);
        assert_eq!(assignment.ones().collect::<Vec<_>>(), vec!["z"]);
        // The last call proves that nothing cheaper exists.
        assert_eq!(solver.stats().calls, solver.stats().solutions + 1);
    }

    #[test]
    fn test_infeasible_by_search() {
        let mut model = Model::new("conflict");
        let x = model.add_var("x");
        model.set_objective(LinExpr::from(x));
        model.add_constraint("up", LinExpr::from(x).geq(1));
        model.add_constraint("down", LinExpr::from(x).leq(0));

        let mut solver = PbSolver::default();
        assert!(solver.solve(&model).unwrap().is_infeasible());
        assert_eq!(solver.stats().calls, 1);
        assert_eq!(solver.stats().solutions, 0);
    }

    #[test]
    fn test_pairwise_conflict() {
        // At most one of each pair, but at least two overall.
        let mut model = Model::new("pigeons");
        let vars: Vec<_> = (1..=3).map(|i| model.add_var(format!("x{}", i))).collect();
        let sum: LinExpr = vars.iter().copied().sum();
        model.set_objective(sum.clone());
        model.add_constraint("pair.12", (LinExpr::from(vars[0]) + vars[1]).leq(1));
        model.add_constraint("pair.13", (LinExpr::from(vars[0]) + vars[2]).leq(1));
        model.add_constraint("pair.23", (LinExpr::from(vars[1]) + vars[2]).leq(1));
        model.add_constraint("many", sum.geq(2));

        assert!(PbSolver::default().solve(&model).unwrap().is_infeasible());
    }

    #[test]
    fn test_trivially_violated_row_skips_sat() {
        let mut model = Model::new("short");
        let x = model.add_var("x");
        let y = model.add_var("y");
        model.set_objective(LinExpr::from(x) + y);
        model.add_constraint("three", (LinExpr::from(x) + y).geq(3));

        let mut solver = PbSolver::default();
        assert!(solver.solve(&model).unwrap().is_infeasible());
        assert_eq!(solver.stats().calls, 0);
    }

    #[test]
    fn test_empty_rows() {
        let mut model = Model::new("empty");
        let x = model.add_var("x");
        model.set_objective(LinExpr::from(x));
        model.add_constraint("zero", LinExpr::new().geq(0));
        let outcome = PbSolver::default().solve(&model).unwrap();
        assert_eq!(outcome.assignment().unwrap().objective(), 0);

        model.add_constraint("one", LinExpr::new().geq(1));
        assert!(PbSolver::default().solve(&model).unwrap().is_infeasible());
    }

    #[test]
    fn test_equality_and_negative_costs() {
        let mut model = Model::new("eq");
        let x = model.add_var("x");
        let y = model.add_var("y");
        let z = model.add_var("z");
        model.set_objective(LinExpr::term(x, -2) + y + LinExpr::term(z, -1));
        model.add_constraint("choose", (LinExpr::from(x) + y + z).equals(2));

        let outcome = PbSolver::default().solve(&model).unwrap();
        let assignment = outcome.assignment().unwrap();
        assert_eq!(assignment.objective(), -3);
        assert!(assignment.get("x"));
        assert!(!assignment.get("y"));
        assert!(assignment.get("z"));
        assert!(model.is_feasible(&assignment.to_values(&model)));
    }

    #[test]
    fn test_big_m_rows() {
        // p = 1 => x + y <= 0; p = 0 => x + y >= 1; with x + y >= 1 forced, p must be 0.
        let mut model = Model::new("big-m");
        let x = model.add_var("x");
        let y = model.add_var("y");
        let p = model.add_var("p");
        model.set_objective(LinExpr::from(x) + y + LinExpr::term(p, -5));
        model.add_constraint("on", (-(LinExpr::from(x) + y) + LinExpr::term(p, -3)).geq(-3));
        model.add_constraint("off", (LinExpr::from(x) + y + LinExpr::term(p, 3)).geq(1));
        model.add_constraint("need", (LinExpr::from(x) + y).geq(1));

        let outcome = PbSolver::default().solve(&model).unwrap();
        let assignment = outcome.assignment().unwrap();
        assert_eq!(assignment.objective(), 1);
        assert!(!assignment.get("p"));
    }

    #[test]
    fn test_call_limit() {
        let mut model = Model::new("wide");
        let vars: Vec<_> = (1..=6).map(|i| model.add_var(format!("x{}", i))).collect();
        model.set_objective(vars.iter().copied().sum());
        model.add_constraint("half", vars.iter().copied().sum::<LinExpr>().geq(3));

        // One call finds a solution but cannot prove it optimal.
        let mut solver = PbSolver::new(PbConfig { call_limit: Some(1) });
        assert!(matches!(solver.solve(&model), Err(Error::CallLimit(1))));
    }

    #[test]
    fn test_triviality() {
        let mut model = Model::new("rows");
        let x = model.add_var("x");
        let y = model.add_var("y");
        assert_eq!(constraint_triviality(&(LinExpr::from(x) + y).leq(2)), Some(true));
        assert_eq!(constraint_triviality(&(LinExpr::from(x) + y).geq(3)), Some(false));
        assert_eq!(constraint_triviality(&(LinExpr::from(x) - y).leq(-2)), Some(false));
        assert_eq!(constraint_triviality(&(LinExpr::from(x) + y).equals(1)), None);
        assert_eq!(constraint_triviality(&LinExpr::new().equals(0)), Some(true));
    }
}
