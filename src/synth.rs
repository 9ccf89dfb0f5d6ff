//! End-to-end synthesis: encode, solve, decode.

use log::{debug, info};

use crate::circuit::{Circuit, Connection};
use crate::encode::encode;
use crate::error::Result;
use crate::gate::{parse_gates, GateType};
use crate::solver::{Outcome, Solver};
use crate::truth::TruthTable;

/// Finds a minimum-wiring circuit computing `table` with exactly the given gates.
///
/// Returns `Ok(None)` when no wiring of the gate sequence realizes the function.
pub fn synthesize<S: Solver + ?Sized>(table: &TruthTable, gates: &[GateType], solver: &mut S) -> Result<Option<Circuit>> {
    let encoding = encode(table, gates)?;
    info!(
        "solving {:?}: {} variables, {} constraints",
        encoding.model().name(),
        encoding.model().num_vars(),
        encoding.model().num_constraints()
    );

    let assignment = match solver.solve(encoding.model())? {
        Outcome::Optimal(assignment) => assignment,
        Outcome::Infeasible => {
            info!("no circuit with gates {:?} computes {}", gates, table);
            return Ok(None);
        }
    };

    let circuit = encoding.circuit(&assignment)?;
    debug!("decoded circuit with cost {}:\n{}", circuit.cost(), circuit);
    debug_assert!(circuit.computes(table));
    debug_assert!(circuit.respects_fan_in());
    Ok(Some(circuit))
}

/// String form of [`synthesize`]: `truth` is a `0`/`1` string and `gates` a
/// space-separated sequence such as `"NOT NAND NAND"`.
///
/// An infeasible instance yields an empty list.
pub fn solve_connections<S: Solver + ?Sized>(truth: &str, gates: &str, solver: &mut S) -> Result<Vec<Connection>> {
    let table: TruthTable = truth.parse()?;
    let gates = parse_gates(gates)?;
    Ok(synthesize(&table, &gates, solver)?
        .map(|circuit| circuit.connections().to_vec())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::error::Error;
    use crate::solver::PbSolver;

    #[test]
    fn test_and_with_trailing_not() {
        let mut solver = PbSolver::default();
        let connections = solve_connections("0001", "NAND NOT", &mut solver).unwrap();
        for c in connections.iter() {
            println!("{}", c);
        }
        assert_eq!(
            connections,
            vec![Connection::input(1, 1), Connection::input(2, 1), Connection::gate(1, 2)]
        );
    }

    #[test]
    fn test_infeasible_is_empty() {
        let mut solver = PbSolver::default();
        // XOR needs more than one gate.
        assert!(solve_connections("0110", "NAND", &mut solver).unwrap().is_empty());
        // A lone NAND on one input is constant 1.
        assert!(solve_connections("10", "NAND", &mut solver).unwrap().is_empty());
    }

    #[test]
    fn test_validation_errors() {
        let mut solver = PbSolver::default();
        assert!(matches!(
            solve_connections("010", "NAND", &mut solver),
            Err(Error::TruthTableLength(3))
        ));
        assert!(matches!(
            solve_connections("01", "NOR", &mut solver),
            Err(Error::UnknownGate(tag)) if tag == "NOR"
        ));
        assert!(matches!(solve_connections("01", "", &mut solver), Err(Error::NoGates)));
    }

    #[test]
    fn test_dyn_solver() {
        let mut solver: Box<dyn Solver> = Box::new(PbSolver::default());
        let table: TruthTable = "10".parse().unwrap();
        let circuit = synthesize(&table, &[GateType::Not], &mut solver).unwrap().unwrap();
        assert_eq!(circuit.connections(), &[Connection::input(1, 1)]);
    }
}
