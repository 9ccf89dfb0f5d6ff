//! Mapping solutions back to wiring.
//!
//! Only connection indicators (`u.e.k`, `v.i.k`) carry information about the
//! circuit; output (`p`) and product (`r`) variables are implied by them.

use log::{debug, warn};

use crate::circuit::{Circuit, Connection};
use crate::encode::Encoding;
use crate::error::Result;
use crate::solver::{parse_scip_log, Assignment, Outcome};
use crate::space::VarKind;

/// Extracts the chosen connections from a SCIP solution log.
///
/// The log is read by [`parse_scip_log`]; the connections are its nonzero `u.e.k`
/// and `v.i.k` variables, inputs first. An infeasible log yields an empty list, an
/// inconclusive one is an error. Variable names that do not parse are skipped.
pub fn decode_log(text: &str) -> Result<Vec<Connection>> {
    let assignment = match parse_scip_log(text)? {
        Outcome::Optimal(assignment) => assignment,
        Outcome::Infeasible => return Ok(Vec::new()),
    };
    let mut kinds: Vec<VarKind> = assignment
        .ones()
        .filter_map(|name| match name.parse::<VarKind>() {
            Ok(kind) => Some(kind),
            Err(e) => {
                warn!("skipping solution line: {}", e);
                None
            }
        })
        .filter(VarKind::is_connection)
        .collect();
    kinds.sort();
    let connections: Vec<Connection> = kinds.into_iter().filter_map(Connection::from_kind).collect();
    debug!("decoded {} connections from log", connections.len());
    Ok(connections)
}

impl Encoding {
    /// Connections selected by an assignment, inputs first, in allocation order.
    pub fn decode(&self, assignment: &Assignment) -> Vec<Connection> {
        let model = self.model();
        let space = self.space();
        space
            .connections()
            .filter(|&var| assignment.get(model.var_name(var)))
            .filter_map(|var| Connection::from_kind(space.kind(var)))
            .collect()
    }

    /// The circuit selected by an assignment.
    pub fn circuit(&self, assignment: &Assignment) -> Result<Circuit> {
        Circuit::new(self.table().num_inputs(), self.gates().to_vec(), self.decode(assignment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use test_log::test;

    use crate::encode::encode;
    use crate::gate::parse_gates;
    use crate::truth::TruthTable;

    #[test]
    fn test_decode_log() {
        let log = "\
SCIP Status        : problem is solved [optimal solution found]
presolving:
objective value:                                    3
u.1.1                                               1 \t(obj:1)
u.2.1                                               1 \t(obj:1)
p.1.4                                               1 \t(obj:0)
v.1.2                                               1 \t(obj:1)
r.1.2.1                                             1 \t(obj:0)
";
        let connections = decode_log(log).unwrap();
        assert_eq!(
            connections,
            vec![Connection::input(1, 1), Connection::input(2, 1), Connection::gate(1, 2)]
        );
    }

    #[test]
    fn test_decode_infeasible_log() {
        let log = "SCIP Status        : problem is solved [infeasible]\n\nno solution available\n";
        assert!(decode_log(log).unwrap().is_empty());
    }

    #[test]
    fn test_decode_corrupt_log() {
        let log = "\
SCIP Status : problem is solved [optimal solution found]
objective value: 2
u.1.1 1 \t(obj:1)
(obj:1)
garbage u.1.2 1 (obj:1)
x.1.2 1 (obj:1)
v.2.1 1 (obj:1)
u.2.1 zero (obj:1)
u.2.2 0 (obj:1)
v.1.2 1 (obj:1)
u.1.3 1 (obj:1";
        assert_eq!(decode_log(log).unwrap(), vec![Connection::input(1, 1), Connection::gate(1, 2)]);
    }

    #[test]
    fn test_decode_orders_inputs_first() {
        let log = "\
SCIP Status : problem is solved [optimal solution found]
objective value: 4
v.2.10 1 (obj:1)
u.10.1 1 (obj:1)
u.2.1 1 (obj:1)
p.1.1 1 (obj:0)
";
        assert_eq!(
            decode_log(log).unwrap(),
            vec![Connection::input(2, 1), Connection::input(10, 1), Connection::gate(2, 10)]
        );
    }

    #[test]
    fn test_decode_interrupted_log() {
        let log = "SCIP Status : solving was interrupted [time limit reached]\n";
        assert!(matches!(decode_log(log), Err(crate::error::Error::SolverIncomplete(_))));
    }

    #[test]
    fn test_decode_assignment() {
        let table: TruthTable = "0001".parse().unwrap();
        let gates = parse_gates("NAND NOT").unwrap();
        let encoding = encode(&table, &gates).unwrap();

        let mut values = BTreeMap::new();
        for name in ["u.1.1", "u.2.1", "v.1.2", "p.1.1", "r.1.2.1"] {
            values.insert(name.to_string(), true);
        }
        values.insert("u.1.2".to_string(), false);
        let assignment = Assignment::new(values, 3);

        let connections = encoding.decode(&assignment);
        assert_eq!(
            connections,
            vec![Connection::input(1, 1), Connection::input(2, 1), Connection::gate(1, 2)]
        );

        let circuit = encoding.circuit(&assignment).unwrap();
        assert!(circuit.computes(&table));
    }
}
