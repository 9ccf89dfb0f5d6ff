//! Muroga's gate-interconnection formulation.
//!
//! Given a truth table over `n` inputs and a sequence of `R` gates, [`encode`] builds
//! a 0/1 ILP whose feasible points are exactly the feed-forward wirings of those gates
//! that compute the table, and whose objective counts the wires.
//!
//! With `S(k,j) = sum_e x[j][e] * u.e.k + sum_{i<k} r.i.k.j` (the number of inputs of
//! gate `k` that are 1 on row `j`), `m_k` the marker of gate `k` and `A = n + R`:
//!
//! ```text
//! on.k.j     -S(k,j)           >= m_k - A*(1 - p.k.j)        k < R
//! off.k.j     S(k,j)           >= 1 - m_k - A*p.k.j           k < R
//! out.j      -S(R,j)           >= m_R                         f(j) = 1
//! out.j       S(R,j)           >= 1 - m_R                     f(j) = 0
//! rhi.i.k.j   p.i.j + v.i.k -  r.i.k.j <= 1
//! rlo.i.k.j   p.i.j + v.i.k - 2r.i.k.j >= 0
//! fanin.k     sum_e u.e.k + sum_i v.i.k <= 1 - m_k
//! ```
//!
//! The pair `on`/`off` is a big-M disjunction: exactly one side is binding,
//! depending on `p.k.j`, and the other is slack by construction of `A`.

use log::debug;

use crate::error::{Error, Result};
use crate::gate::GateType;
use crate::model::{Constraint, LinExpr, Model, Sense};
use crate::space::VariableSpace;
use crate::truth::{InputMatrix, TruthTable};

/// A complete model together with the variable space it was built over.
#[derive(Debug, Clone)]
pub struct Encoding {
    table: TruthTable,
    gates: Vec<GateType>,
    space: VariableSpace,
    model: Model,
    big_m: i64,
}

impl Encoding {
    pub fn table(&self) -> &TruthTable {
        &self.table
    }

    pub fn gates(&self) -> &[GateType] {
        &self.gates
    }

    pub fn space(&self) -> &VariableSpace {
        &self.space
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn big_m(&self) -> i64 {
        self.big_m
    }
}

/// Builds the ILP for realizing `table` with exactly the gates in `gates`, in order.
pub fn encode(table: &TruthTable, gates: &[GateType]) -> Result<Encoding> {
    if gates.is_empty() {
        return Err(Error::NoGates);
    }
    Ok(Encoder::new(table, gates).run())
}

/// Model-building context, owned by a single [`encode`] call.
struct Encoder<'a> {
    table: &'a TruthTable,
    gates: &'a [GateType],
    inputs: InputMatrix,
    space: VariableSpace,
    model: Model,
    big_m: i64,
}

impl<'a> Encoder<'a> {
    fn new(table: &'a TruthTable, gates: &'a [GateType]) -> Self {
        let n = table.num_inputs();
        let names: Vec<&str> = gates.iter().map(|g| g.name()).collect();
        let mut model = Model::new(format!("circuit for logic function {} with gates {}", table, names.join(" ")));
        let space = VariableSpace::allocate(&mut model, n, gates.len(), table.num_rows());
        Self {
            table,
            gates,
            inputs: table.inputs(),
            space,
            model,
            big_m: (n + gates.len()) as i64,
        }
    }

    fn run(mut self) -> Encoding {
        debug!("encode(table = {}, gates = {:?}, A = {})", self.table, self.gates, self.big_m);

        self.encode_objective();
        self.encode_gate_functions();
        self.encode_final_gate();
        self.encode_products();
        self.encode_fan_in();

        debug!(
            "encoded {} variables and {} constraints",
            self.model.num_vars(),
            self.model.num_constraints()
        );

        Encoding {
            table: self.table.clone(),
            gates: self.gates.to_vec(),
            space: self.space,
            model: self.model,
            big_m: self.big_m,
        }
    }

    fn num_gates(&self) -> usize {
        self.gates.len()
    }

    fn marker(&self, k: usize) -> i64 {
        self.gates[k - 1].marker()
    }

    /// `S(k,j)`: number of inputs of gate `k` that are 1 on row `j`.
    fn active_inputs(&self, k: usize, j: usize) -> LinExpr {
        let mut sum = LinExpr::new();
        for e in 1..=self.inputs.num_inputs() {
            if self.inputs.get(j, e) {
                sum.add_term(self.space.u(e, k), 1);
            }
        }
        for i in 1..k {
            sum.add_term(self.space.r(i, k, j), 1);
        }
        sum
    }

    fn encode_objective(&mut self) {
        let objective: LinExpr = self.space.connections().sum();
        self.model.set_objective(objective);
    }

    fn encode_gate_functions(&mut self) {
        let a = self.big_m;
        for k in 1..self.num_gates() {
            let m = self.marker(k);
            for j in 1..=self.inputs.num_rows() {
                let p = self.space.p(k, j);
                let sum = self.active_inputs(k, j);

                // p = 1  =>  S <= -m
                let on = Constraint::new(-sum.clone(), Sense::Ge, LinExpr::from_const(m - a) + a * p);
                self.model.add_constraint(format!("on.{}.{}", k, j), on);

                // p = 0  =>  S >= 1 - m
                let off = Constraint::new(sum, Sense::Ge, LinExpr::from_const(1 - m) - a * p);
                self.model.add_constraint(format!("off.{}.{}", k, j), off);
            }
        }
    }

    fn encode_final_gate(&mut self) {
        let last = self.num_gates();
        let m = self.marker(last);
        for j in 1..=self.inputs.num_rows() {
            let sum = self.active_inputs(last, j);
            let c = if self.table.output(j) {
                (-sum).geq(m)
            } else {
                sum.geq(1 - m)
            };
            self.model.add_constraint(format!("out.{}", j), c);
        }
    }

    fn encode_products(&mut self) {
        for k in 2..=self.num_gates() {
            for j in 1..=self.inputs.num_rows() {
                for i in 1..k {
                    let p = self.space.p(i, j);
                    let v = self.space.v(i, k);
                    let r = self.space.r(i, k, j);

                    let hi = (LinExpr::from(p) + v - r).leq(1);
                    self.model.add_constraint(format!("rhi.{}.{}.{}", i, k, j), hi);

                    let lo = (LinExpr::from(p) + v + LinExpr::term(r, -2)).geq(0);
                    self.model.add_constraint(format!("rlo.{}.{}.{}", i, k, j), lo);
                }
            }
        }
    }

    fn encode_fan_in(&mut self) {
        for k in 1..=self.num_gates() {
            let fan_in: LinExpr = self.space.fan_in(k).sum();
            let c = fan_in.leq(1 - self.marker(k));
            self.model.add_constraint(format!("fanin.{}", k), c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::gate::parse_gates;
    use crate::space::VarKind;

    fn encode_str(truth: &str, gates: &str) -> Encoding {
        let table: TruthTable = truth.parse().unwrap();
        let gates = parse_gates(gates).unwrap();
        encode(&table, &gates).unwrap()
    }

    fn constraint<'m>(model: &'m Model, name: &str) -> &'m Constraint {
        model
            .constraints()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| c)
            .unwrap_or_else(|| panic!("no constraint {}", name))
    }

    fn render(model: &Model, c: &Constraint) -> String {
        let lhs: Vec<String> = c.lhs().terms().iter().map(|&(v, a)| format!("{}*{}", a, model.var_name(v))).collect();
        format!("{} {} {}", lhs.join(" + "), c.sense(), c.rhs())
    }

    #[test]
    fn test_counts() {
        let enc = encode_str("01010011", "NOT NAND NAND NAND");
        let model = enc.model();
        assert_eq!(enc.big_m(), 7);
        assert_eq!(model.num_vars(), 12 + 6 + 24 + 48);
        // on/off: 2*3*8, out: 8, products: 2*6*8, fan-in: 4
        assert_eq!(model.num_constraints(), 48 + 8 + 96 + 4);
        assert_eq!(model.objective().terms().len(), 18);
    }

    #[test]
    fn test_gate_function_rows() {
        let enc = encode_str("01010011", "NOT NAND NAND NAND");
        let model = enc.model();

        // Row 2 is x1=1, x2=0, x3=0. Gate 1 is NOT (m = 0), A = 7.
        assert_eq!(render(model, constraint(model, "on.1.2")), "-1*u.1.1 + -7*p.1.2 >= -7");
        assert_eq!(render(model, constraint(model, "off.1.2")), "1*u.1.1 + 7*p.1.2 >= 1");

        // Gate 3 is NAND (m = -1); row 4 is x1=1, x2=1, x3=0.
        assert_eq!(
            render(model, constraint(model, "on.3.4")),
            "-1*u.1.3 + -1*u.2.3 + -1*r.1.3.4 + -1*r.2.3.4 + -7*p.3.4 >= -8"
        );
        assert_eq!(
            render(model, constraint(model, "off.3.4")),
            "1*u.1.3 + 1*u.2.3 + 1*r.1.3.4 + 1*r.2.3.4 + 7*p.3.4 >= 2"
        );
    }

    #[test]
    fn test_final_gate_rows() {
        let enc = encode_str("01010011", "NOT NAND NAND NAND");
        let model = enc.model();

        // f(1) = 0: all inputs zero, so only internal links contribute.
        assert_eq!(
            render(model, constraint(model, "out.1")),
            "1*r.1.4.1 + 1*r.2.4.1 + 1*r.3.4.1 >= 2"
        );
        // f(8) = 1
        assert_eq!(
            render(model, constraint(model, "out.8")),
            "-1*u.1.4 + -1*u.2.4 + -1*u.3.4 + -1*r.1.4.8 + -1*r.2.4.8 + -1*r.3.4.8 >= -1"
        );
    }

    #[test]
    fn test_final_gate_uses_its_own_marker() {
        // The last gate is NOT: the row must compare against marker 0, not the NAND before it.
        let enc = encode_str("0111", "NAND NOT");
        let model = enc.model();
        // f(1) = 0 => S >= 1
        assert_eq!(render(model, constraint(model, "out.1")), "1*r.1.2.1 >= 1");
        // f(4) = 1 => -S >= 0
        assert_eq!(render(model, constraint(model, "out.4")), "-1*u.1.2 + -1*u.2.2 + -1*r.1.2.4 >= 0");
    }

    #[test]
    fn test_product_and_fan_in_rows() {
        let enc = encode_str("01010011", "NOT NAND NAND NAND");
        let model = enc.model();
        assert_eq!(render(model, constraint(model, "rhi.1.2.5")), "1*p.1.5 + 1*v.1.2 + -1*r.1.2.5 <= 1");
        assert_eq!(render(model, constraint(model, "rlo.1.2.5")), "1*p.1.5 + 1*v.1.2 + -2*r.1.2.5 >= 0");
        assert_eq!(render(model, constraint(model, "fanin.1")), "1*u.1.1 + 1*u.2.1 + 1*u.3.1 <= 1");
        assert_eq!(
            render(model, constraint(model, "fanin.3")),
            "1*u.1.3 + 1*u.2.3 + 1*u.3.3 + 1*v.1.3 + 1*v.2.3 <= 2"
        );
    }

    #[test]
    fn test_links_never_point_backwards() {
        let enc = encode_str("0110100110010110", "NAND NAND NOT NAND NAND");
        let model = enc.model();
        for (_, c) in model.constraints() {
            for &(var, _) in c.lhs().terms() {
                match enc.space().kind(var) {
                    VarKind::Link { from, to } | VarKind::Product { from, to, .. } => assert!(from < to),
                    VarKind::Output { gate, .. } => assert!(gate < enc.gates().len()),
                    VarKind::Input { .. } => {}
                }
            }
        }
    }

    #[test]
    fn test_single_gate() {
        let enc = encode_str("10", "NOT");
        let model = enc.model();
        assert_eq!(model.num_vars(), 1);
        assert_eq!(model.num_constraints(), 2 + 1);
        // Row 1: x1 = 0, f = 1
        assert!(constraint(model, "out.1").lhs().is_empty());
    }

    #[test]
    fn test_no_gates() {
        let table: TruthTable = "01".parse().unwrap();
        assert!(matches!(encode(&table, &[]), Err(Error::NoGates)));
    }
}
