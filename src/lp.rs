//! Model to LP (CPLEX LP text format) conversion.
//!
//! The output is accepted by SCIP, CBC, HiGHS, Gurobi and CPLEX:
//!
//! ```text
//! \ circuit for logic function 0111 with gates NAND NAND
//! Minimize
//!  obj: u.1.1 + u.1.2 + ...
//! Subject To
//!  on.1.1: - 4 p.1.1 >= -5
//!  ...
//! Binaries
//!  u.1.1 u.1.2 ...
//! End
//! ```
//!
//! Rows are written in the order they were added, so encoding the same problem
//! twice yields byte-identical files.

use std::fmt::Write;

use crate::model::{LinExpr, Model};

/// Soft limit on the length of a line; longer expressions continue on the next line.
const LINE_WIDTH: usize = 200;

struct LineWriter<'a, W: Write> {
    out: &'a mut W,
    column: usize,
}

impl<'a, W: Write> LineWriter<'a, W> {
    fn new(out: &'a mut W) -> Self {
        Self { out, column: 0 }
    }

    fn push(&mut self, token: &str) -> std::fmt::Result {
        if self.column > 0 && self.column + token.len() > LINE_WIDTH {
            self.out.write_char('\n')?;
            self.column = 0;
        }
        self.out.write_str(token)?;
        self.column += token.len();
        Ok(())
    }

    fn end_line(&mut self) -> std::fmt::Result {
        self.out.write_char('\n')?;
        self.column = 0;
        Ok(())
    }
}

impl Model {
    /// Converts the model to LP format.
    pub fn to_lp(&self) -> Result<String, std::fmt::Error> {
        let mut lp = String::new();
        self.write_lp(&mut lp)?;
        Ok(lp)
    }

    /// Writes the model in LP format to `out`.
    pub fn write_lp<W: Write>(&self, out: &mut W) -> std::fmt::Result {
        if !self.name().is_empty() {
            writeln!(out, "\\ {}", self.name().replace('\n', " "))?;
        }

        writeln!(out, "Minimize")?;
        {
            let mut w = LineWriter::new(out);
            w.push(" obj:")?;
            self.write_expr(&mut w, self.objective())?;
            w.end_line()?;
        }

        writeln!(out, "Subject To")?;
        for (name, c) in self.constraints() {
            let mut w = LineWriter::new(out);
            w.push(&format!(" {}:", name))?;
            self.write_expr(&mut w, c.lhs())?;
            w.push(&format!(" {} {}", c.sense(), c.rhs()))?;
            w.end_line()?;
        }

        writeln!(out, "Binaries")?;
        {
            let mut w = LineWriter::new(out);
            for var in self.vars() {
                w.push(&format!(" {}", self.var_name(var)))?;
            }
            w.end_line()?;
        }

        writeln!(out, "End")?;
        Ok(())
    }

    fn write_expr<W: Write>(&self, w: &mut LineWriter<'_, W>, expr: &LinExpr) -> std::fmt::Result {
        if expr.is_empty() {
            // LP rows need at least one variable.
            if let Some(var) = self.vars().next() {
                w.push(&format!(" 0 {}", self.var_name(var)))?;
            }
            return Ok(());
        }
        for (index, &(var, coeff)) in expr.terms().iter().enumerate() {
            let sign = if coeff < 0 {
                "- "
            } else if index > 0 {
                "+ "
            } else {
                ""
            };
            let magnitude = coeff.unsigned_abs();
            let token = if magnitude == 1 {
                format!(" {}{}", sign, self.var_name(var))
            } else {
                format!(" {}{} {}", sign, magnitude, self.var_name(var))
            };
            w.push(&token)?;
        }
        Ok(())
    }
}
