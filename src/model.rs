//! Binary integer linear programs.
//!
//! A [`Model`] holds named 0/1 variables, a linear objective to minimize, and a
//! list of named linear constraints with integer coefficients. Expressions are
//! built with ordinary arithmetic operators:
//!
//! ```
//! use muroga_rs::model::{LinExpr, Model};
//!
//! let mut model = Model::new("example");
//! let x = model.add_var("x");
//! let y = model.add_var("y");
//! model.set_objective(LinExpr::from(x) + y);
//! model.add_constraint("cover", (LinExpr::from(x) + y).geq(1));
//! model.add_constraint("link", (LinExpr::term(x, 2) - y).leq(1));
//!
//! assert!(model.is_feasible(&[true, true]));
//! assert!(!model.is_feasible(&[false, false]));
//! ```

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use crate::types::Var;

/// Linear expression `sum(coeff * var) + constant`.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct LinExpr {
    terms: Vec<(Var, i64)>,
    constant: i64,
}

// Constructors
impl LinExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_const(constant: i64) -> Self {
        Self {
            terms: Vec::new(),
            constant,
        }
    }

    pub fn term(var: Var, coeff: i64) -> Self {
        Self {
            terms: vec![(var, coeff)],
            constant: 0,
        }
    }
}

impl LinExpr {
    pub fn terms(&self) -> &[(Var, i64)] {
        &self.terms
    }

    pub fn constant(&self) -> i64 {
        self.constant
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn add_term(&mut self, var: Var, coeff: i64) {
        self.terms.push((var, coeff));
    }

    /// Merges repeated variables (keeping first-occurrence order) and drops zero coefficients.
    pub fn normalized(self) -> Self {
        let mut position: HashMap<Var, usize> = HashMap::new();
        let mut terms: Vec<(Var, i64)> = Vec::with_capacity(self.terms.len());
        for (var, coeff) in self.terms {
            match position.get(&var) {
                Some(&i) => terms[i].1 += coeff,
                None => {
                    position.insert(var, terms.len());
                    terms.push((var, coeff));
                }
            }
        }
        terms.retain(|&(_, coeff)| coeff != 0);
        Self {
            terms,
            constant: self.constant,
        }
    }

    /// Evaluates the expression under a full assignment.
    pub fn eval(&self, value: impl Fn(Var) -> bool) -> i64 {
        self.constant + self.terms.iter().filter(|&&(var, _)| value(var)).map(|&(_, coeff)| coeff).sum::<i64>()
    }

    pub fn leq(self, rhs: i64) -> Constraint {
        Constraint::new(self, Sense::Le, LinExpr::from_const(rhs))
    }

    pub fn geq(self, rhs: i64) -> Constraint {
        Constraint::new(self, Sense::Ge, LinExpr::from_const(rhs))
    }

    pub fn equals(self, rhs: i64) -> Constraint {
        Constraint::new(self, Sense::Eq, LinExpr::from_const(rhs))
    }
}

impl From<Var> for LinExpr {
    fn from(var: Var) -> Self {
        LinExpr::term(var, 1)
    }
}

impl From<i64> for LinExpr {
    fn from(constant: i64) -> Self {
        LinExpr::from_const(constant)
    }
}

impl Add for LinExpr {
    type Output = LinExpr;

    fn add(mut self, rhs: LinExpr) -> Self::Output {
        self += rhs;
        self
    }
}

impl Add<Var> for LinExpr {
    type Output = LinExpr;

    fn add(mut self, rhs: Var) -> Self::Output {
        self.add_term(rhs, 1);
        self
    }
}

impl Add<i64> for LinExpr {
    type Output = LinExpr;

    fn add(mut self, rhs: i64) -> Self::Output {
        self.constant += rhs;
        self
    }
}

impl AddAssign for LinExpr {
    fn add_assign(&mut self, rhs: LinExpr) {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl Sub for LinExpr {
    type Output = LinExpr;

    fn sub(self, rhs: LinExpr) -> Self::Output {
        self + (-rhs)
    }
}

impl Sub<Var> for LinExpr {
    type Output = LinExpr;

    fn sub(mut self, rhs: Var) -> Self::Output {
        self.add_term(rhs, -1);
        self
    }
}

impl Sub<i64> for LinExpr {
    type Output = LinExpr;

    fn sub(mut self, rhs: i64) -> Self::Output {
        self.constant -= rhs;
        self
    }
}

impl Neg for LinExpr {
    type Output = LinExpr;

    fn neg(self) -> Self::Output {
        self * -1i64
    }
}

impl Mul<i64> for LinExpr {
    type Output = LinExpr;

    fn mul(mut self, rhs: i64) -> Self::Output {
        for (_, coeff) in self.terms.iter_mut() {
            *coeff *= rhs;
        }
        self.constant *= rhs;
        self
    }
}

impl Mul<Var> for i64 {
    type Output = LinExpr;

    fn mul(self, rhs: Var) -> Self::Output {
        LinExpr::term(rhs, self)
    }
}

impl Mul<LinExpr> for i64 {
    type Output = LinExpr;

    fn mul(self, rhs: LinExpr) -> Self::Output {
        rhs * self
    }
}

impl Sum for LinExpr {
    fn sum<I: Iterator<Item = LinExpr>>(iter: I) -> Self {
        iter.fold(LinExpr::new(), |acc, e| acc + e)
    }
}

impl Sum<Var> for LinExpr {
    fn sum<I: Iterator<Item = Var>>(iter: I) -> Self {
        iter.fold(LinExpr::new(), |acc, v| acc + v)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

impl Display for Sense {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Sense::Le => "<=",
            Sense::Ge => ">=",
            Sense::Eq => "=",
        };
        write!(f, "{}", s)
    }
}

/// Linear constraint in normal form: variables on the left, a constant on the right.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Constraint {
    lhs: LinExpr,
    sense: Sense,
    rhs: i64,
}

impl Constraint {
    /// Builds `lhs <sense> rhs`, moving every variable to the left and every constant to the right.
    pub fn new(lhs: LinExpr, sense: Sense, rhs: LinExpr) -> Self {
        let diff = (lhs - rhs).normalized();
        let rhs = -diff.constant;
        let lhs = LinExpr {
            terms: diff.terms,
            constant: 0,
        };
        Self { lhs, sense, rhs }
    }

    pub fn lhs(&self) -> &LinExpr {
        &self.lhs
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    pub fn is_satisfied(&self, value: impl Fn(Var) -> bool) -> bool {
        let activity = self.lhs.eval(value);
        match self.sense {
            Sense::Le => activity <= self.rhs,
            Sense::Ge => activity >= self.rhs,
            Sense::Eq => activity == self.rhs,
        }
    }
}

/// Minimization model over binary variables.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    var_names: Vec<String>,
    by_name: HashMap<String, Var>,
    objective: LinExpr,
    constraints: Vec<(String, Constraint)>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_names: Vec::new(),
            by_name: HashMap::new(),
            objective: LinExpr::new(),
            constraints: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Allocates a new binary variable.
    ///
    /// # Panics
    ///
    /// Panics if a variable with the same name already exists.
    pub fn add_var(&mut self, name: impl Into<String>) -> Var {
        let name = name.into();
        let var = Var::from_index(self.var_names.len());
        let previous = self.by_name.insert(name.clone(), var);
        assert!(previous.is_none(), "Duplicate variable name: {}", name);
        self.var_names.push(name);
        var
    }

    pub fn num_vars(&self) -> usize {
        self.var_names.len()
    }

    pub fn vars(&self) -> impl Iterator<Item = Var> {
        (0..self.var_names.len()).map(Var::from_index)
    }

    pub fn var_name(&self, var: Var) -> &str {
        &self.var_names[var.index()]
    }

    pub fn var_by_name(&self, name: &str) -> Option<Var> {
        self.by_name.get(name).copied()
    }

    pub fn objective(&self) -> &LinExpr {
        &self.objective
    }

    pub fn set_objective(&mut self, objective: LinExpr) {
        self.objective = objective.normalized();
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, constraint: Constraint) {
        self.constraints.push((name.into(), constraint));
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.constraints.iter().map(|(name, c)| (name.as_str(), c))
    }

    /// Objective value of a full assignment indexed by [`Var::index`].
    pub fn objective_value(&self, values: &[bool]) -> i64 {
        self.objective.eval(|v| values[v.index()])
    }

    /// Name of the first constraint violated by a full assignment, if any.
    pub fn first_violated(&self, values: &[bool]) -> Option<&str> {
        self.constraints
            .iter()
            .find(|(_, c)| !c.is_satisfied(|v| values[v.index()]))
            .map(|(name, _)| name.as_str())
    }

    pub fn is_feasible(&self, values: &[bool]) -> bool {
        values.len() == self.num_vars() && self.first_violated(values).is_none()
    }
}
