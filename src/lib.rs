//! # muroga-rs: minimal-wiring NOT/NAND synthesis
//!
//! Given a Boolean function as a truth table and a fixed sequence of NOT/NAND gates,
//! **`muroga-rs`** finds a feed-forward wiring of exactly those gates that computes the
//! function with the fewest connections, or proves that none exists.
//!
//! The problem is encoded as a 0/1 integer linear program following Muroga's
//! gate-interconnection formulation, then handed to a [`Solver`][crate::solver::Solver].
//!
//! ## Key Features
//!
//! - **Exact**: every optimum of the model is a minimum-wiring circuit, and an
//!   infeasible model proves that the gate sequence cannot realize the function.
//! - **Two backends**: an in-process [`PbSolver`][crate::solver::PbSolver] (SAT-based)
//!   solver and the external [`Scip`][crate::solver::Scip] executable, fed through LP files.
//! - **1-Based Indexing**: inputs, gates and rows are 1-indexed, as are the variable
//!   names `u.e.k`, `v.i.k`, `p.k.j`, `r.i.k.j` in exported models.
//! - **Verifiable**: decoded circuits can be simulated and exported to Graphviz.
//!
//! ## Basic Usage
//!
//! ```rust
//! use muroga_rs::gate::parse_gates;
//! use muroga_rs::solver::PbSolver;
//! use muroga_rs::synth::synthesize;
//! use muroga_rs::truth::TruthTable;
//!
//! // f = x1 AND x2
//! let table: TruthTable = "0001".parse().unwrap();
//! let gates = parse_gates("NAND NOT").unwrap();
//!
//! let mut solver = PbSolver::default();
//! let circuit = synthesize(&table, &gates, &mut solver).unwrap().unwrap();
//!
//! assert_eq!(circuit.cost(), 3);
//! assert!(circuit.computes(&table));
//! ```
//!
//! ## Core Components
//!
//! - **[`encode`]**: builds the ILP ([`model`]) over the variable families of [`space`].
//! - **[`solver`]**: the [`Solver`][crate::solver::Solver] trait and its backends.
//! - **[`decode`]**: maps solutions (or raw SCIP logs) back to [`circuit`] connections.
//! - **[`lp`]** and **[`dot`]**: LP and Graphviz exports.

pub mod circuit;
pub mod decode;
pub mod dot;
pub mod encode;
pub mod error;
pub mod gate;
pub mod lp;
pub mod model;
pub mod solver;
pub mod space;
pub mod synth;
pub mod truth;
pub mod types;

pub use error::{Error, Result};
