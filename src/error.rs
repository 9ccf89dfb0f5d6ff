//! Error types.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::circuit::Connection;

/// Errors raised while validating input, building a model, or running a solver.
///
/// Infeasibility is *not* an error: solvers report it as
/// [`Outcome::Infeasible`][crate::solver::Outcome::Infeasible].
#[derive(Error, Debug)]
pub enum Error {
    /// Truth table length is not a power of two (or shorter than two rows).
    #[error("truth table length {0} is not a power of two >= 2")]
    TruthTableLength(usize),

    /// Truth table contains a character other than `0` or `1`.
    #[error("invalid character {ch:?} at position {pos} in truth table")]
    TruthTableChar { ch: char, pos: usize },

    /// Gate tag outside of `{NOT, NAND}`.
    #[error("unknown gate type: {0:?}")]
    UnknownGate(String),

    /// Decoded wiring refers to a missing input or gate, or points backwards.
    #[error("invalid connection: {0}")]
    InvalidConnection(Connection),

    /// Circuit without external inputs.
    #[error("circuit has no inputs")]
    NoInputs,

    /// Gate sequence has no gates.
    #[error("gate sequence is empty")]
    NoGates,

    /// Solver executable could not be started.
    #[error("solver executable not found: {}", .0.display())]
    SolverNotFound(PathBuf),

    /// Solver process terminated unsuccessfully.
    #[error("solver process failed: {0}")]
    SolverFailed(ExitStatus),

    /// Solver terminated but did not leave a solution log behind.
    #[error("solver log is missing: {}", .0.display())]
    MissingLog(PathBuf),

    /// Solver stopped without proving optimality or infeasibility, e.g. on a time limit.
    #[error("solver did not finish: {0}")]
    SolverIncomplete(String),

    /// The in-process optimizer gave up before proving optimality.
    #[error("SAT call limit of {0} exceeded")]
    CallLimit(u64),

    /// The in-process SAT backend reported an error.
    #[error("SAT backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
