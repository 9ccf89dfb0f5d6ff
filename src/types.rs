//! Type-safe handles for model variables.
use std::fmt;

/// A model variable identifier (1-indexed).
///
/// Handles are issued by [`Model::add_var`][crate::model::Model::add_var] in
/// allocation order and are only meaningful for the model that issued them.
///
/// # Invariants
///
/// - Variable IDs must be >= 1
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Creates a new variable handle with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Variables must be 1-indexed.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Variable IDs must be >= 1");
        Var(id)
    }

    /// Returns the raw variable ID as a `u32`.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Returns the 0-based position of the variable in its model.
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Var::new(index as u32 + 1)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}
