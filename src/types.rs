//! Type-safe wrappers for interned variable names and model worlds.
//!
//! This module provides newtype wrappers that enforce compile-time distinction
//! between name-pool indices and world indices, preventing common mistakes when
//! both are plain integers under the hood.

use std::fmt;

/// An interned variable name (0-indexed handle into the manager's name pool).
///
/// Names are assigned densely in first-use order by [`ExprManager`], so two
/// occurrences of the same spelling always carry the same `Name`.
///
/// # Invariants
///
/// - Name indices are dense and stable for the lifetime of their manager
/// - A `Name` is only meaningful together with the manager that produced it
///
/// [`ExprManager`]: crate::manager::ExprManager
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Name(u32);

impl Name {
    /// Creates a name handle from a raw pool index.
    pub const fn new(index: u32) -> Self {
        Name(index)
    }

    /// Returns the raw pool index as a `usize`.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw pool index as a `u32`.
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<Name> for usize {
    fn from(name: Name) -> Self {
        name.index()
    }
}

/// A world in a Kripke model (0-indexed).
///
/// Worlds are assigned densely in declaration order, which makes them directly
/// usable as bit positions in a [`WorldSet`].
///
/// [`WorldSet`]: crate::bitset::WorldSet
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct World(u32);

impl World {
    /// Creates a world handle from a raw index.
    pub const fn new(index: u32) -> Self {
        World(index)
    }

    /// Returns the raw index as a `usize`.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw index as a `u32`.
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl From<World> for usize {
    fn from(world: World) -> Self {
        world.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_creation() {
        let n0 = Name::new(0);
        let n1 = Name::new(1);
        assert_eq!(n0.index(), 0);
        assert_eq!(n1.index(), 1);
        assert!(n0 < n1);
    }

    #[test]
    fn test_world_creation() {
        let w0 = World::new(0);
        let w3 = World::new(3);
        assert_eq!(w0.index(), 0);
        assert_eq!(w3.index(), 3);
        assert!(w0 < w3);
        assert_eq!(w3.to_string(), "w3");
    }
}
