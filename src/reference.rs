use std::fmt::{Display, Formatter};

/// A lightweight handle to an interned expression node.
///
/// The handle is just an index into the manager's node table. Because nodes
/// are hash-consed, two structurally equal expressions built through the same
/// manager always compare equal as `Ref`s.
///
/// # Invariants
///
/// - The index is always >= 1 (0 is the table sentry)
/// - A `Ref` is only meaningful together with the manager that produced it
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ref(u32);

impl Ref {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the internal representation of the reference.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Return the index of the reference.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}
