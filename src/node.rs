use crate::reference::Ref;
use crate::types::Name;
use crate::utils::{pairing2, pairing3, MyHash};

/// One interned expression node.
///
/// Children are stored as [`Ref`] handles into the same table, so structurally
/// equal subexpressions are shared rather than duplicated.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Node {
    Var(Name),
    Const(bool),
    Not(Ref),
    Box(Ref),
    Diamond(Ref),
    And(Ref, Ref),
    Or(Ref, Ref),
    Implies(Ref, Ref),
}

impl Default for Node {
    fn default() -> Self {
        Node::Const(false)
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        match *self {
            Node::Var(name) => pairing2(0, name.id() as u64),
            Node::Const(value) => pairing2(1, value as u64),
            Node::Not(arg) => pairing2(2, arg.get() as u64),
            Node::Box(arg) => pairing2(3, arg.get() as u64),
            Node::Diamond(arg) => pairing2(4, arg.get() as u64),
            Node::And(lhs, rhs) => pairing3(5, lhs.get() as u64, rhs.get() as u64),
            Node::Or(lhs, rhs) => pairing3(6, lhs.get() as u64, rhs.get() as u64),
            Node::Implies(lhs, rhs) => pairing3(7, lhs.get() as u64, rhs.get() as u64),
        }
    }
}
