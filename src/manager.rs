use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::Debug;

use log::debug;

use crate::node::Node;
use crate::reference::Ref;
use crate::table::Table;
use crate::types::Name;

/// Lowercase spellings that [`ExprManager::mk_atom`] maps to the constants.
const TRUE_ATOMS: [&str; 3] = ["true", "1", "⊤"];
const FALSE_ATOMS: [&str; 3] = ["false", "0", "⊥"];

/// Configuration options for an [`ExprManager`].
///
/// Use `ManagerConfig::default()` for standard settings.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Initial number of interning buckets, as a power of two (default: 16).
    pub table_bits: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self { table_bits: 16 }
    }
}

struct NamePool {
    pool: Vec<String>,
    ids: HashMap<String, Name>,
}

impl NamePool {
    fn new() -> Self {
        Self {
            pool: Vec::new(),
            ids: HashMap::new(),
        }
    }

    fn intern(&mut self, name: &str) -> Name {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = Name::new(self.pool.len() as u32);
        self.pool.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }
}

/// The expression manager: a hash-consing factory for modal formulas.
///
/// All expressions are built through a manager, which owns the interning
/// table. Structurally equal constructions return the same [`Ref`], so
/// reference equality coincides with structural equality and shared
/// subexpressions are stored once.
///
/// Expressions live as long as their manager; nothing is ever deallocated.
/// The manager uses interior mutability, so factories take `&self`, but it
/// is not `Sync`: build expressions from one thread.
pub struct ExprManager {
    storage: RefCell<Table<Node>>,
    names: RefCell<NamePool>,
    /// The constant ⊤.
    pub top: Ref,
    /// The constant ⊥.
    pub bot: Ref,
}

impl ExprManager {
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::default())
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        let mut storage = Table::new(config.table_bits);

        // Intern the two constants eagerly so they get fixed indices.
        let top = Ref::new(storage.put(Node::Const(true)) as u32);
        let bot = Ref::new(storage.put(Node::Const(false)) as u32);

        Self {
            storage: RefCell::new(storage),
            names: RefCell::new(NamePool::new()),
            top,
            bot,
        }
    }
}

impl Default for ExprManager {
    fn default() -> Self {
        ExprManager::new()
    }
}

impl Debug for ExprManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage.borrow();
        f.debug_struct("ExprManager")
            .field("size", &storage.size())
            .field("capacity", &storage.capacity())
            .field("names", &self.names.borrow().pool.len())
            .finish()
    }
}

impl ExprManager {
    /// Get the number of distinct interned nodes.
    pub fn num_nodes(&self) -> usize {
        self.storage.borrow().size()
    }

    /// Get the node behind a reference.
    pub fn node(&self, e: Ref) -> Node {
        self.validate(e);
        *self.storage.borrow().value(e.index())
    }

    /// Get the spelling of an interned variable name.
    pub fn name(&self, name: Name) -> String {
        self.names.borrow().pool[name.index()].clone()
    }

    fn validate(&self, e: Ref) {
        let size = self.storage.borrow().size();
        assert!(
            e.index() >= 1 && e.index() <= size,
            "Reference {} does not belong to this manager",
            e
        );
    }

    fn mk(&self, node: Node) -> Ref {
        let i = self.storage.borrow_mut().put(node);
        debug!("mk({:?}) -> @{}", node, i);
        Ref::new(i as u32)
    }

    /// Create a propositional variable with the given spelling.
    ///
    /// The spelling is taken verbatim: `mk_var("true")` really is a variable
    /// named `true`. Use [`mk_atom`](Self::mk_atom) for the parser-facing
    /// behavior that canonicalizes constant spellings.
    pub fn mk_var(&self, name: &str) -> Ref {
        debug!("mk_var({:?})", name);
        let id = self.names.borrow_mut().intern(name);
        self.mk(Node::Var(id))
    }

    /// Get the constant `⊤` or `⊥`.
    pub fn mk_const(&self, value: bool) -> Ref {
        if value {
            self.top
        } else {
            self.bot
        }
    }

    /// Create a variable or constant from a name token.
    ///
    /// Spellings of the boolean constants (`true`, `1`, `⊤` and `false`, `0`,
    /// `⊥`, case-insensitive) produce the corresponding constant; anything
    /// else produces a variable with that exact spelling.
    pub fn mk_atom(&self, name: &str) -> Ref {
        let lower = name.to_lowercase();
        if TRUE_ATOMS.contains(&lower.as_str()) {
            self.top
        } else if FALSE_ATOMS.contains(&lower.as_str()) {
            self.bot
        } else {
            self.mk_var(name)
        }
    }

    /// Create the negation `¬e`.
    pub fn mk_not(&self, e: Ref) -> Ref {
        self.validate(e);
        self.mk(Node::Not(e))
    }

    /// Create the necessity `☐e`.
    pub fn mk_box(&self, e: Ref) -> Ref {
        self.validate(e);
        self.mk(Node::Box(e))
    }

    /// Create the possibility `◇e`.
    pub fn mk_diamond(&self, e: Ref) -> Ref {
        self.validate(e);
        self.mk(Node::Diamond(e))
    }

    /// Create the conjunction `lhs ∧ rhs`.
    pub fn mk_and(&self, lhs: Ref, rhs: Ref) -> Ref {
        self.validate(lhs);
        self.validate(rhs);
        self.mk(Node::And(lhs, rhs))
    }

    /// Create the disjunction `lhs ∨ rhs`.
    pub fn mk_or(&self, lhs: Ref, rhs: Ref) -> Ref {
        self.validate(lhs);
        self.validate(rhs);
        self.mk(Node::Or(lhs, rhs))
    }

    /// Create the implication `lhs → rhs`.
    pub fn mk_implies(&self, lhs: Ref, rhs: Ref) -> Ref {
        self.validate(lhs);
        self.validate(rhs);
        self.mk(Node::Implies(lhs, rhs))
    }

    /// Get the direct children of an expression, left to right.
    pub fn children(&self, e: Ref) -> Vec<Ref> {
        match self.node(e) {
            Node::Var(_) | Node::Const(_) => vec![],
            Node::Not(arg) | Node::Box(arg) | Node::Diamond(arg) => vec![arg],
            Node::And(lhs, rhs) | Node::Or(lhs, rhs) | Node::Implies(lhs, rhs) => vec![lhs, rhs],
        }
    }

    /// Get the nesting depth of the expression. Atoms have depth 0.
    pub fn depth(&self, e: Ref) -> usize {
        self.children(e)
            .into_iter()
            .map(|c| self.depth(c) + 1)
            .max()
            .unwrap_or(0)
    }

    /// Collect the names of all variables occurring in the expression.
    pub fn variables(&self, e: Ref) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        for sub in self.subexpressions(e) {
            if let Node::Var(name) = self.node(sub) {
                result.insert(self.name(name));
            }
        }
        result
    }

    /// Collect all distinct subexpressions, breadth-first from the root.
    ///
    /// Shared subexpressions appear once. The root itself is included and
    /// comes first.
    pub fn subexpressions(&self, e: Ref) -> Vec<Ref> {
        let mut visited = HashSet::new();
        let mut result = Vec::new();
        let mut queue = VecDeque::from([e]);

        while let Some(sub) = queue.pop_front() {
            if visited.insert(sub) {
                result.push(sub);
                queue.extend(self.children(sub));
            }
        }

        result
    }

    /// Get the number of distinct subexpressions of `e`.
    pub fn size(&self, e: Ref) -> usize {
        self.subexpressions(e).len()
    }

    /// Render the expression with the usual unicode connectives.
    ///
    /// Binary operations are always parenthesized, unary ones never, so the
    /// output is unambiguous and re-parseable: `(p ∧ ¬(q ∨ r))`.
    pub fn to_text(&self, e: Ref) -> String {
        match self.node(e) {
            Node::Var(name) => self.name(name),
            Node::Const(true) => "⊤".to_string(),
            Node::Const(false) => "⊥".to_string(),
            Node::Not(arg) => format!("¬{}", self.to_text(arg)),
            Node::Box(arg) => format!("☐{}", self.to_text(arg)),
            Node::Diamond(arg) => format!("◇{}", self.to_text(arg)),
            Node::And(lhs, rhs) => format!("({} ∧ {})", self.to_text(lhs), self.to_text(rhs)),
            Node::Or(lhs, rhs) => format!("({} ∨ {})", self.to_text(lhs), self.to_text(rhs)),
            Node::Implies(lhs, rhs) => format!("({} → {})", self.to_text(lhs), self.to_text(rhs)),
        }
    }

    /// Render the expression in constructor syntax, e.g. `And(Var(p), Const(⊤))`.
    pub fn to_repr(&self, e: Ref) -> String {
        match self.node(e) {
            Node::Var(name) => format!("Var({})", self.name(name)),
            Node::Const(true) => "Const(⊤)".to_string(),
            Node::Const(false) => "Const(⊥)".to_string(),
            Node::Not(arg) => format!("Not({})", self.to_repr(arg)),
            Node::Box(arg) => format!("Box({})", self.to_repr(arg)),
            Node::Diamond(arg) => format!("Diamond({})", self.to_repr(arg)),
            Node::And(lhs, rhs) => format!("And({}, {})", self.to_repr(lhs), self.to_repr(rhs)),
            Node::Or(lhs, rhs) => format!("Or({}, {})", self.to_repr(lhs), self.to_repr(rhs)),
            Node::Implies(lhs, rhs) => {
                format!("Implies({}, {})", self.to_repr(lhs), self.to_repr(rhs))
            }
        }
    }
}
