//! Formula to DOT (Graphviz) conversion.
//!
//! This module renders the interned expression DAG in DOT format, which can be
//! visualized with Graphviz tools like `dot` or online viewers.
//!
//! # DOT Format
//!
//! The generated output follows these conventions:
//! - **Operator nodes** are squares labeled with the connective symbol
//!   (`∧`, `∨`, `→`, `¬`, `☐`, `◇`)
//! - **Atoms** (variables and constants) are rendered as plain text leaves
//! - **Root markers** are rectangles at the top (source rank) labeled with the
//!   full formula text
//! - Edges run parent to child; shared subformulas appear once, so the picture
//!   shows the DAG produced by interning rather than a duplicated parse tree
//!
//! # Examples
//!
//! ```
//! use kripke_rs::manager::ExprManager;
//!
//! let m = ExprManager::new();
//! let f = m.parse("box p -> ◇q").unwrap();
//!
//! let dot = m.to_dot(&[f]).unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! ```

use std::collections::HashSet;

use crate::manager::ExprManager;
use crate::node::Node;
use crate::reference::Ref;

/// Configuration options for DOT output generation.
///
/// Use `DotConfig::default()` for standard settings, or struct update syntax
/// to override individual fields.
///
/// # Examples
///
/// ```
/// use kripke_rs::dot::DotConfig;
/// use kripke_rs::manager::ExprManager;
///
/// let m = ExprManager::new();
/// let f = m.parse("p & q").unwrap();
///
/// let config = DotConfig {
///     splines: "line",
///     ..DotConfig::default()
/// };
///
/// let dot = m.to_dot_with_config(&[f], &config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for operator nodes (default: "square")
    pub node_shape: &'static str,
    /// Shape for variable and constant leaves (default: "plaintext")
    pub atom_shape: &'static str,
    /// Shape for root markers (default: "rect")
    pub root_shape: &'static str,
    /// Edge routing passed to Graphviz (default: "ortho")
    pub splines: &'static str,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "square",
            atom_shape: "plaintext",
            root_shape: "rect",
            splines: "ortho",
        }
    }
}

impl ExprManager {
    /// Converts formulas to DOT (Graphviz) format.
    ///
    /// Generates a DOT representation of the expression DAG rooted at the
    /// given formulas. Every subformula reachable from `roots` is included
    /// exactly once, with node identity given by the interning table, so
    /// structurally shared subtrees are drawn a single time with multiple
    /// incoming edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use kripke_rs::manager::ExprManager;
    ///
    /// let m = ExprManager::new();
    /// let f = m.parse("(p implies q) and ~p").unwrap();
    /// let g = m.parse("box p or p").unwrap();
    ///
    /// // Visualize both formulas together (p is drawn once).
    /// let dot = m.to_dot(&[f, g]).unwrap();
    /// assert!(dot.starts_with("digraph {"));
    /// ```
    pub fn to_dot(&self, roots: &[Ref]) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(roots, &DotConfig::default())
    }

    /// Converts formulas to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, roots: &[Ref], config: &DotConfig) -> Result<String, std::fmt::Error> {
        use std::fmt::Write as _;

        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "graph [splines={}];", config.splines)?;
        writeln!(dot, "node [shape={}];", config.node_shape)?;

        // Deduplicated reachable subformulas over all roots.
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for &root in roots.iter() {
            for sub in self.subexpressions(root) {
                if seen.insert(sub) {
                    order.push(sub);
                }
            }
        }

        for &sub in order.iter() {
            match self.node(sub) {
                Node::Var(name) => {
                    writeln!(
                        dot,
                        "{} [shape={}, label=\"{}\"];",
                        sub.index(),
                        config.atom_shape,
                        self.name(name)
                    )?;
                }
                Node::Const(value) => {
                    let label = if value { "⊤" } else { "⊥" };
                    writeln!(dot, "{} [shape={}, label=\"{}\"];", sub.index(), config.atom_shape, label)?;
                }
                Node::Not(_) => writeln!(dot, "{} [label=\"¬\"];", sub.index())?,
                Node::Box(_) => writeln!(dot, "{} [label=\"☐\"];", sub.index())?,
                Node::Diamond(_) => writeln!(dot, "{} [label=\"◇\"];", sub.index())?,
                Node::And(..) => writeln!(dot, "{} [label=\"∧\"];", sub.index())?,
                Node::Or(..) => writeln!(dot, "{} [label=\"∨\"];", sub.index())?,
                Node::Implies(..) => writeln!(dot, "{} [label=\"→\"];", sub.index())?,
            }
        }

        // Parent to child edges, left operand first.
        for &sub in order.iter() {
            for child in self.children(sub) {
                writeln!(dot, "{} -> {};", sub.index(), child.index())?;
            }
        }

        // Root markers at the top, labeled with the whole formula.
        writeln!(dot, "{{ rank=source")?;
        for (i, &root) in roots.iter().enumerate() {
            writeln!(dot, "r{} [shape={}, label=\"{}\"];", i, config.root_shape, self.to_text(root))?;
        }
        writeln!(dot, "}}")?;
        for (i, &root) in roots.iter().enumerate() {
            writeln!(dot, "r{} -> {};", i, root.index())?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
