//! # kripke-rs: Finite Kripke models and modal logic in Rust
//!
//! **`kripke-rs`** is a manager-centric library for parsing propositional modal-logic
//! formulas and evaluating them over **finite Kripke models**.
//! It is designed for teaching, model checking experiments, and quick semantic tooling.
//!
//! ## What is a Kripke model?
//!
//! A Kripke model is a triplet (W, R, V): a finite set of worlds, an accessibility
//! relation between them, and a valuation assigning each propositional variable the
//! set of worlds where it is true. A formula is evaluated to the **set of worlds**
//! where it holds; the modal operators `☐` (necessity) and `◇` (possibility)
//! quantify over a world's successors under R.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: All formulas are built through the
//!   [`ExprManager`][crate::manager::ExprManager]. Structurally identical
//!   subformulas are interned (hash consing), so equality of
//!   [`Ref`][crate::reference::Ref] handles is structural equality.
//! - **Forgiving Surface Syntax**: Every connective accepts several spellings,
//!   case-insensitively. `p -> q`, `p implies q` and `p → q` all parse to the
//!   same node.
//! - **Set-Based Semantics**: Evaluation computes one world set per subformula
//!   with plain set algebra. Worlds without successors satisfy every `☐` and
//!   no `◇`.
//! - **Batteries Included**: A loader for `.kripke` model files, a pedagogical
//!   evaluation trace, and Graphviz rendering of the formula DAG.
//!
//! ## Quick Start
//!
//! Add `kripke-rs` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! kripke-rs = "0.1"
//! ```
//!
//! ## Basic Usage
//!
//! ```rust
//! use kripke_rs::kripke::Kripke;
//! use kripke_rs::manager::ExprManager;
//!
//! // 1. Build a model: two worlds, one edge, p true in w2.
//! let mut model = Kripke::new();
//! model
//!     .add_worlds(["w1", "w2"])
//!     .add_trans("w1", "w2")
//!     .add_val("p", "w2");
//!
//! // 2. Parse a formula; any operator alias works.
//! let m = ExprManager::new();
//! let f = m.parse("box p").unwrap();
//!
//! // 3. Evaluate: w1 because its only successor satisfies p,
//! //    w2 because it has no successors at all.
//! let worlds = m.calc(f, &model);
//! assert_eq!(worlds, *model.worlds());
//!
//! // 4. Entailment is exact coverage of W.
//! assert!(m.entails(&model, f));
//! assert!(!m.entails(&model, m.parse("diamond p").unwrap()));
//! ```
//!
//! ## Core Components
//!
//! - **[`manager`]**: The heart of the library. Contains the
//!   [`ExprManager`][crate::manager::ExprManager] interning factory and the
//!   tree-walk accessors.
//! - **[`parser`]**: The operator-precedence formula parser.
//! - **[`kripke`]**: The model itself plus the `.kripke` file loader.
//! - **[`eval`]**: Set-based evaluation and entailment.
//! - **[`trace`]**: Step-by-step evaluation traces for teaching.
//! - **[`dot`]**: Utilities for visualizing formulas using Graphviz.

pub mod bitset;
pub mod dot;
pub mod eval;
pub mod kripke;
pub mod manager;
pub mod node;
pub mod parser;
pub mod reference;
pub mod table;
pub mod trace;
pub mod types;
pub mod utils;
