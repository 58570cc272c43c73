//! Set-based evaluation of formulas over a Kripke model.
//!
//! Evaluation computes, for a formula, the set of declared worlds where it
//! holds. Each connective is one set operation; the modal operators quantify
//! over a world's successors. Evaluation recurses over the expression tree
//! only, never over the relation graph, so cyclic models are fine.

use log::debug;

use crate::bitset::WorldSet;
use crate::kripke::Kripke;
use crate::manager::ExprManager;
use crate::node::Node;
use crate::reference::Ref;

impl ExprManager {
    /// Compute the set of worlds of `model` where `e` holds.
    ///
    /// The result is always a subset of the model's declared worlds. An
    /// unknown variable holds nowhere; a world without outgoing edges
    /// satisfies every `☐` and no `◇`.
    pub fn calc(&self, e: Ref, model: &Kripke) -> WorldSet {
        debug!("calc({})", e);

        match self.node(e) {
            Node::Var(name) => model.valuation(&self.name(name)),
            Node::Const(true) => model.worlds().clone(),
            Node::Const(false) => WorldSet::empty(),
            Node::Not(arg) => model.worlds().difference(&self.calc(arg, model)),
            Node::And(lhs, rhs) => self.calc(lhs, model).intersection(&self.calc(rhs, model)),
            Node::Or(lhs, rhs) => self.calc(lhs, model).union(&self.calc(rhs, model)),
            Node::Implies(lhs, rhs) => {
                let premise = self.calc(lhs, model);
                if premise.is_empty() {
                    // Vacuously true everywhere; the conclusion cannot matter.
                    return model.worlds().clone();
                }
                let failed = model.worlds().difference(&premise);
                failed.union(&premise.intersection(&self.calc(rhs, model)))
            }
            Node::Box(arg) => {
                let inner = self.calc(arg, model);
                model
                    .worlds()
                    .iter()
                    .filter(|&w| model.successors(w).is_subset(&inner))
                    .collect()
            }
            Node::Diamond(arg) => {
                let inner = self.calc(arg, model);
                model
                    .worlds()
                    .iter()
                    .filter(|&w| model.successors(w).iter().any(|v| inner.contains(v)))
                    .collect()
            }
        }
    }

    /// Whether `model ⊨ e`: the formula holds in every declared world.
    ///
    /// Checked as exact set equality between `calc(e)` and the world set,
    /// not mere non-emptiness.
    pub fn entails(&self, model: &Kripke, e: Ref) -> bool {
        let result = self.calc(e, model);
        let holds = &result == model.worlds();
        debug!("entails({}) = {}", self.to_text(e), holds);
        holds
    }
}
