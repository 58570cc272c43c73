//! Pedagogical evaluation traces.
//!
//! [`calc_trace`](ExprManager::calc_trace) mirrors [`calc`](ExprManager::calc)
//! but also renders every recursion step as an indented text block, one line
//! per subformula with the world set it produced. The CLI prints this under
//! `--stack`.

use crate::bitset::WorldSet;
use crate::kripke::Kripke;
use crate::manager::ExprManager;
use crate::node::Node;
use crate::reference::Ref;

impl ExprManager {
    /// Evaluate `e` like [`calc`](ExprManager::calc), additionally producing
    /// a human-readable trace of every step.
    ///
    /// Unlike `calc`, an implication here always evaluates its conclusion, so
    /// the trace shows both operands even when the premise holds nowhere. The
    /// returned world set is identical to `calc`'s.
    pub fn calc_trace(&self, e: Ref, model: &Kripke) -> (WorldSet, String) {
        self.trace_level(e, model, 0)
    }

    fn trace_level(&self, e: Ref, model: &Kripke, indent: usize) -> (WorldSet, String) {
        let ind = " ".repeat(indent);

        match self.node(e) {
            Node::Var(name) => {
                let res = model.valuation(&self.name(name));
                let text = format!(
                    "{}{} holds in {}",
                    ind,
                    self.name(name),
                    model.format_worlds(&res)
                );
                (res, text)
            }
            Node::Const(value) => {
                let res = if value {
                    model.worlds().clone()
                } else {
                    WorldSet::empty()
                };
                let symbol = if value { "⊤" } else { "⊥" };
                let text = format!("{}{} holds for {}", ind, symbol, model.format_worlds(&res));
                (res, text)
            }
            Node::Not(arg) => {
                let (inner, stack) = self.trace_level(arg, model, indent + 2);
                let res = model.worlds().difference(&inner);
                let text = format!("{}¬ returns {}\n{}", ind, model.format_worlds(&res), stack);
                (res, text)
            }
            Node::Diamond(arg) => {
                let (inner, stack) = self.trace_level(arg, model, indent + 2);
                let res: WorldSet = model
                    .worlds()
                    .iter()
                    .filter(|&w| model.successors(w).iter().any(|v| inner.contains(v)))
                    .collect();
                let text = format!("{}◇ returns {}\n{}", ind, model.format_worlds(&res), stack);
                (res, text)
            }
            Node::Box(arg) => {
                let (inner, stack) = self.trace_level(arg, model, indent + 4);
                let res: WorldSet = model
                    .worlds()
                    .iter()
                    .filter(|&w| model.successors(w).is_subset(&inner))
                    .collect();
                let blind = model.blind_worlds();
                let strict = res.difference(blind);
                let lines = [
                    format!("{}☐ returns {}", ind, model.format_worlds(&res)),
                    format!(
                        "{}- blind worlds, for which any box holds {}",
                        ind,
                        model.format_worlds(blind)
                    ),
                    format!(
                        "{}- worlds whose successors all satisfy the condition {}",
                        ind,
                        model.format_worlds(&strict)
                    ),
                    stack,
                ];
                (res, lines.join("\n"))
            }
            Node::And(lhs, rhs) => {
                let (lset, lstack) = self.trace_level(lhs, model, indent + 4);
                let (rset, rstack) = self.trace_level(rhs, model, indent + 4);
                let res = lset.intersection(&rset);
                let lines = [
                    format!("{}∧ returns {}", ind, model.format_worlds(&res)),
                    format!(
                        "{}- left  expression {} returns {}",
                        ind,
                        self.to_text(lhs),
                        model.format_worlds(&lset)
                    ),
                    lstack,
                    format!(
                        "{}- right expression {} returns {}",
                        ind,
                        self.to_text(rhs),
                        model.format_worlds(&rset)
                    ),
                    rstack,
                ];
                (res, lines.join("\n"))
            }
            Node::Or(lhs, rhs) => {
                let (lset, lstack) = self.trace_level(lhs, model, indent + 4);
                let (rset, rstack) = self.trace_level(rhs, model, indent + 4);
                let res = lset.union(&rset);
                let lines = [
                    format!("{}∨ returns {}", ind, model.format_worlds(&res)),
                    format!(
                        "{}- left  expression {} returns {}",
                        ind,
                        self.to_text(lhs),
                        model.format_worlds(&lset)
                    ),
                    lstack,
                    format!(
                        "{}- right expression {} returns {}",
                        ind,
                        self.to_text(rhs),
                        model.format_worlds(&rset)
                    ),
                    rstack,
                ];
                (res, lines.join("\n"))
            }
            Node::Implies(lhs, rhs) => {
                let (lset, lstack) = self.trace_level(lhs, model, indent + 4);
                let (rset, rstack) = self.trace_level(rhs, model, indent + 4);
                let failed = model.worlds().difference(&lset);
                let res = failed.union(&lset.intersection(&rset));
                let lines = [
                    format!("{}→ returns {}", ind, model.format_worlds(&res)),
                    format!("{}- premise fails in {}", ind, model.format_worlds(&failed)),
                    format!(
                        "{}- left  expression {} returns {}",
                        ind,
                        self.to_text(lhs),
                        model.format_worlds(&lset)
                    ),
                    lstack,
                    format!(
                        "{}- right expression {} returns {}",
                        ind,
                        self.to_text(rhs),
                        model.format_worlds(&rset)
                    ),
                    rstack,
                ];
                (res, lines.join("\n"))
            }
        }
    }
}
