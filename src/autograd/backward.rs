//! Reverse-mode differentiation over the arena.
//!
//! The pass runs in two phases. First every reachable node's adjoint for *this*
//! pass is computed in a scratch map, walking a depth-first post-order in reverse
//! so that a node is only expanded after all of its consumers have added their
//! contributions. Then the adjoints are added onto the stored gradients and the
//! root is reset to its seed of 1. A failing rule therefore leaves every gradient
//! as it was, and repeated passes add exactly one more derivative to each non-root
//! node instead of compounding earlier results.

use std::collections::{HashMap, HashSet};

use super::graph::Graph;
use super::node::NodeId;
use crate::error::EngineError;

impl Graph {
    /// Nodes reachable from `root`, each listed after all of its operands.
    ///
    /// Iterative depth-first post-order; operands are visited in the order the
    /// operation received them. `root` is always last.
    ///
    /// # Errors
    ///
    /// [`EngineError::ForeignNode`] if `root` belongs to another graph.
    pub fn topological_order(&self, root: NodeId) -> Result<Vec<NodeId>, EngineError> {
        self.check(root)?;

        let mut order = Vec::new();
        let mut visited = HashSet::new();
        // (node, operands already pushed)
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.push((id, true));
            for &operand in self.nodes[id.index].operands.iter().rev() {
                if !visited.contains(&operand) {
                    stack.push((operand, false));
                }
            }
        }

        Ok(order)
    }

    /// Adds d(`root`)/d(node) into the gradient of every node reachable from `root`.
    ///
    /// The root's gradient is set to 1. Every other reachable node accumulates:
    /// calling this twice without zeroing leaves it with twice its derivative. A
    /// node used by several consumers receives the sum of their contributions.
    /// Differentiating a leaf only sets its own gradient to 1.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ForeignNode`] if `root` belongs to another graph.
    /// - [`EngineError::Domain`] if a [`Pow`](super::OpKind::Pow) node with a node
    ///   exponent has a non-positive base. No gradient is modified in that case.
    pub fn differentiate(&mut self, root: NodeId) -> Result<(), EngineError> {
        let order = self.topological_order(root)?;
        log::debug!("backward from {root}: {} reachable nodes", order.len());

        let mut adjoints: HashMap<NodeId, f64> = HashMap::with_capacity(order.len());
        adjoints.insert(root, 1.0);

        for &id in order.iter().rev() {
            let node = &self.nodes[id.index];
            if node.is_leaf() {
                continue;
            }
            let upstream = adjoints.get(&id).copied().unwrap_or(0.0);
            let a = self.nodes[node.operands[0].index].value;
            let b = node.operands.get(1).map_or(0.0, |k| self.nodes[k.index].value);
            let local = node.op.local_gradients(id, a, b, node.value).inspect_err(|e| {
                log::debug!("backward from {root} aborted: {e}");
            })?;
            for (&operand, d) in node.operands.iter().zip(local) {
                *adjoints.entry(operand).or_insert(0.0) += d * upstream;
            }
        }

        for id in &order {
            if let Some(adjoint) = adjoints.get(id) {
                self.nodes[id.index].gradient += adjoint;
            }
        }
        self.nodes[root.index].gradient = 1.0;
        log::debug!("backward from {root} done");
        Ok(())
    }

    pub(crate) fn check(&self, id: NodeId) -> Result<(), EngineError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(EngineError::ForeignNode { node: id })
        }
    }
}
