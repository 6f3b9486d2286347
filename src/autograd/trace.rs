use std::collections::BTreeSet;

use super::graph::Graph;
use super::node::NodeId;
use crate::error::EngineError;

/// Reachable subgraph of a root, for visualizers and debugging.
///
/// Edges point from operand to consumer. A node used twice by the same consumer
/// (`a * a`) contributes a single edge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trace {
    pub nodes: BTreeSet<NodeId>,
    pub edges: BTreeSet<(NodeId, NodeId)>,
}

impl Graph {
    /// Collects every node reachable from `root` and the operand edges between them.
    ///
    /// Not used by [`differentiate`](Graph::differentiate).
    ///
    /// # Errors
    ///
    /// [`EngineError::ForeignNode`] if `root` belongs to another graph.
    pub fn trace(&self, root: NodeId) -> Result<Trace, EngineError> {
        self.check(root)?;

        let mut trace = Trace::default();
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if !trace.nodes.insert(id) {
                continue;
            }
            for &operand in &self.nodes[id.index].operands {
                trace.edges.insert((operand, id));
                pending.push(operand);
            }
        }
        Ok(trace)
    }
}
