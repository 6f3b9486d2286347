//! Node identity and per-node state stored in the [`Graph`](super::Graph) arena.

use std::fmt;

use super::op::OpKind;

/// Stable handle to a node inside one [`Graph`](super::Graph).
///
/// Carries the owning graph's tag next to the arena slot, so a handle can be
/// checked against the graph it is used with. Ordering is by graph, then by
/// slot; within one graph that is construction order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub(crate) graph: u32,
    pub(crate) index: usize,
}

impl NodeId {
    pub(crate) fn new(graph: u32, index: usize) -> Self {
        Self { graph, index }
    }

    /// Arena slot of this node.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.index)
    }
}

/// One scalar in the computation graph: forward value, accumulated gradient,
/// and provenance (producing operation plus operands).
#[derive(Clone, Debug)]
pub struct Node {
    /// Forward value; fixed at construction.
    pub(crate) value: f64,
    /// d(root)/d(self), summed over every backward pass that reached this node.
    pub(crate) gradient: f64,
    /// Zero, one or two operands, in the order the operation received them.
    pub(crate) operands: Vec<NodeId>,
    pub(crate) op: OpKind,
    pub(crate) label: Option<String>,
}

impl Node {
    pub(crate) fn new(value: f64, operands: Vec<NodeId>, op: OpKind) -> Self {
        Self {
            value,
            gradient: 0.0,
            operands,
            op,
            label: None,
        }
    }

    /// Forward pass value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Accumulated gradient; exactly 0 until a backward pass reaches this node.
    #[must_use]
    pub fn gradient(&self) -> f64 {
        self.gradient
    }

    /// Operands in the order the operation received them; empty for leaves.
    #[must_use]
    pub fn operands(&self) -> &[NodeId] {
        &self.operands
    }

    /// Operation that produced this node ([`OpKind::Leaf`] for inputs).
    #[must_use]
    pub fn op(&self) -> OpKind {
        self.op
    }

    /// Debugging name, if one was set.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// True for inputs and parameters (no operands).
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.operands.is_empty()
    }
}
