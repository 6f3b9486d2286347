//! Arena-backed computation graph and its builder functions.

use std::ops::Index;
use std::sync::atomic::{AtomicU32, Ordering};

use super::node::{Node, NodeId};
use super::op::OpKind;

/// Tags handed to new graphs so that handles from another graph are rejected.
static NEXT_GRAPH_TAG: AtomicU32 = AtomicU32::new(0);

/// Argument to a builder function: an existing node or a plain number.
///
/// Numbers are promoted to fresh leaf nodes through [`Graph::leaf`] before the
/// operation runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand {
    Node(NodeId),
    Literal(f64),
}

impl From<NodeId> for Operand {
    fn from(id: NodeId) -> Self {
        Operand::Node(id)
    }
}

impl From<&NodeId> for Operand {
    fn from(id: &NodeId) -> Self {
        Operand::Node(*id)
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Literal(value)
    }
}

/// Define-by-run computation graph.
///
/// Each builder call evaluates its forward rule immediately and appends a new
/// node that remembers its operands. Nodes live as long as the graph; operands are
/// shared by index, so one node may feed any number of consumers.
///
/// All builder functions panic when handed a [`NodeId`] created by a different
/// graph, the same way slice indexing panics on a bad index.
#[derive(Debug)]
pub struct Graph {
    tag: u32,
    pub(crate) nodes: Vec<Node>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Creates an empty graph with its own tag.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty graph with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tag: NEXT_GRAPH_TAG.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of nodes allocated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if `id` was allocated by this graph.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.graph == self.tag && id.index < self.nodes.len()
    }

    /// Looks up a node, or `None` for a handle from another graph.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.graph == self.tag {
            self.nodes.get(id.index)
        } else {
            None
        }
    }

    /// # Panics
    ///
    /// Panics if `id` belongs to another graph.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self[id]
    }

    /// Forward value of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another graph.
    #[must_use]
    pub fn value(&self, id: NodeId) -> f64 {
        self[id].value
    }

    /// Accumulated gradient of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another graph.
    #[must_use]
    pub fn gradient(&self, id: NodeId) -> f64 {
        self[id].gradient
    }

    /// Overwrites the accumulated gradient of `id` (typically with 0 before a new pass).
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another graph.
    pub fn set_gradient(&mut self, id: NodeId, gradient: f64) {
        let index = self.slot(id);
        self.nodes[index].gradient = gradient;
    }

    /// Attaches a display name to `id`. Has no effect on the math.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another graph.
    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) {
        let index = self.slot(id);
        self.nodes[index].label = Some(label.into());
    }

    /// Iterates over every node in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        let tag = self.tag;
        self.nodes
            .iter()
            .enumerate()
            .map(move |(index, node)| (NodeId::new(tag, index), node))
    }

    /// Creates a leaf (input or parameter) holding `value`, with zero gradient.
    pub fn leaf(&mut self, value: f64) -> NodeId {
        self.push(Node::new(OpKind::Leaf.forward(value, 0.0), Vec::new(), OpKind::Leaf))
    }

    /// Creates a leaf with a display name.
    pub fn labeled_leaf(&mut self, value: f64, label: impl Into<String>) -> NodeId {
        let id = self.leaf(value);
        self.set_label(id, label);
        id
    }

    /// Resolves an operand to a node, promoting literals to leaves.
    ///
    /// # Panics
    ///
    /// Panics if the operand is a node from another graph.
    pub fn operand(&mut self, operand: impl Into<Operand>) -> NodeId {
        match operand.into() {
            Operand::Node(id) => {
                self.slot(id);
                id
            }
            Operand::Literal(value) => self.leaf(value),
        }
    }

    /// `a + b`
    pub fn add(&mut self, a: impl Into<Operand>, b: impl Into<Operand>) -> NodeId {
        self.binary(OpKind::Add, a, b)
    }

    /// `a * b`
    pub fn mul(&mut self, a: impl Into<Operand>, b: impl Into<Operand>) -> NodeId {
        self.binary(OpKind::Mul, a, b)
    }

    /// `a ** exponent`.
    ///
    /// A literal exponent is recorded as a constant ([`OpKind::PowConst`]) and
    /// receives no gradient. A node exponent ([`OpKind::Pow`]) is differentiated
    /// too, which requires a positive base at backward time.
    pub fn pow(&mut self, a: impl Into<Operand>, exponent: impl Into<Operand>) -> NodeId {
        match exponent.into() {
            Operand::Literal(k) => self.unary(OpKind::PowConst(k), a),
            Operand::Node(k) => self.binary(OpKind::Pow, a, k),
        }
    }

    /// `-a`, built as `a * -1`.
    pub fn neg(&mut self, a: impl Into<Operand>) -> NodeId {
        self.mul(a, -1.0)
    }

    /// `a - b`, built as `a + (-b)`.
    pub fn sub(&mut self, a: impl Into<Operand>, b: impl Into<Operand>) -> NodeId {
        let a = self.operand(a);
        let negated = self.neg(b);
        self.add(a, negated)
    }

    /// `a / b`, built as `a * b ** -1`.
    pub fn div(&mut self, a: impl Into<Operand>, b: impl Into<Operand>) -> NodeId {
        let a = self.operand(a);
        let reciprocal = self.pow(b, -1.0);
        self.mul(a, reciprocal)
    }

    /// `e ** a`
    pub fn exp(&mut self, a: impl Into<Operand>) -> NodeId {
        self.unary(OpKind::Exp, a)
    }

    /// Hyperbolic tangent; local gradient `1 - tanh²`.
    pub fn tanh(&mut self, a: impl Into<Operand>) -> NodeId {
        self.unary(OpKind::Tanh, a)
    }

    /// `max(0, a)`
    pub fn relu(&mut self, a: impl Into<Operand>) -> NodeId {
        self.unary(OpKind::Relu, a)
    }

    /// Logistic sigmoid `1 / (1 + e ** -a)`; local gradient `σ(1 - σ)`.
    pub fn sigmoid(&mut self, a: impl Into<Operand>) -> NodeId {
        self.unary(OpKind::Sigmoid, a)
    }

    /// Sums `terms` left to right; an empty slice yields a zero leaf.
    pub fn sum(&mut self, terms: &[NodeId]) -> NodeId {
        match terms.split_first() {
            None => self.leaf(0.0),
            Some((&first, rest)) => rest.iter().fold(self.operand(first), |acc, &t| self.add(acc, t)),
        }
    }

    fn unary(&mut self, op: OpKind, a: impl Into<Operand>) -> NodeId {
        let a = self.operand(a);
        let value = op.forward(self.nodes[a.index].value, 0.0);
        self.push(Node::new(value, vec![a], op))
    }

    fn binary(&mut self, op: OpKind, a: impl Into<Operand>, b: impl Into<Operand>) -> NodeId {
        let a = self.operand(a);
        let b = self.operand(b);
        let value = op.forward(self.nodes[a.index].value, self.nodes[b.index].value);
        self.push(Node::new(value, vec![a, b], op))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.tag, self.nodes.len());
        log::trace!("alloc {id} = {} {:?} -> {}", node.op, node.operands, node.value);
        self.nodes.push(node);
        id
    }

    /// Arena slot for `id`, panicking on foreign handles.
    fn slot(&self, id: NodeId) -> usize {
        assert!(self.contains(id), "node {id} does not belong to this graph");
        id.index
    }
}

impl Index<NodeId> for Graph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[self.slot(id)]
    }
}
