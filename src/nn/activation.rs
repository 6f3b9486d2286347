use crate::autograd::{Graph, NodeId};

/// Nonlinearity applied to each neuron output of a [`Linear`](super::Linear) layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Activation {
    #[default]
    Identity,
    Tanh,
    Relu,
    Sigmoid,
}

impl Activation {
    /// Appends the nonlinearity to `x`; [`Identity`](Activation::Identity) returns `x` itself.
    pub fn apply(self, graph: &mut Graph, x: NodeId) -> NodeId {
        match self {
            Activation::Identity => x,
            Activation::Tanh => graph.tanh(x),
            Activation::Relu => graph.relu(x),
            Activation::Sigmoid => graph.sigmoid(x),
        }
    }
}
