//! Parameter containers built on top of the graph.
//!
//! A [`Module`] owns leaf nodes designated as trainable parameters and exposes them
//! as one flat, ordered list. Modules do not update parameters themselves: node
//! values are immutable, so a training step reads `(value, gradient)` pairs with
//! [`Module::snapshot`] and rebuilds the module from the updated weights in a
//! fresh [`Graph`].

mod activation;
mod layer;
mod neuron;

pub use activation::Activation;
pub use layer::{Linear, Mlp};
pub use neuron::Neuron;

use crate::autograd::{Graph, NodeId};

/// Something that holds trainable parameters.
pub trait Module {
    /// Parameter leaves in a stable order.
    fn parameters(&self) -> Vec<NodeId>;

    /// Sets every parameter's gradient to 0.
    fn zero_grad(&self, graph: &mut Graph) {
        for p in self.parameters() {
            graph.set_gradient(p, 0.0);
        }
    }

    /// `(value, gradient)` of every parameter, in [`parameters`](Module::parameters) order.
    fn snapshot(&self, graph: &Graph) -> Vec<(f64, f64)> {
        self.parameters()
            .into_iter()
            .map(|p| (graph.value(p), graph.gradient(p)))
            .collect()
    }
}
