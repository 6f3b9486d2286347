use super::Module;
use crate::autograd::{Graph, NodeId};

/// Weighted sum of its inputs plus an optional bias: `b + Σ w_i * x_i`.
#[derive(Clone, Debug)]
pub struct Neuron {
    weights: Vec<NodeId>,
    bias: Option<NodeId>,
    label_prefix: String,
}

impl Neuron {
    /// Allocates one parameter leaf per weight (labelled `w1..wn`) and one for the
    /// bias (`w0`), each suffixed with `,{label_prefix}` when the prefix is non-empty.
    ///
    /// # Panics
    ///
    /// Panics if `weights` is empty.
    pub fn from_weights(graph: &mut Graph, weights: &[f64], bias: Option<f64>, label_prefix: &str) -> Self {
        assert!(!weights.is_empty(), "neuron needs at least one weight");
        let suffix = if label_prefix.is_empty() {
            String::new()
        } else {
            format!(",{label_prefix}")
        };
        let weights = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| graph.labeled_leaf(w, format!("w{}{suffix}", i + 1)))
            .collect();
        let bias = bias.map(|b| graph.labeled_leaf(b, format!("w0{suffix}")));
        Self {
            weights,
            bias,
            label_prefix: label_prefix.to_string(),
        }
    }

    /// Number of inputs this neuron expects.
    #[must_use]
    pub fn fan_in(&self) -> usize {
        self.weights.len()
    }

    /// Builds the pre-activation for `x`, labelled `a{label_prefix}`.
    ///
    /// # Panics
    ///
    /// Panics if `x.len()` differs from [`fan_in`](Neuron::fan_in).
    pub fn forward(&self, graph: &mut Graph, x: &[NodeId]) -> NodeId {
        assert_eq!(x.len(), self.weights.len(), "neuron: input length mismatch");
        let first = graph.mul(self.weights[0], x[0]);
        let mut acc = match self.bias {
            Some(b) => graph.add(b, first),
            None => first,
        };
        for (&w, &xi) in self.weights.iter().zip(x).skip(1) {
            let term = graph.mul(w, xi);
            acc = graph.add(acc, term);
        }
        graph.set_label(acc, format!("a{}", self.label_prefix));
        acc
    }
}

impl Module for Neuron {
    fn parameters(&self) -> Vec<NodeId> {
        self.weights.iter().copied().chain(self.bias).collect()
    }
}
