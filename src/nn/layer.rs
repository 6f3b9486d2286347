use super::{Activation, Module, Neuron};
use crate::autograd::{Graph, NodeId};

/// Fully connected layer: one [`Neuron`] per output, followed by an [`Activation`].
#[derive(Clone, Debug)]
pub struct Linear {
    neurons: Vec<Neuron>,
    activation: Activation,
}

impl Linear {
    /// Builds a layer from row-major weights (`rows[j]` feeds output `j`).
    ///
    /// Neuron `j` gets label prefix `{j+1}_{label_prefix}`.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is empty, if rows differ in length, or if `biases` is
    /// given with a length other than `rows.len()`.
    pub fn from_weights(
        graph: &mut Graph,
        rows: &[Vec<f64>],
        biases: Option<&[f64]>,
        activation: Activation,
        label_prefix: &str,
    ) -> Self {
        assert!(!rows.is_empty(), "linear layer needs at least one output");
        let fan_in = rows[0].len();
        assert!(rows.iter().all(|r| r.len() == fan_in), "linear layer: ragged weight rows");
        if let Some(b) = biases {
            assert_eq!(b.len(), rows.len(), "linear layer: one bias per output");
        }
        let neurons = rows
            .iter()
            .enumerate()
            .map(|(j, row)| {
                let bias = biases.map(|b| b[j]);
                Neuron::from_weights(graph, row, bias, &format!("{}_{label_prefix}", j + 1))
            })
            .collect();
        Self { neurons, activation }
    }

    #[must_use]
    pub fn fan_in(&self) -> usize {
        self.neurons[0].fan_in()
    }

    #[must_use]
    pub fn fan_out(&self) -> usize {
        self.neurons.len()
    }

    /// One activated output per neuron, in neuron order.
    ///
    /// # Panics
    ///
    /// Panics if `x.len()` differs from [`fan_in`](Linear::fan_in).
    pub fn forward(&self, graph: &mut Graph, x: &[NodeId]) -> Vec<NodeId> {
        self.neurons
            .iter()
            .map(|n| {
                let pre = n.forward(graph, x);
                self.activation.apply(graph, pre)
            })
            .collect()
    }
}

impl Module for Linear {
    fn parameters(&self) -> Vec<NodeId> {
        self.neurons.iter().flat_map(Module::parameters).collect()
    }
}

/// Stack of [`Linear`] layers applied in order.
#[derive(Clone, Debug)]
pub struct Mlp {
    layers: Vec<Linear>,
}

impl Mlp {
    /// # Panics
    ///
    /// Panics if a layer's fan-in differs from the previous layer's fan-out.
    #[must_use]
    pub fn new(layers: Vec<Linear>) -> Self {
        for pair in layers.windows(2) {
            assert_eq!(pair[0].fan_out(), pair[1].fan_in(), "mlp: layer sizes do not chain");
        }
        Self { layers }
    }

    #[must_use]
    pub fn layers(&self) -> &[Linear] {
        &self.layers
    }

    /// Feeds `x` through every layer and returns the last layer's outputs.
    pub fn forward(&self, graph: &mut Graph, x: &[NodeId]) -> Vec<NodeId> {
        self.layers
            .iter()
            .fold(x.to_vec(), |h, layer| layer.forward(graph, &h))
    }
}

impl Module for Mlp {
    fn parameters(&self) -> Vec<NodeId> {
        self.layers.iter().flat_map(Module::parameters).collect()
    }
}
