//! Finite-difference verification of analytic gradients.
//!
//! The function under test is given as a builder closure so that it can be
//! re-evaluated on fresh graphs at perturbed inputs.

use crate::autograd::{Graph, NodeId};
use crate::config::{ConfigError, GradCheckConfig};
use crate::error::EngineError;

/// Outcome of one [`GradCheck::check`] run, one entry per input.
#[derive(Clone, Debug, PartialEq)]
pub struct GradCheckReport {
    /// Gradients from [`Graph::differentiate`].
    pub analytic: Vec<f64>,
    /// Symmetric finite-difference estimates.
    pub numeric: Vec<f64>,
    /// Largest `|analytic - numeric|` over all inputs.
    pub max_error: f64,
    /// True when every input is within the configured tolerance.
    pub passed: bool,
}

/// Compares reverse-mode gradients against central differences.
#[derive(Clone, Debug)]
pub struct GradCheck {
    config: GradCheckConfig,
}

impl GradCheck {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` does not validate.
    pub fn new(config: GradCheckConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &GradCheckConfig {
        &self.config
    }

    /// Checks `build` at `inputs`.
    ///
    /// `build` receives a fresh graph and one leaf per input (same order) and
    /// returns the scalar root. It must build the same expression every call.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError`] from the backward pass.
    pub fn check<F>(&self, inputs: &[f64], build: F) -> Result<GradCheckReport, EngineError>
    where
        F: Fn(&mut Graph, &[NodeId]) -> NodeId,
    {
        let mut graph = Graph::new();
        let leaves: Vec<NodeId> = inputs.iter().map(|&v| graph.leaf(v)).collect();
        let root = build(&mut graph, &leaves);
        graph.differentiate(root)?;
        let analytic: Vec<f64> = leaves.iter().map(|&leaf| graph.gradient(leaf)).collect();

        let h = self.config.step;
        let numeric: Vec<f64> = (0..inputs.len())
            .map(|i| (evaluate(inputs, i, h, &build) - evaluate(inputs, i, -h, &build)) / (2.0 * h))
            .collect();

        let mut max_error = 0.0_f64;
        let mut passed = true;
        for (i, (&a, &n)) in analytic.iter().zip(&numeric).enumerate() {
            let error = (a - n).abs();
            max_error = max_error.max(error);
            if !(error <= self.config.tolerance * (1.0 + a.abs().max(n.abs()))) {
                log::debug!("gradcheck input {i}: analytic {a}, numeric {n}");
                passed = false;
            }
        }

        Ok(GradCheckReport {
            analytic,
            numeric,
            max_error,
            passed,
        })
    }
}

/// Forward value of `build` with input `index` shifted by `delta`.
fn evaluate<F>(inputs: &[f64], index: usize, delta: f64, build: &F) -> f64
where
    F: Fn(&mut Graph, &[NodeId]) -> NodeId,
{
    let mut graph = Graph::new();
    let leaves: Vec<NodeId> = inputs
        .iter()
        .enumerate()
        .map(|(i, &v)| graph.leaf(if i == index { v + delta } else { v }))
        .collect();
    let root = build(&mut graph, &leaves);
    graph.value(root)
}
