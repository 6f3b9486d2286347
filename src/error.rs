use thiserror::Error;

use crate::autograd::NodeId;

/// Errors raised by the graph builder and the backward pass.
///
/// Forward arithmetic is never checked: NaN and infinity flow through values and
/// gradients unchanged. The only arithmetic failure reported is the undefined
/// logarithm in the exponent derivative of [`OpKind::Pow`](crate::autograd::OpKind::Pow).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("node {node} does not belong to this graph")]
    ForeignNode { node: NodeId },

    #[error("ln undefined for base {base} while differentiating the exponent of {node}")]
    Domain { node: NodeId, base: f64 },
}
