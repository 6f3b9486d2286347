//! # scalargrad
//!
//! Scalar automatic differentiation: build a graph of elementary operations as they
//! run, then compute exact gradients of one scalar output with respect to every
//! node that fed into it.
//!
//! - [`autograd`] graph arena, operation rules and the backward pass.
//! - [`gradcheck`] finite-difference verification of analytic gradients.
//! - [`nn`] neurons, layers and MLPs as parameter containers over the graph.
//! - [`config`] settings for the gradient checker.

pub mod autograd;
pub mod config;
pub mod error;
pub mod gradcheck;
pub mod nn;

pub use autograd::{Graph, Node, NodeId, OpKind, Operand, Trace};
pub use error::EngineError;
