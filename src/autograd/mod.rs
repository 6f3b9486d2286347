//! Autograd: define-by-run scalar computation graph with reverse-mode differentiation.
//!
//! A [`Graph`] is an arena of [`Node`]s addressed by [`NodeId`]. Builder functions
//! ([`Graph::add`], [`Graph::mul`], [`Graph::tanh`], ...) compute the forward value
//! eagerly and record the producing [`OpKind`] and operands. [`Graph::differentiate`]
//! then propagates gradients from a root to every ancestor in reverse topological
//! order.
//!
//! ```
//! use scalargrad::Graph;
//!
//! let mut g = Graph::new();
//! let a = g.leaf(2.0);
//! let b = g.leaf(-3.0);
//! let c = g.leaf(10.0);
//! let e = g.mul(a, b);
//! let f = g.add(e, c);
//! let root = g.mul(f, 2.0);
//! assert_eq!(g.value(root), 8.0);
//!
//! g.differentiate(root).unwrap();
//! assert_eq!(g.gradient(a), -6.0);
//! assert_eq!(g.gradient(b), 4.0);
//! ```

mod backward;
mod graph;
mod node;
mod op;
mod trace;

pub use graph::{Graph, Operand};
pub use node::{Node, NodeId};
pub use op::OpKind;
pub use trace::Trace;
