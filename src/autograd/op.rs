//! Closed set of elementary operations with their forward and local-backward rules.
//!
//! Every node records one [`OpKind`]. The backward pass never stores a callable per
//! node; it dispatches on the tag and asks for the local partial derivatives of the
//! node with respect to each operand, then scales them by the upstream gradient.
//!
//! Composite operations (`neg`, `sub`, `div`) have no tag of their own: the graph
//! builder expresses them with the primitives below, so their gradients come from
//! the primitive rules.

use std::fmt;

use super::node::NodeId;
use crate::error::EngineError;

/// Operation that produced a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OpKind {
    /// Input or parameter; no operands.
    Leaf,
    /// `a + b`
    Add,
    /// `a * b`
    Mul,
    /// `a ** k` with `k` another node; both operands receive gradient.
    Pow,
    /// `a ** k` with `k` a fixed constant; only the base receives gradient.
    PowConst(f64),
    /// `e ** a`
    Exp,
    /// Hyperbolic tangent.
    Tanh,
    /// `max(0, a)`
    Relu,
    /// Logistic sigmoid `1 / (1 + e ** -a)`.
    Sigmoid,
}

impl OpKind {
    /// Number of operands this operation consumes.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            OpKind::Leaf => 0,
            OpKind::Add | OpKind::Mul | OpKind::Pow => 2,
            OpKind::PowConst(_) | OpKind::Exp | OpKind::Tanh | OpKind::Relu | OpKind::Sigmoid => 1,
        }
    }

    /// Forward rule. `b` is ignored by unary operations; [`Leaf`](OpKind::Leaf)
    /// is the identity on `a`.
    ///
    /// No domain guards: a zero base with a negative exponent yields `inf`, and
    /// NaN inputs give NaN outputs that later poison every gradient downstream.
    #[must_use]
    pub fn forward(self, a: f64, b: f64) -> f64 {
        match self {
            OpKind::Leaf => a,
            OpKind::Add => a + b,
            OpKind::Mul => a * b,
            OpKind::Pow => a.powf(b),
            OpKind::PowConst(k) => a.powf(k),
            OpKind::Exp => a.exp(),
            // same function as (e^2x - 1) / (e^2x + 1) without overflowing for large |x|
            OpKind::Tanh => a.tanh(),
            OpKind::Relu => {
                if a > 0.0 {
                    a
                } else {
                    0.0
                }
            }
            OpKind::Sigmoid => 1.0 / (1.0 + (-a).exp()),
        }
    }

    /// Local partial derivatives `[d out / d a, d out / d b]` for the node `node`
    /// whose operands hold `a` and `b` and whose own value is `out`.
    ///
    /// Entries past [`arity`](OpKind::arity) are zero and must be ignored.
    ///
    /// # Errors
    ///
    /// [`EngineError::Domain`] for [`OpKind::Pow`] when `a <= 0`: the exponent's
    /// derivative needs `ln(a)`, which is undefined there.
    pub fn local_gradients(self, node: NodeId, a: f64, b: f64, out: f64) -> Result<[f64; 2], EngineError> {
        let local = match self {
            OpKind::Leaf => [0.0, 0.0],
            OpKind::Add => [1.0, 1.0],
            OpKind::Mul => [b, a],
            OpKind::Pow => {
                if a <= 0.0 {
                    return Err(EngineError::Domain { node, base: a });
                }
                [b * a.powf(b - 1.0), a.ln() * out]
            }
            OpKind::PowConst(k) => [k * a.powf(k - 1.0), 0.0],
            OpKind::Exp => [out, 0.0],
            OpKind::Tanh => [1.0 - out * out, 0.0],
            OpKind::Relu => [if a > 0.0 { 1.0 } else { 0.0 }, 0.0],
            OpKind::Sigmoid => [out * (1.0 - out), 0.0],
        };
        Ok(local)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Leaf => Ok(()),
            OpKind::Add => f.write_str("+"),
            OpKind::Mul => f.write_str("*"),
            OpKind::Pow => f.write_str("**"),
            OpKind::PowConst(k) => write!(f, "**{k}"),
            OpKind::Exp => f.write_str("exp"),
            OpKind::Tanh => f.write_str("tanh"),
            OpKind::Relu => f.write_str("relu"),
            OpKind::Sigmoid => f.write_str("sigmoid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id() -> NodeId {
        NodeId::new(0, 0)
    }

    #[rstest]
    #[case(OpKind::Leaf, 4.0, 0.0, 4.0)]
    #[case(OpKind::Add, 2.0, 3.0, 5.0)]
    #[case(OpKind::Mul, 2.0, -3.0, -6.0)]
    #[case(OpKind::Pow, 2.0, 3.0, 8.0)]
    #[case(OpKind::PowConst(-1.0), 4.0, 0.0, 0.25)]
    #[case(OpKind::Exp, 0.0, 0.0, 1.0)]
    #[case(OpKind::Tanh, 0.0, 0.0, 0.0)]
    #[case(OpKind::Relu, -5.0, 0.0, 0.0)]
    #[case(OpKind::Relu, 1.5, 0.0, 1.5)]
    #[case(OpKind::Sigmoid, 0.0, 0.0, 0.5)]
    fn forward_matches_reference(#[case] op: OpKind, #[case] a: f64, #[case] b: f64, #[case] expected: f64) {
        assert!((op.forward(a, b) - expected).abs() < 1e-12);
    }

    #[test]
    fn tanh_matches_exponential_formula() {
        for x in [-3.0_f64, -0.5, 0.25, 2.0] {
            let e2x = (2.0 * x).exp();
            let reference = (e2x - 1.0) / (e2x + 1.0);
            assert!((OpKind::Tanh.forward(x, 0.0) - reference).abs() < 1e-12);
        }
    }

    #[test]
    fn tanh_saturates_instead_of_nan() {
        assert_eq!(OpKind::Tanh.forward(1000.0, 0.0), 1.0);
        assert_eq!(OpKind::Tanh.forward(-1000.0, 0.0), -1.0);
    }

    #[test]
    fn mul_locals_swap_operands() {
        let local = OpKind::Mul.local_gradients(id(), 2.0, -3.0, -6.0).unwrap();
        assert_eq!(local, [-3.0, 2.0]);
    }

    #[test]
    fn pow_locals_cover_base_and_exponent() {
        let out = OpKind::Pow.forward(2.0, 3.0);
        let [da, dk] = OpKind::Pow.local_gradients(id(), 2.0, 3.0, out).unwrap();
        assert!((da - 12.0).abs() < 1e-12);
        assert!((dk - 2.0_f64.ln() * 8.0).abs() < 1e-12);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-2.0)]
    fn pow_with_node_exponent_rejects_non_positive_base(#[case] base: f64) {
        let out = OpKind::Pow.forward(base, 2.0);
        let err = OpKind::Pow.local_gradients(id(), base, 2.0, out).unwrap_err();
        assert!(matches!(err, EngineError::Domain { base: b, .. } if b == base));
    }

    #[test]
    fn pow_const_accepts_negative_base() {
        let [da, _] = OpKind::PowConst(2.0).local_gradients(id(), -3.0, 0.0, 9.0).unwrap();
        assert_eq!(da, -6.0);
    }

    #[test]
    fn zero_base_negative_exponent_is_infinite() {
        assert!(OpKind::PowConst(-1.0).forward(0.0, 0.0).is_infinite());
    }

    #[test]
    fn display_tags() {
        assert_eq!(OpKind::Add.to_string(), "+");
        assert_eq!(OpKind::PowConst(2.0).to_string(), "**2");
        assert_eq!(OpKind::Leaf.to_string(), "");
    }
}
