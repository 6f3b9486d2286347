//! Default values for the gradient checker configuration.

/// Half-width of the symmetric finite-difference stencil.
pub(crate) const DEFAULT_STEP: f64 = 1e-6;
/// Scaled tolerance; see [`GradCheckConfig::tolerance`](super::GradCheckConfig::tolerance).
pub(crate) const DEFAULT_TOLERANCE: f64 = 1e-4;
