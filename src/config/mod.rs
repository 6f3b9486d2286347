//! Configuration for the finite-difference gradient checker.
//!
//! Build with [`GradCheckConfig::default`] and the `with_*` setters, then
//! [`GradCheckConfig::validate`] before use. Defaults live in the `constants`
//! submodule.

mod constants;
mod error;

use constants::{DEFAULT_STEP, DEFAULT_TOLERANCE};

pub use error::ConfigError;

/// Settings for [`GradCheck`](crate::gradcheck::GradCheck).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradCheckConfig {
    /// Finite-difference step `h`; each partial is `(f(x+h) - f(x-h)) / 2h`.
    pub step: f64,
    /// An input passes when `|analytic - numeric| <= tolerance * (1 + max(|analytic|, |numeric|))`.
    pub tolerance: f64,
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl GradCheckConfig {
    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Validates configuration. Returns `Ok(())` if valid, or a [`ConfigError`].
    ///
    /// Both `step` and `tolerance` must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ConfigError::Validation(format!(
                "step must be finite and > 0 (got {})",
                self.step
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::Validation(format!(
                "tolerance must be finite and > 0 (got {})",
                self.tolerance
            )));
        }
        Ok(())
    }
}
