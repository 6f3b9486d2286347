//! Configuration errors.

use thiserror::Error;

/// Errors produced when validating configuration.
///
/// # Variants
///
/// - **Validation**: a value is out of range (e.g. a non-positive finite-difference step).
///   *When*: [`GradCheckConfig::validate`](super::GradCheckConfig::validate), which
///   [`GradCheck::new`](crate::gradcheck::GradCheck::new) calls.
///   *Recovery*: fix the value; the message names the rule that failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("config validation: {0}")]
    Validation(String),
}
