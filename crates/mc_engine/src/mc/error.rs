//! Error types for the simulation engine.
//!
//! Precondition violations are the only recognised failure. They are raised
//! before any path is simulated; floating-point overflow under extreme
//! parameters is left to propagate as `inf`.

use thiserror::Error;

/// Simulation error.
///
/// # Examples
///
/// ```rust
/// use mc_engine::mc::SimulationError;
///
/// let err = SimulationError::invalid("num_paths", "must be at least 1, got 0");
/// assert_eq!(
///     err.to_string(),
///     "Invalid configuration 'num_paths': must be at least 1, got 0"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// An input parameter violates its precondition.
    #[error("Invalid configuration '{parameter}': {reason}")]
    InvalidConfig {
        /// Parameter name.
        parameter: &'static str,
        /// Description of the violation.
        reason: String,
    },
}

impl SimulationError {
    /// Shorthand for [`SimulationError::InvalidConfig`].
    pub fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter,
            reason: reason.into(),
        }
    }

    /// Returns the offending parameter name.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidConfig { parameter, .. } => parameter,
        }
    }
}
