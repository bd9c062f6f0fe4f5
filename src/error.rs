//! Error types for model fitting and validation.
//!
//! Every fitting failure is a plain value: fitters return `Result` and no
//! error ever crosses the library boundary as a panic. Inverse queries that
//! simply have no answer use `Option`, not this type (see `evaluator`).

use thiserror::Error;

/// Validation and fitting errors.
///
/// Ordering violations are checked before any parameter is derived; the
/// first failure wins and no partial model is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// Severe-effort power must exceed threshold-effort power.
    #[error("inconsistent inputs: severe-effort power must exceed threshold-effort power")]
    InconsistentPowerOrder,

    /// Severe-effort time must be shorter than threshold-effort time.
    #[error("inconsistent inputs: severe-effort time must be shorter than threshold-effort time")]
    InconsistentTimeOrder,

    /// Severe-effort distance must be shorter than threshold-effort distance.
    #[error("inconsistent inputs: severe-effort distance must be shorter than threshold-effort distance")]
    InconsistentDistanceOrder,

    /// Test times must be strictly positive.
    #[error("inconsistent inputs: test times must be greater than zero")]
    NonPositiveTime,

    /// The closed-form hyperbolic fit produced a non-positive parameter.
    #[error("invalid fit: derived {parameter} is not positive")]
    NegativeModelParameters { parameter: &'static str },

    /// The instantaneous maximum must dominate the 3-minute hyperbolic estimate.
    #[error("inconsistent inputs: Pmax ({pmax:.0} W) must exceed the 3-minute estimate ({po3min:.1} W)")]
    PmaxTooLow { pmax: f64, po3min: f64 },

    /// Power-law regression denominator is numerically degenerate.
    #[error("cannot fit power-law model: regression points are collinear")]
    CollinearInput,
}

/// Result type alias for fitting operations.
pub type Result<T> = std::result::Result<T, FitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_violated_ordering() {
        assert!(FitError::InconsistentPowerOrder.to_string().contains("power"));
        assert!(FitError::InconsistentTimeOrder.to_string().contains("time"));
        assert!(FitError::InconsistentDistanceOrder
            .to_string()
            .contains("distance"));
    }

    #[test]
    fn test_pmax_too_low_carries_context() {
        let err = FitError::PmaxTooLow {
            pmax: 400.0,
            po3min: 460.2,
        };
        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("460.2"));
    }
}
