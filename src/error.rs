//! Error types for the mixedpower library.
//!
//! Every failure the library can report is a variant of [`Error`]. Inputs are
//! rejected at the validation boundary, undefined arithmetic is reported where
//! it occurs, and the solver reports exhausted search budgets instead of
//! looping.

use thiserror::Error;

/// The main error type for the mixedpower library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============ Input Errors ============
    /// A parameter lies outside its declared domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// What the parameter violated.
        reason: String,
    },

    /// The requested design layout is not supported.
    #[error("unsupported design `{0}` (supported: CCC)")]
    UnsupportedDesign(String),

    /// The requested free variable cannot be solved for.
    #[error(
        "cannot solve for `{0}` (expected one of: n_participants, n_targets, cohens_d, alpha, \
         resid, participant_slope, target_slope, participant_x_target)"
    )]
    InvalidVariable(String),

    // ============ Model Errors ============
    /// The variance components do not define a usable test statistic.
    #[error("degenerate variance model: {reason}")]
    DegenerateModel {
        /// Why the model is degenerate.
        reason: String,
    },

    // ============ Solver Errors ============
    /// No bracket around the target power was found.
    #[error(
        "target power {target} is unreachable by varying `{variable}` \
         (no sign change after {expansions} bracket expansions)"
    )]
    UnboundedSearch {
        /// Name of the free variable.
        variable: &'static str,
        /// The requested power.
        target: f64,
        /// Number of expansions attempted.
        expansions: usize,
    },

    /// Bisection hit its iteration cap before reaching the tolerance.
    #[error("solving for `{variable}` did not converge after {iterations} iterations (residual {residual:e})")]
    NoConvergence {
        /// Name of the free variable.
        variable: &'static str,
        /// Iterations performed.
        iterations: usize,
        /// Signed distance from the target power at the last midpoint.
        residual: f64,
    },
}

/// A specialized `Result` type for mixedpower operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Create a new `InvalidParameter` error.
    #[must_use]
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Create a new `DegenerateModel` error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateModel {
            reason: reason.into(),
        }
    }
}
