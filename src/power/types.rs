//! Power analysis types.
//!
//! Result and configuration types shared by the power engine and the solver.

/// Result of a direct power query.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerResult {
    /// Probability of rejecting the null hypothesis of no condition effect.
    pub power: f64,
    /// Satterthwaite degrees of freedom of the test.
    pub df: f64,
    /// Intermediate quantities of the calculation.
    pub details: PowerDetails,
}

/// Intermediate quantities of a power calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerDetails {
    /// Noncentrality parameter, `|d| / sqrt(effect_variance)`.
    pub ncp: f64,
    /// Two-sided critical value of the central t distribution.
    pub critical_value: f64,
    /// `P(T' > t_crit)`.
    pub upper_tail: f64,
    /// `P(T' < -t_crit)`.
    pub lower_tail: f64,
    /// Variance of the condition-effect estimator.
    pub effect_variance: f64,
    /// Sum of every variance component, intercepts included.
    pub total_variance: f64,
    /// `cohens_d / sqrt(total_variance)`.
    pub standardized_effect: f64,
}

/// Result of solving for a free variable.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveResult {
    /// Value of the free variable that reaches the target power.
    pub value: f64,
    /// Degrees of freedom at `value`.
    pub df: f64,
    /// Power at `value`.
    pub power: f64,
    /// Number of power evaluations spent.
    pub evaluations: usize,
}

/// How a sample-size solution is turned into a reported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleSizeRounding {
    /// Smallest whole sample size whose power meets the target.
    #[default]
    Ceiling,
    /// Whole sample size nearest to the continuous root.
    Nearest,
    /// The continuous root itself.
    Continuous,
}

/// Configuration for the parameter solver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Stop once `|power - target|` falls below this (default: 1e-8).
    pub tolerance: f64,
    /// Maximum bisection steps (default: 200).
    pub max_iterations: usize,
    /// Maximum bracket expansions (default: 64).
    pub max_expansions: usize,
    /// Geometric growth factor of the bracket (default: 2.0).
    pub expansion_factor: f64,
    /// Starting point of the bracket search (default: per-variable).
    pub bracket_hint: Option<f64>,
    /// Rounding of sample-size solutions (default: ceiling).
    pub rounding: SampleSizeRounding,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 200,
            max_expansions: 64,
            expansion_factor: 2.0,
            bracket_hint: None,
            rounding: SampleSizeRounding::Ceiling,
        }
    }
}
