//! Power calculation and parameter solving.
//!
//! ## Overview
//!
//! - [`power`]: power and degrees of freedom of the condition-effect test for
//!   a fully specified design
//! - [`solve`]: value of one [`FreeVariable`] at which power reaches a target
//! - [`VarianceComponentModel`]: the effect variance and Satterthwaite df the
//!   test is built on
//!
//! ## Example
//!
//! ```
//! use mixedpower::power::{power, solve, SolverConfig};
//! use mixedpower::{Design, DesignParameters, FreeVariable};
//!
//! let params = DesignParameters::builder()
//!     .cohens_d(0.5)
//!     .resid(0.3)
//!     .participant_intercept(0.2)
//!     .target_intercept(0.2)
//!     .participant_slope(0.1)
//!     .target_slope(0.1)
//!     .participant_x_target(0.1)
//!     .n_participants(40)
//!     .n_targets(30)
//!     .build()
//!     .unwrap();
//!
//! let result = power(Design::Ccc, &params).unwrap();
//! assert!(result.power > 0.8);
//!
//! let needed = solve(
//!     Design::Ccc,
//!     FreeVariable::NParticipants,
//!     0.8,
//!     &params,
//!     &SolverConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(needed.value, 26.0);
//! ```

mod engine;
mod model;
mod solver;
mod stats;
mod types;

pub use engine::calculate_power;
pub use model::{VarianceComponentModel, VarianceSource, WeightedTerm};
pub use solver::solve_for;
pub use stats::{noncentral_t_cdf, normal_cdf, t_cdf, t_quantile};
pub use types::{PowerDetails, PowerResult, SampleSizeRounding, SolveResult, SolverConfig};

use crate::design::{Design, DesignParameters, FreeVariable};
use crate::error::Result;

/// Power of the two-sided condition-effect test.
///
/// # Errors
///
/// Returns [`Error::DegenerateModel`](crate::Error::DegenerateModel) if the
/// variance components do not yield a usable test.
pub fn power(design: Design, params: &DesignParameters) -> Result<PowerResult> {
    match design {
        Design::Ccc => calculate_power(params),
    }
}

/// Value of `variable` at which power equals `target_power`.
///
/// Sample sizes are reported as whole numbers according to
/// [`SolverConfig::rounding`]; everything else is the continuous root.
///
/// # Errors
///
/// - [`Error::InvalidParameter`](crate::Error::InvalidParameter) for a target
///   outside `(0, 1)` or unusable solver settings
/// - [`Error::UnboundedSearch`](crate::Error::UnboundedSearch) if the target
///   is out of reach within the variable's domain
/// - [`Error::NoConvergence`](crate::Error::NoConvergence) if the iteration
///   budget runs out
pub fn solve(
    design: Design,
    variable: FreeVariable,
    target_power: f64,
    params: &DesignParameters,
    config: &SolverConfig,
) -> Result<SolveResult> {
    match design {
        Design::Ccc => solve_for(variable, target_power, params, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_default_design_power() {
        let params = DesignParameters::builder().build().unwrap();
        let result = power(Design::Ccc, &params).unwrap();
        assert!(result.power > 0.9999);
        assert!((result.df - 241.7).abs() < 0.1);
    }

    #[test]
    fn test_design_name_dispatch() {
        let params = DesignParameters::builder().n_participants(20).build().unwrap();
        let design: Design = "ccc".parse().unwrap();
        assert_eq!(
            power(design, &params).unwrap(),
            calculate_power(&params).unwrap()
        );
        assert!(matches!(
            "ABC".parse::<Design>(),
            Err(Error::UnsupportedDesign(_))
        ));
    }

    #[test]
    fn test_solve_by_name() {
        let params = DesignParameters::builder()
            .n_participants(20)
            .n_targets(20)
            .build()
            .unwrap();
        let variable: FreeVariable = "n_targets".parse().unwrap();
        let result = solve(Design::Ccc, variable, 0.9, &params, &SolverConfig::default()).unwrap();
        assert!(result.power >= 0.9);
        assert_eq!(result.value.fract(), 0.0);

        assert!(matches!(
            "n_cells".parse::<FreeVariable>(),
            Err(Error::InvalidVariable(_))
        ));
    }
}
