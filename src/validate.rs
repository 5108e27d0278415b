//! Input validation.
//!
//! All domain checks live here so that nothing downstream has to re-check its
//! inputs. Each function is pure and reports the first violation it finds.

use crate::design::{DesignParameters, FreeVariable};
use crate::error::{Error, Result};
use crate::power::SolverConfig;

/// Check every field of a parameter bundle.
pub(crate) fn validate_design(params: &DesignParameters) -> Result<()> {
    if !params.cohens_d.is_finite() {
        return Err(Error::invalid_parameter(
            "cohens_d",
            format!("must be finite, got {}", params.cohens_d),
        ));
    }

    positive("resid", params.resid)?;
    non_negative("participant_intercept", params.participant_intercept)?;
    non_negative("target_intercept", params.target_intercept)?;
    non_negative("participant_slope", params.participant_slope)?;
    non_negative("target_slope", params.target_slope)?;
    non_negative("participant_x_target", params.participant_x_target)?;

    sample_size("n_participants", params.n_participants)?;
    sample_size("n_targets", params.n_targets)?;

    open_unit("alpha", params.alpha)
}

/// Check that a requested power lies strictly between 0 and 1.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] for `p <= 0`, `p >= 1` or NaN.
pub fn validate_target_power(target_power: f64) -> Result<()> {
    open_unit("target_power", target_power)
}

/// Check solver settings against the variable being solved for.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if the tolerance is not positive, an
/// iteration budget is zero, the expansion factor does not exceed 1, or the
/// bracket hint lies outside the variable's domain.
pub fn validate_solver_config(config: &SolverConfig, variable: FreeVariable) -> Result<()> {
    if !(config.tolerance.is_finite() && config.tolerance > 0.0) {
        return Err(Error::invalid_parameter(
            "tolerance",
            format!("must be positive and finite, got {}", config.tolerance),
        ));
    }
    if config.max_iterations == 0 {
        return Err(Error::invalid_parameter(
            "max_iterations",
            "must be at least 1",
        ));
    }
    if !(config.expansion_factor.is_finite() && config.expansion_factor > 1.0) {
        return Err(Error::invalid_parameter(
            "expansion_factor",
            format!("must be finite and > 1, got {}", config.expansion_factor),
        ));
    }
    if let Some(hint) = config.bracket_hint {
        if !variable.domain().contains(hint) {
            return Err(Error::invalid_parameter(
                "bracket_hint",
                format!("{hint} is outside the domain of `{variable}`"),
            ));
        }
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            name,
            format!("must be positive and finite, got {value}"),
        ))
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            name,
            format!("must be non-negative and finite, got {value}"),
        ))
    }
}

fn sample_size(name: &'static str, n: u32) -> Result<()> {
    if n >= 2 {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            name,
            format!("must be at least 2, got {n}"),
        ))
    }
}

fn open_unit(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            name,
            format!("must lie in (0, 1), got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DesignBuilder;

    fn rejected_name(builder: DesignBuilder) -> &'static str {
        match builder.build() {
            Err(Error::InvalidParameter { name, .. }) => name,
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_each_field() {
        let base = DesignBuilder::new();
        assert_eq!(rejected_name(base.cohens_d(f64::NAN)), "cohens_d");
        assert_eq!(rejected_name(base.resid(-1.0)), "resid");
        assert_eq!(
            rejected_name(base.participant_intercept(-0.1)),
            "participant_intercept"
        );
        assert_eq!(rejected_name(base.target_intercept(f64::NAN)), "target_intercept");
        assert_eq!(rejected_name(base.participant_slope(-0.1)), "participant_slope");
        assert_eq!(rejected_name(base.target_slope(f64::INFINITY)), "target_slope");
        assert_eq!(
            rejected_name(base.participant_x_target(-1e-9)),
            "participant_x_target"
        );
        assert_eq!(rejected_name(base.n_participants(0)), "n_participants");
        assert_eq!(rejected_name(base.n_targets(1)), "n_targets");
        assert_eq!(rejected_name(base.alpha(1.0)), "alpha");
    }

    #[test]
    fn test_zero_residual_is_rejected() {
        assert_eq!(rejected_name(DesignBuilder::new().resid(0.0)), "resid");
    }

    #[test]
    fn test_zero_components_are_accepted() {
        let params = DesignBuilder::new()
            .participant_intercept(0.0)
            .target_intercept(0.0)
            .participant_slope(0.0)
            .target_slope(0.0)
            .participant_x_target(0.0)
            .cohens_d(0.0)
            .n_participants(2)
            .n_targets(2)
            .build();
        assert!(params.is_ok());
    }

    #[test]
    fn test_target_power_bounds() {
        assert!(validate_target_power(0.8).is_ok());
        assert!(validate_target_power(0.0).is_err());
        assert!(validate_target_power(1.0).is_err());
        assert!(validate_target_power(f64::NAN).is_err());
    }

    #[test]
    fn test_solver_config_checks() {
        let config = SolverConfig::default();
        assert!(validate_solver_config(&config, FreeVariable::NParticipants).is_ok());

        let bad = SolverConfig {
            tolerance: 0.0,
            ..SolverConfig::default()
        };
        assert!(validate_solver_config(&bad, FreeVariable::CohensD).is_err());

        let bad = SolverConfig {
            expansion_factor: 1.0,
            ..SolverConfig::default()
        };
        assert!(validate_solver_config(&bad, FreeVariable::CohensD).is_err());

        let bad = SolverConfig {
            max_iterations: 0,
            ..SolverConfig::default()
        };
        assert!(validate_solver_config(&bad, FreeVariable::CohensD).is_err());

        let hint = SolverConfig {
            bracket_hint: Some(1.5),
            ..SolverConfig::default()
        };
        assert!(validate_solver_config(&hint, FreeVariable::Alpha).is_err());
        assert!(validate_solver_config(&hint, FreeVariable::CohensD).is_ok());
    }
}
