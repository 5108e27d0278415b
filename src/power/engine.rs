//! Noncentral-t power calculation.
//!
//! For a two-sided test at level `alpha` with `df` degrees of freedom, power
//! is the probability mass of the noncentral t distribution beyond the
//! central critical values:
//!
//! ```text
//! ncp    = |d| / sqrt(effect_variance)
//! t_crit = -T⁻¹(alpha/2; df)
//! power  = P(T' > t_crit) + P(T' < -t_crit),   T' ~ t(df, ncp)
//! ```
//!
//! With `d = 0` both tails hold `alpha / 2` and power equals `alpha`.

use super::model::VarianceComponentModel;
use super::stats::{noncentral_t_cdf, t_quantile};
use super::types::{PowerDetails, PowerResult};
use crate::design::DesignParameters;
use crate::error::Result;

/// Calculate power for a parameter bundle.
pub fn calculate_power(params: &DesignParameters) -> Result<PowerResult> {
    let model = VarianceComponentModel::derive(params)?;
    power_from_model(params, &model)
}

/// Calculate power with real-valued sample sizes.
pub(crate) fn calculate_power_relaxed(
    params: &DesignParameters,
    n_participants: f64,
    n_targets: f64,
) -> Result<PowerResult> {
    let model = VarianceComponentModel::derive_relaxed(params, n_participants, n_targets)?;
    power_from_model(params, &model)
}

fn power_from_model(
    params: &DesignParameters,
    model: &VarianceComponentModel,
) -> Result<PowerResult> {
    let df = model.df;
    let ncp = params.cohens_d().abs() / model.standard_error();

    // Taken from the lower tail: `1 - alpha / 2` rounds to 1 for tiny alpha.
    let critical_value = -t_quantile(params.alpha() / 2.0, df)?;
    let upper_tail = 1.0 - noncentral_t_cdf(critical_value, df, ncp)?;
    let lower_tail = noncentral_t_cdf(-critical_value, df, ncp)?;

    // Only rounding in the tail sums can leave [0, 1].
    let power = (upper_tail + lower_tail).clamp(0.0, 1.0);

    let total_variance = total_variance(params);
    let details = PowerDetails {
        ncp,
        critical_value,
        upper_tail,
        lower_tail,
        effect_variance: model.effect_variance,
        total_variance,
        standardized_effect: params.cohens_d() / total_variance.sqrt(),
    };

    Ok(PowerResult { power, df, details })
}

/// Sum of every variance component, intercepts included.
fn total_variance(params: &DesignParameters) -> f64 {
    params.resid()
        + params.participant_x_target()
        + params.target_intercept()
        + params.participant_intercept()
        + params.target_slope()
        + params.participant_slope()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::DesignBuilder;
    use proptest::prelude::*;

    prop_compose! {
        fn design(min_n: u32)(
            cohens_d in -2.0f64..2.0,
            resid in 0.01f64..3.0,
            participant_intercept in 0.0f64..1.0,
            target_intercept in 0.0f64..1.0,
            participant_slope in 0.0f64..1.0,
            target_slope in 0.0f64..1.0,
            participant_x_target in 0.0f64..1.0,
            n_participants in min_n..200,
            n_targets in min_n..200,
            alpha in 0.001f64..0.3,
        ) -> DesignParameters {
            DesignBuilder::new()
                .cohens_d(cohens_d)
                .resid(resid)
                .participant_intercept(participant_intercept)
                .target_intercept(target_intercept)
                .participant_slope(participant_slope)
                .target_slope(target_slope)
                .participant_x_target(participant_x_target)
                .n_participants(n_participants)
                .n_targets(n_targets)
                .alpha(alpha)
                .build()
                .unwrap()
        }
    }

    proptest! {
        #[test]
        fn zero_effect_power_is_alpha(params in design(2)) {
            let params = params.to_builder().cohens_d(0.0).build().unwrap();
            let result = calculate_power(&params).unwrap();
            prop_assert!((result.power - params.alpha()).abs() < 1e-8);
        }

        #[test]
        fn power_is_a_probability(params in design(2)) {
            let result = calculate_power(&params).unwrap();
            prop_assert!((0.0..=1.0).contains(&result.power));
            prop_assert!(result.power >= params.alpha() - 1e-8);
            prop_assert!(result.df > 0.0);
        }

        // With a handful of units on one side the slope term's single-digit
        // df dominates the Satterthwaite df, which then shrinks as the other
        // factor grows; sample-size monotonicity holds from about eight units.
        #[test]
        fn more_participants_never_lower_power(params in design(10), extra in 1u32..50) {
            let larger = params
                .to_builder()
                .n_participants(params.n_participants() + extra)
                .build()
                .unwrap();
            let before = calculate_power(&params).unwrap().power;
            let after = calculate_power(&larger).unwrap().power;
            prop_assert!(after >= before - 1e-9, "{before} -> {after}");
        }

        #[test]
        fn more_targets_never_lower_power(params in design(10), extra in 1u32..50) {
            let larger = params
                .to_builder()
                .n_targets(params.n_targets() + extra)
                .build()
                .unwrap();
            let before = calculate_power(&params).unwrap().power;
            let after = calculate_power(&larger).unwrap().power;
            prop_assert!(after >= before - 1e-9, "{before} -> {after}");
        }

        #[test]
        fn larger_effect_never_lowers_power(params in design(2), extra in 0.0f64..2.0) {
            let magnitude = params.cohens_d().abs() + extra;
            let larger = params.to_builder().cohens_d(-magnitude).build().unwrap();
            let before = calculate_power(&params).unwrap().power;
            let after = calculate_power(&larger).unwrap().power;
            prop_assert!(after >= before - 1e-9, "{before} -> {after}");
        }
    }
}
