//! Variance-component model of the condition-effect estimator.
//!
//! In the CCC layout the condition effect is estimated from a difference of
//! two condition means taken over all `p × q` participant/target pairs. Its
//! sampling variance combines four weighted sources:
//!
//! | source | weight | nominal df |
//! |---|---|---|
//! | residual | `resid` | `(p-1)(q-1)` |
//! | participant slope | `participant_slope · q` | `p-1` |
//! | target slope | `target_slope · p` | `q-1` |
//! | participant × target | `participant_x_target` | `(p-1)(q-1)` |
//!
//! and `effect_variance = 4 · Σ weight / (p · q)`. The effective degrees of
//! freedom follow Satterthwaite: `(Σ w)² / Σ (w² / df)`.
//!
//! Random intercepts are constant within a participant (or target) across
//! both conditions, so they drop out of the difference and are not part of
//! either quantity.

use crate::design::DesignParameters;
use crate::error::{Error, Result};

/// Source of one weighted variance term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VarianceSource {
    /// Residual variance.
    Residual,
    /// Condition slope across participants.
    ParticipantSlope,
    /// Condition slope across targets.
    TargetSlope,
    /// Participant × target condition interaction.
    Interaction,
}

/// One weighted contribution to the effect variance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedTerm {
    /// Where the variance comes from.
    pub source: VarianceSource,
    /// Component variance scaled by its replication count.
    pub weight: f64,
    /// Degrees of freedom the term is estimated with.
    pub nominal_df: f64,
}

/// Variance and Satterthwaite degrees of freedom of the condition effect.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarianceComponentModel {
    /// Variance of the condition-effect estimator.
    pub effect_variance: f64,
    /// Satterthwaite-approximated degrees of freedom.
    pub df: f64,
    /// Weighted terms in the order residual, participant slope, target
    /// slope, interaction.
    pub terms: [WeightedTerm; 4],
}

/// Scale of the variance of a difference between two condition means.
const DIFFERENCE_SCALE: f64 = 4.0;

impl VarianceComponentModel {
    /// Derive the model for a parameter bundle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateModel`] if the weighted terms sum to zero or
    /// do not yield a positive, finite variance and df.
    ///
    /// # Example
    ///
    /// ```
    /// use mixedpower::{DesignParameters, VarianceComponentModel};
    ///
    /// let params = DesignParameters::builder()
    ///     .resid(0.3)
    ///     .participant_slope(0.1)
    ///     .target_slope(0.1)
    ///     .participant_x_target(0.1)
    ///     .n_participants(40)
    ///     .n_targets(40)
    ///     .build()
    ///     .unwrap();
    ///
    /// let model = VarianceComponentModel::derive(&params).unwrap();
    /// assert!((model.effect_variance - 0.021).abs() < 1e-12);
    /// assert!(model.df > 1.0 && model.df < 39.0 * 39.0);
    /// ```
    pub fn derive(params: &DesignParameters) -> Result<Self> {
        Self::derive_relaxed(
            params,
            f64::from(params.n_participants()),
            f64::from(params.n_targets()),
        )
    }

    /// Derive the model with real-valued sample sizes.
    ///
    /// The solver evaluates sample sizes between whole numbers through this
    /// entry point; [`derive`](Self::derive) is the whole-number special case.
    pub(crate) fn derive_relaxed(
        params: &DesignParameters,
        n_participants: f64,
        n_targets: f64,
    ) -> Result<Self> {
        let df_participants = n_participants - 1.0;
        let df_targets = n_targets - 1.0;
        let df_cells = df_participants * df_targets;

        if !(df_participants > 0.0 && df_targets > 0.0) {
            return Err(Error::degenerate(format!(
                "nominal degrees of freedom must be positive \
                 (n_participants = {n_participants}, n_targets = {n_targets})"
            )));
        }

        let terms = [
            WeightedTerm {
                source: VarianceSource::Residual,
                weight: params.resid(),
                nominal_df: df_cells,
            },
            WeightedTerm {
                source: VarianceSource::ParticipantSlope,
                weight: params.participant_slope() * n_targets,
                nominal_df: df_participants,
            },
            WeightedTerm {
                source: VarianceSource::TargetSlope,
                weight: params.target_slope() * n_participants,
                nominal_df: df_targets,
            },
            WeightedTerm {
                source: VarianceSource::Interaction,
                weight: params.participant_x_target(),
                nominal_df: df_cells,
            },
        ];

        let total: f64 = terms.iter().map(|t| t.weight).sum();
        if total <= 0.0 {
            return Err(Error::degenerate(
                "residual, slope and interaction variances are all zero",
            ));
        }

        let effect_variance = DIFFERENCE_SCALE * total / (n_participants * n_targets);
        if !(effect_variance.is_finite() && effect_variance > 0.0) {
            return Err(Error::degenerate(format!(
                "effect variance {effect_variance} is not a positive finite number"
            )));
        }

        let spread: f64 = terms
            .iter()
            .map(|t| t.weight * t.weight / t.nominal_df)
            .sum();
        let df = total * total / spread;
        if !(df.is_finite() && df > 0.0) {
            return Err(Error::degenerate(format!(
                "Satterthwaite degrees of freedom {df} are not a positive finite number"
            )));
        }

        Ok(Self {
            effect_variance,
            df,
            terms,
        })
    }

    /// Standard error of the condition-effect estimator.
    #[must_use]
    pub fn standard_error(&self) -> f64 {
        self.effect_variance.sqrt()
    }
}
