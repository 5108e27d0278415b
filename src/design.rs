//! Design layouts, parameter bundles and solvable variables.
//!
//! ## Overview
//!
//! - [`Design`]: the experimental layout (only the fully crossed CCC layout)
//! - [`DesignParameters`]: a validated bundle of effect size, variance
//!   components, sample sizes and alpha
//! - [`FreeVariable`]: the parameters the solver can vary, each with a search
//!   [`Domain`] and a [`Monotonicity`]
//!
//! ## Notation
//!
//! A CCC design with `p` participants and `q` targets observes each of the
//! `2 × p × q` condition × participant × target cells exactly once. The
//! condition effect varies randomly across participants (`participant_slope`),
//! across targets (`target_slope`) and across their pairings
//! (`participant_x_target`).

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::builder::DesignBuilder;
use crate::error::{Error, Result};
use crate::validate;

/// Experimental layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Design {
    /// Condition crossed with participants and with targets, every cell
    /// observed once.
    #[default]
    Ccc,
}

impl Design {
    /// Canonical name of the layout.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ccc => "CCC",
        }
    }
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Design {
    type Err = Error;

    /// Parse a layout name. Only `"CCC"` (any case) is recognized.
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("ccc") {
            Ok(Self::Ccc)
        } else {
            Err(Error::UnsupportedDesign(s.to_string()))
        }
    }
}

/// Direction in which power moves as a free variable grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monotonicity {
    /// Power grows with the variable.
    Increasing,
    /// Power shrinks as the variable grows.
    Decreasing,
}

/// Admissible interval of a free variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    /// Lower end of the interval.
    pub lower: f64,
    /// Whether `lower` itself is admissible.
    pub lower_inclusive: bool,
    /// Upper end of the interval (may be infinite).
    pub upper: f64,
    /// Whether `upper` itself is admissible.
    pub upper_inclusive: bool,
}

/// Largest representable sample size, `u32::MAX`.
const MAX_SAMPLE_SIZE: f64 = 4_294_967_295.0;

impl Domain {
    const fn sample_size() -> Self {
        Self {
            lower: 2.0,
            lower_inclusive: true,
            upper: MAX_SAMPLE_SIZE,
            upper_inclusive: true,
        }
    }

    const fn at_least(lower: f64) -> Self {
        Self {
            lower,
            lower_inclusive: true,
            upper: f64::INFINITY,
            upper_inclusive: false,
        }
    }

    const fn positive() -> Self {
        Self {
            lower: 0.0,
            lower_inclusive: false,
            upper: f64::INFINITY,
            upper_inclusive: false,
        }
    }

    const fn open_unit() -> Self {
        Self {
            lower: 0.0,
            lower_inclusive: false,
            upper: 1.0,
            upper_inclusive: false,
        }
    }

    /// Check whether `x` lies in the domain.
    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        if x.is_nan() || x.is_infinite() {
            return false;
        }
        let above = if self.lower_inclusive {
            x >= self.lower
        } else {
            x > self.lower
        };
        let below = if self.upper_inclusive {
            x <= self.upper
        } else {
            x < self.upper
        };
        above && below
    }
}

/// A design parameter the solver can search over.
///
/// Intercept variances are absent on purpose: they do not move power in the
/// CCC layout, so there is nothing to solve for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FreeVariable {
    /// Number of participants.
    NParticipants,
    /// Number of targets.
    NTargets,
    /// Standardized condition effect (solved as a magnitude).
    CohensD,
    /// Type-I error rate.
    Alpha,
    /// Residual variance.
    Resid,
    /// Variance of the condition slope across participants.
    ParticipantSlope,
    /// Variance of the condition slope across targets.
    TargetSlope,
    /// Variance of the participant × target condition interaction.
    ParticipantXTarget,
}

impl FreeVariable {
    /// Every solvable variable.
    pub const ALL: [FreeVariable; 8] = [
        Self::NParticipants,
        Self::NTargets,
        Self::CohensD,
        Self::Alpha,
        Self::Resid,
        Self::ParticipantSlope,
        Self::TargetSlope,
        Self::ParticipantXTarget,
    ];

    /// Field name of the variable.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::NParticipants => "n_participants",
            Self::NTargets => "n_targets",
            Self::CohensD => "cohens_d",
            Self::Alpha => "alpha",
            Self::Resid => "resid",
            Self::ParticipantSlope => "participant_slope",
            Self::TargetSlope => "target_slope",
            Self::ParticipantXTarget => "participant_x_target",
        }
    }

    /// Whether the variable only takes whole values.
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(self, Self::NParticipants | Self::NTargets)
    }

    /// How power responds to growth of the variable.
    #[must_use]
    pub fn monotonicity(self) -> Monotonicity {
        match self {
            Self::NParticipants | Self::NTargets | Self::CohensD | Self::Alpha => {
                Monotonicity::Increasing
            }
            Self::Resid | Self::ParticipantSlope | Self::TargetSlope | Self::ParticipantXTarget => {
                Monotonicity::Decreasing
            }
        }
    }

    /// Interval the solver searches in.
    #[must_use]
    pub fn domain(self) -> Domain {
        match self {
            Self::NParticipants | Self::NTargets => Domain::sample_size(),
            Self::CohensD | Self::ParticipantSlope | Self::TargetSlope | Self::ParticipantXTarget => {
                Domain::at_least(0.0)
            }
            Self::Alpha => Domain::open_unit(),
            Self::Resid => Domain::positive(),
        }
    }

    /// Starting point of the bracket search when none is configured.
    #[must_use]
    pub fn default_hint(self) -> f64 {
        match self {
            Self::NParticipants | Self::NTargets => 10.0,
            Self::CohensD => 0.5,
            Self::Alpha => 0.05,
            Self::Resid => 1.0,
            Self::ParticipantSlope | Self::TargetSlope | Self::ParticipantXTarget => 0.1,
        }
    }
}

impl fmt::Display for FreeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FreeVariable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidVariable(s.to_string()))
    }
}

/// Validated inputs of one design instantiation.
///
/// Values can only be obtained through [`DesignBuilder`] or
/// [`DesignParameters::with`], both of which run the input validator, so every
/// `DesignParameters` satisfies the domain constraints:
///
/// - every real field is finite
/// - `resid > 0`, every other variance `>= 0`
/// - both sample sizes `>= 2`
/// - `0 < alpha < 1`
///
/// # Example
///
/// ```
/// use mixedpower::{DesignParameters, FreeVariable};
///
/// let params = DesignParameters::builder()
///     .cohens_d(0.5)
///     .n_participants(40)
///     .n_targets(40)
///     .build()
///     .unwrap();
///
/// let larger = params.with(FreeVariable::NParticipants, 60.0).unwrap();
/// assert_eq!(larger.n_participants(), 60);
/// assert_eq!(larger.n_targets(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "DesignBuilder", into = "DesignBuilder")
)]
pub struct DesignParameters {
    pub(crate) cohens_d: f64,
    pub(crate) resid: f64,
    pub(crate) participant_intercept: f64,
    pub(crate) target_intercept: f64,
    pub(crate) participant_slope: f64,
    pub(crate) target_slope: f64,
    pub(crate) participant_x_target: f64,
    pub(crate) n_participants: u32,
    pub(crate) n_targets: u32,
    pub(crate) alpha: f64,
}

impl DesignParameters {
    /// Start a builder pre-filled with the default design.
    #[must_use]
    pub fn builder() -> DesignBuilder {
        DesignBuilder::new()
    }

    /// Standardized condition effect.
    #[must_use]
    pub fn cohens_d(&self) -> f64 {
        self.cohens_d
    }

    /// Residual variance.
    #[must_use]
    pub fn resid(&self) -> f64 {
        self.resid
    }

    /// Random-intercept variance across participants.
    #[must_use]
    pub fn participant_intercept(&self) -> f64 {
        self.participant_intercept
    }

    /// Random-intercept variance across targets.
    #[must_use]
    pub fn target_intercept(&self) -> f64 {
        self.target_intercept
    }

    /// Condition-slope variance across participants.
    #[must_use]
    pub fn participant_slope(&self) -> f64 {
        self.participant_slope
    }

    /// Condition-slope variance across targets.
    #[must_use]
    pub fn target_slope(&self) -> f64 {
        self.target_slope
    }

    /// Participant × target condition-interaction variance.
    #[must_use]
    pub fn participant_x_target(&self) -> f64 {
        self.participant_x_target
    }

    /// Number of participants.
    #[must_use]
    pub fn n_participants(&self) -> u32 {
        self.n_participants
    }

    /// Number of targets.
    #[must_use]
    pub fn n_targets(&self) -> u32 {
        self.n_targets
    }

    /// Type-I error rate.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Current value of a free variable.
    #[must_use]
    pub fn get(&self, variable: FreeVariable) -> f64 {
        match variable {
            FreeVariable::NParticipants => f64::from(self.n_participants),
            FreeVariable::NTargets => f64::from(self.n_targets),
            FreeVariable::CohensD => self.cohens_d,
            FreeVariable::Alpha => self.alpha,
            FreeVariable::Resid => self.resid,
            FreeVariable::ParticipantSlope => self.participant_slope,
            FreeVariable::TargetSlope => self.target_slope,
            FreeVariable::ParticipantXTarget => self.participant_x_target,
        }
    }

    /// Return a copy with one free variable replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the new value is outside the
    /// variable's domain, or is fractional for a sample size.
    pub fn with(&self, variable: FreeVariable, value: f64) -> Result<Self> {
        let mut next = *self;
        match variable {
            FreeVariable::NParticipants => {
                next.n_participants = whole_sample_size(variable.name(), value)?;
            }
            FreeVariable::NTargets => {
                next.n_targets = whole_sample_size(variable.name(), value)?;
            }
            FreeVariable::CohensD => next.cohens_d = value,
            FreeVariable::Alpha => next.alpha = value,
            FreeVariable::Resid => next.resid = value,
            FreeVariable::ParticipantSlope => next.participant_slope = value,
            FreeVariable::TargetSlope => next.target_slope = value,
            FreeVariable::ParticipantXTarget => next.participant_x_target = value,
        }
        validate::validate_design(&next)?;
        Ok(next)
    }

    /// Convert back into a builder holding the same values.
    #[must_use]
    pub fn to_builder(&self) -> DesignBuilder {
        DesignBuilder::from(*self)
    }
}

fn whole_sample_size(name: &'static str, value: f64) -> Result<u32> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(Error::invalid_parameter(
            name,
            format!("sample size must be a whole number, got {value}"),
        ));
    }
    if value < 2.0 || value > f64::from(u32::MAX) {
        return Err(Error::invalid_parameter(
            name,
            format!("sample size must lie in 2..={}, got {value}", u32::MAX),
        ));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(value as u32)
}
