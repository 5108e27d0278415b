//! Builder pattern for constructing design parameters.
//!
//! The builder starts from the package's long-standing defaults so callers
//! only name the inputs they care about.
//!
//! # Example
//!
//! ```
//! use mixedpower::DesignBuilder;
//!
//! let params = DesignBuilder::new()
//!     .cohens_d(0.5)
//!     .resid(0.3)
//!     .participant_slope(0.1)
//!     .target_slope(0.1)
//!     .participant_x_target(0.1)
//!     .n_participants(40)
//!     .n_targets(40)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.n_participants(), 40);
//! assert_eq!(params.alpha(), 0.05);
//! ```
//!
//! # Defaults
//!
//! | parameter | default |
//! |---|---|
//! | `cohens_d` | 0.5 |
//! | `resid` | 1.0 |
//! | intercept, slope and interaction variances | 0.05 |
//! | `n_participants`, `n_targets` | 100 |
//! | `alpha` | 0.05 |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::design::DesignParameters;
use crate::error::{Error, Result};
use crate::validate;

/// Builder for [`DesignParameters`].
///
/// Every setter stores its value unchecked; [`DesignBuilder::build`] runs the
/// input validator once over the whole bundle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DesignBuilder {
    cohens_d: f64,
    resid: f64,
    participant_intercept: f64,
    target_intercept: f64,
    participant_slope: f64,
    target_slope: f64,
    participant_x_target: f64,
    n_participants: u32,
    n_targets: u32,
    alpha: f64,
}

impl Default for DesignBuilder {
    fn default() -> Self {
        Self {
            cohens_d: 0.5,
            resid: 1.0,
            participant_intercept: 0.05,
            target_intercept: 0.05,
            participant_slope: 0.05,
            target_slope: 0.05,
            participant_x_target: 0.05,
            n_participants: 100,
            n_targets: 100,
            alpha: 0.05,
        }
    }
}

impl DesignBuilder {
    /// Create a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the standardized condition effect. Only its magnitude matters.
    #[must_use]
    pub fn cohens_d(mut self, cohens_d: f64) -> Self {
        self.cohens_d = cohens_d;
        self
    }

    /// Set the residual variance.
    #[must_use]
    pub fn resid(mut self, resid: f64) -> Self {
        self.resid = resid;
        self
    }

    /// Set the random-intercept variance across participants.
    #[must_use]
    pub fn participant_intercept(mut self, variance: f64) -> Self {
        self.participant_intercept = variance;
        self
    }

    /// Set the random-intercept variance across targets.
    #[must_use]
    pub fn target_intercept(mut self, variance: f64) -> Self {
        self.target_intercept = variance;
        self
    }

    /// Set the condition-slope variance across participants.
    #[must_use]
    pub fn participant_slope(mut self, variance: f64) -> Self {
        self.participant_slope = variance;
        self
    }

    /// Set the condition-slope variance across targets.
    #[must_use]
    pub fn target_slope(mut self, variance: f64) -> Self {
        self.target_slope = variance;
        self
    }

    /// Set the participant × target condition-interaction variance.
    #[must_use]
    pub fn participant_x_target(mut self, variance: f64) -> Self {
        self.participant_x_target = variance;
        self
    }

    /// Set the number of participants.
    #[must_use]
    pub fn n_participants(mut self, n: u32) -> Self {
        self.n_participants = n;
        self
    }

    /// Set the number of targets.
    #[must_use]
    pub fn n_targets(mut self, n: u32) -> Self {
        self.n_targets = n;
        self
    }

    /// Set the Type-I error rate.
    #[must_use]
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Validate the inputs and build the parameter bundle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] naming the first input outside its
    /// domain.
    ///
    /// # Example
    ///
    /// ```
    /// use mixedpower::{DesignBuilder, Error};
    ///
    /// let err = DesignBuilder::new().n_targets(1).build().unwrap_err();
    /// assert!(matches!(err, Error::InvalidParameter { name: "n_targets", .. }));
    /// ```
    pub fn build(self) -> Result<DesignParameters> {
        let params = DesignParameters {
            cohens_d: self.cohens_d,
            resid: self.resid,
            participant_intercept: self.participant_intercept,
            target_intercept: self.target_intercept,
            participant_slope: self.participant_slope,
            target_slope: self.target_slope,
            participant_x_target: self.participant_x_target,
            n_participants: self.n_participants,
            n_targets: self.n_targets,
            alpha: self.alpha,
        };
        validate::validate_design(&params)?;
        Ok(params)
    }
}

impl From<DesignParameters> for DesignBuilder {
    fn from(params: DesignParameters) -> Self {
        Self {
            cohens_d: params.cohens_d,
            resid: params.resid,
            participant_intercept: params.participant_intercept,
            target_intercept: params.target_intercept,
            participant_slope: params.participant_slope,
            target_slope: params.target_slope,
            participant_x_target: params.participant_x_target,
            n_participants: params.n_participants,
            n_targets: params.n_targets,
            alpha: params.alpha,
        }
    }
}

impl TryFrom<DesignBuilder> for DesignParameters {
    type Error = Error;

    fn try_from(builder: DesignBuilder) -> Result<Self> {
        builder.build()
    }
}
