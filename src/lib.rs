//! # mixedpower
//!
//! Power and sample-size approximation for experiments analysed with linear
//! mixed-effects models.
//!
//! ## Overview
//!
//! In a CCC design a two-level condition is crossed with both participants
//! and targets (stimuli), and every participant responds to every target in
//! both conditions. The condition effect is then tested against variance
//! from residual noise, from random condition slopes across participants and
//! across targets, and from their interaction.
//!
//! This library provides:
//! - Power of the two-sided condition-effect test via the noncentral t
//!   distribution with Satterthwaite degrees of freedom
//! - Solving any single input (sample sizes, effect size, alpha or a variance
//!   component) for a target power
//! - Power grids over participant and target counts
//!
//! ## Quick Start
//!
//! ```rust
//! use mixedpower::{power, solve, Design, DesignBuilder, FreeVariable, SolverConfig};
//!
//! let params = DesignBuilder::new()
//!     .cohens_d(0.5)
//!     .resid(0.3)
//!     .participant_intercept(0.2)
//!     .target_intercept(0.2)
//!     .participant_slope(0.1)
//!     .target_slope(0.1)
//!     .participant_x_target(0.1)
//!     .n_participants(40)
//!     .n_targets(40)
//!     .build()
//!     .unwrap();
//!
//! let result = power(Design::Ccc, &params).unwrap();
//! assert!(result.power > 0.9);
//!
//! let needed = solve(
//!     Design::Ccc,
//!     FreeVariable::NParticipants,
//!     0.8,
//!     &params.to_builder().n_targets(30).build().unwrap(),
//!     &SolverConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(needed.value, 26.0);
//! ```
//!
//! ## Notation
//!
//! - **d**: standardized condition effect (Cohen's d)
//! - **p**, **q**: numbers of participants and targets
//! - **df**: Satterthwaite-approximated degrees of freedom of the test
//!
//! ## Features
//!
//! - `serde`: Enable serialization of parameters, configs and results
//! - `parallel`: Enable parallel batch evaluation using rayon
//! - `python`: Enable Python bindings via PyO3

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod design;
pub mod error;
pub mod power;
#[cfg(feature = "python")]
pub mod python;
pub mod sweep;
pub mod validate;

#[cfg(feature = "parallel")]
pub mod parallel;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builder::DesignBuilder;
    pub use crate::design::{Design, DesignParameters, Domain, FreeVariable, Monotonicity};
    pub use crate::error::{Error, Result};
    pub use crate::power::{
        calculate_power, power, solve, PowerDetails, PowerResult, SampleSizeRounding,
        SolveResult, SolverConfig, VarianceComponentModel,
    };
    pub use crate::sweep::power_grid;

    #[cfg(feature = "parallel")]
    pub use crate::parallel::{par_power_grid, par_power_many, par_solve_many};
}

// Re-export commonly used items at crate root
pub use builder::DesignBuilder;
pub use design::{Design, DesignParameters, FreeVariable};
pub use error::{Error, Result};
pub use power::{
    power, solve, PowerResult, SampleSizeRounding, SolveResult, SolverConfig,
    VarianceComponentModel,
};
pub use sweep::power_grid;

#[cfg(feature = "parallel")]
pub use parallel::{par_power_grid, par_power_many, par_solve_many};
