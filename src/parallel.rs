//! Parallel batch evaluation.
//!
//! Power queries and solves are independent pure functions, so batches of
//! them parallelise without coordination. Enable with the `parallel`
//! feature flag.
//!
//! # Usage
//!
//! ```ignore
//! use mixedpower::parallel::par_power_many;
//! use mixedpower::{Design, DesignParameters};
//!
//! let designs: Vec<DesignParameters> = (10..50)
//!     .map(|n| DesignParameters::builder().n_participants(n).build().unwrap())
//!     .collect();
//! let results = par_power_many(Design::Ccc, &designs);
//! assert_eq!(results.len(), designs.len());
//! ```
//!
//! # Performance
//!
//! A single power evaluation takes microseconds, so parallelism pays off for
//! large grids and for batches of solves, each of which runs dozens of
//! evaluations.

use ndarray::Array2;
use rayon::prelude::*;

use crate::design::{Design, DesignParameters, FreeVariable};
use crate::error::Result;
use crate::power::{power, solve, PowerResult, SolveResult, SolverConfig};
use crate::sweep::check_axis;

/// Power for each parameter bundle, in input order.
#[must_use]
pub fn par_power_many(design: Design, params: &[DesignParameters]) -> Vec<Result<PowerResult>> {
    params.par_iter().map(|p| power(design, p)).collect()
}

/// Solve `variable` for each target power, in input order.
#[must_use]
pub fn par_solve_many(
    design: Design,
    variable: FreeVariable,
    target_powers: &[f64],
    params: &DesignParameters,
    config: &SolverConfig,
) -> Vec<Result<SolveResult>> {
    target_powers
        .par_iter()
        .map(|&target| solve(design, variable, target, params, config))
        .collect()
}

/// Parallel version of [`power_grid`](crate::power_grid).
///
/// # Errors
///
/// Same as [`power_grid`](crate::power_grid); the first failing cell in
/// row-major order is reported.
pub fn par_power_grid(
    design: Design,
    params: &DesignParameters,
    participants: &[u32],
    targets: &[u32],
) -> Result<Array2<f64>> {
    check_axis("participants", participants)?;
    check_axis("targets", targets)?;

    let cells: Vec<f64> = participants
        .iter()
        .flat_map(|&p| targets.iter().map(move |&q| (p, q)))
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(p, q)| -> Result<f64> {
            let cell = params
                .with(FreeVariable::NParticipants, f64::from(p))?
                .with(FreeVariable::NTargets, f64::from(q))?;
            Ok(power(design, &cell)?.power)
        })
        .collect::<Result<_>>()?;

    // Cells were produced in row-major order.
    let mut grid = Array2::zeros((participants.len(), targets.len()));
    for (slot, value) in grid.iter_mut().zip(cells) {
        *slot = value;
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power_grid;

    fn params() -> DesignParameters {
        DesignParameters::builder()
            .resid(0.3)
            .participant_intercept(0.2)
            .target_intercept(0.2)
            .participant_slope(0.1)
            .target_slope(0.1)
            .participant_x_target(0.1)
            .n_targets(30)
            .build()
            .unwrap()
    }

    #[test]
    fn test_par_power_many_keeps_order() {
        let designs: Vec<_> = (2..30)
            .map(|n| params().to_builder().n_participants(n).build().unwrap())
            .collect();
        let parallel = par_power_many(Design::Ccc, &designs);
        for (design, result) in designs.iter().zip(parallel) {
            assert_eq!(result.unwrap(), power(Design::Ccc, design).unwrap());
        }
    }

    #[test]
    fn test_par_solve_many_matches_sequential() {
        let targets = [0.5, 0.8, 0.9];
        let config = SolverConfig::default();
        let parallel = par_solve_many(
            Design::Ccc,
            FreeVariable::NParticipants,
            &targets,
            &params(),
            &config,
        );
        assert_eq!(parallel[1].as_ref().unwrap().value, 26.0);
        for (&target, result) in targets.iter().zip(parallel) {
            let sequential = solve(
                Design::Ccc,
                FreeVariable::NParticipants,
                target,
                &params(),
                &config,
            )
            .unwrap();
            assert_eq!(result.unwrap(), sequential);
        }
    }

    #[test]
    fn test_par_power_grid_matches_sequential() {
        let participants = [5, 10, 20, 40];
        let targets = [3, 30];
        let parallel = par_power_grid(Design::Ccc, &params(), &participants, &targets).unwrap();
        let sequential = power_grid(Design::Ccc, &params(), &participants, &targets).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_par_power_grid_reports_errors() {
        assert!(par_power_grid(Design::Ccc, &params(), &[10], &[]).is_err());
        assert!(par_power_grid(Design::Ccc, &params(), &[0, 10], &[10]).is_err());
    }
}
