//! Power over a grid of sample sizes.
//!
//! A grid answers the planning question "which combinations of participants
//! and targets are enough?" in one call. Rows follow `participants`, columns
//! follow `targets`.

use ndarray::Array2;

use crate::design::{Design, DesignParameters, FreeVariable};
use crate::error::{Error, Result};
use crate::power::power;

/// Power for every `(n_participants, n_targets)` pair.
///
/// All other parameters are taken from `params`.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if either axis is empty or holds a
/// sample size below 2, and propagates any error of the underlying power
/// calculation.
///
/// # Example
///
/// ```
/// use mixedpower::{power_grid, Design, DesignParameters};
///
/// let params = DesignParameters::builder().build().unwrap();
/// let grid = power_grid(Design::Ccc, &params, &[10, 20, 40], &[10, 20]).unwrap();
///
/// assert_eq!(grid.dim(), (3, 2));
/// assert!(grid[[2, 1]] >= grid[[0, 0]]);
/// ```
pub fn power_grid(
    design: Design,
    params: &DesignParameters,
    participants: &[u32],
    targets: &[u32],
) -> Result<Array2<f64>> {
    check_axis("participants", participants)?;
    check_axis("targets", targets)?;

    let mut grid = Array2::zeros((participants.len(), targets.len()));
    for (i, &n_participants) in participants.iter().enumerate() {
        let row = params.with(FreeVariable::NParticipants, f64::from(n_participants))?;
        for (j, &n_targets) in targets.iter().enumerate() {
            let cell = row.with(FreeVariable::NTargets, f64::from(n_targets))?;
            grid[[i, j]] = power(design, &cell)?.power;
        }
    }
    Ok(grid)
}

pub(crate) fn check_axis(name: &'static str, sizes: &[u32]) -> Result<()> {
    if sizes.is_empty() {
        return Err(Error::invalid_parameter(name, "grid axis is empty"));
    }
    Ok(())
}
