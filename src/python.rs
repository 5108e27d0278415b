//! Python bindings for mixedpower.
//!
//! This module exposes power calculation and solving to Python using PyO3,
//! with the keyword arguments and defaults of the `mixedpower` Python
//! package. Enable the `python` feature to use this.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::design::{Design, DesignParameters, FreeVariable};
use crate::power::{SampleSizeRounding, SolverConfig};
use crate::Error;

fn to_py_err(e: Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

#[allow(clippy::too_many_arguments)]
fn parameters(
    cohens_d: f64,
    resid: f64,
    target_intercept: f64,
    participant_intercept: f64,
    participant_x_target: f64,
    target_slope: f64,
    participant_slope: f64,
    n_participants: u32,
    n_targets: u32,
    alpha: f64,
) -> PyResult<DesignParameters> {
    DesignParameters::builder()
        .cohens_d(cohens_d)
        .resid(resid)
        .target_intercept(target_intercept)
        .participant_intercept(participant_intercept)
        .participant_x_target(participant_x_target)
        .target_slope(target_slope)
        .participant_slope(participant_slope)
        .n_participants(n_participants)
        .n_targets(n_targets)
        .alpha(alpha)
        .build()
        .map_err(to_py_err)
}

fn rounding(code: &str) -> PyResult<SampleSizeRounding> {
    match code.to_ascii_lowercase().as_str() {
        "ceiling" | "ceil" => Ok(SampleSizeRounding::Ceiling),
        "nearest" | "round" => Ok(SampleSizeRounding::Nearest),
        "continuous" | "none" => Ok(SampleSizeRounding::Continuous),
        other => Err(PyValueError::new_err(format!(
            "unknown rounding code `{other}`; expected ceiling, nearest or continuous"
        ))),
    }
}

/// Power of a design. Returns `(power, df)`.
///
/// `code` is accepted for compatibility with older callers and has no
/// effect on the result.
#[pyfunction]
#[pyo3(signature = (
    design="CCC",
    cohens_d=0.5,
    resid=1.0,
    target_intercept=0.05,
    participant_intercept=0.05,
    participant_x_target=0.05,
    target_slope=0.05,
    participant_slope=0.05,
    n_participants=100,
    n_targets=100,
    code=None,
    alpha=0.05
))]
#[allow(clippy::too_many_arguments, clippy::needless_pass_by_value)]
fn power(
    design: &str,
    cohens_d: f64,
    resid: f64,
    target_intercept: f64,
    participant_intercept: f64,
    participant_x_target: f64,
    target_slope: f64,
    participant_slope: f64,
    n_participants: u32,
    n_targets: u32,
    code: Option<&PyAny>,
    alpha: f64,
) -> PyResult<(f64, f64)> {
    let _ = code;
    let design: Design = design.parse().map_err(to_py_err)?;
    let params = parameters(
        cohens_d,
        resid,
        target_intercept,
        participant_intercept,
        participant_x_target,
        target_slope,
        participant_slope,
        n_participants,
        n_targets,
        alpha,
    )?;
    let result = crate::power::power(design, &params).map_err(to_py_err)?;
    Ok((result.power, result.df))
}

/// Value of `variable` reaching power `p`. Returns `(value, df)`.
///
/// The keyword matching `variable` is ignored.
#[pyfunction]
#[pyo3(signature = (
    variable="n_participants",
    p=0.8,
    design="CCC",
    cohens_d=0.5,
    resid=1.0,
    target_intercept=0.05,
    participant_intercept=0.05,
    participant_x_target=0.05,
    target_slope=0.05,
    participant_slope=0.05,
    n_participants=100,
    n_targets=100,
    alpha=0.05,
    code="ceiling"
))]
#[allow(clippy::too_many_arguments)]
fn solve(
    variable: &str,
    p: f64,
    design: &str,
    cohens_d: f64,
    resid: f64,
    target_intercept: f64,
    participant_intercept: f64,
    participant_x_target: f64,
    target_slope: f64,
    participant_slope: f64,
    n_participants: u32,
    n_targets: u32,
    alpha: f64,
    code: &str,
) -> PyResult<(f64, f64)> {
    let design: Design = design.parse().map_err(to_py_err)?;
    let variable: FreeVariable = variable.parse().map_err(to_py_err)?;
    let params = parameters(
        cohens_d,
        resid,
        target_intercept,
        participant_intercept,
        participant_x_target,
        target_slope,
        participant_slope,
        n_participants,
        n_targets,
        alpha,
    )?;
    let config = SolverConfig {
        rounding: rounding(code)?,
        ..SolverConfig::default()
    };
    let result =
        crate::power::solve(design, variable, p, &params, &config).map_err(to_py_err)?;
    Ok((result.value, result.df))
}

/// The mixedpower Python module.
#[pymodule]
fn mixedpower(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(power, m)?)?;
    m.add_function(wrap_pyfunction!(solve, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_codes() {
        assert_eq!(rounding("Ceiling").unwrap(), SampleSizeRounding::Ceiling);
        assert_eq!(rounding("round").unwrap(), SampleSizeRounding::Nearest);
        assert_eq!(rounding("none").unwrap(), SampleSizeRounding::Continuous);
    }

    #[test]
    fn test_power_ignores_code() {
        let (power_value, df) = power(
            "ccc", 0.5, 1.0, 0.05, 0.05, 0.05, 0.05, 0.05, 100, 100, None, 0.05,
        )
        .unwrap();
        let expected =
            crate::power::power(Design::Ccc, &DesignParameters::builder().build().unwrap())
                .unwrap();
        assert_eq!(power_value, expected.power);
        assert_eq!(df, expected.df);
    }

    #[test]
    fn test_solve_with_code() {
        let (value, _) = solve(
            "n_participants",
            0.8,
            "CCC",
            0.5,
            0.3,
            0.2,
            0.2,
            0.1,
            0.1,
            0.1,
            40,
            30,
            0.05,
            "ceiling",
        )
        .unwrap();
        assert_eq!(value, 26.0);
    }

    #[test]
    fn test_defaults_build() {
        let params = parameters(0.5, 1.0, 0.05, 0.05, 0.05, 0.05, 0.05, 100, 100, 0.05).unwrap();
        assert_eq!(params, DesignParameters::builder().build().unwrap());
    }
}
