//! Distribution functions for the power calculation.
//!
//! Provides:
//! - Central t quantile and CDF (statrs `StudentsT`)
//! - Noncentral t CDF (twin-series expansion of Lenth, AS 243, with the
//!   later rounding-error safeguards), built on statrs special functions
//!
//! Degrees of freedom and noncentrality are real-valued throughout, so the
//! Satterthwaite df and the continuous sample-size relaxation need no
//! rounding.

use std::f64::consts::{LN_2, PI};

use statrs::distribution::{Continuous, ContinuousCDF, StudentsT};
use statrs::function::beta::beta_reg;
use statrs::function::erf::erfc;
use statrs::function::gamma::ln_gamma;

use crate::error::{Error, Result};

/// Convergence bound on the series error.
const ERROR_BOUND: f64 = 1e-12;
/// Newton steps applied on top of the closed-form t quantile.
const QUANTILE_POLISH_STEPS: usize = 3;
/// Iteration cap of the twin series.
const MAX_TERMS: usize = 1000;
/// Beyond this many degrees of freedom the normal approximation is used.
const LARGE_DF: f64 = 4e5;
/// `exp(-lambda / 2)` underflows past this noncentrality squared.
const LARGE_LAMBDA: f64 = 2.0 * LN_2 * 1021.0;

/// Standard normal CDF.
#[must_use]
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

fn central_t(df: f64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, df)
        .map_err(|e| Error::degenerate(format!("no t distribution with {df} degrees of freedom: {e}")))
}

/// Quantile of the central t distribution.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `p` is not strictly between 0 and
/// 1, and [`Error::DegenerateModel`] if `df` is not a positive number or the
/// quantile is not finite.
pub fn t_quantile(p: f64, df: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(Error::invalid_parameter(
            "probability",
            format!("t quantile needs a probability in (0, 1), got {p}"),
        ));
    }
    let dist = central_t(df)?;
    let mut q = dist.inverse_cdf(p);

    // Newton polish of the closed-form quantile against the CDF.
    for _ in 0..QUANTILE_POLISH_STEPS {
        let density = dist.pdf(q);
        if !q.is_finite() || density <= 0.0 {
            break;
        }
        let step = (dist.cdf(q) - p) / density;
        q -= step;
        if step.abs() <= f64::EPSILON * q.abs().max(1.0) {
            break;
        }
    }
    if !q.is_finite() {
        return Err(Error::degenerate(format!(
            "t quantile at {p} with {df} degrees of freedom is not finite"
        )));
    }
    Ok(q)
}

/// CDF of the central t distribution.
///
/// # Errors
///
/// Returns [`Error::DegenerateModel`] if `df` is not a positive number.
pub fn t_cdf(t: f64, df: f64) -> Result<f64> {
    Ok(central_t(df)?.cdf(t))
}

/// CDF of the noncentral t distribution, `P(T' <= t)`.
///
/// # Arguments
/// * `t` - Evaluation point
/// * `df` - Degrees of freedom (> 0, real)
/// * `ncp` - Noncentrality parameter
///
/// # Errors
///
/// Returns [`Error::DegenerateModel`] if `df` is not a positive number.
pub fn noncentral_t_cdf(t: f64, df: f64, ncp: f64) -> Result<f64> {
    if df.is_nan() || df <= 0.0 {
        return Err(Error::degenerate(format!(
            "no t distribution with {df} degrees of freedom"
        )));
    }
    if ncp == 0.0 {
        return t_cdf(t, df);
    }
    if t.is_infinite() {
        return Ok(if t > 0.0 { 1.0 } else { 0.0 });
    }
    if t < 0.0 && ncp > 40.0 {
        return Ok(0.0);
    }

    // Reflect negative t so the series always runs on |t|.
    let (negated, tt, del) = if t >= 0.0 {
        (false, t, ncp)
    } else {
        (true, -t, -ncp)
    };

    if df > LARGE_DF || del * del > LARGE_LAMBDA {
        // Abramowitz & Stegun 26.7.10
        let s = 1.0 / (4.0 * df);
        let z = (tt * (1.0 - s) - del) / (1.0 + tt * tt * 2.0 * s).sqrt();
        let lower = normal_cdf(z);
        return Ok(if negated { 1.0 - lower } else { lower });
    }

    let x = tt * tt / (tt * tt + df);
    let mut tnc = 0.0;

    if x > 0.0 {
        let lambda = del * del;
        let mut p = 0.5 * (-0.5 * lambda).exp();
        let mut q = (2.0 / PI).sqrt() * p * del;
        let mut s = 0.5 - p;
        if s < 1e-7 {
            s = -0.5 * (-0.5 * lambda).exp_m1();
        }

        let mut a = 0.5;
        let b = 0.5 * df;
        let rxb = (1.0 - x).powf(b);
        let ln_beta = 0.5 * PI.ln() + ln_gamma(b) - ln_gamma(0.5 + b);

        let mut xodd = beta_reg(a, b, x);
        let mut godd = 2.0 * rxb * (a * x.ln() - ln_beta).exp();
        let bx = b * x;
        let mut xeven = if bx < f64::EPSILON { bx } else { 1.0 - rxb };
        let mut geven = bx * rxb;
        tnc = p * xodd + q * xeven;

        let mut converged = false;
        for it in 1..=MAX_TERMS {
            #[allow(clippy::cast_precision_loss)]
            let k = it as f64;
            a += 1.0;
            xodd -= godd;
            xeven -= geven;
            godd *= x * (a + b - 1.0) / a;
            geven *= x * (a + b - 0.5) / (a + 0.5);
            p *= lambda / (2.0 * k);
            q *= lambda / (2.0 * k + 1.0);
            tnc += p * xodd + q * xeven;
            s -= p;

            if s < -1e-10 {
                tracing::warn!(t, df, ncp, "noncentral t series lost precision after {it} terms");
                converged = true;
                break;
            }
            if s <= 0.0 && it > 1 {
                converged = true;
                break;
            }
            if (2.0 * s * (xodd - godd)).abs() < ERROR_BOUND {
                converged = true;
                break;
            }
        }
        if !converged {
            tracing::warn!(t, df, ncp, "noncentral t series stopped at {MAX_TERMS} terms");
        }
    }

    tnc += normal_cdf(-del);
    let tnc = tnc.min(1.0);
    Ok(if negated { 1.0 - tnc } else { tnc })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_cdf_known_values() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-15);
        assert!((normal_cdf(1.959_963_984_540_054) - 0.975).abs() < 1e-12);
        assert!((normal_cdf(-1.0) - 0.158_655_253_931_457_05).abs() < 1e-12);
    }

    #[test]
    fn test_t_quantile_known() {
        // t(10) two-sided 95% critical value
        assert!((t_quantile(0.975, 10.0).unwrap() - 2.228_138_851_986).abs() < 1e-6);
        // Symmetry
        let upper = t_quantile(0.9, 7.5).unwrap();
        let lower = t_quantile(0.1, 7.5).unwrap();
        assert!((upper + lower).abs() < 1e-9);
    }

    #[test]
    fn test_t_quantile_rejects_degenerate_probabilities() {
        for p in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                t_quantile(p, 10.0),
                Err(Error::InvalidParameter {
                    name: "probability",
                    ..
                })
            ));
        }
        let tiny = t_quantile(5e-17, 86.0).unwrap();
        assert!(tiny.is_finite() && tiny < -8.0);
    }

    #[test]
    fn test_t_quantile_rejects_bad_df() {
        assert!(matches!(
            t_quantile(0.975, 0.0),
            Err(Error::DegenerateModel { .. })
        ));
        assert!(noncentral_t_cdf(1.0, -2.0, 1.0).is_err());
        assert!(noncentral_t_cdf(1.0, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_noncentral_t_cdf_reference_values() {
        // Reference values from direct numerical integration.
        let cases = [
            (2.0, 10.0, 1.0, 0.807_611_562_530_375),
            (-1.0, 5.0, 0.5, 0.082_444_091_056_723_5),
            (3.0, 30.0, 2.5, 0.670_922_137_281_833),
            (-2.0, 10.0, 1.0, 0.003_302_485_766_631_59),
        ];
        for (t, df, ncp, expected) in cases {
            let got = noncentral_t_cdf(t, df, ncp).unwrap();
            assert!(
                (got - expected).abs() < 1e-8,
                "F({t}; {df}, {ncp}) = {got}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_noncentral_t_cdf_zero_ncp_is_central() {
        let got = noncentral_t_cdf(1.0, 20.0, 0.0).unwrap();
        assert!((got - 0.835_371_711_414_145).abs() < 1e-9);
        assert!((got - t_cdf(1.0, 20.0).unwrap()).abs() < 1e-15);
    }

    #[test]
    fn test_noncentral_t_cdf_small_ncp_matches_central() {
        let central = t_cdf(1.5, 12.0).unwrap();
        let nearly = noncentral_t_cdf(1.5, 12.0, 1e-10).unwrap();
        assert!((central - nearly).abs() < 1e-8);
    }

    #[test]
    fn test_noncentral_t_cdf_bounds() {
        assert_eq!(noncentral_t_cdf(f64::INFINITY, 5.0, 1.0).unwrap(), 1.0);
        assert_eq!(noncentral_t_cdf(f64::NEG_INFINITY, 5.0, 1.0).unwrap(), 0.0);
        assert_eq!(noncentral_t_cdf(-1.0, 5.0, 50.0).unwrap(), 0.0);

        let at_zero = noncentral_t_cdf(0.0, 8.0, 1.3).unwrap();
        assert!((at_zero - normal_cdf(-1.3)).abs() < 1e-12);
    }

    #[test]
    fn test_noncentral_t_cdf_large_df_uses_normal() {
        // With df beyond the series range the distribution is ~ N(ncp, 1).
        let got = noncentral_t_cdf(2.0, 1e6, 2.0).unwrap();
        assert!((got - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_noncentral_t_cdf_monotone_in_t() {
        let mut previous = 0.0;
        for i in -40..=40 {
            let t = f64::from(i) * 0.25;
            let value = noncentral_t_cdf(t, 15.0, 1.7).unwrap();
            assert!(value >= previous - 1e-12);
            previous = value;
        }
    }
}
