//! Inversion of the power function for one free variable.
//!
//! # Algorithm
//!
//! 1. Orient the objective `f(x) = power(x) - target` so it increases with
//!    `x` (flip the sign for variables power decreases in).
//! 2. Starting at the bracket hint, step geometrically toward the side the
//!    sign of `f` points to, staying inside the variable's domain, until the
//!    sign changes. Inclusive bounds are probed directly.
//! 3. Bisect the bracket until `|f| < tolerance`.
//! 4. Sample sizes are solved over the reals and then rounded; the default
//!    ceiling rule returns the smallest whole size whose power reaches the
//!    target to within the tolerance.
//!
//! Both loops are capped by [`SolverConfig`], and running out of either
//! budget, or a bracket that collapses onto a jump, is reported as an error.

use tracing::{debug, trace};

use super::engine::{calculate_power, calculate_power_relaxed};
use super::types::{PowerResult, SampleSizeRounding, SolveResult, SolverConfig};
use crate::design::{DesignParameters, Domain, FreeVariable, Monotonicity};
use crate::error::{Error, Result};
use crate::validate::{validate_solver_config, validate_target_power};

/// Solve for the value of `variable` at which power equals `target_power`.
///
/// The current value of `variable` in `params` is ignored.
pub fn solve_for(
    variable: FreeVariable,
    target_power: f64,
    params: &DesignParameters,
    config: &SolverConfig,
) -> Result<SolveResult> {
    validate_target_power(target_power)?;
    validate_solver_config(config, variable)?;

    let mut objective = Objective {
        variable,
        target: target_power,
        params,
        evaluations: 0,
    };

    let root = match find_bracket(&mut objective, config)? {
        Search::Root(x) => x,
        Search::Bracket(bracket) => bisect(&mut objective, bracket, config)?,
    };

    let (value, result) = if variable.is_integer() {
        settle_whole(&mut objective, root, config)?
    } else {
        (root, objective.power_at(root)?)
    };

    debug!(
        %variable,
        target = target_power,
        value,
        power = result.power,
        evaluations = objective.evaluations,
        "solved"
    );

    Ok(SolveResult {
        value,
        df: result.df,
        power: result.power,
        evaluations: objective.evaluations,
    })
}

struct Objective<'a> {
    variable: FreeVariable,
    target: f64,
    params: &'a DesignParameters,
    evaluations: usize,
}

impl Objective<'_> {
    /// Power with the free variable set to `x` (sample sizes may be fractional).
    fn power_at(&mut self, x: f64) -> Result<PowerResult> {
        self.evaluations += 1;
        match self.variable {
            FreeVariable::NParticipants => {
                calculate_power_relaxed(self.params, x, f64::from(self.params.n_targets()))
            }
            FreeVariable::NTargets => {
                calculate_power_relaxed(self.params, f64::from(self.params.n_participants()), x)
            }
            other => calculate_power(&self.params.with(other, x)?),
        }
    }

    /// Power with a whole-number sample size, through the public path.
    fn power_whole(&mut self, n: f64) -> Result<PowerResult> {
        self.evaluations += 1;
        calculate_power(&self.params.with(self.variable, n)?)
    }

    /// `power - target`, oriented to increase with `x`.
    fn oriented(&mut self, x: f64) -> Result<f64> {
        let gap = self.power_at(x)?.power - self.target;
        Ok(match self.variable.monotonicity() {
            Monotonicity::Increasing => gap,
            Monotonicity::Decreasing => -gap,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Bracket {
    lo: f64,
    hi: f64,
}

enum Search {
    Root(f64),
    Bracket(Bracket),
}

fn find_bracket(objective: &mut Objective<'_>, config: &SolverConfig) -> Result<Search> {
    let variable = objective.variable;
    let target = objective.target;
    let domain = variable.domain();
    let factor = config.expansion_factor;

    let mut x = config.bracket_hint.unwrap_or_else(|| variable.default_hint());
    let mut g = objective.oriented(x)?;
    if g.abs() < config.tolerance {
        return Ok(Search::Root(x));
    }

    let unbounded = |expansions| Error::UnboundedSearch {
        variable: variable.name(),
        target,
        expansions,
    };

    for expansion in 1..=config.max_expansions {
        let next = if g < 0.0 {
            grow(&domain, x, factor)
        } else {
            shrink(&domain, x, factor)
        };

        let Some(next) = next else {
            // Already at the lower bound and still above target: the smallest
            // admissible sample size is sufficient.
            if g > 0.0 && variable.is_integer() {
                debug!(%variable, value = x, "target met at the minimum sample size");
                return Ok(Search::Root(x));
            }
            return Err(unbounded(expansion - 1));
        };

        let g_next = objective.oriented(next)?;
        trace!(%variable, x = next, residual = g_next, expansion, "bracket probe");

        if g_next.abs() < config.tolerance {
            return Ok(Search::Root(next));
        }
        if (g < 0.0) != (g_next < 0.0) {
            let bracket = if x < next {
                Bracket { lo: x, hi: next }
            } else {
                Bracket { lo: next, hi: x }
            };
            debug!(%variable, lo = bracket.lo, hi = bracket.hi, expansion, "bracket found");
            return Ok(Search::Bracket(bracket));
        }

        x = next;
        g = g_next;
    }

    if g > 0.0 && variable.is_integer() && x <= domain.lower {
        return Ok(Search::Root(x));
    }
    Err(unbounded(config.max_expansions))
}

/// Next probe above `x`, or `None` once the domain is exhausted.
///
/// Steps geometrically while that stays below the upper bound, then probes
/// an inclusive bound directly or halves the gap to an exclusive one.
fn grow(domain: &Domain, x: f64, factor: f64) -> Option<f64> {
    let geometric = if x > 0.0 { x * factor } else { 1.0 };
    let next = if geometric < domain.upper {
        geometric
    } else if domain.upper_inclusive {
        domain.upper
    } else {
        domain.upper - (domain.upper - x) / factor
    };
    (next > x && domain.contains(next)).then_some(next)
}

/// Next probe below `x`, or `None` once the domain is exhausted.
fn shrink(domain: &Domain, x: f64, factor: f64) -> Option<f64> {
    let next = if domain.lower_inclusive {
        domain.lower
    } else {
        domain.lower + (x - domain.lower) / factor
    };
    (next < x && domain.contains(next)).then_some(next)
}

fn bisect(objective: &mut Objective<'_>, bracket: Bracket, config: &SolverConfig) -> Result<f64> {
    let Bracket { mut lo, mut hi } = bracket;
    let mut residual = f64::NAN;

    for iteration in 1..=config.max_iterations {
        let mid = 0.5 * (lo + hi);
        residual = objective.oriented(mid)?;
        trace!(variable = %objective.variable, lo, hi, mid, residual, iteration, "bisection step");

        if residual.abs() < config.tolerance {
            return Ok(mid);
        }
        if residual < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= f64::EPSILON * mid.abs().max(1.0) {
            // A bracket that shrinks to a point without meeting the tolerance
            // straddles a jump, not a root.
            debug!(variable = %objective.variable, mid, residual, iteration, "bracket collapsed");
            return Err(Error::NoConvergence {
                variable: objective.variable.name(),
                iterations: iteration,
                residual,
            });
        }
    }

    Err(Error::NoConvergence {
        variable: objective.variable.name(),
        iterations: config.max_iterations,
        residual,
    })
}

/// Turn a real-valued sample-size root into the reported value.
fn settle_whole(
    objective: &mut Objective<'_>,
    root: f64,
    config: &SolverConfig,
) -> Result<(f64, PowerResult)> {
    let minimum = objective.variable.domain().lower;

    match config.rounding {
        SampleSizeRounding::Continuous => Ok((root, objective.power_at(root)?)),
        SampleSizeRounding::Nearest => {
            let n = root.round().max(minimum);
            Ok((n, objective.power_whole(n)?))
        }
        SampleSizeRounding::Ceiling => {
            // Powers within the tolerance of the target count as reaching it,
            // so a flat objective settles at the minimum instead of on noise.
            let target = objective.target - config.tolerance;
            let mut n = root.ceil().max(minimum);
            let mut result = objective.power_whole(n)?;

            // The bisection tolerance can leave the root a hair on either
            // side of a whole number; settle against the integer neighbours.
            let mut steps = 0;
            while result.power < target {
                steps += 1;
                if steps > config.max_iterations {
                    return Err(Error::NoConvergence {
                        variable: objective.variable.name(),
                        iterations: steps - 1,
                        residual: result.power - objective.target,
                    });
                }
                n += 1.0;
                result = objective.power_whole(n)?;
            }
            while n > minimum {
                let below = objective.power_whole(n - 1.0)?;
                if below.power < target {
                    break;
                }
                n -= 1.0;
                result = below;
            }
            Ok((n, result))
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::DesignBuilder;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn solved_sample_size_never_exceeds_generating_size(
            cohens_d in 0.2f64..1.5,
            resid in 0.05f64..2.0,
            participant_slope in 0.0f64..0.5,
            target_slope in 0.0f64..0.5,
            participant_x_target in 0.0f64..0.5,
            n_participants in 10u32..80,
            n_targets in 10u32..80,
        ) {
            let params = DesignBuilder::new()
                .cohens_d(cohens_d)
                .resid(resid)
                .participant_slope(participant_slope)
                .target_slope(target_slope)
                .participant_x_target(participant_x_target)
                .n_participants(n_participants)
                .n_targets(n_targets)
                .build()
                .unwrap();
            let achieved = calculate_power(&params).unwrap().power;
            prop_assume!(achieved > params.alpha() + 1e-6 && achieved < 0.999);

            let result = solve_for(
                FreeVariable::NParticipants,
                achieved,
                &params,
                &SolverConfig::default(),
            )
            .unwrap();
            prop_assert!(result.value <= f64::from(n_participants));
            prop_assert!(result.power >= achieved - SolverConfig::default().tolerance);
        }
    }
}
