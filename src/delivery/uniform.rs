//! Iterative uniformity solver (projected gradient).
//!
//! # Problem
//!
//! ```text
//! minimize    Σ (x[t] - Mp)²
//! subject to  minV <= V[t + 1] <= maxV,   x[t] >= 0
//! ```
//!
//! # Algorithm
//!
//! Projected gradient on the Lagrangian dual. With multipliers `lo[t]`,
//! `hi[t] >= 0` on the lower/upper bound of `V[t + 1]`, the primal
//! minimizer has the closed form
//!
//! ```text
//! x[s] = max(0, Mp - Σ_{t >= s} (hi[t] - lo[t]))
//! ```
//!
//! i.e. a period is pushed above `Mp` when some later level would dip under
//! `minV`, below `Mp` when some later level would exceed `maxV`, and then
//! projected back onto `x >= 0`. The multipliers take a gradient step along
//! the bound violations and are projected onto `>= 0`.
//!
//! The dual gradient stacks the lower and upper violations, so its
//! Lipschitz constant is `L = 2σ²`, where `σ` is the largest singular value
//! of the cumulative-sum operator mapping deliveries to levels. The plain
//! step is `step_scale * 2 / L`. With Nesterov momentum the step is
//! `step_scale / L`, and the momentum restarts whenever the last step
//! points against the extrapolation.
//!
//! Iteration starts at `lo = hi = 0`, i.e. `x = Mp`, and stops once both
//! the largest bound violation and the largest change in `x` fall below
//! `tol`. A final forward pass absorbs the sub-tolerance residual so that a
//! reported `ok` plan satisfies the bounds, not just approximately.
//!
//! # Reference
//! Bertsekas (2016), "Nonlinear Programming", Sec. 6.3 (dual projected
//! gradient); Beck & Teboulle (2009), "A fast iterative
//! shrinkage-thresholding algorithm" (momentum schedule); O'Donoghue &
//! Candès (2015), "Adaptive restart for accelerated gradient schemes"

use tracing::{debug, instrument, warn};

use super::config::UniformConfig;
use super::direct;
use crate::error::DeliveryError;
use crate::models::{DeliveryPlan, DeliveryProblem, UniformityResult};

/// Finds the most uniform feasible delivery sequence.
///
/// `p` is the per-period demand, `v0` the initial inventory, `max_iter` the
/// iteration budget and `tol` the convergence tolerance. Other solver
/// settings use [`UniformConfig::default`].
///
/// # Errors
/// Returns a [`DeliveryError`] for an empty horizon, non-finite input,
/// `min_v > max_v`, `max_iter == 0`, or a non-positive `tol`.
pub fn solve_uniform(
    p: &[f64],
    v0: f64,
    min_v: f64,
    max_v: f64,
    max_iter: usize,
    tol: f64,
) -> Result<UniformityResult, DeliveryError> {
    let config = UniformConfig::new(max_iter, tol)?;
    solve_uniform_with(&DeliveryProblem::new(p.to_vec(), v0, min_v, max_v), &config)
}

/// [`solve_uniform`] on a problem value with an explicit config.
///
/// # Errors
/// See [`solve_uniform`].
#[instrument(
    skip(problem, config),
    fields(periods = problem.horizon(), max_iter = config.max_iter())
)]
pub fn solve_uniform_with(
    problem: &DeliveryProblem,
    config: &UniformConfig,
) -> Result<UniformityResult, DeliveryError> {
    problem.validate()?;
    config.validate()?;

    let mp = problem.uniform_rate();
    let max_iter = config.max_iter();
    let periods = problem.horizon();

    if !direct::is_reachable(problem) {
        warn!(mp, "inventory window unreachable; skipping iterations");
        let x = vec![mp; periods];
        return Ok(UniformityResult {
            plan: DeliveryPlan::from_deliveries(x, problem.initial, &problem.demand),
            mp,
            ok: false,
            iters: 0,
            max_iter,
        });
    }

    let search = DualSearch::new(problem, config, mp);
    let (x, iters, converged) = search.run();

    if !converged {
        let plan = DeliveryPlan::from_deliveries(x, problem.initial, &problem.demand);
        warn!(
            iters,
            violation = plan.max_violation(problem.min_level, problem.max_level),
            "uniform solver did not converge"
        );
        return Ok(UniformityResult {
            plan,
            mp,
            ok: false,
            iters,
            max_iter,
        });
    }

    let plan = DeliveryPlan::from_deliveries(repair(problem, x), problem.initial, &problem.demand);
    let ok = plan.is_feasible(problem.min_level, problem.max_level);
    if ok {
        debug!(
            iters,
            mp,
            variance = plan.deviation_stats(mp).variance,
            "uniform solver converged"
        );
    } else {
        warn!(iters, "converged plan could not be repaired into the band");
    }

    Ok(UniformityResult {
        plan,
        mp,
        ok,
        iters,
        max_iter,
    })
}

/// Dual projected-gradient state.
struct DualSearch<'a> {
    problem: &'a DeliveryProblem,
    mp: f64,
    step: f64,
    tol: f64,
    max_iter: usize,
    accelerated: bool,
}

impl<'a> DualSearch<'a> {
    fn new(problem: &'a DeliveryProblem, config: &UniformConfig, mp: f64) -> Self {
        let sigma = cumulative_sum_norm(problem.horizon());
        let lipschitz = 2.0 * sigma * sigma;
        let step = if config.accelerated() {
            config.step_scale() / lipschitz
        } else {
            2.0 * config.step_scale() / lipschitz
        };
        Self {
            problem,
            mp,
            step,
            tol: config.tol(),
            max_iter: config.max_iter(),
            accelerated: config.accelerated(),
        }
    }

    /// Returns the final deliveries, the iterations used and whether the
    /// stopping test passed.
    fn run(&self) -> (Vec<f64>, usize, bool) {
        let periods = self.problem.horizon();
        let (min, max) = (self.problem.min_level, self.problem.max_level);

        let mut lower = vec![0.0; periods];
        let mut upper = vec![0.0; periods];
        let mut lower_ahead = lower.clone();
        let mut upper_ahead = upper.clone();
        let mut momentum = 1.0_f64;
        let mut x = vec![self.mp; periods];

        for iter in 1..=self.max_iter {
            let ahead_levels = self.levels(&self.primal(&lower_ahead, &upper_ahead));

            let next_lower: Vec<f64> = lower_ahead
                .iter()
                .zip(&ahead_levels)
                .map(|(l, v)| (l + self.step * (min - v)).max(0.0))
                .collect();
            let next_upper: Vec<f64> = upper_ahead
                .iter()
                .zip(&ahead_levels)
                .map(|(u, v)| (u + self.step * (v - max)).max(0.0))
                .collect();

            // Positive when the step undoes part of the extrapolation.
            let overshoot = alignment(&lower_ahead, &next_lower, &lower)
                + alignment(&upper_ahead, &next_upper, &upper);
            if self.accelerated && overshoot <= 0.0 {
                let next_momentum = 0.5 * (1.0 + (1.0 + 4.0 * momentum * momentum).sqrt());
                let beta = (momentum - 1.0) / next_momentum;
                lower_ahead = extrapolate(&next_lower, &lower, beta);
                upper_ahead = extrapolate(&next_upper, &upper, beta);
                momentum = next_momentum;
            } else {
                momentum = 1.0;
                lower_ahead.clone_from(&next_lower);
                upper_ahead.clone_from(&next_upper);
            }
            lower = next_lower;
            upper = next_upper;

            let next_x = self.primal(&lower, &upper);
            let step = next_x
                .iter()
                .zip(&x)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            x = next_x;

            let violation = self
                .levels(&x)
                .iter()
                .map(|&v| (min - v).max(v - max).max(0.0))
                .fold(0.0, f64::max);

            if violation < self.tol && step < self.tol {
                return (x, iter, true);
            }
        }

        (x, self.max_iter, false)
    }

    /// Closed-form primal minimizer for the given multipliers.
    fn primal(&self, lower: &[f64], upper: &[f64]) -> Vec<f64> {
        let mut x = vec![0.0; lower.len()];
        let mut pressure = 0.0;
        for s in (0..lower.len()).rev() {
            pressure += upper[s] - lower[s];
            x[s] = (self.mp - pressure).max(0.0);
        }
        x
    }

    /// Levels after each period, `V[1..=T]`.
    fn levels(&self, x: &[f64]) -> Vec<f64> {
        let mut level = self.problem.initial;
        x.iter()
            .zip(&self.problem.demand)
            .map(|(delivered, consumed)| {
                level = level + delivered - consumed;
                level
            })
            .collect()
    }
}

/// `<ahead - next, next - prev>`; the gradient restart test.
fn alignment(ahead: &[f64], next: &[f64], prev: &[f64]) -> f64 {
    ahead
        .iter()
        .zip(next)
        .zip(prev)
        .map(|((y, n), p)| (y - n) * (n - p))
        .sum()
}

fn extrapolate(next: &[f64], prev: &[f64], beta: f64) -> Vec<f64> {
    next.iter()
        .zip(prev)
        .map(|(n, p)| n + beta * (n - p))
        .collect()
}

/// Largest singular value of the `T x T` lower-triangular all-ones matrix.
fn cumulative_sum_norm(periods: usize) -> f64 {
    let denom = 2.0 * (2.0 * periods as f64 + 1.0);
    1.0 / (2.0 * (std::f64::consts::PI / denom).sin())
}

/// Forward pass clamping residual bound violations.
///
/// Raises a delivery that would leave the level under `minV`. Lowers (down
/// to zero) one that would leave the level above the highest level from
/// which the rest of the horizon can still stay under `maxV`. Later returns
/// (negative demand) pull that ceiling under `maxV`.
fn repair(problem: &DeliveryProblem, mut x: Vec<f64>) -> Vec<f64> {
    let ceilings = reachable_ceilings(problem);
    let mut level = problem.initial;
    for ((delivered, &consumed), &ceiling) in
        x.iter_mut().zip(&problem.demand).zip(&ceilings[1..])
    {
        let drained = level - consumed;
        if drained + *delivered < problem.min_level {
            *delivered = problem.min_level - drained;
        } else if drained + *delivered > ceiling {
            *delivered = (ceiling - drained).max(0.0);
        }
        level = level + *delivered - consumed;
    }
    x
}

/// `c[t]`: highest `V[t]` with a completion staying under `maxV`.
///
/// `c[T] = maxV` and `c[t] = min(maxV, c[t + 1] + p[t])`.
fn reachable_ceilings(problem: &DeliveryProblem) -> Vec<f64> {
    let periods = problem.horizon();
    let mut ceilings = vec![problem.max_level; periods + 1];
    for t in (0..periods).rev() {
        ceilings[t] = problem.max_level.min(ceilings[t + 1] + problem.demand[t]);
    }
    ceilings
}
