//! Direct (greedy) bounds solver.
//!
//! Delivers only what the lower bound demands: each period receives the
//! smallest `x[t] >= 0` keeping `V[t + 1] >= minV`. The resulting
//! trajectory is the lowest reachable one, so an overflow of `maxV` here
//! proves no plan can stay in the band. That makes the same pass an exact
//! feasibility oracle for the iterative solver.

use tracing::{debug, instrument, warn};

use crate::error::DeliveryError;
use crate::models::{DeliveryPlan, DeliveryProblem, DirectResult};

/// Solves the delivery problem with the greedy lower-bound policy.
///
/// `p` is the per-period demand, `v0` the initial inventory.
///
/// # Errors
/// Returns a [`DeliveryError`] for an empty horizon, non-finite input, or
/// `min_v > max_v`.
pub fn solve_direct(
    p: &[f64],
    v0: f64,
    min_v: f64,
    max_v: f64,
) -> Result<DirectResult, DeliveryError> {
    solve_direct_for(&DeliveryProblem::new(p.to_vec(), v0, min_v, max_v))
}

/// [`solve_direct`] on a problem value.
///
/// # Errors
/// See [`solve_direct`].
#[instrument(skip(problem), fields(periods = problem.horizon()))]
pub fn solve_direct_for(problem: &DeliveryProblem) -> Result<DirectResult, DeliveryError> {
    problem.validate()?;

    let (x, ok) = greedy_deliveries(problem);
    let plan = DeliveryPlan::from_deliveries(x, problem.initial, &problem.demand);

    if ok {
        debug!(delivered = plan.total_delivered(), "direct plan feasible");
    } else {
        warn!(
            planned = plan.periods(),
            "direct plan overflows maxV; returning partial plan"
        );
    }
    Ok(DirectResult { plan, ok })
}

/// Whether any plan keeps the inventory within bounds.
pub(crate) fn is_reachable(problem: &DeliveryProblem) -> bool {
    greedy_deliveries(problem).1
}

/// Greedy deliveries up to and including the first overflowing period.
fn greedy_deliveries(problem: &DeliveryProblem) -> (Vec<f64>, bool) {
    if !problem.level_in_bounds(problem.initial) {
        return (Vec::new(), false);
    }

    let mut x = Vec::with_capacity(problem.horizon());
    let mut level = problem.initial;
    for &consumed in &problem.demand {
        let drained = level - consumed;
        let delivered = (problem.min_level - drained).max(0.0);
        x.push(delivered);
        level = level + delivered - consumed;
        if !problem.level_in_bounds(level) {
            return (x, false);
        }
    }
    (x, true)
}
