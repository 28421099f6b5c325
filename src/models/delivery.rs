//! Delivery planning models.
//!
//! A delivery problem is a demand sequence `p[0..T)` drawn from an inventory
//! that starts at `V0` and must stay within `[minV, maxV]`. A plan chooses
//! a delivery `x[t] >= 0` per period; the inventory follows
//!
//! ```text
//! V[0] = V0,    V[t + 1] = V[t] + x[t] - p[t]
//! ```
//!
//! so a plan over `T` periods carries `T` deliveries and `T + 1` levels.

use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

/// Relative slack used when comparing inventory levels to the bounds.
///
/// Levels are recomputed from the deliveries by floating-point addition,
/// which may land one rounding step outside a bound the solver aimed at
/// exactly.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// A bounded-inventory delivery problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryProblem {
    /// Demand (consumption) per period.
    pub demand: Vec<f64>,
    /// Initial inventory `V0`.
    pub initial: f64,
    /// Lower inventory bound `minV`.
    pub min_level: f64,
    /// Upper inventory bound `maxV`.
    pub max_level: f64,
}

impl DeliveryProblem {
    /// Creates a delivery problem.
    pub fn new(demand: Vec<f64>, initial: f64, min_level: f64, max_level: f64) -> Self {
        Self {
            demand,
            initial,
            min_level,
            max_level,
        }
    }

    /// Checks the caller contract: non-empty horizon, finite numbers, and
    /// `minV <= maxV`.
    ///
    /// # Errors
    /// Returns the first broken precondition.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        if self.demand.is_empty() {
            return Err(DeliveryError::EmptyHorizon);
        }
        for (what, value) in [
            ("initial inventory", self.initial),
            ("minV", self.min_level),
            ("maxV", self.max_level),
        ] {
            if !value.is_finite() {
                return Err(DeliveryError::NonFinite { what, value });
            }
        }
        if let Some(&value) = self.demand.iter().find(|p| !p.is_finite()) {
            return Err(DeliveryError::NonFinite {
                what: "demand",
                value,
            });
        }
        if self.min_level > self.max_level {
            return Err(DeliveryError::InvertedBounds {
                min: self.min_level,
                max: self.max_level,
            });
        }
        Ok(())
    }

    /// Number of periods (T).
    pub fn horizon(&self) -> usize {
        self.demand.len()
    }

    /// Total demand over the horizon (ΣP).
    pub fn total_demand(&self) -> f64 {
        self.demand.iter().sum()
    }

    /// Midpoint of the inventory band.
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.min_level + self.max_level)
    }

    /// Target uniform delivery rate `Mp`.
    ///
    /// Delivering `Mp` every period ends the horizon at the band midpoint:
    /// `V0 + T * Mp - ΣP = (minV + maxV) / 2`. Clamped at zero because
    /// deliveries cannot be negative.
    pub fn uniform_rate(&self) -> f64 {
        let periods = self.horizon().max(1) as f64;
        ((self.total_demand() + self.midpoint() - self.initial) / periods).max(0.0)
    }

    /// Whether `level` lies in the band, up to [`FEASIBILITY_TOLERANCE`].
    pub fn level_in_bounds(&self, level: f64) -> bool {
        let slack = level_slack(self.min_level, self.max_level);
        level >= self.min_level - slack && level <= self.max_level + slack
    }
}

/// Deliveries and the inventory trajectory they induce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPlan {
    /// Delivered quantity per period (`x`, all ≥ 0).
    pub x: Vec<f64>,
    /// Inventory levels (`V`), one more than `x`; `v[0]` is `V0`.
    pub v: Vec<f64>,
}

/// Spread of deliveries around a target rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviationStats {
    /// Mean delivery.
    pub mean: f64,
    /// Mean squared deviation from the target.
    pub variance: f64,
    /// Largest absolute deviation from the target.
    pub max_abs_deviation: f64,
}

impl DeliveryPlan {
    /// Builds a plan from deliveries by running the inventory recurrence.
    ///
    /// Only the first `min(x.len(), demand.len())` periods are used.
    pub fn from_deliveries(x: Vec<f64>, initial: f64, demand: &[f64]) -> Self {
        let periods = x.len().min(demand.len());
        let mut x = x;
        x.truncate(periods);

        let mut v = Vec::with_capacity(periods + 1);
        let mut level = initial;
        v.push(level);
        for (delivered, consumed) in x.iter().zip(demand) {
            level = level + delivered - consumed;
            v.push(level);
        }
        Self { x, v }
    }

    /// Number of planned periods.
    pub fn periods(&self) -> usize {
        self.x.len()
    }

    /// Whether every level (including `V0`) lies in `[min, max]`, up to
    /// [`FEASIBILITY_TOLERANCE`].
    pub fn is_feasible(&self, min: f64, max: f64) -> bool {
        let slack = level_slack(min, max);
        self.v.iter().all(|&l| l >= min - slack && l <= max + slack)
    }

    /// Largest distance of any level outside `[min, max]` (0 when inside).
    pub fn max_violation(&self, min: f64, max: f64) -> f64 {
        self.v
            .iter()
            .map(|&l| (min - l).max(l - max).max(0.0))
            .fold(0.0, f64::max)
    }

    /// Total delivered quantity.
    pub fn total_delivered(&self) -> f64 {
        self.x.iter().sum()
    }

    /// Spread of the deliveries around `target`.
    pub fn deviation_stats(&self, target: f64) -> DeviationStats {
        if self.x.is_empty() {
            return DeviationStats {
                mean: 0.0,
                variance: 0.0,
                max_abs_deviation: 0.0,
            };
        }
        let n = self.x.len() as f64;
        let mean = self.total_delivered() / n;
        let variance = self.x.iter().map(|x| (x - target).powi(2)).sum::<f64>() / n;
        let max_abs_deviation = self
            .x
            .iter()
            .map(|x| (x - target).abs())
            .fold(0.0, f64::max);
        DeviationStats {
            mean,
            variance,
            max_abs_deviation,
        }
    }
}

/// Result of the iterative uniformity solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformityResult {
    /// Deliveries and inventory trajectory.
    pub plan: DeliveryPlan,
    /// Target uniform delivery rate.
    pub mp: f64,
    /// Converged within budget and feasible.
    pub ok: bool,
    /// Iterations consumed.
    pub iters: usize,
    /// Iteration budget.
    pub max_iter: usize,
}

/// Result of the direct (greedy) bounds solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectResult {
    /// Deliveries and inventory trajectory; truncated after the first
    /// overflowing period when `ok` is false.
    pub plan: DeliveryPlan,
    /// Every period stayed within bounds.
    pub ok: bool,
}

fn level_slack(min: f64, max: f64) -> f64 {
    FEASIBILITY_TOLERANCE * (1.0 + min.abs().max(max.abs()))
}
