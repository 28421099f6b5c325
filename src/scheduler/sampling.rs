//! Multi-pass sampling on top of the serial scheme.
//!
//! Pass 0 uses the base rule engine. Every later pass orders ready jobs by
//! fresh random keys drawn from a seeded [`StdRng`], so a given config
//! always returns the same schedule. The best makespan wins; ties keep the
//! earliest pass.
//!
//! # Reference
//! Kolisch & Hartmann (1999), "Heuristic algorithms for the
//! resource-constrained project scheduling problem: classification and
//! computational analysis"

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::serial::place;
use crate::dispatching::{rules, RuleContext, RuleEngine};
use crate::error::SchedulingError;
use crate::models::{Schedule, SchedulingProblem};
use crate::validation;

/// Configuration for [`SamplingScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Number of passes, including the base pass.
    pub passes: usize,
    /// Seed for the random-key passes.
    pub seed: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self { passes: 32, seed: 0 }
    }
}

impl SamplingConfig {
    /// Creates a config.
    ///
    /// # Errors
    /// Returns an error if `passes` is zero.
    pub fn new(passes: usize, seed: u64) -> Result<Self, SchedulingError> {
        let config = Self { passes, seed };
        config.validate()?;
        Ok(config)
    }

    /// Checks all fields.
    ///
    /// # Errors
    /// Returns an error if `passes` is zero.
    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.passes == 0 {
            return Err(SchedulingError::InvalidConfig {
                reason: "passes must be at least 1",
            });
        }
        Ok(())
    }
}

/// Best-of-N serial scheduler.
///
/// # Example
///
/// ```
/// use u_plan::models::{Job, SchedulingProblem};
/// use u_plan::scheduler::{SamplingConfig, SamplingScheduler};
///
/// let problem = SchedulingProblem::new(vec![1])
///     .with_job(Job::new(2).with_demand(0, 1))
///     .with_job(Job::new(1).with_demand(0, 1).with_predecessor(0));
///
/// let scheduler = SamplingScheduler::new(SamplingConfig::new(8, 42).unwrap());
/// let schedule = scheduler.schedule(&problem).unwrap();
/// assert_eq!(schedule.cmax, 3);
/// ```
#[derive(Debug, Clone)]
pub struct SamplingScheduler {
    config: SamplingConfig,
    base: RuleEngine,
}

impl SamplingScheduler {
    /// Creates a sampler whose base pass uses ascending job index.
    pub fn new(config: SamplingConfig) -> Self {
        Self {
            config,
            base: RuleEngine::by_index(),
        }
    }

    /// Replaces the rule engine used by pass 0.
    pub fn with_base_engine(mut self, engine: RuleEngine) -> Self {
        self.base = engine;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Runs all passes and returns the schedule with the smallest makespan.
    ///
    /// # Errors
    /// Returns [`SchedulingError::InvalidConfig`] for zero passes and
    /// [`SchedulingError::Invalid`] for a structurally invalid problem.
    #[instrument(
        skip(self, problem),
        fields(jobs = problem.job_count(), passes = self.config.passes)
    )]
    pub fn schedule(&self, problem: &SchedulingProblem) -> Result<Schedule, SchedulingError> {
        self.config.validate()?;
        validation::validate_problem(problem)?;

        let context = RuleContext::new(problem)?;
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let n = problem.job_count();

        let mut best: Option<(usize, Schedule)> = None;
        for pass in 0..self.config.passes {
            let engine = if pass == 0 {
                self.base.clone()
            } else {
                RuleEngine::new().with_rule(rules::RandomKey::sample(n, &mut rng))
            };
            let rank = engine.rank(&context);
            let order =
                validation::topological_order_by_rank(problem, &rank).map_err(|e| vec![e])?;
            let candidate = place(problem, order)?;

            if best.as_ref().map_or(true, |(_, b)| candidate.cmax < b.cmax) {
                best = Some((pass, candidate));
            }
        }

        match best {
            Some((pass, schedule)) => {
                debug!(cmax = schedule.cmax, pass, "sampling finished");
                Ok(schedule)
            }
            None => Err(SchedulingError::InvalidConfig {
                reason: "passes must be at least 1",
            }),
        }
    }
}
