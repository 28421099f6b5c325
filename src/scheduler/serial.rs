//! Serial schedule generation scheme.
//!
//! # Algorithm
//!
//! 1. Validate the problem (no partial schedule is ever produced).
//! 2. Build a precedence-respecting job list; among ready jobs the rule
//!    engine decides, ascending index by default.
//! 3. For each job in list order, start it at the earliest time
//!    `t >= max(rel, finish of every predecessor)` at which its demands fit
//!    every resource for `[t, t + dur)`.
//!
//! # Complexity
//! O(N log N + E) for the list, plus O(N * B * R) placement in the worst
//! case, where B is the number of usage breakpoints (at most 2N per
//! resource) and R the demands per job. Release dates and durations can
//! be arbitrarily large.
//!
//! # Reference
//! Kolisch (1996), "Serial and parallel resource-constrained project
//! scheduling methods revisited"

use tracing::{debug, instrument};

use super::profile::ResourceProfile;
use crate::dispatching::{RuleContext, RuleEngine};
use crate::error::SchedulingError;
use crate::models::{Schedule, SchedulingProblem};
use crate::validation::{self, ValidationError, ValidationErrorKind};

/// Serial SGS scheduler for the RCPSP with release dates.
///
/// # Example
///
/// ```
/// use u_plan::models::{Job, SchedulingProblem};
/// use u_plan::scheduler::SerialScheduler;
///
/// let problem = SchedulingProblem::new(vec![1])
///     .with_job(Job::new(2).with_demand(0, 1))
///     .with_job(Job::new(1).with_demand(0, 1));
///
/// let schedule = SerialScheduler::new().schedule(&problem).unwrap();
/// assert_eq!(schedule.start, vec![0, 2]);
/// assert_eq!(schedule.cmax, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SerialScheduler {
    rule_engine: Option<RuleEngine>,
}

impl SerialScheduler {
    /// Creates a scheduler using the ascending-index policy.
    pub fn new() -> Self {
        Self { rule_engine: None }
    }

    /// Sets a rule engine for job ordering.
    ///
    /// Precedence still comes first: the engine only chooses among jobs
    /// whose predecessors are already placed.
    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.rule_engine = Some(engine);
        self
    }

    /// Schedules `problem`.
    ///
    /// # Errors
    /// Returns [`SchedulingError::Invalid`] listing every structural issue,
    /// including precedence cycles.
    #[instrument(
        skip(self, problem),
        fields(jobs = problem.job_count(), resources = problem.resource_count())
    )]
    pub fn schedule(&self, problem: &SchedulingProblem) -> Result<Schedule, SchedulingError> {
        validation::validate_problem(problem)?;

        let order = match &self.rule_engine {
            None => validation::topological_order(problem).map_err(|e| vec![e])?,
            Some(engine) => {
                let context = RuleContext::new(problem)?;
                let rank = engine.rank(&context);
                validation::topological_order_by_rank(problem, &rank).map_err(|e| vec![e])?
            }
        };

        let schedule = place(problem, order)?;
        debug!(cmax = schedule.cmax, "serial schedule built");
        Ok(schedule)
    }
}

/// Places jobs in `order`, which must be a topological order of a
/// validated problem.
///
/// # Errors
/// Returns [`SchedulingError::Invalid`] if a job's demands can never fit,
/// which validation rules out.
pub(crate) fn place(
    problem: &SchedulingProblem,
    order: Vec<usize>,
) -> Result<Schedule, SchedulingError> {
    let n = problem.job_count();
    let mut profile = ResourceProfile::new(&problem.capacities);
    let mut start = vec![0i64; n];
    let mut finish = vec![0i64; n];

    for &j in &order {
        let job = &problem.jobs[j];
        let ready = job
            .predecessors
            .iter()
            .map(|&p| finish[p])
            .fold(job.release, i64::max);
        let demands = job.merged_demands();
        let t = profile
            .earliest_start(&demands, ready, job.duration)
            .ok_or_else(|| {
                vec![ValidationError::new(
                    ValidationErrorKind::DemandExceedsCapacity,
                    format!("job {j} demands cannot fit any resource window"),
                )]
            })?;
        profile.commit(&demands, t, job.duration);
        start[j] = t;
        finish[j] = t + job.duration;
    }

    let durations: Vec<i64> = problem.jobs.iter().map(|j| j.duration).collect();
    Ok(Schedule::from_starts(start, &durations, order))
}
