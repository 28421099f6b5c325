//! Schedule quality metrics (KPIs).
//!
//! Computes standard RCPSP performance indicators from a completed
//! schedule and the problem it solves.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest finish time |
//! | Critical-path bound | Longest release + precedence chain, resources ignored |
//! | Resource bound | max over resources of ceil(work / capacity) |
//! | Gap | (C_max - LB) / LB |
//! | Utilization | work / (capacity * C_max) per resource |
//! | Avg Flow Time | Mean of finish - release |
//! | Total Delay | Sum of start - max(release, predecessor finishes) |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use crate::error::SchedulingError;
use crate::models::{Schedule, SchedulingProblem};
use crate::validation::{self, ValidationError, ValidationErrorKind};

/// Schedule performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Makespan.
    pub makespan: i64,
    /// Precedence and release lower bound on the makespan.
    pub critical_path_bound: i64,
    /// Resource work lower bound on the makespan.
    pub resource_bound: i64,
    /// Relative distance of the makespan from the larger bound (0.0 = optimal).
    pub gap: f64,
    /// Average resource utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Per-resource utilization, indexed by resource.
    pub utilization_by_resource: Vec<f64>,
    /// Average flow time: mean(finish - release).
    pub avg_flow_time: f64,
    /// Time jobs spent waiting for resources after becoming ready.
    pub total_delay: i64,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its problem.
    ///
    /// # Errors
    /// Returns [`SchedulingError::Invalid`] if the schedule does not cover
    /// every job or the precedence graph is cyclic.
    pub fn calculate(
        schedule: &Schedule,
        problem: &SchedulingProblem,
    ) -> Result<Self, SchedulingError> {
        let n = problem.job_count();
        if schedule.start.len() != n || schedule.finish.len() != n {
            return Err(vec![ValidationError::new(
                ValidationErrorKind::LengthMismatch,
                format!("schedule has {} jobs, problem has {n}", schedule.job_count()),
            )]
            .into());
        }
        let order = validation::topological_order(problem).map_err(|e| vec![e])?;

        // Earliest finish ignoring resources.
        let mut earliest_finish = vec![0i64; n];
        for &j in &order {
            let job = &problem.jobs[j];
            let ready = job
                .predecessors
                .iter()
                .filter(|&&p| p < n)
                .map(|&p| earliest_finish[p])
                .fold(job.release, i64::max);
            earliest_finish[j] = ready + job.duration;
        }
        let critical_path_bound = earliest_finish.iter().copied().max().unwrap_or(0);

        let work: Vec<i64> = (0..problem.resource_count())
            .map(|m| {
                problem
                    .jobs
                    .iter()
                    .map(|job| job.duration * job.demand_for(m).max(0))
                    .sum()
            })
            .collect();
        let resource_bound = work
            .iter()
            .zip(&problem.capacities)
            .filter(|(_, capacity)| **capacity > 0)
            .map(|(&w, &capacity)| (w + capacity - 1) / capacity)
            .max()
            .unwrap_or(0);

        let makespan = schedule.cmax;
        let lower_bound = critical_path_bound.max(resource_bound);
        let gap = if lower_bound > 0 {
            (makespan - lower_bound) as f64 / lower_bound as f64
        } else {
            0.0
        };

        let utilization_by_resource: Vec<f64> = work
            .iter()
            .zip(&problem.capacities)
            .map(|(&w, &capacity)| {
                let available = capacity * makespan;
                if available > 0 {
                    w as f64 / available as f64
                } else {
                    0.0
                }
            })
            .collect();
        let avg_utilization = if utilization_by_resource.is_empty() {
            0.0
        } else {
            utilization_by_resource.iter().sum::<f64>() / utilization_by_resource.len() as f64
        };

        let mut total_flow_time = 0i64;
        let mut total_delay = 0i64;
        for (j, job) in problem.jobs.iter().enumerate() {
            total_flow_time += schedule.finish[j] - job.release;
            let ready = job
                .predecessors
                .iter()
                .filter(|&&p| p < n)
                .map(|&p| schedule.finish[p])
                .fold(job.release, i64::max);
            total_delay += (schedule.start[j] - ready).max(0);
        }
        let avg_flow_time = if n == 0 {
            0.0
        } else {
            total_flow_time as f64 / n as f64
        };

        Ok(Self {
            makespan,
            critical_path_bound,
            resource_bound,
            gap,
            avg_utilization,
            utilization_by_resource,
            avg_flow_time,
            total_delay,
        })
    }

    /// Larger of the two makespan lower bounds.
    pub fn lower_bound(&self) -> i64 {
        self.critical_path_bound.max(self.resource_bound)
    }

    /// Whether the makespan provably equals the optimum.
    pub fn is_optimal(&self) -> bool {
        self.makespan == self.lower_bound()
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_gap: f64, min_utilization: f64) -> bool {
        self.gap <= max_gap && self.avg_utilization >= min_utilization
    }
}
