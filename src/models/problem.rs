//! Scheduling problem model.
//!
//! A project of N jobs competing for M renewable resources. The problem
//! is a plain value object: it is built once by the caller, borrowed by the
//! scheduler, and never mutated during a run.

use serde::{Deserialize, Serialize};

use super::Job;
use crate::error::SchedulingError;
use crate::validation::{ValidationError, ValidationErrorKind};

/// A resource-constrained project scheduling problem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingProblem {
    /// Jobs, indexed 0..N.
    pub jobs: Vec<Job>,
    /// Capacity per renewable resource, indexed 0..M.
    pub capacities: Vec<i64>,
}

impl SchedulingProblem {
    /// Creates a problem with the given resource capacities and no jobs.
    pub fn new(capacities: Vec<i64>) -> Self {
        Self {
            jobs: Vec::new(),
            capacities,
        }
    }

    /// Adds a job; its index is the current job count.
    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    /// Builds a problem from flat, already-parsed vectors.
    ///
    /// `demand` and `preds` are either empty (no demands / no precedence) or
    /// have exactly `n` entries. Index ranges, cycles and capacities are
    /// checked later by [`validate_problem`](crate::validation::validate_problem).
    ///
    /// # Errors
    /// Returns [`ValidationErrorKind::LengthMismatch`] issues when a vector
    /// length disagrees with `n` or `m`.
    pub fn from_parts(
        n: usize,
        m: usize,
        dur: &[i64],
        rel: &[i64],
        cap: &[i64],
        demand: &[Vec<(usize, i64)>],
        preds: &[Vec<usize>],
    ) -> Result<Self, SchedulingError> {
        let mut errors = Vec::new();
        let mut check = |name: &str, len: usize, expected: usize, optional: bool| {
            if len != expected && !(optional && len == 0) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::LengthMismatch,
                    format!("{name} has {len} entries, expected {expected}"),
                ));
            }
        };
        check("dur", dur.len(), n, false);
        check("rel", rel.len(), n, false);
        check("cap", cap.len(), m, false);
        check("demand", demand.len(), n, true);
        check("preds", preds.len(), n, true);
        if !errors.is_empty() {
            return Err(SchedulingError::Invalid(errors));
        }

        let jobs = (0..n)
            .map(|j| Job {
                duration: dur[j],
                release: rel[j],
                demands: demand.get(j).cloned().unwrap_or_default(),
                predecessors: preds.get(j).cloned().unwrap_or_default(),
            })
            .collect();

        Ok(Self {
            jobs,
            capacities: cap.to_vec(),
        })
    }

    /// Number of jobs (N).
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Number of resources (M).
    pub fn resource_count(&self) -> usize {
        self.capacities.len()
    }

    /// Sum of all job durations.
    pub fn total_duration(&self) -> i64 {
        self.jobs.iter().map(|j| j.duration).sum()
    }

    /// A makespan no serial schedule can exceed: latest release plus the
    /// sum of all durations.
    pub fn horizon(&self) -> i64 {
        let latest_release = self.jobs.iter().map(|j| j.release).max().unwrap_or(0);
        latest_release + self.total_duration()
    }

    /// Direct successors of every job (in-range, deduplicated, ascending).
    pub fn successors(&self) -> Vec<Vec<usize>> {
        let n = self.job_count();
        let mut succ = vec![Vec::new(); n];
        for (j, job) in self.jobs.iter().enumerate() {
            for &p in &job.predecessors {
                if p < n {
                    succ[p].push(j);
                }
            }
        }
        for list in &mut succ {
            list.sort_unstable();
            list.dedup();
        }
        succ
    }
}
