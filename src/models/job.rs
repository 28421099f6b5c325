//! Job (activity) model for project scheduling.
//!
//! A job is a non-preemptive unit of work with an integer duration, a
//! release date, renewable resource demands, and a set of predecessor jobs
//! that must finish before it may start.
//!
//! # Reference
//! Kolisch & Hartmann (1999), "Heuristic Algorithms for the RCPSP", Sec. 2

use serde::{Deserialize, Serialize};

/// A job to be scheduled.
///
/// Jobs are identified by their position in [`SchedulingProblem::jobs`]
/// (0-indexed). Resource and predecessor references use the same indices.
///
/// # Time Representation
/// Times are integer time units relative to the project start (t=0).
///
/// [`SchedulingProblem::jobs`]: super::SchedulingProblem::jobs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Processing time (time units, ≥ 0).
    pub duration: i64,
    /// Earliest allowed start (release date, ≥ 0).
    pub release: i64,
    /// Sparse renewable demand: `(resource index, amount per time unit)`.
    ///
    /// A resource absent from this list is not used. Repeated entries for
    /// the same resource add up.
    pub demands: Vec<(usize, i64)>,
    /// Indices of jobs that must finish before this job starts.
    pub predecessors: Vec<usize>,
}

impl Job {
    /// Creates a job with the given duration, released at t=0.
    pub fn new(duration: i64) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    /// Sets the release date.
    pub fn with_release(mut self, release: i64) -> Self {
        self.release = release;
        self
    }

    /// Adds a demand of `amount` units on resource `resource`.
    pub fn with_demand(mut self, resource: usize, amount: i64) -> Self {
        self.demands.push((resource, amount));
        self
    }

    /// Adds a predecessor job.
    pub fn with_predecessor(mut self, predecessor: usize) -> Self {
        self.predecessors.push(predecessor);
        self
    }

    /// Adds several predecessor jobs.
    pub fn with_predecessors(mut self, predecessors: impl IntoIterator<Item = usize>) -> Self {
        self.predecessors.extend(predecessors);
        self
    }

    /// Total demand on `resource` (sum of all matching entries).
    pub fn demand_for(&self, resource: usize) -> i64 {
        self.demands
            .iter()
            .filter(|(r, _)| *r == resource)
            .map(|(_, amount)| amount)
            .sum()
    }

    /// Positive demands merged per resource, sorted by resource index.
    pub fn merged_demands(&self) -> Vec<(usize, i64)> {
        let mut merged: Vec<(usize, i64)> = Vec::with_capacity(self.demands.len());
        let mut sorted = self.demands.clone();
        sorted.sort_unstable_by_key(|&(r, _)| r);
        for (r, amount) in sorted {
            match merged.last_mut() {
                Some((last, total)) if *last == r => *total += amount,
                _ => merged.push((r, amount)),
            }
        }
        merged.retain(|&(_, total)| total > 0);
        merged
    }

    /// Whether the job has no predecessors.
    pub fn is_source(&self) -> bool {
        self.predecessors.is_empty()
    }
}
