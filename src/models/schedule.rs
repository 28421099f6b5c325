//! Schedule (solution) model.
//!
//! A schedule assigns a start time to every job. Finish times and the
//! makespan are derived from it. A schedule can re-check itself against
//! the problem it was computed for and report every broken law as a
//! [`Violation`].
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};

use super::SchedulingProblem;

/// A complete schedule for a [`SchedulingProblem`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Start time per job.
    pub start: Vec<i64>,
    /// Finish time per job (`start + duration`).
    pub finish: Vec<i64>,
    /// Makespan: latest finish time (0 for an empty schedule).
    pub cmax: i64,
    /// Order in which the jobs were placed.
    pub order: Vec<usize>,
}

/// A broken schedule law.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Offending job, when the violation concerns one.
    pub job: Option<usize>,
    /// Offending resource, when the violation concerns one.
    pub resource: Option<usize>,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Job started before its release date.
    ReleaseViolation,
    /// Job started before a predecessor finished.
    PrecedenceViolation,
    /// Resource usage above capacity in some time unit.
    CapacityExceeded,
    /// `finish - start` differs from the job duration.
    DurationMismatch,
    /// Schedule shape does not match the problem (job count, cmax).
    Malformed,
}

impl Violation {
    /// Creates a release date violation.
    pub fn release_violation(job: usize, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::ReleaseViolation,
            job: Some(job),
            resource: None,
            message: message.into(),
            severity: 80,
        }
    }

    /// Creates a precedence violation.
    pub fn precedence_violation(job: usize, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::PrecedenceViolation,
            job: Some(job),
            resource: None,
            message: message.into(),
            severity: 95,
        }
    }

    /// Creates a capacity exceeded violation.
    pub fn capacity_exceeded(resource: usize, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::CapacityExceeded,
            job: None,
            resource: Some(resource),
            message: message.into(),
            severity: 90,
        }
    }

    /// Creates a duration mismatch violation.
    pub fn duration_mismatch(job: usize, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::DurationMismatch,
            job: Some(job),
            resource: None,
            message: message.into(),
            severity: 100,
        }
    }

    /// Creates a malformed schedule violation.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::Malformed,
            job: None,
            resource: None,
            message: message.into(),
            severity: 100,
        }
    }
}

impl Schedule {
    /// Builds a schedule from start times and durations.
    pub fn from_starts(start: Vec<i64>, durations: &[i64], order: Vec<usize>) -> Self {
        let finish: Vec<i64> = start
            .iter()
            .zip(durations)
            .map(|(s, d)| s + d)
            .collect();
        let cmax = finish.iter().copied().max().unwrap_or(0);
        Self {
            start,
            finish,
            cmax,
            order,
        }
    }

    /// Number of scheduled jobs.
    pub fn job_count(&self) -> usize {
        self.start.len()
    }

    /// Duration of job `j` in this schedule.
    #[inline]
    pub fn duration(&self, j: usize) -> i64 {
        self.finish[j] - self.start[j]
    }

    /// Whether job `j` occupies time unit `t` (`start <= t < finish`).
    #[inline]
    pub fn is_active(&self, j: usize, t: i64) -> bool {
        self.start[j] <= t && t < self.finish[j]
    }

    /// Usage of resource `m` as a step function: `(t, level)` pairs, each
    /// level holding from `t` until the next pair. Usage before the first
    /// pair and after the last one is zero.
    pub fn resource_usage(&self, problem: &SchedulingProblem, m: usize) -> Vec<(i64, i64)> {
        let mut events: Vec<(i64, i64)> = Vec::new();
        for (j, job) in problem.jobs.iter().enumerate().take(self.job_count()) {
            let amount = job.demand_for(m);
            if amount <= 0 || self.finish[j] <= self.start[j] {
                continue;
            }
            events.push((self.start[j], amount));
            events.push((self.finish[j], -amount));
        }
        events.sort_unstable_by_key(|&(t, _)| t);

        let mut steps: Vec<(i64, i64)> = Vec::with_capacity(events.len());
        let mut level = 0;
        for (t, delta) in events {
            level += delta;
            match steps.last_mut() {
                Some((last, value)) if *last == t => *value = level,
                _ => steps.push((t, level)),
            }
        }
        steps
    }

    /// Re-checks the schedule against `problem`.
    ///
    /// Returns every violated law: duration, release, precedence, and
    /// per-time-unit resource capacity. An empty vector means the schedule
    /// is feasible.
    pub fn verify(&self, problem: &SchedulingProblem) -> Vec<Violation> {
        let n = problem.job_count();
        if self.start.len() != n || self.finish.len() != n {
            return vec![Violation::malformed(format!(
                "schedule covers {} jobs, problem has {}",
                self.start.len(),
                n
            ))];
        }

        let mut violations = Vec::new();

        for (j, job) in problem.jobs.iter().enumerate() {
            if self.duration(j) != job.duration {
                violations.push(Violation::duration_mismatch(
                    j,
                    format!(
                        "job {j}: finish - start = {}, duration is {}",
                        self.duration(j),
                        job.duration
                    ),
                ));
            }
            if self.start[j] < job.release {
                violations.push(Violation::release_violation(
                    j,
                    format!(
                        "job {j} starts at {} before its release {}",
                        self.start[j], job.release
                    ),
                ));
            }
            for &p in &job.predecessors {
                if p < n && self.start[j] < self.finish[p] {
                    violations.push(Violation::precedence_violation(
                        j,
                        format!(
                            "job {j} starts at {} before predecessor {p} finishes at {}",
                            self.start[j], self.finish[p]
                        ),
                    ));
                }
            }
        }

        let latest = self.finish.iter().copied().max().unwrap_or(0);
        if latest != self.cmax {
            violations.push(Violation::malformed(format!(
                "cmax is {}, latest finish is {latest}",
                self.cmax
            )));
        }

        for (m, &capacity) in problem.capacities.iter().enumerate() {
            let usage = self.resource_usage(problem, m);
            if let Some(&(t, peak)) = usage.iter().find(|(_, level)| *level > capacity) {
                violations.push(Violation::capacity_exceeded(
                    m,
                    format!("resource {m} uses {peak} > capacity {capacity} at t={t}"),
                ));
            }
        }

        violations
    }

    /// Whether [`verify`](Self::verify) finds no violations.
    pub fn is_feasible_for(&self, problem: &SchedulingProblem) -> bool {
        self.verify(problem).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Job;

    fn two_job_problem() -> SchedulingProblem {
        SchedulingProblem::new(vec![1])
            .with_job(Job::new(2).with_demand(0, 1))
            .with_job(Job::new(1).with_demand(0, 1).with_predecessor(0))
    }

    #[test]
    fn test_from_starts() {
        let s = Schedule::from_starts(vec![0, 2], &[2, 1], vec![0, 1]);
        assert_eq!(s.finish, vec![2, 3]);
        assert_eq!(s.cmax, 3);
        assert_eq!(s.duration(0), 2);
        assert!(s.is_active(0, 1));
        assert!(!s.is_active(0, 2));
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::from_starts(Vec::new(), &[], Vec::new());
        assert_eq!(s.cmax, 0);
        assert_eq!(s.job_count(), 0);
    }

    #[test]
    fn test_verify_feasible() {
        let problem = two_job_problem();
        let s = Schedule::from_starts(vec![0, 2], &[2, 1], vec![0, 1]);
        assert!(s.verify(&problem).is_empty());
        assert!(s.is_feasible_for(&problem));
        assert_eq!(s.resource_usage(&problem, 0), vec![(0, 1), (3, 0)]);
    }

    #[test]
    fn test_verify_overlap() {
        let problem = SchedulingProblem::new(vec![1])
            .with_job(Job::new(2).with_demand(0, 1))
            .with_job(Job::new(1).with_demand(0, 1));
        let s = Schedule::from_starts(vec![0, 1], &[2, 1], vec![0, 1]);

        let violations = s.verify(&problem);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::CapacityExceeded);
        assert_eq!(violations[0].resource, Some(0));
        assert!(violations[0].message.contains("at t=1"));
    }

    #[test]
    fn test_verify_far_horizon() {
        let problem = SchedulingProblem::new(vec![2])
            .with_job(Job::new(3_000_000_000).with_demand(0, 1))
            .with_job(Job::new(5).with_demand(0, 2))
            .with_job(Job::new(1).with_demand(0, 1));
        let s = Schedule::from_starts(
            vec![4_000_000_000, 0, 6_999_999_999],
            &[3_000_000_000, 5, 1],
            vec![0, 1, 2],
        );
        assert_eq!(
            s.resource_usage(&problem, 0),
            vec![(0, 2), (5, 0), (4_000_000_000, 1), (6_999_999_999, 2), (7_000_000_000, 0)]
        );
        assert!(s.is_feasible_for(&problem));

        let clash = Schedule::from_starts(
            vec![4_000_000_000, 4_000_000_002, 0],
            &[3_000_000_000, 5, 1],
            vec![0, 1, 2],
        );
        let violations = clash.verify(&problem);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("at t=4000000002"));
    }

    #[test]
    fn test_verify_precedence_and_release() {
        let mut problem = two_job_problem();
        problem.jobs[0].release = 1;
        let s = Schedule::from_starts(vec![0, 1], &[2, 1], vec![0, 1]);

        let violations = s.verify(&problem);
        assert!(violations
            .iter()
            .any(|v| v.violation_type == ViolationType::ReleaseViolation && v.job == Some(0)));
        assert!(violations
            .iter()
            .any(|v| v.violation_type == ViolationType::PrecedenceViolation && v.job == Some(1)));
    }

    #[test]
    fn test_verify_duration_and_shape() {
        let problem = two_job_problem();
        let mut s = Schedule::from_starts(vec![0, 2], &[2, 1], vec![0, 1]);
        s.finish[1] = 4;
        s.cmax = 4;
        let violations = s.verify(&problem);
        assert!(violations
            .iter()
            .any(|v| v.violation_type == ViolationType::DurationMismatch));

        let short = Schedule::from_starts(vec![0], &[2], vec![0]);
        assert_eq!(
            short.verify(&problem)[0].violation_type,
            ViolationType::Malformed
        );
    }

    #[test]
    fn test_violation_factories() {
        let v1 = Violation::release_violation(3, "early");
        assert_eq!(v1.job, Some(3));
        assert_eq!(v1.severity, 80);

        let v2 = Violation::capacity_exceeded(1, "over");
        assert_eq!(v2.resource, Some(1));
        assert_eq!(v2.job, None);

        let v3 = Violation::precedence_violation(2, "order");
        assert_eq!(v3.violation_type, ViolationType::PrecedenceViolation);
    }
}
