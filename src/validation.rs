//! Input validation for scheduling problems.
//!
//! Checks structural integrity of a [`SchedulingProblem`] before scheduling.
//! Detects:
//! - Empty job or resource sets
//! - Negative durations, release dates, or demands
//! - Non-positive resource capacities
//! - Out-of-range resource and predecessor references
//! - Single-job demands above a resource's capacity
//! - Circular precedence dependencies (DAG validation)
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks"

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use thiserror::Error;

use crate::models::SchedulingProblem;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// The problem has no jobs (N = 0).
    NoJobs,
    /// The problem has no resources (M = 0).
    NoResources,
    /// An input vector length disagrees with N or M.
    LengthMismatch,
    /// A job has a negative duration.
    NegativeDuration,
    /// A job has a negative release date.
    NegativeRelease,
    /// A resource capacity is zero or negative.
    NonPositiveCapacity,
    /// A demand references a resource outside `[0, M)`.
    InvalidResourceReference,
    /// A demand amount is negative.
    NegativeDemand,
    /// A predecessor reference lies outside `[0, N)`.
    InvalidPredecessor,
    /// Precedence graph contains a cycle.
    CyclicDependency,
    /// A single job demands more than a resource's capacity.
    DemandExceedsCapacity,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a scheduling problem.
///
/// Checks:
/// 1. At least one job and one resource
/// 2. All capacities positive
/// 3. Durations and release dates non-negative
/// 4. Demands reference existing resources with non-negative amounts
/// 5. No job demands more than a resource's capacity
/// 6. Predecessors reference existing jobs
/// 7. No circular precedence dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_problem(problem: &SchedulingProblem) -> ValidationResult {
    let mut errors = Vec::new();
    let n = problem.job_count();
    let m = problem.resource_count();

    if n == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoJobs,
            "problem has no jobs",
        ));
    }
    if m == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoResources,
            "problem has no resources",
        ));
    }

    for (r, &capacity) in problem.capacities.iter().enumerate() {
        if capacity <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveCapacity,
                format!("resource {r} has non-positive capacity {capacity}"),
            ));
        }
    }

    for (j, job) in problem.jobs.iter().enumerate() {
        if job.duration < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeDuration,
                format!("job {j} has negative duration {}", job.duration),
            ));
        }
        if job.release < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeRelease,
                format!("job {j} has negative release date {}", job.release),
            ));
        }

        for &(r, amount) in &job.demands {
            if r >= m {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidResourceReference,
                    format!("job {j} references unknown resource {r}"),
                ));
            }
            if amount < 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeDemand,
                    format!("job {j} has negative demand {amount} on resource {r}"),
                ));
            }
        }

        for (r, total) in job.merged_demands() {
            if let Some(&capacity) = problem.capacities.get(r) {
                if capacity > 0 && total > capacity {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::DemandExceedsCapacity,
                        format!(
                            "job {j} demands {total} of resource {r}, capacity is {capacity}"
                        ),
                    ));
                }
            }
        }

        for &p in &job.predecessors {
            if p >= n {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    format!("job {j} references unknown predecessor {p}"),
                ));
            }
        }
    }

    if let Err(cycle_err) = topological_order(problem) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Precedence-respecting order with ties broken by ascending job index.
///
/// # Errors
/// Returns a [`ValidationErrorKind::CyclicDependency`] error naming the jobs
/// that could not be ordered.
pub fn topological_order(problem: &SchedulingProblem) -> Result<Vec<usize>, ValidationError> {
    let identity: Vec<usize> = (0..problem.job_count()).collect();
    topological_order_by_rank(problem, &identity)
}

/// Precedence-respecting order preferring lower `rank` among ready jobs.
///
/// # Algorithm
/// Kahn's algorithm with a min-heap over `(rank[j], j)`. Iterative, so deep
/// or adversarial graphs cannot overflow the stack. Out-of-range
/// predecessors are ignored here; [`validate_problem`] reports them.
///
/// # Errors
/// If ready jobs run out while some remain unordered, the remainder lies on
/// or behind a cycle and is reported as [`ValidationErrorKind::CyclicDependency`].
pub fn topological_order_by_rank(
    problem: &SchedulingProblem,
    rank: &[usize],
) -> Result<Vec<usize>, ValidationError> {
    let n = problem.job_count();
    let succ = problem.successors();

    let mut indegree = vec![0usize; n];
    for list in &succ {
        for &s in list {
            indegree[s] += 1;
        }
    }

    let key = |j: usize| Reverse((rank.get(j).copied().unwrap_or(j), j));
    let mut ready: BinaryHeap<Reverse<(usize, usize)>> = (0..n)
        .filter(|&j| indegree[j] == 0)
        .map(key)
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some(Reverse((_, j))) = ready.pop() {
        order.push(j);
        for &s in &succ[j] {
            indegree[s] -= 1;
            if indegree[s] == 0 {
                ready.push(key(s));
            }
        }
    }

    if order.len() == n {
        Ok(order)
    } else {
        let stuck: Vec<usize> = (0..n).filter(|&j| indegree[j] > 0).collect();
        Err(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!("circular dependency detected involving jobs {stuck:?}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Job;

    fn chain_problem() -> SchedulingProblem {
        SchedulingProblem::new(vec![2])
            .with_job(Job::new(2).with_demand(0, 1))
            .with_job(Job::new(1).with_demand(0, 1).with_predecessor(0))
            .with_job(Job::new(3).with_demand(0, 2).with_predecessor(1))
    }

    fn kinds(problem: &SchedulingProblem) -> Vec<ValidationErrorKind> {
        validate_problem(problem)
            .unwrap_err()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_problem(&chain_problem()).is_ok());
    }

    #[test]
    fn test_empty_problem() {
        let k = kinds(&SchedulingProblem::default());
        assert!(k.contains(&ValidationErrorKind::NoJobs));
        assert!(k.contains(&ValidationErrorKind::NoResources));
    }

    #[test]
    fn test_non_positive_capacity() {
        let problem = SchedulingProblem::new(vec![1, 0]).with_job(Job::new(1));
        assert_eq!(kinds(&problem), vec![ValidationErrorKind::NonPositiveCapacity]);
    }

    #[test]
    fn test_negative_fields() {
        let problem = SchedulingProblem::new(vec![1])
            .with_job(Job::new(-1).with_release(-2).with_demand(0, -1));
        let k = kinds(&problem);
        assert!(k.contains(&ValidationErrorKind::NegativeDuration));
        assert!(k.contains(&ValidationErrorKind::NegativeRelease));
        assert!(k.contains(&ValidationErrorKind::NegativeDemand));
    }

    #[test]
    fn test_invalid_resource_reference() {
        let problem = SchedulingProblem::new(vec![1]).with_job(Job::new(1).with_demand(3, 1));
        assert_eq!(
            kinds(&problem),
            vec![ValidationErrorKind::InvalidResourceReference]
        );
    }

    #[test]
    fn test_invalid_predecessor() {
        let problem = SchedulingProblem::new(vec![1]).with_job(Job::new(1).with_predecessor(7));
        assert_eq!(kinds(&problem), vec![ValidationErrorKind::InvalidPredecessor]);
    }

    #[test]
    fn test_demand_exceeds_capacity() {
        // Two entries that only overflow once merged.
        let problem = SchedulingProblem::new(vec![3])
            .with_job(Job::new(1).with_demand(0, 2).with_demand(0, 2));
        let errors = validate_problem(&problem).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DemandExceedsCapacity);
        assert!(errors[0].message.contains("demands 4"));
    }

    #[test]
    fn test_two_job_cycle() {
        // 0 depends on 1, 1 depends on 0
        let problem = SchedulingProblem::new(vec![1])
            .with_job(Job::new(1).with_predecessor(1))
            .with_job(Job::new(1).with_predecessor(0));
        assert_eq!(kinds(&problem), vec![ValidationErrorKind::CyclicDependency]);
    }

    #[test]
    fn test_self_loop() {
        let problem = SchedulingProblem::new(vec![1]).with_job(Job::new(1).with_predecessor(0));
        assert_eq!(kinds(&problem), vec![ValidationErrorKind::CyclicDependency]);
    }

    #[test]
    fn test_cycle_reports_stuck_jobs() {
        // 0 free; 1 → 2 → 3 → 1 cycle; 4 waits behind the cycle
        let problem = SchedulingProblem::new(vec![1])
            .with_job(Job::new(1))
            .with_job(Job::new(1).with_predecessor(3))
            .with_job(Job::new(1).with_predecessor(1))
            .with_job(Job::new(1).with_predecessor(2))
            .with_job(Job::new(1).with_predecessor(3));
        let err = topological_order(&problem).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::CyclicDependency);
        assert!(err.message.contains("[1, 2, 3, 4]"));
    }

    #[test]
    fn test_topological_order_ties_by_index() {
        let problem = SchedulingProblem::new(vec![1])
            .with_job(Job::new(1).with_predecessor(2))
            .with_job(Job::new(1))
            .with_job(Job::new(1))
            .with_job(Job::new(1).with_predecessor(1));
        assert_eq!(topological_order(&problem).unwrap(), vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_topological_order_by_rank() {
        let problem = SchedulingProblem::new(vec![1])
            .with_job(Job::new(1))
            .with_job(Job::new(1))
            .with_job(Job::new(1).with_predecessor(0));
        // Prefer job 1, then job 0; job 2 still waits for job 0.
        let order = topological_order_by_rank(&problem, &[1, 0, 2]).unwrap();
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let mut problem = SchedulingProblem::new(vec![1]).with_job(Job::new(1));
        for j in 1..50_000 {
            problem = problem.with_job(Job::new(1).with_predecessor(j - 1));
        }
        let order = topological_order(&problem).unwrap();
        assert_eq!(order.len(), 50_000);
        assert_eq!(order[49_999], 49_999);
    }

    #[test]
    fn test_multiple_errors() {
        let problem = SchedulingProblem::new(vec![0])
            .with_job(Job::new(1).with_demand(4, 1).with_predecessor(9));
        let errors = validate_problem(&problem).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
