//! Project schedulers and KPI evaluation.
//!
//! Solves the RCPSP with release dates: every job gets an integer start
//! time respecting release dates, finish-to-start precedence and
//! per-time-unit renewable resource capacities.
//!
//! # Algorithm
//!
//! [`SerialScheduler`] is the serial schedule generation scheme: jobs are
//! taken in a precedence-respecting list and each starts as early as
//! resources allow. [`SamplingScheduler`] repeats it over seeded random
//! lists and keeps the best makespan. Neither is optimal in general.
//!
//! # KPI
//!
//! [`ScheduleKpi`] reports makespan, lower bounds, gap, utilization, flow
//! time and resource delay.
//!
//! # References
//!
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4

mod kpi;
mod profile;
mod sampling;
mod serial;

pub use kpi::ScheduleKpi;
pub use profile::ResourceProfile;
pub use sampling::{SamplingConfig, SamplingScheduler};
pub use serial::SerialScheduler;

use crate::error::SchedulingError;
use crate::models::{Schedule, SchedulingProblem};

/// Schedules a project given as flat vectors.
///
/// `demand[j]` lists `(resource, amount)` pairs and `preds[j]` the jobs
/// that must finish before `j` starts; both may be empty slices when no
/// job has any. Jobs are placed in ascending index order among those whose
/// predecessors are placed.
///
/// # Example
///
/// ```
/// use u_plan::scheduler::solve;
///
/// let s = solve(3, 1, &[2, 1, 3], &[0, 0, 0], &[5], &[], &[vec![], vec![0], vec![1]]).unwrap();
/// assert_eq!(s.start, vec![0, 2, 3]);
/// assert_eq!(s.cmax, 6);
/// ```
///
/// # Errors
/// Returns [`SchedulingError::Invalid`] on length mismatches, bad indices,
/// negative values, non-positive capacities, or a precedence cycle.
pub fn solve(
    n: usize,
    m: usize,
    dur: &[i64],
    rel: &[i64],
    cap: &[i64],
    demand: &[Vec<(usize, i64)>],
    preds: &[Vec<usize>],
) -> Result<Schedule, SchedulingError> {
    let problem = SchedulingProblem::from_parts(n, m, dur, rel, cap, demand, preds)?;
    SerialScheduler::new().schedule(&problem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_solve_contention() {
        let demand = vec![vec![(0, 1)], vec![(0, 1)]];
        let s = solve(2, 1, &[1, 1], &[0, 0], &[1], &demand, &[]).unwrap();
        assert_eq!(s.cmax, 2);
    }

    #[test]
    fn test_solve_length_mismatch() {
        let err = solve(2, 1, &[1], &[0, 0], &[1], &[], &[]).unwrap_err();
        assert!(err.has_kind(ValidationErrorKind::LengthMismatch));
    }

    #[test]
    fn test_solve_bad_predecessor() {
        let preds = vec![vec![], vec![7]];
        let err = solve(2, 1, &[1, 1], &[0, 0], &[1], &[], &preds).unwrap_err();
        assert!(err.has_kind(ValidationErrorKind::InvalidPredecessor));
    }

    #[test]
    fn test_solve_far_release_dates() {
        let s = solve(1, 1, &[1], &[4_000_000_000], &[1], &[vec![(0, 1)]], &[]).unwrap();
        assert_eq!(s.start, vec![4_000_000_000]);
        assert_eq!(s.cmax, 4_000_000_001);

        let demand = vec![vec![(0, 1)], vec![(0, 1)], vec![(0, 1)]];
        let s = solve(
            3,
            1,
            &[3_000_000_000, 5, 2],
            &[1_000_000_000, 0, 1_000_000_001],
            &[1],
            &demand,
            &[],
        )
        .unwrap();
        assert_eq!(s.start, vec![1_000_000_000, 0, 4_000_000_000]);
        assert_eq!(s.cmax, 4_000_000_002);
    }

    #[test]
    fn test_solve_logs_with_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);
        let s = solve(1, 1, &[4], &[2], &[1], &[], &[]).unwrap();
        assert_eq!(s.finish, vec![6]);
    }
}
