//! Precomputed project data for priority rule evaluation.

use std::sync::OnceLock;

use crate::error::SchedulingError;
use crate::models::SchedulingProblem;
use crate::validation;

/// Graph facts about a validated problem, shared by all rules.
///
/// Built once per scheduling run. Requires an acyclic precedence graph.
/// Transitive successor counts need O(N²) bits and are only computed the
/// first time a rule asks for them.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    /// The problem being scheduled.
    pub problem: &'a SchedulingProblem,
    /// Direct successors per job.
    pub successors: Vec<Vec<usize>>,
    /// Longest duration path from a job's start to the project end,
    /// including the job itself.
    pub tail_lengths: Vec<i64>,
    order: Vec<usize>,
    successor_counts: OnceLock<Vec<usize>>,
}

impl<'a> RuleContext<'a> {
    /// Computes successor and path data for `problem`.
    ///
    /// # Errors
    /// Returns a cyclic-dependency error if no topological order exists.
    pub fn new(problem: &'a SchedulingProblem) -> Result<Self, SchedulingError> {
        let order = validation::topological_order(problem).map_err(|e| vec![e])?;
        let n = problem.job_count();
        let successors = problem.successors();

        // Reverse topological sweep: every successor is final before its
        // predecessors are visited.
        let mut tail_lengths = vec![0i64; n];
        for &j in order.iter().rev() {
            let longest_after = successors[j]
                .iter()
                .map(|&s| tail_lengths[s])
                .max()
                .unwrap_or(0);
            tail_lengths[j] = problem.jobs[j].duration + longest_after;
        }

        Ok(Self {
            problem,
            successors,
            tail_lengths,
            order,
            successor_counts: OnceLock::new(),
        })
    }

    /// Number of transitive successors per job.
    pub fn successor_counts(&self) -> &[usize] {
        self.successor_counts.get_or_init(|| self.count_successors())
    }

    /// Bitset reachability in reverse topological order.
    fn count_successors(&self) -> Vec<usize> {
        let n = self.job_count();
        let words = n.div_ceil(64);
        let mut reach = vec![Vec::new(); n];
        for &j in self.order.iter().rev() {
            let mut bits = vec![0u64; words];
            for &s in &self.successors[j] {
                bits[s / 64] |= 1 << (s % 64);
                for (w, word) in bits.iter_mut().zip(&reach[s]) {
                    *w |= word;
                }
            }
            reach[j] = bits;
        }
        reach
            .iter()
            .map(|bits| bits.iter().map(|w| w.count_ones() as usize).sum())
            .collect()
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.problem.job_count()
    }

    /// Longest precedence chain, ignoring resources and release dates.
    pub fn critical_path_length(&self) -> i64 {
        self.tail_lengths.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules::{MostSuccessors, Spt};
    use crate::dispatching::RuleEngine;
    use crate::models::Job;
    use crate::validation::ValidationErrorKind;

    // 0 → 1 → 3, 0 → 2 → 3, 4 alone
    fn diamond() -> SchedulingProblem {
        SchedulingProblem::new(vec![1])
            .with_job(Job::new(2))
            .with_job(Job::new(3).with_predecessor(0))
            .with_job(Job::new(1).with_predecessor(0))
            .with_job(Job::new(4).with_predecessors([1, 2]))
            .with_job(Job::new(5))
    }

    #[test]
    fn test_successor_counts() {
        let problem = diamond();
        let ctx = RuleContext::new(&problem).unwrap();
        assert_eq!(ctx.successor_counts(), &[3, 1, 1, 0, 0]);
        assert_eq!(ctx.successors[0], vec![1, 2]);
    }

    #[test]
    fn test_tail_lengths() {
        let problem = diamond();
        let ctx = RuleContext::new(&problem).unwrap();
        assert_eq!(ctx.tail_lengths, vec![9, 7, 5, 4, 5]);
        assert_eq!(ctx.critical_path_length(), 9);
    }

    #[test]
    fn test_wide_graph_bitsets() {
        // One root with 130 direct successors spans three bitset words.
        let mut problem = SchedulingProblem::new(vec![1]).with_job(Job::new(1));
        for _ in 0..130 {
            problem = problem.with_job(Job::new(1).with_predecessor(0));
        }
        let ctx = RuleContext::new(&problem).unwrap();
        assert_eq!(ctx.successor_counts()[0], 130);
        assert_eq!(ctx.tail_lengths[0], 2);
    }

    #[test]
    fn test_successor_counts_computed_on_demand() {
        let problem = diamond();
        let ctx = RuleContext::new(&problem).unwrap();
        RuleEngine::new().with_rule(Spt).rank(&ctx);
        assert!(ctx.successor_counts.get().is_none());

        RuleEngine::new().with_rule(MostSuccessors).rank(&ctx);
        assert_eq!(ctx.successor_counts.get().map(Vec::len), Some(5));
        assert_eq!(ctx.successor_counts()[0], 3);
    }

    #[test]
    fn test_cycle_rejected() {
        let problem = SchedulingProblem::new(vec![1])
            .with_job(Job::new(1).with_predecessor(1))
            .with_job(Job::new(1).with_predecessor(0));
        let err = RuleContext::new(&problem).unwrap_err();
        assert!(err.has_kind(ValidationErrorKind::CyclicDependency));
    }
}
