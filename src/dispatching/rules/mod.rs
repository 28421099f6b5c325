//! Built-in priority rules.
//!
//! # Categories
//!
//! - **Index**: JOB-INDEX (the default ascending-index policy)
//! - **Time-based**: SPT, LPT, ERD
//! - **Network-based**: MTS, LPF
//! - **Sampling**: RANDOM-KEY
//!
//! # Score Convention
//! All rules return lower scores for jobs that should be placed first.
//!
//! # References
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"
//! - Hartmann & Kolisch (2000), "Experimental evaluation of state-of-the-art
//!   heuristics for the RCPSP"

use rand::Rng;

use super::{PriorityRule, RuleContext, RuleScore};

// ======================== Index rule ========================

/// Ascending job index.
///
/// Reproduces the plain deterministic policy: among ready jobs, the one
/// with the smallest index goes first.
#[derive(Debug, Clone, Copy)]
pub struct JobIndex;

impl PriorityRule for JobIndex {
    fn name(&self) -> &'static str {
        "JOB-INDEX"
    }

    fn evaluate(&self, job: usize, _context: &RuleContext<'_>) -> RuleScore {
        job as f64
    }

    fn description(&self) -> &'static str {
        "Ascending Job Index"
    }
}

// ======================== Time-based rules ========================

/// Shortest Processing Time.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl PriorityRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, job: usize, context: &RuleContext<'_>) -> RuleScore {
        context.problem.jobs[job].duration as f64
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Longest Processing Time.
#[derive(Debug, Clone, Copy)]
pub struct Lpt;

impl PriorityRule for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn evaluate(&self, job: usize, context: &RuleContext<'_>) -> RuleScore {
        -(context.problem.jobs[job].duration as f64)
    }

    fn description(&self) -> &'static str {
        "Longest Processing Time"
    }
}

/// Earliest Release Date.
#[derive(Debug, Clone, Copy)]
pub struct EarliestRelease;

impl PriorityRule for EarliestRelease {
    fn name(&self) -> &'static str {
        "ERD"
    }

    fn evaluate(&self, job: usize, context: &RuleContext<'_>) -> RuleScore {
        context.problem.jobs[job].release as f64
    }

    fn description(&self) -> &'static str {
        "Earliest Release Date"
    }
}

// ======================== Network-based rules ========================

/// Most Total Successors.
///
/// Jobs that unlock more of the network go first.
#[derive(Debug, Clone, Copy)]
pub struct MostSuccessors;

impl PriorityRule for MostSuccessors {
    fn name(&self) -> &'static str {
        "MTS"
    }

    fn evaluate(&self, job: usize, context: &RuleContext<'_>) -> RuleScore {
        -(context.successor_counts()[job] as f64)
    }

    fn description(&self) -> &'static str {
        "Most Total Successors"
    }
}

/// Longest Path Following.
///
/// Jobs heading the longest remaining duration chain go first; the
/// critical path is scheduled before slack paths.
#[derive(Debug, Clone, Copy)]
pub struct LongestTail;

impl PriorityRule for LongestTail {
    fn name(&self) -> &'static str {
        "LPF"
    }

    fn evaluate(&self, job: usize, context: &RuleContext<'_>) -> RuleScore {
        -(context.tail_lengths[job] as f64)
    }

    fn description(&self) -> &'static str {
        "Longest Path Following"
    }
}

// ======================== Sampling rule ========================

/// Random priority keys.
///
/// Each job gets a fixed key in `[0, 1)`; jobs beyond the key vector score
/// last. Drives the multi-pass sampling scheduler.
#[derive(Debug, Clone)]
pub struct RandomKey {
    keys: Vec<f64>,
}

impl RandomKey {
    /// Wraps explicit keys.
    pub fn new(keys: Vec<f64>) -> Self {
        Self { keys }
    }

    /// Draws `n` keys from `rng`.
    pub fn sample<R: Rng>(n: usize, rng: &mut R) -> Self {
        Self {
            keys: (0..n).map(|_| rng.random::<f64>()).collect(),
        }
    }

    /// The underlying keys.
    pub fn keys(&self) -> &[f64] {
        &self.keys
    }
}

impl PriorityRule for RandomKey {
    fn name(&self) -> &'static str {
        "RANDOM-KEY"
    }

    fn evaluate(&self, job: usize, _context: &RuleContext<'_>) -> RuleScore {
        self.keys.get(job).copied().unwrap_or(f64::MAX)
    }

    fn description(&self) -> &'static str {
        "Random Priority Key"
    }
}
