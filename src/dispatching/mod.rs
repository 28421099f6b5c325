//! Priority rules and rule engine for job ordering.
//!
//! The serial scheduler places jobs in a precedence-respecting order; among
//! jobs whose predecessors are all placed, a priority rule decides which
//! goes next. Rules are composable through [`RuleEngine`], and every engine
//! breaks remaining ties by ascending job index.
//!
//! # Usage
//!
//! ```
//! use u_plan::dispatching::{rules, RuleEngine};
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::LongestTail)
//!     .with_tie_breaker(rules::MostSuccessors);
//! assert_eq!(engine.rule_count(), 2);
//! ```
//!
//! # References
//!
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod context;
mod engine;
pub mod rules;

pub use context::RuleContext;
pub use engine::{EvaluationMode, RuleEngine};

use std::fmt::Debug;

/// Score returned by a priority rule.
///
/// Lower scores = higher priority (placed first).
pub type RuleScore = f64;

/// A priority rule that evaluates how early a job should be placed.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait PriorityRule: Send + Sync + Debug {
    /// Rule name (e.g., "SPT", "LPF").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of `job` within the context's problem.
    fn evaluate(&self, job: usize, context: &RuleContext<'_>) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
