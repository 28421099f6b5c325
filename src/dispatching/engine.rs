//! Rule engine for multi-criteria job prioritization.
//!
//! Composes multiple priority rules with configurable evaluation modes.
//! Whatever the rules, a final tie-break by ascending job index keeps the
//! resulting order total and deterministic.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, PriorityRule, RuleContext, RuleScore};

/// How multiple rules are combined.
#[derive(Debug, Clone, Default)]
pub enum EvaluationMode {
    /// Apply rules in sequence; use next rule only on ties.
    #[default]
    Sequential,
    /// Compute weighted sum of all rule scores.
    Weighted,
}

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn PriorityRule>,
    weight: f64,
}

/// A composable rule engine for job prioritization.
///
/// # Example
/// ```
/// use u_plan::dispatching::{rules, RuleContext, RuleEngine};
/// use u_plan::models::{Job, SchedulingProblem};
///
/// let problem = SchedulingProblem::new(vec![1])
///     .with_job(Job::new(5))
///     .with_job(Job::new(2));
/// let ctx = RuleContext::new(&problem).unwrap();
///
/// let engine = RuleEngine::new().with_rule(rules::Spt);
/// assert_eq!(engine.sort_indices(&ctx), vec![1, 0]);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<WeightedRule>,
    mode: EvaluationMode,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine (pure ascending-index order).
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            mode: EvaluationMode::Sequential,
            epsilon: 1e-9,
        }
    }

    /// Engine reproducing the default ascending-index policy.
    pub fn by_index() -> Self {
        Self::new().with_rule(rules::JobIndex)
    }

    /// Adds a primary rule (weight 1.0).
    pub fn with_rule<R: PriorityRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 1.0,
        });
        self
    }

    /// Adds a weighted rule.
    pub fn with_weighted_rule<R: PriorityRule + 'static>(mut self, rule: R, weight: f64) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Adds a tie-breaking rule (weight 0.0, used only in Sequential mode).
    pub fn with_tie_breaker<R: PriorityRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 0.0,
        });
        self
    }

    /// Sets the evaluation mode.
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Number of configured rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Sorts jobs by priority (highest priority first).
    ///
    /// Ignores precedence; see [`rank`](Self::rank) for the
    /// precedence-aware use.
    pub fn sort_indices(&self, context: &RuleContext<'_>) -> Vec<usize> {
        let n = context.job_count();
        let mut indices: Vec<usize> = (0..n).collect();
        if n == 0 {
            return indices;
        }

        let scores: Vec<Vec<RuleScore>> = (0..n)
            .map(|j| {
                self.rules
                    .iter()
                    .map(|wr| wr.rule.evaluate(j, context))
                    .collect()
            })
            .collect();

        match &self.mode {
            EvaluationMode::Sequential => {
                indices.sort_by(|&a, &b| self.compare_sequential(&scores[a], &scores[b], a, b));
            }
            EvaluationMode::Weighted => {
                let totals: Vec<f64> = scores.iter().map(|s| self.weighted_score(s)).collect();
                indices.sort_by(|&a, &b| {
                    totals[a]
                        .partial_cmp(&totals[b])
                        .unwrap_or(Ordering::Equal)
                        .then(a.cmp(&b))
                });
            }
        }

        indices
    }

    /// Priority rank per job: `rank[j]` is `j`'s position in
    /// [`sort_indices`](Self::sort_indices).
    pub fn rank(&self, context: &RuleContext<'_>) -> Vec<usize> {
        let order = self.sort_indices(context);
        let mut rank = vec![0; order.len()];
        for (position, &j) in order.iter().enumerate() {
            rank[j] = position;
        }
        rank
    }

    /// Evaluates a single job and returns weighted scores from each rule.
    pub fn evaluate(&self, job: usize, context: &RuleContext<'_>) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(job, context) * wr.weight)
            .collect()
    }

    fn compare_sequential(
        &self,
        a: &[RuleScore],
        b: &[RuleScore],
        ja: usize,
        jb: usize,
    ) -> Ordering {
        for (score_a, score_b) in a.iter().zip(b) {
            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(score_b).unwrap_or(Ordering::Equal);
            }
        }
        ja.cmp(&jb)
    }

    fn weighted_score(&self, scores: &[RuleScore]) -> f64 {
        self.rules
            .iter()
            .zip(scores)
            .map(|(wr, s)| s * wr.weight)
            .sum()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.rules.iter().map(|wr| wr.rule.name()).collect();
        f.debug_struct("RuleEngine")
            .field("rules", &names)
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules::{EarliestRelease, Lpt, RandomKey, Spt};
    use crate::models::{Job, SchedulingProblem};

    fn problem() -> SchedulingProblem {
        SchedulingProblem::new(vec![1])
            .with_job(Job::new(3).with_release(5))
            .with_job(Job::new(1).with_release(5))
            .with_job(Job::new(3).with_release(0))
            .with_job(Job::new(1).with_release(0))
    }

    #[test]
    fn test_empty_engine_is_index_order() {
        let p = problem();
        let ctx = RuleContext::new(&p).unwrap();
        assert_eq!(RuleEngine::new().sort_indices(&ctx), vec![0, 1, 2, 3]);
        assert_eq!(RuleEngine::by_index().sort_indices(&ctx), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_single_rule_ties_by_index() {
        let p = problem();
        let ctx = RuleContext::new(&p).unwrap();
        let engine = RuleEngine::new().with_rule(Spt);
        assert_eq!(engine.sort_indices(&ctx), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_sequential_tie_breaker() {
        let p = problem();
        let ctx = RuleContext::new(&p).unwrap();
        let engine = RuleEngine::new()
            .with_rule(EarliestRelease)
            .with_tie_breaker(Spt);
        assert_eq!(engine.sort_indices(&ctx), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_weighted_mode() {
        let p = problem();
        let ctx = RuleContext::new(&p).unwrap();
        // score = 1.0 * release + 2.0 * (-duration)
        let engine = RuleEngine::new()
            .with_weighted_rule(EarliestRelease, 1.0)
            .with_weighted_rule(Lpt, 2.0)
            .with_mode(EvaluationMode::Weighted);
        // job 2: -6, job 3: -2, job 0: -1, job 1: 3
        assert_eq!(engine.sort_indices(&ctx), vec![2, 3, 0, 1]);
        assert_eq!(engine.evaluate(2, &ctx), vec![0.0, -6.0]);
    }

    #[test]
    fn test_rank_inverts_order() {
        let p = problem();
        let ctx = RuleContext::new(&p).unwrap();
        let engine = RuleEngine::new().with_rule(RandomKey::new(vec![0.9, 0.1, 0.5, 0.3]));
        assert_eq!(engine.sort_indices(&ctx), vec![1, 3, 2, 0]);
        assert_eq!(engine.rank(&ctx), vec![3, 0, 2, 1]);
    }

    #[test]
    fn test_debug_lists_rule_names() {
        let engine = RuleEngine::new().with_rule(Spt).with_tie_breaker(Lpt);
        let text = format!("{engine:?}");
        assert!(text.contains("SPT") && text.contains("LPT"));
        assert_eq!(engine.rule_count(), 2);
    }
}
