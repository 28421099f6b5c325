//! Renewable resource usage profile.
//!
//! Tracks committed usage per resource as a step function over integer
//! time and answers the serial scheme's placement question: the earliest
//! start at which a job's demands fit for its whole duration.
//!
//! Each resource keeps a map from breakpoint to the usage level holding
//! until the next breakpoint. Before the first breakpoint and after the
//! last one usage is zero, so memory grows with the number of committed
//! jobs, never with the magnitude of release dates or durations.

use std::collections::BTreeMap;

/// Committed usage of every resource, as breakpoint step functions.
#[derive(Debug, Clone)]
pub struct ResourceProfile {
    capacities: Vec<i64>,
    levels: Vec<BTreeMap<i64, i64>>,
}

impl ResourceProfile {
    /// Creates an empty profile for the given capacities.
    pub fn new(capacities: &[i64]) -> Self {
        Self {
            capacities: capacities.to_vec(),
            levels: vec![BTreeMap::new(); capacities.len()],
        }
    }

    /// Number of resources tracked.
    pub fn resource_count(&self) -> usize {
        self.capacities.len()
    }

    /// Committed usage of resource `m` in time unit `t` (zero for an
    /// unknown resource).
    pub fn usage_at(&self, m: usize, t: i64) -> i64 {
        self.levels.get(m).map_or(0, |steps| level(steps, t))
    }

    /// Remaining capacity of resource `m` in time unit `t`, or `None` if
    /// `m` is not a resource of this profile.
    pub fn available_at(&self, m: usize, t: i64) -> Option<i64> {
        let capacity = self.capacities.get(m)?;
        Some(capacity - self.usage_at(m, t))
    }

    /// Smallest `t >= earliest` such that `demands` fit in every unit of
    /// `[t, t + duration)`, with at most one entry per resource.
    ///
    /// A conflict moves the candidate straight to the end of the latest
    /// overloaded step inside the window, so the search visits each
    /// breakpoint at most once per demand.
    ///
    /// Returns `None` if a demand names an unknown resource or exceeds its
    /// resource's capacity, since no start can ever fit.
    pub fn earliest_start(
        &self,
        demands: &[(usize, i64)],
        earliest: i64,
        duration: i64,
    ) -> Option<i64> {
        let mut load = Vec::with_capacity(demands.len());
        for &(m, amount) in demands {
            if amount <= 0 {
                continue;
            }
            let (&capacity, steps) = self.capacities.get(m).zip(self.levels.get(m))?;
            if amount > capacity {
                return None;
            }
            load.push((steps, capacity - amount));
        }

        let mut t = earliest;
        if duration <= 0 {
            return Some(t);
        }
        loop {
            let end = t.saturating_add(duration);
            let jump = load
                .iter()
                .filter_map(|&(steps, limit)| last_overload_end(steps, limit, t, end))
                .max();
            match jump {
                Some(next) => t = next,
                None => return Some(t),
            }
        }
    }

    /// Records `demands` over `[start, start + duration)`.
    ///
    /// Demands on unknown resources are ignored.
    pub fn commit(&mut self, demands: &[(usize, i64)], start: i64, duration: i64) {
        if duration <= 0 {
            return;
        }
        let end = start.saturating_add(duration);
        for &(m, amount) in demands {
            let Some(steps) = self.levels.get_mut(m) else {
                continue;
            };
            if amount == 0 {
                continue;
            }
            let at_start = level(steps, start);
            let at_end = level(steps, end);
            steps.entry(start).or_insert(at_start);
            steps.insert(end, at_end);
            for (_, usage) in steps.range_mut(start..end) {
                *usage += amount;
            }
        }
    }

    /// Latest time unit with committed usage on any resource, plus one.
    pub fn busy_until(&self) -> i64 {
        self.levels
            .iter()
            .filter_map(|steps| {
                let (&last_busy, _) = steps.iter().rev().find(|(_, usage)| **usage > 0)?;
                steps
                    .range(last_busy.saturating_add(1)..)
                    .next()
                    .map(|(&at, _)| at)
            })
            .max()
            .unwrap_or(0)
    }
}

/// Usage level of the step containing `t`.
fn level(steps: &BTreeMap<i64, i64>, t: i64) -> i64 {
    steps.range(..=t).next_back().map_or(0, |(_, &usage)| usage)
}

/// End of the latest step meeting `[from, to)` whose usage is above
/// `limit`, if any.
fn last_overload_end(steps: &BTreeMap<i64, i64>, limit: i64, from: i64, to: i64) -> Option<i64> {
    let mut overload_end = None;
    let mut overloaded = level(steps, from) > limit;
    for (&at, &usage) in steps.range(from.saturating_add(1)..to) {
        if overloaded {
            overload_end = Some(at);
        }
        overloaded = usage > limit;
    }
    if overloaded {
        // The tail after the last breakpoint is empty, so a step running
        // past `to` always ends at a later breakpoint.
        overload_end = Some(steps.range(to..).next().map_or(to, |(&at, _)| at));
    }
    overload_end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile() {
        let profile = ResourceProfile::new(&[2, 1]);
        assert_eq!(profile.resource_count(), 2);
        assert_eq!(profile.usage_at(0, 10), 0);
        assert_eq!(profile.available_at(1, 3), Some(1));
        assert_eq!(profile.earliest_start(&[(0, 2)], 4, 3), Some(4));
        assert_eq!(profile.busy_until(), 0);
    }

    #[test]
    fn test_commit_and_usage() {
        let mut profile = ResourceProfile::new(&[3]);
        profile.commit(&[(0, 2)], 1, 3);
        assert_eq!(profile.usage_at(0, 0), 0);
        assert_eq!(profile.usage_at(0, 1), 2);
        assert_eq!(profile.usage_at(0, 3), 2);
        assert_eq!(profile.usage_at(0, 4), 0);
        assert_eq!(profile.busy_until(), 4);
    }

    #[test]
    fn test_overlapping_commits_stack() {
        let mut profile = ResourceProfile::new(&[5]);
        profile.commit(&[(0, 2)], 0, 6);
        profile.commit(&[(0, 1)], 2, 2);
        profile.commit(&[(0, 1)], 3, 5);
        let usage: Vec<i64> = (0..9).map(|t| profile.usage_at(0, t)).collect();
        assert_eq!(usage, vec![2, 2, 3, 4, 3, 3, 1, 1, 0]);
        assert_eq!(profile.available_at(0, 3), Some(1));
        assert_eq!(profile.busy_until(), 8);
    }

    #[test]
    fn test_earliest_start_skips_conflicts() {
        let mut profile = ResourceProfile::new(&[2]);
        profile.commit(&[(0, 2)], 2, 2); // full in [2, 4)
        assert_eq!(profile.earliest_start(&[(0, 1)], 0, 3), Some(4));
        // length 2 fits before the block
        assert_eq!(profile.earliest_start(&[(0, 1)], 0, 2), Some(0));
    }

    #[test]
    fn test_earliest_start_multiple_resources() {
        let mut profile = ResourceProfile::new(&[1, 1]);
        profile.commit(&[(0, 1)], 0, 2);
        profile.commit(&[(1, 1)], 2, 2);
        // needs both resources for 1 unit: r0 busy [0,2), r1 busy [2,4)
        assert_eq!(profile.earliest_start(&[(0, 1), (1, 1)], 0, 1), Some(4));
        // only r1: free immediately
        assert_eq!(profile.earliest_start(&[(1, 1)], 0, 2), Some(0));
    }

    #[test]
    fn test_earliest_start_finds_gap_between_steps() {
        let mut profile = ResourceProfile::new(&[3]);
        profile.commit(&[(0, 3)], 0, 2);
        profile.commit(&[(0, 2)], 2, 3);
        profile.commit(&[(0, 3)], 8, 2);
        // usage: 3 3 2 2 2 0 0 0 3 3 0
        assert_eq!(profile.earliest_start(&[(0, 1)], 0, 4), Some(2));
        assert_eq!(profile.earliest_start(&[(0, 2)], 0, 3), Some(5));
        assert_eq!(profile.earliest_start(&[(0, 2)], 0, 4), Some(10));
        assert_eq!(profile.earliest_start(&[(0, 2)], 9, 1), Some(10));
    }

    #[test]
    fn test_zero_duration_fits_anywhere() {
        let mut profile = ResourceProfile::new(&[1]);
        profile.commit(&[(0, 1)], 0, 5);
        assert_eq!(profile.earliest_start(&[(0, 1)], 2, 0), Some(2));
        profile.commit(&[(0, 1)], 2, 0);
        assert_eq!(profile.usage_at(0, 2), 1);
    }

    #[test]
    fn test_far_horizon_stays_sparse() {
        let mut profile = ResourceProfile::new(&[1]);
        profile.commit(&[(0, 1)], 4_000_000_000, 3_000_000_000);
        assert_eq!(profile.usage_at(0, 3_999_999_999), 0);
        assert_eq!(profile.usage_at(0, 6_999_999_999), 1);
        assert_eq!(profile.levels[0].len(), 2);
        assert_eq!(
            profile.earliest_start(&[(0, 1)], 3_999_999_999, 2),
            Some(7_000_000_000)
        );
        assert_eq!(profile.busy_until(), 7_000_000_000);
    }

    #[test]
    fn test_unplaceable_demands() {
        let profile = ResourceProfile::new(&[2]);
        assert_eq!(profile.earliest_start(&[(0, 3)], 0, 1), None);
        assert_eq!(profile.earliest_start(&[(1, 1)], 0, 1), None);
        assert_eq!(profile.available_at(1, 0), None);
        assert_eq!(profile.usage_at(1, 0), 0);
        // zero amounts never block, even on unknown resources
        assert_eq!(profile.earliest_start(&[(7, 0)], 3, 2), Some(3));
    }
}
