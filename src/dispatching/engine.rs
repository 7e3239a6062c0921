//! Candidate selector.
//!
//! Combines weighted scoring rules into a single score per candidate,
//! collects every candidate within `epsilon` of the best score and lets a
//! [`TieBreaker`] pick among them.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::sync::Arc;

use super::{GenerationContext, RuleScore, ScoringRule, Slot, TieBreaker};
use crate::models::DoctorId;

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn ScoringRule>,
    weight: f64,
}

/// Weighted-sum selector over scoring rules.
///
/// Lower combined score wins. Candidates holding a positive desideratum
/// for the slot's date supersede all others.
///
/// # Example
/// ```
/// use duty_roster::dispatching::{rules, CandidateSelector};
///
/// let selector = CandidateSelector::new()
///     .with_rule(rules::MonthLoad)
///     .with_weighted_rule(rules::HistoricDeficit, 0.8);
/// ```
#[derive(Clone)]
pub struct CandidateSelector {
    rules: Vec<WeightedRule>,
    epsilon: f64,
}

impl CandidateSelector {
    /// Creates an empty selector. Every candidate ties until rules are added.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            epsilon: 1e-9,
        }
    }

    /// Adds a rule with weight 1.0.
    pub fn with_rule<R: ScoringRule + 'static>(self, rule: R) -> Self {
        self.with_weighted_rule(rule, 1.0)
    }

    /// Adds a weighted rule.
    pub fn with_weighted_rule<R: ScoringRule + 'static>(mut self, rule: R, weight: f64) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Sets the tie tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Per-rule weighted scores for one candidate.
    pub fn evaluate(
        &self,
        doctor: DoctorId,
        slot: &Slot<'_>,
        context: &GenerationContext<'_>,
    ) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(doctor, slot, context) * wr.weight)
            .collect()
    }

    /// Combined score for one candidate.
    pub fn score(&self, doctor: DoctorId, slot: &Slot<'_>, context: &GenerationContext<'_>) -> f64 {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(doctor, slot, context) * wr.weight)
            .sum()
    }

    /// Candidates with a positive desideratum for the slot, or all of them
    /// when nobody has one.
    pub fn narrow_to_preferred(
        &self,
        candidates: &[DoctorId],
        slot: &Slot<'_>,
        context: &GenerationContext<'_>,
    ) -> Vec<DoctorId> {
        let category = slot.category();
        let preferred: Vec<DoctorId> = candidates
            .iter()
            .copied()
            .filter(|&d| {
                context
                    .rules(d)
                    .desiderata
                    .category(category)
                    .is_positive(slot.day.date)
            })
            .collect();
        if preferred.is_empty() {
            candidates.to_vec()
        } else {
            preferred
        }
    }

    /// The best-scoring candidates (after preference narrowing), in input order.
    pub fn best_candidates(
        &self,
        candidates: &[DoctorId],
        slot: &Slot<'_>,
        context: &GenerationContext<'_>,
    ) -> Vec<DoctorId> {
        let pool = self.narrow_to_preferred(candidates, slot, context);
        let scored: Vec<(DoctorId, f64)> = pool
            .into_iter()
            .map(|d| (d, self.score(d, slot, context)))
            .collect();
        let Some(best) = scored.iter().map(|&(_, s)| s).reduce(f64::min) else {
            return Vec::new();
        };
        scored
            .into_iter()
            .filter(|&(_, s)| (s - best).abs() <= self.epsilon)
            .map(|(d, _)| d)
            .collect()
    }

    /// Picks one candidate, or `None` for an empty list.
    pub fn select(
        &self,
        candidates: &[DoctorId],
        slot: &Slot<'_>,
        context: &GenerationContext<'_>,
        tie_breaker: &mut dyn TieBreaker,
    ) -> Option<DoctorId> {
        let tied = self.best_candidates(candidates, slot, context);
        match tied.len() {
            0 => None,
            1 => Some(tied[0]),
            n => {
                let idx = tie_breaker.next(n).min(n - 1);
                Some(tied[idx])
            }
        }
    }
}

impl Default for CandidateSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CandidateSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateSelector")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .field("epsilon", &self.epsilon)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, WeekNumbering};
    use crate::dispatching::{rules, FirstTieBreaker};
    use crate::models::{Day, DutyCategory, DutyCounts, DutyRole, Staff};
    use crate::scheduler::PlanningProblem;
    use chrono::NaiveDate;

    /// Always picks the last tied candidate.
    struct LastTieBreaker;

    impl TieBreaker for LastTieBreaker {
        fn next(&mut self, n: usize) -> usize {
            n - 1
        }
    }

    fn day(d: u32) -> Day {
        Day::new(
            NaiveDate::from_ymd_opt(2025, 3, d).unwrap(),
            WeekNumbering::MonthRelative,
        )
    }

    fn problem() -> PlanningProblem {
        let staff = Staff::from_pools(&["a", "b", "c"], &[] as &[&str]);
        PlanningProblem::new(2025, 3, staff).unwrap()
    }

    fn ids(p: &PlanningProblem) -> Vec<DoctorId> {
        p.staff.ids().collect()
    }

    #[test]
    fn test_lowest_load_wins() {
        let p = problem();
        let config = EngineConfig::default();
        let mut ctx = GenerationContext::new(&p, &config);
        let all = ids(&p);
        ctx.record(all[0], &day(3), DutyRole::SleepIn);
        ctx.record(all[1], &day(4), DutyRole::SleepIn);

        let d = day(5);
        let slot = Slot::new(&d, DutyRole::SleepIn);
        let selector = CandidateSelector::new().with_rule(rules::MonthLoad);
        assert_eq!(selector.best_candidates(&all, &slot, &ctx), vec![all[2]]);
        assert_eq!(
            selector.select(&all, &slot, &ctx, &mut LastTieBreaker),
            Some(all[2])
        );
    }

    #[test]
    fn test_ties_use_tie_breaker() {
        let p = problem();
        let config = EngineConfig::default();
        let ctx = GenerationContext::new(&p, &config);
        let all = ids(&p);
        let d = day(5);
        let slot = Slot::new(&d, DutyRole::Late);
        let selector = CandidateSelector::new().with_rule(rules::MonthLoad);

        assert_eq!(selector.best_candidates(&all, &slot, &ctx).len(), 3);
        assert_eq!(selector.select(&all, &slot, &ctx, &mut FirstTieBreaker), Some(all[0]));
        assert_eq!(selector.select(&all, &slot, &ctx, &mut LastTieBreaker), Some(all[2]));
    }

    #[test]
    fn test_weekend_load_separate_from_weekday() {
        let p = problem();
        let config = EngineConfig::default();
        let mut ctx = GenerationContext::new(&p, &config);
        let all = ids(&p);
        // Weekday sleep-in does not count against a weekend slot.
        ctx.record(all[0], &day(3), DutyRole::SleepIn);
        let saturday = day(8);
        let slot = Slot::new(&saturday, DutyRole::SleepIn);
        let selector = CandidateSelector::new().with_rule(rules::MonthLoad);
        assert_eq!(selector.best_candidates(&all, &slot, &ctx).len(), 3);
    }

    #[test]
    fn test_positive_desideratum_narrows_pool() {
        let mut p = problem();
        let all = ids(&p);
        p.rules_for_mut(all[1])
            .desiderata
            .category_mut(DutyCategory::General)
            .mark_positive(day(5).date);
        let config = EngineConfig::default();
        let mut ctx = GenerationContext::new(&p, &config);
        // b is the most loaded, but the preference wins.
        ctx.record(all[1], &day(3), DutyRole::SleepIn);
        let d = day(5);
        let slot = Slot::new(&d, DutyRole::SleepIn);
        let selector = CandidateSelector::new().with_rule(rules::MonthLoad);
        assert_eq!(selector.select(&all, &slot, &ctx, &mut FirstTieBreaker), Some(all[1]));

        // Preference for the other category has no effect.
        let cardio_slot = Slot::new(&d, DutyRole::Cardio);
        assert_eq!(selector.narrow_to_preferred(&all, &cardio_slot, &ctx).len(), 3);
    }

    #[test]
    fn test_deficit_bias() {
        let p = problem();
        let all = ids(&p);
        let p = p.with_fairness(
            1.0,
            vec![
                DutyCounts::from_array([5, 0, 0, 0, 0, 0]),
                DutyCounts::from_array([1, 0, 0, 0, 0, 0]),
                DutyCounts::from_array([3, 0, 0, 0, 0, 0]),
            ],
        );
        let config = EngineConfig::default();
        let ctx = GenerationContext::new(&p, &config);
        let d = day(5);
        let slot = Slot::new(&d, DutyRole::SleepIn);
        let selector = CandidateSelector::new()
            .with_rule(rules::MonthLoad)
            .with_weighted_rule(rules::HistoricDeficit, ctx.alpha());
        // b is most under-served.
        assert_eq!(selector.select(&all, &slot, &ctx, &mut FirstTieBreaker), Some(all[1]));
        let scores = selector.evaluate(all[1], &slot, &ctx);
        assert_eq!(scores.len(), 2);
        assert!((scores[1] + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_candidates() {
        let p = problem();
        let config = EngineConfig::default();
        let ctx = GenerationContext::new(&p, &config);
        let d = day(5);
        let slot = Slot::new(&d, DutyRole::SleepIn);
        let selector = CandidateSelector::new().with_rule(rules::MonthLoad);
        assert!(selector.select(&[], &slot, &ctx, &mut FirstTieBreaker).is_none());
    }
}
