//! Built-in scoring rules.
//!
//! # Score Convention
//! All rules return lower scores for preferred candidates.

use super::{GenerationContext, RuleScore, ScoringRule, Slot};
use crate::models::{CounterKind, DoctorId, DutyRole};

/// Month-to-date load for the slot's role and weekend type.
///
/// For cardiology slots this is the weekday/weekend cardiology day count;
/// weekly-block selection uses [`CardioWeeksHeld`] instead.
#[derive(Debug, Clone, Copy)]
pub struct MonthLoad;

impl ScoringRule for MonthLoad {
    fn name(&self) -> &'static str {
        "LOAD"
    }

    fn evaluate(
        &self,
        doctor: DoctorId,
        slot: &Slot<'_>,
        context: &GenerationContext<'_>,
    ) -> RuleScore {
        let kind = CounterKind::for_role(slot.role, slot.day.is_weekend);
        context.load(doctor).get(kind) as f64
    }

    fn description(&self) -> &'static str {
        "Month-to-date load for the role"
    }
}

/// Negated historical deficit: under-served doctors score lower.
///
/// General roles use the matching counter column; cardiology uses the
/// combined weekday + weekend deficit. Zero when fairness is off.
#[derive(Debug, Clone, Copy)]
pub struct HistoricDeficit;

impl ScoringRule for HistoricDeficit {
    fn name(&self) -> &'static str {
        "DEFICIT"
    }

    fn evaluate(
        &self,
        doctor: DoctorId,
        slot: &Slot<'_>,
        context: &GenerationContext<'_>,
    ) -> RuleScore {
        -context.deficit(doctor, slot.role, slot.day.is_weekend)
    }

    fn description(&self) -> &'static str {
        "Historical fairness deficit"
    }
}

/// Cardiology weeks already held this month.
#[derive(Debug, Clone, Copy)]
pub struct CardioWeeksHeld;

impl ScoringRule for CardioWeeksHeld {
    fn name(&self) -> &'static str {
        "WEEKS"
    }

    fn evaluate(
        &self,
        doctor: DoctorId,
        _slot: &Slot<'_>,
        context: &GenerationContext<'_>,
    ) -> RuleScore {
        context.weeks_held(doctor) as f64
    }
}

/// Selector rules for a role: load (or weeks held for cardiology) plus the
/// deficit weighted by `alpha`. The deficit rule is omitted at `alpha == 0`.
pub fn default_rules_for(role: DutyRole, alpha: f64, epsilon: f64) -> super::CandidateSelector {
    let selector = match role {
        DutyRole::Cardio => super::CandidateSelector::new().with_rule(CardioWeeksHeld),
        _ => super::CandidateSelector::new().with_rule(MonthLoad),
    };
    let selector = selector.with_epsilon(epsilon);
    if alpha != 0.0 {
        selector.with_weighted_rule(HistoricDeficit, alpha)
    } else {
        selector
    }
}
