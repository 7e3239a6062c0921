//! Candidate dispatching for duty slots.
//!
//! Provides the hard availability filter, load and fairness scoring rules,
//! and a weighted selector that resolves score ties through an injected
//! [`TieBreaker`].
//!
//! # Usage
//!
//! ```
//! use duty_roster::dispatching::{rules, CandidateSelector, FirstTieBreaker};
//!
//! let selector = CandidateSelector::new()
//!     .with_rule(rules::MonthLoad)
//!     .with_weighted_rule(rules::HistoricDeficit, 0.8);
//! let mut tie_breaker = FirstTieBreaker;
//! // let doctor = selector.select(&candidates, &slot, &context, &mut tie_breaker);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod availability;
mod context;
mod engine;
pub mod rules;
mod tie_break;

pub use availability::{check_availability, is_available, Unavailable};
pub use context::GenerationContext;
pub use engine::CandidateSelector;
pub use tie_break::{FirstTieBreaker, SeededTieBreaker, TieBreaker};

use crate::models::{Day, DoctorId, DutyCategory, DutyRole};
use std::fmt::Debug;

/// Score returned by a scoring rule.
///
/// Lower scores = preferred candidate.
pub type RuleScore = f64;

/// One role on one day.
#[derive(Debug, Clone, Copy)]
pub struct Slot<'a> {
    pub day: &'a Day,
    pub role: DutyRole,
}

impl<'a> Slot<'a> {
    pub fn new(day: &'a Day, role: DutyRole) -> Self {
        Self { day, role }
    }

    /// Desiderata category consulted for this slot.
    pub fn category(&self) -> DutyCategory {
        self.role.category()
    }
}

/// A rule scoring a candidate for a slot.
///
/// # Score Convention
/// **Lower score = preferred.**
pub trait ScoringRule: Send + Sync + Debug {
    /// Short rule name (e.g., "LOAD").
    fn name(&self) -> &'static str;

    /// Scores `doctor` for `slot` given the current run state.
    fn evaluate(
        &self,
        doctor: DoctorId,
        slot: &Slot<'_>,
        context: &GenerationContext<'_>,
    ) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
