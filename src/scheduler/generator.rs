//! Greedy day-by-day roster generation.
//!
//! # Algorithm
//!
//! 1. Walk the days of the month in order
//! 2. Sleep-in: eligible general-pool doctors not on duty the previous day;
//!    if nobody qualifies, retry without the previous-day exclusion
//! 3. Late: same, also excluding today's sleep-in assignee
//! 4. Cardiology: resolve the week's block holder
//! 5. Book loads and recuperation, carry the day's assignees forward
//!
//! The result is validated independently before it is returned.
//!
//! # Complexity
//! O(D × N) for D days and N doctors.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use super::cardio::resolve_cardio_day;
use super::{validate_roster, FairnessInput, PlanningProblem, RosterRequest, RosterSummary};
use crate::config::{EngineConfig, FairnessStrength};
use crate::dispatching::{
    is_available, rules, CandidateSelector, GenerationContext, SeededTieBreaker, Slot, TieBreaker,
};
use crate::error::RosterError;
use crate::ledger::{LedgerError, YearLedger};
use crate::models::{
    month_days, CardioWeeks, Day, DoctorId, DutyRole, MonthRoster, RosterEntry, ViolationReport,
};
use crate::validation::validate_request;

/// Everything one generation run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterOutcome {
    pub roster: MonthRoster,
    pub violations: ViolationReport,
    pub summary: RosterSummary,
    /// Week number → holder. Unfilled weeks are absent.
    pub cardio_weeks: CardioWeeks,
}

/// Month roster generator.
///
/// # Example
/// ```
/// use duty_roster::dispatching::FirstTieBreaker;
/// use duty_roster::scheduler::{RosterGenerator, RosterRequest};
///
/// let request = RosterRequest::new(2025, 3)
///     .with_general_doctors(["dr. a", "dr. b", "dr. c"])
///     .with_cardiology_doctors(["dr. x", "dr. y"]);
/// let outcome = RosterGenerator::default()
///     .generate_request(&request, &mut FirstTieBreaker)
///     .unwrap();
/// assert_eq!(outcome.roster.len(), 31);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RosterGenerator {
    config: EngineConfig,
}

impl RosterGenerator {
    /// Creates a generator with the given rule constants.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Creates a generator from a TOML configuration file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        Ok(Self::new(EngineConfig::from_toml_file(path)?))
    }

    /// Rule constants in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates a raw request and generates its roster.
    pub fn generate_request(
        &self,
        request: &RosterRequest,
        tie_breaker: &mut dyn TieBreaker,
    ) -> Result<RosterOutcome, RosterError> {
        let problem = validate_request(request)?;
        Ok(self.generate(&problem, tie_breaker))
    }

    /// Generates the month following the state kept in `ledger`.
    ///
    /// Fields the request leaves unset are taken from the ledger: the
    /// previous month's last cardiology holder, the year counters (as
    /// fairness input at `strength`) and the FTE weights. Ledger entries
    /// for doctors outside the request's pools are ignored.
    ///
    /// # Errors
    /// A month that is already finalized is rejected; unfinalize it first.
    pub fn generate_from_ledger(
        &self,
        request: &RosterRequest,
        ledger: &YearLedger,
        strength: FairnessStrength,
        tie_breaker: &mut dyn TieBreaker,
    ) -> Result<RosterOutcome, RosterError> {
        let (year, month) = (request.year, request.month);
        if ledger.is_finalized(year, month) {
            return Err(LedgerError::AlreadyFinalized { year, month }.into());
        }

        let in_universe = |name: &str| {
            request.general_doctors.iter().any(|d| d == name)
                || request.cardiology_doctors.iter().any(|d| d == name)
        };

        let mut request = request.clone();
        if request.prev_month_cardio.is_none() {
            request.prev_month_cardio = ledger
                .previous_month_cardio(year, month)
                .filter(|name| request.cardiology_doctors.iter().any(|d| d == name))
                .map(String::from);
        }
        if request.fairness.is_none() {
            let mut counters = ledger.counters_for(year);
            counters.retain(|name, _| in_universe(name));
            request.fairness = Some(FairnessInput::new(counters, strength));
        }
        if request.fte.is_empty() {
            request.fte = ledger
                .fte_map()
                .iter()
                .filter(|(name, _)| in_universe(name))
                .map(|(name, &fte)| (name.clone(), fte))
                .collect();
        }
        self.generate_request(&request, tie_breaker)
    }

    /// Generates with a seeded uniform tie-break source.
    pub fn generate_seeded(&self, problem: &PlanningProblem, seed: u64) -> RosterOutcome {
        self.generate(problem, &mut SeededTieBreaker::new(seed))
    }

    /// Generates the roster for a validated problem.
    pub fn generate(
        &self,
        problem: &PlanningProblem,
        tie_breaker: &mut dyn TieBreaker,
    ) -> RosterOutcome {
        let days = month_days(problem.year, problem.month, self.config.week_numbering);
        info!(
            event = "generate_start",
            year = problem.year,
            month = problem.month,
            doctors = problem.staff.len(),
            days = days.len(),
            fairness = problem.fairness.is_some(),
        );

        let mut ctx = GenerationContext::new(problem, &self.config);
        let alpha = ctx.alpha();
        let eps = self.config.tie_epsilon;
        let general = rules::default_rules_for(DutyRole::SleepIn, alpha, eps);
        let cardio = rules::default_rules_for(DutyRole::Cardio, alpha, eps);

        let mut roster = MonthRoster::new();
        for day in &days {
            let sleep_in =
                self.assign_general(&mut ctx, day, DutyRole::SleepIn, &[], &general, tie_breaker);
            let taken: Vec<DoctorId> = sleep_in.into_iter().collect();
            let late =
                self.assign_general(&mut ctx, day, DutyRole::Late, &taken, &general, tie_breaker);

            let today: Vec<DoctorId> = sleep_in.into_iter().chain(late).collect();
            let cardiology = resolve_cardio_day(&mut ctx, day, &today, &cardio, tie_breaker);
            if let Some(doctor) = cardiology {
                ctx.record(doctor, day, DutyRole::Cardio);
            }

            let staff = &problem.staff;
            let name = |id: Option<DoctorId>| id.map(|d| staff.name(d).to_string());
            let mut entry = RosterEntry::new(day.weekday_name());
            entry.sleep_in = name(sleep_in);
            entry.late = name(late);
            entry.cardio = name(cardiology);
            roster.insert(day.date, entry);

            ctx.end_day([sleep_in, late, cardiology]);
        }

        let cardio_weeks = ctx.cardio_weeks();
        let violations = validate_roster(&roster, problem, &cardio_weeks, &self.config);
        let summary = RosterSummary::from_roster(&roster, &problem.staff);

        info!(
            event = "generate_end",
            year = problem.year,
            month = problem.month,
            filled = roster.filled_slots(),
            unfilled = roster.unfilled_slots(),
            violations = violations.total(),
        );

        RosterOutcome {
            roster,
            violations,
            summary,
            cardio_weeks,
        }
    }

    /// Fills a general role, with the previous-day fallback.
    ///
    /// `taken` lists doctors already holding a role today.
    fn assign_general(
        &self,
        ctx: &mut GenerationContext<'_>,
        day: &Day,
        role: DutyRole,
        taken: &[DoctorId],
        selector: &CandidateSelector,
        tie_breaker: &mut dyn TieBreaker,
    ) -> Option<DoctorId> {
        let slot = Slot::new(day, role);
        let eligible: Vec<DoctorId> = {
            let view: &GenerationContext<'_> = ctx;
            view.staff()
                .general_pool()
                .iter()
                .copied()
                .filter(|d| !taken.contains(d) && is_available(view, *d, day, role))
                .collect()
        };

        let rested: Vec<DoctorId> = eligible
            .iter()
            .copied()
            .filter(|&d| ctx.previous_role_of(d).is_none())
            .collect();

        let mut chosen = selector.select(&rested, &slot, ctx, tie_breaker);
        if chosen.is_none() {
            chosen = selector.select(&eligible, &slot, ctx, tie_breaker);
            if let Some(doctor) = chosen {
                warn!(
                    event = "previous_day_fallback",
                    date = %day.date,
                    role = %role,
                    doctor = ctx.staff().name(doctor),
                );
            }
        }

        let Some(doctor) = chosen else {
            warn!(event = "slot_unfilled", date = %day.date, role = %role);
            return None;
        };

        ctx.record(doctor, day, role);
        debug!(
            event = "assigned",
            date = %day.date,
            role = %role,
            doctor = ctx.staff().name(doctor),
            month_load = ctx.load(doctor).total(),
        );
        Some(doctor)
    }
}
