//! Per-run generation state passed to availability checks and scoring rules.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::EngineConfig;
use crate::models::{CardioWeeks, Day, DoctorId, DoctorRules, DutyCounts, DutyRole, Staff};
use crate::scheduler::{FairnessTable, PlanningProblem};

/// Mutable state of one generation run.
///
/// Holds month-to-date loads, recuperation obligations, cardiology week
/// holders and the previous day's assignees. Created fresh for every call
/// and dropped once the roster is produced; nothing is shared between runs.
#[derive(Debug, Clone)]
pub struct GenerationContext<'a> {
    problem: &'a PlanningProblem,
    config: &'a EngineConfig,
    fairness: Option<FairnessTable>,
    alpha: f64,
    /// Month-to-date duties per doctor.
    load: Vec<DutyCounts>,
    /// Dates on which each doctor must rest after a sleep-in.
    recuperation: Vec<BTreeSet<NaiveDate>>,
    week_holders: BTreeMap<u32, DoctorId>,
    weeks_held: Vec<u32>,
    /// Previous day's assignees in [`DutyRole::ALL`] order.
    previous_day: [Option<DoctorId>; 3],
}

impl<'a> GenerationContext<'a> {
    /// Creates an empty run state for a problem.
    pub fn new(problem: &'a PlanningProblem, config: &'a EngineConfig) -> Self {
        let n = problem.staff.len();
        let (fairness, alpha) = match &problem.fairness {
            Some(settings) => (
                Some(FairnessTable::build(&problem.staff, &settings.counters)),
                settings.strength,
            ),
            None => (None, 0.0),
        };
        Self {
            problem,
            config,
            fairness,
            alpha,
            load: vec![DutyCounts::default(); n],
            recuperation: vec![BTreeSet::new(); n],
            week_holders: BTreeMap::new(),
            weeks_held: vec![0; n],
            previous_day: [None; 3],
        }
    }

    pub fn problem(&self) -> &'a PlanningProblem {
        self.problem
    }

    pub fn staff(&self) -> &'a Staff {
        &self.problem.staff
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    pub fn rules(&self, doctor: DoctorId) -> &'a DoctorRules {
        self.problem.rules_for(doctor)
    }

    /// Deficit weight α; zero when fairness is off.
    pub fn alpha(&self) -> f64 {
        if self.fairness.is_some() {
            self.alpha
        } else {
            0.0
        }
    }

    pub fn fairness(&self) -> Option<&FairnessTable> {
        self.fairness.as_ref()
    }

    /// Historical deficit for a role, or 0 without fairness.
    pub fn deficit(&self, doctor: DoctorId, role: DutyRole, is_weekend: bool) -> f64 {
        self.fairness
            .as_ref()
            .map_or(0.0, |t| t.for_role(doctor, role, is_weekend))
    }

    /// Month-to-date duties of a doctor.
    pub fn load(&self, doctor: DoctorId) -> DutyCounts {
        self.load[doctor.index()]
    }

    /// Month-to-date sleep-in + late duties.
    pub fn general_count(&self, doctor: DoctorId) -> u32 {
        self.load[doctor.index()].general_total()
    }

    pub fn is_recuperating(&self, doctor: DoctorId, date: NaiveDate) -> bool {
        self.recuperation[doctor.index()].contains(&date)
    }

    /// Previous day's assignee for a role.
    pub fn previous_assignee(&self, role: DutyRole) -> Option<DoctorId> {
        self.previous_day[role_slot(role)]
    }

    /// First role `doctor` held on the previous day, if any.
    pub fn previous_role_of(&self, doctor: DoctorId) -> Option<DutyRole> {
        DutyRole::ALL
            .into_iter()
            .find(|&r| self.previous_assignee(r) == Some(doctor))
    }

    /// Held sleep-in or late on the previous day.
    pub fn worked_previous_general(&self, doctor: DoctorId) -> bool {
        self.previous_assignee(DutyRole::SleepIn) == Some(doctor)
            || self.previous_assignee(DutyRole::Late) == Some(doctor)
    }

    /// Cardiology weeks held so far this month.
    pub fn weeks_held(&self, doctor: DoctorId) -> u32 {
        self.weeks_held[doctor.index()]
    }

    pub fn week_holder(&self, week: u32) -> Option<DoctorId> {
        self.week_holders.get(&week).copied()
    }

    /// Holder of the week before `week`; for week 1, the previous month's
    /// last holder.
    pub fn previous_week_holder(&self, week: u32) -> Option<DoctorId> {
        if week <= 1 {
            self.problem.prev_month_cardio
        } else {
            self.week_holder(week - 1)
        }
    }

    /// Books an assignment into the month loads.
    ///
    /// A sleep-in additionally blocks the doctor on its recuperation date.
    pub fn record(&mut self, doctor: DoctorId, day: &Day, role: DutyRole) {
        self.load[doctor.index()].record(role, day.is_weekend);
        if role == DutyRole::SleepIn {
            if let Some(rest) = day.recuperation_date() {
                self.recuperation[doctor.index()].insert(rest);
            }
        }
    }

    /// Makes `doctor` the cardiology holder of `week`.
    ///
    /// Returns `false` if the week already has a holder.
    pub fn assign_week(&mut self, week: u32, doctor: DoctorId) -> bool {
        if self.week_holders.contains_key(&week) {
            return false;
        }
        self.week_holders.insert(week, doctor);
        self.weeks_held[doctor.index()] += 1;
        true
    }

    /// Closes a day: its assignees, in [`DutyRole::ALL`] order, become the
    /// next day's exclusions.
    pub fn end_day(&mut self, assigned: [Option<DoctorId>; 3]) {
        self.previous_day = assigned;
    }

    /// Week holders by name.
    pub fn cardio_weeks(&self) -> CardioWeeks {
        let staff = self.staff();
        let mut weeks = CardioWeeks::new();
        for (&week, &doctor) in &self.week_holders {
            weeks.assign(week, staff.name(doctor));
        }
        weeks
    }
}

fn role_slot(role: DutyRole) -> usize {
    match role {
        DutyRole::SleepIn => 0,
        DutyRole::Late => 1,
        DutyRole::Cardio => 2,
    }
}
