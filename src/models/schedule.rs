//! Roster (solution) model and violation report.
//!
//! A roster maps every date of the month to the three duty assignees.
//! Violations are grouped per rule category so a caller can render a
//! checklist or decide which categories are fatal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::DutyCategory;

/// Duty roles filled each day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DutyRole {
    /// Overnight general duty, followed by a recuperation day.
    #[serde(rename = "inslaap")]
    SleepIn,
    /// Evening general duty.
    #[serde(rename = "late")]
    Late,
    /// Specialty duty, held per week.
    #[serde(rename = "cardio")]
    Cardio,
}

impl DutyRole {
    pub const ALL: [DutyRole; 3] = [DutyRole::SleepIn, DutyRole::Late, DutyRole::Cardio];

    /// Sleep-in and late.
    #[inline]
    pub fn is_general(self) -> bool {
        !matches!(self, DutyRole::Cardio)
    }

    /// Desiderata category the role draws on.
    pub fn category(self) -> DutyCategory {
        if self.is_general() {
            DutyCategory::General
        } else {
            DutyCategory::Cardiology
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DutyRole::SleepIn => "inslaap",
            DutyRole::Late => "late",
            DutyRole::Cardio => "cardio",
        }
    }
}

impl fmt::Display for DutyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assignees for one day. `None` marks an unfilled slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Weekday display name.
    pub weekday: String,
    /// Overnight general duty.
    pub sleep_in: Option<String>,
    /// Evening general duty.
    pub late: Option<String>,
    /// The week's cardiology holder, when free that day.
    pub cardio: Option<String>,
}

impl RosterEntry {
    pub fn new(weekday: impl Into<String>) -> Self {
        Self {
            weekday: weekday.into(),
            ..Default::default()
        }
    }

    pub fn assignee(&self, role: DutyRole) -> Option<&str> {
        match role {
            DutyRole::SleepIn => self.sleep_in.as_deref(),
            DutyRole::Late => self.late.as_deref(),
            DutyRole::Cardio => self.cardio.as_deref(),
        }
    }

    pub fn set(&mut self, role: DutyRole, doctor: Option<String>) {
        match role {
            DutyRole::SleepIn => self.sleep_in = doctor,
            DutyRole::Late => self.late = doctor,
            DutyRole::Cardio => self.cardio = doctor,
        }
    }

    /// Roles held by `doctor` on this day.
    pub fn roles_of<'a>(&'a self, doctor: &'a str) -> impl Iterator<Item = DutyRole> + 'a {
        DutyRole::ALL
            .into_iter()
            .filter(move |&r| self.assignee(r) == Some(doctor))
    }
}

/// One month of assignments keyed by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthRoster {
    days: BTreeMap<NaiveDate, RosterEntry>,
}

impl MonthRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, entry: RosterEntry) {
        self.days.insert(date, entry);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&RosterEntry> {
        self.days.get(&date)
    }

    pub fn get_mut(&mut self, date: NaiveDate) -> Option<&mut RosterEntry> {
        self.days.get_mut(&date)
    }

    /// Manually reassigns a slot. Returns `false` if the date is not rostered.
    pub fn assign(&mut self, date: NaiveDate, role: DutyRole, doctor: Option<String>) -> bool {
        match self.days.get_mut(&date) {
            Some(entry) => {
                entry.set(role, doctor);
                true
            }
            None => false,
        }
    }

    /// Entries in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &RosterEntry)> {
        self.days.iter().map(|(d, e)| (*d, e))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of slots with an assignee.
    pub fn filled_slots(&self) -> usize {
        self.days
            .values()
            .map(|e| DutyRole::ALL.iter().filter(|&&r| e.assignee(r).is_some()).count())
            .sum()
    }

    /// Number of slots without an assignee.
    pub fn unfilled_slots(&self) -> usize {
        self.days.len() * DutyRole::ALL.len() - self.filled_slots()
    }
}

/// Cardiology week holders: week number → doctor.
///
/// Weeks without a holder are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardioWeeks {
    weeks: BTreeMap<u32, String>,
}

impl CardioWeeks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, week: u32, doctor: impl Into<String>) {
        self.weeks.insert(week, doctor.into());
    }

    pub fn get(&self, week: u32) -> Option<&str> {
        self.weeks.get(&week).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.weeks.iter().map(|(w, d)| (*w, d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Holder of the highest-numbered assigned week: the continuity input
    /// for next month.
    pub fn last_week_doctor(&self) -> Option<&str> {
        self.weeks.values().next_back().map(String::as_str)
    }

    /// Number of weeks held by `doctor`.
    pub fn weeks_held_by(&self, doctor: &str) -> usize {
        self.weeks.values().filter(|d| *d == doctor).count()
    }
}

/// A role left without an assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedSlot {
    pub date: NaiveDate,
    pub weekday: String,
    pub role: DutyRole,
}

/// An assignment breaking a day-level rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayViolation {
    pub date: NaiveDate,
    pub weekday: String,
    pub role: DutyRole,
    pub doctor: String,
}

/// A late duty given to an overlap doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateOverlap {
    pub date: NaiveDate,
    pub weekday: String,
    pub doctor: String,
}

/// A monthly count above its limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitExceeded {
    pub doctor: String,
    pub count: u32,
    pub limit: u32,
}

/// The same doctor holding cardiology in two consecutive weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardioConsecutive {
    /// The second of the two weeks.
    pub week: u32,
    pub doctor: String,
    /// Week 1 repeats the previous month's last holder.
    pub cross_month: bool,
}

/// A doctor on duty on two consecutive days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatDay {
    pub date: NaiveDate,
    pub weekday: String,
    pub role: DutyRole,
    pub doctor: String,
    /// Role held the day before.
    pub previous_role: DutyRole,
}

/// Rule violations found in a roster, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationReport {
    pub unassigned: Vec<UnassignedSlot>,
    /// Assigned on a fixed day off.
    pub dnw: Vec<DayViolation>,
    /// Assigned the day before a fixed day off or explicit non-work date.
    pub day_before: Vec<DayViolation>,
    /// Assigned on an explicit non-work date.
    pub non_work_date: Vec<DayViolation>,
    pub late_overlap: Vec<LateOverlap>,
    pub overlap_cap: Vec<LimitExceeded>,
    pub cardio_consecutive: Vec<CardioConsecutive>,
    pub cardio_max: Vec<LimitExceeded>,
    pub repeat_day: Vec<RepeatDay>,
}

impl ViolationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of violations across categories.
    pub fn total(&self) -> usize {
        self.unassigned.len()
            + self.dnw.len()
            + self.day_before.len()
            + self.non_work_date.len()
            + self.late_overlap.len()
            + self.overlap_cap.len()
            + self.cardio_consecutive.len()
            + self.cardio_max.len()
            + self.repeat_day.len()
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// Human-readable lines, one per violation.
    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.total());
        for v in &self.dnw {
            out.push(format!(
                "{} ({}) {}: {} is scheduled on a fixed day off",
                v.date, v.weekday, v.role, v.doctor
            ));
        }
        for v in &self.day_before {
            out.push(format!(
                "{} ({}) {}: {} is scheduled the day before a day off",
                v.date, v.weekday, v.role, v.doctor
            ));
        }
        for v in &self.non_work_date {
            out.push(format!(
                "{} ({}) {}: {} is scheduled on a non-work date",
                v.date, v.weekday, v.role, v.doctor
            ));
        }
        for v in &self.late_overlap {
            out.push(format!(
                "{} ({}) late: {} belongs to the cardiology pool",
                v.date, v.weekday, v.doctor
            ));
        }
        for v in &self.cardio_consecutive {
            let suffix = if v.cross_month { " (across month boundary)" } else { "" };
            out.push(format!(
                "week {}: {} holds cardiology two weeks in a row{}",
                v.week, v.doctor, suffix
            ));
        }
        for v in &self.cardio_max {
            out.push(format!(
                "{}: {} cardiology weeks exceeds maximum {}",
                v.doctor, v.count, v.limit
            ));
        }
        for v in &self.overlap_cap {
            out.push(format!(
                "{}: {} general duties exceeds overlap cap {}",
                v.doctor, v.count, v.limit
            ));
        }
        for v in &self.repeat_day {
            out.push(format!(
                "{} ({}) {}: {} also held {} the day before",
                v.date, v.weekday, v.role, v.doctor, v.previous_role
            ));
        }
        for v in &self.unassigned {
            out.push(format!("{} ({}) {}: unfilled", v.date, v.weekday, v.role));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn sample_roster() -> MonthRoster {
        let mut r = MonthRoster::new();
        let mut e1 = RosterEntry::new("zaterdag");
        e1.sleep_in = Some("a".into());
        e1.late = Some("b".into());
        r.insert(date(1), e1);
        let mut e2 = RosterEntry::new("zondag");
        e2.sleep_in = Some("b".into());
        e2.cardio = Some("c".into());
        r.insert(date(2), e2);
        r
    }

    #[test]
    fn test_role_categories() {
        assert_eq!(DutyRole::SleepIn.category(), DutyCategory::General);
        assert_eq!(DutyRole::Late.category(), DutyCategory::General);
        assert_eq!(DutyRole::Cardio.category(), DutyCategory::Cardiology);
    }

    #[test]
    fn test_slot_counts() {
        let r = sample_roster();
        assert_eq!(r.len(), 2);
        assert_eq!(r.filled_slots(), 4);
        assert_eq!(r.unfilled_slots(), 2);
    }

    #[test]
    fn test_manual_assign() {
        let mut r = sample_roster();
        assert!(r.assign(date(1), DutyRole::Cardio, Some("c".into())));
        assert_eq!(r.get(date(1)).unwrap().assignee(DutyRole::Cardio), Some("c"));
        assert!(!r.assign(date(20), DutyRole::Cardio, None));
    }

    #[test]
    fn test_roles_of() {
        let r = sample_roster();
        let roles: Vec<DutyRole> = r.get(date(2)).unwrap().roles_of("b").collect();
        assert_eq!(roles, vec![DutyRole::SleepIn]);
    }

    #[test]
    fn test_cardio_weeks() {
        let mut w = CardioWeeks::new();
        w.assign(1, "a");
        w.assign(3, "b");
        w.assign(2, "a");
        assert_eq!(w.last_week_doctor(), Some("b"));
        assert_eq!(w.weeks_held_by("a"), 2);
        assert_eq!(w.get(4), None);
    }

    #[test]
    fn test_roster_serializes_with_iso_keys() {
        let json = serde_json::to_value(sample_roster()).unwrap();
        assert_eq!(json["2025-03-01"]["sleep_in"], "a");
        assert!(json["2025-03-02"]["late"].is_null());
    }

    #[test]
    fn test_report_totals() {
        let mut report = ViolationReport::new();
        assert!(report.is_clean());
        report.unassigned.push(UnassignedSlot {
            date: date(1),
            weekday: "zaterdag".into(),
            role: DutyRole::Late,
        });
        report.cardio_consecutive.push(CardioConsecutive {
            week: 1,
            doctor: "a".into(),
            cross_month: true,
        });
        assert_eq!(report.total(), 2);
        let messages = report.messages();
        assert!(messages.iter().any(|m| m.contains("across month boundary")));
        assert!(messages.iter().any(|m| m.contains("unfilled")));
    }
}
