//! Per-doctor duty counts derived from a roster.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{is_weekend, DutyCounts, DutyRole, MonthRoster, Staff};

/// Duty counts of one doctor for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub doctor: String,
    #[serde(flatten)]
    pub counts: DutyCounts,
    pub total: u32,
}

/// Column sums over all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTotals {
    #[serde(flatten)]
    pub counts: DutyCounts,
    pub total: u32,
}

/// Summary rows sorted by doctor name, plus headline totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSummary {
    pub rows: Vec<DoctorSummary>,
    pub totals: SummaryTotals,
}

impl RosterSummary {
    /// Counts every filled slot of `roster`.
    ///
    /// Every staff member gets a row, including those with no duties.
    /// Names in the roster but outside the staff (manual edits) get one too.
    pub fn from_roster(roster: &MonthRoster, staff: &Staff) -> Self {
        let mut counts: BTreeMap<String, DutyCounts> = staff
            .doctors()
            .iter()
            .map(|d| (d.name.clone(), DutyCounts::default()))
            .collect();

        for (date, entry) in roster.iter() {
            let weekend = is_weekend(date.weekday());
            for role in DutyRole::ALL {
                if let Some(doctor) = entry.assignee(role) {
                    counts
                        .entry(doctor.to_string())
                        .or_default()
                        .record(role, weekend);
                }
            }
        }

        let mut totals = SummaryTotals::default();
        let rows = counts
            .into_iter()
            .map(|(doctor, c)| {
                totals.counts += c;
                DoctorSummary {
                    doctor,
                    counts: c,
                    total: c.total(),
                }
            })
            .collect();
        totals.total = totals.counts.total();

        Self { rows, totals }
    }

    /// Row for a doctor.
    pub fn row(&self, doctor: &str) -> Option<&DoctorSummary> {
        self.rows.iter().find(|r| r.doctor == doctor)
    }

    /// Counts keyed by doctor name.
    pub fn counts_by_name(&self) -> BTreeMap<String, DutyCounts> {
        self.rows
            .iter()
            .map(|r| (r.doctor.clone(), r.counts))
            .collect()
    }
}
