//! Per-doctor restrictions and desiderata.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Duty category a desideratum applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyCategory {
    /// Sleep-in and late duties.
    General,
    Cardiology,
}

/// Fixed availability rules for a doctor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    /// Weekdays on which the doctor never works.
    pub days_not_work: HashSet<Weekday>,
    /// Never assign the late duty.
    pub no_late: bool,
    /// Unavailable during weeks 1 and 2 of the month.
    pub first_two_weeks_unavailable: bool,
}

impl Restriction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day_off(mut self, weekday: Weekday) -> Self {
        self.days_not_work.insert(weekday);
        self
    }

    pub fn with_no_late(mut self) -> Self {
        self.no_late = true;
        self
    }

    pub fn with_first_two_weeks_off(mut self) -> Self {
        self.first_two_weeks_unavailable = true;
        self
    }

    #[inline]
    pub fn blocks_weekday(&self, weekday: Weekday) -> bool {
        self.days_not_work.contains(&weekday)
    }
}

/// Positive and negative dates for one doctor and category.
///
/// A date is never in both sets: marking it on one side clears the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSets {
    positive: BTreeSet<NaiveDate>,
    negative: BTreeSet<NaiveDate>,
}

impl DateSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_positive(&mut self, date: NaiveDate) {
        self.negative.remove(&date);
        self.positive.insert(date);
    }

    pub fn mark_negative(&mut self, date: NaiveDate) {
        self.positive.remove(&date);
        self.negative.insert(date);
    }

    /// Adds the date as positive, or removes it if already positive.
    pub fn toggle_positive(&mut self, date: NaiveDate) {
        if !self.positive.remove(&date) {
            self.mark_positive(date);
        }
    }

    /// Adds the date as negative, or removes it if already negative.
    pub fn toggle_negative(&mut self, date: NaiveDate) {
        if !self.negative.remove(&date) {
            self.mark_negative(date);
        }
    }

    #[inline]
    pub fn is_positive(&self, date: NaiveDate) -> bool {
        self.positive.contains(&date)
    }

    #[inline]
    pub fn is_negative(&self, date: NaiveDate) -> bool {
        self.negative.contains(&date)
    }

    pub fn positive(&self) -> &BTreeSet<NaiveDate> {
        &self.positive
    }

    pub fn negative(&self) -> &BTreeSet<NaiveDate> {
        &self.negative
    }
}

/// A doctor's desiderata for both categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Desiderata {
    pub general: DateSets,
    pub cardiology: DateSets,
}

impl Desiderata {
    pub fn category(&self, category: DutyCategory) -> &DateSets {
        match category {
            DutyCategory::General => &self.general,
            DutyCategory::Cardiology => &self.cardiology,
        }
    }

    pub fn category_mut(&mut self, category: DutyCategory) -> &mut DateSets {
        match category {
            DutyCategory::General => &mut self.general,
            DutyCategory::Cardiology => &mut self.cardiology,
        }
    }
}

/// All rules attached to one doctor for a planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRules {
    pub restriction: Restriction,
    pub desiderata: Desiderata,
    /// Explicit dates on which the doctor takes no duty at all.
    pub non_work: BTreeSet<NaiveDate>,
}

impl DoctorRules {
    #[inline]
    pub fn is_non_work(&self, date: NaiveDate) -> bool {
        self.non_work.contains(&date)
    }

    /// Toggles an explicit non-work date.
    pub fn toggle_non_work(&mut self, date: NaiveDate) {
        if !self.non_work.remove(&date) {
            self.non_work.insert(date);
        }
    }
}
