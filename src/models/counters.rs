//! Duty counters split by role and weekday/weekend.
//!
//! The same six-count shape is used for historical year counters, the
//! per-doctor summary of a generated month, and finalization snapshots.
//! Serialized keys (`iw`, `iwe`, `lw`, `lwe`, `cw`, `cwe`) match the
//! persisted counter documents.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

use super::DutyRole;

/// Six non-negative duty counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyCounts {
    #[serde(rename = "iw", default)]
    pub sleep_in_weekday: u32,
    #[serde(rename = "iwe", default)]
    pub sleep_in_weekend: u32,
    #[serde(rename = "lw", default)]
    pub late_weekday: u32,
    #[serde(rename = "lwe", default)]
    pub late_weekend: u32,
    #[serde(rename = "cw", default)]
    pub cardio_weekday: u32,
    #[serde(rename = "cwe", default)]
    pub cardio_weekend: u32,
}

/// One of the six counter columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    SleepInWeekday,
    SleepInWeekend,
    LateWeekday,
    LateWeekend,
    CardioWeekday,
    CardioWeekend,
}

impl CounterKind {
    pub const ALL: [CounterKind; 6] = [
        CounterKind::SleepInWeekday,
        CounterKind::SleepInWeekend,
        CounterKind::LateWeekday,
        CounterKind::LateWeekend,
        CounterKind::CardioWeekday,
        CounterKind::CardioWeekend,
    ];

    /// Column for a role on a weekday or weekend day.
    pub fn for_role(role: DutyRole, is_weekend: bool) -> Self {
        match (role, is_weekend) {
            (DutyRole::SleepIn, false) => CounterKind::SleepInWeekday,
            (DutyRole::SleepIn, true) => CounterKind::SleepInWeekend,
            (DutyRole::Late, false) => CounterKind::LateWeekday,
            (DutyRole::Late, true) => CounterKind::LateWeekend,
            (DutyRole::Cardio, false) => CounterKind::CardioWeekday,
            (DutyRole::Cardio, true) => CounterKind::CardioWeekend,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl DutyCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds counts from the six values in column order.
    pub fn from_array(values: [u32; 6]) -> Self {
        let [iw, iwe, lw, lwe, cw, cwe] = values;
        Self {
            sleep_in_weekday: iw,
            sleep_in_weekend: iwe,
            late_weekday: lw,
            late_weekend: lwe,
            cardio_weekday: cw,
            cardio_weekend: cwe,
        }
    }

    pub fn to_array(self) -> [u32; 6] {
        [
            self.sleep_in_weekday,
            self.sleep_in_weekend,
            self.late_weekday,
            self.late_weekend,
            self.cardio_weekday,
            self.cardio_weekend,
        ]
    }

    pub fn get(&self, kind: CounterKind) -> u32 {
        self.to_array()[kind.index()]
    }

    pub fn get_mut(&mut self, kind: CounterKind) -> &mut u32 {
        match kind {
            CounterKind::SleepInWeekday => &mut self.sleep_in_weekday,
            CounterKind::SleepInWeekend => &mut self.sleep_in_weekend,
            CounterKind::LateWeekday => &mut self.late_weekday,
            CounterKind::LateWeekend => &mut self.late_weekend,
            CounterKind::CardioWeekday => &mut self.cardio_weekday,
            CounterKind::CardioWeekend => &mut self.cardio_weekend,
        }
    }

    /// Records one duty.
    pub fn record(&mut self, role: DutyRole, is_weekend: bool) {
        *self.get_mut(CounterKind::for_role(role, is_weekend)) += 1;
    }

    /// Sleep-in + late duties.
    pub fn general_total(&self) -> u32 {
        self.sleep_in_weekday + self.sleep_in_weekend + self.late_weekday + self.late_weekend
    }

    /// Cardiology duties, weekday + weekend.
    pub fn cardio_total(&self) -> u32 {
        self.cardio_weekday + self.cardio_weekend
    }

    pub fn total(&self) -> u32 {
        self.general_total() + self.cardio_total()
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }

    /// Column-wise subtraction; `None` if any column would go negative.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        let a = self.to_array();
        let b = other.to_array();
        let mut out = [0u32; 6];
        for (slot, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
            *slot = x.checked_sub(*y)?;
        }
        Some(Self::from_array(out))
    }
}

impl Add for DutyCounts {
    type Output = DutyCounts;

    fn add(self, other: Self) -> Self {
        let a = self.to_array();
        let b = other.to_array();
        Self::from_array(std::array::from_fn(|i| a[i] + b[i]))
    }
}

impl AddAssign for DutyCounts {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_totals() {
        let mut c = DutyCounts::new();
        c.record(DutyRole::SleepIn, false);
        c.record(DutyRole::SleepIn, true);
        c.record(DutyRole::Late, false);
        c.record(DutyRole::Cardio, true);
        c.record(DutyRole::Cardio, true);
        assert_eq!(c.general_total(), 3);
        assert_eq!(c.cardio_total(), 2);
        assert_eq!(c.total(), 5);
        assert_eq!(c.get(CounterKind::CardioWeekend), 2);
    }

    #[test]
    fn test_checked_sub_underflow() {
        let a = DutyCounts::from_array([2, 0, 1, 0, 0, 0]);
        let b = DutyCounts::from_array([1, 0, 1, 0, 0, 0]);
        assert_eq!(a.checked_sub(b), Some(DutyCounts::from_array([1, 0, 0, 0, 0, 0])));
        assert_eq!(b.checked_sub(a), None);
    }

    #[test]
    fn test_add() {
        let a = DutyCounts::from_array([1, 2, 3, 4, 5, 6]);
        let mut b = a;
        b += a;
        assert_eq!(b.to_array(), [2, 4, 6, 8, 10, 12]);
    }

    #[test]
    fn test_persisted_keys() {
        let json = r#"{"iw":3,"iwe":1,"lw":2,"lwe":0,"cw":7,"cwe":2}"#;
        let c: DutyCounts = serde_json::from_str(json).unwrap();
        assert_eq!(c.sleep_in_weekday, 3);
        assert_eq!(c.cardio_total(), 9);

        let partial: DutyCounts = serde_json::from_str(r#"{"cw":1}"#).unwrap();
        assert_eq!(partial.total(), 1);
    }
}
