//! Duty roster domain models.
//!
//! Provides the data types for describing a planning month and its result:
//! the doctor universe, per-doctor rules, historical counters, and the
//! generated roster with its violation report.
//!
//! # Domain Mappings
//!
//! | duty-roster | Generic scheduling |
//! |-------------|--------------------|
//! | Doctor | Resource |
//! | DutyRole on a Day | Activity slot |
//! | Restriction / DateSets | Calendar / availability |
//! | MonthRoster | Schedule |

mod calendar;
mod counters;
mod doctor;
mod preferences;
mod schedule;

pub use calendar::{
    days_in_month, is_weekend, month_days, month_key, parse_weekday, previous_month,
    week_of_month, weekday_name, Day,
};
pub use counters::{CounterKind, DutyCounts};
pub use doctor::{Doctor, DoctorId, Staff};
pub use preferences::{DateSets, Desiderata, DoctorRules, DutyCategory, Restriction};
pub use schedule::{
    CardioConsecutive, CardioWeeks, DayViolation, DutyRole, LateOverlap, LimitExceeded,
    MonthRoster, RepeatDay, RosterEntry, UnassignedSlot, ViolationReport,
};
