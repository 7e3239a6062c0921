//! Hard eligibility of a doctor for a role on a day.
//!
//! Checks run in a fixed order and the first failing one is reported, so a
//! caller logging [`Unavailable`] sees the most fundamental reason.

use chrono::Datelike;
use std::fmt;

use super::GenerationContext;
use crate::models::{Day, DoctorId, DutyRole};

/// Why a doctor cannot take a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// Not a member of the pool serving this role.
    NotInPool,
    /// Resting after a sleep-in.
    Recuperating,
    /// Explicit non-work date.
    NonWorkDate,
    /// Fixed weekly day off.
    DayOff,
    /// The following day is a day off or non-work date.
    DayBeforeOff,
    /// First two weeks of the month are blocked.
    FirstTwoWeeks,
    /// Late duty for a cardiology-pool doctor.
    LateForCardiology,
    /// Late duty for a doctor with the no-late restriction.
    NoLate,
    /// Overlap doctor at the monthly general-duty cap.
    OverlapCap,
    /// Non-overlap doctor at the optional monthly late cap.
    LateCap,
    /// At the optional monthly general-duty cap.
    GeneralCap,
    /// Negative desideratum for this date and category.
    NegativeDesideratum,
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unavailable::NotInPool => "not in pool",
            Unavailable::Recuperating => "recuperating",
            Unavailable::NonWorkDate => "non-work date",
            Unavailable::DayOff => "fixed day off",
            Unavailable::DayBeforeOff => "day before day off",
            Unavailable::FirstTwoWeeks => "first two weeks blocked",
            Unavailable::LateForCardiology => "late not allowed for cardiology pool",
            Unavailable::NoLate => "no-late restriction",
            Unavailable::OverlapCap => "overlap general cap reached",
            Unavailable::LateCap => "late cap reached",
            Unavailable::GeneralCap => "general cap reached",
            Unavailable::NegativeDesideratum => "negative desideratum",
        };
        f.write_str(s)
    }
}

/// Checks every hard rule for `doctor` taking `role` on `day`.
pub fn check_availability(
    ctx: &GenerationContext<'_>,
    doctor: DoctorId,
    day: &Day,
    role: DutyRole,
) -> Result<(), Unavailable> {
    let staff = ctx.staff();
    let member = staff.get(doctor);
    let in_pool = if role.is_general() {
        member.general
    } else {
        member.cardiology
    };
    if !in_pool {
        return Err(Unavailable::NotInPool);
    }

    let rules = ctx.rules(doctor);
    let restriction = &rules.restriction;

    if ctx.is_recuperating(doctor, day.date) {
        return Err(Unavailable::Recuperating);
    }
    if rules.is_non_work(day.date) {
        return Err(Unavailable::NonWorkDate);
    }
    if restriction.blocks_weekday(day.weekday) {
        return Err(Unavailable::DayOff);
    }
    if let Some(next) = day.next_date() {
        if restriction.blocks_weekday(next.weekday()) || rules.is_non_work(next) {
            return Err(Unavailable::DayBeforeOff);
        }
    }
    if restriction.first_two_weeks_unavailable && day.week <= 2 {
        return Err(Unavailable::FirstTwoWeeks);
    }

    let config = ctx.config();
    match role {
        DutyRole::Late if member.cardiology => return Err(Unavailable::LateForCardiology),
        DutyRole::Late if restriction.no_late => return Err(Unavailable::NoLate),
        DutyRole::Late => {
            if let Some(cap) = config.max_late_for_non_overlap {
                let load = ctx.load(doctor);
                if load.late_weekday + load.late_weekend >= cap {
                    return Err(Unavailable::LateCap);
                }
            }
        }
        _ => {}
    }

    if role.is_general() {
        let general = ctx.general_count(doctor);
        if member.is_overlap() && general >= config.overlap_general_cap {
            return Err(Unavailable::OverlapCap);
        }
        if let Some(cap) = config.max_general_for_anyone {
            if general >= cap {
                return Err(Unavailable::GeneralCap);
            }
        }
    }

    if rules.desiderata.category(role.category()).is_negative(day.date) {
        return Err(Unavailable::NegativeDesideratum);
    }

    Ok(())
}

/// `true` if no hard rule blocks the assignment.
#[inline]
pub fn is_available(
    ctx: &GenerationContext<'_>,
    doctor: DoctorId,
    day: &Day,
    role: DutyRole,
) -> bool {
    check_availability(ctx, doctor, day, role).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, WeekNumbering};
    use crate::models::{DutyCategory, Restriction, Staff};
    use crate::scheduler::PlanningProblem;
    use chrono::{NaiveDate, Weekday};

    fn day(d: u32) -> Day {
        Day::new(
            NaiveDate::from_ymd_opt(2025, 3, d).unwrap(),
            WeekNumbering::MonthRelative,
        )
    }

    fn problem() -> PlanningProblem {
        // a, b general; c overlap; d cardiology only.
        let staff = Staff::from_pools(&["a", "b", "c"], &["c", "d"]);
        PlanningProblem::new(2025, 3, staff).unwrap()
    }

    fn id(p: &PlanningProblem, name: &str) -> DoctorId {
        p.staff.id_of(name).unwrap()
    }

    #[test]
    fn test_unrestricted_doctor_available() {
        let p = problem();
        let config = EngineConfig::default();
        let ctx = GenerationContext::new(&p, &config);
        assert!(is_available(&ctx, id(&p, "a"), &day(4), DutyRole::SleepIn));
        assert!(is_available(&ctx, id(&p, "a"), &day(4), DutyRole::Late));
    }

    #[test]
    fn test_pool_membership() {
        let p = problem();
        let config = EngineConfig::default();
        let ctx = GenerationContext::new(&p, &config);
        assert_eq!(
            check_availability(&ctx, id(&p, "a"), &day(4), DutyRole::Cardio),
            Err(Unavailable::NotInPool)
        );
        assert_eq!(
            check_availability(&ctx, id(&p, "d"), &day(4), DutyRole::SleepIn),
            Err(Unavailable::NotInPool)
        );
    }

    #[test]
    fn test_day_off_and_day_before() {
        let mut p = problem();
        let a = id(&p, "a");
        p.rules_for_mut(a).restriction = Restriction::new().with_day_off(Weekday::Wed);
        let config = EngineConfig::default();
        let ctx = GenerationContext::new(&p, &config);

        // 2025-03-05 is a Wednesday.
        assert_eq!(
            check_availability(&ctx, a, &day(5), DutyRole::SleepIn),
            Err(Unavailable::DayOff)
        );
        assert_eq!(
            check_availability(&ctx, a, &day(4), DutyRole::Late),
            Err(Unavailable::DayBeforeOff)
        );
        assert!(is_available(&ctx, a, &day(6), DutyRole::SleepIn));
    }

    #[test]
    fn test_non_work_date_blocks_day_and_day_before() {
        let mut p = problem();
        let b = id(&p, "b");
        p.rules_for_mut(b).toggle_non_work(day(12).date);
        let config = EngineConfig::default();
        let ctx = GenerationContext::new(&p, &config);
        assert_eq!(
            check_availability(&ctx, b, &day(12), DutyRole::SleepIn),
            Err(Unavailable::NonWorkDate)
        );
        assert_eq!(
            check_availability(&ctx, b, &day(11), DutyRole::SleepIn),
            Err(Unavailable::DayBeforeOff)
        );
    }

    #[test]
    fn test_first_two_weeks() {
        let mut p = problem();
        let a = id(&p, "a");
        p.rules_for_mut(a).restriction = Restriction::new().with_first_two_weeks_off();
        let config = EngineConfig::default();
        let ctx = GenerationContext::new(&p, &config);
        assert_eq!(
            check_availability(&ctx, a, &day(14), DutyRole::SleepIn),
            Err(Unavailable::FirstTwoWeeks)
        );
        assert!(is_available(&ctx, a, &day(15), DutyRole::SleepIn));
    }

    #[test]
    fn test_late_rules() {
        let mut p = problem();
        let b = id(&p, "b");
        p.rules_for_mut(b).restriction = Restriction::new().with_no_late();
        let config = EngineConfig::default();
        let ctx = GenerationContext::new(&p, &config);
        assert_eq!(
            check_availability(&ctx, id(&p, "c"), &day(4), DutyRole::Late),
            Err(Unavailable::LateForCardiology)
        );
        assert_eq!(
            check_availability(&ctx, b, &day(4), DutyRole::Late),
            Err(Unavailable::NoLate)
        );
        assert!(is_available(&ctx, b, &day(4), DutyRole::SleepIn));
    }

    #[test]
    fn test_overlap_cap() {
        let p = problem();
        let c = id(&p, "c");
        let config = EngineConfig::default();
        let mut ctx = GenerationContext::new(&p, &config);
        assert!(is_available(&ctx, c, &day(3), DutyRole::SleepIn));
        ctx.record(c, &day(3), DutyRole::SleepIn);
        assert_eq!(
            check_availability(&ctx, c, &day(10), DutyRole::SleepIn),
            Err(Unavailable::OverlapCap)
        );
        // The cap does not touch cardiology.
        assert!(is_available(&ctx, c, &day(10), DutyRole::Cardio));
    }

    #[test]
    fn test_recuperation() {
        let p = problem();
        let a = id(&p, "a");
        let config = EngineConfig::default();
        let mut ctx = GenerationContext::new(&p, &config);
        ctx.record(a, &day(3), DutyRole::SleepIn);
        assert_eq!(
            check_availability(&ctx, a, &day(4), DutyRole::Late),
            Err(Unavailable::Recuperating)
        );
    }

    #[test]
    fn test_optional_caps() {
        let p = problem();
        let a = id(&p, "a");
        let config = EngineConfig::default()
            .with_max_late_for_non_overlap(1)
            .with_max_general_for_anyone(2);
        let mut ctx = GenerationContext::new(&p, &config);
        ctx.record(a, &day(3), DutyRole::Late);
        assert_eq!(
            check_availability(&ctx, a, &day(10), DutyRole::Late),
            Err(Unavailable::LateCap)
        );
        assert!(is_available(&ctx, a, &day(10), DutyRole::SleepIn));
        ctx.record(a, &day(10), DutyRole::SleepIn);
        assert_eq!(
            check_availability(&ctx, a, &day(17), DutyRole::SleepIn),
            Err(Unavailable::GeneralCap)
        );
    }

    #[test]
    fn test_negative_desiderata_per_category() {
        let mut p = problem();
        let c = id(&p, "c");
        p.rules_for_mut(c)
            .desiderata
            .category_mut(DutyCategory::Cardiology)
            .mark_negative(day(6).date);
        let config = EngineConfig::default();
        let ctx = GenerationContext::new(&p, &config);
        assert_eq!(
            check_availability(&ctx, c, &day(6), DutyRole::Cardio),
            Err(Unavailable::NegativeDesideratum)
        );
        assert!(is_available(&ctx, c, &day(6), DutyRole::SleepIn));
    }
}
