//! Roster validation.
//!
//! Re-checks a finished roster against the problem's rules. Only the roster,
//! the problem inputs and the cardiology week map are consulted, so
//! manually edited rosters validate the same way as generated ones.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::models::{
    weekday_name, CardioConsecutive, CardioWeeks, DayViolation, DoctorRules, DutyRole,
    LateOverlap, LimitExceeded, MonthRoster, RepeatDay, RosterEntry, UnassignedSlot,
    ViolationReport,
};
use crate::scheduler::PlanningProblem;

/// Collects every rule violation in `roster`.
///
/// Records within a category are in date order, then role order.
pub fn validate_roster(
    roster: &MonthRoster,
    problem: &PlanningProblem,
    cardio_weeks: &CardioWeeks,
    config: &EngineConfig,
) -> ViolationReport {
    let staff = &problem.staff;
    let mut report = ViolationReport::new();
    let mut general_counts: BTreeMap<&str, u32> = BTreeMap::new();
    let mut previous: Option<(NaiveDate, &RosterEntry)> = None;

    for (date, entry) in roster.iter() {
        let weekday = weekday_name(date.weekday());
        let yesterday = previous
            .filter(|(d, _)| d.succ_opt() == Some(date))
            .map(|(_, e)| e);

        for role in DutyRole::ALL {
            let Some(doctor) = entry.assignee(role) else {
                report.unassigned.push(UnassignedSlot {
                    date,
                    weekday: weekday.to_string(),
                    role,
                });
                continue;
            };

            if role.is_general() {
                *general_counts.entry(doctor).or_default() += 1;
            }

            let violation = || DayViolation {
                date,
                weekday: weekday.to_string(),
                role,
                doctor: doctor.to_string(),
            };

            if let Some(rules) = problem.rules_by_name(doctor) {
                if rules.restriction.blocks_weekday(date.weekday()) {
                    report.dnw.push(violation());
                }
                if rules.is_non_work(date) {
                    report.non_work_date.push(violation());
                }
                if blocks_following_day(rules, date) {
                    report.day_before.push(violation());
                }
            }

            if role == DutyRole::Late {
                let in_cardio = staff
                    .id_of(doctor)
                    .is_some_and(|id| staff.get(id).cardiology);
                if in_cardio {
                    report.late_overlap.push(LateOverlap {
                        date,
                        weekday: weekday.to_string(),
                        doctor: doctor.to_string(),
                    });
                }
            }

            if let Some(prev) = yesterday {
                // Cardiology holders stay on duty for their whole week.
                let previous_role = prev
                    .roles_of(doctor)
                    .find(|&r| role.is_general() || r.is_general());
                if let Some(previous_role) = previous_role {
                    report.repeat_day.push(RepeatDay {
                        date,
                        weekday: weekday.to_string(),
                        role,
                        doctor: doctor.to_string(),
                        previous_role,
                    });
                }
            }
        }

        previous = Some((date, entry));
    }

    for (doctor, count) in general_counts {
        let overlap = staff.id_of(doctor).is_some_and(|id| staff.is_overlap(id));
        if overlap && count > config.overlap_general_cap {
            report.overlap_cap.push(LimitExceeded {
                doctor: doctor.to_string(),
                count,
                limit: config.overlap_general_cap,
            });
        }
    }

    let prev_month = problem.prev_month_cardio_name();
    let mut weeks_per_doctor: BTreeMap<&str, u32> = BTreeMap::new();
    for (week, doctor) in cardio_weeks.iter() {
        *weeks_per_doctor.entry(doctor).or_default() += 1;
        let before = if week <= 1 {
            prev_month
        } else {
            cardio_weeks.get(week - 1)
        };
        if before == Some(doctor) {
            report.cardio_consecutive.push(CardioConsecutive {
                week,
                doctor: doctor.to_string(),
                cross_month: week <= 1,
            });
        }
    }
    for (doctor, count) in weeks_per_doctor {
        if count > config.max_cardio_weeks {
            report.cardio_max.push(LimitExceeded {
                doctor: doctor.to_string(),
                count,
                limit: config.max_cardio_weeks,
            });
        }
    }

    report
}

/// The next calendar day is a fixed day off or an explicit non-work date.
fn blocks_following_day(rules: &DoctorRules, date: NaiveDate) -> bool {
    date.succ_opt().is_some_and(|next| {
        rules.restriction.blocks_weekday(next.weekday()) || rules.is_non_work(next)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Restriction, Staff};
    use chrono::Weekday;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn problem() -> PlanningProblem {
        let staff = Staff::from_pools(&["a", "b", "o"], &["o", "c"]);
        PlanningProblem::new(2025, 3, staff).unwrap()
    }

    fn entry(date: NaiveDate, i: Option<&str>, l: Option<&str>, c: Option<&str>) -> RosterEntry {
        let mut e = RosterEntry::new(weekday_name(date.weekday()));
        e.sleep_in = i.map(String::from);
        e.late = l.map(String::from);
        e.cardio = c.map(String::from);
        e
    }

    fn roster(entries: &[(u32, Option<&str>, Option<&str>, Option<&str>)]) -> MonthRoster {
        let mut r = MonthRoster::new();
        for &(d, i, l, c) in entries {
            r.insert(date(d), entry(date(d), i, l, c));
        }
        r
    }

    #[test]
    fn test_clean_roster() {
        let r = roster(&[
            (3, Some("a"), Some("b"), Some("c")),
            (5, Some("b"), Some("a"), Some("c")),
        ]);
        let mut weeks = CardioWeeks::new();
        weeks.assign(1, "c");
        let report = validate_roster(&r, &problem(), &weeks, &EngineConfig::default());
        assert!(report.is_clean(), "{:?}", report.messages());
    }

    #[test]
    fn test_unassigned_slots() {
        let r = roster(&[(3, Some("a"), None, None)]);
        let report = validate_roster(&r, &problem(), &CardioWeeks::new(), &EngineConfig::default());
        let roles: Vec<DutyRole> = report.unassigned.iter().map(|u| u.role).collect();
        assert_eq!(roles, vec![DutyRole::Late, DutyRole::Cardio]);
        assert_eq!(report.unassigned[0].weekday, "maandag");
    }

    #[test]
    fn test_day_rules() {
        let mut p = problem();
        let a = p.staff.id_of("a").unwrap();
        p.rules_for_mut(a).restriction = Restriction::new().with_day_off(Weekday::Wed);
        let b = p.staff.id_of("b").unwrap();
        p.rules_for_mut(b).toggle_non_work(date(7));

        // Tue 4: a the day before Wednesday. Wed 5: a on Wednesday.
        // Thu 6: b the day before a non-work date. Fri 7: b on it.
        let r = roster(&[
            (4, Some("a"), None, Some("c")),
            (5, None, Some("a"), Some("c")),
            (6, Some("b"), None, Some("c")),
            (7, None, Some("b"), Some("c")),
        ]);
        let report = validate_roster(&r, &p, &CardioWeeks::new(), &EngineConfig::default());
        assert_eq!(report.dnw.len(), 1);
        assert_eq!(report.dnw[0].date, date(5));
        assert_eq!(report.day_before.len(), 2);
        assert_eq!(report.day_before[0].date, date(4));
        assert_eq!(report.day_before[1].date, date(6));
        assert_eq!(report.non_work_date.len(), 1);
        assert_eq!(report.non_work_date[0].doctor, "b");
        assert_eq!(report.repeat_day.len(), 2);
    }

    #[test]
    fn test_late_overlap_and_cap() {
        let r = roster(&[
            (3, Some("o"), Some("a"), Some("c")),
            (10, Some("a"), Some("o"), Some("c")),
        ]);
        let report = validate_roster(&r, &problem(), &CardioWeeks::new(), &EngineConfig::default());
        assert_eq!(report.late_overlap.len(), 1);
        assert_eq!(report.late_overlap[0].doctor, "o");
        assert_eq!(
            report.overlap_cap,
            vec![LimitExceeded {
                doctor: "o".into(),
                count: 2,
                limit: 1
            }]
        );
    }

    #[test]
    fn test_repeat_day_ignores_cardio_continuity() {
        let r = roster(&[
            (3, Some("a"), Some("b"), Some("c")),
            (4, Some("b"), None, Some("c")),
            (5, None, None, Some("b")),
        ]);
        let report = validate_roster(&r, &problem(), &CardioWeeks::new(), &EngineConfig::default());
        // b: late on 3 then sleep-in on 4; sleep-in on 4 then cardio on 5.
        let repeats: Vec<(NaiveDate, DutyRole, DutyRole)> = report
            .repeat_day
            .iter()
            .map(|r| (r.date, r.role, r.previous_role))
            .collect();
        assert_eq!(
            repeats,
            vec![
                (date(4), DutyRole::SleepIn, DutyRole::Late),
                (date(5), DutyRole::Cardio, DutyRole::SleepIn),
            ]
        );
    }

    #[test]
    fn test_cardio_week_rules() {
        let p = problem();
        let o = p.staff.id_of("o");
        let p = p.with_prev_month_cardio(o);
        let mut weeks = CardioWeeks::new();
        weeks.assign(1, "o");
        weeks.assign(2, "c");
        weeks.assign(3, "c");
        weeks.assign(4, "c");
        let report = validate_roster(&MonthRoster::new(), &p, &weeks, &EngineConfig::default());
        let consecutive: Vec<(u32, bool)> = report
            .cardio_consecutive
            .iter()
            .map(|v| (v.week, v.cross_month))
            .collect();
        assert_eq!(consecutive, vec![(1, true), (3, false), (4, false)]);
        assert_eq!(report.cardio_max.len(), 1);
        assert_eq!(report.cardio_max[0].count, 3);
    }

    #[test]
    fn test_idempotent() {
        let r = roster(&[
            (3, Some("o"), Some("o"), None),
            (4, Some("o"), Some("a"), Some("c")),
        ]);
        let p = problem();
        let weeks = CardioWeeks::new();
        let config = EngineConfig::default();
        let first = validate_roster(&r, &p, &weeks, &config);
        let second = validate_roster(&r, &p, &weeks, &config);
        assert_eq!(first, second);
        assert!(!first.is_clean());
    }
}
