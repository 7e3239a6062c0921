//! Cardiology weekly-block assignment.
//!
//! One doctor holds cardiology for a whole week. The first day of a week
//! that finds an eligible candidate fixes the holder; the remaining days of
//! that week reuse them without re-selection. A day on which the holder is
//! blocked stays unfilled.
//!
//! A new holder must differ from the previous week's holder (the previous
//! month's last holder for week 1) and stay under the monthly week cap.

use tracing::{debug, warn};

use crate::dispatching::{is_available, CandidateSelector, GenerationContext, Slot, TieBreaker};
use crate::models::{Day, DoctorId, DutyRole};

/// Resolves the cardiology assignee for one day.
///
/// `today` holds the day's sleep-in and late assignees. The week holder
/// is recorded in `ctx`; the day's load is left to the caller.
pub fn resolve_cardio_day(
    ctx: &mut GenerationContext<'_>,
    day: &Day,
    today: &[DoctorId],
    selector: &CandidateSelector,
    tie_breaker: &mut dyn TieBreaker,
) -> Option<DoctorId> {
    let eligible: Vec<DoctorId> = {
        let view: &GenerationContext<'_> = ctx;
        view.staff()
            .cardiology_pool()
            .iter()
            .copied()
            .filter(|&d| {
                is_available(view, d, day, DutyRole::Cardio)
                    && !view.worked_previous_general(d)
                    && !today.contains(&d)
            })
            .collect()
    };

    if let Some(holder) = ctx.week_holder(day.week) {
        if eligible.contains(&holder) {
            return Some(holder);
        }
        warn!(
            event = "cardio_holder_blocked",
            date = %day.date,
            week = day.week,
            doctor = ctx.staff().name(holder),
        );
        return None;
    }

    let previous = ctx.previous_week_holder(day.week);
    let max_weeks = ctx.config().max_cardio_weeks;
    let candidates: Vec<DoctorId> = eligible
        .into_iter()
        .filter(|&d| Some(d) != previous && ctx.weeks_held(d) < max_weeks)
        .collect();

    let slot = Slot::new(day, DutyRole::Cardio);
    let Some(holder) = selector.select(&candidates, &slot, ctx, tie_breaker) else {
        warn!(
            event = "cardio_week_unfilled",
            date = %day.date,
            week = day.week,
        );
        return None;
    };

    ctx.assign_week(day.week, holder);
    debug!(
        event = "cardio_week_assigned",
        week = day.week,
        from = %day.date,
        doctor = ctx.staff().name(holder),
        weeks_held = ctx.weeks_held(holder),
    );
    Some(holder)
}
