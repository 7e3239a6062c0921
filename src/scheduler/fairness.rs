//! Multi-year fairness deficits.
//!
//! Converts historical duty counters and FTE weights into a per-doctor,
//! per-column deficit: the FTE-weighted expected share of the pool total
//! minus what the doctor actually did. A positive deficit means the doctor
//! is under-served and is favoured in candidate scoring.
//!
//! # Pools
//!
//! General columns (sleep-in, late) are shared over the general pool,
//! cardiology columns over the cardiology pool. Only doctors with any
//! historical activity in a pool form its *active* subset; newcomers are
//! expected to start from zero. If nobody is active, the whole pool is used.

use serde::Serialize;

use crate::models::{CounterKind, DoctorId, DutyCounts, DutyRole, Staff};

/// Deficits for one doctor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Deficit {
    /// Indexed by [`CounterKind::index`].
    pub columns: [f64; 6],
    /// Expected minus actual cardiology duties, weekday + weekend.
    pub cardio_total: f64,
}

impl Deficit {
    pub fn get(&self, kind: CounterKind) -> f64 {
        self.columns[kind.index()]
    }
}

/// Deficits for every doctor of a staff.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FairnessTable {
    deficits: Vec<Deficit>,
    general_active: Vec<DoctorId>,
    cardio_active: Vec<DoctorId>,
}

impl FairnessTable {
    /// Builds the table from counters indexed by [`DoctorId`].
    ///
    /// Missing counters count as zero.
    pub fn build(staff: &Staff, counters: &[DutyCounts]) -> Self {
        let get = |id: DoctorId| counters.get(id.index()).copied().unwrap_or_default();

        let general_active = active_pool(staff.general_pool(), |id| get(id).general_total() > 0);
        let cardio_active = active_pool(staff.cardiology_pool(), |id| get(id).cardio_total() > 0);

        let fte_sum = |pool: &[DoctorId]| {
            let sum: f64 = pool.iter().map(|&id| staff.fte(id)).sum();
            if sum > 0.0 {
                sum
            } else {
                1.0
            }
        };
        let general_fte = fte_sum(&general_active);
        let cardio_fte = fte_sum(&cardio_active);

        let mut totals = [0u32; 6];
        for &id in &general_active {
            let c = get(id).to_array();
            for kind in GENERAL_COLUMNS {
                totals[kind.index()] += c[kind.index()];
            }
        }
        for &id in &cardio_active {
            let c = get(id).to_array();
            for kind in CARDIO_COLUMNS {
                totals[kind.index()] += c[kind.index()];
            }
        }

        let deficits = staff
            .ids()
            .map(|id| {
                let actual = get(id).to_array();
                let fte = staff.fte(id);
                let in_general = general_active.contains(&id);
                let in_cardio = cardio_active.contains(&id);

                let mut expected = [0.0f64; 6];
                for kind in GENERAL_COLUMNS {
                    if in_general {
                        expected[kind.index()] = totals[kind.index()] as f64 * (fte / general_fte);
                    }
                }
                for kind in CARDIO_COLUMNS {
                    if in_cardio {
                        expected[kind.index()] = totals[kind.index()] as f64 * (fte / cardio_fte);
                    }
                }

                let columns: [f64; 6] = std::array::from_fn(|i| expected[i] - actual[i] as f64);
                let cardio_expected = expected[CounterKind::CardioWeekday.index()]
                    + expected[CounterKind::CardioWeekend.index()];
                let cardio_actual = (actual[CounterKind::CardioWeekday.index()]
                    + actual[CounterKind::CardioWeekend.index()]) as f64;

                Deficit {
                    columns,
                    cardio_total: cardio_expected - cardio_actual,
                }
            })
            .collect();

        Self {
            deficits,
            general_active,
            cardio_active,
        }
    }

    pub fn deficit(&self, id: DoctorId) -> Deficit {
        self.deficits.get(id.index()).copied().unwrap_or_default()
    }

    /// Deficit relevant to a role: the matching column for general roles,
    /// the combined cardiology total for cardiology.
    pub fn for_role(&self, id: DoctorId, role: DutyRole, is_weekend: bool) -> f64 {
        let d = self.deficit(id);
        match role {
            DutyRole::Cardio => d.cardio_total,
            _ => d.get(CounterKind::for_role(role, is_weekend)),
        }
    }

    /// General pool members considered active.
    pub fn general_active(&self) -> &[DoctorId] {
        &self.general_active
    }

    /// Cardiology pool members considered active.
    pub fn cardio_active(&self) -> &[DoctorId] {
        &self.cardio_active
    }
}

const GENERAL_COLUMNS: [CounterKind; 4] = [
    CounterKind::SleepInWeekday,
    CounterKind::SleepInWeekend,
    CounterKind::LateWeekday,
    CounterKind::LateWeekend,
];

const CARDIO_COLUMNS: [CounterKind; 2] = [CounterKind::CardioWeekday, CounterKind::CardioWeekend];

fn active_pool(pool: &[DoctorId], is_active: impl Fn(DoctorId) -> bool) -> Vec<DoctorId> {
    let active: Vec<DoctorId> = pool.iter().copied().filter(|&id| is_active(id)).collect();
    if active.is_empty() {
        pool.to_vec()
    } else {
        active
    }
}
