//! Generation inputs.
//!
//! [`RosterRequest`] is the wire form: names, ISO date strings and weekday
//! names exactly as a front-end or persisted document supplies them.
//! [`PlanningProblem`] is the validated, index-based form the engine runs
//! on; it is produced by [`crate::validation::validate_request`] or built
//! directly from a [`Staff`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::FairnessStrength;
use crate::error::RosterError;
use crate::models::{DoctorId, DoctorRules, DutyCounts, Staff};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Fixed restrictions for one doctor, wire form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestrictionInput {
    /// Weekday names (`maandag` ... `zondag`, or English).
    pub days_not_work: Vec<String>,
    pub no_late: bool,
    pub first_two_weeks_unavailable: bool,
}

/// The four desiderata maps, doctor → ISO dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesiderataInput {
    pub positive_general: BTreeMap<String, Vec<String>>,
    pub negative_general: BTreeMap<String, Vec<String>>,
    pub positive_cardiology: BTreeMap<String, Vec<String>>,
    pub negative_cardiology: BTreeMap<String, Vec<String>>,
}

/// Fairness configuration, wire form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FairnessInput {
    pub enabled: bool,
    /// Weight of the historical deficit (≥ 0).
    pub strength: f64,
    /// Historical year counters per doctor.
    #[serde(default)]
    pub counters: Option<BTreeMap<String, DutyCounts>>,
}

impl FairnessInput {
    /// Enabled fairness over `counters` at a named strength.
    pub fn new(counters: BTreeMap<String, DutyCounts>, strength: FairnessStrength) -> Self {
        Self {
            enabled: true,
            strength: strength.alpha(),
            counters: Some(counters),
        }
    }

    /// Replaces the deficit weight with a preset.
    pub fn with_strength(mut self, strength: FairnessStrength) -> Self {
        self.strength = strength.alpha();
        self
    }
}

/// A complete generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterRequest {
    /// Calendar year of the planned month.
    pub year: i32,
    /// 1-12.
    pub month: u32,
    /// General pool (sleep-in and late), in tie-break order.
    pub general_doctors: Vec<String>,
    /// Cardiology pool. Names also in the general pool are overlap doctors.
    pub cardiology_doctors: Vec<String>,
    #[serde(default)]
    pub restrictions: BTreeMap<String, RestrictionInput>,
    #[serde(default)]
    pub desiderata: DesiderataInput,
    #[serde(default)]
    pub non_work_dates: BTreeMap<String, Vec<String>>,
    /// Cardiology holder of the previous month's last week. Empty = none.
    #[serde(default)]
    pub prev_month_cardio: Option<String>,
    #[serde(default)]
    pub fairness: Option<FairnessInput>,
    /// FTE weights; doctors not listed default to 1.
    #[serde(default)]
    pub fte: BTreeMap<String, f64>,
}

impl RosterRequest {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            ..Default::default()
        }
    }

    /// Sets the general pool, in tie-break order.
    pub fn with_general_doctors<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.general_doctors = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the cardiology pool, in tie-break order.
    pub fn with_cardiology_doctors<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.cardiology_doctors = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_restriction(
        mut self,
        doctor: impl Into<String>,
        restriction: RestrictionInput,
    ) -> Self {
        self.restrictions.insert(doctor.into(), restriction);
        self
    }

    pub fn with_non_work_dates<S: Into<String>>(
        mut self,
        doctor: impl Into<String>,
        dates: impl IntoIterator<Item = S>,
    ) -> Self {
        self.non_work_dates
            .insert(doctor.into(), dates.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_prev_month_cardio(mut self, doctor: impl Into<String>) -> Self {
        self.prev_month_cardio = Some(doctor.into());
        self
    }

    pub fn with_fairness(mut self, fairness: FairnessInput) -> Self {
        self.fairness = Some(fairness);
        self
    }

    pub fn with_fte(mut self, doctor: impl Into<String>, fte: f64) -> Self {
        self.fte.insert(doctor.into(), fte);
        self
    }
}

/// Fairness inputs of a validated problem.
#[derive(Debug, Clone, PartialEq)]
pub struct FairnessSettings {
    /// Deficit weight α.
    pub strength: f64,
    /// Historical counters indexed by [`DoctorId`].
    pub counters: Vec<DutyCounts>,
}

/// A validated planning problem.
#[derive(Debug, Clone)]
pub struct PlanningProblem {
    pub year: i32,
    pub month: u32,
    pub staff: Staff,
    /// Indexed by [`DoctorId`].
    pub rules: Vec<DoctorRules>,
    pub prev_month_cardio: Option<DoctorId>,
    /// `None` when fairness is disabled or no counters were supplied.
    pub fairness: Option<FairnessSettings>,
}

impl PlanningProblem {
    /// Creates a problem with no restrictions, desiderata or fairness.
    pub fn new(year: i32, month: u32, staff: Staff) -> Result<Self, RosterError> {
        if chrono::NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(RosterError::InvalidRequest(vec![ValidationError::new(
                ValidationErrorKind::InvalidMonth,
                "month",
                format!("{year}-{month} is not a valid year/month"),
            )]));
        }
        let rules = vec![DoctorRules::default(); staff.len()];
        Ok(Self {
            year,
            month,
            staff,
            rules,
            prev_month_cardio: None,
            fairness: None,
        })
    }

    pub fn rules_for(&self, id: DoctorId) -> &DoctorRules {
        &self.rules[id.index()]
    }

    pub fn rules_for_mut(&mut self, id: DoctorId) -> &mut DoctorRules {
        &mut self.rules[id.index()]
    }

    /// Rules by doctor name; `None` for names outside the universe.
    pub fn rules_by_name(&self, name: &str) -> Option<&DoctorRules> {
        self.staff.id_of(name).map(|id| self.rules_for(id))
    }

    pub fn with_prev_month_cardio(mut self, doctor: Option<DoctorId>) -> Self {
        self.prev_month_cardio = doctor;
        self
    }

    /// Enables fairness with historical counters keyed by doctor id.
    pub fn with_fairness(mut self, strength: f64, counters: Vec<DutyCounts>) -> Self {
        let mut counters = counters;
        counters.resize(self.staff.len(), DutyCounts::default());
        self.fairness = Some(FairnessSettings { strength, counters });
        self
    }

    /// Previous month's cardiology holder, by name.
    pub fn prev_month_cardio_name(&self) -> Option<&str> {
        self.prev_month_cardio.map(|id| self.staff.name(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_rejects_bad_month() {
        let staff = Staff::from_pools(&["a"], &[] as &[&str]);
        assert!(PlanningProblem::new(2025, 13, staff.clone()).is_err());
        assert!(PlanningProblem::new(2025, 0, staff).is_err());
    }

    #[test]
    fn test_fairness_counters_padded() {
        let staff = Staff::from_pools(&["a", "b"], &["c"]);
        let problem = PlanningProblem::new(2025, 3, staff)
            .unwrap()
            .with_fairness(0.8, vec![DutyCounts::from_array([1, 0, 0, 0, 0, 0])]);
        assert_eq!(problem.fairness.unwrap().counters.len(), 3);
    }

    #[test]
    fn test_fairness_strength_presets() {
        let input = FairnessInput::new(BTreeMap::new(), FairnessStrength::Soft);
        assert!(input.enabled);
        assert!((input.strength - 0.4).abs() < 1e-12);
        let input = input.with_strength(FairnessStrength::Strong);
        assert!((input.strength - 1.2).abs() < 1e-12);
        assert_eq!(input.counters, Some(BTreeMap::new()));
    }

    #[test]
    fn test_request_json_shape() {
        let json = r#"{
            "year": 2025,
            "month": 3,
            "general_doctors": ["dr. a", "dr. b"],
            "cardiology_doctors": ["dr. c"],
            "restrictions": { "dr. a": { "days_not_work": ["woensdag"] } },
            "fairness": { "enabled": true, "strength": 0.8 }
        }"#;
        let request: RosterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.restrictions["dr. a"].days_not_work, vec!["woensdag"]);
        assert!(!request.restrictions["dr. a"].no_late);
        assert!(request.fairness.unwrap().counters.is_none());
        assert!(request.fte.is_empty());
    }
}
