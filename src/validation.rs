//! Input validation for roster requests.
//!
//! Checks the request against the doctor universe before generation and
//! converts it to a [`PlanningProblem`]. Detects:
//! - Invalid year/month
//! - Empty or duplicated doctor lists
//! - References to doctors outside the universe
//! - Malformed ISO dates and weekday names
//! - A date listed as both positive and negative for one category
//! - Non-positive FTE weights and negative fairness strength
//!
//! Every breach is collected so the caller sees all of them at once.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::models::{
    parse_weekday, DateSets, DoctorId, DoctorRules, DutyCategory, DutyCounts, Restriction, Staff,
};
use crate::scheduler::{FairnessSettings, PlanningProblem, RosterRequest};

/// Validation result.
pub type ValidationResult<T> = Result<T, Vec<ValidationError>>;

type DateMap = BTreeMap<String, Vec<String>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Path of the offending request field.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Month outside 1..=12 or year not representable.
    InvalidMonth,
    /// No doctors at all.
    EmptyUniverse,
    /// A name listed twice in the same pool, or an empty name.
    DuplicateDoctor,
    /// A field references a doctor not in the universe.
    UnknownDoctor,
    /// The previous-month cardiology doctor is not in the cardiology pool.
    NotCardiologyDoctor,
    /// An FTE weight that is not a finite value > 0.
    InvalidFte,
    /// A date string that is not `YYYY-MM-DD`.
    InvalidDate,
    /// An unrecognised weekday name.
    InvalidWeekday,
    /// A date marked both positive and negative for the same category.
    ConflictingDesiderata,
    /// A fairness strength that is negative or not finite.
    InvalidStrength,
}

impl ValidationError {
    pub fn new(
        kind: ValidationErrorKind,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates a request and builds the planning problem.
///
/// Checks:
/// 1. Year/month form a real calendar month
/// 2. The universe is non-empty, with no duplicate or blank names per pool
/// 3. Every doctor named in restrictions, desiderata, non-work dates,
///    counters and FTE weights is in the universe
/// 4. Dates and weekday names parse
/// 5. No date is both positive and negative for one doctor and category
/// 6. FTE weights are > 0, fairness strength is ≥ 0
/// 7. The previous-month cardiology doctor is a cardiology-pool member
///
/// # Returns
/// The validated problem, or every detected issue.
pub fn validate_request(request: &RosterRequest) -> ValidationResult<PlanningProblem> {
    let mut errors = Vec::new();

    if NaiveDate::from_ymd_opt(request.year, request.month, 1).is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidMonth,
            "month",
            format!(
                "{}-{} is not a valid year/month (month must be 1..=12)",
                request.year, request.month
            ),
        ));
    }

    check_pool(&request.general_doctors, "general_doctors", &mut errors);
    check_pool(&request.cardiology_doctors, "cardiology_doctors", &mut errors);
    if request.general_doctors.is_empty() && request.cardiology_doctors.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyUniverse,
            "general_doctors",
            "at least one doctor is required",
        ));
    }

    let mut staff = Staff::from_pools(
        request.general_doctors.as_slice(),
        request.cardiology_doctors.as_slice(),
    );
    let mut rules = vec![DoctorRules::default(); staff.len()];

    // Restrictions
    for (name, input) in &request.restrictions {
        let field = format!("restrictions[{name:?}]");
        let Some(id) = known(&staff, name, &field, &mut errors) else {
            continue;
        };
        let mut restriction = Restriction::new();
        restriction.no_late = input.no_late;
        restriction.first_two_weeks_unavailable = input.first_two_weeks_unavailable;
        for (i, day) in input.days_not_work.iter().enumerate() {
            match parse_weekday(day) {
                Some(wd) => {
                    restriction.days_not_work.insert(wd);
                }
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidWeekday,
                    format!("{field}.days_not_work[{i}]"),
                    format!("unknown weekday name {day:?}"),
                )),
            }
        }
        rules[id.index()].restriction = restriction;
    }

    // Desiderata
    let desiderata = &request.desiderata;
    let categories: [(&str, &DateMap, &DateMap, DutyCategory); 2] = [
        (
            "general",
            &desiderata.positive_general,
            &desiderata.negative_general,
            DutyCategory::General,
        ),
        (
            "cardiology",
            &desiderata.positive_cardiology,
            &desiderata.negative_cardiology,
            DutyCategory::Cardiology,
        ),
    ];
    for (label, positive, negative, category) in categories {
        let mut parsed: BTreeMap<usize, (Vec<NaiveDate>, Vec<NaiveDate>)> = BTreeMap::new();
        let sides = [("positive", positive, true), ("negative", negative, false)];
        for (side, map, is_positive) in sides {
            for (name, dates) in map {
                let field = format!("desiderata.{side}_{label}[{name:?}]");
                let Some(id) = known(&staff, name, &field, &mut errors) else {
                    continue;
                };
                let dates = parse_dates(dates, &field, &mut errors);
                let entry = parsed.entry(id.index()).or_default();
                if is_positive {
                    entry.0.extend(dates);
                } else {
                    entry.1.extend(dates);
                }
            }
        }
        for (idx, (pos, neg)) in parsed {
            let neg_set: HashSet<NaiveDate> = neg.iter().copied().collect();
            let mut sets = DateSets::new();
            for date in &neg {
                sets.mark_negative(*date);
            }
            for date in pos {
                if neg_set.contains(&date) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::ConflictingDesiderata,
                        format!("desiderata.positive_{label}[{:?}]", staff.name(DoctorId(idx))),
                        format!("{date} is listed as both positive and negative"),
                    ));
                    continue;
                }
                sets.mark_positive(date);
            }
            *rules[idx].desiderata.category_mut(category) = sets;
        }
    }

    // Non-work dates
    for (name, dates) in &request.non_work_dates {
        let field = format!("non_work_dates[{name:?}]");
        let Some(id) = known(&staff, name, &field, &mut errors) else {
            continue;
        };
        rules[id.index()]
            .non_work
            .extend(parse_dates(dates, &field, &mut errors));
    }

    // Previous month cardiology
    let prev_month_cardio = match request.prev_month_cardio.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(name) => match staff.id_of(name) {
            Some(id) if staff.get(id).cardiology => Some(id),
            Some(_) => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NotCardiologyDoctor,
                    "prev_month_cardio",
                    format!("{name:?} is not in the cardiology pool"),
                ));
                None
            }
            None => {
                errors.push(unknown_doctor("prev_month_cardio", name));
                None
            }
        },
    };

    // FTE
    for (name, &fte) in &request.fte {
        let field = format!("fte[{name:?}]");
        let Some(id) = known(&staff, name, &field, &mut errors) else {
            continue;
        };
        if !fte.is_finite() || fte <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidFte,
                field,
                format!("FTE must be a finite value > 0, got {fte}"),
            ));
            continue;
        }
        staff.set_fte(id, fte);
    }

    // Fairness
    let mut fairness = None;
    if let Some(input) = &request.fairness {
        if !input.strength.is_finite() || input.strength < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidStrength,
                "fairness.strength",
                format!("strength must be a finite value >= 0, got {}", input.strength),
            ));
        }
        if let Some(counters) = &input.counters {
            let mut by_id = vec![DutyCounts::default(); staff.len()];
            for (name, counts) in counters {
                let field = format!("fairness.counters[{name:?}]");
                if let Some(id) = known(&staff, name, &field, &mut errors) {
                    by_id[id.index()] = *counts;
                }
            }
            if input.enabled {
                fairness = Some(FairnessSettings {
                    strength: input.strength,
                    counters: by_id,
                });
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(PlanningProblem {
        year: request.year,
        month: request.month,
        staff,
        rules,
        prev_month_cardio,
        fairness,
    })
}

fn check_pool(names: &[String], field: &str, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for (i, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateDoctor,
                format!("{field}[{i}]"),
                "doctor name is empty",
            ));
        } else if !seen.insert(name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateDoctor,
                format!("{field}[{i}]"),
                format!("{name:?} is listed more than once"),
            ));
        }
    }
}

fn known(
    staff: &Staff,
    name: &str,
    field: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<DoctorId> {
    let id = staff.id_of(name);
    if id.is_none() {
        errors.push(unknown_doctor(field, name));
    }
    id
}

fn unknown_doctor(field: &str, name: &str) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::UnknownDoctor,
        field,
        format!("{name:?} is not in the doctor universe"),
    )
}

fn parse_dates(dates: &[String], field: &str, errors: &mut Vec<ValidationError>) -> Vec<NaiveDate> {
    dates
        .iter()
        .enumerate()
        .filter_map(|(i, s)| match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDate,
                    format!("{field}[{i}]"),
                    format!("{s:?} is not an ISO date (YYYY-MM-DD)"),
                ));
                None
            }
        })
        .collect()
}
