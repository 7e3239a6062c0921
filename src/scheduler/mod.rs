//! Month roster generation, validation and summaries.
//!
//! # Algorithm
//!
//! `RosterGenerator` uses a greedy, day-by-day assignment with a weekly
//! block for cardiology. It does not backtrack: slots without an eligible
//! candidate stay empty and are reported by the validator.
//!
//! # Fairness
//!
//! `FairnessTable` turns historical year counters and FTE weights into
//! deficits that bias candidate scoring towards under-served doctors.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"

mod cardio;
mod fairness;
mod generator;
mod request;
mod summary;
mod validator;

pub use cardio::resolve_cardio_day;
pub use fairness::{Deficit, FairnessTable};
pub use generator::{RosterGenerator, RosterOutcome};
pub use request::{
    DesiderataInput, FairnessInput, FairnessSettings, PlanningProblem, RestrictionInput,
    RosterRequest,
};
pub use summary::{DoctorSummary, RosterSummary, SummaryTotals};
pub use validator::validate_roster;
