//! Monthly on-call duty rostering for a physician group.
//!
//! Assigns three duty roles per day (sleep-in, late and cardiology) under
//! hard availability rules, explicit date preferences and multi-year
//! fairness targets, then reports every rule violation in the result.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Staff`, `Doctor`, `DoctorRules`, `Day`,
//!   `MonthRoster`, `CardioWeeks`, `DutyCounts`, `ViolationReport`
//! - **`validation`**: Request checks against the doctor universe
//! - **`dispatching`**: Availability filter, scoring rules, tie-breaking
//! - **`scheduler`**: Roster generator, cardiology blocks, fairness, validator
//! - **`ledger`**: Year counters, finalized months, cardiology continuity
//! - **`config`**: TOML-loadable engine constants
//!
//! # Example
//!
//! ```
//! use duty_roster::dispatching::SeededTieBreaker;
//! use duty_roster::scheduler::{RestrictionInput, RosterGenerator, RosterRequest};
//!
//! let request = RosterRequest::new(2025, 3)
//!     .with_general_doctors(["dr. a", "dr. b", "dr. c", "dr. d"])
//!     .with_cardiology_doctors(["dr. x", "dr. y", "dr. z"])
//!     .with_restriction(
//!         "dr. a",
//!         RestrictionInput {
//!             days_not_work: vec!["woensdag".into()],
//!             ..Default::default()
//!         },
//!     );
//!
//! let outcome = RosterGenerator::default()
//!     .generate_request(&request, &mut SeededTieBreaker::new(42))
//!     .unwrap();
//! assert!(outcome.violations.dnw.is_empty());
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"

pub mod config;
pub mod dispatching;
pub mod error;
pub mod ledger;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::RosterError;
