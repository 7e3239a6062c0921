//! Persisted year counters and finalized months.
//!
//! Finalizing a month adds its summary to the year counters and keeps the
//! exact snapshot that was added, so the month can later be replaced or
//! reverted without drift. The ledger also remembers each month's last
//! cardiology holder as the continuity input for the following month.
//!
//! # Layout
//!
//! ```text
//! counters:    year -> doctor -> {iw, iwe, lw, lwe, cw, cwe}
//! finalized:   year -> month -> {appliedAt, rows: doctor -> counts}
//! fte:         doctor -> weight
//! last_cardio: "YYYY-MM" -> doctor
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::models::{month_key, previous_month, CardioWeeks, DutyCounts};
use crate::scheduler::{FairnessInput, RosterSummary};

/// Ledger error.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{year}-{month:02} is already finalized")]
    AlreadyFinalized { year: i32, month: u32 },

    #[error("{year}-{month:02} is not finalized")]
    NotFinalized { year: i32, month: u32 },

    #[error("counters for {doctor} in {year} would drop below zero")]
    CounterUnderflow { year: i32, doctor: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Snapshot applied when a month was finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedMonth {
    #[serde(rename = "appliedAt")]
    pub applied_at: DateTime<Utc>,
    pub rows: BTreeMap<String, DutyCounts>,
}

/// Multi-year duty bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearLedger {
    counters: BTreeMap<i32, BTreeMap<String, DutyCounts>>,
    finalized: BTreeMap<i32, BTreeMap<u32, FinalizedMonth>>,
    fte: BTreeMap<String, f64>,
    last_cardio: BTreeMap<String, String>,
}

type Counters = BTreeMap<String, DutyCounts>;

impl YearLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a month's summary to the year counters.
    pub fn finalize(
        &mut self,
        year: i32,
        month: u32,
        summary: &RosterSummary,
        at: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        if self.is_finalized(year, month) {
            return Err(LedgerError::AlreadyFinalized { year, month });
        }
        let rows = summary.counts_by_name();
        add_snapshot(self.counters.entry(year).or_default(), &rows);
        self.finalized
            .entry(year)
            .or_default()
            .insert(month, FinalizedMonth { applied_at: at, rows });
        info!(event = "month_finalized", year, month);
        Ok(())
    }

    /// Swaps a finalized month's snapshot for a new summary.
    pub fn replace_final(
        &mut self,
        year: i32,
        month: u32,
        summary: &RosterSummary,
        at: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let old = self.snapshot(year, month)?;
        let mut next = self.counters.get(&year).cloned().unwrap_or_default();
        sub_snapshot(&mut next, &old.rows, year)?;
        let rows = summary.counts_by_name();
        add_snapshot(&mut next, &rows);

        self.counters.insert(year, next);
        self.finalized
            .entry(year)
            .or_default()
            .insert(month, FinalizedMonth { applied_at: at, rows });
        info!(event = "month_refinalized", year, month);
        Ok(())
    }

    /// Reverts a finalized month exactly.
    pub fn unfinalize(&mut self, year: i32, month: u32) -> Result<(), LedgerError> {
        let old = self.snapshot(year, month)?;
        let mut next = self.counters.get(&year).cloned().unwrap_or_default();
        sub_snapshot(&mut next, &old.rows, year)?;

        self.counters.insert(year, next);
        if let Some(months) = self.finalized.get_mut(&year) {
            months.remove(&month);
        }
        info!(event = "month_unfinalized", year, month);
        Ok(())
    }

    /// Clears counters and finalized months of a year.
    pub fn reset_year(&mut self, year: i32) {
        self.counters.remove(&year);
        self.finalized.remove(&year);
        info!(event = "year_reset", year);
    }

    pub fn is_finalized(&self, year: i32, month: u32) -> bool {
        self.finalized
            .get(&year)
            .is_some_and(|months| months.contains_key(&month))
    }

    /// Finalized month numbers of a year, ascending.
    pub fn finalized_months(&self, year: i32) -> Vec<u32> {
        self.finalized
            .get(&year)
            .map(|months| months.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn finalized_month(&self, year: i32, month: u32) -> Option<&FinalizedMonth> {
        self.finalized.get(&year)?.get(&month)
    }

    /// Year counters; empty for a year without finalized months.
    pub fn counters_for(&self, year: i32) -> Counters {
        self.counters.get(&year).cloned().unwrap_or_default()
    }

    /// Fairness input built from a year's counters.
    pub fn fairness_input(&self, year: i32, strength: f64) -> FairnessInput {
        FairnessInput {
            enabled: true,
            strength,
            counters: Some(self.counters_for(year)),
        }
    }

    pub fn set_fte(&mut self, doctor: impl Into<String>, fte: f64) {
        self.fte.insert(doctor.into(), fte);
    }

    pub fn fte_map(&self) -> &BTreeMap<String, f64> {
        &self.fte
    }

    /// Stores the month's last-week cardiology holder.
    ///
    /// A month without any holder clears the stored value.
    pub fn record_cardio_weeks(&mut self, year: i32, month: u32, weeks: &CardioWeeks) {
        let key = month_key(year, month);
        match weeks.last_week_doctor() {
            Some(doctor) => {
                self.last_cardio.insert(key, doctor.to_string());
            }
            None => {
                self.last_cardio.remove(&key);
            }
        }
    }

    /// Last cardiology holder of the month before `year`/`month`.
    pub fn previous_month_cardio(&self, year: i32, month: u32) -> Option<&str> {
        let (py, pm) = previous_month(year, month);
        self.last_cardio.get(&month_key(py, pm)).map(String::as_str)
    }

    pub fn to_json(&self) -> Result<String, LedgerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, LedgerError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Reads a ledger file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Writes the ledger as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LedgerError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    fn snapshot(&self, year: i32, month: u32) -> Result<FinalizedMonth, LedgerError> {
        self.finalized_month(year, month)
            .cloned()
            .ok_or(LedgerError::NotFinalized { year, month })
    }
}

fn add_snapshot(counters: &mut Counters, rows: &Counters) {
    for (doctor, counts) in rows {
        *counters.entry(doctor.clone()).or_default() += *counts;
    }
}

fn sub_snapshot(counters: &mut Counters, rows: &Counters, year: i32) -> Result<(), LedgerError> {
    for (doctor, counts) in rows {
        let current = counters.get(doctor).copied().unwrap_or_default();
        let next = current
            .checked_sub(*counts)
            .ok_or_else(|| LedgerError::CounterUnderflow {
                year,
                doctor: doctor.clone(),
            })?;
        counters.insert(doctor.clone(), next);
    }
    Ok(())
}
