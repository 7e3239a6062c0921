//! Doctor universe.
//!
//! Doctors are identified by name. Each belongs to the general pool, the
//! cardiology pool, or both ("overlap" doctors). Internally they are
//! addressed by a dense [`DoctorId`] so run state can live in plain vectors.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a doctor within a [`Staff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DoctorId(pub usize);

impl DoctorId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A physician on the duty roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    /// Display name; the stable identifier across months.
    pub name: String,
    /// Member of the general (sleep-in / late) pool.
    pub general: bool,
    /// Member of the cardiology pool.
    pub cardiology: bool,
    /// Fractional availability scaling fairness expectations.
    pub fte: f64,
}

impl Doctor {
    /// Creates a doctor in no pool with FTE 1.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            general: false,
            cardiology: false,
            fte: 1.0,
        }
    }

    /// In both pools.
    #[inline]
    pub fn is_overlap(&self) -> bool {
        self.general && self.cardiology
    }
}

/// The ordered doctor universe for one planning run.
///
/// Iteration order is the general list followed by cardiology-only names,
/// which keeps candidate ordering (and therefore seeded runs) stable.
#[derive(Debug, Clone, Default)]
pub struct Staff {
    doctors: Vec<Doctor>,
    general: Vec<DoctorId>,
    cardiology: Vec<DoctorId>,
    by_name: HashMap<String, DoctorId>,
}

impl Staff {
    /// Builds the universe from the two ordered pool lists.
    ///
    /// Duplicate names within one list are collapsed; callers wanting to
    /// reject them run [`crate::validation::validate_request`] first.
    pub fn from_pools<S: AsRef<str>>(general: &[S], cardiology: &[S]) -> Self {
        let mut staff = Staff::default();
        for name in general {
            let id = staff.intern(name.as_ref());
            if !staff.doctors[id.0].general {
                staff.doctors[id.0].general = true;
                staff.general.push(id);
            }
        }
        for name in cardiology {
            let id = staff.intern(name.as_ref());
            if !staff.doctors[id.0].cardiology {
                staff.doctors[id.0].cardiology = true;
                staff.cardiology.push(id);
            }
        }
        staff
    }

    fn intern(&mut self, name: &str) -> DoctorId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = DoctorId(self.doctors.len());
        self.doctors.push(Doctor::new(name));
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Sets a doctor's FTE weight.
    pub fn set_fte(&mut self, id: DoctorId, fte: f64) {
        if let Some(d) = self.doctors.get_mut(id.0) {
            d.fte = fte;
        }
    }

    /// Number of distinct doctors across both pools.
    pub fn len(&self) -> usize {
        self.doctors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty()
    }

    /// Doctor by id. Ids come from this `Staff`; others panic.
    pub fn get(&self, id: DoctorId) -> &Doctor {
        &self.doctors[id.0]
    }

    /// Name of a doctor by id.
    pub fn name(&self, id: DoctorId) -> &str {
        &self.doctors[id.0].name
    }

    /// Looks up a doctor by name.
    pub fn id_of(&self, name: &str) -> Option<DoctorId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All doctors in universe order.
    pub fn ids(&self) -> impl Iterator<Item = DoctorId> + '_ {
        (0..self.doctors.len()).map(DoctorId)
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    /// General pool in input order.
    pub fn general_pool(&self) -> &[DoctorId] {
        &self.general
    }

    /// Cardiology pool in input order.
    pub fn cardiology_pool(&self) -> &[DoctorId] {
        &self.cardiology
    }

    pub fn is_overlap(&self, id: DoctorId) -> bool {
        self.doctors[id.0].is_overlap()
    }

    /// Overlap doctors in universe order.
    pub fn overlap_doctors(&self) -> impl Iterator<Item = DoctorId> + '_ {
        self.ids().filter(|&id| self.is_overlap(id))
    }

    pub fn fte(&self, id: DoctorId) -> f64 {
        self.doctors[id.0].fte
    }
}
