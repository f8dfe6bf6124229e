//! Teacher model.
//!
//! A teacher offers subjects in a set of slots. Each (teacher, slot) pair is
//! an independent capacity bucket holding up to `max_students_per_slot`
//! students: 1 means 1:1 lessons, more means group lessons.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{normalize_slots, normalize_subjects, Slot};

/// Capacity used when a record carries none or an invalid one.
pub const DEFAULT_MAX_STUDENTS_PER_SLOT: u32 = 1;

/// A teacher offering lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Subjects the teacher can teach (normalized).
    pub subjects: BTreeSet<String>,
    /// Slots the teacher is available in.
    pub available_slots: BTreeSet<Slot>,
    /// Students per slot. Zero is invalid and replaced when the roster is
    /// prepared.
    pub max_students_per_slot: u32,
}

impl Teacher {
    /// Creates a teacher with 1:1 capacity and no subjects or slots.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subjects: BTreeSet::new(),
            available_slots: BTreeSet::new(),
            max_students_per_slot: DEFAULT_MAX_STUDENTS_PER_SLOT,
        }
    }

    /// Adds subjects (normalized; blanks dropped).
    pub fn with_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.subjects.extend(normalize_subjects(subjects));
        self
    }

    /// Adds available slots (trimmed; blanks dropped).
    pub fn with_slots<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.available_slots.extend(normalize_slots(slots));
        self
    }

    /// Sets the per-slot capacity.
    pub fn with_capacity(mut self, max_students_per_slot: u32) -> Self {
        self.max_students_per_slot = max_students_per_slot;
        self
    }

    /// Whether the teacher can be matched with anyone.
    pub fn is_schedulable(&self) -> bool {
        !self.subjects.is_empty() && !self.available_slots.is_empty()
    }

    /// Whether the teacher runs group lessons.
    pub fn offers_groups(&self) -> bool {
        self.max_students_per_slot > 1
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.id = self.id.trim().to_string();
        self.subjects = normalize_subjects(&self.subjects);
        self.available_slots = normalize_slots(self.available_slots.iter().map(Slot::as_str));
        self
    }
}
