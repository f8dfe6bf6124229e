//! Student model.
//!
//! A student asks for lessons in one or more subjects and is available in
//! a set of slots. Each run assigns a student at most one lesson.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{normalize_slots, normalize_subjects, Slot};

/// A student looking for a lesson.
///
/// Subjects are stored trimmed and lowercased; slots trimmed. Both sets are
/// ordered so iteration is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    pub id: String,
    /// Requested subjects (normalized).
    pub subjects: BTreeSet<String>,
    /// Slots the student can attend.
    pub available_slots: BTreeSet<Slot>,
    /// Teacher the student would like, used only as a ranking hint.
    pub preferred_teacher: Option<String>,
}

impl Student {
    /// Creates a student with no subjects or slots.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subjects: BTreeSet::new(),
            available_slots: BTreeSet::new(),
            preferred_teacher: None,
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

    /// Sets the preferred-teacher hint.
    pub fn with_preferred_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        let teacher_id = teacher_id.into().trim().to_string();
        self.preferred_teacher = (!teacher_id.is_empty()).then_some(teacher_id);
        self
    }

    /// Whether the student can take part in matching at all.
    pub fn is_schedulable(&self) -> bool {
        !self.subjects.is_empty() && !self.available_slots.is_empty()
    }

    /// Whether `teacher_id` is this student's preferred teacher.
    pub fn prefers(&self, teacher_id: &str) -> bool {
        self.preferred_teacher.as_deref() == Some(teacher_id)
    }

    /// Re-applies normalization to fields that may have been set directly.
    pub(crate) fn normalized(mut self) -> Self {
        self.id = self.id.trim().to_string();
        self.subjects = normalize_subjects(&self.subjects);
        self.available_slots = normalize_slots(self.available_slots.iter().map(Slot::as_str));
        self.preferred_teacher = self
            .preferred_teacher
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }
}
