//! Lesson matching domain models.
//!
//! Provides the core data types for representing matching problems and
//! their solutions: who wants lessons, who gives them, when, and how the
//! resulting lessons were received.
//!
//! | Type | Meaning |
//! |------|---------|
//! | Student | Lesson seeker with subjects and free slots |
//! | Teacher | Lesson giver with subjects, slots and per-slot capacity |
//! | Slot | Opaque time unit shared by both sides |
//! | Schedule | Assignments plus unmatched students |
//! | FeedbackRecord | Satisfaction for one lesson |

mod feedback;
mod schedule;
mod slot;
mod student;
mod teacher;

pub use feedback::{
    mean_satisfaction, pair_means, teacher_means, FeedbackRecord, MAX_RATING, MIN_RATING,
};
pub use schedule::{Assignment, LessonKind, Schedule, Violation, ViolationType};
pub use slot::Slot;
pub use student::Student;
pub use teacher::{Teacher, DEFAULT_MAX_STUDENTS_PER_SLOT};

use std::collections::BTreeSet;

/// Trims and lowercases subjects, dropping blanks.
pub(crate) fn normalize_subjects<I, S>(subjects: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    subjects
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Trims slots, dropping blanks.
pub(crate) fn normalize_slots<I, S>(slots: I) -> BTreeSet<Slot>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    slots
        .into_iter()
        .map(Slot::new)
        .filter(|s| !s.is_blank())
        .collect()
}
