//! Compatibility index.
//!
//! A (student, teacher) pair is feasible when they share at least one
//! subject and at least one slot. The overlap sets are kept so callers can
//! rank candidates and walk shared slots in a fixed order.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::{Slot, Student, Teacher};

/// Overlap between a student and a teacher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compatibility {
    /// Subjects both sides have.
    pub shared_subjects: BTreeSet<String>,
    /// Slots both sides are available in, in lexicographic order.
    pub shared_slots: BTreeSet<Slot>,
}

impl Compatibility {
    /// Whether the pair can be matched.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        !self.shared_subjects.is_empty() && !self.shared_slots.is_empty()
    }
}

/// A feasible teacher for a given student.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    /// The teacher.
    pub teacher: &'a Teacher,
    /// Overlap with the student.
    pub compatibility: Compatibility,
    /// Whether the student named this teacher as preferred.
    pub preferred: bool,
}

/// Computes the overlap between a student and a teacher.
///
/// Pure and deterministic. Empty subject or slot sets on either side yield
/// an infeasible result.
pub fn compatible(student: &Student, teacher: &Teacher) -> Compatibility {
    Compatibility {
        shared_subjects: student
            .subjects
            .intersection(&teacher.subjects)
            .cloned()
            .collect(),
        shared_slots: student
            .available_slots
            .intersection(&teacher.available_slots)
            .cloned()
            .collect(),
    }
}

/// Returns feasible teachers for a student, best first.
///
/// # Ranking
/// 1. Preferred teacher first
/// 2. More shared subjects first
/// 3. Teacher id ascending (stable tie-break)
pub fn rank_candidates<'a>(student: &Student, teachers: &'a [Teacher]) -> Vec<Candidate<'a>> {
    let mut candidates: Vec<Candidate<'a>> = teachers
        .iter()
        .filter_map(|teacher| {
            let compatibility = compatible(student, teacher);
            compatibility.is_feasible().then(|| Candidate {
                teacher,
                preferred: student.prefers(&teacher.id),
                compatibility,
            })
        })
        .collect();
    candidates.sort_by(compatibility_order);
    candidates
}

/// Ordering used by [`rank_candidates`].
pub(crate) fn compatibility_order(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    b.preferred
        .cmp(&a.preferred)
        .then_with(|| {
            b.compatibility
                .shared_subjects
                .len()
                .cmp(&a.compatibility.shared_subjects.len())
        })
        .then_with(|| a.teacher.id.cmp(&b.teacher.id))
}
