//! Greedy baseline matching.
//!
//! # Algorithm
//!
//! 1. Visit students in input order (earlier students win scarce capacity).
//! 2. Rank the student's feasible teachers (preferred, shared subjects, id).
//! 3. For each candidate, walk shared slots lexicographically.
//! 4. Take the first (teacher, slot) bucket below the teacher's capacity.
//! 5. If none has room, the student is unmatched.
//!
//! # Complexity
//! O(S * T) set intersections for S students and T teachers.

use tracing::{debug, info};

use super::compatibility::{rank_candidates, Candidate};
use super::occupancy::Occupancy;
use crate::models::{Assignment, Schedule, Slot, Student, Teacher};
use crate::validation::Roster;

/// Deterministic greedy matching engine.
///
/// # Example
///
/// ```
/// use u_match::matching::MatchingEngine;
/// use u_match::models::{Student, Teacher};
/// use u_match::validation::Roster;
///
/// let students = vec![
///     Student::new("A").with_subjects(["math", "physics"]).with_slots(["Mon", "Tue"]),
///     Student::new("B").with_subjects(["physics"]).with_slots(["Tue"]),
/// ];
/// let teachers = vec![
///     Teacher::new("T").with_subjects(["math", "physics"]).with_slots(["Mon", "Tue"]),
/// ];
/// let roster = Roster::new(students, teachers).unwrap();
///
/// let schedule = MatchingEngine::new().build_schedule(&roster);
/// assert_eq!(schedule.matched_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine;

impl MatchingEngine {
    /// Creates a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Builds the baseline schedule from an empty ledger.
    pub fn build_schedule(&self, roster: &Roster) -> Schedule {
        self.build_schedule_from(roster, Occupancy::new()).0
    }

    /// Builds a schedule on top of an existing ledger.
    ///
    /// Buckets already counted in `occupancy` are treated as partly taken.
    /// Returns the schedule and the updated ledger.
    pub fn build_schedule_from(
        &self,
        roster: &Roster,
        mut occupancy: Occupancy,
    ) -> (Schedule, Occupancy) {
        info!(
            students = roster.students().len(),
            teachers = roster.teachers().len(),
            "starting student-teacher matching"
        );
        let mut schedule = Schedule::new();

        for student in roster.students() {
            if roster.is_excluded(&student.id) {
                schedule.add_unmatched(&student.id);
                continue;
            }
            match self.assign_student(student, roster.teachers(), &mut occupancy) {
                Some(assignment) => schedule.add_assignment(assignment),
                None => {
                    info!(student_id = %student.id, "no available match found");
                    schedule.add_unmatched(&student.id);
                }
            }
        }

        info!(
            matched = schedule.matched_count(),
            unmatched = schedule.unmatched_count(),
            "matching completed"
        );
        (schedule, occupancy)
    }

    /// Places one student in the best open bucket, updating the ledger.
    pub fn assign_student(
        &self,
        student: &Student,
        teachers: &[Teacher],
        occupancy: &mut Occupancy,
    ) -> Option<Assignment> {
        let candidates = rank_candidates(student, teachers);
        let (teacher, slot) = first_open_bucket(candidates.iter(), occupancy)?;
        let count = occupancy.occupy(&teacher.id, &slot);
        debug!(
            student_id = %student.id,
            teacher_id = %teacher.id,
            slot = %slot,
            bucket = count,
            "assigned student"
        );
        Some(Assignment::new(&student.id, &teacher.id, slot))
    }
}

/// First (teacher, slot) with room, walking candidates in order and their
/// shared slots lexicographically.
pub(crate) fn first_open_bucket<'a: 'c, 'c>(
    candidates: impl IntoIterator<Item = &'c Candidate<'a>>,
    occupancy: &Occupancy,
) -> Option<(&'a Teacher, Slot)> {
    candidates.into_iter().find_map(|c| {
        c.compatibility
            .shared_slots
            .iter()
            .find(|slot| occupancy.has_room(c.teacher, slot))
            .map(|slot| (c.teacher, slot.clone()))
    })
}
