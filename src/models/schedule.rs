//! Schedule (solution) model.
//!
//! A schedule is an ordered list of student-teacher-slot assignments plus
//! the students left unmatched. Group lessons are several students sharing
//! one (teacher, slot) bucket, never one student holding several lessons.

use serde::{Deserialize, Serialize};

use super::Slot;

/// A complete schedule for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Lessons, in the order they were committed.
    pub assignments: Vec<Assignment>,
    /// Students without a lesson, in input order.
    pub unmatched: Vec<String>,
}

/// A student placed with a teacher in a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned student.
    pub student_id: String,
    /// Teaching teacher.
    pub teacher_id: String,
    /// Lesson slot; available to both sides.
    pub slot: Slot,
}

/// Whether a lesson is taught 1:1 or to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LessonKind {
    /// The bucket holds a single student.
    #[serde(rename = "1:1")]
    OneToOne,
    /// The bucket is shared by several students.
    #[serde(rename = "group")]
    Group,
}

/// A broken schedule invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (student or teacher).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A student holds more than one assignment.
    DuplicateStudent,
    /// A (teacher, slot) bucket holds more students than allowed.
    CapacityExceeded,
    /// The slot is not available to the student or the teacher.
    SlotMismatch,
    /// The student and teacher share no subject.
    SubjectMismatch,
    /// The assignment names a student outside the roster.
    UnknownStudent,
    /// The assignment names a teacher outside the roster.
    UnknownTeacher,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(
        student_id: impl Into<String>,
        teacher_id: impl Into<String>,
        slot: impl Into<Slot>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            teacher_id: teacher_id.into(),
            slot: slot.into(),
        }
    }

    /// Whether this assignment uses the given (teacher, slot) bucket.
    #[inline]
    pub fn in_bucket(&self, teacher_id: &str, slot: &Slot) -> bool {
        self.teacher_id == teacher_id && &self.slot == slot
    }
}

impl LessonKind {
    /// Lesson kind for a bucket holding `students` students.
    pub fn for_bucket_size(students: usize) -> Self {
        if students > 1 {
            Self::Group
        } else {
            Self::OneToOne
        }
    }

    /// Label used in output tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::OneToOne => "1:1",
            Self::Group => "group",
        }
    }
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Records a student as unmatched.
    pub fn add_unmatched(&mut self, student_id: impl Into<String>) {
        self.unmatched.push(student_id.into());
    }

    /// Number of matched students.
    pub fn matched_count(&self) -> usize {
        self.assignments.len()
    }

    /// Number of unmatched students.
    pub fn unmatched_count(&self) -> usize {
        self.unmatched.len()
    }

    /// Finds the assignment for a student.
    pub fn assignment_for_student(&self, student_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.student_id == student_id)
    }

    /// Whether the student holds a lesson.
    pub fn is_matched(&self, student_id: &str) -> bool {
        self.assignment_for_student(student_id).is_some()
    }

    /// Returns all assignments for a teacher.
    pub fn assignments_for_teacher(&self, teacher_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.teacher_id == teacher_id)
            .collect()
    }

    /// Number of students in a (teacher, slot) bucket.
    pub fn bucket_size(&self, teacher_id: &str, slot: &Slot) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.in_bucket(teacher_id, slot))
            .count()
    }

    /// Lesson kind of an assignment within this schedule.
    pub fn lesson_kind(&self, assignment: &Assignment) -> LessonKind {
        LessonKind::for_bucket_size(self.bucket_size(&assignment.teacher_id, &assignment.slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new();
        s.add_assignment(Assignment::new("S1", "T1", "Mon"));
        s.add_assignment(Assignment::new("S2", "T1", "Mon"));
        s.add_assignment(Assignment::new("S3", "T2", "Tue"));
        s.add_unmatched("S4");
        s
    }

    #[test]
    fn test_schedule_counts() {
        let s = sample_schedule();
        assert_eq!(s.matched_count(), 3);
        assert_eq!(s.unmatched_count(), 1);
        assert!(s.is_matched("S1"));
        assert!(!s.is_matched("S4"));
    }

    #[test]
    fn test_assignment_lookup() {
        let s = sample_schedule();
        let a = s.assignment_for_student("S3").unwrap();
        assert_eq!(a.teacher_id, "T2");
        assert!(s.assignment_for_student("S99").is_none());
        assert_eq!(s.assignments_for_teacher("T1").len(), 2);
    }

    #[test]
    fn test_lesson_kind_from_bucket() {
        let s = sample_schedule();
        assert_eq!(s.bucket_size("T1", &Slot::new("Mon")), 2);
        assert_eq!(s.lesson_kind(&s.assignments[0]), LessonKind::Group);
        assert_eq!(s.lesson_kind(&s.assignments[2]), LessonKind::OneToOne);
        assert_eq!(LessonKind::Group.label(), "group");
        assert_eq!(LessonKind::OneToOne.label(), "1:1");
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::new();
        assert_eq!(s.matched_count(), 0);
        assert_eq!(s.unmatched_count(), 0);
    }
}
