//! Input validation and roster preparation.
//!
//! Second normalization pass over student and teacher records
//! before matching. Two classes of problem are told apart:
//!
//! - **Structural** (blank id, empty input collection): collected, then
//!   returned together so the caller sees every offending record. No
//!   schedule is produced.
//! - **Soft** (duplicate id, empty subject or slot set, invalid capacity):
//!   repaired or skipped locally and logged. Never fatal.
//!
//! [`check_schedule`] verifies the schedule invariants against a roster.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MatchResult;
use crate::models::{
    Schedule, Slot, Student, Teacher, Violation, ViolationType, DEFAULT_MAX_STUDENTS_PER_SLOT,
};

/// A structural validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Position of the offending record in its input sequence.
    pub record: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of structural validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// A record has no identifier.
    MissingId,
    /// A required input collection is empty.
    EmptyInput,
    /// A field could not be interpreted at all.
    MalformedField,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(
        kind: ValidationErrorKind,
        record: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            record,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record {
            Some(n) => write!(f, "{:?} at record {}: {}", self.kind, n, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

/// Normalized, de-duplicated students and teachers for one run.
///
/// Keeps input order. Students whose subject or slot set is empty stay in
/// the roster (so they are reported as unmatched) but are marked excluded.
#[derive(Debug, Clone)]
pub struct Roster {
    students: Vec<Student>,
    teachers: Vec<Teacher>,
    excluded: HashSet<String>,
    student_index: HashMap<String, usize>,
    teacher_index: HashMap<String, usize>,
}

impl Roster {
    /// Prepares a roster with 1:1 default capacity.
    pub fn new(students: Vec<Student>, teachers: Vec<Teacher>) -> MatchResult<Self> {
        Self::prepare(students, teachers, DEFAULT_MAX_STUDENTS_PER_SLOT)
    }

    /// Normalizes and validates input records.
    ///
    /// `default_capacity` replaces a zero `max_students_per_slot`; a zero
    /// default is itself replaced by 1.
    ///
    /// # Errors
    /// [`MatchError::Validation`](crate::MatchError::Validation) listing every
    /// record with a blank id, plus an entry per empty input collection.
    pub fn prepare(
        students: Vec<Student>,
        teachers: Vec<Teacher>,
        default_capacity: u32,
    ) -> MatchResult<Self> {
        let mut errors = Vec::new();
        let default_capacity = if default_capacity == 0 {
            warn!("default capacity 0 is invalid; using {DEFAULT_MAX_STUDENTS_PER_SLOT}");
            DEFAULT_MAX_STUDENTS_PER_SLOT
        } else {
            default_capacity
        };

        if students.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyInput,
                None,
                "no students supplied",
            ));
        }
        if teachers.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyInput,
                None,
                "no teachers supplied",
            ));
        }

        let mut roster = Self {
            students: Vec::with_capacity(students.len()),
            teachers: Vec::with_capacity(teachers.len()),
            excluded: HashSet::new(),
            student_index: HashMap::new(),
            teacher_index: HashMap::new(),
        };

        for (pos, student) in students.into_iter().enumerate() {
            let student = student.normalized();
            if student.id.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingId,
                    Some(pos),
                    "student id is blank",
                ));
                continue;
            }
            if roster.student_index.contains_key(&student.id) {
                warn!(
                    student_id = %student.id,
                    record = pos,
                    "duplicate student id; keeping first occurrence"
                );
                continue;
            }
            if student.subjects.is_empty() {
                warn!(
                    student_id = %student.id,
                    "student has no subjects after normalization; excluded from matching"
                );
                roster.excluded.insert(student.id.clone());
            } else if student.available_slots.is_empty() {
                warn!(
                    student_id = %student.id,
                    "student has no available slots after normalization; excluded from matching"
                );
                roster.excluded.insert(student.id.clone());
            }
            roster
                .student_index
                .insert(student.id.clone(), roster.students.len());
            roster.students.push(student);
        }

        for (pos, teacher) in teachers.into_iter().enumerate() {
            let mut teacher = teacher.normalized();
            if teacher.id.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingId,
                    Some(pos),
                    "teacher id is blank",
                ));
                continue;
            }
            if roster.teacher_index.contains_key(&teacher.id) {
                warn!(
                    teacher_id = %teacher.id,
                    record = pos,
                    "duplicate teacher id; keeping first occurrence"
                );
                continue;
            }
            if teacher.max_students_per_slot == 0 {
                warn!(
                    teacher_id = %teacher.id,
                    default = default_capacity,
                    "invalid max_students_per_slot; using default"
                );
                teacher.max_students_per_slot = default_capacity;
            }
            if !teacher.is_schedulable() {
                warn!(
                    teacher_id = %teacher.id,
                    subjects = teacher.subjects.len(),
                    slots = teacher.available_slots.len(),
                    "teacher has no subjects or no slots; will never be matched"
                );
            }
            roster
                .teacher_index
                .insert(teacher.id.clone(), roster.teachers.len());
            roster.teachers.push(teacher);
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }

        debug!(
            students = roster.students.len(),
            excluded = roster.excluded.len(),
            teachers = roster.teachers.len(),
            "roster prepared"
        );
        Ok(roster)
    }

    /// All students in input order, excluded ones included.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// All teachers in input order.
    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    /// Students that take part in matching, in input order.
    pub fn eligible_students(&self) -> impl Iterator<Item = &Student> + '_ {
        self.students.iter().filter(|s| !self.is_excluded(&s.id))
    }

    /// Whether a student was excluded from matching.
    pub fn is_excluded(&self, student_id: &str) -> bool {
        self.excluded.contains(student_id)
    }

    /// Looks up a student by id.
    pub fn student(&self, id: &str) -> Option<&Student> {
        self.student_index.get(id).map(|&i| &self.students[i])
    }

    /// Looks up a teacher by id.
    pub fn teacher(&self, id: &str) -> Option<&Teacher> {
        self.teacher_index.get(id).map(|&i| &self.teachers[i])
    }
}

/// Checks every schedule invariant against a roster.
///
/// Checks:
/// 1. Each assignment names a known student and teacher
/// 2. No student is assigned twice
/// 3. The slot is available to both sides
/// 4. Student and teacher share a subject
/// 5. No (teacher, slot) bucket exceeds the teacher's capacity
///
/// Returns an empty vector for a valid schedule.
pub fn check_schedule(schedule: &Schedule, roster: &Roster) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();
    let mut buckets: BTreeMap<(&str, &Slot), u32> = BTreeMap::new();

    for a in &schedule.assignments {
        if !seen.insert(a.student_id.as_str()) {
            violations.push(Violation::new(
                ViolationType::DuplicateStudent,
                &a.student_id,
                format!("student '{}' holds more than one lesson", a.student_id),
            ));
        }
        *buckets
            .entry((a.teacher_id.as_str(), &a.slot))
            .or_insert(0) += 1;

        let Some(student) = roster.student(&a.student_id) else {
            violations.push(Violation::new(
                ViolationType::UnknownStudent,
                &a.student_id,
                format!("unknown student '{}'", a.student_id),
            ));
            continue;
        };
        let Some(teacher) = roster.teacher(&a.teacher_id) else {
            violations.push(Violation::new(
                ViolationType::UnknownTeacher,
                &a.teacher_id,
                format!("unknown teacher '{}'", a.teacher_id),
            ));
            continue;
        };

        if !student.available_slots.contains(&a.slot) || !teacher.available_slots.contains(&a.slot)
        {
            violations.push(Violation::new(
                ViolationType::SlotMismatch,
                &a.student_id,
                format!(
                    "slot '{}' is not shared by student '{}' and teacher '{}'",
                    a.slot, a.student_id, a.teacher_id
                ),
            ));
        }
        if student.subjects.is_disjoint(&teacher.subjects) {
            violations.push(Violation::new(
                ViolationType::SubjectMismatch,
                &a.student_id,
                format!(
                    "student '{}' and teacher '{}' share no subject",
                    a.student_id, a.teacher_id
                ),
            ));
        }
    }

    for ((teacher_id, slot), count) in buckets {
        if let Some(teacher) = roster.teacher(teacher_id) {
            if count > teacher.max_students_per_slot {
                violations.push(Violation::new(
                    ViolationType::CapacityExceeded,
                    teacher_id,
                    format!(
                        "teacher '{}' holds {} students at '{}' (max {})",
                        teacher_id, count, slot, teacher.max_students_per_slot
                    ),
                ));
            }
        }
    }

    violations
}
