//! CSV boundary.
//!
//! Reads student, teacher and feedback tables and writes schedules,
//! unmatched students and feedback. List cells hold comma-separated values
//! (`"math, physics"`).
//!
//! | Table | Columns |
//! |-------|---------|
//! | students | `student_id, subjects, preferred_time_slots[, preferred_teacher]` |
//! | teachers | `teacher_id, subjects, available_time_slots, max_students_per_slot` |
//! | feedback | `student_id, teacher_id[, time_slot], rating \| satisfaction[, comments]` |
//! | schedule | `student_id, teacher_id, time_slot, lesson_type` |
//!
//! Blank ids are structural errors. Empty list cells and bad capacities
//! pass through and are handled by [`Roster::prepare`](crate::validation::Roster::prepare).

use std::io::{Read, Write};

use csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::MatchResult;
use crate::models::{FeedbackRecord, Schedule, Student, Teacher};
use crate::validation::{ValidationError, ValidationErrorKind};

#[derive(Debug, Deserialize)]
struct StudentRow {
    student_id: Option<String>,
    subjects: Option<String>,
    preferred_time_slots: Option<String>,
    #[serde(default)]
    preferred_teacher: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeacherRow {
    teacher_id: Option<String>,
    subjects: Option<String>,
    available_time_slots: Option<String>,
    max_students_per_slot: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeedbackRow {
    student_id: Option<String>,
    teacher_id: Option<String>,
    #[serde(default)]
    time_slot: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    satisfaction: Option<f64>,
    #[serde(default)]
    comments: Option<String>,
}

#[derive(Debug, Serialize)]
struct ScheduleRow<'a> {
    student_id: &'a str,
    teacher_id: &'a str,
    time_slot: &'a str,
    lesson_type: &'static str,
}

#[derive(Debug, Serialize)]
struct UnmatchedRow<'a> {
    student_id: &'a str,
}

#[derive(Debug, Serialize)]
struct FeedbackOutRow<'a> {
    student_id: &'a str,
    teacher_id: &'a str,
    time_slot: &'a str,
    rating: f64,
    satisfaction: f64,
    comments: &'a str,
}

/// Reads students from a CSV table.
///
/// # Errors
/// `MatchError::Validation` for missing columns or blank ids (every
/// offending row is listed); `MatchError::Csv` for unparsable rows.
pub fn read_students<R: Read>(reader: R) -> MatchResult<Vec<Student>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    require_columns(
        rdr.headers()?,
        "students",
        &["student_id", "subjects", "preferred_time_slots"],
    )?;

    let mut students = Vec::new();
    let mut errors = Vec::new();
    for (pos, row) in rdr.deserialize::<StudentRow>().enumerate() {
        let row = row?;
        let Some(id) = non_blank(row.student_id) else {
            errors.push(missing_id(pos, "student_id"));
            continue;
        };
        let mut student = Student::new(id)
            .with_subjects(split_list(row.subjects.as_deref()))
            .with_slots(split_list(row.preferred_time_slots.as_deref()));
        if let Some(teacher_id) = non_blank(row.preferred_teacher) {
            student = student.with_preferred_teacher(teacher_id);
        }
        students.push(student);
    }

    if !errors.is_empty() {
        return Err(errors.into());
    }
    info!(count = students.len(), "read students");
    Ok(students)
}

/// Reads teachers from a CSV table.
///
/// Missing, non-numeric or non-positive capacities become 0, which the
/// roster replaces with the configured default.
///
/// # Errors
/// As [`read_students`].
pub fn read_teachers<R: Read>(reader: R) -> MatchResult<Vec<Teacher>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    require_columns(
        rdr.headers()?,
        "teachers",
        &["teacher_id", "subjects", "available_time_slots"],
    )?;

    let mut teachers = Vec::new();
    let mut errors = Vec::new();
    for (pos, row) in rdr.deserialize::<TeacherRow>().enumerate() {
        let row = row?;
        let Some(id) = non_blank(row.teacher_id) else {
            errors.push(missing_id(pos, "teacher_id"));
            continue;
        };
        let capacity = parse_capacity(row.max_students_per_slot.as_deref());
        teachers.push(
            Teacher::new(id)
                .with_subjects(split_list(row.subjects.as_deref()))
                .with_slots(split_list(row.available_time_slots.as_deref()))
                .with_capacity(capacity),
        );
    }

    if !errors.is_empty() {
        return Err(errors.into());
    }
    info!(count = teachers.len(), "read teachers");
    Ok(teachers)
}

/// Reads feedback from a CSV table.
///
/// A `rating` column (1..=5) is normalized to satisfaction; a
/// `satisfaction` column (0..=1) is taken as is and wins when both exist.
/// Rows with neither value are skipped with a warning; placeholder slots
/// (`N/A`) are dropped.
///
/// # Errors
/// As [`read_students`].
pub fn read_feedback<R: Read>(reader: R) -> MatchResult<Vec<FeedbackRecord>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    require_columns(&headers, "feedback", &["student_id", "teacher_id"])?;
    if !headers.iter().any(|h| h == "rating" || h == "satisfaction") {
        return Err(vec![ValidationError::new(
            ValidationErrorKind::MalformedField,
            None,
            "feedback table needs a 'rating' or 'satisfaction' column",
        )]
        .into());
    }

    let mut feedback = Vec::new();
    let mut errors = Vec::new();
    for (pos, row) in rdr.deserialize::<FeedbackRow>().enumerate() {
        let row = row?;
        let (Some(student_id), Some(teacher_id)) =
            (non_blank(row.student_id), non_blank(row.teacher_id))
        else {
            errors.push(missing_id(pos, "student_id/teacher_id"));
            continue;
        };
        let mut record = match (row.satisfaction, row.rating) {
            (Some(s), _) => FeedbackRecord::new(student_id, teacher_id, s),
            (None, Some(r)) => FeedbackRecord::from_rating(student_id, teacher_id, r),
            (None, None) => {
                warn!(record = pos, "feedback row without a score; skipped");
                continue;
            }
        };
        if let Some(slot) = non_blank(row.time_slot).filter(|s| s != "N/A") {
            record = record.with_slot(slot);
        }
        if let Some(comment) = non_blank(row.comments) {
            record = record.with_comment(comment);
        }
        feedback.push(record);
    }

    if !errors.is_empty() {
        return Err(errors.into());
    }
    info!(count = feedback.len(), "read feedback");
    Ok(feedback)
}

const SCHEDULE_COLUMNS: [&str; 4] = ["student_id", "teacher_id", "time_slot", "lesson_type"];
const UNMATCHED_COLUMNS: [&str; 1] = ["student_id"];
const FEEDBACK_COLUMNS: [&str; 6] = [
    "student_id",
    "teacher_id",
    "time_slot",
    "rating",
    "satisfaction",
    "comments",
];

/// Writer with the header already emitted, so empty tables keep their columns.
fn table_writer<W: Write>(writer: W, columns: &[&str]) -> MatchResult<Writer<W>> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(columns)?;
    Ok(wtr)
}

/// Writes the assignments of a schedule.
pub fn write_schedule<W: Write>(schedule: &Schedule, writer: W) -> MatchResult<()> {
    let mut wtr = table_writer(writer, &SCHEDULE_COLUMNS)?;
    for a in &schedule.assignments {
        wtr.serialize(ScheduleRow {
            student_id: &a.student_id,
            teacher_id: &a.teacher_id,
            time_slot: a.slot.as_str(),
            lesson_type: schedule.lesson_kind(a).label(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the unmatched students of a schedule.
pub fn write_unmatched<W: Write>(schedule: &Schedule, writer: W) -> MatchResult<()> {
    let mut wtr = table_writer(writer, &UNMATCHED_COLUMNS)?;
    for student_id in &schedule.unmatched {
        wtr.serialize(UnmatchedRow { student_id })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes feedback with both the 1..=5 rating and the 0..=1 satisfaction.
pub fn write_feedback<W: Write>(feedback: &[FeedbackRecord], writer: W) -> MatchResult<()> {
    let mut wtr = table_writer(writer, &FEEDBACK_COLUMNS)?;
    for f in feedback {
        wtr.serialize(FeedbackOutRow {
            student_id: &f.student_id,
            teacher_id: &f.teacher_id,
            time_slot: f.slot.as_ref().map_or("", |s| s.as_str()),
            rating: f.rating(),
            satisfaction: f.satisfaction,
            comments: f.comment.as_deref().unwrap_or(""),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn require_columns(
    headers: &StringRecord,
    table: &str,
    required: &[&str],
) -> MatchResult<()> {
    let errors: Vec<ValidationError> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| {
            ValidationError::new(
                ValidationErrorKind::MalformedField,
                None,
                format!("{table} table is missing column '{col}'"),
            )
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

fn missing_id(pos: usize, field: &str) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::MissingId,
        Some(pos),
        format!("'{field}' is blank"),
    )
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(value: Option<&str>) -> Vec<&str> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_capacity(value: Option<&str>) -> u32 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && v.fract() == 0.0)
        .filter(|v| (1.0..=f64::from(u32::MAX)).contains(v))
        .map_or(0, |v| v as u32)
}
