//! Schedule quality metrics.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Matched / Unmatched | Students with / without a lesson |
//! | Slot Utilization | Occupied slots / available slots, per teacher |
//! | Avg Utilization | Mean of the per-teacher utilizations |
//! | Lessons | Occupied (teacher, slot) buckets, split 1:1 / group |
//! | Avg Satisfaction | Mean satisfaction over supplied feedback |

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{info, warn};

use crate::models::{
    mean_satisfaction, teacher_means, FeedbackRecord, LessonKind, Schedule, Slot,
};
use crate::validation::Roster;

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleMetrics {
    /// Students in the roster.
    pub total_students: usize,
    /// Students holding a lesson.
    pub matched_count: usize,
    /// Students without a lesson.
    pub unmatched_count: usize,
    /// Buckets holding exactly one student.
    pub one_to_one_lessons: usize,
    /// Buckets shared by several students.
    pub group_lessons: usize,
    /// Per-teacher fraction of available slots in use (0.0..=1.0).
    pub slot_utilization: BTreeMap<String, f64>,
    /// Mean of `slot_utilization` (0.0 without teachers).
    pub avg_utilization: f64,
    /// Mean satisfaction; `None` when no feedback was supplied.
    pub avg_satisfaction: Option<f64>,
    /// Mean satisfaction per rated teacher.
    pub satisfaction_by_teacher: BTreeMap<String, f64>,
}

impl ScheduleMetrics {
    /// Computes metrics for a schedule.
    ///
    /// # Arguments
    /// * `schedule` - The schedule to judge.
    /// * `roster` - Students and teachers it was built from.
    /// * `feedback` - Satisfaction records, if any. Absent feedback leaves
    ///   `avg_satisfaction` empty rather than zero.
    pub fn calculate(
        schedule: &Schedule,
        roster: &Roster,
        feedback: Option<&[FeedbackRecord]>,
    ) -> Self {
        let mut buckets: BTreeMap<(&str, &Slot), usize> = BTreeMap::new();
        for a in &schedule.assignments {
            *buckets.entry((a.teacher_id.as_str(), &a.slot)).or_insert(0) += 1;
        }
        let (one_to_one_lessons, group_lessons) =
            buckets
                .values()
                .fold((0, 0), |(one, group), &n| match LessonKind::for_bucket_size(n) {
                    LessonKind::OneToOne => (one + 1, group),
                    LessonKind::Group => (one, group + 1),
                });

        let mut slot_utilization = BTreeMap::new();
        for teacher in roster.teachers() {
            let available = teacher.available_slots.len();
            if available == 0 {
                warn!(
                    teacher_id = %teacher.id,
                    "teacher has no available slots; utilization reported as 0"
                );
                slot_utilization.insert(teacher.id.clone(), 0.0);
                continue;
            }
            let occupied: BTreeSet<&Slot> = buckets
                .keys()
                .filter(|(id, slot)| *id == teacher.id && teacher.available_slots.contains(*slot))
                .map(|(_, slot)| *slot)
                .collect();
            slot_utilization.insert(teacher.id.clone(), occupied.len() as f64 / available as f64);
        }

        let avg_utilization = if slot_utilization.is_empty() {
            0.0
        } else {
            slot_utilization.values().sum::<f64>() / slot_utilization.len() as f64
        };

        let (avg_satisfaction, satisfaction_by_teacher) = match feedback {
            Some(records) => (mean_satisfaction(records), teacher_means(records)),
            None => (None, BTreeMap::new()),
        };

        Self {
            total_students: roster.students().len(),
            matched_count: schedule.matched_count(),
            unmatched_count: schedule.unmatched_count(),
            one_to_one_lessons,
            group_lessons,
            slot_utilization,
            avg_utilization,
            avg_satisfaction,
            satisfaction_by_teacher,
        }
    }

    /// Fraction of students matched (0.0 with no students).
    pub fn matched_rate(&self) -> f64 {
        let total = self.matched_count + self.unmatched_count;
        if total == 0 {
            0.0
        } else {
            self.matched_count as f64 / total as f64
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    ///
    /// Missing satisfaction data only passes a non-positive threshold.
    pub fn meets_thresholds(&self, min_matched_rate: f64, min_satisfaction: f64) -> bool {
        self.matched_rate() >= min_matched_rate
            && self
                .avg_satisfaction
                .map_or(min_satisfaction <= 0.0, |s| s >= min_satisfaction)
    }

    /// Writes a human-readable summary to the log.
    pub fn log_summary(&self) {
        info!(total = self.total_students, "total students");
        info!(
            matched = self.matched_count,
            unmatched = self.unmatched_count,
            one_to_one = self.one_to_one_lessons,
            group = self.group_lessons,
            "students matched"
        );
        for (teacher_id, utilization) in &self.slot_utilization {
            info!(teacher_id = %teacher_id, utilization, "teacher slot utilization");
        }
        match self.avg_satisfaction {
            Some(avg) => {
                info!(avg_satisfaction = avg, "overall average satisfaction");
                for (teacher_id, avg) in &self.satisfaction_by_teacher {
                    info!(
                        teacher_id = %teacher_id,
                        avg_satisfaction = avg,
                        "average satisfaction per teacher"
                    );
                }
            }
            None => warn!("no feedback supplied; satisfaction not evaluated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, Student, Teacher};

    fn sample_roster() -> Roster {
        Roster::new(
            vec![
                Student::new("S1").with_subjects(["math"]).with_slots(["Mon"]),
                Student::new("S2").with_subjects(["math"]).with_slots(["Mon"]),
                Student::new("S3").with_subjects(["math"]).with_slots(["Tue"]),
                Student::new("S4").with_subjects(["art"]).with_slots(["Fri"]),
            ],
            vec![
                Teacher::new("T1")
                    .with_subjects(["math"])
                    .with_slots(["Mon", "Tue", "Wed", "Thu"])
                    .with_capacity(2),
                Teacher::new("T2").with_subjects(["math"]).with_slots(["Fri"]),
            ],
        )
        .unwrap()
    }

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new();
        s.add_assignment(Assignment::new("S1", "T1", "Mon"));
        s.add_assignment(Assignment::new("S2", "T1", "Mon"));
        s.add_assignment(Assignment::new("S3", "T1", "Tue"));
        s.add_unmatched("S4");
        s
    }

    #[test]
    fn test_metrics_basic() {
        let m = ScheduleMetrics::calculate(&sample_schedule(), &sample_roster(), None);
        assert_eq!(m.total_students, 4);
        assert_eq!(m.matched_count, 3);
        assert_eq!(m.unmatched_count, 1);
        assert_eq!(m.one_to_one_lessons, 1);
        assert_eq!(m.group_lessons, 1);
        assert!((m.matched_rate() - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_metrics_utilization() {
        let m = ScheduleMetrics::calculate(&sample_schedule(), &sample_roster(), None);
        // T1: Mon + Tue of 4 slots; T2: idle
        assert!((m.slot_utilization["T1"] - 0.5).abs() < 1e-10);
        assert!((m.slot_utilization["T2"] - 0.0).abs() < 1e-10);
        assert!((m.avg_utilization - 0.25).abs() < 1e-10);
        assert!(m.slot_utilization.values().all(|u| (0.0..=1.0).contains(u)));
    }

    #[test]
    fn test_no_feedback_is_not_zero() {
        let m = ScheduleMetrics::calculate(&sample_schedule(), &sample_roster(), None);
        assert_eq!(m.avg_satisfaction, None);
        assert!(m.satisfaction_by_teacher.is_empty());

        let m = ScheduleMetrics::calculate(&sample_schedule(), &sample_roster(), Some(&[]));
        assert_eq!(m.avg_satisfaction, None);
    }

    #[test]
    fn test_metrics_satisfaction() {
        let feedback = vec![
            FeedbackRecord::new("S1", "T1", 0.5),
            FeedbackRecord::new("S2", "T1", 1.0),
            FeedbackRecord::new("S3", "T1", 0.0),
        ];
        let m = ScheduleMetrics::calculate(&sample_schedule(), &sample_roster(), Some(&feedback));
        assert!((m.avg_satisfaction.unwrap() - 0.5).abs() < 1e-10);
        assert!((m.satisfaction_by_teacher["T1"] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_meets_thresholds() {
        let feedback = vec![FeedbackRecord::new("S1", "T1", 0.8)];
        let m = ScheduleMetrics::calculate(&sample_schedule(), &sample_roster(), Some(&feedback));
        assert!(m.meets_thresholds(0.75, 0.8));
        assert!(!m.meets_thresholds(0.9, 0.0));
        assert!(!m.meets_thresholds(0.5, 0.9));

        let m = ScheduleMetrics::calculate(&sample_schedule(), &sample_roster(), None);
        assert!(m.meets_thresholds(0.5, 0.0));
        assert!(!m.meets_thresholds(0.5, 0.1));
    }

    #[test]
    fn test_metrics_empty_schedule() {
        let m = ScheduleMetrics::calculate(&Schedule::new(), &sample_roster(), None);
        assert_eq!(m.matched_count, 0);
        assert!((m.avg_utilization - 0.0).abs() < 1e-10);
        assert!((m.matched_rate() - 0.0).abs() < 1e-10);
    }
}
