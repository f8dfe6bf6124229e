//! Predictor input features.
//!
//! Built deterministically from public student and teacher fields plus the
//! student's own feedback history. All maps are ordered so two builds from
//! the same inputs compare equal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::matching::compatible;
use crate::models::{mean_satisfaction, teacher_means, FeedbackRecord, Slot, Student, Teacher};

/// Features describing one student for a teacher predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Student the features describe.
    pub student_id: String,
    /// Requested subjects, sorted.
    pub subjects: Vec<String>,
    /// Available slots, sorted.
    pub slots: Vec<Slot>,
    /// Shared-subject count per teacher (teachers with none omitted).
    pub subject_overlap: BTreeMap<String, usize>,
    /// Shared-slot count per teacher (teachers with none omitted).
    pub slot_overlap: BTreeMap<String, usize>,
    /// The student's mean past satisfaction per teacher.
    pub past_satisfaction: BTreeMap<String, f64>,
    /// The student's mean past satisfaction overall.
    pub mean_satisfaction: Option<f64>,
}

impl FeatureVector {
    /// Builds features for `student`.
    ///
    /// Records in `history` that belong to other students are ignored.
    pub fn build(student: &Student, history: &[FeedbackRecord], teachers: &[Teacher]) -> Self {
        let own: Vec<FeedbackRecord> = history
            .iter()
            .filter(|f| f.student_id == student.id)
            .cloned()
            .collect();

        let mut subject_overlap = BTreeMap::new();
        let mut slot_overlap = BTreeMap::new();
        for teacher in teachers {
            let c = compatible(student, teacher);
            if !c.shared_subjects.is_empty() {
                subject_overlap.insert(teacher.id.clone(), c.shared_subjects.len());
            }
            if !c.shared_slots.is_empty() {
                slot_overlap.insert(teacher.id.clone(), c.shared_slots.len());
            }
        }

        Self {
            student_id: student.id.clone(),
            subjects: student.subjects.iter().cloned().collect(),
            slots: student.available_slots.iter().cloned().collect(),
            subject_overlap,
            slot_overlap,
            past_satisfaction: teacher_means(&own),
            mean_satisfaction: mean_satisfaction(&own),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_features() {
        let student = Student::new("S1")
            .with_subjects(["physics", "math"])
            .with_slots(["Tue", "Mon"]);
        let teachers = vec![
            Teacher::new("T1").with_subjects(["math"]).with_slots(["Mon", "Tue"]),
            Teacher::new("T2").with_subjects(["art"]).with_slots(["Mon"]),
            Teacher::new("T3").with_subjects(["physics", "math"]).with_slots(["Fri"]),
        ];
        let history = vec![
            FeedbackRecord::new("S1", "T1", 0.4),
            FeedbackRecord::new("S1", "T1", 0.8),
            FeedbackRecord::new("S2", "T1", 0.0),
        ];

        let f = FeatureVector::build(&student, &history, &teachers);
        assert_eq!(f.subjects, vec!["math", "physics"]);
        assert_eq!(f.slots, vec![Slot::new("Mon"), Slot::new("Tue")]);
        assert_eq!(f.subject_overlap.get("T1"), Some(&1));
        assert_eq!(f.subject_overlap.get("T3"), Some(&2));
        assert!(!f.subject_overlap.contains_key("T2"));
        assert_eq!(f.slot_overlap.get("T1"), Some(&2));
        assert_eq!(f.slot_overlap.get("T2"), Some(&1));
        assert!(!f.slot_overlap.contains_key("T3"));
        assert!((f.past_satisfaction["T1"] - 0.6).abs() < 1e-10);
        assert!((f.mean_satisfaction.unwrap() - 0.6).abs() < 1e-10);
    }

    #[test]
    fn test_build_is_deterministic() {
        let student = Student::new("S1").with_subjects(["math"]).with_slots(["Mon"]);
        let teachers = vec![Teacher::new("T1").with_subjects(["math"]).with_slots(["Mon"])];
        assert_eq!(
            FeatureVector::build(&student, &[], &teachers),
            FeatureVector::build(&student, &[], &teachers)
        );
    }
}
