//! Satisfaction feedback model.
//!
//! Feedback is either supplied from surveys or simulated. Satisfaction is
//! stored on a 0.0..=1.0 scale; 1..=5 star ratings are mapped linearly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Slot;

/// Lowest star rating on the survey scale.
pub const MIN_RATING: f64 = 1.0;
/// Highest star rating on the survey scale.
pub const MAX_RATING: f64 = 5.0;

/// Satisfaction reported for one student-teacher lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Reporting student.
    pub student_id: String,
    /// Rated teacher.
    pub teacher_id: String,
    /// Lesson slot, when known.
    pub slot: Option<Slot>,
    /// Satisfaction (0.0..=1.0).
    pub satisfaction: f64,
    /// Free-text remark.
    pub comment: Option<String>,
}

impl FeedbackRecord {
    /// Creates a record; satisfaction is clamped to 0.0..=1.0.
    pub fn new(
        student_id: impl Into<String>,
        teacher_id: impl Into<String>,
        satisfaction: f64,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            teacher_id: teacher_id.into(),
            slot: None,
            satisfaction: clamp_unit(satisfaction),
            comment: None,
        }
    }

    /// Creates a record from a 1..=5 star rating.
    pub fn from_rating(
        student_id: impl Into<String>,
        teacher_id: impl Into<String>,
        rating: f64,
    ) -> Self {
        Self::new(
            student_id,
            teacher_id,
            (rating - MIN_RATING) / (MAX_RATING - MIN_RATING),
        )
    }

    /// Sets the lesson slot.
    pub fn with_slot(mut self, slot: impl Into<Slot>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    /// Sets the remark.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Satisfaction expressed as a 1..=5 star rating.
    pub fn rating(&self) -> f64 {
        MIN_RATING + self.satisfaction * (MAX_RATING - MIN_RATING)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Mean satisfaction over all records, `None` when there are none.
pub fn mean_satisfaction(feedback: &[FeedbackRecord]) -> Option<f64> {
    if feedback.is_empty() {
        return None;
    }
    let sum: f64 = feedback.iter().map(|f| f.satisfaction).sum();
    Some(sum / feedback.len() as f64)
}

/// Mean satisfaction per teacher.
pub fn teacher_means(feedback: &[FeedbackRecord]) -> BTreeMap<String, f64> {
    grouped_means(feedback.iter().map(|f| (f.teacher_id.clone(), f.satisfaction)))
}

/// Mean satisfaction per (student, teacher) pair.
pub fn pair_means(feedback: &[FeedbackRecord]) -> BTreeMap<(String, String), f64> {
    grouped_means(
        feedback
            .iter()
            .map(|f| ((f.student_id.clone(), f.teacher_id.clone()), f.satisfaction)),
    )
}

fn grouped_means<K: Ord>(values: impl Iterator<Item = (K, f64)>) -> BTreeMap<K, f64> {
    let mut sums: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for (key, value) in values {
        let entry = sums.entry(key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(key, (sum, n))| (key, sum / n as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_normalization() {
        let worst = FeedbackRecord::from_rating("S1", "T1", 1.0);
        let best = FeedbackRecord::from_rating("S1", "T1", 5.0);
        let mid = FeedbackRecord::from_rating("S1", "T1", 3.0);
        assert!((worst.satisfaction - 0.0).abs() < 1e-10);
        assert!((best.satisfaction - 1.0).abs() < 1e-10);
        assert!((mid.satisfaction - 0.5).abs() < 1e-10);
        assert!((mid.rating() - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_satisfaction_is_clamped() {
        assert!((FeedbackRecord::new("S1", "T1", 1.7).satisfaction - 1.0).abs() < 1e-10);
        assert!((FeedbackRecord::new("S1", "T1", -0.2).satisfaction - 0.0).abs() < 1e-10);
        assert!((FeedbackRecord::new("S1", "T1", f64::NAN).satisfaction - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_means() {
        let feedback = vec![
            FeedbackRecord::new("S1", "T1", 0.2),
            FeedbackRecord::new("S2", "T1", 0.6),
            FeedbackRecord::new("S3", "T2", 1.0),
            FeedbackRecord::new("S1", "T1", 0.4),
        ];

        assert!((mean_satisfaction(&feedback).unwrap() - 0.55).abs() < 1e-10);
        assert!(mean_satisfaction(&[]).is_none());

        let by_teacher = teacher_means(&feedback);
        assert!((by_teacher["T1"] - 0.4).abs() < 1e-10);
        assert!((by_teacher["T2"] - 1.0).abs() < 1e-10);

        let by_pair = pair_means(&feedback);
        assert!((by_pair[&("S1".to_string(), "T1".to_string())] - 0.3).abs() < 1e-10);
    }
}
