//! Subject-affinity predictor.
//!
//! A lightweight ranking model fitted from a schedule and its feedback:
//! for every (teacher, subject) pair it keeps the mean satisfaction of the
//! lessons where that subject was shared. A student's score for a teacher
//! is the mean affinity over the student's subjects, blended with the
//! student's own history with that teacher when there is one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{FeatureVector, PredictorError, TeacherPredictor};
use crate::matching::compatible;
use crate::models::{pair_means, FeedbackRecord, Schedule};
use crate::validation::Roster;

/// Weight of the student's own history in the blended score.
const DEFAULT_HISTORY_WEIGHT: f64 = 0.5;

/// Ranks teachers by how well their past lessons in a subject were received.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectAffinityPredictor {
    /// teacher id → subject → mean satisfaction.
    affinity: BTreeMap<String, BTreeMap<String, f64>>,
    history_weight: f64,
}

impl SubjectAffinityPredictor {
    /// Fits the affinity table from rated assignments.
    ///
    /// Assignments without feedback for their (student, teacher) pair are
    /// skipped.
    pub fn fit(roster: &Roster, schedule: &Schedule, feedback: &[FeedbackRecord]) -> Self {
        let ratings = pair_means(feedback);
        let mut sums: BTreeMap<String, BTreeMap<String, (f64, usize)>> = BTreeMap::new();

        for a in &schedule.assignments {
            let key = (a.student_id.clone(), a.teacher_id.clone());
            let (Some(&satisfaction), Some(student), Some(teacher)) = (
                ratings.get(&key),
                roster.student(&a.student_id),
                roster.teacher(&a.teacher_id),
            ) else {
                continue;
            };
            let by_subject = sums.entry(teacher.id.clone()).or_default();
            for subject in compatible(student, teacher).shared_subjects {
                let entry = by_subject.entry(subject).or_insert((0.0, 0));
                entry.0 += satisfaction;
                entry.1 += 1;
            }
        }

        let affinity: BTreeMap<String, BTreeMap<String, f64>> = sums
            .into_iter()
            .map(|(teacher, subjects)| {
                let means = subjects
                    .into_iter()
                    .map(|(subject, (sum, n))| (subject, sum / n as f64))
                    .collect();
                (teacher, means)
            })
            .collect();

        info!(teachers = affinity.len(), "subject affinity fitted");
        Self {
            affinity,
            history_weight: DEFAULT_HISTORY_WEIGHT,
        }
    }

    /// Sets the weight (0.0..=1.0) of the student's own history.
    pub fn with_history_weight(mut self, weight: f64) -> Self {
        self.history_weight = weight.clamp(0.0, 1.0);
        self
    }

    /// Mean affinity of a teacher over the given subjects, if any is known.
    pub fn affinity(&self, teacher_id: &str, subjects: &[String]) -> Option<f64> {
        let by_subject = self.affinity.get(teacher_id)?;
        let known: Vec<f64> = subjects
            .iter()
            .filter_map(|s| by_subject.get(s).copied())
            .collect();
        (!known.is_empty()).then(|| known.iter().sum::<f64>() / known.len() as f64)
    }

    /// Whether anything has been learned.
    pub fn is_fitted(&self) -> bool {
        !self.affinity.is_empty()
    }

    fn score(&self, teacher_id: &str, features: &FeatureVector) -> Option<f64> {
        let affinity = self.affinity(teacher_id, &features.subjects);
        let history = features.past_satisfaction.get(teacher_id).copied();
        match (affinity, history) {
            (Some(a), Some(h)) => Some((1.0 - self.history_weight) * a + self.history_weight * h),
            (a, h) => a.or(h),
        }
    }
}

impl TeacherPredictor for SubjectAffinityPredictor {
    fn name(&self) -> &str {
        "subject-affinity"
    }

    fn predict_ranking(&self, features: &FeatureVector) -> Result<Vec<String>, PredictorError> {
        if !self.is_fitted() {
            return Err(PredictorError::Unavailable(
                "subject affinity has not been fitted".into(),
            ));
        }

        let mut scored: Vec<(&str, f64)> = self
            .affinity
            .keys()
            .map(String::as_str)
            .chain(features.past_satisfaction.keys().map(String::as_str))
            .filter_map(|id| self.score(id, features).map(|score| (id, score)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        scored.dedup_by(|a, b| a.0 == b.0);

        Ok(scored.into_iter().map(|(id, _)| id.to_string()).collect())
    }
}
