//! Recommendation adviser.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use super::{FeatureVector, TeacherPredictor};
use crate::matching::compatible;
use crate::models::{FeedbackRecord, Student, Teacher};
use crate::validation::Roster;

/// Ranked, feasible teacher ids per student.
pub type Recommendations = BTreeMap<String, Vec<String>>;

/// Wraps an optional [`TeacherPredictor`].
///
/// # Example
/// ```
/// use u_match::recommend::RecommendationAdviser;
/// use u_match::models::{Student, Teacher};
///
/// let adviser = RecommendationAdviser::new();
/// let student = Student::new("S1").with_subjects(["math"]).with_slots(["Mon"]);
/// let teachers = vec![Teacher::new("T1").with_subjects(["math"]).with_slots(["Mon"])];
/// assert!(adviser.recommend(&student, &[], &teachers).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecommendationAdviser {
    predictor: Option<Arc<dyn TeacherPredictor>>,
}

impl RecommendationAdviser {
    /// Creates an adviser without a predictor (recommends nothing).
    pub fn new() -> Self {
        Self { predictor: None }
    }

    /// Sets the predictor.
    pub fn with_predictor<P: TeacherPredictor + 'static>(mut self, predictor: P) -> Self {
        self.predictor = Some(Arc::new(predictor));
        self
    }

    /// Sets a shared predictor.
    pub fn with_shared_predictor(mut self, predictor: Arc<dyn TeacherPredictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    /// Whether a predictor is configured.
    pub fn is_enabled(&self) -> bool {
        self.predictor.is_some()
    }

    /// Recommends feasible teachers for a student, most preferred first.
    ///
    /// Returns an empty list when no predictor is configured or the
    /// predictor fails; failures are logged, never raised.
    pub fn recommend(
        &self,
        student: &Student,
        history: &[FeedbackRecord],
        teachers: &[Teacher],
    ) -> Vec<String> {
        let Some(predictor) = &self.predictor else {
            return Vec::new();
        };

        let features = FeatureVector::build(student, history, teachers);
        let ranking = match predictor.predict_ranking(&features) {
            Ok(ranking) => ranking,
            Err(err) => {
                warn!(
                    student_id = %student.id,
                    predictor = predictor.name(),
                    error = %err,
                    "predictor unavailable; no recommendation"
                );
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let recommended: Vec<String> = ranking
            .into_iter()
            .filter(|id| {
                teachers
                    .iter()
                    .find(|t| &t.id == id)
                    .is_some_and(|t| compatible(student, t).is_feasible())
            })
            .filter(|id| seen.insert(id.clone()))
            .collect();

        debug!(
            student_id = %student.id,
            recommended = recommended.len(),
            "recommendation ready"
        );
        recommended
    }

    /// Recommends for every eligible student in the roster.
    ///
    /// Students with an empty recommendation are omitted.
    pub fn recommend_all(&self, roster: &Roster, feedback: &[FeedbackRecord]) -> Recommendations {
        if !self.is_enabled() {
            return Recommendations::new();
        }
        roster
            .eligible_students()
            .filter_map(|s| {
                let ranking = self.recommend(s, feedback, roster.teachers());
                (!ranking.is_empty()).then(|| (s.id.clone(), ranking))
            })
            .collect()
    }
}
