//! End-to-end matching run.
//!
//! Roster → baseline matching → feedback (supplied or simulated) →
//! recommendations → re-optimization → metrics, as configured by
//! [`MatchConfig`].

use tracing::{debug, info, warn};

use crate::config::MatchConfig;
use crate::error::MatchResult;
use crate::evaluation::ScheduleMetrics;
use crate::feedback::FeedbackSimulator;
use crate::matching::MatchingEngine;
use crate::models::{FeedbackRecord, Schedule, Student, Teacher};
use crate::recommend::{
    RecommendationAdviser, Recommendations, SubjectAffinityPredictor, TeacherPredictor,
};
use crate::reoptimize::Reoptimizer;
use crate::validation::Roster;

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Normalized inputs.
    pub roster: Roster,
    /// Greedy schedule before any adjustment.
    pub baseline: Schedule,
    /// Final schedule (the baseline when re-optimization is off).
    pub schedule: Schedule,
    /// Feedback used to steer re-optimization.
    pub baseline_feedback: Vec<FeedbackRecord>,
    /// Feedback for the final schedule.
    pub feedback: Vec<FeedbackRecord>,
    /// Recommendations handed to re-optimization.
    pub recommendations: Recommendations,
    /// Metrics of the baseline.
    pub baseline_metrics: ScheduleMetrics,
    /// Metrics of the final schedule.
    pub metrics: ScheduleMetrics,
}

/// Configured matching pipeline.
///
/// # Example
///
/// ```
/// use u_match::{MatchConfig, Pipeline};
/// use u_match::models::{Student, Teacher};
///
/// let students = vec![
///     Student::new("A").with_subjects(["math"]).with_slots(["Mon"]),
///     Student::new("B").with_subjects(["math"]).with_slots(["Mon"]),
/// ];
/// let teachers = vec![
///     Teacher::new("T").with_subjects(["math"]).with_slots(["Mon"]).with_capacity(2),
/// ];
///
/// let report = Pipeline::new(MatchConfig::new().with_seed(1))
///     .run(students, teachers, None)
///     .unwrap();
/// assert_eq!(report.metrics.matched_count, 2);
/// assert!(report.metrics.avg_satisfaction.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: MatchConfig,
    adviser: RecommendationAdviser,
}

impl Pipeline {
    /// Creates a pipeline without a predictor.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            adviser: RecommendationAdviser::new(),
        }
    }

    /// Sets the teacher predictor used by the adviser.
    pub fn with_predictor<P: TeacherPredictor + 'static>(mut self, predictor: P) -> Self {
        self.adviser = self.adviser.with_predictor(predictor);
        self
    }

    /// The run configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Runs the pipeline on one snapshot of students and teachers.
    ///
    /// `feedback` replaces simulated feedback when given. With feedback
    /// turned off, supplied records only feed the metrics, and
    /// re-optimization runs only when the recommender produced rankings.
    ///
    /// # Errors
    /// Structural input errors from [`Roster::prepare`]. Everything else
    /// degrades to logged defaults or unmatched students.
    pub fn run(
        &self,
        students: Vec<Student>,
        teachers: Vec<Teacher>,
        feedback: Option<Vec<FeedbackRecord>>,
    ) -> MatchResult<RunReport> {
        let roster = Roster::prepare(students, teachers, self.config.default_capacity)?;
        info!(
            students = roster.students().len(),
            teachers = roster.teachers().len(),
            "loaded roster"
        );

        let baseline = MatchingEngine::new().build_schedule(&roster);

        let simulator = FeedbackSimulator::new(self.config.feedback_seed);
        let simulated = self.config.use_feedback && feedback.is_none();
        let baseline_feedback = match feedback {
            Some(records) => records,
            None if self.config.use_feedback => simulator.simulate(&baseline, &roster),
            None => Vec::new(),
        };
        let steering: &[FeedbackRecord] = if self.config.use_feedback {
            &baseline_feedback
        } else {
            &[]
        };

        let recommendations = self.recommendations(&roster, &baseline, steering);

        let schedule = if self.config.use_feedback || !recommendations.is_empty() {
            Reoptimizer::new(self.config.reoptimize_sweeps).reoptimize(
                &roster,
                &baseline,
                steering,
                &recommendations,
            )
        } else {
            debug!("no feedback and no recommendations; keeping baseline");
            baseline.clone()
        };

        let feedback = if simulated && schedule != baseline {
            simulator.simulate(&schedule, &roster)
        } else {
            baseline_feedback.clone()
        };

        let baseline_metrics =
            ScheduleMetrics::calculate(&baseline, &roster, Some(&baseline_feedback));
        let metrics = ScheduleMetrics::calculate(&schedule, &roster, Some(&feedback));
        info!(
            baseline_matched = baseline_metrics.matched_count,
            matched = metrics.matched_count,
            "run completed"
        );
        metrics.log_summary();

        Ok(RunReport {
            roster,
            baseline,
            schedule,
            baseline_feedback,
            feedback,
            recommendations,
            baseline_metrics,
            metrics,
        })
    }

    fn recommendations(
        &self,
        roster: &Roster,
        baseline: &Schedule,
        feedback: &[FeedbackRecord],
    ) -> Recommendations {
        if !self.config.use_recommender {
            return Recommendations::new();
        }
        if self.adviser.is_enabled() {
            return self.adviser.recommend_all(roster, feedback);
        }
        if self.config.fit_affinity {
            let predictor = SubjectAffinityPredictor::fit(roster, baseline, feedback);
            return RecommendationAdviser::new()
                .with_predictor(predictor)
                .recommend_all(roster, feedback);
        }
        warn!("recommender enabled but no predictor configured; using feedback only");
        Recommendations::new()
    }
}
