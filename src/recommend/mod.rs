//! Teacher recommendation.
//!
//! The engine treats a trained model as a capability: anything that maps a
//! [`FeatureVector`] to a ranked list of teacher ids. The adviser builds
//! features, asks the predictor, and keeps only teachers still feasible for
//! the student. Without a predictor it recommends nothing and
//! re-optimization falls back to feedback alone.

mod adviser;
mod affinity;
mod features;

pub use adviser::{RecommendationAdviser, Recommendations};
pub use affinity::SubjectAffinityPredictor;
pub use features::FeatureVector;

use std::fmt::Debug;
use thiserror::Error;

/// Why a predictor could not produce a ranking.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictorError {
    /// The model is missing or not ready.
    #[error("predictor unavailable: {0}")]
    Unavailable(String),
    /// The model failed on this input.
    #[error("prediction failed: {0}")]
    Failed(String),
}

/// A model ranking teachers for a student.
///
/// Implementations may return unknown or infeasible ids; the adviser
/// filters them out while preserving relative order.
pub trait TeacherPredictor: Send + Sync + Debug {
    /// Predictor name (for logs).
    fn name(&self) -> &str;

    /// Ranks teacher ids for the described student, most preferred first.
    fn predict_ranking(&self, features: &FeatureVector) -> Result<Vec<String>, PredictorError>;
}
