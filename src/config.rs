//! Run configuration.

use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_MAX_STUDENTS_PER_SLOT;

/// Options for one matching run.
///
/// Missing fields take their defaults when deserialized, so a partial
/// document such as `{"reoptimize_sweeps": 2}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Score the baseline with feedback and re-optimize it.
    pub use_feedback: bool,
    /// Ask the recommendation adviser for per-student teacher rankings.
    pub use_recommender: bool,
    /// Fit a subject-affinity predictor from the baseline when the
    /// recommender is on and no predictor was supplied.
    pub fit_affinity: bool,
    /// Re-optimization sweeps (0 disables re-optimization).
    pub reoptimize_sweeps: usize,
    /// Seed for simulated feedback; `None` draws fresh randomness.
    pub feedback_seed: Option<u64>,
    /// Capacity substituted for a missing or invalid `max_students_per_slot`.
    pub default_capacity: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            use_feedback: true,
            use_recommender: false,
            fit_affinity: false,
            reoptimize_sweeps: 1,
            feedback_seed: None,
            default_capacity: DEFAULT_MAX_STUDENTS_PER_SLOT,
        }
    }
}

impl MatchConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables feedback and re-optimization.
    pub fn with_feedback(mut self, enabled: bool) -> Self {
        self.use_feedback = enabled;
        self
    }

    /// Enables or disables the recommendation adviser.
    pub fn with_recommender(mut self, enabled: bool) -> Self {
        self.use_recommender = enabled;
        self
    }

    /// Enables fitting a subject-affinity predictor from the baseline.
    pub fn with_fitted_affinity(mut self, enabled: bool) -> Self {
        self.fit_affinity = enabled;
        self
    }

    /// Sets the number of re-optimization sweeps.
    pub fn with_sweeps(mut self, sweeps: usize) -> Self {
        self.reoptimize_sweeps = sweeps;
        self
    }

    /// Seeds simulated feedback.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.feedback_seed = Some(seed);
        self
    }

    /// Sets the fallback per-slot capacity.
    pub fn with_default_capacity(mut self, capacity: u32) -> Self {
        self.default_capacity = capacity;
        self
    }
}
