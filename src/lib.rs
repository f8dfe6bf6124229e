//! Student/teacher lesson matching.
//!
//! Assigns students to teachers in shared time slots under per-slot
//! capacity limits, simulates or ingests satisfaction feedback, and runs a
//! feedback-driven re-optimization pass over the baseline schedule.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Student`, `Teacher`, `Slot`, `Schedule`,
//!   `Assignment`, `FeedbackRecord`
//! - **`validation`**: Input normalization (`Roster`) and schedule invariant checks
//! - **`matching`**: Compatibility index, occupancy ledger and the greedy `MatchingEngine`
//! - **`feedback`**: Seeded satisfaction simulator
//! - **`recommend`**: Pluggable teacher predictors and the `RecommendationAdviser`
//! - **`reoptimize`**: Worst-first reassignment sweeps
//! - **`evaluation`**: Schedule metrics (`ScheduleMetrics`)
//! - **`pipeline`**: End-to-end run driven by `MatchConfig`
//! - **`io`**: CSV tables in and out
//!
//! # Example
//!
//! ```
//! use u_match::models::{Student, Teacher};
//! use u_match::{MatchConfig, Pipeline};
//!
//! let students = vec![
//!     Student::new("A").with_subjects(["math"]).with_slots(["Mon"]),
//!     Student::new("B").with_subjects(["math"]).with_slots(["Mon"]),
//! ];
//! let teachers = vec![Teacher::new("T")
//!     .with_subjects(["math"])
//!     .with_slots(["Mon"])
//!     .with_capacity(2)];
//!
//! let report = Pipeline::new(MatchConfig::new().with_seed(7))
//!     .run(students, teachers, None)
//!     .unwrap();
//! assert_eq!(report.metrics.matched_count, 2);
//! assert_eq!(report.metrics.group_lessons, 1);
//! ```

pub mod config;
pub mod error;
pub mod evaluation;
pub mod feedback;
pub mod io;
pub mod logging;
pub mod matching;
pub mod models;
pub mod pipeline;
pub mod recommend;
pub mod reoptimize;
pub mod validation;

pub use config::MatchConfig;
pub use error::{MatchError, MatchResult};
pub use pipeline::{Pipeline, RunReport};
