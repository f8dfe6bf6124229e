//! Feedback generation.
//!
//! Real survey feedback enters through [`crate::io::read_feedback`]; when
//! none exists, [`FeedbackSimulator`] produces plausible records from a
//! seedable random source.

mod simulator;

pub use simulator::{expected_satisfaction, simulate_with, FeedbackSimulator};
