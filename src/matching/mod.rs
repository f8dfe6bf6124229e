//! Compatibility, capacity bookkeeping and baseline matching.
//!
//! `MatchingEngine` turns subject/slot constraints and per-slot capacities
//! into a baseline schedule with a deterministic greedy pass. It is not
//! optimal; [`crate::reoptimize`] improves on it using feedback.

mod compatibility;
mod engine;
mod occupancy;

pub use compatibility::{compatible, rank_candidates, Candidate, Compatibility};
pub use engine::MatchingEngine;
pub use occupancy::Occupancy;

pub(crate) use engine::first_open_bucket;
