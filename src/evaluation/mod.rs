//! Schedule evaluation.
//!
//! `ScheduleMetrics` summarizes a schedule: how many students were placed,
//! how much of each teacher's availability is used, and how satisfied the
//! students were when feedback is at hand.

mod metrics;

pub use metrics::ScheduleMetrics;
