//! Simulated satisfaction feedback.
//!
//! Stands in for survey data. Produces one record per assignment with a
//! satisfaction that tends to be higher when student and teacher share
//! more subjects, and lower for group lessons and for heavily loaded
//! teachers. The aim is plausible data, not calibration.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::matching::compatible;
use crate::models::{Assignment, FeedbackRecord, Schedule};
use crate::validation::Roster;

/// Expected satisfaction for a 1:1 lesson sharing one subject.
const BASE_SATISFACTION: f64 = 0.6;
/// Bonus per shared subject beyond the first.
const SUBJECT_BONUS: f64 = 0.08;
/// Shared subjects beyond this count add nothing.
const MAX_SUBJECT_BONUS_STEPS: usize = 3;
/// Penalty for sharing the bucket with other students.
const GROUP_PENALTY: f64 = 0.05;
/// Penalty at full teacher load, scaled linearly below that.
const LOAD_PENALTY: f64 = 0.15;
/// Half-width of the uniform noise added to the expectation.
const JITTER: f64 = 0.2;

const COMMENTS: &[&str] = &[
    "Excellent teaching!",
    "Very helpful.",
    "Clear explanations.",
    "Good effort.",
    "Average performance.",
    "Could improve pacing.",
    "Friendly and patient.",
    "Needs more examples.",
    "Highly recommended!",
    "Student understood concepts well.",
];

/// Seedable feedback generator.
///
/// With a seed every call to [`simulate`](Self::simulate) replays the same
/// draw sequence; without one each call uses a fresh OS-seeded source.
///
/// # Example
///
/// ```
/// use u_match::feedback::FeedbackSimulator;
/// use u_match::matching::MatchingEngine;
/// use u_match::models::{Student, Teacher};
/// use u_match::validation::Roster;
///
/// let roster = Roster::new(
///     vec![Student::new("S1").with_subjects(["math"]).with_slots(["Mon"])],
///     vec![Teacher::new("T1").with_subjects(["math"]).with_slots(["Mon"])],
/// ).unwrap();
/// let schedule = MatchingEngine::new().build_schedule(&roster);
///
/// let sim = FeedbackSimulator::with_seed(7);
/// let feedback = sim.simulate(&schedule, &roster);
/// assert_eq!(feedback.len(), 1);
/// assert_eq!(feedback, sim.simulate(&schedule, &roster));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeedbackSimulator {
    seed: Option<u64>,
}

impl FeedbackSimulator {
    /// Creates a simulator, seeded when `seed` is given.
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    /// Creates a deterministic simulator.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// The configured seed.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Simulates one feedback record per assignment, in schedule order.
    pub fn simulate(&self, schedule: &Schedule, roster: &Roster) -> Vec<FeedbackRecord> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let feedback = simulate_with(schedule, roster, &mut rng);
        info!(
            records = feedback.len(),
            seeded = self.seed.is_some(),
            "feedback simulated"
        );
        feedback
    }
}

/// Simulates feedback drawing from an injected random source.
pub fn simulate_with<R: Rng>(
    schedule: &Schedule,
    roster: &Roster,
    rng: &mut R,
) -> Vec<FeedbackRecord> {
    schedule
        .assignments
        .iter()
        .map(|a| {
            let expected = expected_satisfaction(a, schedule, roster);
            let satisfaction = expected + rng.random_range(-JITTER..=JITTER);
            let comment = COMMENTS.choose(rng).copied().unwrap_or_default();
            debug!(
                student_id = %a.student_id,
                teacher_id = %a.teacher_id,
                expected,
                satisfaction,
                "simulated feedback"
            );
            FeedbackRecord::new(&a.student_id, &a.teacher_id, satisfaction)
                .with_slot(a.slot.clone())
                .with_comment(comment)
        })
        .collect()
}

/// Noise-free satisfaction expected for an assignment.
pub fn expected_satisfaction(assignment: &Assignment, schedule: &Schedule, roster: &Roster) -> f64 {
    let (Some(student), Some(teacher)) = (
        roster.student(&assignment.student_id),
        roster.teacher(&assignment.teacher_id),
    ) else {
        return BASE_SATISFACTION;
    };

    let shared = compatible(student, teacher).shared_subjects.len();
    let mut expected = BASE_SATISFACTION
        + SUBJECT_BONUS * shared.saturating_sub(1).min(MAX_SUBJECT_BONUS_STEPS) as f64;

    if schedule.bucket_size(&teacher.id, &assignment.slot) > 1 {
        expected -= GROUP_PENALTY;
    }

    let seats = teacher.available_slots.len() as f64 * f64::from(teacher.max_students_per_slot);
    if seats > 0.0 {
        let load = (schedule.assignments_for_teacher(&teacher.id).len() as f64 / seats).min(1.0);
        expected -= LOAD_PENALTY * load;
    }

    expected.clamp(0.0, 1.0)
}
