//! Feedback-driven re-optimization.
//!
//! Improves a baseline schedule by relocating poorly rated students to
//! better-ranked teachers with spare capacity.
//!
//! # Algorithm
//!
//! For each sweep:
//! 1. Order assignments worst-first by the satisfaction recorded for their
//!    (student, teacher) pair. Unrated assignments follow, in schedule order.
//! 2. For each student (at most once per sweep), rank feasible teachers:
//!    the adviser's recommendation when there is one, otherwise teachers
//!    by mean feedback (unrated teachers count as 1.0), then by
//!    compatibility.
//! 3. Move the student to the first teacher ranked above the current one
//!    that has room in a shared slot; free the vacated bucket.
//! 4. Offer open buckets, including those freed during the sweep, to
//!    unmatched students in input order.
//!
//! Sweeps are a fixed count rather than iteration to a fixed point, so the
//! cost is bounded. Capacity, feasibility and the one-lesson-per-student
//! rule hold after every step, and the matched count never drops.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info};

use crate::matching::{compatible, first_open_bucket, rank_candidates, Candidate, Occupancy};
use crate::models::{pair_means, teacher_means, Assignment, FeedbackRecord, Schedule, Student};
use crate::recommend::Recommendations;
use crate::validation::Roster;

/// Mean satisfaction assumed for teachers without feedback.
const UNRATED_TEACHER_WEIGHT: f64 = 1.0;

/// Worst-first relocation pass.
///
/// # Example
///
/// ```
/// use u_match::matching::MatchingEngine;
/// use u_match::models::{FeedbackRecord, Student, Teacher};
/// use u_match::recommend::Recommendations;
/// use u_match::reoptimize::Reoptimizer;
/// use u_match::validation::Roster;
///
/// let roster = Roster::new(
///     vec![Student::new("S1").with_subjects(["math"]).with_slots(["Mon", "Tue"])],
///     vec![
///         Teacher::new("T1").with_subjects(["math"]).with_slots(["Mon"]),
///         Teacher::new("T2").with_subjects(["math"]).with_slots(["Tue"]),
///     ],
/// ).unwrap();
/// let baseline = MatchingEngine::new().build_schedule(&roster);
/// assert_eq!(baseline.assignments[0].teacher_id, "T1");
///
/// let feedback = vec![
///     FeedbackRecord::new("S1", "T1", 0.2),
///     FeedbackRecord::new("S0", "T2", 0.9),
/// ];
/// let improved = Reoptimizer::new(1)
///     .reoptimize(&roster, &baseline, &feedback, &Recommendations::new());
/// assert_eq!(improved.assignments[0].teacher_id, "T2");
/// ```
#[derive(Debug, Clone)]
pub struct Reoptimizer {
    sweeps: usize,
}

impl Reoptimizer {
    /// Creates a pass running `sweeps` sweeps (0 leaves the schedule as is).
    pub fn new(sweeps: usize) -> Self {
        Self { sweeps }
    }

    /// Number of sweeps.
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Returns an adjusted copy of `schedule`.
    pub fn reoptimize(
        &self,
        roster: &Roster,
        schedule: &Schedule,
        feedback: &[FeedbackRecord],
        recommendations: &Recommendations,
    ) -> Schedule {
        self.reoptimize_from(roster, schedule, feedback, recommendations)
            .0
    }

    /// Returns an adjusted copy of `schedule` and its occupancy ledger.
    pub fn reoptimize_from(
        &self,
        roster: &Roster,
        schedule: &Schedule,
        feedback: &[FeedbackRecord],
        recommendations: &Recommendations,
    ) -> (Schedule, Occupancy) {
        let mut result = schedule.clone();
        let mut occupancy = Occupancy::from_schedule(schedule);
        let ratings = pair_means(feedback);
        let weights = teacher_means(feedback);

        for sweep in 0..self.sweeps {
            let mut visited: HashSet<String> = HashSet::new();
            let mut moved = 0usize;

            for idx in worst_first(&result.assignments, &ratings) {
                let current = &result.assignments[idx];
                if !visited.insert(current.student_id.clone()) {
                    continue;
                }
                let Some(student) = roster.student(&current.student_id) else {
                    continue;
                };

                let ranking = rank_for(student, roster, recommendations, &weights);
                let higher = ranking
                    .iter()
                    .take_while(|c| c.teacher.id != current.teacher_id);
                let Some((teacher, slot)) = first_open_bucket(higher, &occupancy) else {
                    continue;
                };

                debug!(
                    student_id = %student.id,
                    from = %current.teacher_id,
                    to = %teacher.id,
                    slot = %slot,
                    "relocating student"
                );
                occupancy.release(&current.teacher_id, &current.slot);
                occupancy.occupy(&teacher.id, &slot);
                result.assignments[idx] = Assignment::new(&student.id, &teacher.id, slot);
                moved += 1;
            }

            let mut placed = 0usize;
            let mut still_unmatched = Vec::with_capacity(result.unmatched.len());
            for student_id in std::mem::take(&mut result.unmatched) {
                let student = roster
                    .student(&student_id)
                    .filter(|_| !roster.is_excluded(&student_id));
                let bucket = student.and_then(|s| {
                    let ranking = rank_for(s, roster, recommendations, &weights);
                    first_open_bucket(ranking.iter(), &occupancy)
                });
                match bucket {
                    Some((teacher, slot)) => {
                        debug!(
                            student_id = %student_id,
                            teacher_id = %teacher.id,
                            slot = %slot,
                            "placing unmatched student"
                        );
                        occupancy.occupy(&teacher.id, &slot);
                        result
                            .assignments
                            .push(Assignment::new(&student_id, &teacher.id, slot));
                        placed += 1;
                    }
                    None => still_unmatched.push(student_id),
                }
            }
            result.unmatched = still_unmatched;

            info!(sweep, moved, placed, "re-optimization sweep completed");
        }

        (result, occupancy)
    }
}

impl Default for Reoptimizer {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Assignment indices, rated ones ascending by satisfaction, then unrated.
fn worst_first(
    assignments: &[Assignment],
    ratings: &BTreeMap<(String, String), f64>,
) -> Vec<usize> {
    let mut order: Vec<(usize, Option<f64>)> = assignments
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let key = (a.student_id.clone(), a.teacher_id.clone());
            (i, ratings.get(&key).copied())
        })
        .collect();
    order.sort_by(|(ia, sa), (ib, sb)| match (sa, sb) {
        (Some(x), Some(y)) => x.total_cmp(y).then(ia.cmp(ib)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => ia.cmp(ib),
    });
    order.into_iter().map(|(i, _)| i).collect()
}

/// Teachers to consider for `student`, best first.
fn rank_for<'a>(
    student: &Student,
    roster: &'a Roster,
    recommendations: &Recommendations,
    weights: &BTreeMap<String, f64>,
) -> Vec<Candidate<'a>> {
    if let Some(recommended) = recommendations.get(&student.id).filter(|r| !r.is_empty()) {
        return recommended
            .iter()
            .filter_map(|id| roster.teacher(id))
            .filter_map(|teacher| {
                let compatibility = compatible(student, teacher);
                compatibility.is_feasible().then(|| Candidate {
                    teacher,
                    preferred: student.prefers(&teacher.id),
                    compatibility,
                })
            })
            .collect();
    }

    let weight = |id: &str| weights.get(id).copied().unwrap_or(UNRATED_TEACHER_WEIGHT);
    let mut ranking = rank_candidates(student, roster.teachers());
    ranking.sort_by(|a, b| {
        weight(b.teacher.id.as_str()).total_cmp(&weight(a.teacher.id.as_str()))
    });
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::MatchingEngine;
    use crate::models::{Slot, Teacher};
    use crate::validation::check_schedule;

    fn contested_roster() -> Roster {
        Roster::new(
            vec![
                Student::new("S1").with_subjects(["math"]).with_slots(["Mon", "Tue"]),
                Student::new("S2").with_subjects(["math"]).with_slots(["Mon"]),
            ],
            vec![
                Teacher::new("T1").with_subjects(["math"]).with_slots(["Mon"]),
                Teacher::new("T2").with_subjects(["math"]).with_slots(["Mon", "Tue"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_moves_worst_rated_student_to_better_teacher() {
        let roster = contested_roster();
        let baseline = MatchingEngine::new().build_schedule(&roster);
        assert_eq!(baseline.assignments[0], Assignment::new("S1", "T1", "Mon"));
        assert_eq!(baseline.assignments[1], Assignment::new("S2", "T2", "Mon"));

        let feedback = vec![
            FeedbackRecord::new("S1", "T1", 0.2),
            FeedbackRecord::new("S2", "T2", 0.9),
        ];
        let improved = Reoptimizer::default().reoptimize(
            &roster,
            &baseline,
            &feedback,
            &Recommendations::new(),
        );

        assert_eq!(improved.assignments[0], Assignment::new("S1", "T2", "Tue"));
        assert_eq!(improved.assignments[1], Assignment::new("S2", "T2", "Mon"));
        assert!(check_schedule(&improved, &roster).is_empty());
    }

    #[test]
    fn test_zero_sweeps_is_identity() {
        let roster = contested_roster();
        let baseline = MatchingEngine::new().build_schedule(&roster);
        let feedback = vec![FeedbackRecord::new("S1", "T1", 0.0)];
        let same =
            Reoptimizer::new(0).reoptimize(&roster, &baseline, &feedback, &Recommendations::new());
        assert_eq!(same, baseline);
    }

    #[test]
    fn test_freed_bucket_goes_to_unmatched_student() {
        let roster = Roster::new(
            vec![
                Student::new("S1").with_subjects(["math"]).with_slots(["Mon", "Tue"]),
                Student::new("S2").with_subjects(["math"]).with_slots(["Mon"]),
            ],
            vec![
                Teacher::new("T1").with_subjects(["math"]).with_slots(["Mon"]),
                Teacher::new("T2").with_subjects(["math"]).with_slots(["Tue"]),
            ],
        )
        .unwrap();
        let baseline = MatchingEngine::new().build_schedule(&roster);
        assert_eq!(baseline.matched_count(), 1);
        assert_eq!(baseline.unmatched, vec!["S2".to_string()]);

        let feedback = vec![
            FeedbackRecord::new("S1", "T1", 0.1),
            FeedbackRecord::new("SX", "T2", 0.9),
        ];
        let (improved, occupancy) = Reoptimizer::new(1).reoptimize_from(
            &roster,
            &baseline,
            &feedback,
            &Recommendations::new(),
        );

        assert_eq!(improved.matched_count(), 2);
        assert!(improved.unmatched.is_empty());
        assert_eq!(
            improved.assignment_for_student("S2"),
            Some(&Assignment::new("S2", "T1", "Mon"))
        );
        assert_eq!(occupancy.count("T2", &Slot::new("Tue")), 1);
        assert!(check_schedule(&improved, &roster).is_empty());
    }

    #[test]
    fn test_recommendation_drives_move() {
        let roster = Roster::new(
            vec![Student::new("S1").with_subjects(["math"]).with_slots(["Mon"])],
            vec![
                Teacher::new("T1").with_subjects(["math"]).with_slots(["Mon"]),
                Teacher::new("T2").with_subjects(["math"]).with_slots(["Mon"]),
                Teacher::new("T3").with_subjects(["math"]).with_slots(["Mon"]),
            ],
        )
        .unwrap();
        let baseline = MatchingEngine::new().build_schedule(&roster);
        let mut recs = Recommendations::new();
        recs.insert("S1".into(), vec!["T3".into(), "T1".into()]);

        let improved = Reoptimizer::new(1).reoptimize(&roster, &baseline, &[], &recs);
        assert_eq!(improved.assignments[0].teacher_id, "T3");
    }

    #[test]
    fn test_no_move_when_already_best() {
        let roster = contested_roster();
        let baseline = MatchingEngine::new().build_schedule(&roster);
        let feedback = vec![
            FeedbackRecord::new("S1", "T1", 0.9),
            FeedbackRecord::new("S2", "T2", 0.3),
        ];
        let improved =
            Reoptimizer::new(3).reoptimize(&roster, &baseline, &feedback, &Recommendations::new());
        assert_eq!(improved, baseline);
    }

    #[test]
    fn test_full_teacher_is_not_overbooked() {
        let roster = Roster::new(
            vec![
                Student::new("S1").with_subjects(["math"]).with_slots(["Mon"]),
                Student::new("S2").with_subjects(["math"]).with_slots(["Mon"]),
            ],
            vec![
                Teacher::new("T1").with_subjects(["math"]).with_slots(["Mon"]),
                Teacher::new("T2").with_subjects(["math"]).with_slots(["Mon"]),
            ],
        )
        .unwrap();
        let baseline = MatchingEngine::new().build_schedule(&roster);
        // Both want T1 (rated higher) but it only holds one student.
        let feedback = vec![
            FeedbackRecord::new("S1", "T1", 0.95),
            FeedbackRecord::new("S2", "T2", 0.1),
        ];
        let improved =
            Reoptimizer::new(2).reoptimize(&roster, &baseline, &feedback, &Recommendations::new());
        assert_eq!(improved, baseline);
        assert!(check_schedule(&improved, &roster).is_empty());
    }

    #[test]
    fn test_worst_first_order() {
        let assignments = vec![
            Assignment::new("S1", "T1", "Mon"),
            Assignment::new("S2", "T1", "Tue"),
            Assignment::new("S3", "T2", "Mon"),
            Assignment::new("S4", "T2", "Tue"),
        ];
        let ratings = pair_means(&[
            FeedbackRecord::new("S1", "T1", 0.7),
            FeedbackRecord::new("S3", "T2", 0.1),
            FeedbackRecord::new("S4", "T2", 0.7),
        ]);
        assert_eq!(worst_first(&assignments, &ratings), vec![2, 0, 3, 1]);
    }
}
