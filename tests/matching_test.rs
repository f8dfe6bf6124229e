//! End-to-end matching scenarios and schedule invariants over generated rosters.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use u_match::evaluation::ScheduleMetrics;
use u_match::matching::MatchingEngine;
use u_match::models::{FeedbackRecord, LessonKind, Student, Teacher};
use u_match::recommend::Recommendations;
use u_match::reoptimize::Reoptimizer;
use u_match::validation::{check_schedule, Roster};
use u_match::{io, logging, MatchConfig, Pipeline};

const SUBJECTS: [&str; 4] = ["math", "physics", "chemistry", "english"];
const SLOTS: [&str; 5] = ["Mon 10:00", "Mon 14:00", "Tue 10:00", "Wed 16:00", "Fri 09:00"];

fn pick<'a>(rng: &mut StdRng, pool: &[&'a str], max: usize) -> Vec<&'a str> {
    let n = rng.random_range(1..=max);
    (0..n).filter_map(|_| pool.choose(rng).copied()).collect()
}

fn generated_roster(seed: u64) -> (Vec<Student>, Vec<Teacher>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let students = (0..30)
        .map(|i| {
            Student::new(format!("S{i:02}"))
                .with_subjects(pick(&mut rng, &SUBJECTS, 2))
                .with_slots(pick(&mut rng, &SLOTS, 3))
        })
        .collect();
    let teachers = (0..6)
        .map(|i| {
            let capacity = rng.random_range(1..=3);
            Teacher::new(format!("T{i}"))
                .with_subjects(pick(&mut rng, &SUBJECTS, 3))
                .with_slots(pick(&mut rng, &SLOTS, 3))
                .with_capacity(capacity)
        })
        .collect();
    (students, teachers)
}

#[test]
fn test_two_students_share_a_teacher_across_slots() {
    logging::init_test();
    let students = vec![
        Student::new("A").with_subjects(["math", "physics"]).with_slots(["Mon", "Tue"]),
        Student::new("B").with_subjects(["physics"]).with_slots(["Tue"]),
    ];
    let teachers = vec![Teacher::new("T")
        .with_subjects(["math", "physics"])
        .with_slots(["Mon", "Tue"])];
    let roster = Roster::new(students, teachers).unwrap();

    let schedule = MatchingEngine::new().build_schedule(&roster);
    assert_eq!(schedule.matched_count(), 2);
    assert_eq!(schedule.assignment_for_student("A").unwrap().slot.as_str(), "Mon");
    assert_eq!(schedule.assignment_for_student("B").unwrap().slot.as_str(), "Tue");
    assert!(schedule.unmatched.is_empty());
}

#[test]
fn test_group_capacity_leaves_third_student_unmatched() {
    logging::init_test();
    let students = ["S1", "S2", "S3"]
        .iter()
        .map(|id| Student::new(*id).with_subjects(["math"]).with_slots(["Mon"]))
        .collect();
    let teachers = vec![Teacher::new("T")
        .with_subjects(["math"])
        .with_slots(["Mon"])
        .with_capacity(2)];
    let roster = Roster::new(students, teachers).unwrap();

    let schedule = MatchingEngine::new().build_schedule(&roster);
    assert_eq!(schedule.matched_count(), 2);
    assert_eq!(schedule.unmatched, vec!["S3".to_string()]);
    for a in &schedule.assignments {
        assert_eq!(schedule.lesson_kind(a), LessonKind::Group);
    }
}

#[test]
fn test_student_without_subjects_is_reported_unmatched() {
    logging::init_test();
    let students = vec![
        Student::new("S1").with_slots(["Mon"]),
        Student::new("S2").with_subjects(["math"]).with_slots(["Mon"]),
    ];
    let teachers = vec![Teacher::new("T").with_subjects(["math"]).with_slots(["Mon"])];

    let report = Pipeline::new(MatchConfig::new().with_seed(4))
        .run(students, teachers, None)
        .unwrap();
    assert!(report.schedule.unmatched.contains(&"S1".to_string()));
    assert!(report.schedule.is_matched("S2"));
    assert_eq!(report.metrics.total_students, 2);
}

#[test]
fn test_generated_schedules_hold_invariants() {
    logging::init_test();
    for seed in 0..20 {
        let (students, teachers) = generated_roster(seed);
        let roster = Roster::new(students, teachers).unwrap();
        let schedule = MatchingEngine::new().build_schedule(&roster);

        assert!(
            check_schedule(&schedule, &roster).is_empty(),
            "seed {seed}: baseline violates invariants"
        );
        assert_eq!(
            schedule.matched_count() + schedule.unmatched_count(),
            roster.students().len()
        );

        let metrics = ScheduleMetrics::calculate(&schedule, &roster, None);
        for (teacher_id, u) in &metrics.slot_utilization {
            assert!((0.0..=1.0).contains(u), "seed {seed}: {teacher_id} at {u}");
        }
    }
}

#[test]
fn test_matching_is_deterministic() {
    logging::init_test();
    let (students, teachers) = generated_roster(42);
    let roster = Roster::new(students, teachers).unwrap();
    let engine = MatchingEngine::new();
    assert_eq!(engine.build_schedule(&roster), engine.build_schedule(&roster));
}

#[test]
fn test_reoptimization_never_loses_matches() {
    logging::init_test();
    for seed in 0..20 {
        let (students, teachers) = generated_roster(seed);
        let roster = Roster::new(students, teachers).unwrap();
        let baseline = MatchingEngine::new().build_schedule(&roster);

        let mut rng = StdRng::seed_from_u64(seed + 1000);
        let feedback: Vec<FeedbackRecord> = baseline
            .assignments
            .iter()
            .map(|a| FeedbackRecord::new(&a.student_id, &a.teacher_id, rng.random::<f64>()))
            .collect();

        let improved =
            Reoptimizer::new(3).reoptimize(&roster, &baseline, &feedback, &Recommendations::new());
        assert!(improved.matched_count() >= baseline.matched_count());
        assert_eq!(
            improved.matched_count() + improved.unmatched_count(),
            roster.students().len()
        );
        assert!(
            check_schedule(&improved, &roster).is_empty(),
            "seed {seed}: re-optimized schedule violates invariants"
        );
    }
}

#[test]
fn test_pipeline_over_csv_tables() {
    logging::init_test();
    let students = "\
student_id,subjects,preferred_time_slots,preferred_teacher
1,\"Math, Physics\",\"Mon 10:00, Tue 14:00\",
2,Physics,Tue 14:00,
3,English,Wed 16:00,T9
4,,Mon 10:00,
";
    let teachers = "\
teacher_id,subjects,available_time_slots,max_students_per_slot
T1,\"Math, Physics\",\"Mon 10:00, Tue 14:00\",1
T2,English,Wed 16:00,2
";
    let students = io::read_students(students.as_bytes()).unwrap();
    let teachers = io::read_teachers(teachers.as_bytes()).unwrap();

    let report = Pipeline::new(MatchConfig::new().with_seed(9))
        .run(students, teachers, None)
        .unwrap();
    assert_eq!(report.metrics.matched_count, 3);
    assert_eq!(report.schedule.unmatched, vec!["4".to_string()]);

    let mut out = Vec::new();
    io::write_schedule(&report.schedule, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("student_id,teacher_id,time_slot,lesson_type\n"));
    assert_eq!(text.lines().count(), 4);
}
