//! End-to-end tests for the replicate/term loop

use cohort_simulator_core_rs::policy::{DEFAULT_CORE_COURSES, DEFAULT_ELECTIVE_COURSES};
use cohort_simulator_core_rs::{Event, SimulationError, Simulator, SimulatorConfig};
use std::collections::{BTreeMap, BTreeSet};

fn config(policy: &str, enrollment_rate: usize, num_terms: usize) -> SimulatorConfig {
    SimulatorConfig {
        policy: policy.to_string(),
        enrollment_rate,
        num_terms,
        num_replicates: 1,
        ..SimulatorConfig::default()
    }
}

#[test]
fn test_short_run_graduates_nobody() {
    let mut sim = Simulator::new(SimulatorConfig {
        core_capacity: 350,
        elective_capacity: 50,
        ..config("no-restrictions", 10, 3)
    })
    .unwrap();

    let run = sim.run().unwrap();
    assert_eq!(run.replicates.len(), 1);

    let record = &run.replicates[0];
    assert_eq!(record.num_students(), 30);
    assert_eq!(record.graduated_count(), 0);
    assert_eq!(record.terms.len(), 3);
    for student in &record.students {
        assert!(student.courses_taken().len() <= 2 * student.terms_attended());
    }
    sim.validate(record).unwrap();
}

#[test]
fn test_admissions_are_sequential_per_term() {
    let mut sim = Simulator::new(config("no-restrictions", 7, 4)).unwrap();
    let record = sim.run_one(7, 4).unwrap();

    assert_eq!(record.num_students(), 28);
    for (index, student) in record.students.iter().enumerate() {
        assert_eq!(student.id(), index);
        assert_eq!(student.admitted_term(), index / 7);
    }
    for term in &record.terms {
        assert_eq!(term.num_admitted, 7);
    }
}

#[test]
fn test_long_run_graduates_and_roster_shrinks() {
    let mut sim = Simulator::new(SimulatorConfig {
        single_course_probability: 0.0,
        ..config("no-restrictions", 20, 12)
    })
    .unwrap();
    let record = sim.run_one(20, 12).unwrap();
    sim.validate(&record).unwrap();

    assert!(record.graduated_count() > 0);
    for student in &record.students {
        match student.graduation_term() {
            Some(term) => {
                assert!(student.is_graduated());
                // Graduates stop registering the term they finish
                assert_eq!(student.terms_attended(), term - student.admitted_term() + 1);
                assert!(sim.graduation_rule().is_satisfied(student.courses_taken()));
            }
            None => {
                assert!(!student.is_graduated());
                assert_eq!(student.terms_attended(), 12 - student.admitted_term());
            }
        }
    }

    let graduated_total: usize = record.terms.iter().map(|t| t.num_graduated).sum();
    assert_eq!(graduated_total, record.graduated_count());
    for pair in record.terms.windows(2) {
        assert_eq!(
            pair[1].num_registering,
            pair[0].active_after + pair[1].num_admitted
        );
    }
}

#[test]
fn test_tight_capacity_never_exceeded() {
    let mut sim = Simulator::new(SimulatorConfig {
        core_capacity: 3,
        elective_capacity: 1,
        ..config("no-restrictions", 40, 5)
    })
    .unwrap();
    let record = sim.run_one(40, 5).unwrap();
    sim.validate(&record).unwrap();

    let mut failed = 0;
    let mut leaves = 0;
    for term in &record.terms {
        for (code, &enrolled) in &term.enrollments {
            let capacity = sim.catalog().get(code).unwrap().capacity();
            assert!(enrolled <= capacity, "{} over capacity in term {}", code, term.term);
        }
        failed += term.num_failed_attempts;
        leaves += term.num_leaves;
    }
    assert!(failed > 0, "40 students cannot share 24 seats without collisions");
    assert!(leaves > 0);

    let recorded_failures: usize = record.students.iter().map(|s| s.total_failed_attempts()).sum();
    assert_eq!(recorded_failures, failed);
}

#[test]
fn test_term_summaries_match_enrollment_snapshots() {
    let mut sim = Simulator::new(config("no-restrictions", 25, 6)).unwrap();
    let record = sim.run_one(25, 6).unwrap();

    for term in &record.terms {
        let seats: usize = term.enrollments.values().sum();
        assert_eq!(seats, term.num_enrollments, "term {}", term.term);
        assert_eq!(term.enrollments.len(), 12);
    }
    assert_eq!(record.enrollment_series().len(), 6);
}

#[test]
fn test_catalog_reset_after_every_replicate() {
    let mut sim = Simulator::new(config("no-restrictions", 30, 3)).unwrap();
    sim.run_one(30, 3).unwrap();
    assert_eq!(sim.catalog().total_enrolled(), 0);

    sim.run_one(30, 3).unwrap();
    assert_eq!(sim.catalog().total_enrolled(), 0);
    assert_eq!(sim.replicates_run(), 2);
}

#[test]
fn test_event_log_agrees_with_record() {
    let mut sim = Simulator::new(SimulatorConfig {
        elective_capacity: 5,
        ..config("no-restrictions", 15, 8)
    })
    .unwrap();
    let record = sim.run_one(15, 8).unwrap();
    let log = sim.event_log();

    let enrolled: usize = record.students.iter().map(|s| s.courses_taken().len()).sum();
    let failures: usize = record.students.iter().map(|s| s.total_failed_attempts()).sum();
    let leaves: usize = record.students.iter().map(|s| s.leaves_of_absence()).sum();

    assert_eq!(log.events_of_type("Admitted").len(), record.num_students());
    assert_eq!(log.events_of_type("Enrolled").len(), enrolled);
    assert_eq!(log.events_of_type("CourseFull").len(), failures);
    assert_eq!(log.events_of_type("LeaveOfAbsence").len(), leaves);
    assert_eq!(log.events_of_type("Graduated").len(), record.graduated_count());
    assert_eq!(log.events_of_type("TermClosed").len(), 8);

    let series: Vec<&BTreeMap<String, usize>> =
        log.enrollment_series().into_iter().map(|(_, e)| e).collect();
    assert_eq!(series, record.enrollment_series());

    for event in log.events_for_student(0) {
        assert_eq!(event.student_id(), Some(0));
    }
}

#[test]
fn test_event_log_holds_only_latest_replicate() {
    let mut sim = Simulator::new(config("no-restrictions", 5, 2)).unwrap();
    sim.run_one(5, 2).unwrap();
    let first_len = sim.event_log().events_of_type("Admitted").len();
    sim.run_one(5, 2).unwrap();

    assert_eq!(first_len, 10);
    assert_eq!(sim.event_log().events_of_type("Admitted").len(), 10);
}

#[test]
fn test_core_first_electives_follow_full_core() {
    let mut sim = Simulator::new(SimulatorConfig {
        single_course_probability: 0.0,
        ..config("core-first", 20, 10)
    })
    .unwrap();
    sim.run_one(20, 10).unwrap();

    let core: BTreeSet<&str> = DEFAULT_CORE_COURSES.iter().copied().collect();
    let electives: BTreeSet<&str> = DEFAULT_ELECTIVE_COURSES.iter().copied().collect();

    // student -> (term, course) enrollments in log order
    let mut history: BTreeMap<usize, Vec<(usize, String)>> = BTreeMap::new();
    let mut saw_elective = false;
    for event in sim.event_log().events() {
        if let Event::Enrolled {
            term,
            student_id,
            course,
        } = event
        {
            let past = history.entry(*student_id).or_default();
            if electives.contains(course.as_str()) {
                saw_elective = true;
                let done: BTreeSet<&str> = past
                    .iter()
                    .filter(|(t, _)| t < term)
                    .map(|(_, c)| c.as_str())
                    .collect();
                assert!(
                    core.is_subset(&done),
                    "student {} took {} in term {} before finishing core",
                    student_id,
                    course,
                    term
                );
            }
            past.push((*term, course.clone()));
        }
    }
    assert!(saw_elective, "ten terms leave room for electives");
}

#[test]
fn test_unknown_policy_rejected() {
    let err = Simulator::new(config("random", 10, 3)).err().unwrap();
    assert!(matches!(err, SimulationError::Policy(_)));
    assert!(err.to_string().contains("random"));
}

#[test]
fn test_zero_terms_runs_empty_replicate() {
    let mut sim = Simulator::new(config("no-restrictions", 10, 0)).unwrap();
    let record = sim.run_one(10, 0).unwrap();
    assert_eq!(record.num_students(), 0);
    assert!(record.terms.is_empty());
}

#[test]
fn test_run_serializes_to_json() {
    let mut sim = Simulator::new(SimulatorConfig {
        num_replicates: 2,
        ..config("core-first", 5, 3)
    })
    .unwrap();
    let run = sim.run().unwrap();
    let json: serde_json::Value = serde_json::from_str(&run.to_json(false).unwrap()).unwrap();

    assert_eq!(json["replicates"].as_array().unwrap().len(), 2);
    assert_eq!(json["config"]["policy"], "core-first");
    assert_eq!(json["config_hash"].as_str().unwrap().len(), 64);
    assert_eq!(json["replicates"][0]["students"].as_array().unwrap().len(), 15);
}
