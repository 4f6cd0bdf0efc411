//! Tests for per-student registration
//!
//! CRITICAL: a student never holds more than two new courses per term and
//! never takes a seat in a full course.

use cohort_simulator_core_rs::policy::CourseGraphEntry;
use cohort_simulator_core_rs::{
    CourseCatalog, CourseGraph, EligibilityResolver, GraduationRule, PolicyName,
    RegistrationError, RngManager, Student,
};

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_catalog(core_capacity: usize, elective_capacity: usize) -> CourseCatalog {
    CourseCatalog::from_lists(
        &codes(&["591", "592", "593", "594", "595", "596"]),
        core_capacity,
        &codes(&["515", "547", "549", "550", "581", "542"]),
        elective_capacity,
    )
    .unwrap()
}

/// A and B, where B is co-taken with A
fn pair_setup(capacity: usize) -> (EligibilityResolver, CourseCatalog, GraduationRule) {
    let graph = CourseGraph::new(vec![
        CourseGraphEntry::new("A", &[], &[]),
        CourseGraphEntry::new("B", &["A"], &["A"]),
    ])
    .unwrap();
    let resolver = EligibilityResolver::with_graph(PolicyName::NoRestrictions, graph);
    let catalog = CourseCatalog::from_lists(&codes(&["A", "B"]), capacity, &[], capacity).unwrap();
    let rule = GraduationRule::new(codes(&["A", "B"]), 2);
    (resolver, catalog, rule)
}

#[test]
fn test_registers_two_courses_when_never_stopping_early() {
    let resolver = EligibilityResolver::for_policy(PolicyName::NoRestrictions);
    let mut catalog = default_catalog(350, 50);
    let rule = GraduationRule::default();
    let mut rng = RngManager::new(12345);

    let mut student = Student::with_single_course_probability(0, 0, 0.0);
    let outcome = student
        .register_for_term(0, &resolver, &mut catalog, &rule, &mut rng)
        .unwrap();

    assert_eq!(outcome.selected.len(), 2);
    assert!(outcome.full_courses.is_empty());
    assert_eq!(student.courses_taken().len(), 2);
    assert_eq!(catalog.total_enrolled(), 2);
    assert!(!outcome.is_leave_of_absence());
}

#[test]
fn test_always_stopping_takes_one_course() {
    let resolver = EligibilityResolver::for_policy(PolicyName::NoRestrictions);
    let mut catalog = default_catalog(350, 50);
    let rule = GraduationRule::default();
    let mut rng = RngManager::new(9);

    let mut student = Student::with_single_course_probability(0, 0, 1.0);
    for term in 0..4 {
        let outcome = student
            .register_for_term(term, &resolver, &mut catalog, &rule, &mut rng)
            .unwrap();
        assert_eq!(outcome.selected.len(), 1, "term {}", term);
        catalog.reset_all();
    }
    assert_eq!(student.courses_taken().len(), 4);
    assert_eq!(student.terms_attended(), 4);
}

#[test]
fn test_companion_unlocked_by_its_corequisite() {
    let (resolver, mut catalog, rule) = pair_setup(10);
    let mut rng = RngManager::new(1);

    let mut student = Student::with_single_course_probability(0, 0, 0.0);
    let outcome = student
        .register_for_term(0, &resolver, &mut catalog, &rule, &mut rng)
        .unwrap();

    // B only becomes selectable once A is committed
    assert_eq!(outcome.selected, codes(&["A", "B"]));
    assert!(outcome.graduated);
    assert!(student.is_graduated());
    assert_eq!(student.graduation_term(), Some(0));
}

#[test]
fn test_companion_lost_when_corequisite_full() {
    let (resolver, mut catalog, rule) = pair_setup(1);
    catalog.get_mut("A").unwrap().enroll().unwrap();
    let mut rng = RngManager::new(1);

    let mut student = Student::with_single_course_probability(0, 0, 0.0);
    let outcome = student
        .register_for_term(0, &resolver, &mut catalog, &rule, &mut rng)
        .unwrap();

    assert!(outcome.selected.is_empty());
    assert_eq!(outcome.full_courses, codes(&["A"]));
    assert_eq!(student.failed_attempts().get("A"), Some(&1));
    assert_eq!(catalog.get("B").unwrap().enrolled(), 0);
    assert_eq!(student.leaves_of_absence(), 1);
}

#[test]
fn test_all_options_full_is_leave_of_absence() {
    let resolver = EligibilityResolver::for_policy(PolicyName::NoRestrictions);
    let mut catalog = default_catalog(1, 1);
    for code in ["591", "592", "515"] {
        catalog.get_mut(code).unwrap().enroll().unwrap();
    }
    let rule = GraduationRule::default();
    let mut rng = RngManager::new(77);

    let mut student = Student::new(4, 2);
    let outcome = student
        .register_for_term(2, &resolver, &mut catalog, &rule, &mut rng)
        .unwrap();

    assert!(outcome.is_leave_of_absence());
    assert_eq!(outcome.full_courses.len(), 3);
    for code in ["591", "592", "515"] {
        assert_eq!(student.failed_attempts().get(code), Some(&1), "{}", code);
        assert_eq!(catalog.get(code).unwrap().enrolled(), 1);
    }
    assert_eq!(student.total_failed_attempts(), 3);
    assert_eq!(student.leaves_of_absence(), 1);
    assert_eq!(student.terms_attended(), 1);
}

#[test]
fn test_last_seat_goes_to_first_registrant() {
    let (resolver, mut catalog, rule) = pair_setup(1);
    let mut rng = RngManager::new(5);

    let mut first = Student::with_single_course_probability(0, 0, 1.0);
    let mut second = Student::with_single_course_probability(1, 0, 1.0);

    let a = first
        .register_for_term(0, &resolver, &mut catalog, &rule, &mut rng)
        .unwrap();
    let b = second
        .register_for_term(0, &resolver, &mut catalog, &rule, &mut rng)
        .unwrap();

    assert_eq!(a.selected, codes(&["A"]));
    assert!(b.selected.is_empty());
    assert_eq!(b.full_courses, codes(&["A"]));
    assert_eq!(catalog.get("A").unwrap().enrolled(), 1);
}

#[test]
fn test_graduated_student_cannot_register() {
    let (resolver, mut catalog, rule) = pair_setup(10);
    let mut rng = RngManager::new(1);

    let mut student = Student::with_single_course_probability(7, 0, 0.0);
    student
        .register_for_term(0, &resolver, &mut catalog, &rule, &mut rng)
        .unwrap();
    assert!(student.is_graduated());

    let err = student
        .register_for_term(1, &resolver, &mut catalog, &rule, &mut rng)
        .unwrap_err();
    assert!(matches!(err, RegistrationError::AlreadyGraduated(7)));
}

#[test]
fn test_course_missing_from_catalog_is_an_error() {
    let resolver = EligibilityResolver::for_policy(PolicyName::NoRestrictions);
    let mut catalog = CourseCatalog::from_lists(&codes(&["592"]), 10, &[], 10).unwrap();
    let rule = GraduationRule::default();
    let mut rng = RngManager::new(3);

    // Every option except 592 is missing from this catalog
    let mut student = Student::with_single_course_probability(0, 0, 0.0);
    let err = student
        .register_for_term(0, &resolver, &mut catalog, &rule, &mut rng)
        .unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::CourseNotInCatalog { student_id: 0, .. }
    ));
}

#[test]
fn test_history_never_shrinks_and_load_is_bounded() {
    let resolver = EligibilityResolver::for_policy(PolicyName::NoRestrictions);
    let mut catalog = default_catalog(350, 50);
    let rule = GraduationRule::default();
    let mut rng = RngManager::new(2024);

    let mut student = Student::new(0, 0);
    for term in 0..12 {
        if student.is_graduated() {
            break;
        }
        let before = student.courses_taken().clone();
        let outcome = student
            .register_for_term(term, &resolver, &mut catalog, &rule, &mut rng)
            .unwrap();
        assert!(outcome.selected.len() <= 2);
        assert!(before.is_subset(student.courses_taken()));
        assert_eq!(
            student.courses_taken().len(),
            before.len() + outcome.selected.len()
        );
        catalog.reset_all();
    }
}
