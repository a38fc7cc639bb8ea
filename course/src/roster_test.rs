use super::*;
use crate::model::Dataset;

fn students() -> Vec<Student> {
    Dataset::from_json_str(crate::SAMPLE_DATASET)
        .expect("sample dataset")
        .students
}

#[test]
fn empty_query_returns_everyone_sorted() {
    let roster = students();
    let names: Vec<&str> = search(&roster, "", "").iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Ada Lindqvist", "Bruno Okafor", "Chen Mei-Ling", "Dario Ferreira"]);
}

#[test]
fn query_matches_any_field_case_insensitively() {
    let roster = students();
    assert_eq!(search(&roster, "ENGINEERING", "").len(), 1);
    assert_eq!(search(&roster, "s100", "").len(), 4);
    assert_eq!(search(&roster, "陳", "")[0].id, "S1003");
    assert!(search(&roster, "zzz", "").is_empty());
}

#[test]
fn program_filter_requires_exact_field() {
    let roster = students();
    assert_eq!(search(&roster, "", "molecular science").len(), 2);
    assert!(search(&roster, "", "molecular").is_empty());
    assert_eq!(search(&roster, "dario", "Molecular Science").len(), 1);
}

#[test]
fn unlock_accepts_any_roster_id() {
    let roster = students();
    assert!(unlock(&roster, "S1002"));
    assert!(unlock(&roster, "  S1004 "));
    assert!(!unlock(&roster, "S9999"));
    assert!(!unlock(&roster, ""));
}

#[test]
fn locked_entries_mask_id_and_email() {
    let roster = students();
    let ada = entry(&roster[0], false);
    assert_eq!(ada.id, MASK);
    assert_eq!(ada.email.as_deref(), Some(MASK));
    assert_eq!(ada.name, "Ada Lindqvist");

    let dario = roster.iter().find(|s| s.id == "S1004").unwrap();
    assert!(entry(dario, false).email.is_none());
}

#[test]
fn unlocked_entries_show_everything() {
    let roster = students();
    let ada = entry(&roster[0], true);
    assert_eq!(ada.id, "S1001");
    assert_eq!(ada.email.as_deref(), Some("ada.lindqvist@example.edu"));
    assert_eq!(ada.program.as_deref(), Some("Nano Program"));
}

#[test]
fn programs_are_distinct_and_sorted() {
    assert_eq!(programs(&students()), vec!["Molecular Science", "Nano Program"]);
}
