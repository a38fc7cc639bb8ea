use axum::body::to_bytes;
use serde_json::Value;

use super::*;
use crate::state::test_helpers::test_app_state;

async fn json_body(resp: Response) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn query(q: &str, program: &str, unlock: &str) -> Query<StudentQuery> {
    Query(StudentQuery { q: q.into(), program: program.into(), unlock: unlock.into() })
}

#[tokio::test]
async fn roster_is_masked_until_unlocked() {
    let (state, _store) = test_app_state();

    let Json(locked) = students(State(state.clone()), query("", "", "")).await;
    assert!(!locked.unlocked);
    assert_eq!(locked.students.len(), 4);
    assert!(locked.students.iter().all(|s| s.id == roster::MASK));

    let Json(open) = students(State(state), query("", "", " S1002 ")).await;
    assert!(open.unlocked);
    assert_eq!(open.students[0].id, "S1001");
}

#[tokio::test]
async fn roster_filters_by_program_and_query() {
    let (state, _store) = test_app_state();
    let Json(resp) = students(State(state.clone()), query("", "molecular science", "")).await;
    let names: Vec<&str> = resp.students.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Chen Mei-Ling", "Dario Ferreira"]);
    assert_eq!(resp.programs, vec!["Molecular Science", "Nano Program"]);

    let Json(resp) = students(State(state), query("陳", "", "")).await;
    assert_eq!(resp.students.len(), 1);
}

#[tokio::test]
async fn student_grades_reports_total_and_letter() {
    let (state, _store) = test_app_state();
    let (status, json) = json_body(student_grades(State(state), Path("S1001".into())).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["studentId"], "S1001");
    assert!((json["total"].as_f64().unwrap() - 97.0).abs() < 1e-9);
    assert_eq!(json["letter"], "A+");
    assert!(json["homework"].as_f64().unwrap() <= 60.0);
}

#[tokio::test]
async fn unknown_student_is_404_on_every_student_route() {
    let (state, _store) = test_app_state();
    let responses = [
        student_grades(State(state.clone()), Path("S9999".into())).await,
        student_attendance(State(state.clone()), Path("S9999".into()), Query(MonthQuery::default())).await,
        student_assignments(State(state), Path("S9999".into())).await,
    ];
    for resp in responses {
        let (status, json) = json_body(resp).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Student not found");
    }
}

#[tokio::test]
async fn attendance_month_filter() {
    let (state, _store) = test_app_state();
    let month = Query(MonthQuery { month: Some("2025-10".into()) });
    let (status, json) = json_body(student_attendance(State(state.clone()), Path("S1002".into()), month).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["overall"]["percent"], 75);
    assert_eq!(json["filtered"]["percent"], 50);

    let blank = Query(MonthQuery { month: Some("  ".into()) });
    let (_, json) = json_body(student_attendance(State(state), Path("S1002".into()), blank).await).await;
    assert_eq!(json["month"], Value::Null);
    assert_eq!(json["filtered"], json["overall"]);
}

#[tokio::test]
async fn class_grades_cover_every_student() {
    let (state, _store) = test_app_state();
    let unlock = Query(UnlockQuery { unlock: "S1001".into() });
    let Json(reports) = class_grades(State(state), unlock).await;
    assert_eq!(reports.len(), 4);
    let f = reports.iter().find(|r| r.student_id == "S1004").unwrap();
    assert_eq!(f.letter.as_deref(), Some("F"));
}

#[tokio::test]
async fn homework_flags_embeddable_links() {
    let (state, _store) = test_app_state();
    let Json(items) = homework(State(state)).await;
    let json = serde_json::to_value(&items).unwrap();
    let embed: Vec<(String, bool)> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|v| (v["id"].as_str().unwrap_or_default().to_owned(), v["embed"].as_bool().unwrap_or_default()))
        .collect();
    assert!(embed.contains(&("H1".to_owned(), true)));
    assert!(embed.contains(&("H2".to_owned(), false)));
    assert!(embed.contains(&("H3".to_owned(), false)));
}

#[tokio::test]
async fn books_search_matches_title() {
    let (state, _store) = test_app_state();
    let Json(all) = books(State(state.clone()), Query(BookQuery::default())).await;
    assert!(!all.is_empty());
    let Json(hits) = books(State(state.clone()), Query(BookQuery { q: "QUANTUM".into() })).await;
    assert!(hits.iter().any(|b| b.title == "Lectures on Quantum Mechanics"));
    let Json(none) = books(State(state), Query(BookQuery { q: "zzz-no-such-book".into() })).await;
    assert!(none.is_empty());
}

#[tokio::test]
async fn course_info_and_syllabus() {
    let (state, _store) = test_app_state();
    let Json(course) = course_info(State(state.clone())).await;
    assert_eq!(course.code.as_deref(), Some("Phys8067"));
    let Json(weeks) = syllabus(State(state)).await;
    assert_eq!(weeks.len(), 3);
}

#[tokio::test]
async fn locked_caller_cannot_learn_an_id_to_unlock_with() {
    let (state, _store) = test_app_state();

    let Json(reports) = class_grades(State(state.clone()), Query(UnlockQuery::default())).await;
    assert!(reports.iter().all(|r| r.student_id == roster::MASK));
    let Json(roster_view) = students(State(state.clone()), query("", "", "")).await;
    assert!(roster_view.students.iter().all(|s| s.id == roster::MASK));

    // Nothing handed out while locked works as an unlock value.
    let mut candidates: Vec<String> = reports.iter().map(|r| r.student_id.clone()).collect();
    candidates.extend(roster_view.students.iter().map(|s| s.id.clone()));
    for candidate in candidates {
        let Json(resp) = students(State(state.clone()), query("", "", &candidate)).await;
        assert!(!resp.unlocked);
    }
}

#[tokio::test]
async fn notes_hide_files_until_unlocked() {
    let (state, _store) = test_app_state();

    let Json(locked) = notes(State(state.clone()), Query(UnlockQuery::default())).await;
    assert!(!locked.unlocked);
    assert_eq!(locked.notes.first().map(|n| n.id.as_str()), Some("N1"));
    assert!(locked.notes.iter().all(|n| n.file.is_none()));

    let Json(wrong) = notes(State(state.clone()), Query(UnlockQuery { unlock: "S0000".into() })).await;
    assert!(!wrong.unlocked);

    let Json(open) = notes(State(state), Query(UnlockQuery { unlock: " S1003 ".into() })).await;
    assert!(open.unlocked);
    assert!(open.notes.iter().all(|n| n.file.is_some()));
}
