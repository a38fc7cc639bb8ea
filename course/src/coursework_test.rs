use super::*;
use crate::model::Mark;

fn sample() -> Dataset {
    Dataset::from_json_str(crate::SAMPLE_DATASET).expect("sample dataset")
}

fn homework(id: &str, title: &str, due: Option<&str>) -> HomeworkItem {
    HomeworkItem { id: id.into(), title: title.into(), due: due.map(str::to_owned), ..HomeworkItem::default() }
}

#[test]
fn assignment_rows_sorted_by_due_with_marks() {
    let rows = assignment_rows(&sample(), "S1001").unwrap();
    assert_eq!(rows.len(), 13);
    assert_eq!(rows[0].id, "H1");
    assert_eq!(rows.last().map(|r| r.id.as_str()), Some("END"));
    let h11 = rows.iter().find(|r| r.id == "H11").unwrap();
    assert_eq!(h11.marks, Some(3.0));
    assert_eq!(h11.max, Some(6.0));
}

#[test]
fn assignment_rows_without_mark_fall_back_to_assignment_max() {
    let rows = assignment_rows(&sample(), "S1004").unwrap();
    assert!(rows.iter().all(|r| r.marks.is_none()));
    let mid = rows.iter().find(|r| r.id == "MID").unwrap();
    assert_eq!(mid.max, Some(20.0));
}

#[test]
fn assignment_rows_last_duplicate_mark_wins() {
    let mut data = sample();
    data.marks.push(Mark { assignment_id: "H1".into(), student: "S1001".into(), marks: 1.0, max: 6.0 });
    let rows = assignment_rows(&data, "S1001").unwrap();
    assert_eq!(rows.iter().find(|r| r.id == "H1").unwrap().marks, Some(1.0));
}

#[test]
fn assignment_rows_unknown_student() {
    assert!(assignment_rows(&sample(), "nobody").is_none());
}

#[test]
fn homework_dated_first_then_title_then_id() {
    let items = vec![
        homework("B", "beta", None),
        homework("H2", "Homework 2", Some("2025-09-25")),
        homework("A", "Alpha", None),
        homework("H1", "Homework 1", Some("2025-09-18")),
        homework("C", "alpha", Some("not a date")),
    ];
    let ids: Vec<String> = ordered_homework(&items).into_iter().map(|h| h.id).collect();
    assert_eq!(ids, vec!["H1", "H2", "A", "C", "B"]);
}

#[test]
fn embeddable_links_are_html_pages() {
    assert!(is_embeddable("assets/homework/hw1.html"));
    assert!(is_embeddable("hw.HTM#part2"));
    assert!(is_embeddable("hw.html?v=2"));
    assert!(!is_embeddable("assets/homework/hw2.pdf"));
}

#[test]
fn book_search_spans_all_lists() {
    let data = sample();
    assert_eq!(search_books(&data, "").len(), 3);
    assert_eq!(search_books(&data, "weinberg").len(), 1);
    assert_eq!(search_books(&data, "QUANTUM").len(), 3);
    assert!(search_books(&data, "relativity").is_empty());
}

#[test]
fn notes_are_oldest_first_and_files_need_unlock() {
    let data = sample();
    let locked = ordered_notes(&data.notes, false);
    let ids: Vec<&str> = locked.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["N1", "N2", "N3"]);
    assert!(locked.iter().all(|n| n.file.is_none()));

    let open = ordered_notes(&data.notes, true);
    assert_eq!(open[0].file.as_deref(), Some("assets/notes/notes1.pdf"));
}
