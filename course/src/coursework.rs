//! Assignment tables, homework announcements, lecture notes, and book search.

use std::cmp::Ordering;

use serde::Serialize;
use time::Date;
use time::macros::format_description;

use crate::model::{Book, Dataset, HomeworkItem, LectureNote};

/// One row of a student's assignment table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRow {
    pub id: String,
    pub title: String,
    pub due: Option<String>,
    pub marks: Option<f64>,
    pub max: Option<f64>,
}

/// Every assignment with the student's mark, ordered by due date. `None`
/// when the id is not on the roster.
#[must_use]
pub fn assignment_rows(dataset: &Dataset, student_id: &str) -> Option<Vec<AssignmentRow>> {
    let student = dataset.student(student_id)?;

    let mut assignments: Vec<_> = dataset.assignments.iter().collect();
    assignments.sort_by(|a, b| a.due.as_deref().unwrap_or("").cmp(b.due.as_deref().unwrap_or("")));

    let rows = assignments
        .into_iter()
        .map(|a| {
            // Last mark for an assignment wins, as a keyed lookup would.
            let mark = dataset
                .marks_for(student)
                .filter(|m| m.assignment_id == a.id)
                .last();
            let max = match mark {
                Some(m) if m.max > 0.0 => Some(m.max),
                _ if a.max > 0.0 => Some(a.max),
                _ => None,
            };
            AssignmentRow {
                id: a.id.clone(),
                title: a.title.clone(),
                due: a.due.clone(),
                marks: mark.map(|m| m.marks),
                max,
            }
        })
        .collect();
    Some(rows)
}

fn parse_due(raw: Option<&str>) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    raw.and_then(|s| Date::parse(s.trim(), format).ok())
}

fn compare_homework(a: &HomeworkItem, b: &HomeworkItem) -> Ordering {
    match (parse_due(a.due.as_deref()), parse_due(b.due.as_deref())) {
        (Some(ad), Some(bd)) => ad.cmp(&bd),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.id.cmp(&b.id)),
    }
}

/// Homework ordered by due date; undated items last by title then id.
#[must_use]
pub fn ordered_homework(items: &[HomeworkItem]) -> Vec<HomeworkItem> {
    let mut ordered = items.to_vec();
    ordered.sort_by(compare_homework);
    ordered
}

/// Whether a homework link should be embedded inline rather than opened.
#[must_use]
pub fn is_embeddable(link: &str) -> bool {
    let path = link.split(['#', '?']).next().unwrap_or_default().to_ascii_lowercase();
    path.ends_with(".html") || path.ends_with(".htm")
}

/// One lecture-notes entry as shown to a viewer. `file` is withheld until
/// the viewer has entered a roster id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListing {
    pub id: String,
    pub title: String,
    pub date: String,
    pub file: Option<String>,
}

/// Lecture notes oldest first; equal dates fall back to id.
#[must_use]
pub fn ordered_notes(notes: &[LectureNote], unlocked: bool) -> Vec<NoteListing> {
    let mut ordered: Vec<&LectureNote> = notes.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    ordered
        .into_iter()
        .map(|n| NoteListing {
            id: n.id.clone(),
            title: n.title.clone(),
            date: n.date.clone(),
            file: unlocked.then(|| n.file.clone()),
        })
        .collect()
}

/// Textbooks, references, and extra books whose title or authors contain
/// the query, case-insensitively.
#[must_use]
pub fn search_books<'a>(dataset: &'a Dataset, query: &str) -> Vec<&'a Book> {
    let query = query.trim().to_lowercase();
    dataset
        .course
        .textbooks
        .iter()
        .chain(&dataset.course.references)
        .chain(&dataset.books)
        .filter(|b| {
            query.is_empty()
                || b.title.to_lowercase().contains(&query)
                || b.authors.join(", ").to_lowercase().contains(&query)
        })
        .collect()
}

#[cfg(test)]
#[path = "coursework_test.rs"]
mod tests;
