//! Read-only course API.
//!
//! Every view is computed from the shared dataset on request. Unknown
//! student ids produce `404 {"error": "Student not found"}`.
//!
//! Student ids double as the unlock secret for the roster and the lecture
//! notes, so no view reachable without `unlock` may expose one.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use course::roster::RosterEntry;
use course::coursework::NoteListing;
use course::{Book, Course, GradeReport, HomeworkItem, SyllabusWeek, attendance, coursework, grades, roster};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StudentQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub unlock: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UnlockQuery {
    #[serde(default)]
    pub unlock: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub programs: Vec<String>,
    pub unlocked: bool,
    pub students: Vec<RosterEntry>,
}

#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub unlocked: bool,
    pub notes: Vec<NoteListing>,
}

/// Homework item plus whether the site should embed its link inline.
#[derive(Debug, Serialize)]
pub struct HomeworkView {
    #[serde(flatten)]
    pub item: HomeworkItem,
    pub embed: bool,
}

fn student_not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "Student not found" }))).into_response()
}

fn or_not_found<T: Serialize>(value: Option<T>) -> Response {
    value.map_or_else(student_not_found, |v| Json(v).into_response())
}

/// `GET /api/course`
pub async fn course_info(State(state): State<AppState>) -> Json<Course> {
    Json(state.dataset.course.clone())
}

/// `GET /api/syllabus`
pub async fn syllabus(State(state): State<AppState>) -> Json<Vec<SyllabusWeek>> {
    Json(state.dataset.course.syllabus.clone())
}

/// `GET /api/students?q=&program=&unlock=`: roster, masked unless the
/// `unlock` value is a roster id.
pub async fn students(State(state): State<AppState>, Query(query): Query<StudentQuery>) -> Json<RosterResponse> {
    let all = &state.dataset.students;
    let unlocked = roster::unlock(all, &query.unlock);
    let students = roster::search(all, &query.q, &query.program)
        .into_iter()
        .map(|s| roster::entry(s, unlocked))
        .collect();
    Json(RosterResponse { programs: roster::programs(all), unlocked, students })
}

/// `GET /api/students/{id}/grades`
pub async fn student_grades(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    or_not_found(grades::grade_student(&state.dataset, &id, &state.policy))
}

/// `GET /api/students/{id}/attendance?month=YYYY-MM`
pub async fn student_attendance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let month = query.month.as_deref().map(str::trim).filter(|m| !m.is_empty());
    or_not_found(attendance::summarize(&state.dataset, &id, month))
}

/// `GET /api/students/{id}/assignments`
pub async fn student_assignments(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    or_not_found(coursework::assignment_rows(&state.dataset, &id))
}

/// `GET /api/grades?unlock=`: every student's grade report, by name. Ids
/// are masked unless `unlock` is a roster id.
pub async fn class_grades(State(state): State<AppState>, Query(query): Query<UnlockQuery>) -> Json<Vec<GradeReport>> {
    let mut reports = grades::class_report(&state.dataset, &state.policy);
    if !roster::unlock(&state.dataset.students, &query.unlock) {
        for report in &mut reports {
            roster::MASK.clone_into(&mut report.student_id);
        }
    }
    Json(reports)
}

/// `GET /api/notes?unlock=`: lecture notes oldest first. File paths are
/// only included once `unlock` is a roster id.
pub async fn notes(State(state): State<AppState>, Query(query): Query<UnlockQuery>) -> Json<NotesResponse> {
    let unlocked = roster::unlock(&state.dataset.students, &query.unlock);
    Json(NotesResponse { unlocked, notes: coursework::ordered_notes(&state.dataset.notes, unlocked) })
}

/// `GET /api/homework`
pub async fn homework(State(state): State<AppState>) -> Json<Vec<HomeworkView>> {
    let views = coursework::ordered_homework(&state.dataset.homework)
        .into_iter()
        .map(|item| {
            let embed = item.link.as_deref().is_some_and(coursework::is_embeddable);
            HomeworkView { item, embed }
        })
        .collect();
    Json(views)
}

/// `GET /api/books?q=`
pub async fn books(State(state): State<AppState>, Query(query): Query<BookQuery>) -> Json<Vec<Book>> {
    Json(coursework::search_books(&state.dataset, &query.q).into_iter().cloned().collect())
}

#[cfg(test)]
#[path = "course_test.rs"]
mod tests;
