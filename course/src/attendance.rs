//! Per-student attendance summaries.
//!
//! The percentage is `Present` rows over distinct session dates. Rows are
//! not deduplicated, so a repeated `Present` row for one date counts twice.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{AttendanceRecord, Dataset};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceTally {
    pub present: usize,
    pub sessions: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRow {
    pub date: String,
    pub status: String,
    pub notes: Option<String>,
    /// Notes starting with the word "late" are highlighted by the site.
    pub late_note: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub student_id: String,
    pub month: Option<String>,
    pub overall: AttendanceTally,
    /// Figures for the selected month; equal to `overall` without a filter.
    pub filtered: AttendanceTally,
    /// Rows in the selected month, newest first.
    pub rows: Vec<AttendanceRow>,
}

fn tally<'a, I>(rows: I) -> AttendanceTally
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut dates = BTreeSet::new();
    let mut present = 0;
    for row in rows {
        dates.insert(row.date.as_str());
        if row.is_present() {
            present += 1;
        }
    }
    let sessions = dates.len();
    let percent = if sessions == 0 {
        0
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let pct = ((present as f64 / sessions as f64) * 100.0).round() as u32;
        pct
    };
    AttendanceTally { present, sessions, percent }
}

fn starts_with_late(notes: &str) -> bool {
    let trimmed = notes.trim_start();
    let Some(head) = trimmed.get(..4) else {
        return false;
    };
    head.eq_ignore_ascii_case("late")
        && !trimmed[4..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Summarize a student's attendance, optionally narrowed to a `YYYY-MM`
/// month. `None` when the id is not on the roster.
#[must_use]
pub fn summarize(dataset: &Dataset, student_id: &str, month: Option<&str>) -> Option<AttendanceSummary> {
    let student = dataset.student(student_id)?;
    let all: Vec<&AttendanceRecord> = dataset.attendance_for(student).collect();
    let month = month.map(str::trim).filter(|m| !m.is_empty());

    let mut selected: Vec<&AttendanceRecord> = match month {
        Some(prefix) => all
            .iter()
            .copied()
            .filter(|r| r.date.starts_with(prefix))
            .collect(),
        None => all.clone(),
    };
    selected.sort_by(|a, b| b.date.cmp(&a.date));

    let rows = selected
        .iter()
        .map(|r| AttendanceRow {
            date: r.date.clone(),
            status: r.status.clone(),
            notes: r.notes.clone().filter(|n| !n.is_empty()),
            late_note: r.notes.as_deref().is_some_and(starts_with_late),
        })
        .collect();

    Some(AttendanceSummary {
        student_id: student.id.clone(),
        month: month.map(str::to_owned),
        overall: tally(all.iter().copied()),
        filtered: tally(selected.iter().copied()),
        rows,
    })
}

#[cfg(test)]
#[path = "attendance_test.rs"]
mod tests;
