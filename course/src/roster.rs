//! Roster search and masking.
//!
//! Student ids and emails are hidden from the public roster. Entering any
//! valid student id unlocks the whole roster for that viewer.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::Student;

pub const MASK: &str = "***";

/// One roster line as shown to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub name_zh: Option<String>,
    pub dept: Option<String>,
    pub program: Option<String>,
    pub email: Option<String>,
}

fn haystack(student: &Student) -> [String; 6] {
    let lower = |s: Option<&str>| s.unwrap_or_default().to_lowercase();
    [
        student.id.to_lowercase(),
        student.name.to_lowercase(),
        lower(student.name_zh.as_deref()),
        lower(student.email.as_deref()),
        lower(student.dept.as_deref()),
        lower(student.note.as_deref()),
    ]
}

/// Students matching a free-text query and an exact program label, sorted
/// by name. Empty filters match everyone.
#[must_use]
pub fn search<'a>(students: &'a [Student], query: &str, program: &str) -> Vec<&'a Student> {
    let query = query.trim().to_lowercase();
    let program = program.trim().to_lowercase();

    let mut matches: Vec<&Student> = students
        .iter()
        .filter(|s| {
            let hay = haystack(s);
            let text_ok = query.is_empty() || hay.iter().any(|x| x.contains(&query));
            let program_ok = program.is_empty() || hay.iter().any(|x| *x == program);
            text_ok && program_ok
        })
        .collect();
    matches.sort_by_key(|s| s.name.to_lowercase());
    matches
}

/// Whether `candidate` unlocks the roster: it must equal some student's id.
#[must_use]
pub fn unlock(students: &[Student], candidate: &str) -> bool {
    let candidate = candidate.trim();
    !candidate.is_empty() && students.iter().any(|s| s.id == candidate)
}

/// Project a student for display, masking identifying fields when locked.
#[must_use]
pub fn entry(student: &Student, unlocked: bool) -> RosterEntry {
    let mask = |value: Option<&str>| value.map(|v| if unlocked { v.to_owned() } else { MASK.to_owned() });
    RosterEntry {
        id: if unlocked || student.id.is_empty() { student.id.clone() } else { MASK.to_owned() },
        name: student.name.clone(),
        name_zh: student.name_zh.clone(),
        dept: student.dept.clone(),
        program: student.note.clone(),
        email: mask(student.email.as_deref()),
    }
}

/// Distinct program labels on the roster, sorted.
#[must_use]
pub fn programs(students: &[Student]) -> Vec<String> {
    students
        .iter()
        .filter_map(|s| s.note.as_deref())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
#[path = "roster_test.rs"]
mod tests;
