//! Partial dataset overrides.
//!
//! DESIGN
//! ======
//! An override document replaces slices of the published dataset without
//! touching it. The course object is merged shallowly (override keys win);
//! roster, assignments, marks, homework, and books are replaced wholesale.
//! Attendance is the only merged list: rows are keyed by
//! `date|student|status|notes`, an override row replaces a base row with the
//! same key in place, and new keys are appended. There is no conflict
//! resolution beyond that.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{
    Assignment, AttendanceRecord, Book, Course, Dataset, DatasetError, HomeworkItem, Mark, Student,
    fill_missing_ids,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students: Option<Vec<Student>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignments: Option<Vec<Assignment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Mark>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homework: Option<Vec<HomeworkItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<Book>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<Vec<AttendanceRecord>>,
}

impl Overrides {
    /// Parse an override document. An empty document means no overrides.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Json`] if the document is malformed.
    pub fn from_json_str(raw: &str) -> Result<Self, DatasetError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Build a new dataset with these overrides applied to `base`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Json`] if the merged course object no longer
    /// has a valid shape (e.g. an override sets `credits` to a string).
    pub fn apply(&self, base: &Dataset) -> Result<Dataset, DatasetError> {
        let mut merged = base.clone();

        if let Some(patch) = &self.course {
            merged.course = merge_course(&base.course, patch)?;
        }
        if let Some(students) = &self.students {
            merged.students.clone_from(students);
            fill_missing_ids(&mut merged.students);
        }
        if let Some(assignments) = &self.assignments {
            merged.assignments.clone_from(assignments);
        }
        if let Some(marks) = &self.marks {
            merged.marks.clone_from(marks);
        }
        if let Some(homework) = &self.homework {
            merged.homework.clone_from(homework);
        }
        if let Some(books) = &self.books {
            merged.books.clone_from(books);
        }
        if let Some(extra) = &self.attendance {
            merged.attendance = merge_attendance(&base.attendance, extra);
        }

        Ok(merged)
    }
}

fn merge_course(base: &Course, patch: &Map<String, Value>) -> Result<Course, DatasetError> {
    let mut object = match serde_json::to_value(base)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in patch {
        object.insert(key.clone(), value.clone());
    }
    Ok(serde_json::from_value(Value::Object(object))?)
}

fn attendance_key(record: &AttendanceRecord) -> String {
    format!(
        "{}|{}|{}|{}",
        record.date,
        record.student,
        record.status,
        record.notes.as_deref().unwrap_or_default()
    )
}

fn merge_attendance(base: &[AttendanceRecord], extra: &[AttendanceRecord]) -> Vec<AttendanceRecord> {
    let mut merged: Vec<AttendanceRecord> = Vec::with_capacity(base.len() + extra.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in base.iter().chain(extra) {
        let key = attendance_key(record);
        if let Some(&slot) = index.get(&key) {
            merged[slot] = record.clone();
        } else {
            index.insert(key, merged.len());
            merged.push(record.clone());
        }
    }
    merged
}

#[cfg(test)]
#[path = "overrides_test.rs"]
mod tests;
