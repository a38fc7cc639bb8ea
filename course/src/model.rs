//! Dataset records.
//!
//! DESIGN
//! ======
//! Records are flat and denormalized, mirroring the JSON document the site is
//! published from. Nothing enforces referential integrity: a mark or an
//! attendance row may name a student by id or by display name, and duplicate
//! rows are kept as-is. Arrays missing from the document default to empty.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::scale::GradeBand;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// COURSE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instructor {
    pub name_zh: Option<String>,
    pub name_en: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeachingAssistant {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Capacity {
    pub total: u32,
    pub outside_dept_limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvaluationItem {
    pub item: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyllabusWeek {
    pub week: u32,
    pub date: String,
    pub topic: String,
}

/// Static descriptive course fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    pub title_en: String,
    pub title_zh: Option<String>,
    pub semester: Option<String>,
    pub code: Option<String>,
    pub class_code: Option<String>,
    pub institute: Option<String>,
    pub instructor: Instructor,
    pub tas: Vec<TeachingAssistant>,
    pub credits: Option<f64>,
    pub year_span: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub language: Option<String>,
    pub numbers: BTreeMap<String, String>,
    pub capacity: Capacity,
    pub description: Option<String>,
    pub goals: Option<String>,
    pub prerequisites: Option<String>,
    pub office_hours: Option<String>,
    pub evaluation: Vec<EvaluationItem>,
    pub grading_note: Option<String>,
    pub grading_scale: Vec<GradeBand>,
    pub policies: Vec<String>,
    #[serde(deserialize_with = "textbook_list")]
    pub textbooks: Vec<Book>,
    pub references: Vec<Book>,
    pub syllabus: Vec<SyllabusWeek>,
}

// =============================================================================
// ROSTER AND RECORDS
// =============================================================================

/// A roster entry. Documents may list a student as a bare name string, omit
/// the id, or carry the program label under `program` instead of `note`;
/// all of these load into the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StudentEntry")]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_zh: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dept: Option<String>,
    /// Program label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StudentEntry {
    Name(String),
    Record(StudentRecord),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    name_zh: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    dept: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    program: Option<String>,
}

impl From<StudentEntry> for Student {
    fn from(entry: StudentEntry) -> Self {
        match entry {
            StudentEntry::Name(name) => Self { id: slugify(&name), name, ..Self::default() },
            StudentEntry::Record(r) => {
                let name = r.name.unwrap_or_default();
                let id = r
                    .id
                    .map(|id| id.trim().to_owned())
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| slugify(&name));
                let note = r.note.filter(|n| !n.is_empty()).or(r.program);
                Self { id, name, name_zh: r.name_zh, email: r.email, dept: r.dept, note }
            }
        }
    }
}

/// Lower-case ASCII slug: runs of anything other than `a-z0-9` collapse to a
/// single `-`, trimmed at both ends.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Give every student still lacking an id a positional one (`student-3`).
pub(crate) fn fill_missing_ids(students: &mut [Student]) {
    for (idx, student) in students.iter_mut().enumerate() {
        if student.id.is_empty() {
            student.id = format!("student-{}", idx + 1);
        }
    }
}

impl Student {
    /// Whether a record's `student` field refers to this student. Records
    /// normally carry the id but older rows use the display name.
    #[must_use]
    pub fn is_referenced_by(&self, reference: &str) -> bool {
        reference == self.id || reference == self.name || self.name_zh.as_deref() == Some(reference)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub date: String,
    pub student: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AttendanceRecord {
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.status == "Present"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default)]
    pub max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    pub assignment_id: String,
    pub student: String,
    pub marks: f64,
    #[serde(default)]
    pub max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeworkItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default)]
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A lecture-notes file. The file itself is only handed out to a caller who
/// supplies a roster id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LectureNote {
    pub id: String,
    pub title: String,
    pub date: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "type", default = "default_book_kind")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "authors_list")]
    pub authors: Vec<String>,
    #[serde(default, alias = "url", skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

fn default_book_kind() -> String {
    "Reference".to_owned()
}

/// Textbooks default to the `Textbook` type rather than `Reference`.
fn textbook_list<'de, D>(deserializer: D) -> Result<Vec<Book>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Textbook {
        #[serde(rename = "type")]
        kind: Option<String>,
        #[serde(flatten)]
        book: Book,
    }

    let entries = Vec::<Textbook>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|t| Book { kind: t.kind.unwrap_or_else(|| "Textbook".to_owned()), ..t.book })
        .collect())
}

/// Authors appear either as one comma-separated string or as a list.
fn authors_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Authors {
        One(String),
        Many(Vec<String>),
        Missing(Option<()>),
    }

    let authors = match Authors::deserialize(deserializer)? {
        Authors::One(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        Authors::Many(list) => list,
        Authors::Missing(_) => Vec::new(),
    };
    Ok(authors)
}

// =============================================================================
// DATASET
// =============================================================================

/// The whole site dataset, loaded wholesale into memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dataset {
    pub course: Course,
    pub students: Vec<Student>,
    pub attendance: Vec<AttendanceRecord>,
    pub assignments: Vec<Assignment>,
    pub marks: Vec<Mark>,
    pub homework: Vec<HomeworkItem>,
    pub books: Vec<Book>,
    pub notes: Vec<LectureNote>,
}

impl Dataset {
    /// Parse a dataset document.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Json`] if the document is not valid JSON or a
    /// record has the wrong shape.
    pub fn from_json_str(raw: &str) -> Result<Self, DatasetError> {
        let mut dataset: Self = serde_json::from_str(raw)?;
        fill_missing_ids(&mut dataset.students);
        Ok(dataset)
    }

    /// Read and parse a dataset document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the file cannot be read, or
    /// [`DatasetError::Json`] if it cannot be parsed.
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    #[must_use]
    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn assignment(&self, id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == id)
    }

    /// Marks recorded against `student`, matched by id or display name.
    pub fn marks_for<'a>(&'a self, student: &'a Student) -> impl Iterator<Item = &'a Mark> + 'a {
        self.marks
            .iter()
            .filter(move |m| student.is_referenced_by(&m.student))
    }

    /// Attendance rows recorded against `student`, matched by id or display name.
    pub fn attendance_for<'a>(&'a self, student: &'a Student) -> impl Iterator<Item = &'a AttendanceRecord> + 'a {
        self.attendance
            .iter()
            .filter(move |r| student.is_referenced_by(&r.student))
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
