//! Course dataset model and derived views.
//!
//! This crate owns the static course dataset (syllabus, roster, attendance,
//! assignments, marks, homework, books, lecture notes) and every computation
//! the site derives from it. It is shared by the `server` crate, which
//! projects these views over HTTP, and has no I/O beyond loading the dataset
//! from JSON.

pub mod attendance;
pub mod coursework;
pub mod grades;
pub mod model;
pub mod overrides;
pub mod roster;
pub mod scale;

/// Bundled sample dataset, used when no dataset path is configured.
pub const SAMPLE_DATASET: &str = include_str!("../data/sample.json");

pub use grades::{GradeBreakdown, GradePolicy, GradeReport};
pub use model::{
    Assignment, AttendanceRecord, Book, Course, Dataset, DatasetError, HomeworkItem, Mark, Student,
    LectureNote, SyllabusWeek,
};
pub use overrides::Overrides;
pub use scale::GradeBand;
