//! Startup loading of the course dataset.
//!
//! The dataset comes from `COURSE_DATA_PATH` when set, otherwise from the
//! sample bundled with the `course` crate. An overrides file at
//! `COURSE_OVERRIDES_PATH`, if configured, is layered on top.

use course::{Dataset, DatasetError, Overrides};
use tracing::info;

use crate::config::ServerConfig;

/// Load the base dataset and apply any configured overrides.
///
/// # Errors
///
/// Returns a [`DatasetError`] if either file cannot be read or parsed.
pub fn load(config: &ServerConfig) -> Result<Dataset, DatasetError> {
    let base = match config.course_data_path.as_deref() {
        Some(path) => Dataset::from_path(path)?,
        None => Dataset::from_json_str(course::SAMPLE_DATASET)?,
    };

    let dataset = match config.course_overrides_path.as_deref() {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|source| DatasetError::Io { path: path.display().to_string(), source })?;
            let overrides = Overrides::from_json_str(&raw)?;
            if overrides.is_empty() {
                base
            } else {
                info!(path = %path.display(), "applying course overrides");
                overrides.apply(&base)?
            }
        }
        None => base,
    };

    info!(
        course = dataset.course.code.as_deref().unwrap_or(""),
        students = dataset.students.len(),
        assignments = dataset.assignments.len(),
        marks = dataset.marks.len(),
        attendance = dataset.attendance.len(),
        "course dataset loaded"
    );
    Ok(dataset)
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;
