use std::path::PathBuf;

use super::*;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("course-site-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).expect("write temp file");
    path
}

fn config_with(data: Option<PathBuf>, overrides: Option<PathBuf>) -> ServerConfig {
    let mut config = ServerConfig::from_lookup(|_| None).expect("default config");
    config.course_data_path = data;
    config.course_overrides_path = overrides;
    config
}

#[test]
fn load_defaults_to_bundled_sample() {
    let dataset = load(&config_with(None, None)).unwrap();
    assert_eq!(dataset.students.len(), 4);
    assert_eq!(dataset.course.code.as_deref(), Some("Phys8067"));
}

#[test]
fn load_applies_overrides_file() {
    let overrides = temp_file(
        "overrides.json",
        r#"{"course":{"code":"Phys9999"},"students":[{"id":"S9","name":"Solo"}]}"#,
    );
    let dataset = load(&config_with(None, Some(overrides.clone()))).unwrap();
    std::fs::remove_file(overrides).ok();

    assert_eq!(dataset.course.code.as_deref(), Some("Phys9999"));
    assert_eq!(dataset.students.len(), 1);
    assert_eq!(dataset.students[0].id, "S9");
}

#[test]
fn load_reports_missing_data_file() {
    let missing = std::env::temp_dir().join("course-site-definitely-missing.json");
    let err = load(&config_with(Some(missing), None)).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}
