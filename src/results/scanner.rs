use std::{fs, path::Path};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::errors::ReportError;

use super::{
    environment::{ENVIRONMENT_FILE, Environment, read_environment},
    record::{RawTestRecord, TestRecord},
};

#[derive(Debug, Default)]
pub struct ScanOutput {
    pub records: Vec<TestRecord>,
    pub environment: Environment,
}

fn is_result_file(file_name: &str) -> bool {
    file_name.ends_with(".json") && !file_name.starts_with("categories")
}

fn decode_record(path: &Path, file_name: &str) -> Result<Option<TestRecord>, ReportError> {
    let bytes = fs::read(path)?;
    let value: Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            debug!(file = file_name, error = %err, "skipping undecodable result file");
            return Ok(None);
        }
    };
    if !value.is_object() {
        debug!(file = file_name, "skipping result file that is not a JSON object");
        return Ok(None);
    }
    let raw = match RawTestRecord::deserialize(value) {
        Ok(raw) => raw,
        Err(err) => {
            debug!(file = file_name, error = %err, "skipping undecodable result file");
            return Ok(None);
        }
    };
    let record = raw.validate(file_name);
    if record.is_none() {
        debug!(file = file_name, "skipping result file without name or status");
    }
    Ok(record)
}

/// Collect the test records and environment of one results directory.
///
/// Only the immediate entries of `results_dir` are considered. Records come
/// back sorted by file name.
pub fn scan_results(results_dir: &Path) -> Result<ScanOutput, ReportError> {
    let environment = read_environment(&results_dir.join(ENVIRONMENT_FILE))?;

    let mut records = vec![];
    for entry in WalkDir::new(results_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        if !is_result_file(file_name) {
            continue;
        }
        if let Some(record) = decode_record(entry.path(), file_name)? {
            records.push(record);
        }
    }

    info!(
        results_dir = %results_dir.display(),
        records = records.len(),
        environment_entries = environment.len(),
        "scanned results directory"
    );
    Ok(ScanOutput {
        records,
        environment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::record::Status;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn selects_result_files_only() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a-result.json", r#"{"name": "a", "status": "passed"}"#);
        write(
            dir.path(),
            "categories.json",
            r#"{"name": "Product defects", "status": "failed"}"#,
        );
        write(
            dir.path(),
            "categories-extra.json",
            r#"{"name": "Test defects", "status": "broken"}"#,
        );
        write(dir.path(), "notes.txt", "not json");
        write(dir.path(), "b-attachment.json", r#"{"some": "payload"}"#);

        let output = scan_results(dir.path()).unwrap();

        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].name, "a");
        assert_eq!(output.records[0].file_name, "a-result.json");
    }

    #[test]
    fn malformed_json_does_not_stop_scanning() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a-result.json", "{ not json");
        write(dir.path(), "b-result.json", r#"{"name": "b", "status": "failed"}"#);
        write(dir.path(), "c-result.json", r#""just a string""#);
        write(dir.path(), "d-result.json", r#"[1, 2, 3]"#);

        let output = scan_results(dir.path()).unwrap();

        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].status, Status::Failed);
    }

    #[test]
    fn wrong_optional_field_types_keep_the_record() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "a-result.json",
            r#"{"name": "a", "status": "failed", "statusDetails": "oops"}"#,
        );
        write(
            dir.path(),
            "b-result.json",
            r#"{"name": "b", "status": "failed", "statusDetails": {"message": 42}}"#,
        );
        write(
            dir.path(),
            "c-result.json",
            r#"{"name": "c", "status": "passed", "labels": null}"#,
        );
        write(
            dir.path(),
            "d-result.json",
            r#"{"name": "d", "status": "broken", "attachments": null}"#,
        );
        write(
            dir.path(),
            "e-result.json",
            r#"{"name": "e", "status": "skipped", "steps": [{"name": null}]}"#,
        );
        write(dir.path(), "f-result.json", r#"{"name": "f", "status": true}"#);
        write(dir.path(), "g-result.json", r#"{"name": 12, "status": "passed"}"#);

        let output = scan_results(dir.path()).unwrap();

        let names: Vec<_> = output.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e", "f", "12"]);
        assert_eq!(output.records[5].status, Status::Unknown("true".to_string()));
        assert_eq!(output.records[4].steps.len(), 1);
    }

    #[test]
    fn does_not_descend_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("history");
        fs::create_dir(&nested).unwrap();
        write(&nested, "x-result.json", r#"{"name": "x", "status": "passed"}"#);
        write(dir.path(), "y-result.json", r#"{"name": "y", "status": "passed"}"#);

        let output = scan_results(dir.path()).unwrap();

        let names: Vec<_> = output.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["y"]);
    }

    #[test]
    fn records_sorted_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "c-result.json", r#"{"name": "third", "status": "passed"}"#);
        write(dir.path(), "a-result.json", r#"{"name": "first", "status": "passed"}"#);
        write(dir.path(), "b-result.json", r#"{"name": "second", "status": "passed"}"#);

        let output = scan_results(dir.path()).unwrap();

        let names: Vec<_> = output.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn reads_environment_properties() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ENVIRONMENT_FILE, "# header\nos = linux\n");

        let output = scan_results(dir.path()).unwrap();

        assert!(output.records.is_empty());
        assert_eq!(output.environment["os"], "linux");
    }
}
