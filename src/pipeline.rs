use std::path::PathBuf;

use tracing::info;

use crate::{
    errors::ReportError,
    report::{
        model::{ReportDocument, Summary},
        renderer::Renderer,
        writer::write_report,
    },
    results::{aggregator::aggregate, attachment::AttachmentResolver, scanner::scan_results},
};

pub const DEFAULT_RESULTS_DIR: &str = "allure-results";
pub const DEFAULT_OUTPUT: &str = "allure_report.md";
pub const DEFAULT_TITLE: &str = "Allure Markdown Report";
pub const DEFAULT_DESCRIPTION: &str = "This is a markdown report generated from Allure metadata";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub results_dir: PathBuf,
    pub output: PathBuf,
    pub title: String,
    pub description: String,
    pub custom_content: String,
    pub max_inline_bytes: Option<u64>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            custom_content: String::new(),
            max_inline_bytes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { output: PathBuf, summary: Summary },
    Warning(String),
}

/// Scan, aggregate, render and write one report.
///
/// Nothing is written when the results directory is missing or holds no
/// usable records; those cases come back as [`Outcome::Warning`].
pub fn generate_report(
    options: &ReportOptions,
    renderer: &dyn Renderer,
) -> Result<Outcome, ReportError> {
    if !options.results_dir.is_dir() {
        return Ok(Outcome::Warning(format!(
            "Results directory '{}' not found.",
            options.results_dir.display()
        )));
    }

    let scan = scan_results(&options.results_dir)?;
    if scan.records.is_empty() {
        return Ok(Outcome::Warning(format!(
            "No test results found in '{}'.",
            options.results_dir.display()
        )));
    }

    let resolver = AttachmentResolver::new(
        &options.results_dir,
        &options.output,
        options.max_inline_bytes,
    );
    let aggregation = aggregate(&scan.records, &resolver)?;

    let document = ReportDocument {
        title: options.title.clone(),
        description: options.description.clone(),
        custom_content: options.custom_content.clone(),
        environment: scan.environment,
        summary: aggregation.summary,
        fail_details: aggregation.fail_details,
    };
    let content = renderer.render(&document)?;
    write_report(&options.output, &content)?;

    info!(
        output = %options.output.display(),
        renderer = %renderer.name(),
        failures = document.fail_details.len(),
        "report written"
    );
    Ok(Outcome::Success {
        output: options.output.clone(),
        summary: document.summary,
    })
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::*;
    use crate::report::renderer::{JsonRenderer, MarkdownRenderer};
    use pretty_assertions::assert_eq;

    fn options(root: &Path) -> ReportOptions {
        ReportOptions {
            results_dir: root.join("allure-results"),
            output: root.join("out").join("report.md"),
            ..ReportOptions::default()
        }
    }

    fn write(dir: &Path, name: &str, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn missing_results_dir_is_warning() {
        let root = tempfile::tempdir().unwrap();
        let options = options(root.path());

        let outcome = generate_report(&options, &MarkdownRenderer).unwrap();

        assert!(matches!(outcome, Outcome::Warning(_)));
        assert!(!options.output.exists());
    }

    #[test]
    fn no_usable_records_is_warning() {
        let root = tempfile::tempdir().unwrap();
        let options = options(root.path());
        write(&options.results_dir, "a-result.json", "{ broken");
        write(&options.results_dir, "categories.json", "[]");

        let outcome = generate_report(&options, &MarkdownRenderer).unwrap();

        assert_eq!(
            outcome,
            Outcome::Warning(format!(
                "No test results found in '{}'.",
                options.results_dir.display()
            ))
        );
        assert!(!options.output.exists());
    }

    #[test]
    fn writes_report_with_copied_media() {
        let root = tempfile::tempdir().unwrap();
        let options = options(root.path());
        write(
            &options.results_dir,
            "a-result.json",
            r#"{"name": "test_ok", "status": "passed"}"#,
        );
        write(
            &options.results_dir,
            "b-result.json",
            r#"{
                "name": "test_checkout",
                "fullName": "shop.test_checkout",
                "status": "failed",
                "statusDetails": {"message": "timeout"},
                "attachments": [
                    {"name": "log", "type": "text/plain", "source": "b-log.txt"},
                    {"name": "screen", "type": "image/png", "source": "b-shot.png"}
                ]
            }"#,
        );
        write(&options.results_dir, "b-log.txt", "boom");
        write(&options.results_dir, "b-shot.png", "png");
        write(&options.results_dir, "environment.properties", "os=linux");

        let outcome = generate_report(&options, &MarkdownRenderer).unwrap();

        let Outcome::Success { output, summary } = outcome else {
            panic!("expected success");
        };
        assert_eq!(output, options.output);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.failed, 1);
        let markdown = fs::read_to_string(&output).unwrap();
        assert!(markdown.contains("### ❌ test_checkout"));
        assert!(markdown.contains("boom"));
        assert!(markdown.contains("| os | linux |"));
        assert!(root.path().join("out").join("b-shot.png").exists());
    }

    #[test]
    fn rerun_is_byte_identical() {
        let root = tempfile::tempdir().unwrap();
        let options = options(root.path());
        write(
            &options.results_dir,
            "a-result.json",
            r#"{"name": "t", "status": "broken", "attachments": [{"type": "image/png", "source": "s.png"}]}"#,
        );
        write(&options.results_dir, "s.png", "png");

        generate_report(&options, &MarkdownRenderer).unwrap();
        let first = fs::read(&options.output).unwrap();
        generate_report(&options, &MarkdownRenderer).unwrap();
        let second = fs::read(&options.output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn missing_attachment_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let options = options(root.path());
        write(
            &options.results_dir,
            "a-result.json",
            r#"{"name": "t", "status": "failed", "attachments": [{"type": "text/plain", "source": "gone.txt"}]}"#,
        );

        let result = generate_report(&options, &MarkdownRenderer);

        assert!(matches!(result, Err(ReportError::Attachment { .. })));
        assert!(!options.output.exists());
    }

    #[test]
    fn json_renderer_output() {
        let root = tempfile::tempdir().unwrap();
        let mut options = options(root.path());
        options.output = root.path().join("report.json");
        write(
            &options.results_dir,
            "a-result.json",
            r#"{"name": "t", "status": "skipped"}"#,
        );

        generate_report(&options, &JsonRenderer).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&options.output).unwrap()).unwrap();
        assert_eq!(value["summary"]["skipped"], 1);
        assert_eq!(value["title"], DEFAULT_TITLE);
    }
}
