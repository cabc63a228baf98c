use std::fmt::Write;

use itertools::Itertools;

use crate::{
    errors::ReportError,
    results::record::Status,
};

use super::model::{
    AttachmentKind, FailureDetail, ReportDocument, ResolvedAttachment, StepDetail,
};

/// Turns a finished document into the report text.
pub trait Renderer {
    fn render(&self, document: &ReportDocument) -> Result<String, ReportError>;
    fn name(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, document: &ReportDocument) -> Result<String, ReportError> {
        let mut json = serde_json::to_string_pretty(document)?;
        json.push('\n');
        Ok(json)
    }

    fn name(&self) -> String {
        "json".to_string()
    }
}

/// A fence one backtick longer than the longest backtick run in `content`.
fn fence_for(content: &str) -> String {
    let longest = content
        .split(|ch: char| ch != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

fn code_block(out: &mut String, content: &str) -> std::fmt::Result {
    let fence = fence_for(content);
    writeln!(out, "{}", fence)?;
    writeln!(out, "{}", content.trim_end_matches('\n'))?;
    writeln!(out, "{}", fence)?;
    writeln!(out)
}

fn code_span(content: &str) -> String {
    if content.contains('`') {
        format!("`` {} ``", content)
    } else {
        format!("`{}`", content)
    }
}

fn table_cell(content: &str) -> String {
    content.replace('|', "\\|").replace('\n', "<br>")
}

fn table(out: &mut String, headers: &[&str], rows: &[Vec<String>]) -> std::fmt::Result {
    writeln!(out, "| {} |", headers.iter().join(" | "))?;
    writeln!(out, "| {} |", headers.iter().map(|_| "---").join(" | "))?;
    for row in rows {
        writeln!(out, "| {} |", row.iter().map(|cell| table_cell(cell)).join(" | "))?;
    }
    writeln!(out)
}

fn step_icon(status: Option<&Status>) -> &'static str {
    match status {
        Some(Status::Passed) => "✅",
        Some(Status::Failed) | Some(Status::Broken) => "❌",
        Some(Status::Skipped) => "⏭️",
        _ => "•",
    }
}

impl MarkdownRenderer {
    fn summary(&self, out: &mut String, document: &ReportDocument) -> std::fmt::Result {
        let summary = &document.summary;
        writeln!(out, "## Summary")?;
        writeln!(out)?;
        table(
            out,
            &["Total", "Passed", "Failed", "Broken", "Skipped"],
            &[vec![
                summary.total.to_string(),
                summary.passed.to_string(),
                summary.failed.to_string(),
                summary.broken.to_string(),
                summary.skipped.to_string(),
            ]],
        )?;
        let unclassified = summary.unclassified();
        if unclassified > 0 {
            writeln!(
                out,
                "_{} test(s) reported an unrecognized status._",
                unclassified
            )?;
            writeln!(out)?;
        }
        Ok(())
    }

    fn attachment(&self, out: &mut String, attachment: &ResolvedAttachment) -> std::fmt::Result {
        match (attachment.kind, attachment.content.as_deref()) {
            (AttachmentKind::Text, Some(content)) => {
                writeln!(out, "**{}**", attachment.name)?;
                writeln!(out)?;
                code_block(out, content)
            }
            (AttachmentKind::Image, _) => {
                writeln!(out, "![{}]({})", attachment.name, attachment.path)?;
                writeln!(out)
            }
            (AttachmentKind::Video, _) => {
                writeln!(out, "**{}**", attachment.name)?;
                writeln!(out)?;
                writeln!(out, "<video controls width=\"640\">")?;
                writeln!(
                    out,
                    "  <source src=\"{}\" type=\"video/mp4\">",
                    attachment.path
                )?;
                writeln!(out, "</video>")?;
                writeln!(out)
            }
            _ => {
                writeln!(out, "- [{}]({})", attachment.name, attachment.path)?;
                writeln!(out)
            }
        }
    }

    fn steps(&self, out: &mut String, steps: &[StepDetail]) -> std::fmt::Result {
        writeln!(out, "#### Steps")?;
        writeln!(out)?;
        writeln!(out, "<details>")?;
        writeln!(out, "<summary><strong>Steps Details</strong></summary>")?;
        writeln!(out)?;
        for step in steps {
            match step.status.as_ref() {
                Some(status) => writeln!(
                    out,
                    "- {} {} ({})",
                    step_icon(Some(status)),
                    step.name,
                    status
                )?,
                None => writeln!(out, "- {} {}", step_icon(None), step.name)?,
            }
        }
        writeln!(out)?;
        writeln!(out, "</details>")?;
        writeln!(out)?;

        for step in steps.iter().filter(|step| !step.attachments.is_empty()) {
            writeln!(out, "##### Step: {}", step.name)?;
            writeln!(out)?;
            for attachment in &step.attachments {
                self.attachment(out, attachment)?;
            }
        }
        Ok(())
    }

    fn failure(&self, out: &mut String, detail: &FailureDetail) -> std::fmt::Result {
        writeln!(out, "### ❌ {}", detail.name)?;
        writeln!(out)?;
        if !detail.nodeid.is_empty() {
            writeln!(out, "- **Node ID:** {}", code_span(&detail.nodeid))?;
        }
        writeln!(out, "- **Status:** {}", detail.status)?;
        writeln!(out)?;

        if !detail.error_message.is_empty() {
            writeln!(out, "#### Error Message")?;
            writeln!(out)?;
            code_block(out, &detail.error_message)?;
        }
        if !detail.traceback.is_empty() {
            writeln!(out, "#### Traceback")?;
            writeln!(out)?;
            code_block(out, &detail.traceback)?;
        }

        if !detail.attachments.is_empty() {
            writeln!(out, "#### Attachments")?;
            writeln!(out)?;
            for attachment in &detail.attachments {
                self.attachment(out, attachment)?;
            }
        }

        if !detail.steps.is_empty() {
            self.steps(out, &detail.steps)?;
        }

        if !detail.labels.is_empty() {
            writeln!(out, "#### Labels")?;
            writeln!(out)?;
            writeln!(out, "<details>")?;
            writeln!(out, "<summary><strong>Labels Details</strong></summary>")?;
            writeln!(out)?;
            for label in &detail.labels {
                writeln!(out, "- {}: {}", label.name, label.value)?;
            }
            writeln!(out)?;
            writeln!(out, "</details>")?;
            writeln!(out)?;
        }
        Ok(())
    }

    fn write_document(&self, out: &mut String, document: &ReportDocument) -> std::fmt::Result {
        writeln!(out, "# {}", document.title)?;
        writeln!(out)?;

        if !document.custom_content.is_empty() {
            writeln!(out, "{}", document.custom_content.trim_end())?;
            writeln!(out)?;
        }

        writeln!(out, "## Description")?;
        writeln!(out)?;
        writeln!(out, "{}", document.description)?;
        writeln!(out)?;

        if !document.environment.is_empty() {
            writeln!(out, "## Environment")?;
            writeln!(out)?;
            let rows = document
                .environment
                .iter()
                .map(|(key, value)| vec![key.clone(), value.clone()])
                .collect::<Vec<_>>();
            table(out, &["Key", "Value"], &rows)?;
        }

        self.summary(out, document)?;

        writeln!(out, "## Failed Tests")?;
        writeln!(out)?;
        if document.fail_details.is_empty() {
            writeln!(out, "All tests passed. ✅")?;
            return Ok(());
        }
        for detail in &document.fail_details {
            self.failure(out, detail)?;
        }
        Ok(())
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, document: &ReportDocument) -> Result<String, ReportError> {
        let mut out = String::new();
        self.write_document(&mut out, document)?;
        Ok(out)
    }

    fn name(&self) -> String {
        "markdown".to_string()
    }
}
