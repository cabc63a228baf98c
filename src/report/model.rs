use serde::Serialize;

use crate::results::{
    environment::Environment,
    record::{Label, Status},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub broken: usize,
}

impl Summary {
    /// Records whose status is none of the four named ones.
    pub fn unclassified(&self) -> usize {
        self.total
            .saturating_sub(self.passed + self.failed + self.skipped + self.broken)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Text,
    Image,
    Video,
    Link,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAttachment {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub kind: AttachmentKind,
}

/// A first-level step with its attachments resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepDetail {
    pub name: String,
    pub status: Option<Status>,
    pub attachments: Vec<ResolvedAttachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureDetail {
    pub name: String,
    pub nodeid: String,
    pub status: Status,
    pub error_message: String,
    pub traceback: String,
    pub attachments: Vec<ResolvedAttachment>,
    pub labels: Vec<Label>,
    pub steps: Vec<StepDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub description: String,
    pub custom_content: String,
    pub environment: Environment,
    pub summary: Summary,
    pub fail_details: Vec<FailureDetail>,
}
