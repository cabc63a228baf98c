use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Passed,
    Failed,
    Skipped,
    Broken,
    Unknown(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Passed => "passed",
            Status::Failed => "failed",
            Status::Skipped => "skipped",
            Status::Broken => "broken",
            Status::Unknown(other) => other.as_str(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failed | Status::Broken)
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match value.as_str() {
            "passed" => Status::Passed,
            "failed" => Status::Failed,
            "skipped" => Status::Skipped,
            "broken" => Status::Broken,
            _ => Status::Unknown(value),
        }
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        value.as_str().to_string()
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decode a field, falling back to its default when the JSON value has the
/// wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Decode a list element by element. A non-array value becomes an empty
/// list and elements that do not decode are dropped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Text form of a JSON value for fields that only need to be present.
/// Null, `false`, zero and empty containers count as absent; other
/// non-string values keep their JSON text.
fn present_text(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) => Some(text),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(present_text(Value::deserialize(deserializer)?))
}

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<Status>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(present_text(Value::deserialize(deserializer)?).map(Status::from))
}

fn attachment_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(name) => name,
        _ => default_attachment_name(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub trace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRef {
    #[serde(
        default = "default_attachment_name",
        deserialize_with = "attachment_name"
    )]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub mime_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub source: String,
}

fn default_attachment_name() -> String {
    "Attachment".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub value: String,
}

/// Only the first level of steps is kept; nested `steps` are not decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub attachments: Vec<AttachmentRef>,
}

/// One Allure `*-result.json` document as found on disk. Every field is
/// optional here; [`RawTestRecord::validate`] enforces the required ones.
/// A field of the wrong JSON type reads as absent instead of failing the
/// whole document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTestRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "lenient")]
    pub status_details: Option<StatusDetails>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub attachments: Vec<AttachmentRef>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub labels: Vec<Label>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub steps: Vec<Step>,
}

/// A record that carries a non-empty name and status.
#[derive(Debug, Clone, PartialEq)]
pub struct TestRecord {
    pub file_name: String,
    pub name: String,
    pub full_name: Option<String>,
    pub status: Status,
    pub status_details: Option<StatusDetails>,
    pub attachments: Vec<AttachmentRef>,
    pub labels: Vec<Label>,
    pub steps: Vec<Step>,
}

impl RawTestRecord {
    pub fn validate(self, file_name: &str) -> Option<TestRecord> {
        let name = self.name.filter(|name| !name.is_empty())?;
        let status = self.status.filter(|status| !status.as_str().is_empty())?;
        Some(TestRecord {
            file_name: file_name.to_string(),
            name,
            full_name: self.full_name,
            status,
            status_details: self.status_details,
            attachments: self.attachments,
            labels: self.labels,
            steps: self.steps,
        })
    }
}
