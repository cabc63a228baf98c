use std::{fmt::Display, path::PathBuf};

#[derive(Debug)]
pub enum ReportError {
    IoError(std::io::Error),
    Json(serde_json::Error),
    Walk(walkdir::Error),
    Attachment {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidAttachment(String),
    InvalidArgument(String),
    Config(String),
    Render(String),
    Persist(tempfile::PersistError),
}

impl std::error::Error for ReportError {}

impl Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::IoError(io_error) => write!(f, "{}", io_error),
            ReportError::Json(error) => write!(f, "{}", error),
            ReportError::Walk(error) => write!(f, "{}", error),
            ReportError::Attachment { path, source } => {
                write!(f, "attachment '{}' could not be read: {}", path.display(), source)
            }
            ReportError::InvalidAttachment(error) => write!(f, "{}", error),
            ReportError::InvalidArgument(error) => write!(f, "{}", error),
            ReportError::Config(error) => write!(f, "{}", error),
            ReportError::Render(error) => write!(f, "{}", error),
            ReportError::Persist(error) => write!(f, "{}", error),
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<walkdir::Error> for ReportError {
    fn from(value: walkdir::Error) -> Self {
        Self::Walk(value)
    }
}

impl From<tempfile::PersistError> for ReportError {
    fn from(value: tempfile::PersistError) -> Self {
        Self::Persist(value)
    }
}

impl From<std::fmt::Error> for ReportError {
    fn from(value: std::fmt::Error) -> Self {
        Self::Render(value.to_string())
    }
}
