use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    errors::ReportError,
    report::model::{AttachmentKind, ResolvedAttachment},
};

use super::record::AttachmentRef;

const TEXT_PLAIN: &str = "text/plain";
const IMAGE_PNG: &str = "image/png";
const VIDEO_MP4: &str = "video/mp4";

/// Resolves attachment references against the results directory, inlining
/// text payloads and copying media next to the report.
#[derive(Debug, Clone)]
pub struct AttachmentResolver {
    results_dir: PathBuf,
    output_dir: PathBuf,
    max_inline_bytes: Option<u64>,
}

fn output_dir_for(report_path: &Path) -> PathBuf {
    let parent = report_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    match fs::create_dir_all(parent) {
        Ok(()) => parent.to_path_buf(),
        Err(err) => {
            warn!(
                output_dir = %parent.display(),
                error = %err,
                "could not create output directory, copying attachments to the current directory"
            );
            PathBuf::from(".")
        }
    }
}

fn check_relative(source: &str) -> Result<&Path, ReportError> {
    let path = Path::new(source);
    let escapes = path.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(ReportError::InvalidAttachment(format!(
            "attachment source '{}' must be relative to the results directory",
            source
        )));
    }
    Ok(path)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl AttachmentResolver {
    /// Creates the report's parent directory as a side effect; failure to do
    /// so falls back to the current directory.
    pub fn new(results_dir: &Path, report_path: &Path, max_inline_bytes: Option<u64>) -> Self {
        Self {
            results_dir: results_dir.to_path_buf(),
            output_dir: output_dir_for(report_path),
            max_inline_bytes,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn resolve(&self, attachment: &AttachmentRef) -> Result<ResolvedAttachment, ReportError> {
        let mut resolved = ResolvedAttachment {
            name: attachment.name.clone(),
            path: attachment.source.clone(),
            mime_type: attachment.mime_type.clone(),
            content: None,
            kind: AttachmentKind::Link,
        };

        match attachment.mime_type.as_deref() {
            Some(TEXT_PLAIN) => {
                let source = self.source_path(&attachment.source)?;
                match self.read_text(&source)? {
                    Some(content) => {
                        resolved.content = Some(content);
                        resolved.kind = AttachmentKind::Text;
                    }
                    // Linked text must sit next to the report like media does.
                    None => self.copy_to_output(&attachment.source)?,
                }
            }
            Some(IMAGE_PNG) => {
                self.copy_to_output(&attachment.source)?;
                resolved.kind = AttachmentKind::Image;
            }
            Some(VIDEO_MP4) => {
                self.copy_to_output(&attachment.source)?;
                resolved.kind = AttachmentKind::Video;
            }
            _ => {}
        }
        Ok(resolved)
    }

    fn source_path(&self, source: &str) -> Result<PathBuf, ReportError> {
        Ok(self.results_dir.join(check_relative(source)?))
    }

    fn read_text(&self, source: &Path) -> Result<Option<String>, ReportError> {
        let attachment_error = |err| ReportError::Attachment {
            path: source.to_path_buf(),
            source: err,
        };
        if let Some(limit) = self.max_inline_bytes {
            let size = fs::metadata(source).map_err(attachment_error)?.len();
            if size > limit {
                debug!(
                    attachment = %source.display(),
                    size,
                    limit,
                    "text attachment exceeds inline limit, copying and linking instead"
                );
                return Ok(None);
            }
        }
        fs::read_to_string(source)
            .map(Some)
            .map_err(attachment_error)
    }

    fn copy_to_output(&self, source: &str) -> Result<(), ReportError> {
        let relative = check_relative(source)?;
        let from = self.results_dir.join(relative);
        let to = self.output_dir.join(relative);

        if is_same_file(&from, &to) {
            return Ok(());
        }
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&from, &to).map_err(|err| ReportError::Attachment {
            path: from.clone(),
            source: err,
        })?;
        debug!(from = %from.display(), to = %to.display(), "copied attachment");
        Ok(())
    }
}
