use std::{fs, io::Write, path::Path};

use tempfile::NamedTempFile;

use crate::errors::ReportError;

/// Write `content` to `path` through a temporary sibling file so the target
/// is either fully written or untouched.
pub fn write_report(path: &Path, content: &str) -> Result<(), ReportError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(parent)?;

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    file.persist(path)?;
    Ok(())
}
