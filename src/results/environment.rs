use std::{collections::BTreeMap, fs, path::Path};

use crate::errors::ReportError;

pub type Environment = BTreeMap<String, String>;

pub const ENVIRONMENT_FILE: &str = "environment.properties";

/// Parse `key=value` lines. Blank lines and `#` comments are skipped, the
/// first `=` splits key from value and later keys overwrite earlier ones.
pub fn parse_properties(content: &str) -> Environment {
    let mut properties = Environment::new();

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(equals_pos) = trimmed.find('=') {
            let key = trimmed[..equals_pos].trim().to_string();
            let value = trimmed[equals_pos + 1..].trim().to_string();
            properties.insert(key, value);
        }
    }

    properties
}

/// Read an environment file. A missing file yields an empty mapping.
pub fn read_environment(path: &Path) -> Result<Environment, ReportError> {
    if !path.exists() {
        return Ok(Environment::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(parse_properties(&content))
}
