use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::ValueEnum;
use home::home_dir;
use tracing::debug;

use crate::{errors::ReportError, results::environment::parse_properties};

const SETTINGS_DIR: &str = ".allure-md";
const SETTINGS_FILE: &str = "config";

pub const DEFAULT_SETTINGS: &str = r#"# ==========================
# The config file consists of simple key-value pairs,
# separated by equals signs. Command line flags take precedence.

# Available settings
# results_dir=allure-results
# output=allure_report.md
# title=Allure Markdown Report
# description=This is a markdown report generated from Allure metadata
# custom_content=
# format=markdown | json
# max_inline_bytes=65536
"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(ReportError::Config(format!(
                "Unknown report format '{}', expected markdown or json",
                other
            ))),
        }
    }
}

/// Values read from the settings file. Unset keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub results_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub custom_content: Option<String>,
    pub format: Option<ReportFormat>,
    pub max_inline_bytes: Option<u64>,
}

pub fn default_settings_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

fn parse_settings(content: &str) -> Result<Settings, ReportError> {
    let mut settings = Settings::default();
    for (key, value) in parse_properties(content) {
        match key.as_str() {
            "results_dir" => settings.results_dir = Some(PathBuf::from(value)),
            "output" => settings.output = Some(PathBuf::from(value)),
            "title" => settings.title = Some(value),
            "description" => settings.description = Some(value),
            "custom_content" => settings.custom_content = Some(value),
            "format" => settings.format = Some(value.parse()?),
            "max_inline_bytes" => {
                let limit = value.parse::<u64>().map_err(|err| {
                    ReportError::Config(format!("Invalid max_inline_bytes '{}': {}", value, err))
                })?;
                settings.max_inline_bytes = Some(limit);
            }
            _ => debug!(key = %key, "ignoring unknown setting"),
        }
    }
    Ok(settings)
}

/// Write the commented settings template unless a file already exists.
pub fn init_settings(path: &Path) -> Result<bool, ReportError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_SETTINGS)?;
    Ok(true)
}

/// Load settings from `path`, or from `~/.allure-md/config` when no path is
/// given. An explicit path must exist; the default location is optional.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ReportError> {
    let location = match path {
        Some(path) => {
            if !path.exists() {
                return Err(ReportError::Config(format!(
                    "Settings file '{}' not found",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_settings_path() {
            Some(location) if location.exists() => location,
            _ => return Ok(Settings::default()),
        },
    };
    debug!(settings = %location.display(), "loading settings");
    parse_settings(&fs::read_to_string(location)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_settings() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "# Comment line").unwrap();
        writeln!(temp_file, "results_dir = build/allure-results").unwrap();
        writeln!(temp_file, "title=Nightly").unwrap();
        writeln!(temp_file, "format = JSON").unwrap();
        writeln!(temp_file, "max_inline_bytes=1024").unwrap();
        writeln!(temp_file, "colour=blue").unwrap();

        let settings = load_settings(Some(temp_file.path())).unwrap();

        assert_eq!(
            settings,
            Settings {
                results_dir: Some(PathBuf::from("build/allure-results")),
                title: Some("Nightly".to_string()),
                format: Some(ReportFormat::Json),
                max_inline_bytes: Some(1024),
                ..Settings::default()
            }
        );
    }

    #[test]
    fn test_default_template_has_no_active_settings() {
        let settings = parse_settings(DEFAULT_SETTINGS).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            parse_settings("format=html"),
            Err(ReportError::Config(_))
        ));
        assert!(matches!(
            parse_settings("max_inline_bytes=lots"),
            Err(ReportError::Config(_))
        ));
    }

    #[test]
    fn test_init_settings_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_DIR).join(SETTINGS_FILE);

        assert!(init_settings(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_SETTINGS);

        fs::write(&path, "title=Mine").unwrap();
        assert!(!init_settings(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "title=Mine");
    }

    #[test]
    fn test_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_settings(Some(&dir.path().join("missing")));
        assert!(matches!(result, Err(ReportError::Config(_))));
    }
}
