use std::path::PathBuf;

use clap::Parser;

use crate::{
    errors::ReportError,
    logging::init_tracing,
    pipeline::{
        DEFAULT_DESCRIPTION, DEFAULT_OUTPUT, DEFAULT_RESULTS_DIR, DEFAULT_TITLE, ReportOptions,
    },
    runner::{InitSettingsRunner, ReportRunner, Runner},
};

use super::settings::{ReportFormat, Settings, default_settings_path, load_settings};

#[derive(Parser, Debug)]
#[command(
    name = "allure-md",
    version,
    about = "Convert Allure results into a Markdown report",
    long_about = None
)]
pub struct Cli {
    #[arg(
        long,
        short,
        help = format!("Path to allure results directory (default: {})", DEFAULT_RESULTS_DIR)
    )]
    results_dir: Option<PathBuf>,

    #[arg(
        long,
        short,
        help = format!("Output report file path (default: {})", DEFAULT_OUTPUT)
    )]
    output: Option<PathBuf>,

    #[arg(long, short, help = format!("Report title (default: {})", DEFAULT_TITLE))]
    title: Option<String>,

    #[arg(long, short, help = "Report description")]
    description: Option<String>,

    #[arg(long, short, help = "Custom content to add after the title")]
    custom_content: Option<String>,

    #[arg(long, short, value_enum, help = "Report format (default: markdown)")]
    format: Option<ReportFormat>,

    #[arg(
        long,
        help = "Link text attachments larger than this many bytes instead of inlining them"
    )]
    max_inline_bytes: Option<u64>,

    #[arg(long, help = "Settings file (default: ~/.allure-md/config)")]
    config: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = false,
        help = "Write a commented settings file and exit"
    )]
    init_config: bool,

    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    /// Layer command line flags over settings over built-in defaults.
    pub fn into_options(self, settings: Settings) -> (ReportOptions, ReportFormat) {
        let options = ReportOptions {
            results_dir: self
                .results_dir
                .or(settings.results_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR)),
            output: self
                .output
                .or(settings.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            title: self
                .title
                .or(settings.title)
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: self
                .description
                .or(settings.description)
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            custom_content: self
                .custom_content
                .or(settings.custom_content)
                .unwrap_or_default(),
            max_inline_bytes: self.max_inline_bytes.or(settings.max_inline_bytes),
        };
        let format = self.format.or(settings.format).unwrap_or_default();
        (options, format)
    }
}

pub fn parse_cli() -> Result<Box<dyn Runner>, ReportError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.init_config {
        let path = cli.config.or_else(default_settings_path).ok_or_else(|| {
            ReportError::InvalidArgument(
                "Could not find home directory, pass --config".to_string(),
            )
        })?;
        return Ok(Box::new(InitSettingsRunner::new(path)));
    }

    let settings = load_settings(cli.config.as_deref())?;
    let (options, format) = cli.into_options(settings);
    Ok(Box::new(ReportRunner::new(options, format)))
}
