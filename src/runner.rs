use std::path::PathBuf;

use colored::Colorize;
use tabled::{Table, Tabled, settings::Style};

use crate::{
    cli::settings::{ReportFormat, init_settings},
    errors::ReportError,
    pipeline::{Outcome, ReportOptions, generate_report},
    report::{
        model::Summary,
        renderer::{JsonRenderer, MarkdownRenderer, Renderer},
    },
};

pub trait Runner {
    fn run(&self) -> Result<(), ReportError>;
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Tests")]
    count: usize,
}

fn summary_table(summary: &Summary) -> String {
    let mut rows = vec![
        SummaryRow {
            status: "passed",
            count: summary.passed,
        },
        SummaryRow {
            status: "failed",
            count: summary.failed,
        },
        SummaryRow {
            status: "broken",
            count: summary.broken,
        },
        SummaryRow {
            status: "skipped",
            count: summary.skipped,
        },
    ];
    if summary.unclassified() > 0 {
        rows.push(SummaryRow {
            status: "unknown",
            count: summary.unclassified(),
        });
    }
    rows.push(SummaryRow {
        status: "total",
        count: summary.total,
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

pub struct ReportRunner {
    options: ReportOptions,
    format: ReportFormat,
}

impl ReportRunner {
    pub fn new(options: ReportOptions, format: ReportFormat) -> Self {
        Self { options, format }
    }

    fn renderer(&self) -> Box<dyn Renderer> {
        match self.format {
            ReportFormat::Markdown => Box::new(MarkdownRenderer),
            ReportFormat::Json => Box::new(JsonRenderer),
        }
    }
}

impl Runner for ReportRunner {
    fn run(&self) -> Result<(), ReportError> {
        println!("Allure-Markdown: Converting Allure metadata to Markdown...");
        match generate_report(&self.options, self.renderer().as_ref())? {
            Outcome::Success { output, summary } => {
                println!("{}", summary_table(&summary));
                println!(
                    "{} Report generated at '{}'",
                    "Success:".green().bold(),
                    output.display()
                );
            }
            Outcome::Warning(message) => {
                println!("{} {}", "Warning:".yellow().bold(), message);
            }
        }
        Ok(())
    }
}

pub struct InitSettingsRunner {
    path: PathBuf,
}

impl InitSettingsRunner {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Runner for InitSettingsRunner {
    fn run(&self) -> Result<(), ReportError> {
        if init_settings(&self.path)? {
            println!("Settings written to '{}'", self.path.display());
        } else {
            println!(
                "{} Settings file '{}' already exists.",
                "Warning:".yellow().bold(),
                self.path.display()
            );
        }
        Ok(())
    }
}
