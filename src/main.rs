use std::process::ExitCode;

use allure_md::cli::cli_parser::parse_cli;
use colored::Colorize;

fn main() -> ExitCode {
    match parse_cli().and_then(|runner| runner.run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "Error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
