//! mpcheck CLI library
//!
//! This module contains the core CLI logic for the mini-program checker.

pub mod error_adapter;
pub mod render;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::info;

use mpcheck::{CheckError, Checker, LogicalPath};

/// How a run ended, as far as the checked project is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No defects at all.
    Clean,
    /// Only warnings were recorded.
    Warnings,
    /// At least one fatal defect was recorded.
    Fatal,
}

impl Outcome {
    /// Process exit status: non-zero only when fatal defects were found.
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Clean | Outcome::Warnings => 0,
            Outcome::Fatal => 1,
        }
    }
}

/// Run the mpcheck CLI application
///
/// This function checks the project under `args.root`, optionally writes
/// the JSON report, and prints the ledger to standard output.
///
/// # Errors
///
/// Returns `CheckError` for:
/// - Configuration loading errors
/// - Invalid highlight paths
/// - A missing or malformed project manifest
/// - File I/O errors
/// - Report export errors
pub fn run(args: &Args) -> Result<Outcome, CheckError> {
    info!(
        root = args.root,
        report_path:? = args.report;
        "Checking project"
    );
    let root = Path::new(&args.root);

    let app_config = config::load_config(args.config.as_ref(), root)?;
    let highlights = parse_highlights(&args.highlights)?;

    let checker = Checker::new(app_config);
    let report = checker.check(root)?;

    if let Some(report_path) = &args.report {
        let json = report.document(&highlights).to_json()?;
        fs::write(report_path, json).map_err(|err| CheckError::io(report_path, err))?;
        info!(report_file = report_path; "Report exported successfully");
    }

    let component_count = report.components().len();
    let outcome = if report.ledger().has_fatal() {
        Outcome::Fatal
    } else if report.is_clean() {
        Outcome::Clean
    } else {
        Outcome::Warnings
    };

    let ledger = report.into_ledger().drain();
    print!("{}", render::render_ledger(&ledger, component_count, root));

    Ok(outcome)
}

fn parse_highlights(highlights: &[String]) -> Result<Vec<LogicalPath>, CheckError> {
    highlights
        .iter()
        .map(|highlight| {
            LogicalPath::new(highlight)
                .ok_or_else(|| CheckError::Config(format!("invalid highlight path `{highlight}`")))
        })
        .collect()
}
