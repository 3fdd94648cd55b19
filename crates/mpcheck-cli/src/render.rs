//! Console rendering of a drained error ledger.
//!
//! Warnings are printed before fatal errors so the most severe defects end
//! up at the bottom of the terminal. Within a section keys are sorted and
//! each key's records keep the order they were found in. Every record is
//! rendered by miette, with a source snippet when its file can be read.

use std::{
    collections::HashMap,
    fmt::{self, Write},
    path::Path,
};

use log::debug;
use miette::{GraphicalReportHandler, NamedSource};

use mpcheck::{
    ErrorRecord,
    fs::{FileSystem, OsFileSystem},
    ledger::{DrainedLedger, Entries},
};

use crate::error_adapter::RecordAdapter;

/// Record files of one ledger, read once and keyed by their root-relative path.
type Sources = HashMap<String, Option<NamedSource<String>>>;

/// Render the ledger contents as console text.
///
/// Record files are read from under `root` to show source snippets; a file
/// that cannot be read is rendered without one.
pub fn render_ledger(ledger: &DrainedLedger, component_count: usize, root: &Path) -> String {
    let sources = load_sources(ledger, root);
    let mut out = String::new();
    write_ledger(&mut out, ledger, component_count, &sources)
        .expect("Writing to String buffer is infallible");
    out
}

fn load_sources(ledger: &DrainedLedger, root: &Path) -> Sources {
    let mut sources = Sources::new();
    let files = ledger
        .warning
        .iter()
        .chain(&ledger.fatal)
        .flat_map(|(_, records)| records)
        .filter(|record| !record.labels().is_empty())
        .filter_map(ErrorRecord::file);

    for file in files {
        if sources.contains_key(file) {
            continue;
        }
        let source = match OsFileSystem.read_to_string(&root.join(file)) {
            Ok(text) => Some(NamedSource::new(file, text)),
            Err(err) => {
                debug!(file, err:% = err; "Rendering record without source");
                None
            }
        };
        sources.insert(file.to_string(), source);
    }
    sources
}

fn write_ledger(
    out: &mut impl Write,
    ledger: &DrainedLedger,
    component_count: usize,
    sources: &Sources,
) -> fmt::Result {
    if ledger.fatal.is_empty() && ledger.warning.is_empty() {
        return writeln!(out, "No problems found in {component_count} components");
    }

    write_section(out, "warnings", &ledger.warning, sources)?;
    write_section(out, "fatal errors", &ledger.fatal, sources)
}

fn write_section(
    out: &mut impl Write,
    title: &str,
    entries: &Entries,
    sources: &Sources,
) -> fmt::Result {
    if entries.is_empty() {
        return Ok(());
    }

    let count: usize = entries.iter().map(|(_, records)| records.len()).sum();
    writeln!(out, "{title} ({count}):")?;
    for (key, records) in entries {
        writeln!(out, "  {key}")?;
        for record in records {
            let src = record
                .file()
                .and_then(|file| sources.get(file))
                .and_then(Option::as_ref);
            write_record(out, record, src)?;
        }
    }
    writeln!(out)
}

fn write_record(
    out: &mut impl Write,
    record: &ErrorRecord,
    src: Option<&NamedSource<String>>,
) -> fmt::Result {
    let reporter = GraphicalReportHandler::new();
    let mut report = String::new();
    if reporter
        .render_report(&mut report, &RecordAdapter::new(record, src))
        .is_err()
    {
        // The snippet could not be laid out; fall back to the bare record
        report.clear();
        reporter.render_report(&mut report, &RecordAdapter::new(record, None))?;
    }

    for line in report.trim_end().lines() {
        if line.trim().is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, "    {line}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use mpcheck::{Checker, ErrorCode, ErrorLedger, Span};

    use super::*;

    #[test]
    fn test_clean_run() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ErrorLedger::new().drain();
        assert_eq!(
            render_ledger(&ledger, 4, dir.path()),
            "No problems found in 4 components\n"
        );
    }

    #[test]
    fn test_warnings_before_fatal_with_snippets() {
        let dir = tempfile::tempdir().unwrap();
        let source = "<view>\n  <foo/>\n</view>";
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("pages/a.axml"), source).unwrap();

        let mut ledger = ErrorLedger::new();
        ledger.record(
            "pages/a",
            ErrorRecord::new(ErrorCode::E302, "Undefined component: `foo`")
                .at("pages/a.axml", source, 9)
                .with_label(Span::new(10..13), "not declared")
                .with_help("declare `foo` under usingComponents"),
        );
        ledger.record(
            "2 extraneous components are found",
            ErrorRecord::new(ErrorCode::E304, "Orphan component: `pages/x`").in_file("pages/x.axml"),
        );
        ledger.record(
            "2 extraneous components are found",
            ErrorRecord::new(ErrorCode::E304, "Orphan component: `pages/y`").in_file("pages/y.axml"),
        );

        let out = render_ledger(&ledger.drain(), 1, dir.path());

        let warnings = out.find("warnings (2):").unwrap();
        let fatal = out.find("fatal errors (1):").unwrap();
        assert!(warnings < fatal);
        assert!(out.contains("  2 extraneous components are found\n"));
        assert!(out.contains("mpcheck::E304"));
        assert!(out.contains("Orphan component: `pages/x` (pages/x.axml)"));

        assert!(out.contains("mpcheck::E302"));
        assert!(out.contains("pages/a.axml:2:"));
        assert!(out.contains("<foo/>"));
        assert!(out.contains("not declared"));
        assert!(out.contains("declare `foo` under usingComponents"));
        assert!(!out.contains("No problems found"));
    }

    #[test]
    fn test_record_with_unreadable_file_keeps_location() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ErrorLedger::new();
        ledger.record(
            "pages/a",
            ErrorRecord::new(ErrorCode::E302, "Undefined component: `foo`")
                .at("pages/a.axml", "<foo/>", 0)
                .with_label(Span::new(1..4), "not declared"),
        );

        let out = render_ledger(&ledger.drain(), 1, dir.path());
        assert!(out.contains("Undefined component: `foo` (pages/a.axml:1:0)"));
    }

    #[test]
    fn test_record_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ErrorLedger::new();
        ledger.record("pages/a", ErrorRecord::new(ErrorCode::E303, "Unused definition: `x`"));

        let out = render_ledger(&ledger.drain(), 1, dir.path());
        assert!(out.contains("mpcheck::E303"));
        assert!(out.contains("Unused definition: `x`"));
    }

    #[test]
    fn test_markup_help_and_secondary_labels_are_shown() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("app.json"), r#"{ "pages": ["pages/a"] }"#).unwrap();
        fs::create_dir_all(root.join("pages")).unwrap();
        for (ext, content) in [
            ("json", "{}"),
            ("js", ""),
            ("axml", "<view>{{ title</view>"),
            ("acss", ""),
        ] {
            fs::write(root.join(format!("pages/a.{ext}")), content).unwrap();
        }

        let report = Checker::default().check(root).unwrap();
        let count = report.components().len();
        let out = render_ledger(&report.into_ledger().drain(), count, root);

        assert!(out.contains("mpcheck::E200"));
        assert!(out.contains("every `{{` needs a matching `}}`"));
    }
}
