//! Error adapters for converting checker output to miette diagnostics.
//!
//! This module provides the bridge between the library's error types and
//! miette's rich diagnostic formatting used in the CLI.
//!
//! Defects recorded in the ledger are wrapped one at a time in a
//! [`RecordAdapter`] and printed by [`render`](crate::render); a
//! [`CheckError`] that aborts the run goes through [`ErrorAdapter`].

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, NamedSource, SourceSpan};

use mpcheck::{CheckError, ErrorRecord, Severity, Span};

/// Adapter for a single ledger record.
///
/// Labels are only reported when the record's source file is available;
/// without it the location is folded into the message instead.
pub struct RecordAdapter<'a> {
    record: &'a ErrorRecord,
    /// Contents of the record's file, named after it
    src: Option<&'a NamedSource<String>>,
}

impl<'a> RecordAdapter<'a> {
    /// Create a new record adapter.
    pub fn new(record: &'a ErrorRecord, src: Option<&'a NamedSource<String>>) -> Self {
        Self { record, src }
    }

    fn has_snippet(&self) -> bool {
        self.src.is_some() && !self.record.labels().is_empty()
    }
}

impl fmt::Debug for RecordAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordAdapter")
            .field("record", &self.record)
            .finish()
    }
}

impl fmt::Display for RecordAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.record.message())?;
        if self.has_snippet() {
            return Ok(());
        }
        match (self.record.file(), self.record.position()) {
            (Some(file), Some(position)) => write!(f, " ({file}:{position})"),
            (Some(file), None) => write!(f, " ({file})"),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for RecordAdapter<'_> {}

impl MietteDiagnostic for RecordAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("mpcheck::{}", self.record.kind())))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.record.severity() {
            Severity::Warning => miette::Severity::Warning,
            Severity::Fatal => miette::Severity::Error,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.record
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.src.map(|src| src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let src = self.src?;
        if self.record.labels().is_empty() {
            return None;
        }

        // Spans past the end of the file would fail the whole render
        let end = src.inner().len();
        Some(Box::new(
            self.record
                .labels()
                .iter()
                .filter(move |label| label.span().end() <= end)
                .map(|label| {
                    let span = span_to_miette(label.span());
                    let message = Some(label.message().to_string());
                    if label.is_primary() {
                        LabeledSpan::new_primary_with_span(message, span)
                    } else {
                        LabeledSpan::new_with_span(message, span)
                    }
                }),
        ))
    }
}

/// Adapter for [`CheckError`].
pub struct ErrorAdapter<'a>(pub &'a CheckError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CheckError::Io { .. } => "mpcheck::io",
            CheckError::Manifest { .. } => "mpcheck::manifest",
            CheckError::InvalidProject(_) => "mpcheck::project",
            CheckError::Config(_) => "mpcheck::config",
            CheckError::Report(_) => "mpcheck::report",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            CheckError::InvalidProject(_) => {
                "pass the directory that holds the project manifest"
            }
            CheckError::Config(_) => "check the configuration file or pass --config",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Convert a markup [`Span`] to a miette [`SourceSpan`].
fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}
