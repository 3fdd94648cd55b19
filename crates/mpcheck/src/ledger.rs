//! The error ledger: every defect found during a run, grouped by key.
//!
//! Defects are kept in two independent buckets, fatal and warning. Each
//! bucket maps a logical key (a component's logical path, or a synthetic
//! key such as the orphan summary) to its records in insertion order.

use indexmap::IndexMap;
use serde::Serialize;

use mpcheck_markup::{
    Position, Span,
    error::{Diagnostic, ErrorCode, Label, Severity},
    line_column, render_excerpt,
};

/// One defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    kind: ErrorCode,
    severity: Severity,
    message: String,
    /// Root-relative file the position refers to.
    file: Option<String>,
    position: Option<Position>,
    /// Source line plus caret line.
    excerpt: Option<String>,
    /// Byte spans in `file`, in the order they were attached.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    labels: Vec<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<String>,
}

impl ErrorRecord {
    /// A record at the severity `kind` is reported at, with no location.
    pub fn new(kind: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
            file: None,
            position: None,
            excerpt: None,
            labels: Vec::new(),
            help: None,
        }
    }

    /// Attach the file the record is about, without a position.
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Attach a position in `file`, translating `offset` against `source`
    /// and rendering the excerpt.
    pub fn at(mut self, file: impl Into<String>, source: &str, offset: usize) -> Self {
        self.file = Some(file.into());
        self.position = Some(line_column(source, offset));
        self.excerpt = Some(render_excerpt(source, offset));
        self
    }

    /// Add a primary label over `span` in the record's file.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Convert a markup diagnostic found in `file`.
    ///
    /// Labels and help text are carried over so renderers can show them.
    pub fn from_diagnostic(diagnostic: &Diagnostic, file: &str, source: &str) -> Self {
        let kind = diagnostic.code().unwrap_or(ErrorCode::E102);
        let record = Self {
            severity: diagnostic.severity(),
            labels: diagnostic.labels().to_vec(),
            help: diagnostic.help().map(str::to_string),
            ..Self::new(kind, diagnostic.message())
        };
        match diagnostic.offset() {
            Some(offset) => record.at(file, source, offset),
            None => record.in_file(file),
        }
    }

    pub fn kind(&self) -> ErrorCode {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn excerpt(&self) -> Option<&str> {
        self.excerpt.as_deref()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

/// Records grouped by key, keys sorted.
pub type Entries = Vec<(String, Vec<ErrorRecord>)>;

/// The contents of a drained ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainedLedger {
    pub fatal: Entries,
    pub warning: Entries,
}

/// Two-severity multimap of defects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorLedger {
    fatal: IndexMap<String, Vec<ErrorRecord>>,
    warning: IndexMap<String, Vec<ErrorRecord>>,
}

impl ErrorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `record` under `key` in the bucket matching its severity.
    pub fn record(&mut self, key: impl Into<String>, record: ErrorRecord) {
        let bucket = match record.severity() {
            Severity::Fatal => &mut self.fatal,
            Severity::Warning => &mut self.warning,
        };
        bucket.entry(key.into()).or_default().push(record);
    }

    /// A run is clean only if both buckets are empty.
    pub fn is_clean(&self) -> bool {
        self.fatal.is_empty() && self.warning.is_empty()
    }

    pub fn has_fatal(&self) -> bool {
        !self.fatal.is_empty()
    }

    /// Fatal records by key, in insertion order.
    pub fn fatal(&self) -> &IndexMap<String, Vec<ErrorRecord>> {
        &self.fatal
    }

    /// Warning records by key, in insertion order.
    pub fn warnings(&self) -> &IndexMap<String, Vec<ErrorRecord>> {
        &self.warning
    }

    /// Records filed under `key` in either bucket, fatal first.
    pub fn records_for(&self, key: &str) -> impl Iterator<Item = &ErrorRecord> {
        let fatal = self.fatal.get(key).into_iter().flatten();
        let warning = self.warning.get(key).into_iter().flatten();
        fatal.chain(warning)
    }

    pub fn fatal_count(&self) -> usize {
        self.fatal.values().map(Vec::len).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.warning.values().map(Vec::len).sum()
    }

    /// Empty the ledger, returning both buckets with keys sorted.
    ///
    /// Records under one key keep their insertion order.
    pub fn drain(&mut self) -> DrainedLedger {
        fn sorted(bucket: &mut IndexMap<String, Vec<ErrorRecord>>) -> Entries {
            let mut entries: Entries = bucket.drain(..).collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            entries
        }

        DrainedLedger {
            fatal: sorted(&mut self.fatal),
            warning: sorted(&mut self.warning),
        }
    }
}
