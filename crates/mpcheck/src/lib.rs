//! mpcheck - A static checker for mini-program projects.
//!
//! Starting from the pages declared in the project manifest, the checker
//! resolves every component reachable through `usingComponents` tables,
//! validates each component's markup, and finds markup files nothing
//! reaches. Defects are collected in an [`ErrorLedger`]; the resolved
//! component map can be projected into a display hierarchy or a usage graph.

pub mod builtin;
pub mod color;
pub mod component;
pub mod config;
pub mod export;
pub mod fs;
pub mod ledger;
pub mod manifest;
pub mod orphan;
pub mod projection;
pub mod resolver;

mod error;
mod logical_path;

pub use component::{Component, ComponentMap};
pub use error::CheckError;
pub use ledger::{ErrorLedger, ErrorRecord};
pub use logical_path::LogicalPath;
pub use mpcheck_markup::{
    Position, Span,
    error::{ErrorCode, Label, Severity},
};

use std::path::{Path, PathBuf};

use log::{debug, info, trace};

use builtin::Vocabulary;
use color::Color;
use config::{AppConfig, ProjectConfig};
use export::ReportDocument;
use fs::{FileSystem, OsFileSystem};
use manifest::AppManifest;
use projection::{
    graph::{UsageGraph, build_graph},
    hierarchy::{HierarchyBuilder, HierarchyNode},
};
use resolver::Resolver;

/// Checks mini-program project trees.
///
/// A checker holds configuration only; every call to [`Checker::check`]
/// builds fresh run state, so one checker can check many projects.
///
/// # Examples
///
/// ```rust,no_run
/// use mpcheck::{Checker, config::AppConfig};
///
/// let checker = Checker::new(AppConfig::default());
/// let report = checker
///     .check("path/to/project".as_ref())
///     .expect("Failed to check project");
///
/// for (key, records) in report.ledger().fatal() {
///     println!("{key}: {} fatal", records.len());
/// }
///
/// // Or use default config
/// let checker = Checker::default();
/// ```
#[derive(Debug, Default)]
pub struct Checker {
    config: AppConfig,
}

impl Checker {
    /// Create a new checker with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Check the project rooted at `root` on the real filesystem.
    ///
    /// # Errors
    ///
    /// See [`Checker::check_with`].
    pub fn check(&self, root: &Path) -> Result<CheckReport, CheckError> {
        self.check_with(&OsFileSystem, root)
    }

    /// Check the project rooted at `root` through `fs`.
    ///
    /// This reads the project manifest, resolves every component reachable
    /// from its pages, and runs orphan detection.
    ///
    /// # Errors
    ///
    /// Returns `CheckError` when the configured palette is invalid, the
    /// manifest is missing or malformed, a page path is not a valid logical
    /// path, or a file that exists cannot be read. Defects in the project
    /// itself are never errors; they are recorded in the report's ledger.
    pub fn check_with<F: FileSystem + ?Sized>(
        &self,
        fs: &F,
        root: &Path,
    ) -> Result<CheckReport, CheckError> {
        info!(root:? = root; "Checking project");
        let project = self.config.project();
        let palette = self.config.projection().palette().map_err(CheckError::Config)?;

        let manifest_path = root.join(project.manifest());
        if !fs.is_file(&manifest_path) {
            return Err(CheckError::InvalidProject(format!(
                "project manifest `{}` not found",
                manifest_path.display()
            )));
        }
        let manifest = AppManifest::decode(&manifest_path, &fs.read_to_string(&manifest_path)?)?;

        let entries = manifest
            .pages()
            .iter()
            .map(|page| {
                LogicalPath::new(page).ok_or_else(|| {
                    CheckError::InvalidProject(format!("invalid page path `{page}`"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(pages = entries.len(); "Project manifest read");

        let vocabulary = Vocabulary::new(self.config.markup().builtin_elements());
        let resolver = Resolver::new(fs, root, project, &vocabulary);
        let mut context = resolver.resolve(&entries)?;

        let orphans = orphan::find_orphans(fs, root, project, &context.components)?;
        orphan::record_orphans(&mut context.ledger, &orphans, project.extensions().markup());

        info!(
            components = context.components.len(),
            orphans = orphans.len(),
            fatal = context.ledger.fatal_count(),
            warnings = context.ledger.warning_count();
            "Check finished"
        );
        trace!(components:? = context.components; "Component map");

        Ok(CheckReport {
            root: root.to_path_buf(),
            entries,
            components: context.components,
            ledger: context.ledger,
            palette,
            project: project.clone(),
        })
    }
}

/// The result of one checker run.
#[derive(Debug)]
pub struct CheckReport {
    root: PathBuf,
    entries: Vec<LogicalPath>,
    components: ComponentMap,
    ledger: ErrorLedger,
    palette: Vec<Color>,
    project: ProjectConfig,
}

impl CheckReport {
    /// Whether the run recorded no defects at all.
    pub fn is_clean(&self) -> bool {
        self.ledger.is_clean()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entry pages, in manifest order.
    pub fn entries(&self) -> &[LogicalPath] {
        &self.entries
    }

    /// Every resolved component, in resolution order.
    pub fn components(&self) -> &ComponentMap {
        &self.components
    }

    pub fn ledger(&self) -> &ErrorLedger {
        &self.ledger
    }

    /// Move the ledger out, e.g. to drain it for rendering.
    pub fn into_ledger(self) -> ErrorLedger {
        self.ledger
    }

    /// The display hierarchy, rooted at the project directory name.
    ///
    /// Subtrees of components under any of `highlights` lose their page color.
    pub fn hierarchy(&self, highlights: &[LogicalPath]) -> HierarchyNode {
        HierarchyBuilder::new(&self.components, &self.project)
            .with_palette(&self.palette)
            .with_highlights(highlights)
            .build(&self.root_name(), &self.entries)
    }

    /// The flat usage graph.
    pub fn graph(&self) -> UsageGraph {
        build_graph(&self.components, &self.project)
    }

    /// Projections and ledger as one exportable document.
    pub fn document(&self, highlights: &[LogicalPath]) -> ReportDocument<'_> {
        ReportDocument {
            hierarchy: self.hierarchy(highlights),
            graph: self.graph(),
            errors: &self.ledger,
        }
    }

    fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }
}
