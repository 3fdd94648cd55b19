//! Resolved components and their dependency references.

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use mpcheck_markup::Position;

use crate::logical_path::LogicalPath;

/// Every component reached during a run, keyed by logical path in the order
/// they were resolved.
pub type ComponentMap = IndexMap<LogicalPath, Component>;

/// What an element name resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// An element of the built-in vocabulary.
    Builtin(String),
    /// A component declared in `usingComponents`.
    Component(LogicalPath),
}

impl Target {
    pub fn logical_path(&self) -> Option<&LogicalPath> {
        match self {
            Target::Builtin(_) => None,
            Target::Component(path) => Some(path),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Target::Builtin(_))
    }
}

/// Built-in targets render as the synthetic path `builtin:<name>`.
impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Builtin(name) => write!(f, "builtin:{name}"),
            Target::Component(path) => write!(f, "{path}"),
        }
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One distinct element name used by a component's markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyRef {
    /// The element name as written.
    pub name: String,
    pub target: Target,
    /// Where the first element with this name was opened.
    pub position: Position,
}

/// A page or component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    path: LogicalPath,
    dependencies: Vec<DependencyRef>,
    definitions: IndexMap<String, LogicalPath>,
}

impl Component {
    pub fn new(
        path: LogicalPath,
        dependencies: Vec<DependencyRef>,
        definitions: IndexMap<String, LogicalPath>,
    ) -> Self {
        Self {
            path,
            dependencies,
            definitions,
        }
    }

    /// A component that could not be processed, e.g. because a file is missing.
    pub fn empty(path: LogicalPath) -> Self {
        Self::new(path, Vec::new(), IndexMap::new())
    }

    pub fn path(&self) -> &LogicalPath {
        &self.path
    }

    /// Distinct element names in order of first appearance.
    pub fn dependencies(&self) -> &[DependencyRef] {
        &self.dependencies
    }

    /// Valid aliases from the metadata file.
    pub fn definitions(&self) -> &IndexMap<String, LogicalPath> {
        &self.definitions
    }

    /// Logical paths of the components this one uses, built-ins excluded.
    pub fn component_dependencies(&self) -> impl Iterator<Item = &LogicalPath> {
        self.dependencies
            .iter()
            .filter_map(|dependency| dependency.target.logical_path())
    }
}
