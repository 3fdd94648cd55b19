//! Containment hierarchy for display.
//!
//! The hierarchy has one root per run, one child per entry page, and below
//! each page the components it uses. A component appears once per path it
//! is reached by, so the same component can show up under several parents.
//! Expansion stops when a component reappears on its own ancestor chain.

use serde::Serialize;

use crate::{
    color::Color,
    component::ComponentMap,
    config::ProjectConfig,
    logical_path::LogicalPath,
    projection::display_name,
};

/// A node of the display tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub name: String,
    /// `None` for the run root.
    pub path: Option<LogicalPath>,
    pub depth: usize,
    /// Index of the entry page this node descends from.
    pub page: Option<usize>,
    /// Whether the component comes from the registry directory.
    pub external: bool,
    /// Inherited page color; cleared inside highlighted subtrees.
    pub color: Option<Color>,
    /// The component is already an ancestor of this node; it is not expanded.
    pub recursive: bool,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Iterate over this node and all its descendants, pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &HierarchyNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Builds a [`HierarchyNode`] tree from a component map.
///
/// # Examples
///
/// ```
/// # use mpcheck::{ComponentMap, LogicalPath, config::ProjectConfig};
/// # use mpcheck::projection::hierarchy::HierarchyBuilder;
/// let components = ComponentMap::new();
/// let project = ProjectConfig::default();
///
/// let tree = HierarchyBuilder::new(&components, &project).build("app", &[]);
/// assert_eq!(tree.name, "app");
/// assert!(tree.children.is_empty());
/// ```
pub struct HierarchyBuilder<'a> {
    components: &'a ComponentMap,
    project: &'a ProjectConfig,
    palette: &'a [Color],
    highlights: &'a [LogicalPath],
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(components: &'a ComponentMap, project: &'a ProjectConfig) -> Self {
        Self {
            components,
            project,
            palette: &[],
            highlights: &[],
        }
    }

    /// Colors assigned to entry pages by index, cycling.
    pub fn with_palette(mut self, palette: &'a [Color]) -> Self {
        self.palette = palette;
        self
    }

    /// Logical paths (or directories) whose subtrees are highlighted.
    pub fn with_highlights(mut self, highlights: &'a [LogicalPath]) -> Self {
        self.highlights = highlights;
        self
    }

    /// Build the tree under a root named `root_name`.
    pub fn build(&self, root_name: &str, entries: &'a [LogicalPath]) -> HierarchyNode {
        let children = entries
            .iter()
            .enumerate()
            .map(|(index, page)| {
                let color = if self.palette.is_empty() {
                    None
                } else {
                    Some(self.palette[index % self.palette.len()])
                };
                let mut ancestors = Vec::new();
                self.node(page, 1, index, color, &mut ancestors)
            })
            .collect();

        HierarchyNode {
            name: root_name.to_string(),
            path: None,
            depth: 0,
            page: None,
            external: false,
            color: None,
            recursive: false,
            children,
        }
    }

    fn node(
        &self,
        path: &'a LogicalPath,
        depth: usize,
        page: usize,
        inherited: Option<Color>,
        ancestors: &mut Vec<&'a LogicalPath>,
    ) -> HierarchyNode {
        let color = if self.is_highlighted(path) {
            None
        } else {
            inherited
        };
        let recursive = ancestors.contains(&path);

        let mut children = Vec::new();
        if !recursive {
            if let Some(component) = self.components.get(path) {
                ancestors.push(path);
                children = component
                    .component_dependencies()
                    .map(|dependency| self.node(dependency, depth + 1, page, color, ancestors))
                    .collect();
                ancestors.pop();
            }
        }

        HierarchyNode {
            name: display_name(path, self.project),
            path: Some(path.clone()),
            depth,
            page: Some(page),
            external: path.is_under(self.project.registry_dir()),
            color,
            recursive,
            children,
        }
    }

    fn is_highlighted(&self, path: &LogicalPath) -> bool {
        self.highlights
            .iter()
            .any(|highlight| path.is_under(highlight.as_str()))
    }
}
