//! Presentation structures derived from a finished component map.
//!
//! - [`hierarchy`] - a display tree rooted at the entry pages
//! - [`graph`] - a flat usage graph with reference-count weights
//!
//! Both are read-only views; the component map stays authoritative.

pub mod graph;
pub mod hierarchy;

use crate::{config::ProjectConfig, logical_path::LogicalPath};

/// The short name a component is displayed under.
///
/// The last path segment is used, except that an `index` component is named
/// after its directory (`pages/home/index` is `home`) unless that directory
/// is the pages or registry directory itself.
pub fn display_name(path: &LogicalPath, project: &ProjectConfig) -> String {
    let name = path.file_name();
    if name != "index" {
        return name.to_string();
    }

    match path.parent() {
        Some(parent)
            if parent.as_str() != project.pages_dir()
                && parent.as_str() != project.registry_dir() =>
        {
            parent.file_name().to_string()
        }
        _ => name.to_string(),
    }
}
