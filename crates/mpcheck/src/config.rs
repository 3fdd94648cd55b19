//! Configuration types for mpcheck runs.
//!
//! This module provides configuration structures that describe the project
//! layout being checked and how results are presented. All types implement
//! [`serde::Deserialize`] for loading from external sources; every field
//! has a default matching the conventional mini-program layout.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`ProjectConfig`] - Manifest name, registry and page directories, file extensions.
//! - [`MarkupConfig`] - Extra element names treated as built in.
//! - [`ProjectionConfig`] - Palette used to color entry pages in the hierarchy.
//!
//! # Example
//!
//! ```
//! # use mpcheck::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.project().manifest(), "app.json");
//! assert_eq!(config.project().extensions().markup(), "axml");
//! assert!(config.projection().palette().is_ok());
//! ```

use serde::Deserialize;

use crate::color::Color;

/// Top-level configuration combining the project, markup and projection sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Project layout section.
    #[serde(default)]
    project: ProjectConfig,

    /// Markup section.
    #[serde(default)]
    markup: MarkupConfig,

    /// Projection section.
    #[serde(default)]
    projection: ProjectionConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(project: ProjectConfig, markup: MarkupConfig, projection: ProjectionConfig) -> Self {
        Self {
            project,
            markup,
            projection,
        }
    }

    /// Returns the project layout configuration.
    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    /// Returns the markup configuration.
    pub fn markup(&self) -> &MarkupConfig {
        &self.markup
    }

    /// Returns the projection configuration.
    pub fn projection(&self) -> &ProjectionConfig {
        &self.projection
    }
}

/// Layout of the project tree being checked.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project manifest, relative to the project root.
    manifest: String,

    /// Directory holding third-party packages; bare aliases resolve under it
    /// and orphan detection skips it.
    registry_dir: String,

    /// Directory holding pages; stripped from display names.
    pages_dir: String,

    extensions: Extensions,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            manifest: "app.json".to_string(),
            registry_dir: "node_modules".to_string(),
            pages_dir: "pages".to_string(),
            extensions: Extensions::default(),
        }
    }
}

impl ProjectConfig {
    /// Creates a new [`ProjectConfig`].
    pub fn new(
        manifest: impl Into<String>,
        registry_dir: impl Into<String>,
        pages_dir: impl Into<String>,
        extensions: Extensions,
    ) -> Self {
        Self {
            manifest: manifest.into(),
            registry_dir: registry_dir.into(),
            pages_dir: pages_dir.into(),
            extensions,
        }
    }

    pub fn manifest(&self) -> &str {
        &self.manifest
    }

    pub fn registry_dir(&self) -> &str {
        &self.registry_dir
    }

    pub fn pages_dir(&self) -> &str {
        &self.pages_dir
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

/// File extensions of the four sibling files that make up a component.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Extensions {
    metadata: String,
    logic: String,
    markup: String,
    style: String,
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            metadata: "json".to_string(),
            logic: "js".to_string(),
            markup: "axml".to_string(),
            style: "acss".to_string(),
        }
    }
}

impl Extensions {
    /// Creates a new [`Extensions`] set.
    pub fn new(
        metadata: impl Into<String>,
        logic: impl Into<String>,
        markup: impl Into<String>,
        style: impl Into<String>,
    ) -> Self {
        Self {
            metadata: metadata.into(),
            logic: logic.into(),
            markup: markup.into(),
            style: style.into(),
        }
    }

    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    pub fn logic(&self) -> &str {
        &self.logic
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    /// All four extensions in the order their files are checked.
    pub fn all(&self) -> [&str; 4] {
        [&self.metadata, &self.logic, &self.markup, &self.style]
    }
}

/// Markup configuration.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MarkupConfig {
    /// Element names treated as built in, in addition to the fixed vocabulary.
    #[serde(default)]
    builtin_elements: Vec<String>,
}

impl MarkupConfig {
    /// Creates a new [`MarkupConfig`] with extra built-in element names.
    pub fn new(builtin_elements: Vec<String>) -> Self {
        Self { builtin_elements }
    }

    pub fn builtin_elements(&self) -> &[String] {
        &self.builtin_elements
    }
}

/// Hierarchy projection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionConfig {
    /// Colors assigned to entry pages by index, as color strings.
    #[serde(default = "default_palette")]
    palette: Vec<String>,
}

fn default_palette() -> Vec<String> {
    [
        "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
        }
    }
}

impl ProjectionConfig {
    /// Creates a new [`ProjectionConfig`] with the given palette.
    pub fn new(palette: Vec<String>) -> Self {
        Self { palette }
    }

    /// Returns the parsed palette; an empty palette disables coloring.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first entry that is not a valid [`Color`].
    pub fn palette(&self) -> Result<Vec<Color>, String> {
        self.palette
            .iter()
            .map(|color| Color::new(color))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| format!("Invalid palette in config: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_project_layout() {
        let project = ProjectConfig::default();

        assert_eq!(project.manifest(), "app.json");
        assert_eq!(project.registry_dir(), "node_modules");
        assert_eq!(project.pages_dir(), "pages");
        assert_eq!(project.extensions().all(), ["json", "js", "axml", "acss"]);
    }

    #[test]
    fn test_default_palette_is_valid() {
        let palette = ProjectionConfig::default().palette().unwrap();
        assert_eq!(palette.len(), 8);
    }

    #[test]
    fn test_invalid_palette_entry() {
        let projection = ProjectionConfig::new(vec!["red".to_string(), "nope".to_string()]);

        let err = projection.palette().unwrap_err();
        assert!(err.contains("Invalid palette"));
        assert!(err.contains("nope"));
    }

    #[test]
    fn test_empty_palette() {
        let projection = ProjectionConfig::new(Vec::new());
        assert!(projection.palette().unwrap().is_empty());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "project": { "registry_dir": "miniprogram_npm", "extensions": { "markup": "wxml" } } }"#,
        )
        .unwrap();

        assert_eq!(config.project().manifest(), "app.json");
        assert_eq!(config.project().registry_dir(), "miniprogram_npm");
        assert_eq!(config.project().extensions().markup(), "wxml");
        assert_eq!(config.project().extensions().style(), "acss");
        assert_eq!(config.projection().palette().unwrap().len(), 8);
    }
}
