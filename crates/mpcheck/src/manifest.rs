//! JSON manifests: the project manifest and per-component metadata.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::CheckError;

/// The project manifest (`app.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppManifest {
    #[serde(default)]
    pages: Option<Vec<String>>,
}

impl AppManifest {
    /// Decode the project manifest read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Manifest`] when `text` is not valid JSON of the
    /// expected shape, and [`CheckError::InvalidProject`] when it does not
    /// list any pages.
    pub fn decode(path: &Path, text: &str) -> Result<Self, CheckError> {
        let manifest: Self = serde_json::from_str(text).map_err(|source| CheckError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;

        if manifest.pages.is_none() {
            return Err(CheckError::InvalidProject(format!(
                "`{}` has no `pages` list",
                path.display()
            )));
        }
        Ok(manifest)
    }

    /// The declared entry pages, in declaration order.
    pub fn pages(&self) -> &[String] {
        self.pages.as_deref().unwrap_or_default()
    }
}

/// The metadata file of a page or component.
///
/// Only the alias table matters to the checker; other keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentManifest {
    #[serde(rename = "usingComponents", default)]
    using_components: IndexMap<String, String>,
}

impl ComponentManifest {
    /// Decode the metadata file read from `path`.
    ///
    /// A file holding only whitespace declares nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Manifest`] when `text` is not valid JSON of the
    /// expected shape.
    pub fn decode(path: &Path, text: &str) -> Result<Self, CheckError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text).map_err(|source| CheckError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Declared aliases and their targets, in declaration order.
    pub fn using_components(&self) -> &IndexMap<String, String> {
        &self.using_components
    }
}
