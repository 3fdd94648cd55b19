//! Built-in element vocabulary.
//!
//! Elements in this vocabulary are provided by the host runtime and need no
//! `usingComponents` declaration.

use std::collections::HashSet;

/// Basic components of the host runtime plus the structural template tags.
pub const BUILTIN_ELEMENTS: &[&str] = &[
    // View containers
    "view",
    "swiper",
    "swiper-item",
    "scroll-view",
    "cover-view",
    "cover-image",
    "movable-view",
    "movable-area",
    "page-container",
    // Basic content
    "text",
    "icon",
    "progress",
    "rich-text",
    // Form
    "button",
    "form",
    "label",
    "input",
    "textarea",
    "radio",
    "radio-group",
    "checkbox",
    "checkbox-group",
    "switch",
    "slider",
    "picker",
    "picker-view",
    "picker-view-column",
    // Navigation
    "navigator",
    // Media
    "image",
    "video",
    "camera",
    "live-player",
    "audio",
    "lottie",
    // Canvas and maps
    "canvas",
    "map",
    // Open capabilities
    "web-view",
    "ad",
    "contact-button",
    "lifestyle",
    // Template structure
    "block",
    "slot",
    "template",
    "import",
    "include",
    "import-sjs",
];

/// The set of element names resolved without a declaration.
///
/// Matching is exact and case sensitive.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    names: HashSet<String>,
}

impl Vocabulary {
    /// The fixed vocabulary extended with `extra` names.
    pub fn new(extra: &[String]) -> Self {
        let names = BUILTIN_ELEMENTS
            .iter()
            .map(|name| name.to_string())
            .chain(extra.iter().cloned())
            .collect();
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_vocabulary() {
        let vocabulary = Vocabulary::default();

        assert!(vocabulary.contains("view"));
        assert!(vocabulary.contains("scroll-view"));
        assert!(vocabulary.contains("import-sjs"));
        assert!(!vocabulary.contains("View"));
        assert!(!vocabulary.contains("my-card"));
    }

    #[test]
    fn test_extra_names() {
        let vocabulary = Vocabulary::new(&["ec-canvas".to_string()]);

        assert!(vocabulary.contains("ec-canvas"));
        assert!(vocabulary.contains("view"));
    }
}
