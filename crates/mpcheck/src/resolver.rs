//! Component resolution.
//!
//! Starting from the entry pages, the [`Resolver`] walks every component
//! reachable through `usingComponents` declarations. Each component is
//! processed exactly once: paths are queued at most once and the work queue
//! is drained in FIFO order, so cyclic and diamond-shaped graphs terminate
//! and "first occurrence" is deterministic.
//!
//! Defects in the project are recorded in the [`ErrorLedger`]; only a file
//! that exists but cannot be read, or a manifest that cannot be decoded,
//! aborts the run.

use std::{
    collections::{HashSet, VecDeque},
    path::Path,
};

use indexmap::IndexMap;
use log::{debug, info, trace};

use mpcheck_markup::{Span, balance::check_delimiters, error::ErrorCode, line_column};

use crate::{
    builtin::Vocabulary,
    component::{Component, ComponentMap, DependencyRef, Target},
    config::ProjectConfig,
    error::CheckError,
    fs::FileSystem,
    ledger::{ErrorLedger, ErrorRecord},
    logical_path::LogicalPath,
    manifest::ComponentManifest,
};

/// Run-scoped state: built fresh for every resolution.
#[derive(Debug, Default)]
pub struct ResolveContext {
    pub components: ComponentMap,
    pub ledger: ErrorLedger,
}

/// Resolves the component graph of one project tree.
pub struct Resolver<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    root: &'a Path,
    project: &'a ProjectConfig,
    vocabulary: &'a Vocabulary,
}

/// The metadata file of the component being resolved.
struct Metadata<'s> {
    file: String,
    text: &'s str,
}

impl Metadata<'_> {
    /// Record for `alias`, positioned at and labeled on its key in the alias
    /// table when found.
    fn record_at_alias(&self, record: ErrorRecord, alias: &str, label: &str) -> ErrorRecord {
        match self.alias_key(alias) {
            Some(span) => record
                .at(&self.file, self.text, span.start())
                .with_label(span, label),
            None => record.in_file(&self.file),
        }
    }

    /// Span of the quoted `alias` in key position, i.e. followed by `:`.
    fn alias_key(&self, alias: &str) -> Option<Span> {
        let table = self.text.find("\"usingComponents\"").unwrap_or(0);
        let quoted = format!("\"{alias}\"");
        self.text[table..]
            .match_indices(&quoted)
            .map(|(offset, _)| table + offset + quoted.len())
            .find(|end| self.text[*end..].trim_start().starts_with(':'))
            .map(|end| Span::new(end - quoted.len()..end))
    }
}

impl<'a, F: FileSystem + ?Sized> Resolver<'a, F> {
    pub fn new(
        fs: &'a F,
        root: &'a Path,
        project: &'a ProjectConfig,
        vocabulary: &'a Vocabulary,
    ) -> Self {
        Self {
            fs,
            root,
            project,
            vocabulary,
        }
    }

    /// Resolve every component reachable from `entries`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Io`] when a file confirmed to exist cannot be
    /// read, and [`CheckError::Manifest`] when a metadata file is not valid.
    pub fn resolve(&self, entries: &[LogicalPath]) -> Result<ResolveContext, CheckError> {
        let mut context = ResolveContext::default();
        let mut queue = VecDeque::new();
        let mut enqueued = HashSet::new();

        for entry in entries {
            if enqueued.insert(entry.clone()) {
                queue.push_back(entry.clone());
            }
        }

        while let Some(path) = queue.pop_front() {
            if context.components.contains_key(&path) {
                continue;
            }

            let component = self.resolve_component(&path, &mut context.ledger)?;
            for dependency in component.component_dependencies() {
                if enqueued.insert(dependency.clone()) {
                    queue.push_back(dependency.clone());
                }
            }
            context.components.insert(path, component);
        }

        info!(
            components = context.components.len(),
            fatal = context.ledger.fatal_count(),
            warnings = context.ledger.warning_count();
            "Resolution finished"
        );
        Ok(context)
    }

    fn resolve_component(
        &self,
        path: &LogicalPath,
        ledger: &mut ErrorLedger,
    ) -> Result<Component, CheckError> {
        debug!(component = path.as_str(); "Resolving component");
        let key = path.as_str();
        let extensions = self.project.extensions();

        // 1. All four sibling files must exist
        for ext in extensions.all() {
            if !self.fs.is_file(&path.to_fs_path(self.root, ext)) {
                let file = path.with_extension(ext);
                debug!(component = key, file = file.as_str(); "Component file is missing");
                ledger.record(
                    key,
                    ErrorRecord::new(ErrorCode::E300, format!("Expect file: `{file}`"))
                        .in_file(file)
                        .with_help(format!(
                            "a component needs all of its `.{}` files",
                            extensions.all().join("`, `.")
                        )),
                );
                return Ok(Component::empty(path.clone()));
            }
        }

        // 2. Alias table
        let metadata_path = path.to_fs_path(self.root, extensions.metadata());
        let metadata_text = self.fs.read_to_string(&metadata_path)?;
        let manifest = ComponentManifest::decode(&metadata_path, &metadata_text)?;
        let metadata = Metadata {
            file: path.with_extension(extensions.metadata()),
            text: &metadata_text,
        };
        let definitions = self.resolve_definitions(path, &manifest, &metadata, ledger);

        // 3. Markup syntax and delimiter balance
        let markup_file = path.with_extension(extensions.markup());
        let source = self
            .fs
            .read_to_string(&path.to_fs_path(self.root, extensions.markup()))?;
        let parsed = mpcheck_markup::parse(&source);
        let unbalanced = check_delimiters(&parsed.document);
        for diagnostic in parsed.diagnostics.iter().chain(&unbalanced) {
            ledger.record(
                key,
                ErrorRecord::from_diagnostic(diagnostic, &markup_file, &source),
            );
        }

        // 4. One reference per distinct element name
        let mut dependencies = Vec::new();
        let mut used = HashSet::new();
        for element in parsed.document.distinct_elements() {
            let name = element.name();
            let offset = element.open_span.start();

            let target = if self.vocabulary.contains(name) {
                Target::Builtin(name.to_string())
            } else if let Some(resolved) = definitions.get(name) {
                used.insert(name);
                Target::Component(resolved.clone())
            } else {
                ledger.record(
                    key,
                    ErrorRecord::new(ErrorCode::E302, format!("Undefined component: `{name}`"))
                        .at(&markup_file, &source, offset)
                        .with_label(element.name.span(), "not built in and not declared")
                        .with_help(format!(
                            "declare `{name}` under `usingComponents` in `{}`",
                            metadata.file
                        )),
                );
                continue;
            };

            dependencies.push(DependencyRef {
                name: name.to_string(),
                target,
                position: line_column(&source, offset),
            });
        }

        // 5. Declared but never used
        for alias in definitions.keys() {
            if !used.contains(alias.as_str()) {
                let record =
                    ErrorRecord::new(ErrorCode::E303, format!("Unused definition: `{alias}`"))
                        .with_help("remove the declaration or use the component in the markup");
                ledger.record(
                    key,
                    metadata.record_at_alias(record, alias, "never used in the markup"),
                );
            }
        }

        trace!(component = key, dependencies:? = dependencies; "Component resolved");
        Ok(Component::new(path.clone(), dependencies, definitions))
    }

    /// Resolve each declared alias; unresolvable aliases are recorded and dropped.
    fn resolve_definitions(
        &self,
        path: &LogicalPath,
        manifest: &ComponentManifest,
        metadata: &Metadata<'_>,
        ledger: &mut ErrorLedger,
    ) -> IndexMap<String, LogicalPath> {
        let mut definitions = IndexMap::new();

        for (alias, target) in manifest.using_components() {
            match self.resolve_alias(path, target) {
                Some(resolved) => {
                    trace!(alias = alias.as_str(), resolved = resolved.as_str(); "Alias resolved");
                    definitions.insert(alias.clone(), resolved);
                }
                None => {
                    let record = ErrorRecord::new(
                        ErrorCode::E301,
                        format!("Cannot resolve component `{alias}`: `{target}` does not exist"),
                    )
                    .with_help(format!(
                        "`/` paths start at the project root, `./` and `../` at this \
                         component, anything else under `{}/`",
                        self.project.registry_dir()
                    ));
                    ledger.record(
                        path.as_str(),
                        metadata.record_at_alias(record, alias, "target not found"),
                    );
                }
            }
        }

        definitions
    }

    /// Resolve an alias target declared by `from`.
    ///
    /// - `/x/y` is rooted at the project root
    /// - `./x` and `../x` are relative to the directory of `from`
    /// - anything else is a package under the registry directory, falling
    ///   back to the package's `index` component; such a target may not
    ///   contain `..` segments
    ///
    /// The target is valid only if its metadata file exists.
    fn resolve_alias(&self, from: &LogicalPath, target: &str) -> Option<LogicalPath> {
        let extensions = self.project.extensions();
        let target = [extensions.metadata(), extensions.markup()]
            .into_iter()
            .find_map(|ext| target.strip_suffix(ext)?.strip_suffix('.'))
            .unwrap_or(target);

        let relative = target.starts_with("./") || target.starts_with("../");
        let bare = !relative && !target.starts_with('/');
        if bare && target.split('/').any(|segment| segment == "..") {
            debug!(package = target; "Package target leaves the registry directory");
            return None;
        }
        let candidate = if relative {
            from.resolve_relative(target)?
        } else if bare {
            LogicalPath::new(&format!("{}/{target}", self.project.registry_dir()))?
        } else {
            LogicalPath::new(target)?
        };

        if self.has_metadata(&candidate) {
            return Some(candidate);
        }
        if bare {
            let index = candidate.join("index")?;
            if self.has_metadata(&index) {
                return Some(index);
            }
        }
        None
    }

    fn has_metadata(&self, path: &LogicalPath) -> bool {
        self.fs
            .is_file(&path.to_fs_path(self.root, self.project.extensions().metadata()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::fs::OsFileSystem;

    /// Write `<path>.{json,js,axml,acss}` with the given metadata and markup.
    fn component(root: &Path, path: &str, json: &str, axml: &str) {
        let base = root.join(path);
        if let Some(dir) = base.parent() {
            fs::create_dir_all(dir).unwrap();
        }
        for (ext, content) in [("json", json), ("js", ""), ("axml", axml), ("acss", "")] {
            fs::write(base.with_extension(ext), content).unwrap();
        }
    }

    fn resolve(root: &TempDir, entries: &[&str]) -> ResolveContext {
        let project = ProjectConfig::default();
        let vocabulary = Vocabulary::default();
        let resolver = Resolver::new(&OsFileSystem, root.path(), &project, &vocabulary);
        let entries: Vec<_> = entries
            .iter()
            .map(|entry| LogicalPath::new(entry).unwrap())
            .collect();
        resolver.resolve(&entries).unwrap()
    }

    fn path(s: &str) -> LogicalPath {
        LogicalPath::new(s).unwrap()
    }

    #[test]
    fn test_builtins_resolve_without_declaration() {
        let root = tempfile::tempdir().unwrap();
        component(root.path(), "pages/a", "{}", "<view><text>hi</text><view/></view>");

        let context = resolve(&root, &["pages/a"]);

        assert!(context.ledger.is_clean());
        let component = &context.components[&path("pages/a")];
        let targets: Vec<_> = component
            .dependencies()
            .iter()
            .map(|d| d.target.to_string())
            .collect();
        assert_eq!(targets, ["builtin:view", "builtin:text"]);
    }

    #[test]
    fn test_registry_package_index_fallback() {
        let root = tempfile::tempdir().unwrap();
        component(
            root.path(),
            "pages/a",
            r#"{ "usingComponents": { "ui-button": "ui-kit", "ui-icon": "ui-kit/icon" } }"#,
            "<ui-button/><ui-icon/>",
        );
        component(root.path(), "node_modules/ui-kit/index", "{}", "<view/>");
        component(root.path(), "node_modules/ui-kit/icon", "{}", "<view/>");

        let context = resolve(&root, &["pages/a"]);

        assert!(context.ledger.is_clean(), "{:?}", context.ledger);
        assert!(context.components.contains_key("node_modules/ui-kit/index"));
        assert!(context.components.contains_key("node_modules/ui-kit/icon"));
    }

    #[test]
    fn test_absolute_alias_with_extension() {
        let root = tempfile::tempdir().unwrap();
        component(
            root.path(),
            "pages/a",
            r#"{ "usingComponents": { "card": "/components/card/index.json" } }"#,
            "<card/>",
        );
        component(root.path(), "components/card/index", "{}", "<view/>");

        let context = resolve(&root, &["pages/a"]);

        assert!(context.ledger.is_clean());
        assert_eq!(
            context.components[&path("pages/a")].definitions()["card"],
            path("components/card/index")
        );
    }

    #[test]
    fn test_unresolved_alias_is_fatal_and_dropped() {
        let root = tempfile::tempdir().unwrap();
        component(
            root.path(),
            "pages/a",
            "{\n  \"usingComponents\": {\n    \"ghost\": \"./ghost\"\n  }\n}",
            "<ghost/>",
        );

        let context = resolve(&root, &["pages/a"]);

        let kinds: Vec<_> = context
            .ledger
            .records_for("pages/a")
            .map(ErrorRecord::kind)
            .collect();
        assert_eq!(kinds, [ErrorCode::E301, ErrorCode::E302]);

        let unresolved = &context.ledger.fatal()["pages/a"][0];
        assert_eq!(unresolved.file(), Some("pages/a.json"));
        assert_eq!(unresolved.position().map(|p| p.line), Some(3));
        assert!(context.components[&path("pages/a")].definitions().is_empty());
    }

    #[test]
    fn test_alias_position_points_at_key_not_value() {
        let root = tempfile::tempdir().unwrap();
        component(
            root.path(),
            "pages/a",
            "{\"usingComponents\": {\n  \"x\": \"card\",\n  \"card\": \"./nope\"\n}}",
            "<x/><card/>",
        );
        component(root.path(), "node_modules/card/index", "{}", "<view/>");

        let context = resolve(&root, &["pages/a"]);

        let unresolved = &context.ledger.fatal()["pages/a"][0];
        assert_eq!(unresolved.kind(), ErrorCode::E301);
        assert!(unresolved.message().contains("`card`"));
        assert_eq!(unresolved.position().map(|p| (p.line, p.column)), Some((3, 2)));
        assert_eq!(unresolved.labels()[0].span(), Span::new(39..45));
        assert!(unresolved.help().is_some());
    }

    #[test]
    fn test_undefined_component_is_labeled_on_its_name() {
        let root = tempfile::tempdir().unwrap();
        component(root.path(), "pages/a", "{}", "<view>\n  <foo-bar/>\n</view>");

        let context = resolve(&root, &["pages/a"]);

        let undefined = &context.ledger.fatal()["pages/a"][0];
        assert_eq!(undefined.kind(), ErrorCode::E302);
        let label = &undefined.labels()[0];
        assert!(label.is_primary());
        assert_eq!(label.span(), Span::new(10..17));
        assert_eq!(
            undefined.help(),
            Some("declare `foo-bar` under `usingComponents` in `pages/a.json`")
        );
    }

    #[test]
    fn test_package_target_cannot_leave_registry() {
        let root = tempfile::tempdir().unwrap();
        component(
            root.path(),
            "pages/a",
            r#"{ "usingComponents": { "x": "pkg/../../pages/x" } }"#,
            "<x/>",
        );
        component(root.path(), "pages/x", "{}", "<view/>");

        let context = resolve(&root, &["pages/a"]);

        let kinds: Vec<_> = context
            .ledger
            .records_for("pages/a")
            .map(ErrorRecord::kind)
            .collect();
        assert_eq!(kinds, [ErrorCode::E301, ErrorCode::E302]);
        assert!(!context.components.contains_key("pages/x"));
    }

    #[test]
    fn test_unused_definition_is_warning() {
        let root = tempfile::tempdir().unwrap();
        component(
            root.path(),
            "pages/a",
            r#"{ "usingComponents": { "card": "../components/card" } }"#,
            "<view/>",
        );
        component(root.path(), "components/card", "{}", "<view/>");

        let context = resolve(&root, &["pages/a"]);

        assert!(!context.ledger.has_fatal());
        let warnings = &context.ledger.warnings()["pages/a"];
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind(), ErrorCode::E303);
        assert_eq!(warnings[0].message(), "Unused definition: `card`");
        assert_eq!(warnings[0].labels()[0].message(), "never used in the markup");
        // Declared but unused components are not resolved
        assert!(!context.components.contains_key("components/card"));
    }

    #[test]
    fn test_builtin_name_wins_over_alias() {
        let root = tempfile::tempdir().unwrap();
        component(
            root.path(),
            "pages/a",
            r#"{ "usingComponents": { "view": "./my-view" } }"#,
            "<view/>",
        );
        component(root.path(), "pages/my-view", "{}", "<text/>");

        let context = resolve(&root, &["pages/a"]);

        let component = &context.components[&path("pages/a")];
        assert!(component.dependencies()[0].target.is_builtin());
        assert_eq!(context.ledger.warning_count(), 1);
    }

    #[test]
    fn test_syntax_and_balance_warnings_are_recorded() {
        let root = tempfile::tempdir().unwrap();
        component(root.path(), "pages/a", "{}", "<view>{{ x </text></view>");

        let context = resolve(&root, &["pages/a"]);

        let kinds: Vec<_> = context.ledger.warnings()["pages/a"]
            .iter()
            .map(ErrorRecord::kind)
            .collect();
        assert_eq!(kinds, [ErrorCode::E104, ErrorCode::E200]);
        assert!(
            context.ledger.warnings()["pages/a"]
                .iter()
                .all(|r| r.file() == Some("pages/a.axml"))
        );
    }

    #[test]
    fn test_empty_metadata_file() {
        let root = tempfile::tempdir().unwrap();
        component(root.path(), "pages/a", "", "<view/>");

        let context = resolve(&root, &["pages/a"]);
        assert!(context.ledger.is_clean());
    }

    #[test]
    fn test_invalid_metadata_aborts_run() {
        let root = tempfile::tempdir().unwrap();
        component(root.path(), "pages/a", "{ not json", "<view/>");

        let project = ProjectConfig::default();
        let vocabulary = Vocabulary::default();
        let resolver = Resolver::new(&OsFileSystem, root.path(), &project, &vocabulary);

        let err = resolver.resolve(&[path("pages/a")]).unwrap_err();
        assert!(matches!(err, CheckError::Manifest { .. }));
    }

    #[test]
    fn test_duplicate_entries_resolved_once() {
        let root = tempfile::tempdir().unwrap();
        component(root.path(), "pages/a", "{}", "<view/>");

        let context = resolve(&root, &["pages/a", "pages/a"]);
        assert_eq!(context.components.len(), 1);
    }
}
