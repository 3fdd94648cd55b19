//! Orphan detection: markup files no entry page reaches.

use std::path::Path;

use log::debug;

use mpcheck_markup::error::ErrorCode;

use crate::{
    component::ComponentMap,
    config::ProjectConfig,
    error::CheckError,
    fs::FileSystem,
    ledger::{ErrorLedger, ErrorRecord},
    logical_path::LogicalPath,
};

/// Every markup file under `root`, outside the registry directory, whose
/// logical path is not in `components`. Sorted by path.
///
/// # Errors
///
/// Returns [`CheckError::Io`] if the project tree cannot be listed.
pub fn find_orphans<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    project: &ProjectConfig,
    components: &ComponentMap,
) -> Result<Vec<LogicalPath>, CheckError> {
    let markup = project.extensions().markup();
    let files = fs.list_files(root, &[project.registry_dir()])?;

    let orphans: Vec<_> = files
        .iter()
        .filter_map(|file| LogicalPath::from_file(file, markup))
        .filter(|path| !components.contains_key(path))
        .collect();

    debug!(scanned = files.len(), orphans = orphans.len(); "Orphan scan finished");
    Ok(orphans)
}

/// The synthetic ledger key orphans are filed under.
pub fn orphan_key(count: usize) -> String {
    format!("{count} extraneous components are found")
}

/// File every orphan under one synthetic key.
pub fn record_orphans(ledger: &mut ErrorLedger, orphans: &[LogicalPath], markup_ext: &str) {
    if orphans.is_empty() {
        return;
    }

    let key = orphan_key(orphans.len());
    for orphan in orphans {
        ledger.record(
            key.as_str(),
            ErrorRecord::new(ErrorCode::E304, format!("Orphan component: `{orphan}`"))
                .in_file(orphan.with_extension(markup_ext)),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{component::Component, fs::OsFileSystem};

    #[test]
    fn test_find_orphans_skips_reached_and_registry() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("pages")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        for file in [
            "pages/a.axml",
            "pages/a.json",
            "pages/unused.axml",
            "node_modules/pkg/index.axml",
        ] {
            fs::write(root.join(file), "").unwrap();
        }

        let a = LogicalPath::new("pages/a").unwrap();
        let components = ComponentMap::from([(a.clone(), Component::empty(a))]);

        let orphans =
            find_orphans(&OsFileSystem, root, &ProjectConfig::default(), &components).unwrap();

        assert_eq!(orphans, [LogicalPath::new("pages/unused").unwrap()]);
    }

    #[test]
    fn test_record_orphans_under_one_key() {
        let mut ledger = ErrorLedger::new();
        let orphans = [
            LogicalPath::new("pages/x").unwrap(),
            LogicalPath::new("pages/y").unwrap(),
        ];

        record_orphans(&mut ledger, &orphans, "axml");

        let records = &ledger.warnings()["2 extraneous components are found"];
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind(), ErrorCode::E304);
        assert_eq!(records[0].file(), Some("pages/x.axml"));
        assert!(!ledger.has_fatal());
    }

    #[test]
    fn test_no_orphans_records_nothing() {
        let mut ledger = ErrorLedger::new();
        record_orphans(&mut ledger, &[], "axml");
        assert!(ledger.is_clean());
    }
}
