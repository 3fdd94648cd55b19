//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, project root, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use mpcheck::{CheckError, config::AppConfig};

/// File name looked up in the project root.
const LOCAL_CONFIG: &str = "mpcheck.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration `{}`: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),
}

impl From<ConfigError> for CheckError {
    fn from(err: ConfigError) -> Self {
        CheckError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. `mpcheck.toml` in the project root
/// 3. Platform-specific config directory (`mpcheck/config.toml`)
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be read or parsed
pub fn load_config(
    explicit_path: Option<impl AsRef<Path>>,
    project_root: &Path,
) -> Result<AppConfig, CheckError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = project_root.join(LOCAL_CONFIG);
    if local_config.is_file() {
        info!(path = local_config.display().to_string(); "Loading configuration from project root");
        return load_config_file(&local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "mpcheck", "mpcheck") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.is_file() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(&system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: &Path) -> Result<AppConfig, CheckError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path).map_err(|err| CheckError::io(path, err))?;

    let config: AppConfig = toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_config_in_project_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(LOCAL_CONFIG),
            r#"
[project]
registry_dir = "vendor"

[project.extensions]
markup = "wxml"

[markup]
builtin_elements = ["lottie"]
"#,
        )
        .unwrap();

        let config = load_config(None::<&Path>, dir.path()).unwrap();

        assert_eq!(config.project().registry_dir(), "vendor");
        assert_eq!(config.project().manifest(), "app.json");
        assert_eq!(config.project().extensions().markup(), "wxml");
        assert_eq!(config.project().extensions().style(), "acss");
        assert_eq!(config.markup().builtin_elements(), ["lottie"]);
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LOCAL_CONFIG), "[project]\npages_dir = \"local\"\n").unwrap();
        let explicit = dir.path().join("other.toml");
        fs::write(&explicit, "[project]\npages_dir = \"explicit\"\n").unwrap();

        let config = load_config(Some(&explicit), dir.path()).unwrap();
        assert_eq!(config.project().pages_dir(), "explicit");
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_config(Some(dir.path().join("nope.toml")), dir.path()).unwrap_err();
        assert!(matches!(err, CheckError::Config(message) if message.contains("nope.toml")));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[project\n").unwrap();

        let err = load_config(Some(&path), dir.path()).unwrap_err();
        assert!(matches!(err, CheckError::Config(_)));
    }
}
