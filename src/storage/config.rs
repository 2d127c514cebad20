//! Configuration records for the build helpers
//!
//! Environment variables and command-line arguments are read once at the
//! process boundary (see the `cli` module) and handed to the tools as these
//! plain records.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::json::source_copy_path;
use super::StorageError;

/// Environment variable meson sets to the installation prefix
pub const PREFIX_ENV: &str = "MESON_INSTALL_PREFIX";

/// Environment variable naming a staging root for packaged installs
pub const DESTDIR_ENV: &str = "DESTDIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Install locations used by the post-install hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    /// Installation prefix (e.g. `/usr/local`)
    pub install_prefix: PathBuf,

    /// Staging root; when present, cache refresh is deferred to the packager
    pub staging_root: Option<PathBuf>,
}

impl InstallConfig {
    /// Creates a config, treating an empty staging value as unset
    pub fn new(install_prefix: impl Into<PathBuf>, staging_root: Option<impl Into<OsString>>) -> Self {
        let staging_root = staging_root
            .map(Into::into)
            .filter(|root| !root.is_empty())
            .map(PathBuf::from);

        Self {
            install_prefix: install_prefix.into(),
            staging_root,
        }
    }

    /// Returns true if the system caches should be refreshed now
    pub fn should_refresh(&self) -> bool {
        self.staging_root.is_none()
    }

    /// `<prefix>/share/icons/hicolor`
    pub fn icon_dir(&self) -> PathBuf {
        self.install_prefix.join("share").join("icons").join("hicolor")
    }

    /// `<prefix>/share/glib-2.0/schemas`
    pub fn schema_dir(&self) -> PathBuf {
        self.install_prefix.join("share").join("glib-2.0").join("schemas")
    }
}

/// Paths for one YAML to JSON conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub source_dir: PathBuf,
    pub output: PathBuf,
}

impl ConvertConfig {
    pub fn new(input: impl Into<PathBuf>, source_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            source_dir: source_dir.into(),
            output: output.into(),
        }
    }

    /// Path of the copy written next to the sources
    pub fn source_copy(&self) -> Result<PathBuf, StorageError> {
        source_copy_path(&self.source_dir, &self.output)
    }

    /// All destinations in write order: requested output first, then the source copy
    pub fn destinations(&self) -> Result<[PathBuf; 2], StorageError> {
        Ok([self.output.clone(), self.source_copy()?])
    }
}

/// Where to look for version-control metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionConfig {
    /// Repository directory; the current directory when unset
    pub repo_dir: Option<PathBuf>,
}

impl VersionConfig {
    pub fn new(repo_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        if let Some(dir) = &repo_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("repository directory is empty".to_string()));
            }
        }

        Ok(Self { repo_dir })
    }

    pub fn repo_dir(&self) -> Option<&Path> {
        self.repo_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_paths_from_prefix() {
        let config = InstallConfig::new("/usr/local", None::<String>);

        assert_eq!(config.icon_dir(), PathBuf::from("/usr/local/share/icons/hicolor"));
        assert_eq!(config.schema_dir(), PathBuf::from("/usr/local/share/glib-2.0/schemas"));
    }

    #[test]
    fn empty_staging_root_is_unset() {
        let config = InstallConfig::new("/usr", Some(""));
        assert_eq!(config.staging_root, None);
        assert!(config.should_refresh());
    }

    #[test]
    fn staging_root_disables_refresh() {
        let config = InstallConfig::new("/usr", Some("/tmp/stage"));
        assert_eq!(config.staging_root, Some(PathBuf::from("/tmp/stage")));
        assert!(!config.should_refresh());
    }

    #[test]
    fn convert_destinations_in_order() {
        let config = ConvertConfig::new("in/data.yaml", "/src/data", "/build/data/out.json");
        let [first, second] = config.destinations().unwrap();

        assert_eq!(first, PathBuf::from("/build/data/out.json"));
        assert_eq!(second, PathBuf::from("/src/data/out.json"));
    }

    #[test]
    fn version_config_rejects_empty_dir() {
        assert!(VersionConfig::new(Some(PathBuf::new())).is_err());
        assert_eq!(VersionConfig::new(None).unwrap().repo_dir(), None);
    }
}
