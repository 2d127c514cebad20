//! # Storage Layer
//!
//! File formats and configuration records for the build helpers.
//!
//! | Data | Format | Module |
//! |------|--------|--------|
//! | Converter input | YAML (single document, YAML 1.1 typing, merge keys) | [`yaml`] |
//! | Converter output | Comment line + 4-space indented JSON | [`json`] |
//! | Tool settings | Records built from CLI arguments and environment | `config` |
//!
//! ## Key Types
//!
//! - [`InstallConfig`] - Install prefix and staging root for the post-install hook
//! - [`ConvertConfig`] - Input, source directory and output of a conversion
//! - [`VersionConfig`] - Repository location for version derivation

use std::path::PathBuf;

use thiserror::Error;

mod config;
pub mod json;
pub mod yaml;

pub use config::{ConfigError, ConvertConfig, InstallConfig, VersionConfig, DESTDIR_ENV, PREFIX_ENV};
pub use json::{provenance_comment, render_artifact, source_copy_path, write_artifact};
pub use yaml::{load_document, parse_document};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to encode JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Output path has no file name: {}", .0.display())]
    NoFileName(PathBuf),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
