//! Build helpers for meson-based desktop applications
//!
//! Three small tools run by the build system:
//! - `git-version` derives a version string from `git describe`
//! - `post-install` refreshes icon and GSettings schema caches
//! - `yaml-to-json` turns a YAML data file into a JSON artifact, written to
//!   the build tree and next to the sources

pub mod domain;
pub mod storage;
pub mod hooks;
pub mod cli;

pub use domain::{Document, Number};
