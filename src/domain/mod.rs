//! Core domain types
//!
//! - [`Document`] - Parsed data tree shared by the YAML reader and JSON writer
//! - [`rewrite_describe`] - Collapses `git describe` output into a version string

mod document;
mod version;

pub use document::{format_float, Document, DocumentError, Number};
pub use version::{rewrite_describe, DESCRIBE_ARGS};
