//! Version derivation from git metadata

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

use crate::domain::{rewrite_describe, DESCRIBE_ARGS};
use crate::storage::VersionConfig;

#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("Failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git describe exited with {0}")]
    Failed(ExitStatus),

    #[error("git describe produced invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Produces the raw descriptor of the current checkout
pub trait DescribeSource {
    fn describe(&self) -> Result<String, DescribeError>;
}

/// Asks `git describe --all --long --dirty`
#[derive(Debug, Clone)]
pub struct GitDescribe {
    program: OsString,
    repo_dir: Option<PathBuf>,
}

impl GitDescribe {
    pub fn new(config: &VersionConfig) -> Self {
        Self {
            program: "git".into(),
            repo_dir: config.repo_dir.clone(),
        }
    }

    /// Uses a different git executable
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }
}

impl DescribeSource for GitDescribe {
    fn describe(&self) -> Result<String, DescribeError> {
        let mut command = Command::new(&self.program);
        command
            .args(DESCRIBE_ARGS)
            .stdin(Stdio::null())
            .stderr(Stdio::null());

        if let Some(dir) = &self.repo_dir {
            command.current_dir(dir);
        }

        let output = command.output()?;
        if !output.status.success() {
            return Err(DescribeError::Failed(output.status));
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}

/// Describes the checkout and collapses the result into a version string
pub fn derive_version<S: DescribeSource + ?Sized>(source: &S) -> Result<String, DescribeError> {
    let raw = source.describe()?;
    Ok(rewrite_describe(&raw))
}
