//! `git-version`: print the project version derived from git

use std::path::PathBuf;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;

use super::output::Output;
use crate::hooks::{derive_version, GitDescribe};
use crate::storage::VersionConfig;

#[derive(Parser)]
#[command(name = "git-version")]
#[command(version, about = "Print a version string derived from git describe")]
pub struct VersionCli {
    /// Run as if started in this directory
    #[arg(short = 'C', long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Explain failures on stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Entry point for `git-version`
///
/// Prints nothing on failure, usage errors included; the caller only sees
/// the exit status.
pub fn run() -> Result<()> {
    let cli = match VersionCli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => return Err(e.into()),
    };
    let output = Output::new(cli.verbose);

    let config = VersionConfig::new(cli.directory)?;
    output.verbose_ctx("version", &format!("Repository: {:?}", config.repo_dir()));

    let version = derive_version(&GitDescribe::new(&config)).map_err(|e| {
        output.verbose_ctx("version", &e.to_string());
        e
    })?;

    output.info(&version);
    Ok(())
}
