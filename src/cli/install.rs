//! `post-install`: refresh desktop caches after `meson install`

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::output::Output;
use crate::hooks::{run_post_install, PostInstallReport, SystemCacheRefresher};
use crate::storage::{InstallConfig, DESTDIR_ENV, PREFIX_ENV};

#[derive(Parser)]
#[command(name = "post-install")]
#[command(version, about = "Refresh icon and GSettings schema caches after installation")]
pub struct InstallCli {
    /// Installation prefix
    #[arg(long, env = PREFIX_ENV, value_name = "DIR")]
    pub prefix: PathBuf,

    /// Staging root; when non-empty the caches are left to the packager
    #[arg(long, env = DESTDIR_ENV, value_name = "DIR")]
    pub destdir: Option<OsString>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl InstallCli {
    pub fn config(&self) -> InstallConfig {
        InstallConfig::new(&self.prefix, self.destdir.clone())
    }
}

/// Entry point for `post-install`
pub fn run() -> Result<()> {
    let cli = InstallCli::parse();
    let output = Output::new(cli.verbose);
    let config = cli.config();
    output.verbose("post-install starting");

    output.verbose_ctx("post-install", &format!("Prefix: {}", config.install_prefix.display()));

    let report = run_post_install(&config, &SystemCacheRefresher::new(), &output);
    if report.is_skipped() {
        output.verbose("post-install finished without refreshing caches");
    } else if let PostInstallReport::Refreshed { failed } = &report {
        if !failed.is_empty() {
            output.verbose_ctx("post-install", &format!("Steps that failed: {:?}", failed));
        }
    }

    Ok(())
}
