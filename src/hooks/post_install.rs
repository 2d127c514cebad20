//! Post-install cache refresh
//!
//! Runs after `meson install`. For staged installs (`DESTDIR` set) nothing
//! happens here; the package manager triggers the refresh after unpacking.

use crate::cli::Output;
use crate::storage::InstallConfig;

use super::refresher::CacheRefresher;

/// A refresh step of the hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStep {
    IconCache,
    Schemas,
}

/// What the hook did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostInstallReport {
    /// Staged install; no tool was run
    Skipped,

    /// Both tools were run; lists the steps that did not succeed
    Refreshed { failed: Vec<RefreshStep> },
}

impl PostInstallReport {
    pub fn is_skipped(&self) -> bool {
        matches!(self, PostInstallReport::Skipped)
    }
}

/// Refreshes icon and schema caches unless the install is staged
///
/// Refresh failures never abort the install; they are only reported.
pub fn run_post_install<R: CacheRefresher + ?Sized>(
    config: &InstallConfig,
    refresher: &R,
    output: &Output,
) -> PostInstallReport {
    if let Some(root) = &config.staging_root {
        output.verbose_ctx(
            "post-install",
            &format!("Staged install into {}, skipping cache refresh", root.display()),
        );
        return PostInstallReport::Skipped;
    }

    let mut failed = Vec::new();

    let icon_dir = config.icon_dir();
    output.info("Update icon cache...");
    output.verbose_ctx("post-install", &format!("Icon directory: {}", icon_dir.display()));
    // Failures are recorded in the report, never propagated
    if let Err(e) = refresher.refresh_icon_cache(&icon_dir) {
        output.verbose_ctx("post-install", &format!("Ignoring icon cache failure: {}", e));
        failed.push(RefreshStep::IconCache);
    }

    let schema_dir = config.schema_dir();
    output.info("Compiling gsettings schemas...");
    output.verbose_ctx("post-install", &format!("Schema directory: {}", schema_dir.display()));
    if let Err(e) = refresher.compile_schemas(&schema_dir) {
        output.verbose_ctx("post-install", &format!("Ignoring schema compiler failure: {}", e));
        failed.push(RefreshStep::Schemas);
    }

    PostInstallReport::Refreshed { failed }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::hooks::refresher::testing::{RecordingRefresher, RefreshCall};

    fn quiet() -> Output {
        Output::new(false)
    }

    #[test]
    fn staged_install_runs_nothing() {
        let refresher = RecordingRefresher::default();
        let config = InstallConfig::new("/usr/local", Some("/tmp/pkgroot"));

        let report = run_post_install(&config, &refresher, &quiet());

        assert!(report.is_skipped());
        assert!(refresher.calls.borrow().is_empty());
    }

    #[test]
    fn refreshes_both_caches_in_order() {
        let refresher = RecordingRefresher::default();
        let config = InstallConfig::new("/usr/local", None::<String>);

        let report = run_post_install(&config, &refresher, &quiet());

        assert_eq!(report, PostInstallReport::Refreshed { failed: vec![] });
        assert_eq!(
            *refresher.calls.borrow(),
            vec![
                RefreshCall::IconCache(PathBuf::from("/usr/local/share/icons/hicolor")),
                RefreshCall::Schemas(PathBuf::from("/usr/local/share/glib-2.0/schemas")),
            ]
        );
    }

    #[test]
    fn empty_destdir_still_refreshes() {
        let refresher = RecordingRefresher::default();
        let config = InstallConfig::new("/opt/app", Some(""));

        run_post_install(&config, &refresher, &quiet());

        assert_eq!(refresher.calls.borrow().len(), 2);
    }

    #[test]
    fn failures_are_swallowed() {
        let refresher = RecordingRefresher::failing();
        let config = InstallConfig::new("/usr", None::<String>);

        let report = run_post_install(&config, &refresher, &quiet());

        // The second tool still runs after the first one failed
        assert_eq!(refresher.calls.borrow().len(), 2);
        assert_eq!(
            report,
            PostInstallReport::Refreshed {
                failed: vec![RefreshStep::IconCache, RefreshStep::Schemas]
            }
        );
    }
}
