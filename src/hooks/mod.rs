//! # External Program Hooks
//!
//! Everything that shells out lives here, behind small traits so the
//! callers can be tested without the real programs.
//!
//! | Hook | Programs | Failure policy |
//! |------|----------|----------------|
//! | Version | `git describe --all --long --dirty` | Fatal |
//! | Post-install | `gtk-update-icon-cache`, `glib-compile-schemas` | Ignored |
//!
//! ## Key Types
//!
//! - [`DescribeSource`] / [`GitDescribe`] - Raw version descriptor
//! - [`CacheRefresher`] / [`SystemCacheRefresher`] - Desktop cache tools

mod git;
mod post_install;
mod refresher;

pub use git::{derive_version, DescribeError, DescribeSource, GitDescribe};
pub use post_install::{run_post_install, PostInstallReport, RefreshStep};
pub use refresher::{
    CacheRefresher, RefreshError, SystemCacheRefresher, ICON_CACHE_PROGRAM, SCHEMA_COMPILER_PROGRAM,
};
