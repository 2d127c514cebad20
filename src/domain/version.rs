//! Version string rewriting
//!
//! `git describe --all --long --dirty` produces strings such as
//! `heads/main-0-gabc1234` or `tags/v1.2-3-gabcdef-dirty`. When the checkout
//! sits exactly on a branch tip the descriptor is collapsed into the shorter
//! `main~gabc1234` form; every other shape is passed through untouched.

use std::sync::LazyLock;

use regex::Regex;

/// Arguments handed to `git` to describe the current checkout.
///
/// The rewrite below depends on this exact output format.
pub const DESCRIBE_ARGS: [&str; 4] = ["describe", "--all", "--long", "--dirty"];

static BRANCH_TIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^heads/(.*)-0-(g.*)$").unwrap());

/// Rewrites a raw describe string into the human-oriented version string
pub fn rewrite_describe(raw: &str) -> String {
    BRANCH_TIP_RE
        .replace(raw.trim(), "${1}~${2}")
        .into_owned()
}
