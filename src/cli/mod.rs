//! # Command-Line Interface
//!
//! Entry points for the three build tools. Each binary in `src/bin/` calls
//! one `run()` function from here.
//!
//! | Binary | Module | Invoked by |
//! |--------|--------|------------|
//! | `git-version` | [`version`] | `meson.build` at configure time (`run_command`) |
//! | `post-install` | [`install`] | `meson.add_install_script` |
//! | `yaml-to-json` | [`convert`] | `custom_target` for generated data files |
//!
//! ## Verbose Mode
//!
//! Every tool accepts `--verbose` (or `-v`) for diagnostics on stderr:
//! ```bash
//! yaml-to-json --verbose data/keys.yaml data build/keys.json
//! ```

pub mod convert;
pub mod install;
mod output;
pub mod version;

pub use output::Output;
