//! git-version - Print the project version derived from git

use std::process::ExitCode;

fn main() -> ExitCode {
    // Stdout is captured as the version string, so failures stay silent
    match build_aux::cli::version::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
